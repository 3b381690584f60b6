//! Once-per-day gate for the single-card draw.

use std::sync::Mutex;

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::error::{SpreadResult, StorageError};
use crate::storage::{BlobStore, lock};

/// Storage key of the daily draw record.
pub const DAILY_DRAW_KEY: &str = "daily_draw";

/// Which flow produced the daily draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawSource {
    /// The regular daily draw.
    Daily,
    /// The first draw made during onboarding.
    Onboarding,
}

/// The stored record of the most recent daily draw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyDrawRecord {
    /// Id of the drawn card.
    #[serde(rename = "cardId")]
    pub card_id: String,
    /// When the card was drawn, with the local offset at that time.
    #[serde(rename = "drawnAtISO")]
    pub drawn_at: DateTime<FixedOffset>,
    /// Which flow drew it.
    pub source: DrawSource,
}

impl DailyDrawRecord {
    /// The local calendar day of the draw, seen from `offset`.
    pub fn local_date(&self, offset: &FixedOffset) -> NaiveDate {
        self.drawn_at.with_timezone(offset).date_naive()
    }
}

/// Decides whether a new daily draw is allowed today.
///
/// A stored record only counts if its local calendar date is today; older
/// records are treated as absent and cleared the next time they are read.
#[derive(Debug)]
pub struct DailyDrawGate<S, C> {
    store: S,
    clock: C,
    write_lock: Mutex<()>,
}

impl<S: BlobStore, C: Clock> DailyDrawGate<S, C> {
    /// Create a gate over `store`, judging "today" by `clock`.
    pub fn new(store: S, clock: C) -> Self {
        Self {
            store,
            clock,
            write_lock: Mutex::new(()),
        }
    }

    /// Today's draw, if one has been recorded.
    pub fn todays_draw(&self) -> SpreadResult<Option<DailyDrawRecord>> {
        let _guard = lock(&self.write_lock);

        let Some(record) = self.read()? else {
            return Ok(None);
        };
        let now = self.clock.now();
        if record.local_date(now.offset()) == now.date_naive() {
            return Ok(Some(record));
        }

        tracing::debug!(
            card = %record.card_id,
            drawn_at = %record.drawn_at,
            "clearing stale daily draw"
        );
        // A stale record counts as absent even if it cannot be cleared yet.
        if let Err(err) = self.store.remove(DAILY_DRAW_KEY) {
            tracing::warn!(%err, "could not clear stale daily draw");
        }
        Ok(None)
    }

    /// Whether no draw has been recorded today.
    pub fn can_draw_today(&self) -> SpreadResult<bool> {
        Ok(self.todays_draw()?.is_none())
    }

    /// Record a draw made now, replacing any previous record.
    pub fn record_draw(
        &self,
        card_id: impl Into<String>,
        source: DrawSource,
    ) -> SpreadResult<DailyDrawRecord> {
        let _guard = lock(&self.write_lock);

        let record = DailyDrawRecord {
            card_id: card_id.into(),
            drawn_at: self.clock.now(),
            source,
        };
        let json = serde_json::to_string(&record).map_err(|source| StorageError::Corrupt {
            key: DAILY_DRAW_KEY.to_string(),
            source,
        })?;
        self.store.store(DAILY_DRAW_KEY, &json)?;

        tracing::info!(card = %record.card_id, source = ?record.source, "daily draw recorded");
        Ok(record)
    }

    fn read(&self) -> Result<Option<DailyDrawRecord>, StorageError> {
        let Some(json) = self.store.load(DAILY_DRAW_KEY)? else {
            return Ok(None);
        };
        serde_json::from_str(&json)
            .map(Some)
            .map_err(|source| StorageError::Corrupt {
                key: DAILY_DRAW_KEY.to_string(),
                source,
            })
    }
}
