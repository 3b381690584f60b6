//! Durable storage of completed spreads.
//!
//! All spreads live as one JSON array, most recent first, under
//! [`SPREADS_KEY`]. Every operation reads, modifies, and writes the whole
//! array while holding the repository's write lock, so concurrent callers on
//! a multi-threaded runtime cannot interleave and lose updates.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use oracle_core::{DrawnCard, SpreadId, SpreadType};

use crate::clock::Clock;
use crate::error::{SpreadError, SpreadResult, StorageError};
use crate::storage::{BlobStore, lock};

/// Storage key of the saved-spread list.
pub const SPREADS_KEY: &str = "saved_spreads";

/// A completed spread that has not been saved yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSpread {
    /// Shape of the spread.
    pub spread_type: SpreadType,
    /// One drawn card per position, in position order.
    pub cards: Vec<DrawnCard>,
    /// Interpretation text shown with the spread.
    pub interpretation: String,
    /// Optional journal text written before saving.
    pub journal_entry: Option<String>,
}

/// A persisted spread.
///
/// Only `journal_entry` changes after saving.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedSpread {
    /// Unique id assigned at save time.
    pub id: SpreadId,
    /// Shape of the spread.
    #[serde(rename = "type")]
    pub spread_type: SpreadType,
    /// One drawn card per position, in position order.
    pub cards: Vec<DrawnCard>,
    /// Interpretation text.
    pub interpretation: String,
    /// Journal text, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub journal_entry: Option<String>,
    /// When the spread was saved.
    pub saved_at: DateTime<Utc>,
}

/// Repository of saved spreads over a [`BlobStore`].
#[derive(Debug)]
pub struct SpreadRepository<S, C> {
    store: S,
    clock: C,
    write_lock: Mutex<()>,
}

impl<S: BlobStore, C: Clock> SpreadRepository<S, C> {
    /// Create a repository over `store`, stamping saves with `clock`.
    pub fn new(store: S, clock: C) -> Self {
        Self {
            store,
            clock,
            write_lock: Mutex::new(()),
        }
    }

    /// Persist a completed spread at the front of the list.
    pub fn save(&self, spread: NewSpread) -> SpreadResult<SavedSpread> {
        check_shape(&spread)?;
        let _guard = lock(&self.write_lock);

        let mut all = self.read_all()?;
        let saved = SavedSpread {
            id: SpreadId::new(),
            spread_type: spread.spread_type,
            cards: spread.cards,
            interpretation: spread.interpretation,
            journal_entry: spread.journal_entry,
            saved_at: self.clock.now().to_utc(),
        };
        all.insert(0, saved.clone());
        self.write_all(&all)?;

        tracing::info!(id = %saved.id, spread = %saved.spread_type, "spread saved");
        Ok(saved)
    }

    /// All saved spreads, most recent first.
    pub fn list(&self) -> SpreadResult<Vec<SavedSpread>> {
        Ok(self.read_all()?)
    }

    /// Fetch a saved spread by id.
    pub fn get_by_id(&self, id: SpreadId) -> SpreadResult<Option<SavedSpread>> {
        Ok(self.read_all()?.into_iter().find(|s| s.id == id))
    }

    /// Find the one spread whose id starts with `prefix` (hex, dashes ignored).
    ///
    /// Returns `Ok(None)` if nothing matches and `InvalidArgument` if the
    /// prefix is ambiguous.
    pub fn find_by_prefix(&self, prefix: &str) -> SpreadResult<Option<SavedSpread>> {
        let needle = prefix.trim().replace('-', "").to_lowercase();
        if needle.is_empty() {
            return Err(SpreadError::InvalidArgument("empty id".to_string()));
        }
        let mut matches: Vec<SavedSpread> = self
            .read_all()?
            .into_iter()
            .filter(|s| s.id.0.simple().to_string().starts_with(&needle))
            .collect();
        match matches.len() {
            0 => Ok(None),
            1 => Ok(matches.pop()),
            n => Err(SpreadError::InvalidArgument(format!(
                "id prefix \"{prefix}\" matches {n} spreads"
            ))),
        }
    }

    /// Replace the journal text of a saved spread. Blank text clears it.
    pub fn update_journal(&self, id: SpreadId, text: &str) -> SpreadResult<()> {
        let _guard = lock(&self.write_lock);

        let mut all = self.read_all()?;
        let spread = all
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(SpreadError::NotFound(id))?;
        let text = text.trim();
        spread.journal_entry = (!text.is_empty()).then(|| text.to_string());
        self.write_all(&all)?;

        tracing::debug!(%id, "journal updated");
        Ok(())
    }

    /// Remove a saved spread. Deleting a missing id is a no-op.
    pub fn delete(&self, id: SpreadId) -> SpreadResult<()> {
        let _guard = lock(&self.write_lock);

        let mut all = self.read_all()?;
        let before = all.len();
        all.retain(|s| s.id != id);
        if all.len() == before {
            tracing::debug!(%id, "delete of unknown spread ignored");
            return Ok(());
        }
        self.write_all(&all)?;

        tracing::info!(%id, "spread deleted");
        Ok(())
    }

    fn read_all(&self) -> Result<Vec<SavedSpread>, StorageError> {
        match self.store.load(SPREADS_KEY)? {
            None => Ok(Vec::new()),
            Some(json) => serde_json::from_str(&json).map_err(|source| StorageError::Corrupt {
                key: SPREADS_KEY.to_string(),
                source,
            }),
        }
    }

    fn write_all(&self, all: &[SavedSpread]) -> Result<(), StorageError> {
        let json = serde_json::to_string(all).map_err(|source| StorageError::Corrupt {
            key: SPREADS_KEY.to_string(),
            source,
        })?;
        self.store.store(SPREADS_KEY, &json)
    }
}

fn check_shape(spread: &NewSpread) -> SpreadResult<()> {
    let expected = spread.spread_type.positions();
    let actual: Vec<_> = spread.cards.iter().map(|d| d.position).collect();
    if actual != expected {
        return Err(SpreadError::InvalidArgument(format!(
            "{} spread needs positions {:?}, got {:?}",
            spread.spread_type, expected, actual
        )));
    }
    Ok(())
}
