//! Spread session state machine.
//!
//! `SpreadSession` drives one spread from the first shuffle to its
//! interpretation:
//!
//! ```text
//! Idle ─begin─▶ Shuffling ─present_choices─▶ Choosing ─select─┬─▶ Shuffling (positions remain)
//!                                                            └─▶ Interpreting ─interpret─▶ Complete
//! ```
//!
//! `reset` returns to `Idle` from anywhere. An operation attempted in the
//! wrong stage fails without touching any state.

use rand::SeedableRng;
use rand::rngs::StdRng;

use oracle_core::{Card, Deck, DrawnCard, Position, SpreadType};

use crate::config::{EngineConfig, RepeatPolicy};
use crate::error::{SpreadError, SpreadResult};
use crate::interpretation::{Interpretation, InterpretationRequester, InterpretationTransport};
use crate::repository::NewSpread;
use crate::sampler::sample_excluding;
use crate::sequencer::next_position;

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    /// No spread started.
    Idle,
    /// Waiting for the next set of choices to be dealt.
    Shuffling,
    /// A fresh set of face-down cards is on the table.
    Choosing {
        /// The cards the user may pick from.
        choices: Vec<Card>,
    },
    /// Every position is filled; the interpretation is pending.
    Interpreting,
    /// Finished, with its interpretation.
    Complete {
        /// The generated or fallback interpretation.
        interpretation: Interpretation,
    },
}

impl Stage {
    /// Short stage name for messages and logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Shuffling => "shuffling",
            Self::Choosing { .. } => "choosing",
            Self::Interpreting => "interpreting",
            Self::Complete { .. } => "complete",
        }
    }
}

/// What a successful [`SpreadSession::select`] leads to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// More positions remain; the next one is given.
    Next(Position),
    /// The last position was filled; call [`SpreadSession::interpret`].
    ReadyToInterpret,
}

/// A single spread being drawn.
pub struct SpreadSession {
    deck: Deck,
    config: EngineConfig,
    rng: StdRng,
    spread_type: Option<SpreadType>,
    drawn: Vec<DrawnCard>,
    stage: Stage,
}

impl SpreadSession {
    /// Create an idle session drawing from `deck`.
    pub fn new(deck: Deck, config: EngineConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            deck,
            config,
            rng,
            spread_type: None,
            drawn: Vec::new(),
            stage: Stage::Idle,
        }
    }

    /// The current stage.
    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    /// The spread being drawn, once begun.
    pub fn spread_type(&self) -> Option<SpreadType> {
        self.spread_type
    }

    /// Cards drawn so far, in position order.
    pub fn drawn(&self) -> &[DrawnCard] {
        &self.drawn
    }

    /// The cards currently offered, if choosing.
    pub fn choices(&self) -> Option<&[Card]> {
        match &self.stage {
            Stage::Choosing { choices } => Some(choices),
            _ => None,
        }
    }

    /// The position the next selection fills.
    pub fn next_position(&self) -> Option<Position> {
        self.spread_type.and_then(|t| next_position(t, self.drawn.len()))
    }

    /// The interpretation, once complete.
    pub fn interpretation(&self) -> Option<&Interpretation> {
        match &self.stage {
            Stage::Complete { interpretation } => Some(interpretation),
            _ => None,
        }
    }

    /// Whether the session has finished.
    pub fn is_complete(&self) -> bool {
        matches!(self.stage, Stage::Complete { .. })
    }

    /// Start a spread. Only valid when idle.
    pub fn begin(&mut self, spread_type: SpreadType) -> SpreadResult<()> {
        if self.stage != Stage::Idle {
            return Err(SpreadError::AlreadyInProgress(self.stage.name()));
        }
        self.spread_type = Some(spread_type);
        self.drawn.clear();
        tracing::debug!(spread = %spread_type, "spread started");
        self.transition(Stage::Shuffling);
        Ok(())
    }

    /// Deal a fresh set of face-down choices for the next position.
    ///
    /// Offers `choice_count` cards, or the whole remaining pool if it is
    /// smaller. Under [`RepeatPolicy::Exclude`] cards already drawn in this
    /// spread are left out.
    pub fn present_choices(&mut self) -> SpreadResult<&[Card]> {
        if self.stage != Stage::Shuffling {
            return Err(self.invalid("present choices"));
        }

        let exclude: Vec<&str> = match self.config.repeat_policy {
            RepeatPolicy::Exclude => self.drawn.iter().map(|d| d.card.id.as_str()).collect(),
            RepeatPolicy::Independent => Vec::new(),
        };
        let available = self
            .deck
            .cards()
            .iter()
            .filter(|c| !exclude.contains(&c.id.as_str()))
            .count();
        if available == 0 {
            return Err(SpreadError::InvalidArgument("no cards left to offer".to_string()));
        }

        let count = self.config.choice_count.min(available);
        let choices = sample_excluding(self.deck.cards(), count, &exclude, &mut self.rng)?;
        self.transition(Stage::Choosing { choices });
        Ok(self.choices().unwrap_or_default())
    }

    /// Pick one of the offered cards for the next position.
    pub fn select(&mut self, card_id: &str) -> SpreadResult<Advance> {
        let Stage::Choosing { choices } = &self.stage else {
            return Err(self.invalid("select a card"));
        };
        let Some(spread_type) = self.spread_type else {
            return Err(self.invalid("select a card"));
        };
        let Some(position) = next_position(spread_type, self.drawn.len()) else {
            return Err(self.invalid("select a card"));
        };
        let card = choices
            .iter()
            .find(|c| c.id == card_id)
            .cloned()
            .ok_or_else(|| SpreadError::NotOffered(card_id.to_string()))?;

        tracing::debug!(card = %card.id, %position, "card drawn");
        self.drawn.push(DrawnCard { card, position });

        match next_position(spread_type, self.drawn.len()) {
            Some(next) => {
                self.transition(Stage::Shuffling);
                Ok(Advance::Next(next))
            }
            None => {
                self.transition(Stage::Interpreting);
                Ok(Advance::ReadyToInterpret)
            }
        }
    }

    /// Request the interpretation of the filled spread and complete it.
    ///
    /// The requester is called exactly once; it never fails, so the session
    /// always reaches `Complete`.
    pub async fn interpret<T: InterpretationTransport>(
        &mut self,
        requester: &InterpretationRequester<T>,
        context: Option<&str>,
    ) -> SpreadResult<&Interpretation> {
        if self.stage != Stage::Interpreting {
            return Err(self.invalid("interpret"));
        }
        let Some(spread_type) = self.spread_type else {
            return Err(self.invalid("interpret"));
        };

        let interpretation = requester.request(&self.drawn, spread_type, context).await;
        if interpretation.is_fallback() {
            tracing::debug!(spread = %spread_type, "completed with fallback interpretation");
        }
        self.transition(Stage::Complete { interpretation });
        self.interpretation()
            .ok_or_else(|| self.invalid("read the interpretation"))
    }

    /// The finished spread, ready for [`SpreadRepository::save`].
    ///
    /// The session is left as is, so a failed save can be retried without
    /// drawing again.
    ///
    /// [`SpreadRepository::save`]: crate::repository::SpreadRepository::save
    pub fn finished(&self) -> SpreadResult<NewSpread> {
        match (&self.stage, self.spread_type) {
            (Stage::Complete { interpretation }, Some(spread_type)) => Ok(NewSpread {
                spread_type,
                cards: self.drawn.clone(),
                interpretation: interpretation.text().to_string(),
                journal_entry: None,
            }),
            _ => Err(self.invalid("take the finished spread")),
        }
    }

    /// Abandon or close the current spread and return to `Idle`.
    pub fn reset(&mut self) {
        self.drawn.clear();
        self.spread_type = None;
        self.transition(Stage::Idle);
    }

    fn transition(&mut self, to: Stage) {
        tracing::debug!(from = self.stage.name(), to = to.name(), "stage transition");
        self.stage = to;
    }

    fn invalid(&self, operation: &'static str) -> SpreadError {
        SpreadError::InvalidState {
            operation,
            stage: self.stage.name(),
        }
    }
}
