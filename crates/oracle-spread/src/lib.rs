//! Spread engine for oracle card readings.
//!
//! Turns a user's picks into a finished reading: a [`SpreadSession`] deals
//! face-down choices from the deck, binds each pick to the next named
//! position, asks an [`InterpretationRequester`] for a reading once every
//! position is filled, and hands the result to a [`SpreadRepository`].
//! A [`DailyDrawGate`] limits the single-card draw to once per calendar day.

pub mod clock;
pub mod config;
pub mod daily;
pub mod error;
pub mod export;
pub mod interpretation;
pub mod repository;
pub mod sampler;
pub mod sequencer;
pub mod session;
pub mod storage;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{EngineConfig, InterpretationConfig, RepeatPolicy};
pub use daily::{DailyDrawGate, DailyDrawRecord, DrawSource};
pub use error::{SpreadError, SpreadResult, StorageError};
pub use interpretation::{
    FallbackReason, HttpTransport, Interpretation, InterpretationRequester,
    InterpretationTransport,
};
pub use repository::{NewSpread, SavedSpread, SpreadRepository};
pub use session::{Advance, SpreadSession, Stage};
pub use storage::{BlobStore, FileStore, MemoryStore};
