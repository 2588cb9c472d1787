//! The decision engine.
//!
//! Resolves "where do we eat" for one person through a fairness-weighted
//! lottery, or for a group through ranked-choice ballots, on top of any
//! [`munch_store::DecisionStore`].

mod ballot;
pub mod clock;
mod engine;
pub mod error;
pub mod events;
mod lifecycle;
pub mod random;
mod solo;
mod stats;
mod tally;

#[cfg(test)]
mod tests;

pub use ballot::VoteReceipt;
pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::DecisionEngine;
pub use error::{EngineError, ErrorClass};
pub use events::{DecisionEvent, DecisionEvents, EventError, NoopEvents, RecordingEvents};
pub use random::{RandomSource, SeededRandom, ThreadRandom};
