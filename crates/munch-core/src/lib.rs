//! Domain model and pure algorithms for group food decisions: fairness
//! weights, the weighted lottery draw, and ranked-choice scoring.

pub mod config;
pub mod draw;
pub mod error;
pub mod hash;
pub mod model;
pub mod serialize;
pub mod stats;
pub mod tally;
pub mod weight;

pub use config::{EngineConfig, WeightPolicy};
pub use error::CoreError;
pub use hash::DecisionId;
