//! Persistence for the decision engine: the store contract plus an
//! in-memory and a file-backed implementation.

pub mod adapter;
pub mod error;
pub mod lockfile;
pub mod memory;
pub mod query;
pub mod repository;

pub use adapter::{DecisionStore, HistoryQuery};
pub use error::StoreError;
pub use memory::MemoryStore;
pub use repository::{Repository, RepositoryConfig};
