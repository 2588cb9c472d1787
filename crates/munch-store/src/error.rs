use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("core error: {0}")]
    Core(#[from] munch_core::CoreError),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("decision not found: {0}")]
    DecisionNotFound(String),

    #[error("ambiguous decision prefix '{prefix}': matches {count} decisions")]
    AmbiguousPrefix { prefix: String, count: usize },

    #[error("collection not found: {0}")]
    CollectionNotFound(String),

    /// A conditional write found the record in a different state.
    #[error("precondition failed: {0}")]
    PreconditionFailed(String),

    #[error("record integrity error: expected {expected}, found {actual}")]
    IntegrityError { expected: String, actual: String },

    #[error("lock file conflict: {0}")]
    LockConflict(String),

    #[error("repository not found (searched upward from {0})")]
    RepositoryNotFound(String),

    #[error("repository already exists at {0}")]
    RepositoryExists(String),

    #[error("invalid {kind} name '{name}': {reason}")]
    InvalidName {
        kind: &'static str,
        name: String,
        reason: String,
    },
}
