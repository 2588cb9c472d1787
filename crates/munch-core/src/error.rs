use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid decision id: {0}")]
    InvalidDecisionId(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
