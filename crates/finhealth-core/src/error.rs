use thiserror::Error;

#[derive(Debug, Error)]
pub enum FinHealthError {
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for FinHealthError {
    fn from(e: serde_json::Error) -> Self {
        FinHealthError::Serialization(e.to_string())
    }
}
