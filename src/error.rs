use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Ledger access failed: {0}")]
    LedgerAccess(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AnalyticsError>;
