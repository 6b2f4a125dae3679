use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StorageError {
    #[error("local storage is not available")]
    Unavailable,
    #[error("storage quota exceeded: {0}")]
    QuotaExceeded(String),
    #[error("storage call failed: {0}")]
    Js(String),
}

#[derive(Debug, Error)]
pub enum ConsentError {
    #[error("saved cookie preferences are not valid JSON: {0}")]
    MalformedSnapshot(#[from] serde_json::Error),
    #[error("saved cookie preferences have the wrong shape: {0}")]
    InvalidShape(String),
    #[error("failed to write {key}: {source}")]
    Storage {
        key: String,
        #[source]
        source: StorageError,
    },
}

impl ConsentError {
    pub fn is_malformed_snapshot(&self) -> bool {
        matches!(self, ConsentError::MalformedSnapshot(_) | ConsentError::InvalidShape(_))
    }
}
