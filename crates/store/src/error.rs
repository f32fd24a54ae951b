use skudesk_core::error::CoreError;

/// Errors raised by the flat-file stores.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A domain rule rejected the change; nothing was written.
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed JSON in store file: {0}")]
    Json(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;
