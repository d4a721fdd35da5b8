use thiserror::Error;

// ---------------------------------------------------------------------------
// PersistencyError
// ---------------------------------------------------------------------------

/// Errors raised by persistence adapters.
#[derive(Debug, Error)]
pub enum PersistencyError {
    #[error("failed to encode record for key \"{key}\"")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to decode record at key \"{key}\"")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("persistence medium error: {message}")]
    Medium {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl PersistencyError {
    /// A medium failure with a plain message and no underlying cause.
    pub fn medium(message: impl Into<String>) -> Self {
        PersistencyError::Medium {
            message: message.into(),
            source: None,
        }
    }
}

// ---------------------------------------------------------------------------
// StoreError — top-level rollup
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Persistency(#[from] PersistencyError),
}

/// Convenience alias — the default error type is `StoreError`.
pub type Result<T, E = StoreError> = std::result::Result<T, E>;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
