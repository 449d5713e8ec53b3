use std::error::Error;
use thiserror::Error;

/// Result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Error raised by document stores regardless of the underlying database.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend could not complete the request.
    #[error("storage unavailable: {message}")]
    Unavailable {
        /// Human readable description of the failed request.
        message: String,
        /// Backend failure.
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    /// A document with the same `_id` already exists.
    #[error("duplicate `_id` `{id}` in collection `{collection}`")]
    DuplicateKey {
        /// Collection the insert targeted.
        collection: String,
        /// Conflicting identifier.
        id: String,
    },
    /// The document carries no textual `_id`.
    #[error("document for collection `{collection}` has no textual `_id`")]
    MissingId {
        /// Collection the write targeted.
        collection: String,
    },
    /// An atomic field update targeted a field of the wrong type.
    #[error("cannot update field `{field}`: {reason}")]
    InvalidUpdate {
        /// Name of the targeted field.
        field: String,
        /// Why the update was rejected.
        reason: String,
    },
}

impl StorageError {
    /// Construct an unavailable error from any backend failure.
    pub fn unavailable(message: String, source: impl Error + Send + Sync + 'static) -> Self {
        StorageError::Unavailable {
            message,
            source: Box::new(source),
        }
    }

    /// Construct an invalid-update error for `field`.
    pub fn invalid_update(field: impl Into<String>, reason: impl Into<String>) -> Self {
        StorageError::InvalidUpdate {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
