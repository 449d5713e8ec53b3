use thiserror::Error;
use tokio::task::JoinError;

use crate::dao::storage::StorageError;

/// Result alias for service operations.
pub type Result<T> = std::result::Result<T, GameDataError>;

/// A game model type is not set up to be persisted.
///
/// Always a programming error in the model declaration; retrying cannot help.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// The model declares no collection binding.
    #[error("game model `{model}` is missing its collection binding")]
    MissingCollection {
        /// Type name of the model.
        model: &'static str,
    },
    /// The declared collection is empty or not in the allow-list.
    #[error("game model `{model}` is bound to unsupported collection `{name}`")]
    UnsupportedCollection {
        /// Type name of the model.
        model: &'static str,
        /// Declared collection name.
        name: &'static str,
    },
}

/// Errors that can occur in service layer operations.
#[derive(Debug, Error)]
pub enum GameDataError {
    /// The model type failed collection resolution.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    /// A record or item could not be converted into a document.
    #[error("failed to serialize `{model}` into a document")]
    Serialize {
        /// Type name of the value being written.
        model: &'static str,
        /// Conversion failure.
        #[source]
        source: serde_json::Error,
    },
    /// A stored document does not match the requested type.
    #[error("failed to decode document into `{model}`")]
    Deserialize {
        /// Type name the document was decoded into.
        model: &'static str,
        /// Conversion failure.
        #[source]
        source: serde_json::Error,
    },
    /// The storage backend rejected or failed the request.
    #[error("storage request failed")]
    Storage(#[from] StorageError),
    /// A deferred operation panicked or its runtime shut down.
    #[error("deferred operation did not complete")]
    Task(#[from] JoinError),
}

impl GameDataError {
    /// Whether the error comes from a misconfigured model type.
    pub fn is_configuration(&self) -> bool {
        matches!(self, GameDataError::Configuration(_))
    }
}
