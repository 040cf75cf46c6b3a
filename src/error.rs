//! Application-wide error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("list already exists: {0}")]
    ListAlreadyExists(String),

    #[error("list does not exist: {0}")]
    ListNotFound(String),

    #[error("stored value under '{key}' is not a list collection: {source}")]
    StorageParse {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("storage error: {0}")]
    Storage(String),

    #[error("unknown action: {0}")]
    UnknownAction(String),

    #[error("action '{action}' requires attribute '{attribute}'")]
    MissingAttribute { action: String, attribute: String },

    #[error("catalog error: {0}")]
    Catalog(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("logger error: {0}")]
    Logger(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Errors the user caused by naming a list; the controller reports these
    /// instead of failing the action.
    pub fn is_user_facing(&self) -> bool {
        matches!(self, AppError::ListAlreadyExists(_) | AppError::ListNotFound(_))
    }
}
