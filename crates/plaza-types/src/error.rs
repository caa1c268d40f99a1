use thiserror::Error;

/// Domain errors for chat operations.
///
/// This is the closed set the HTTP boundary translates to status codes;
/// nothing in the core signals failure any other way.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("internal error: {0}")]
    Internal(String),
}

/// Errors from repository operations (used by trait definitions in plaza-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

impl From<RepositoryError> for ChatError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound => ChatError::NotFound("entity not found".to_string()),
            RepositoryError::Conflict(msg) => ChatError::Conflict(msg),
            RepositoryError::Connection => ChatError::Internal("database connection error".to_string()),
            RepositoryError::Query(msg) => ChatError::Internal(format!("query error: {msg}")),
        }
    }
}
