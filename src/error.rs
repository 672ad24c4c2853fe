use thiserror::Error;

/// Every recoverable failure a service operation can report. Handlers turn
/// these into human-readable text in the response envelope; none of them
/// crash the process, and a failed operation never mutates the store.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("no such user")]
    UnknownUser,
    #[error("username already taken")]
    DuplicateUsername,
    #[error("wrong username or password")]
    InvalidCredentials,
    #[error("permission denied")]
    PermissionDenied,
    #[error("not found")]
    NotFound,
    #[error("invalid status transition")]
    InvalidTransition,
    #[error("time slot already taken")]
    SlotTaken,
    #[error("malformed input: {0}")]
    MalformedInput(String),
    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),
    #[error("database connection error: {0}")]
    Pool(#[from] r2d2::Error),
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<actix_web::error::BlockingError> for ServiceError {
    fn from(err: actix_web::error::BlockingError) -> Self {
        ServiceError::Internal(err.to_string())
    }
}
