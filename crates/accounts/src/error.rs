//! Accounts Error Types

use kernel::error::app_error::AppError;
use kernel::error::kind::ErrorKind;
use platform::postgrest::BackendError;
use thiserror::Error;

/// Accounts-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Accounts-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// The email is already bound to a profile
    #[error("a user with this email already exists")]
    DuplicateEmail,

    /// Wrong username, email or password (provider detail discarded)
    #[error("invalid username or password")]
    InvalidCredentials,

    /// Authenticated identity has no profile row
    #[error("user not found")]
    UserNotFound,

    /// Identity provider rejected a call; carries the provider's message
    #[error("identity provider error: {0}")]
    Provider(String),

    /// Relational backend fault
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// Local session slot could not be read or written
    #[error("session store error: {0}")]
    Session(String),

    /// Input failed validation
    #[error(transparent)]
    Invalid(#[from] AppError),
}

impl AuthError {
    /// Classification of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::DuplicateEmail => ErrorKind::Conflict,
            AuthError::InvalidCredentials => ErrorKind::Unauthorized,
            AuthError::UserNotFound => ErrorKind::NotFound,
            AuthError::Provider(_) => ErrorKind::UnprocessableEntity,
            AuthError::Backend(BackendError::NotFound) => ErrorKind::NotFound,
            AuthError::Backend(_) | AuthError::Session(_) => ErrorKind::InternalServerError,
            AuthError::Invalid(err) => err.kind(),
        }
    }
}
