//! Authentication error types

use gatehouse_model::FormError;
use thiserror::Error;

use crate::infrastructure::errors::GatewayError;

/// Error returned by [`SessionController`](super::SessionController) operations
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Server-side validation rejected the input
    #[error("{0}")]
    Validation(String),

    /// Email already taken
    #[error("{0}")]
    Conflict(String),

    /// Token rejected; the session has been torn down
    #[error("Session expired - please login again")]
    Unauthorized,

    /// e.g. an inactive account trying to log in
    #[error("{0}")]
    Forbidden(String),

    #[error("Current password is incorrect")]
    InvalidCurrentPassword,

    #[error("Not authenticated")]
    NotAuthenticated,

    /// Rejected locally, nothing was sent
    #[error("{0}")]
    Form(#[from] FormError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("{0}")]
    Gateway(GatewayError),
}

/// Credential store failures
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to initialize storage: {0}")]
    InitFailed(String),

    #[error("Failed to read from storage")]
    ReadFailed(#[source] std::io::Error),

    #[error("Failed to write to storage")]
    WriteFailed(#[source] std::io::Error),
}

pub type AuthResult<T> = Result<T, AuthError>;

impl From<GatewayError> for AuthError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::InvalidCredentials => AuthError::InvalidCredentials,
            GatewayError::Validation(message) => AuthError::Validation(message),
            GatewayError::Conflict(message) => AuthError::Conflict(message),
            GatewayError::Unauthorized => AuthError::Unauthorized,
            GatewayError::Forbidden(message) => AuthError::Forbidden(message),
            GatewayError::InvalidCurrentPassword => AuthError::InvalidCurrentPassword,
            other => AuthError::Gateway(other),
        }
    }
}
