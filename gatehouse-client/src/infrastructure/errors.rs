//! Errors reported by the gateway collaborators
//!
//! Server-reported messages (the `{"error": ...}` body) are carried verbatim
//! so callers can show them as-is.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Unauthorized - please login again")]
    Unauthorized,

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    PartialFailure(String),

    #[error("Current password is incorrect")]
    InvalidCurrentPassword,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Request failed with status {status}: {message}")]
    Http { status: u16, message: String },
}

impl GatewayError {
    /// Session-ending failures; the token is no longer accepted
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, GatewayError::Unauthorized)
    }

    /// Transport-level faults where the server never answered
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            GatewayError::Network(_) | GatewayError::InvalidResponse(_)
        )
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            GatewayError::InvalidResponse(err.to_string())
        } else {
            GatewayError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        GatewayError::InvalidResponse(err.to_string())
    }
}
