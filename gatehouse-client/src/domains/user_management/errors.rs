use thiserror::Error;

use crate::infrastructure::errors::GatewayError;

/// Error returned by [`UserCollectionController`](super::UserCollectionController)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdminError {
    /// Bulk action requested with nothing selected
    #[error("No users selected")]
    EmptySelection,

    /// An admin tried to deactivate their own account
    #[error("You cannot deactivate yourself")]
    SelfActionForbidden,

    #[error("Not authenticated")]
    NotAuthenticated,

    /// The confirmation prompt was declined
    #[error("Action cancelled")]
    Cancelled,

    #[error("Failed to load users: {0}")]
    ListFailed(GatewayError),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    PartialFailure(String),

    #[error("{0}")]
    Gateway(GatewayError),
}

impl AdminError {
    /// Raised before any request is sent
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            AdminError::EmptySelection
                | AdminError::SelfActionForbidden
                | AdminError::NotAuthenticated
                | AdminError::Cancelled
        )
    }
}

impl From<GatewayError> for AdminError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Forbidden(message) => AdminError::Forbidden(message),
            GatewayError::NotFound(message) => AdminError::NotFound(message),
            GatewayError::PartialFailure(message) => AdminError::PartialFailure(message),
            other => AdminError::Gateway(other),
        }
    }
}

pub type AdminResult<T> = Result<T, AdminError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_errors_are_told_apart_from_server_ones() {
        assert!(AdminError::EmptySelection.is_local());
        assert!(AdminError::Cancelled.is_local());

        let err = AdminError::from(GatewayError::PartialFailure("2 of 5 failed".into()));
        assert!(!err.is_local());
        assert_eq!(err.to_string(), "2 of 5 failed");
    }

    #[test]
    fn list_failure_names_the_cause() {
        let err = AdminError::ListFailed(GatewayError::Network("timed out".into()));
        assert_eq!(err.to_string(), "Failed to load users: Network error: timed out");
    }
}
