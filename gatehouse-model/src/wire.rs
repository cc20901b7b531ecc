//! JSON request and response bodies exchanged with the server

use serde::{Deserialize, Serialize};

use crate::bulk::BulkAction;
use crate::forms::{PasswordChange, ProfileUpdate, SignupForm};
use crate::role::Role;
use crate::user::UserId;

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignupRequest<'a> {
    pub full_name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

impl<'a> From<&'a SignupForm> for SignupRequest<'a> {
    fn from(form: &'a SignupForm) -> Self {
        Self {
            full_name: form.full_name.trim(),
            email: form.email.trim(),
            password: form.password.expose_secret(),
        }
    }
}

/// Issued by both login and signup
#[derive(Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub message: Option<String>,
}

impl std::fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenResponse")
            .field("access_token", &"[REDACTED]")
            .field("message", &self.message)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateProfileRequest<'a> {
    pub full_name: &'a str,
    pub email: &'a str,
}

impl<'a> From<&'a ProfileUpdate> for UpdateProfileRequest<'a> {
    fn from(update: &'a ProfileUpdate) -> Self {
        Self {
            full_name: update.full_name.trim(),
            email: update.email.trim(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChangePasswordRequest<'a> {
    pub current_password: &'a str,
    pub new_password: &'a str,
    pub confirm_password: &'a str,
}

impl<'a> From<&'a PasswordChange> for ChangePasswordRequest<'a> {
    fn from(change: &'a PasswordChange) -> Self {
        Self {
            current_password: change.current_password.expose_secret(),
            new_password: change.new_password.expose_secret(),
            confirm_password: change.confirm_password.expose_secret(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RoleChangeRequest {
    pub role: Role,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkStatusRequest {
    pub user_ids: Vec<UserId>,
    pub action: BulkAction,
}

/// Failure body, `{"error": "..."}`
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Success body carrying only a human message
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageBody {
    #[serde(default)]
    pub message: String,
}
