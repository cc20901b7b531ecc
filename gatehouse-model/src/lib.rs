//! Data model shared by the Gatehouse client crates.
#![allow(missing_docs)]

pub use ::chrono;

pub mod api_routes;
pub mod bulk;
pub mod email;
pub mod forms;
pub mod query;
pub mod role;
pub mod secret;
pub mod user;
pub mod wire;

pub use bulk::BulkAction;
pub use email::{Email, EmailError};
pub use forms::{FormError, PasswordChange, PasswordStrength, ProfileUpdate, SignupForm};
pub use query::{
    DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, MIN_PAGE_SIZE, PAGE_SIZE_CHOICES, PageResult, UserFilter,
    UserQuery,
};
pub use role::{Role, UserStatus};
pub use secret::{CredentialToken, SecretString};
pub use user::{User, UserId};
