pub mod admin;
pub mod auth;
pub mod feedback;

pub use admin::{AdminGateway, HttpAdminGateway};
pub use auth::{AuthGateway, HttpAuthGateway};
pub use feedback::{AutoConfirm, ConfirmPrompt, Confirmation, LogNotifier, Notice, NoticeLevel, Notifier};
