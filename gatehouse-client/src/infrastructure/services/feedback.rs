//! Confirmation and notification collaborators
//!
//! The controllers ask before destructive changes and report outcomes, but
//! never render anything themselves. A UI supplies implementations that show
//! a dialog or a toast.

use async_trait::async_trait;
use gatehouse_model::{BulkAction, Role, UserId, UserStatus};
use log::{info, warn};

/// What the user is being asked to approve
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmPrompt {
    SetStatus { user_id: UserId, target: UserStatus },
    SetRole { user_id: UserId, target: Role },
    Bulk { action: BulkAction, count: usize },
}

impl ConfirmPrompt {
    pub fn message(&self) -> String {
        match self {
            ConfirmPrompt::SetStatus { target, .. } => format!(
                "Are you sure you want to {} this user?",
                BulkAction::for_status(*target)
            ),
            ConfirmPrompt::SetRole { target, .. } => {
                format!("Change role to {}?", target)
            }
            ConfirmPrompt::Bulk { action, count } => {
                format!("Apply {} to {} users?", action, count)
            }
        }
    }
}

/// Yes/no approval, answered asynchronously
#[async_trait]
pub trait Confirmation: Send + Sync {
    async fn confirm(&self, prompt: &ConfirmPrompt) -> bool;
}

/// Approves everything; for headless use where the caller already asked
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoConfirm;

#[async_trait]
impl Confirmation for AutoConfirm {
    async fn confirm(&self, prompt: &ConfirmPrompt) -> bool {
        info!("[Confirmation] Auto-approved: {}", prompt.message());
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// Outcome message meant for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Routes notices to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Success => info!("[Notice] {}", notice.message),
            NoticeLevel::Error => warn!("[Notice] {}", notice.message),
        }
    }
}
