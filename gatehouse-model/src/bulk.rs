use serde::{Deserialize, Serialize};
use std::fmt;

use crate::role::UserStatus;

/// Status change applied to every selected user at once
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BulkAction {
    Activate,
    Deactivate,
}

impl BulkAction {
    /// Status every targeted user ends up with
    pub fn target_status(&self) -> UserStatus {
        match self {
            BulkAction::Activate => UserStatus::Active,
            BulkAction::Deactivate => UserStatus::Inactive,
        }
    }

    pub fn for_status(status: UserStatus) -> Self {
        match status {
            UserStatus::Active => BulkAction::Activate,
            UserStatus::Inactive => BulkAction::Deactivate,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BulkAction::Activate => "activate",
            BulkAction::Deactivate => "deactivate",
        }
    }
}

impl fmt::Display for BulkAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
