use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::role::{Role, UserStatus};

/// Shown when a user has no usable full name
pub const UNNAMED_USER: &str = "Unnamed User";

/// Opaque server-assigned user identifier
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for UserId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Client-side copy of a server user record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub status: UserStatus,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub last_login: Option<DateTime<Utc>>,
}

impl User {
    pub fn new(
        id: impl Into<UserId>,
        email: impl Into<String>,
        role: Role,
        status: UserStatus,
    ) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            full_name: None,
            role,
            status,
            last_login: None,
        }
    }

    pub fn with_full_name(mut self, full_name: impl Into<String>) -> Self {
        self.full_name = Some(full_name.into());
        self
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }

    /// Trimmed full name, or [`UNNAMED_USER`] when absent or blank
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(UNNAMED_USER)
    }

    /// Avatar initial: full name first, then email, then `?`
    pub fn initial(&self) -> char {
        let from_name = self
            .full_name
            .as_deref()
            .and_then(|name| name.trim().chars().next());
        let from_email = || self.email.trim().chars().next();

        from_name
            .or_else(from_email)
            .map(|c| c.to_uppercase().next().unwrap_or(c))
            .unwrap_or('?')
    }
}

// The server renders timestamps either as RFC 3339 or as HTTP dates
// ("Tue, 14 Jan 2025 09:30:00 GMT"). Unparseable values read as absent.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|value| {
        DateTime::parse_from_rfc3339(&value)
            .or_else(|_| DateTime::parse_from_rfc2822(&value))
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
    }))
}
