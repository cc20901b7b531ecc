//! Admin listing query and paged results

use serde::{Deserialize, Serialize};

use crate::role::{Role, UserStatus};
use crate::user::User;

pub const MIN_PAGE_SIZE: u32 = 1;
pub const MAX_PAGE_SIZE: u32 = 100;
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Page sizes offered to an admin
pub const PAGE_SIZE_CHOICES: [u32; 4] = [5, 10, 20, 50];

/// One filterable field of [`UserQuery`] together with its new value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserFilter {
    Email(String),
    Status(Option<UserStatus>),
    Role(Option<Role>),
}

/// Filters and paging for the admin user listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserQuery {
    /// 1-based page number
    pub page: u32,
    pub page_size: u32,
    pub email_filter: String,
    pub status_filter: Option<UserStatus>,
    pub role_filter: Option<Role>,
}

impl Default for UserQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            email_filter: String::new(),
            status_filter: None,
            role_filter: None,
        }
    }
}

impl UserQuery {
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = clamp_page_size(page_size);
        self
    }

    pub fn apply_filter(&mut self, filter: UserFilter) {
        match filter {
            UserFilter::Email(email) => self.email_filter = email,
            UserFilter::Status(status) => self.status_filter = status,
            UserFilter::Role(role) => self.role_filter = role,
        }
    }

    /// Request parameters for the listing endpoint.
    ///
    /// Unset filters go out as empty strings; the server treats those as
    /// "match everything".
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("page", self.page.to_string()),
            ("limit", self.page_size.to_string()),
            ("email", self.email_filter.trim().to_string()),
            (
                "status",
                self.status_filter
                    .map(|s| s.as_str().to_string())
                    .unwrap_or_default(),
            ),
            (
                "role",
                self.role_filter
                    .map(|r| r.as_str().to_string())
                    .unwrap_or_default(),
            ),
        ]
    }
}

pub fn clamp_page_size(page_size: u32) -> u32 {
    page_size.clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE)
}

/// Number of pages needed to show `total_count` items
pub fn total_pages(total_count: u64, page_size: u32) -> u64 {
    let page_size = u64::from(page_size.max(MIN_PAGE_SIZE));
    total_count.div_ceil(page_size)
}

/// One page of users plus the server's total match count
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResult {
    #[serde(rename = "users")]
    pub items: Vec<User>,
    #[serde(rename = "total")]
    pub total_count: u64,
}

impl PageResult {
    pub fn new(items: Vec<User>, total_count: u64) -> Self {
        Self { items, total_count }
    }

    pub fn total_pages(&self, page_size: u32) -> u64 {
        total_pages(self.total_count, page_size)
    }
}
