use anyhow::Context;
use gatehouse_model::query::clamp_page_size;
use gatehouse_model::DEFAULT_PAGE_SIZE;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use crate::domains::auth::{CredentialStore, FileCredentialStore, SessionController};
use crate::domains::user_management::UserCollectionController;
use crate::infrastructure::api_client::{ApiClient, DEFAULT_TIMEOUT};
use crate::infrastructure::services::{
    AutoConfirm, Confirmation, HttpAdminGateway, HttpAuthGateway, LogNotifier, Notifier,
};

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";

#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub server_url: Arc<str>,
    /// Where the token is kept; the platform data directory when unset
    pub credential_path: Option<PathBuf>,
    pub default_page_size: u32,
    pub request_timeout: Duration,
}

impl ClientConfig {
    pub fn new(server_url: impl Into<String>) -> Self {
        let server_url: String = server_url.into();
        Self {
            server_url: Arc::from(server_url),
            credential_path: None,
            default_page_size: DEFAULT_PAGE_SIZE,
            request_timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn from_environment() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source; `from_environment` reads the process
    /// environment
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let server_url = lookup("GATEHOUSE_SERVER_URL")
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());

        let credential_path = lookup("GATEHOUSE_CREDENTIAL_PATH")
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);

        let page_size = parse_or(&lookup, "GATEHOUSE_PAGE_SIZE", DEFAULT_PAGE_SIZE);
        let timeout_secs = match parse_or(
            &lookup,
            "GATEHOUSE_REQUEST_TIMEOUT_SECS",
            DEFAULT_TIMEOUT.as_secs(),
        ) {
            0 => {
                log::warn!(
                    "[Config] GATEHOUSE_REQUEST_TIMEOUT_SECS must be positive, using {}",
                    DEFAULT_TIMEOUT.as_secs()
                );
                DEFAULT_TIMEOUT.as_secs()
            }
            secs => secs,
        };

        Self {
            server_url: Arc::from(server_url),
            credential_path,
            default_page_size: clamp_page_size(page_size),
            request_timeout: Duration::from_secs(timeout_secs),
        }
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    pub fn with_credential_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.credential_path = Some(path.into());
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.default_page_size = clamp_page_size(page_size);
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SERVER_URL)
    }
}

fn parse_or<T: FromStr + Copy + std::fmt::Display>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: T,
) -> T {
    match lookup(name) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            log::warn!("[Config] Ignoring invalid {}={:?}, using {}", name, raw, default);
            default
        }),
        None => default,
    }
}

/// Production object graph
#[derive(Debug, Clone)]
pub struct App {
    pub api: Arc<ApiClient>,
    pub session: Arc<SessionController>,
    pub users: Arc<UserCollectionController>,
}

/// Wire the client with auto-approving confirmation and log notices
pub fn bootstrap(config: &ClientConfig) -> anyhow::Result<App> {
    bootstrap_with(config, Arc::new(AutoConfirm), Arc::new(LogNotifier))
}

/// Wire the client around UI-provided confirmation and notification
pub fn bootstrap_with(
    config: &ClientConfig,
    confirmation: Arc<dyn Confirmation>,
    notifier: Arc<dyn Notifier>,
) -> anyhow::Result<App> {
    let api = Arc::new(
        ApiClient::with_timeout(config.server_url(), config.request_timeout)
            .context("Failed to build API client")?,
    );

    let credentials: Arc<dyn CredentialStore> = match &config.credential_path {
        Some(path) => Arc::new(FileCredentialStore::with_path(path)),
        None => Arc::new(
            FileCredentialStore::new().context("Failed to locate credential storage")?,
        ),
    };

    let session = Arc::new(SessionController::new(
        Arc::new(HttpAuthGateway::new(Arc::clone(&api))),
        credentials,
    ));

    let users = Arc::new(
        UserCollectionController::new(
            Arc::new(HttpAdminGateway::new(Arc::clone(&api))),
            session.watch(),
            confirmation,
            notifier,
        )
        .with_page_size(config.default_page_size),
    );

    log::info!("[Bootstrap] Client ready for {}", config.server_url());
    Ok(App {
        api,
        session,
        users,
    })
}
