use anyhow::Context;
use gatehouse_model::CredentialToken;
use gatehouse_model::wire::ErrorBody;
use log::{debug, info, warn};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::infrastructure::errors::{GatewayError, GatewayResult};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// API client with bearer authentication support
///
/// Cloning is cheap; clones share the HTTP connection pool and the token
/// slot, so the auth and admin adapters see the same credential.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token_store: Arc<RwLock<Option<CredentialToken>>>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field(
                "has_token",
                &self
                    .token_store
                    .try_read()
                    .map(|t| t.is_some())
                    .unwrap_or(false),
            )
            .finish()
    }
}

impl ApiClient {
    /// Create a new API client with the default request timeout
    pub fn new(base_url: impl Into<String>) -> anyhow::Result<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        url::Url::parse(&base_url)
            .with_context(|| format!("Invalid server URL: {}", base_url))?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        info!(
            "[ApiClient] Creating new API client with base URL: {}",
            base_url
        );

        Ok(Self {
            client,
            base_url,
            token_store: Arc::new(RwLock::new(None)),
        })
    }

    /// Join a route onto the base URL
    pub fn build_url(&self, path: impl AsRef<str>) -> String {
        let p = path.as_ref();
        if p.starts_with("http://") || p.starts_with("https://") {
            return p.to_string();
        }
        format!("{}/{}", self.base_url, p.trim_start_matches('/'))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Set or clear the bearer token used for subsequent requests
    pub async fn set_token(&self, token: Option<CredentialToken>) {
        *self.token_store.write().await = token;
    }

    pub async fn has_token(&self) -> bool {
        self.token_store.read().await.is_some()
    }

    /// Build a request with authentication headers
    pub async fn build_request(&self, builder: RequestBuilder) -> RequestBuilder {
        if let Some(token) = self.token_store.read().await.as_ref() {
            builder.bearer_auth(token.expose_secret())
        } else {
            builder
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> GatewayResult<T> {
        let url = self.build_url(path);
        debug!("[ApiClient] GET {}", url);
        let request = self.build_request(self.client.get(&url)).await;
        self.execute_request(request).await
    }

    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> GatewayResult<T> {
        let url = self.build_url(path);
        debug!("[ApiClient] GET {} ({} params)", url, query.len());
        let request = self.build_request(self.client.get(&url).query(query)).await;
        self.execute_request(request).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> GatewayResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.build_url(path);
        debug!("[ApiClient] POST {}", url);
        let request = self.build_request(self.client.post(&url).json(body)).await;
        self.execute_request(request).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> GatewayResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.build_url(path);
        debug!("[ApiClient] PUT {}", url);
        let request = self.build_request(self.client.put(&url).json(body)).await;
        self.execute_request(request).await
    }

    /// PUT without a request body
    pub async fn put_empty<T: DeserializeOwned>(&self, path: &str) -> GatewayResult<T> {
        let url = self.build_url(path);
        debug!("[ApiClient] PUT {}", url);
        let request = self.build_request(self.client.put(&url)).await;
        self.execute_request(request).await
    }

    /// Execute a request and map the response status onto [`GatewayError`]
    async fn execute_request<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> GatewayResult<T> {
        let response = request.send().await?;
        let status = response.status();

        // 207 is a 2xx code, but for bulk updates it means some rows failed
        if status == StatusCode::MULTI_STATUS {
            let message = error_message(response).await;
            warn!("[ApiClient] Partial failure: {}", message);
            return Err(GatewayError::PartialFailure(message));
        }

        if status.is_success() {
            let bytes = response.bytes().await?;
            let body: &[u8] = if bytes.is_empty() { b"{}" } else { &bytes };
            return serde_json::from_slice(body).map_err(GatewayError::from);
        }

        let message = error_message(response).await;
        let error = match status {
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                GatewayError::Validation(message)
            }
            StatusCode::UNAUTHORIZED => GatewayError::Unauthorized,
            StatusCode::FORBIDDEN => GatewayError::Forbidden(message),
            StatusCode::NOT_FOUND => GatewayError::NotFound(message),
            StatusCode::CONFLICT => GatewayError::Conflict(message),
            other => GatewayError::Http {
                status: other.as_u16(),
                message,
            },
        };
        warn!("[ApiClient] Request failed with status {}: {}", status, error);
        Err(error)
    }
}

/// Pull the server's `{"error": ...}` text out of a failed response
async fn error_message(response: Response) -> String {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();

    if let Ok(body) = serde_json::from_str::<ErrorBody>(&text) {
        return body.error;
    }
    if !text.trim().is_empty() {
        return text.trim().to_string();
    }
    status
        .canonical_reason()
        .unwrap_or("Unknown error")
        .to_string()
}
