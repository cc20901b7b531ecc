//! Authentication gateway trait and its HTTP adapter

use async_trait::async_trait;
use gatehouse_model::api_routes::{auth, users};
use gatehouse_model::wire::{
    ChangePasswordRequest, LoginRequest, MessageBody, SignupRequest, TokenResponse,
    UpdateProfileRequest,
};
use gatehouse_model::{
    CredentialToken, PasswordChange, ProfileUpdate, SecretString, SignupForm, User,
};
use log::info;
use std::sync::Arc;

use crate::infrastructure::api_client::ApiClient;
use crate::infrastructure::errors::{GatewayError, GatewayResult};

/// Request/response authentication operations against the server
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Exchange an email and password for a token
    async fn login(
        &self,
        email: &str,
        password: &SecretString,
    ) -> GatewayResult<CredentialToken>;

    /// Register a new account and receive its token
    async fn signup(&self, form: &SignupForm) -> GatewayResult<CredentialToken>;

    /// Resolve the identity behind the installed token
    async fn fetch_current_user(&self) -> GatewayResult<User>;

    async fn update_profile(&self, update: &ProfileUpdate) -> GatewayResult<User>;

    async fn change_password(&self, change: &PasswordChange) -> GatewayResult<()>;

    /// Install or drop the bearer token used by every later call
    async fn set_token(&self, token: Option<CredentialToken>);
}

#[derive(Debug, Clone)]
pub struct HttpAuthGateway {
    client: Arc<ApiClient>,
}

impl HttpAuthGateway {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AuthGateway for HttpAuthGateway {
    async fn login(
        &self,
        email: &str,
        password: &SecretString,
    ) -> GatewayResult<CredentialToken> {
        let request = LoginRequest {
            email: email.trim(),
            password: password.expose_secret(),
        };
        let response: TokenResponse = self
            .client
            .post(auth::LOGIN, &request)
            .await
            .map_err(|err| match err {
                GatewayError::Unauthorized => GatewayError::InvalidCredentials,
                other => other,
            })?;

        info!("[AuthGateway] Login accepted for {}", request.email);
        Ok(CredentialToken::new(response.access_token))
    }

    async fn signup(&self, form: &SignupForm) -> GatewayResult<CredentialToken> {
        let response: TokenResponse =
            self.client.post(auth::SIGNUP, &SignupRequest::from(form)).await?;
        Ok(CredentialToken::new(response.access_token))
    }

    async fn fetch_current_user(&self) -> GatewayResult<User> {
        self.client.get(users::CURRENT).await
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> GatewayResult<User> {
        // The server answers with a message only; read the record back
        let _: MessageBody = self
            .client
            .put(users::CURRENT, &UpdateProfileRequest::from(update))
            .await?;
        self.client.get(users::CURRENT).await
    }

    async fn change_password(&self, change: &PasswordChange) -> GatewayResult<()> {
        let _: MessageBody = self
            .client
            .put(users::CHANGE_PASSWORD, &ChangePasswordRequest::from(change))
            .await
            .map_err(|err| match err {
                GatewayError::Unauthorized => GatewayError::InvalidCurrentPassword,
                other => other,
            })?;
        Ok(())
    }

    async fn set_token(&self, token: Option<CredentialToken>) {
        self.client.set_token(token).await;
    }
}
