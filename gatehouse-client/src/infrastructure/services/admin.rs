use async_trait::async_trait;
use gatehouse_model::api_routes::{admin, utils};
use gatehouse_model::wire::{BulkStatusRequest, MessageBody, RoleChangeRequest};
use gatehouse_model::{BulkAction, PageResult, Role, UserId, UserQuery, UserStatus};
use std::sync::Arc;

use crate::infrastructure::api_client::ApiClient;
use crate::infrastructure::errors::GatewayResult;

/// Listing and mutation of the user population, admin only
#[async_trait]
pub trait AdminGateway: Send + Sync {
    async fn list_users(&self, query: &UserQuery) -> GatewayResult<PageResult>;
    async fn set_status(&self, id: &UserId, status: UserStatus) -> GatewayResult<()>;
    async fn set_role(&self, id: &UserId, role: Role) -> GatewayResult<()>;
    async fn bulk_set_status(
        &self,
        ids: &[UserId],
        action: BulkAction,
    ) -> GatewayResult<()>;
}

#[derive(Debug, Clone)]
pub struct HttpAdminGateway {
    client: Arc<ApiClient>,
}

impl HttpAdminGateway {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AdminGateway for HttpAdminGateway {
    async fn list_users(&self, query: &UserQuery) -> GatewayResult<PageResult> {
        self.client
            .get_with_query(admin::USERS, &query.to_query_pairs())
            .await
    }

    async fn set_status(&self, id: &UserId, status: UserStatus) -> GatewayResult<()> {
        let route = match status {
            UserStatus::Active => admin::USER_ACTIVATE,
            UserStatus::Inactive => admin::USER_DEACTIVATE,
        };
        let path = utils::replace_param(route, "{id}", id);
        let _: MessageBody = self.client.put_empty(&path).await?;
        Ok(())
    }

    async fn set_role(&self, id: &UserId, role: Role) -> GatewayResult<()> {
        let path = utils::replace_param(admin::USER_ROLE, "{id}", id);
        let _: MessageBody = self.client.put(&path, &RoleChangeRequest { role }).await?;
        Ok(())
    }

    async fn bulk_set_status(
        &self,
        ids: &[UserId],
        action: BulkAction,
    ) -> GatewayResult<()> {
        let request = BulkStatusRequest {
            user_ids: ids.to_vec(),
            action,
        };
        let _: MessageBody = self.client.put(admin::USERS_BULK, &request).await?;
        Ok(())
    }
}
