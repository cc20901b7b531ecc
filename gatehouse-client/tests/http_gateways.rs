//! HTTP adapters against a mocked user management server.

use std::sync::Arc;

use gatehouse_client::infrastructure::api_client::ApiClient;
use gatehouse_client::model::{
    BulkAction, CredentialToken, PasswordChange, Role, SecretString, SignupForm, UserId,
    UserQuery, UserStatus,
};
use gatehouse_client::{
    AdminGateway, AuthGateway, GatewayError, HttpAdminGateway, HttpAuthGateway,
};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn setup() -> (MockServer, Arc<ApiClient>) {
    let _ = env_logger::builder().is_test(true).try_init();
    let server = MockServer::start().await;
    let client = Arc::new(ApiClient::new(server.uri()).expect("client"));
    (server, client)
}

fn user_json(id: &str, role: &str, status: &str) -> serde_json::Value {
    json!({
        "id": id,
        "email": format!("{id}@example.com"),
        "full_name": "Test User",
        "role": role,
        "status": status,
        "last_login": "Tue, 14 May 2024 09:30:00 GMT",
    })
}

#[tokio::test]
async fn login_returns_token_and_sends_it_afterwards() {
    let (server, client) = setup().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({"email": "ada@example.com", "password": "secret123"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "jwt-abc",
            "message": "Login successful",
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/me"))
        .and(header("authorization", "Bearer jwt-abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json("u1", "admin", "active")))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = HttpAuthGateway::new(client);
    let token = gateway
        .login(" ada@example.com ", &SecretString::new("secret123"))
        .await
        .expect("login");
    assert_eq!(token.expose_secret(), "jwt-abc");

    gateway.set_token(Some(token)).await;
    let user = gateway.fetch_current_user().await.expect("current user");
    assert_eq!(user.id, UserId::new("u1"));
    assert_eq!(user.role, Role::Admin);
    assert!(user.last_login.is_some());
}

#[tokio::test]
async fn login_401_means_invalid_credentials() {
    let (server, client) = setup().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"error": "Invalid credentials"})),
        )
        .mount(&server)
        .await;

    let err = HttpAuthGateway::new(client)
        .login("ada@example.com", &SecretString::new("wrong"))
        .await
        .unwrap_err();

    assert_eq!(err, GatewayError::InvalidCredentials);
}

#[tokio::test]
async fn inactive_login_carries_server_text() {
    let (server, client) = setup().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(403).set_body_json(json!({"error": "Account is inactive"})),
        )
        .mount(&server)
        .await;

    let err = HttpAuthGateway::new(client)
        .login("ada@example.com", &SecretString::new("secret123"))
        .await
        .unwrap_err();

    assert_eq!(err, GatewayError::Forbidden("Account is inactive".into()));
}

#[tokio::test]
async fn signup_conflict_keeps_message_verbatim() {
    let (server, client) = setup().await;
    Mock::given(method("POST"))
        .and(path("/auth/signup"))
        .and(body_json(json!({
            "full_name": "Ada Lovelace",
            "email": "ada@example.com",
            "password": "secret123",
        })))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(json!({"error": "Email already exists"})),
        )
        .mount(&server)
        .await;

    let err = HttpAuthGateway::new(client)
        .signup(&SignupForm::new(" Ada Lovelace ", "ada@example.com", "secret123"))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Email already exists");
}

#[tokio::test]
async fn wrong_current_password_is_not_a_session_failure() {
    let (server, client) = setup().await;
    Mock::given(method("PUT"))
        .and(path("/users/me/password"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({"error": "Current password is incorrect"})),
        )
        .mount(&server)
        .await;

    client.set_token(Some(CredentialToken::new("jwt-abc"))).await;
    let err = HttpAuthGateway::new(client.clone())
        .change_password(&PasswordChange::new("oldpass1", "newpass1", "newpass1"))
        .await
        .unwrap_err();

    assert_eq!(err, GatewayError::InvalidCurrentPassword);
    assert!(client.has_token().await);
}

#[tokio::test]
async fn listing_sends_paging_and_filters() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/admin/users"))
        .and(query_param("page", "2"))
        .and(query_param("limit", "5"))
        .and(query_param("email", "ada"))
        .and(query_param("status", "inactive"))
        .and(query_param("role", ""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "users": [user_json("u7", "user", "inactive")],
            "total": 6,
            "current_page": 2,
            "pages": 2,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let query = UserQuery {
        page: 2,
        page_size: 5,
        email_filter: " ada ".into(),
        status_filter: Some(UserStatus::Inactive),
        role_filter: None,
    };
    let page = HttpAdminGateway::new(client)
        .list_users(&query)
        .await
        .expect("list");

    assert_eq!(page.total_count, 6);
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].role, Role::Member);
}

#[tokio::test]
async fn status_and_role_changes_hit_their_routes() {
    let (server, client) = setup().await;
    Mock::given(method("PUT"))
        .and(path("/admin/users/u2/deactivate"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"message": "User deactivated"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/admin/users/u2/role"))
        .and(body_json(json!({"role": "admin"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = HttpAdminGateway::new(client);
    gateway
        .set_status(&UserId::new("u2"), UserStatus::Inactive)
        .await
        .expect("deactivate");
    gateway
        .set_role(&UserId::new("u2"), Role::Admin)
        .await
        .expect("promote");
}

#[tokio::test]
async fn bulk_partial_failure_is_an_error() {
    let (server, client) = setup().await;
    Mock::given(method("PUT"))
        .and(path("/admin/users/bulk"))
        .and(body_json(json!({"user_ids": ["u2", "u3"], "action": "deactivate"})))
        .respond_with(
            ResponseTemplate::new(207)
                .set_body_json(json!({"error": "1 of 2 users could not be updated"})),
        )
        .mount(&server)
        .await;

    let err = HttpAdminGateway::new(client)
        .bulk_set_status(
            &[UserId::new("u2"), UserId::new("u3")],
            BulkAction::Deactivate,
        )
        .await
        .unwrap_err();

    assert_eq!(
        err,
        GatewayError::PartialFailure("1 of 2 users could not be updated".into())
    );
}

#[tokio::test]
async fn admin_routes_report_forbidden_and_missing() {
    let (server, client) = setup().await;
    Mock::given(method("PUT"))
        .and(path("/admin/users/u9/activate"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "User not found"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/admin/users"))
        .respond_with(ResponseTemplate::new(403).set_body_string("Admin privileges required"))
        .mount(&server)
        .await;

    let gateway = HttpAdminGateway::new(client);
    assert_eq!(
        gateway
            .set_status(&UserId::new("u9"), UserStatus::Active)
            .await
            .unwrap_err(),
        GatewayError::NotFound("User not found".into())
    );
    assert_eq!(
        gateway.list_users(&UserQuery::default()).await.unwrap_err(),
        GatewayError::Forbidden("Admin privileges required".into())
    );
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let client = Arc::new(ApiClient::new("http://127.0.0.1:9").expect("client"));

    let err = HttpAuthGateway::new(client)
        .fetch_current_user()
        .await
        .unwrap_err();

    assert!(err.is_transport(), "unexpected error: {err:?}");
}
