use std::sync::Arc;

use gatehouse_client::infrastructure::testing::{
    AdminCall, RecordingNotifier, ScriptedConfirmation, StubAdminGateway, population,
};
use gatehouse_client::model::{
    BulkAction, CredentialToken, Role, User, UserFilter, UserId, UserStatus,
};
use gatehouse_client::domains::auth::SessionStore;
use gatehouse_client::{
    AdminError, ConfirmPrompt, FetchOutcome, GatewayError, Session, UserCollectionController,
};

struct Harness {
    gateway: StubAdminGateway,
    confirmation: Arc<ScriptedConfirmation>,
    notifier: Arc<RecordingNotifier>,
    // Keeps the session sender alive for the controller's watch
    _session: SessionStore,
    controller: UserCollectionController,
}

fn signed_in_as(id: &str, users: Vec<User>, confirmation: ScriptedConfirmation) -> Harness {
    let me = users
        .iter()
        .find(|u| u.id.as_str() == id)
        .cloned()
        .expect("signed-in user is part of the population");
    let session = SessionStore::new(Session::Authenticated {
        user: me,
        token: CredentialToken::new("t"),
    });

    let gateway = StubAdminGateway::new(users);
    let confirmation = Arc::new(confirmation);
    let notifier = Arc::new(RecordingNotifier::new());
    let controller = UserCollectionController::new(
        Arc::new(gateway.clone()),
        session.watch(),
        confirmation.clone(),
        notifier.clone(),
    );

    Harness {
        gateway,
        confirmation,
        notifier,
        _session: session,
        controller,
    }
}

fn harness(count: usize) -> Harness {
    signed_in_as("u1", population(count), ScriptedConfirmation::approving())
}

#[tokio::test]
async fn page_is_clamped_to_known_range() {
    let h = harness(23);
    h.controller.set_page_size(10);

    let outcome = h.controller.fetch().await.expect("fetch");

    assert_eq!(outcome, FetchOutcome::Applied { total_count: 23 });
    assert_eq!(h.controller.total_pages(), 3);
    assert_eq!(h.controller.set_page(5), 3);
    assert_eq!(h.controller.set_page(0), 1);

    h.controller.set_page(3);
    h.controller.fetch().await.expect("fetch last page");
    assert_eq!(h.controller.items().len(), 3);
}

#[tokio::test]
async fn page_size_change_returns_to_first_page() {
    let h = harness(23);
    h.controller.fetch().await.expect("fetch");
    h.controller.set_page(2);

    assert_eq!(h.controller.set_page_size(500), 100);
    assert_eq!(h.controller.query().page, 1);
    assert_eq!(h.controller.set_page_size(0), 1);
}

#[tokio::test]
async fn set_page_before_any_fetch_stays_on_first_page() {
    let h = harness(23);
    assert_eq!(h.controller.set_page(4), 1);
}

#[tokio::test]
async fn filters_are_sent_with_the_query() {
    let h = harness(12);
    h.controller.set_filter(UserFilter::Status(Some(UserStatus::Inactive)));
    h.controller.set_filter(UserFilter::Role(Some(Role::Member)));

    h.controller.fetch().await.expect("fetch");

    // u3, u6, u9, u12
    assert_eq!(h.controller.total_count(), 4);
    assert!(h.controller.items().iter().all(|u| !u.is_active()));
    let Some(AdminCall::ListUsers(query)) = h.gateway.calls().pop() else {
        panic!("expected a list call");
    };
    assert_eq!(query.status_filter, Some(UserStatus::Inactive));
    assert_eq!(query.role_filter, Some(Role::Member));
}

#[tokio::test]
async fn counts_cover_the_loaded_page_only() {
    let h = harness(23);
    h.controller.set_page_size(5);
    h.controller.fetch().await.expect("fetch");

    // u1..u5: u1 admin, u3 inactive
    let view = h.controller.view();
    assert_eq!(view.admins_on_page, 1);
    assert_eq!(view.active_on_page, 4);
    assert_eq!(h.controller.admin_count(), 1);

    h.controller.set_page(2);
    h.controller.fetch().await.expect("fetch");
    assert_eq!(h.controller.admin_count(), 0);
}

#[tokio::test]
async fn fetch_clears_the_selection() {
    let h = harness(8);
    h.controller.fetch().await.expect("fetch");
    assert!(h.controller.toggle_select(&UserId::new("u2")));
    assert!(!h.controller.toggle_select(&UserId::new("missing")));
    assert_eq!(h.controller.selection().len(), 1);

    h.controller.fetch().await.expect("refetch");

    assert!(h.controller.selection().is_empty());
}

#[tokio::test]
async fn toggle_select_all_flips_the_whole_page() {
    let h = harness(8);
    h.controller.set_page_size(5);
    h.controller.fetch().await.expect("fetch");

    h.controller.toggle_select_all();
    assert_eq!(h.controller.selection().len(), 5);

    h.controller.toggle_select(&UserId::new("u2"));
    h.controller.toggle_select_all();
    assert_eq!(h.controller.selection().len(), 5);

    h.controller.toggle_select_all();
    assert!(h.controller.selection().is_empty());

    h.controller.select_all();
    h.controller.select_all();
    assert_eq!(h.controller.selection().len(), 5);
}

#[tokio::test]
async fn bulk_with_nothing_selected_is_refused() {
    let h = harness(5);
    h.controller.fetch().await.expect("fetch");

    let err = h
        .controller
        .apply_bulk_action(BulkAction::Activate)
        .await
        .unwrap_err();

    assert_eq!(err, AdminError::EmptySelection);
    assert_eq!(h.gateway.mutation_calls(), 0);
    assert!(h.confirmation.prompts().is_empty());
    assert_eq!(h.notifier.messages(), vec!["No users selected"]);
}

#[tokio::test]
async fn bulk_deactivate_including_self_is_refused_whole() {
    let h = harness(5);
    h.controller.fetch().await.expect("fetch");
    h.controller.toggle_select(&UserId::new("u1"));
    h.controller.toggle_select(&UserId::new("u2"));
    let before = h.controller.selection();

    let err = h
        .controller
        .apply_bulk_action(BulkAction::Deactivate)
        .await
        .unwrap_err();

    assert_eq!(err, AdminError::SelfActionForbidden);
    assert!(err.is_local());
    assert_eq!(h.gateway.mutation_calls(), 0);
    assert_eq!(h.gateway.list_calls(), 1);
    assert!(h.confirmation.prompts().is_empty());
    assert_eq!(h.controller.selection(), before);
    assert_eq!(
        h.notifier.last().map(|n| n.message),
        Some("You cannot deactivate yourself".to_string())
    );
}

#[tokio::test]
async fn reload_that_empties_the_page_moves_back_to_the_last_page() {
    let h = harness(12);
    h.controller.set_filter(UserFilter::Status(Some(UserStatus::Active)));
    h.controller.set_page_size(5);
    h.controller.fetch().await.expect("fetch");
    assert_eq!(h.controller.total_pages(), 2);

    // Active users u8, u10, u11 fill page two
    h.controller.set_page(2);
    h.controller.fetch().await.expect("fetch page two");
    h.controller.select_all();
    assert_eq!(h.controller.selection().len(), 3);

    h.controller
        .apply_bulk_action(BulkAction::Deactivate)
        .await
        .expect("bulk");

    assert_eq!(h.controller.query().page, 1);
    assert_eq!(h.controller.total_pages(), 1);
    assert_eq!(h.controller.items().len(), 5);
    assert_eq!(h.gateway.list_calls(), 4);
}

#[tokio::test]
async fn bulk_activate_may_include_self() {
    let h = harness(5);
    h.controller.fetch().await.expect("fetch");
    h.controller.toggle_select(&UserId::new("u1"));
    h.controller.toggle_select(&UserId::new("u3"));

    h.controller
        .apply_bulk_action(BulkAction::Activate)
        .await
        .expect("bulk activate");

    assert_eq!(
        h.gateway.user(&UserId::new("u3")).map(|u| u.status),
        Some(UserStatus::Active)
    );
}

#[tokio::test]
async fn bulk_deactivate_confirms_then_reloads() {
    let h = harness(6);
    h.controller.fetch().await.expect("fetch");
    for id in ["u2", "u4", "u5"] {
        h.controller.toggle_select(&UserId::new(id));
    }

    h.controller
        .apply_bulk_action(BulkAction::Deactivate)
        .await
        .expect("bulk");

    assert_eq!(
        h.confirmation.last_message().as_deref(),
        Some("Apply deactivate to 3 users?")
    );
    assert_eq!(
        h.gateway.calls()[1],
        AdminCall::BulkSetStatus(
            vec![UserId::new("u2"), UserId::new("u4"), UserId::new("u5")],
            BulkAction::Deactivate
        )
    );
    assert_eq!(h.gateway.list_calls(), 2);
    assert!(h.controller.selection().is_empty());
    assert_eq!(h.controller.active_count(), 1);
    assert_eq!(
        h.notifier.last().map(|n| n.message),
        Some("Bulk action completed".to_string())
    );
}

#[tokio::test]
async fn declined_confirmation_sends_nothing() {
    let h = signed_in_as("u1", population(5), ScriptedConfirmation::declining());
    h.controller.fetch().await.expect("fetch");
    let target = h.controller.items()[1].clone();

    let err = h
        .controller
        .set_user_status(&target, UserStatus::Inactive)
        .await
        .unwrap_err();

    assert_eq!(err, AdminError::Cancelled);
    assert_eq!(
        h.confirmation.prompts(),
        vec![ConfirmPrompt::SetStatus {
            user_id: target.id.clone(),
            target: UserStatus::Inactive,
        }]
    );
    assert_eq!(h.gateway.mutation_calls(), 0);
    assert!(h.notifier.notices().is_empty());
}

#[tokio::test]
async fn self_deactivation_never_prompts() {
    let h = harness(3);
    h.controller.fetch().await.expect("fetch");
    let me = h.controller.items()[0].clone();

    let err = h.controller.toggle_user_status(&me).await.unwrap_err();

    assert_eq!(err, AdminError::SelfActionForbidden);
    assert!(h.confirmation.prompts().is_empty());
    assert_eq!(h.gateway.mutation_calls(), 0);
}

#[tokio::test]
async fn status_change_reports_and_reloads() {
    let h = harness(5);
    h.controller.fetch().await.expect("fetch");
    let target = h.controller.items()[1].clone();

    h.controller.toggle_user_status(&target).await.expect("deactivate");

    assert_eq!(
        h.confirmation.last_message().as_deref(),
        Some("Are you sure you want to deactivate this user?")
    );
    assert_eq!(
        h.notifier.last().map(|n| n.message),
        Some("User deactivated successfully".to_string())
    );
    let reloaded = h
        .controller
        .items()
        .into_iter()
        .find(|u| u.id == target.id)
        .expect("row still listed");
    assert_eq!(reloaded.status, UserStatus::Inactive);
}

#[tokio::test]
async fn role_change_reports_and_reloads() {
    let h = harness(5);
    h.controller.fetch().await.expect("fetch");

    h.controller
        .set_user_role(&UserId::new("u2"), Role::Admin)
        .await
        .expect("promote");

    assert_eq!(
        h.confirmation.last_message().as_deref(),
        Some("Change role to Admin?")
    );
    assert_eq!(
        h.notifier.last().map(|n| n.message),
        Some("Role updated to Admin".to_string())
    );
    assert_eq!(h.controller.admin_count(), 2);
}

#[tokio::test]
async fn mutation_failure_is_reported_without_reload() {
    let h = harness(5);
    h.controller.fetch().await.expect("fetch");
    h.gateway
        .fail_next_mutation(GatewayError::Forbidden("Admin privileges required".into()));

    let err = h
        .controller
        .set_user_role(&UserId::new("u2"), Role::Admin)
        .await
        .unwrap_err();

    assert_eq!(err, AdminError::Forbidden("Admin privileges required".into()));
    assert_eq!(h.gateway.list_calls(), 1);
    assert!(h.notifier.last().is_some_and(|n| n.is_error()));
}

#[tokio::test]
async fn failed_fetch_keeps_previous_rows() {
    let h = harness(5);
    h.controller.fetch().await.expect("fetch");
    let before = h.controller.items();
    h.gateway
        .fail_next_list(GatewayError::Network("connection refused".into()));

    let err = h.controller.fetch().await.unwrap_err();

    assert!(matches!(err, AdminError::ListFailed(GatewayError::Network(_))));
    assert_eq!(h.controller.items(), before);
    assert!(!h.controller.is_loading());
    assert!(h.controller.view().last_error.is_some());
    assert_eq!(h.notifier.messages(), vec!["Failed to load users"]);
}

#[tokio::test]
async fn stale_fetch_is_discarded() {
    let h = harness(23);
    let release_first = h.gateway.hold_next_list();

    let (first, second) = tokio::join!(h.controller.fetch(), async {
        while h.gateway.list_calls() == 0 {
            tokio::task::yield_now().await;
        }
        h.controller.set_filter(UserFilter::Role(Some(Role::Admin)));
        let second = h.controller.fetch().await;
        let _ = release_first.send(());
        second
    });

    assert_eq!(first.expect("first"), FetchOutcome::Superseded);
    assert_eq!(
        second.expect("second"),
        FetchOutcome::Applied { total_count: 1 }
    );
    assert_eq!(h.controller.total_count(), 1);
    assert_eq!(h.controller.items()[0].id, UserId::new("u1"));
}

#[tokio::test]
async fn mutations_require_a_session_user() {
    let session = SessionStore::new(Session::Unauthenticated);
    let gateway = StubAdminGateway::new(population(3));
    let controller = UserCollectionController::new(
        Arc::new(gateway.clone()),
        session.watch(),
        Arc::new(ScriptedConfirmation::approving()),
        Arc::new(RecordingNotifier::new()),
    );
    controller.fetch().await.expect("fetch");
    let target = controller.items()[1].clone();

    let err = controller
        .set_user_status(&target, UserStatus::Inactive)
        .await
        .unwrap_err();

    assert_eq!(err, AdminError::NotAuthenticated);
    assert_eq!(gateway.mutation_calls(), 0);
}
