use crate::tables::{POST_LIKES, POSTS, PROFILES};
use crate::{
    AuthApi, ChangeFilter, ChangeKind, FaultOp, GatewayCall, GatewayError, MemoryGateway, Query,
    SessionEventKind, TableApi,
};

use googletest::assert_that;
use googletest::prelude::{anything, contains_substring, eq, err, len, none, ok, some};
use ld_core::{Credentials, SignUpMetadata};
use serde_json::json;

// =========================================================================
// Auth
// =========================================================================

#[tokio::test]
async fn given_known_account_when_sign_in_then_session_and_event() {
    // Given
    let gateway = MemoryGateway::new();
    let identity = gateway.add_account("awa@district.ci", "secret1", Some("Awa")).await;
    let mut events = gateway.on_session_changed();

    // When
    let session = gateway
        .sign_in_with_password(&Credentials::new("awa@district.ci", "secret1"))
        .await
        .unwrap();

    // Then
    assert_that!(session.user.id, eq(&identity.id));
    let event = events.recv().await.unwrap();
    assert_that!(event.kind, eq(SessionEventKind::SignedIn));
    assert_eq!(event.session, Some(session));
}

#[tokio::test]
async fn given_wrong_password_when_sign_in_then_auth_error() {
    // Given
    let gateway = MemoryGateway::new();
    gateway.add_account("awa@district.ci", "secret1", None).await;

    // When
    let result = gateway
        .sign_in_with_password(&Credentials::new("awa@district.ci", "nope"))
        .await;

    // Then
    assert!(matches!(result, Err(GatewayError::Auth { .. })));
    assert_that!(gateway.current_session().await, none());
}

#[tokio::test]
async fn given_sign_up_when_autoconfirm_then_profile_row_and_session() {
    // Given
    let gateway = MemoryGateway::new();
    let metadata = SignUpMetadata {
        full_name: Some(String::from("Yao Kouassi")),
    };

    // When
    let outcome = gateway
        .sign_up(&Credentials::new("yao@district.ci", "secret1"), &metadata)
        .await
        .unwrap();

    // Then
    assert_that!(outcome.session, some(anything()));
    let profiles = gateway.rows(PROFILES).await;
    assert_that!(profiles, len(eq(1)));
    assert_eq!(profiles[0]["id"], json!(outcome.identity.id));
    assert_eq!(profiles[0]["full_name"], json!("Yao Kouassi"));
}

#[tokio::test]
async fn given_confirmation_required_when_sign_up_then_no_session() {
    // Given
    let gateway = MemoryGateway::without_autoconfirm();

    // When
    let outcome = gateway
        .sign_up(
            &Credentials::new("yao@district.ci", "secret1"),
            &SignUpMetadata::default(),
        )
        .await
        .unwrap();

    // Then
    assert_that!(outcome.session, none());
    assert_that!(gateway.current_session().await, none());
}

#[tokio::test]
async fn given_existing_email_when_sign_up_then_auth_error() {
    // Given
    let gateway = MemoryGateway::new();
    gateway.add_account("yao@district.ci", "secret1", None).await;

    // When
    let result = gateway
        .sign_up(
            &Credentials::new("Yao@District.ci", "secret2"),
            &SignUpMetadata::default(),
        )
        .await;

    // Then
    let message = result.unwrap_err().user_message();
    assert_that!(message, contains_substring("already registered"));
}

#[tokio::test]
async fn given_signed_in_when_refresh_then_new_token_same_identity() {
    // Given
    let gateway = MemoryGateway::new();
    gateway.add_account("awa@district.ci", "secret1", None).await;
    let first = gateway
        .sign_in_with_password(&Credentials::new("awa@district.ci", "secret1"))
        .await
        .unwrap();

    // When
    let refreshed = gateway.refresh_session().await.unwrap();

    // Then
    assert_that!(refreshed.user.id, eq(&first.user.id));
    assert!(refreshed.access_token != first.access_token);
}

#[tokio::test]
async fn given_injected_fault_when_sign_out_then_error_and_session_kept() {
    // Given
    let gateway = MemoryGateway::new();
    gateway.add_account("awa@district.ci", "secret1", None).await;
    gateway
        .sign_in_with_password(&Credentials::new("awa@district.ci", "secret1"))
        .await
        .unwrap();
    gateway.fail(FaultOp::SignOut, "network down").await;

    // When
    let result = gateway.sign_out().await;

    // Then
    assert_that!(result, err(anything()));
    assert_that!(gateway.current_session().await, some(anything()));

    gateway.clear_faults().await;
    assert_that!(gateway.sign_out().await, ok(anything()));
    assert_that!(gateway.current_session().await, none());
}

// =========================================================================
// Tables
// =========================================================================

#[tokio::test]
async fn test_insert_fills_generated_columns() {
    let gateway = MemoryGateway::new();

    let rows = gateway
        .insert(POSTS, json!({ "author_id": "u1", "content": "Bonjour" }))
        .await
        .unwrap();

    assert_that!(rows, len(eq(1)));
    assert!(rows[0]["id"].is_string());
    assert!(rows[0]["created_at"].is_string());
}

#[tokio::test]
async fn test_insert_rejects_duplicate_like() {
    let gateway = MemoryGateway::new();
    let like = json!({ "post_id": "p1", "user_id": "u1" });
    gateway.insert(POST_LIKES, like.clone()).await.unwrap();

    let result = gateway.insert(POST_LIKES, like).await;

    assert!(matches!(result, Err(GatewayError::Api { status: 409, .. })));
    assert_that!(gateway.rows(POST_LIKES).await, len(eq(1)));
}

#[tokio::test]
async fn test_update_merges_patch_into_matching_rows() {
    let gateway = MemoryGateway::new();
    gateway
        .seed(
            PROFILES,
            vec![
                json!({ "id": "u1", "full_name": "Awa", "district": null }),
                json!({ "id": "u2", "full_name": "Yao", "district": null }),
            ],
        )
        .await;

    let updated = gateway
        .update(
            &Query::table(PROFILES).eq("id", "u1"),
            json!({ "district": "Korhogo" }),
        )
        .await
        .unwrap();

    assert_that!(updated, len(eq(1)));
    let rows = gateway.rows(PROFILES).await;
    assert_eq!(rows[0]["district"], json!("Korhogo"));
    assert_eq!(rows[1]["district"], json!(null));
}

#[tokio::test]
async fn test_delete_removes_and_echoes_rows() {
    let gateway = MemoryGateway::new();
    gateway
        .seed(POST_LIKES, vec![json!({ "post_id": "p1", "user_id": "u1" })])
        .await;
    let mut changes = gateway.subscribe(vec![ChangeFilter::table(POST_LIKES)]);

    let deleted = gateway
        .delete(&Query::table(POST_LIKES).eq("post_id", "p1").eq("user_id", "u1"))
        .await
        .unwrap();

    assert_that!(deleted, len(eq(1)));
    assert_that!(gateway.rows(POST_LIKES).await, len(eq(0)));
    let event = changes.recv().await.unwrap();
    assert_that!(event.kind, eq(ChangeKind::Delete));
}

#[tokio::test]
async fn test_select_fault_is_reported_and_recorded() {
    let gateway = MemoryGateway::new();
    gateway
        .fail(FaultOp::Select(POSTS.to_string()), "relation unavailable")
        .await;

    let result = gateway.select(&Query::table(POSTS)).await;

    assert!(matches!(result, Err(GatewayError::Injected { .. })));
    assert_that!(gateway.count_calls(&GatewayCall::select(POSTS)).await, eq(1));
}

#[tokio::test]
async fn test_subscriptions_are_counted_and_released() {
    let gateway = MemoryGateway::new();

    let changes = gateway.subscribe(vec![ChangeFilter::table(POSTS)]);
    let session = gateway.on_session_changed();
    assert_that!(gateway.change_subscriptions(), eq(1));
    assert_that!(gateway.session_subscriptions(), eq(1));

    drop(changes);
    drop(session);
    assert_that!(gateway.change_subscriptions(), eq(0));
    assert_that!(gateway.session_subscriptions(), eq(0));
}
