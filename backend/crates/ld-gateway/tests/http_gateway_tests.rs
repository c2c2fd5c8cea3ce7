//! Integration tests for the HTTP gateway using wiremock mock server

use ld_core::{Credentials, Identity, Session, SignUpMetadata};
use ld_gateway::{
    AuthApi, ChangeFilter, ChangeKind, GatewayError, HttpGateway, MemorySessionStorage, Query,
    SessionEventKind, SessionStorage, SortOrder, TableApi,
};

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde_json::{Value, json};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_string_contains, header, method, path, query_param},
};

const ANON_KEY: &str = "anon-key";

fn token_body(access_token: &str, user_id: &str) -> Value {
    json!({
        "access_token": access_token,
        "token_type": "bearer",
        "expires_in": 3600,
        "refresh_token": format!("{}-refresh", access_token),
        "user": { "id": user_id, "email": "awa@district.ci", "aud": "authenticated" }
    })
}

fn gateway(server: &MockServer, storage: Arc<MemorySessionStorage>) -> HttpGateway {
    HttpGateway::new(&server.uri(), ANON_KEY, Duration::from_secs(5), storage).unwrap()
}

fn stored_session(expires_at: i64) -> Session {
    let mut session = Session::new(
        "stored-token",
        Identity::new("u1", Some(String::from("awa@district.ci"))),
    );
    session.refresh_token = Some(String::from("stored-refresh"));
    session.expires_at = Some(expires_at);
    session
}

async fn mount_password_grant(server: &MockServer, access_token: &str) {
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "password"))
        .and(header("apikey", ANON_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body(access_token, "u1")))
        .mount(server)
        .await;
}

// =========================================================================
// Auth endpoints
// =========================================================================

#[tokio::test]
async fn test_sign_in_success_persists_and_announces_session() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "password"))
        .and(header("apikey", ANON_KEY))
        .and(body_string_contains("awa@district.ci"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("user-token", "u1")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let storage = Arc::new(MemorySessionStorage::new());
    let gateway = gateway(&mock_server, Arc::clone(&storage));
    let mut events = gateway.on_session_changed();

    let session = gateway
        .sign_in_with_password(&Credentials::new("awa@district.ci", "secret1"))
        .await
        .unwrap();

    assert_eq!(session.access_token, "user-token");
    assert_eq!(session.user.id, "u1");
    assert!(session.expires_at.unwrap() > Utc::now().timestamp());
    assert_eq!(storage.load().unwrap(), Some(session.clone()));

    let event = events.recv().await.unwrap();
    assert_eq!(event.kind, SessionEventKind::SignedIn);
}

#[tokio::test]
async fn test_sign_in_rejected_reports_backend_message() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Invalid login credentials"
        })))
        .mount(&mock_server)
        .await;

    let gateway = gateway(&mock_server, Arc::new(MemorySessionStorage::new()));
    let result = gateway
        .sign_in_with_password(&Credentials::new("awa@district.ci", "wrong"))
        .await;

    match result {
        Err(GatewayError::Auth { message, .. }) => {
            assert_eq!(message, "Invalid login credentials")
        }
        other => panic!("expected Auth error, got {:?}", other),
    }
    assert!(gateway.current_session().await.is_none());
}

#[tokio::test]
async fn test_sign_up_with_session_signs_in() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/signup"))
        .and(body_string_contains("\"full_name\":\"Awa Koné\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("new-token", "u9")))
        .mount(&mock_server)
        .await;

    let gateway = gateway(&mock_server, Arc::new(MemorySessionStorage::new()));
    let metadata = SignUpMetadata {
        full_name: Some(String::from("Awa Koné")),
    };
    let outcome = gateway
        .sign_up(&Credentials::new("awa@district.ci", "secret1"), &metadata)
        .await
        .unwrap();

    assert_eq!(outcome.identity.id, "u9");
    assert!(outcome.session.is_some());
    assert!(gateway.current_session().await.is_some());
}

#[tokio::test]
async fn test_sign_up_pending_confirmation_returns_identity_only() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/signup"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "u9",
            "email": "awa@district.ci",
            "confirmation_sent_at": "2024-01-01T00:00:00Z"
        })))
        .mount(&mock_server)
        .await;

    let gateway = gateway(&mock_server, Arc::new(MemorySessionStorage::new()));
    let outcome = gateway
        .sign_up(
            &Credentials::new("awa@district.ci", "secret1"),
            &SignUpMetadata::default(),
        )
        .await
        .unwrap();

    assert_eq!(outcome.identity.id, "u9");
    assert!(outcome.session.is_none());
    assert!(gateway.current_session().await.is_none());
}

#[tokio::test]
async fn test_sign_out_uses_user_token_and_clears_storage() {
    let mock_server = MockServer::start().await;
    mount_password_grant(&mock_server, "user-token").await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/logout"))
        .and(header("authorization", "Bearer user-token"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let storage = Arc::new(MemorySessionStorage::new());
    let gateway = gateway(&mock_server, Arc::clone(&storage));
    gateway
        .sign_in_with_password(&Credentials::new("awa@district.ci", "secret1"))
        .await
        .unwrap();

    gateway.sign_out().await.unwrap();

    assert!(gateway.current_session().await.is_none());
    assert!(storage.load().unwrap().is_none());
}

#[tokio::test]
async fn test_persisted_session_still_valid_is_restored_without_request() {
    let mock_server = MockServer::start().await;
    let session = stored_session(Utc::now().timestamp() + 3600);
    let storage = Arc::new(MemorySessionStorage::with_session(session.clone()));
    let gateway = gateway(&mock_server, storage);

    let restored = gateway.get_persisted_session().await.unwrap();

    assert_eq!(restored, Some(session));
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_expired_persisted_session_is_refreshed() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "refresh_token"))
        .and(body_string_contains("stored-refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("fresh-token", "u1")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let storage = Arc::new(MemorySessionStorage::with_session(stored_session(1)));
    let gateway = gateway(&mock_server, Arc::clone(&storage));

    let restored = gateway.get_persisted_session().await.unwrap().unwrap();

    assert_eq!(restored.access_token, "fresh-token");
    assert_eq!(storage.load().unwrap().unwrap().access_token, "fresh-token");
}

#[tokio::test]
async fn test_expired_persisted_session_refresh_failure_clears_storage() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Invalid Refresh Token: Already Used"
        })))
        .mount(&mock_server)
        .await;

    let storage = Arc::new(MemorySessionStorage::with_session(stored_session(1)));
    let gateway = gateway(&mock_server, Arc::clone(&storage));

    let restored = gateway.get_persisted_session().await.unwrap();

    assert!(restored.is_none());
    assert!(storage.load().unwrap().is_none());
}

#[tokio::test]
async fn test_auto_refresh_fires_before_expiry() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "refresh_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("fresh-token", "u1")))
        .mount(&mock_server)
        .await;

    let session = stored_session(Utc::now().timestamp() + 30);
    let storage = Arc::new(MemorySessionStorage::with_session(session));
    let gateway = Arc::new(gateway(&mock_server, storage));
    gateway.get_persisted_session().await.unwrap();
    let mut events = gateway.on_session_changed();

    let handle = gateway.spawn_auto_refresh(Duration::from_secs(60));
    let event = tokio::time::timeout(Duration::from_secs(5), events.recv())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(event.kind, SessionEventKind::TokenRefreshed);
    assert_eq!(
        gateway.current_session().await.unwrap().access_token,
        "fresh-token"
    );
    drop(handle);
}

// =========================================================================
// Table endpoints
// =========================================================================

#[tokio::test]
async fn test_select_renders_filters_and_uses_anon_bearer() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/profiles"))
        .and(query_param("district", "eq.Korhogo"))
        .and(query_param("full_name", "ilike.*kou*"))
        .and(query_param("order", "full_name.asc.nullslast"))
        .and(header("apikey", ANON_KEY))
        .and(header("authorization", "Bearer anon-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "u3", "full_name": "Jean Kouamé", "district": "Korhogo" }
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let gateway = gateway(&mock_server, Arc::new(MemorySessionStorage::new()));
    let rows = gateway
        .select(
            &Query::table("profiles")
                .eq("district", "Korhogo")
                .ilike("full_name", "%kou%")
                .order("full_name", SortOrder::Ascending),
        )
        .await
        .unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["id"], "u3");
}

#[tokio::test]
async fn test_select_after_sign_in_uses_user_bearer() {
    let mock_server = MockServer::start().await;
    mount_password_grant(&mock_server, "user-token").await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/posts"))
        .and(header("authorization", "Bearer user-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let gateway = gateway(&mock_server, Arc::new(MemorySessionStorage::new()));
    gateway
        .sign_in_with_password(&Credentials::new("awa@district.ci", "secret1"))
        .await
        .unwrap();

    let rows = gateway.select(&Query::table("posts")).await.unwrap();

    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_insert_requests_representation_and_echoes_change() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/posts"))
        .and(header("Prefer", "return=representation"))
        .and(body_string_contains("Bonjour"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([{
            "id": "p1",
            "author_id": "u1",
            "content": "Bonjour",
            "image_url": null,
            "created_at": "2024-01-01T00:00:00Z"
        }])))
        .mount(&mock_server)
        .await;

    let gateway = gateway(&mock_server, Arc::new(MemorySessionStorage::new()));
    let mut changes = gateway.subscribe(vec![ChangeFilter::table("posts")]);

    let rows = gateway
        .insert("posts", json!({ "author_id": "u1", "content": "Bonjour" }))
        .await
        .unwrap();

    assert_eq!(rows.len(), 1);
    let event = changes.recv().await.unwrap();
    assert_eq!(event.kind, ChangeKind::Insert);
    assert_eq!(event.record["id"], "p1");
}

#[tokio::test]
async fn test_postgrest_error_maps_to_api_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/profiles"))
        .and(query_param("id", "eq.u1"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "code": "42501",
            "details": null,
            "hint": null,
            "message": "permission denied for table profiles"
        })))
        .mount(&mock_server)
        .await;

    let gateway = gateway(&mock_server, Arc::new(MemorySessionStorage::new()));
    let result = gateway
        .update(&Query::table("profiles").eq("id", "u1"), json!({ "district": "Abidjan" }))
        .await;

    match result {
        Err(GatewayError::Api {
            status,
            code,
            message,
            ..
        }) => {
            assert_eq!(status, 403);
            assert_eq!(code, "42501");
            assert_eq!(message, "permission denied for table profiles");
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_delete_with_empty_body_returns_no_rows() {
    let mock_server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/rest/v1/post_likes"))
        .and(query_param("post_id", "eq.p1"))
        .and(query_param("user_id", "eq.u1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let gateway = gateway(&mock_server, Arc::new(MemorySessionStorage::new()));
    let rows = gateway
        .delete(&Query::table("post_likes").eq("post_id", "p1").eq("user_id", "u1"))
        .await
        .unwrap();

    assert!(rows.is_empty());
}
