use crate::{Identity, Session};

use serde_json::json;

#[test]
fn test_session_from_token_response() {
    let session: Session = serde_json::from_value(json!({
        "access_token": "access-1",
        "refresh_token": "refresh-1",
        "expires_at": 1_700_000_000,
        "expires_in": 3600,
        "user": { "id": "user-1", "email": "a@b.com", "role": "authenticated" }
    }))
    .unwrap();

    assert_eq!(session.subject_id(), "user-1");
    assert_eq!(session.token_type, "bearer");
    assert_eq!(session.refresh_token.as_deref(), Some("refresh-1"));
}

#[test]
fn test_session_expiry() {
    let mut session = Session::new("token", Identity::new("user-1", None));
    assert!(!session.is_expired_at(i64::MAX));
    assert_eq!(session.seconds_until_expiry(0), None);

    session.expires_at = Some(100);
    assert!(!session.is_expired_at(99));
    assert!(session.is_expired_at(100));
    assert_eq!(session.seconds_until_expiry(40), Some(60));
    assert_eq!(session.seconds_until_expiry(500), Some(0));
}

#[test]
fn test_session_debug_redacts_tokens() {
    let mut session = Session::new("very-secret-token", Identity::new("user-1", None));
    session.refresh_token = Some("refresh-secret".to_string());

    let printed = format!("{:?}", session);
    assert!(!printed.contains("very-secret-token"));
    assert!(!printed.contains("refresh-secret"));
    assert!(printed.contains("user-1"));
}
