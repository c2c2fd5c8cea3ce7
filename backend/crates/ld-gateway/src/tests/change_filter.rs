use crate::{ChangeEvent, ChangeFilter, ChangeKind, EventBus};

use serde_json::json;

fn message_insert(conversation_id: &str) -> ChangeEvent {
    ChangeEvent::new(
        "messages",
        ChangeKind::Insert,
        json!({ "id": "m1", "conversation_id": conversation_id }),
    )
}

#[test]
fn test_table_filter_matches_any_kind() {
    let filter = ChangeFilter::table("posts");

    assert!(filter.matches(&ChangeEvent::new("posts", ChangeKind::Insert, json!({}))));
    assert!(filter.matches(&ChangeEvent::new("posts", ChangeKind::Delete, json!({}))));
    assert!(!filter.matches(&ChangeEvent::new("comments", ChangeKind::Insert, json!({}))));
}

#[test]
fn test_kind_filter_rejects_other_kinds() {
    let filter = ChangeFilter::table("comments").on(ChangeKind::Insert);

    assert!(filter.matches(&ChangeEvent::new("comments", ChangeKind::Insert, json!({}))));
    assert!(!filter.matches(&ChangeEvent::new("comments", ChangeKind::Update, json!({}))));
}

#[test]
fn test_column_filter_compares_record_value() {
    let filter = ChangeFilter::table("messages")
        .on(ChangeKind::Insert)
        .where_eq("conversation_id", "c1");

    assert!(filter.matches(&message_insert("c1")));
    assert!(!filter.matches(&message_insert("c2")));
}

#[test]
fn test_column_filter_rejects_records_without_column() {
    let filter = ChangeFilter::table("messages").where_eq("conversation_id", "c1");

    assert!(!filter.matches(&ChangeEvent::new("messages", ChangeKind::Insert, json!({}))));
}

#[tokio::test]
async fn test_change_subscription_skips_unmatched_events() {
    let bus = EventBus::new(16);
    let mut subscription = crate::ChangeSubscription::new(
        bus.subscribe(),
        vec![ChangeFilter::table("messages").where_eq("conversation_id", "c1")],
    );

    bus.publish(message_insert("c2"));
    bus.publish(message_insert("c1"));

    let received = subscription.recv().await.unwrap();
    assert_eq!(received.record["conversation_id"], "c1");
    assert!(subscription.try_recv().is_none());
}
