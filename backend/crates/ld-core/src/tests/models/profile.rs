use crate::Profile;

use googletest::prelude::*;
use serde_json::json;

fn profile_row() -> serde_json::Value {
    json!({
        "id": "user-1",
        "email": "a@b.com",
        "full_name": "A B",
        "phone": null,
        "district": "korhogo-1",
        "created_at": "2024-01-01T08:30:00.123456+00:00",
        "updated_at": null
    })
}

#[test]
fn given_backend_row_when_deserialized_then_fields_are_mapped() {
    let profile: Profile = serde_json::from_value(profile_row()).unwrap();

    assert_that!(profile.id, eq("user-1"));
    assert_that!(profile.full_name, eq("A B"));
    assert_that!(profile.district, eq("korhogo-1"));
    assert_that!(profile.phone, none());
    assert_that!(profile.is_complete(), eq(true));
}

#[test]
fn given_null_name_and_district_when_deserialized_then_profile_is_incomplete() {
    let mut row = profile_row();
    row["full_name"] = json!(null);
    row["district"] = json!(null);

    let profile: Profile = serde_json::from_value(row).unwrap();

    assert_that!(profile.full_name, eq(""));
    assert_that!(profile.is_complete(), eq(false));
    assert_eq!(profile.display_name(), "a@b.com");
}

#[test]
fn given_missing_email_and_name_when_display_name_then_falls_back_to_id() {
    let mut row = profile_row();
    row["full_name"] = json!("  ");
    row["email"] = json!(null);

    let profile: Profile = serde_json::from_value(row).unwrap();

    assert_eq!(profile.display_name(), "user-1");
}
