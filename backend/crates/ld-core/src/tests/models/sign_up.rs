use crate::{
    Credentials, DEFAULT_SPECIALTY, ProfessionalFields, ProfessionalRecord, ProfileFields,
    SignUpRequest,
};

use googletest::prelude::*;

fn request(district: Option<&str>) -> SignUpRequest {
    SignUpRequest::new(
        Credentials::new("a@b.com", "secret1"),
        ProfileFields {
            full_name: Some("A B".to_string()),
            phone: None,
            district: district.map(String::from),
        },
    )
}

#[test]
fn given_specialty_when_professional_record_then_uses_it() {
    let req = request(Some("korhogo-1")).with_professional(ProfessionalFields {
        specialty: Some("nurse".to_string()),
        structure: Some("CHR Korhogo".to_string()),
    });

    assert_eq!(
        req.professional_record(),
        Some(ProfessionalRecord {
            specialty: "nurse".to_string(),
            structure: Some("CHR Korhogo".to_string()),
        })
    );
}

#[test]
fn given_district_only_when_professional_record_then_default_specialty() {
    let record = request(Some("korhogo-1")).professional_record().unwrap();

    assert_that!(record.specialty, eq(DEFAULT_SPECIALTY));
    assert_that!(record.structure, none());
}

#[test]
fn given_no_district_and_no_professional_when_professional_record_then_none() {
    assert_that!(request(None).professional_record(), none());
}

#[test]
fn given_profile_fields_when_serialized_then_unset_fields_are_skipped() {
    let value = serde_json::to_value(&request(Some("korhogo-1")).profile).unwrap();

    assert_eq!(value["full_name"], "A B");
    assert_that!(value.get("phone"), none());
    assert_that!(request(None).metadata().full_name, some(eq("A B")));
}

#[test]
fn given_short_password_when_validate_then_error() {
    let mut req = request(None);
    req.credentials.password = "abc".to_string();

    let result = req.validate();

    assert_that!(result, err(anything()));
    assert_that!(
        result.unwrap_err().to_string(),
        contains_substring("at least 6")
    );
}

#[test]
fn given_bad_email_when_validate_then_error() {
    let mut req = request(None);
    req.credentials.email = "not-an-email".to_string();

    assert_that!(req.validate(), err(anything()));
}

#[test]
fn given_valid_request_when_validate_then_ok() {
    assert_that!(request(Some("korhogo-1")).validate(), ok(anything()));
}
