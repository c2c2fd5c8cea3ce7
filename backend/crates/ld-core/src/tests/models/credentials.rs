use crate::Credentials;

#[test]
fn test_credentials_debug_redacts_password() {
    let credentials = Credentials::new("a@b.com", "secret1");
    let printed = format!("{:?}", credentials);

    assert!(printed.contains("a@b.com"));
    assert!(!printed.contains("secret1"));
}
