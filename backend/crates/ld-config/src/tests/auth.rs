use crate::Config;
use crate::tests::{EnvGuard, setup_config_dir};

use googletest::assert_that;
use googletest::prelude::{anything, contains_substring, err, ok};
use serial_test::serial;

// =========================================================================
// Validation Tests - Auth
// =========================================================================

#[test]
#[serial]
fn given_absolute_session_file_when_validate_then_error_mentions_relative() {
    // Given
    let (temp, _guards) = setup_config_dir();
    std::fs::write(
        temp.path().join("config.toml"),
        r#"
            [auth]
            session_file = "/etc/passwd"
        "#,
    )
    .unwrap();

    // When
    let config = Config::load().unwrap();
    let result = config.validate();

    // Then
    assert_that!(result, err(anything()));
    let err_msg = format!("{}", result.unwrap_err());
    assert_that!(err_msg, contains_substring("relative"));
}

#[test]
#[serial]
fn given_path_traversal_in_session_file_when_validate_then_error() {
    // Given
    let (_temp, _guards) = setup_config_dir();
    let _file = EnvGuard::set("LD_AUTH_SESSION_FILE", "../../session.json");

    // When
    let config = Config::load().unwrap();
    let result = config.validate();

    // Then
    assert_that!(result, err(anything()));
    let err_msg = format!("{}", result.unwrap_err());
    assert_that!(err_msg, contains_substring(".."));
}

#[test]
#[serial]
fn given_empty_session_file_without_persistence_when_validate_then_ok() {
    // Given
    let (_temp, _guards) = setup_config_dir();
    let _persist = EnvGuard::set("LD_AUTH_PERSIST_SESSION", "false");
    let _file = EnvGuard::set("LD_AUTH_SESSION_FILE", "");

    // When
    let config = Config::load().unwrap();

    // Then
    assert_that!(config.validate(), ok(anything()));
}

#[test]
#[serial]
fn given_refresh_margin_over_max_when_validate_then_error() {
    // Given
    let (_temp, _guards) = setup_config_dir();
    let _margin = EnvGuard::set("LD_AUTH_REFRESH_MARGIN_SECS", "3601");

    // When
    let config = Config::load().unwrap();
    let result = config.validate();

    // Then
    assert_that!(result, err(anything()));
    let err_msg = format!("{}", result.unwrap_err());
    assert_that!(err_msg, contains_substring("refresh_margin_secs"));
}
