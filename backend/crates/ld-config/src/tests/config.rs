use crate::tests::{EnvGuard, setup_config_dir};
use crate::{Config, LogLevel};

use googletest::assert_that;
use googletest::prelude::{anything, contains_substring, eq, err, none, ok, some};
use log::LevelFilter;
use serial_test::serial;

// =========================================================================
// Loading
// =========================================================================

#[test]
#[serial]
fn given_no_config_file_when_load_then_defaults_are_used() {
    // Given
    let (_temp, _guards) = setup_config_dir();

    // When
    let config = Config::load().unwrap();

    // Then
    assert_that!(config.auth.demo_enabled, eq(true));
    assert_that!(config.auth.persist_session, eq(true));
    assert_that!(config.auth.session_file, eq("session.json"));
    assert_that!(config.backend.request_timeout_secs, eq(30));
    assert_that!(config.logging.level, eq(LogLevel(LevelFilter::Info)));
    assert_that!(config.validate(), ok(anything()));
}

#[test]
#[serial]
fn given_missing_config_dir_when_load_then_dir_is_created() {
    // Given
    let (temp, _guards) = setup_config_dir();
    let nested = temp.path().join("nested").join("district");
    let _dir = EnvGuard::set("LD_CONFIG_DIR", nested.to_str().unwrap());

    // When
    Config::load().unwrap();

    // Then
    assert!(nested.is_dir());
}

#[test]
#[serial]
fn given_config_file_when_load_then_values_are_read() {
    // Given
    let (temp, _guards) = setup_config_dir();
    std::fs::write(
        temp.path().join("config.toml"),
        r#"
            [backend]
            url = "https://district.example.co"
            anon_key = "anon-123"

            [auth]
            demo_enabled = false
            refresh_margin_secs = 120

            [logging]
            level = "debug"
            file = "district.log"
        "#,
    )
    .unwrap();

    // When
    let config = Config::load().unwrap();

    // Then
    assert_that!(config.backend.url, eq("https://district.example.co"));
    assert_that!(config.backend.anon_key, eq("anon-123"));
    assert_that!(config.auth.demo_enabled, eq(false));
    assert_that!(config.auth.refresh_margin_secs, eq(120));
    assert_that!(config.logging.level, eq(LogLevel(LevelFilter::Debug)));
    assert_that!(config.logging.file, some(eq("district.log")));
}

#[test]
#[serial]
fn given_malformed_toml_when_load_then_error_mentions_path() {
    // Given
    let (temp, _guards) = setup_config_dir();
    std::fs::write(temp.path().join("config.toml"), "[backend\nurl = ").unwrap();

    // When
    let result = Config::load();

    // Then
    assert_that!(result, err(anything()));
    let err_msg = format!("{}", result.unwrap_err());
    assert_that!(err_msg, contains_substring("config.toml"));
}

#[test]
#[serial]
fn given_env_overrides_when_load_then_env_wins_over_file() {
    // Given
    let (temp, _guards) = setup_config_dir();
    std::fs::write(
        temp.path().join("config.toml"),
        r#"
            [auth]
            demo_enabled = true
        "#,
    )
    .unwrap();
    let _demo = EnvGuard::set("LD_AUTH_DEMO_ENABLED", "false");
    let _level = EnvGuard::set("LD_LOG_LEVEL", "warn");
    let _file = EnvGuard::set("LD_LOG_FILE", "client.log");

    // When
    let config = Config::load().unwrap();

    // Then
    assert_that!(config.auth.demo_enabled, eq(false));
    assert_that!(config.logging.level, eq(LogLevel(LevelFilter::Warn)));
    assert_that!(config.logging.file, some(eq("client.log")));
}

#[test]
#[serial]
fn given_unparseable_env_number_when_load_then_value_is_kept() {
    // Given
    let (_temp, _guards) = setup_config_dir();
    let _timeout = EnvGuard::set("LD_BACKEND_TIMEOUT_SECS", "soon");

    // When
    let config = Config::load().unwrap();

    // Then
    assert_that!(config.backend.request_timeout_secs, eq(30));
}

// =========================================================================
// Derived paths
// =========================================================================

#[test]
#[serial]
fn given_persistence_enabled_when_session_path_then_inside_config_dir() {
    // Given
    let (temp, _guards) = setup_config_dir();

    // When
    let config = Config::load().unwrap();
    let path = config.session_path().unwrap().unwrap();

    // Then
    assert_eq!(path, temp.path().join("session.json"));
}

#[test]
#[serial]
fn given_persistence_disabled_when_session_path_then_none() {
    // Given
    let (_temp, _guards) = setup_config_dir();
    let _persist = EnvGuard::set("LD_AUTH_PERSIST_SESSION", "0");

    // When
    let config = Config::load().unwrap();

    // Then
    assert_that!(config.session_path().unwrap(), none());
}

#[test]
#[serial]
fn given_log_file_when_log_file_path_then_under_log_dir() {
    // Given
    let (temp, _guards) = setup_config_dir();
    let _file = EnvGuard::set("LD_LOG_FILE", "district.log");

    // When
    let config = Config::load().unwrap();
    let path = config.log_file_path().unwrap().unwrap();

    // Then
    assert_eq!(path, temp.path().join("log").join("district.log"));
}
