use crate::Config;
use crate::tests::{EnvGuard, setup_config_dir};

use googletest::assert_that;
use googletest::prelude::{anything, contains_substring, eq, err, ok};
use serial_test::serial;

#[test]
#[serial]
fn given_no_backend_url_when_resolved_then_placeholder_is_used() {
    // Given
    let (_temp, _guards) = setup_config_dir();

    // When
    let config = Config::load().unwrap();

    // Then
    assert_that!(config.backend.is_placeholder(), eq(true));
    assert_that!(
        config.backend.resolved_url(),
        eq("https://placeholder-project.supabase.co")
    );
    assert_that!(config.backend.resolved_anon_key(), eq("placeholder-key"));
}

#[test]
#[serial]
fn given_template_values_when_resolved_then_placeholder_is_used() {
    // Given
    let (_temp, _guards) = setup_config_dir();
    let _url = EnvGuard::set("LD_BACKEND_URL", "your_supabase_project_url");
    let _key = EnvGuard::set("LD_BACKEND_ANON_KEY", "your_supabase_anon_key");

    // When
    let config = Config::load().unwrap();

    // Then
    assert_that!(config.backend.is_placeholder(), eq(true));
    assert_that!(config.backend.resolved_anon_key(), eq("placeholder-key"));
    assert_that!(config.validate(), ok(anything()));
}

#[test]
#[serial]
fn given_expo_variables_when_load_then_used_as_fallback() {
    // Given
    let (_temp, _guards) = setup_config_dir();
    let _url = EnvGuard::set("EXPO_PUBLIC_SUPABASE_URL", "https://expo.supabase.co/");
    let _key = EnvGuard::set("EXPO_PUBLIC_SUPABASE_ANON_KEY", "expo-key");

    // When
    let config = Config::load().unwrap();

    // Then
    assert_that!(config.backend.resolved_url(), eq("https://expo.supabase.co"));
    assert_that!(config.backend.resolved_anon_key(), eq("expo-key"));
    assert_that!(config.backend.is_placeholder(), eq(false));
}

#[test]
#[serial]
fn given_ld_and_expo_variables_when_load_then_ld_wins() {
    // Given
    let (_temp, _guards) = setup_config_dir();
    let _expo = EnvGuard::set("EXPO_PUBLIC_SUPABASE_URL", "https://expo.supabase.co");
    let _ld = EnvGuard::set("LD_BACKEND_URL", "https://district.supabase.co");

    // When
    let config = Config::load().unwrap();

    // Then
    assert_that!(config.backend.resolved_url(), eq("https://district.supabase.co"));
}

#[test]
#[serial]
fn given_url_without_scheme_when_validate_then_error() {
    // Given
    let (_temp, _guards) = setup_config_dir();
    let _url = EnvGuard::set("LD_BACKEND_URL", "district.supabase.co");

    // When
    let config = Config::load().unwrap();
    let result = config.validate();

    // Then
    assert_that!(result, err(anything()));
    let err_msg = format!("{}", result.unwrap_err());
    assert_that!(err_msg, contains_substring("http://"));
}

#[test]
#[serial]
fn given_zero_timeout_when_validate_then_error() {
    // Given
    let (_temp, _guards) = setup_config_dir();
    let _timeout = EnvGuard::set("LD_BACKEND_TIMEOUT_SECS", "0");

    // When
    let config = Config::load().unwrap();

    // Then
    assert_that!(config.validate(), err(anything()));
}
