use crate::{
    ConfigError, ConfigErrorResult, DEFAULT_AUTO_REFRESH, DEFAULT_DEMO_ENABLED,
    DEFAULT_PERSIST_SESSION, DEFAULT_REFRESH_MARGIN_SECS, DEFAULT_SESSION_FILE,
};

use std::path::Path;

use serde::Deserialize;

pub const MAX_REFRESH_MARGIN_SECS: u64 = 3600;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Accept the demo sentinel account without contacting the backend
    pub demo_enabled: bool,
    /// Keep the session on disk between runs
    pub persist_session: bool,
    /// Session file, relative to the config directory
    pub session_file: String,
    /// Refresh the access token in the background before it expires
    pub auto_refresh: bool,
    /// How long before expiry the refresh fires
    pub refresh_margin_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            demo_enabled: DEFAULT_DEMO_ENABLED,
            persist_session: DEFAULT_PERSIST_SESSION,
            session_file: String::from(DEFAULT_SESSION_FILE),
            auto_refresh: DEFAULT_AUTO_REFRESH,
            refresh_margin_secs: DEFAULT_REFRESH_MARGIN_SECS,
        }
    }
}

impl AuthConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.persist_session {
            if self.session_file.trim().is_empty() {
                return Err(ConfigError::auth(
                    "auth.session_file cannot be empty when persist_session is enabled",
                ));
            }

            if Path::new(&self.session_file).is_absolute() {
                return Err(ConfigError::auth(
                    "auth.session_file must be relative to the config directory",
                ));
            }

            if self.session_file.contains("..") {
                return Err(ConfigError::auth(
                    "auth.session_file cannot contain '..'",
                ));
            }
        }

        if self.refresh_margin_secs > MAX_REFRESH_MARGIN_SECS {
            return Err(ConfigError::auth(format!(
                "auth.refresh_margin_secs must be at most {}, got {}",
                MAX_REFRESH_MARGIN_SECS, self.refresh_margin_secs
            )));
        }

        Ok(())
    }
}
