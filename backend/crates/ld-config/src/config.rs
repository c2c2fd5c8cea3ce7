use crate::{
    AuthConfig, BackendConfig, CONFIG_DIR_ENV, CONFIG_FILE_NAME, ConfigError, ConfigErrorResult,
    DEFAULT_CONFIG_DIR_NAME, LoggingConfig,
};

use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub backend: BackendConfig,
    pub auth: AuthConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load config.
    ///
    /// Loading order:
    /// 1. Resolve the config directory (LD_CONFIG_DIR, else the platform data dir)
    /// 2. Auto-create it if it doesn't exist
    /// 3. Load config.toml if it exists, else use defaults
    /// 4. Apply LD_* environment variable overrides (EXPO_PUBLIC_* as fallback)
    ///
    /// Does NOT validate - call validate() after load().
    pub fn load() -> ConfigErrorResult<Self> {
        let config_dir = Self::config_dir()?;

        if !config_dir.exists() {
            std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::Io {
                path: config_dir.clone(),
                source: e,
            })?;
        }

        let config_path = config_dir.join(CONFIG_FILE_NAME);

        let mut config = if config_path.exists() {
            Self::load_toml(&config_path)?
        } else {
            Config::default()
        };

        config.apply_env_overrides();

        Ok(config)
    }

    fn load_toml(path: &Path) -> ConfigErrorResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::Toml {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the config directory.
    /// Priority: LD_CONFIG_DIR env var > <platform local data dir>/le-district
    pub fn config_dir() -> ConfigErrorResult<PathBuf> {
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
            return Ok(PathBuf::from(dir));
        }

        dirs::data_local_dir()
            .map(|dir| dir.join(DEFAULT_CONFIG_DIR_NAME))
            .ok_or(ConfigError::NoDataDir)
    }

    /// Validate all configuration.
    /// Call after load() to catch all errors at startup.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        self.backend.validate()?;
        self.auth.validate()?;

        if let Some(ref file) = self.logging.file
            && (Path::new(file).is_absolute() || file.contains(".."))
        {
            return Err(ConfigError::logging(
                "logging.file must be relative and cannot contain '..'",
            ));
        }

        Ok(())
    }

    /// Absolute path of the persisted session, if persistence is enabled.
    pub fn session_path(&self) -> ConfigErrorResult<Option<PathBuf>> {
        if !self.auth.persist_session {
            return Ok(None);
        }
        Ok(Some(Self::config_dir()?.join(&self.auth.session_file)))
    }

    /// Absolute path of the log file, if file logging is configured.
    pub fn log_file_path(&self) -> ConfigErrorResult<Option<PathBuf>> {
        match self.logging.file {
            Some(ref file) => Ok(Some(
                Self::config_dir()?.join(&self.logging.dir).join(file),
            )),
            None => Ok(None),
        }
    }

    /// Log configuration summary (NEVER logs the anon key or tokens).
    pub fn log_summary(&self) {
        info!("Configuration loaded:");

        if self.backend.is_placeholder() {
            warn!(
                "  backend: {} (placeholder, data operations will fail)",
                self.backend.resolved_url()
            );
        } else {
            info!(
                "  backend: {} (timeout {}s)",
                self.backend.resolved_url(),
                self.backend.request_timeout_secs
            );
        }

        info!(
            "  auth: demo={}, persist_session={}, auto_refresh={} (margin {}s)",
            self.auth.demo_enabled,
            self.auth.persist_session,
            self.auth.auto_refresh,
            self.auth.refresh_margin_secs
        );

        info!(
            "  logging: {} (colored: {}, file: {})",
            self.logging.level,
            self.logging.colored,
            self.logging.file.as_deref().unwrap_or("stderr")
        );
    }

    fn apply_env_overrides(&mut self) {
        // Backend
        Self::apply_env_string_or(
            "LD_BACKEND_URL",
            "EXPO_PUBLIC_SUPABASE_URL",
            &mut self.backend.url,
        );
        Self::apply_env_string_or(
            "LD_BACKEND_ANON_KEY",
            "EXPO_PUBLIC_SUPABASE_ANON_KEY",
            &mut self.backend.anon_key,
        );
        Self::apply_env_parse(
            "LD_BACKEND_TIMEOUT_SECS",
            &mut self.backend.request_timeout_secs,
        );

        // Auth
        Self::apply_env_bool("LD_AUTH_DEMO_ENABLED", &mut self.auth.demo_enabled);
        Self::apply_env_bool("LD_AUTH_PERSIST_SESSION", &mut self.auth.persist_session);
        Self::apply_env_string("LD_AUTH_SESSION_FILE", &mut self.auth.session_file);
        Self::apply_env_bool("LD_AUTH_AUTO_REFRESH", &mut self.auth.auto_refresh);
        Self::apply_env_parse(
            "LD_AUTH_REFRESH_MARGIN_SECS",
            &mut self.auth.refresh_margin_secs,
        );

        // Logging
        Self::apply_env_parse("LD_LOG_LEVEL", &mut self.logging.level);
        Self::apply_env_bool("LD_LOG_COLORED", &mut self.logging.colored);
        Self::apply_env_option_string("LD_LOG_FILE", &mut self.logging.file);
    }

    /// Helper: Apply the first of two environment variables that is set
    fn apply_env_string_or(primary: &str, fallback: &str, target: &mut String) {
        if let Ok(val) = std::env::var(primary).or_else(|_| std::env::var(fallback)) {
            *target = val;
        }
    }

    /// Helper: Apply environment variable override for String values
    fn apply_env_string(var_name: &str, target: &mut String) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val;
        }
    }

    /// Helper: Apply environment variable override for bool values (accepts "true"/"1")
    fn apply_env_bool(var_name: &str, target: &mut bool) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val == "true" || val == "1";
        }
    }

    /// Helper: Apply environment variable override for parseable values
    fn apply_env_parse<T: std::str::FromStr>(var_name: &str, target: &mut T) {
        if let Ok(val) = std::env::var(var_name)
            && let Ok(parsed) = val.parse()
        {
            *target = parsed;
        }
    }

    /// Helper: Apply environment variable override for Option<String> values
    fn apply_env_option_string(var_name: &str, target: &mut Option<String>) {
        if let Ok(val) = std::env::var(var_name) {
            *target = Some(val);
        }
    }
}
