mod auth_config;
mod backend_config;
mod config;
mod error;
mod log_level;
mod logging_config;

#[cfg(test)]
mod tests;

pub use auth_config::AuthConfig;
pub use backend_config::BackendConfig;
pub use config::Config;
pub use error::{ConfigError, ConfigErrorResult};
pub use log_level::LogLevel;
pub use logging_config::LoggingConfig;

const CONFIG_DIR_ENV: &str = "LD_CONFIG_DIR";
const DEFAULT_CONFIG_DIR_NAME: &str = "le-district";
const CONFIG_FILE_NAME: &str = "config.toml";

const PLACEHOLDER_BACKEND_URL: &str = "https://placeholder-project.supabase.co";
const PLACEHOLDER_ANON_KEY: &str = "placeholder-key";
const TEMPLATE_URL_MARKER: &str = "your_supabase_project_url";
const TEMPLATE_KEY_MARKER: &str = "your_supabase_anon_key";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

const DEFAULT_DEMO_ENABLED: bool = true;
const DEFAULT_PERSIST_SESSION: bool = true;
const DEFAULT_SESSION_FILE: &str = "session.json";
const DEFAULT_AUTO_REFRESH: bool = true;
const DEFAULT_REFRESH_MARGIN_SECS: u64 = 60;

const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Info;
const DEFAULT_LOG_COLORED: bool = true;
const DEFAULT_LOG_DIRECTORY: &str = "log";
