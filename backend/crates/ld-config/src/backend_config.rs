use crate::{
    ConfigError, ConfigErrorResult, DEFAULT_REQUEST_TIMEOUT_SECS, PLACEHOLDER_ANON_KEY,
    PLACEHOLDER_BACKEND_URL, TEMPLATE_KEY_MARKER, TEMPLATE_URL_MARKER,
};

use serde::Deserialize;

pub const MIN_REQUEST_TIMEOUT_SECS: u64 = 1;
pub const MAX_REQUEST_TIMEOUT_SECS: u64 = 300;

/// Where the hosted backend lives and how to talk to it.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Project URL, e.g. `https://xyzcompany.supabase.co`
    pub url: String,
    /// Public (anon) API key sent with every request
    pub anon_key: String,
    /// Per-request timeout for the HTTP client
    pub request_timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            anon_key: String::new(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl BackendConfig {
    /// URL to use, swapping empty or template values for the placeholder
    /// project so the client can still be built without a backend.
    pub fn resolved_url(&self) -> String {
        let url = self.url.trim();
        if url.is_empty() || url.contains(TEMPLATE_URL_MARKER) {
            String::from(PLACEHOLDER_BACKEND_URL)
        } else {
            url.trim_end_matches('/').to_string()
        }
    }

    pub fn resolved_anon_key(&self) -> String {
        let key = self.anon_key.trim();
        if key.is_empty() || key.contains(TEMPLATE_KEY_MARKER) {
            String::from(PLACEHOLDER_ANON_KEY)
        } else {
            key.to_string()
        }
    }

    /// True when no real backend is configured. Data calls will fail.
    pub fn is_placeholder(&self) -> bool {
        self.resolved_url() == PLACEHOLDER_BACKEND_URL
    }

    pub fn validate(&self) -> ConfigErrorResult<()> {
        let url = self.url.trim();
        if !url.is_empty()
            && !url.contains(TEMPLATE_URL_MARKER)
            && !(url.starts_with("https://") || url.starts_with("http://"))
        {
            return Err(ConfigError::backend(format!(
                "backend.url must start with http:// or https://, got '{}'",
                url
            )));
        }

        if self.request_timeout_secs < MIN_REQUEST_TIMEOUT_SECS
            || self.request_timeout_secs > MAX_REQUEST_TIMEOUT_SECS
        {
            return Err(ConfigError::backend(format!(
                "backend.request_timeout_secs must be {}-{}, got {}",
                MIN_REQUEST_TIMEOUT_SECS, MAX_REQUEST_TIMEOUT_SECS, self.request_timeout_secs
            )));
        }

        Ok(())
    }
}
