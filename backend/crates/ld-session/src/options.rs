use ld_config::AuthConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionStoreOptions {
    /// Honour the demo sentinel credentials. Ignored without the `demo` feature.
    pub demo_enabled: bool,
}

impl Default for SessionStoreOptions {
    fn default() -> Self {
        Self {
            demo_enabled: cfg!(feature = "demo"),
        }
    }
}

impl From<&AuthConfig> for SessionStoreOptions {
    fn from(config: &AuthConfig) -> Self {
        Self {
            demo_enabled: config.demo_enabled,
        }
    }
}
