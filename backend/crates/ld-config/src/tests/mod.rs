mod auth;
mod backend;
mod config;

use std::env;

use tempfile::TempDir;

/// RAII guard for environment variables - automatically restores on drop
pub(crate) struct EnvGuard {
    key: &'static str,
    original: Option<String>,
}

impl EnvGuard {
    pub(crate) fn set(key: &'static str, value: &str) -> Self {
        unsafe {
            let original = env::var(key).ok();
            env::set_var(key, value);
            Self { key, original }
        }
    }

    pub(crate) fn remove(key: &'static str) -> Self {
        unsafe {
            let original = env::var(key).ok();
            env::remove_var(key);
            Self { key, original }
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        unsafe {
            match &self.original {
                Some(val) => env::set_var(self.key, val),
                None => env::remove_var(self.key),
            }
        }
    }
}

/// Create a temp config directory and point LD_CONFIG_DIR at it.
/// Backend variables are cleared so the host environment cannot leak in.
pub(crate) fn setup_config_dir() -> (TempDir, Vec<EnvGuard>) {
    let temp = TempDir::new().unwrap();
    let guards = vec![
        EnvGuard::set("LD_CONFIG_DIR", temp.path().to_str().unwrap()),
        EnvGuard::remove("LD_BACKEND_URL"),
        EnvGuard::remove("LD_BACKEND_ANON_KEY"),
        EnvGuard::remove("EXPO_PUBLIC_SUPABASE_URL"),
        EnvGuard::remove("EXPO_PUBLIC_SUPABASE_ANON_KEY"),
        EnvGuard::remove("LD_AUTH_DEMO_ENABLED"),
        EnvGuard::remove("LD_AUTH_PERSIST_SESSION"),
        EnvGuard::remove("LD_LOG_LEVEL"),
        EnvGuard::remove("LD_LOG_FILE"),
    ];
    (temp, guards)
}
