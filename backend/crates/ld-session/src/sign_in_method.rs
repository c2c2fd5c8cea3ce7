use ld_core::Credentials;

/// How a sign-in request is served.
#[derive(Debug, Clone)]
pub enum SignInMethod {
    /// Credential exchange with the backend
    Password(Credentials),
    /// Synthesized local account, never touches the backend
    #[cfg(feature = "demo")]
    Demo,
}

impl SignInMethod {
    /// The demo variant is only chosen for the sentinel pair, and only when enabled.
    #[cfg_attr(not(feature = "demo"), allow(unused_variables))]
    pub fn classify(credentials: Credentials, demo_enabled: bool) -> Self {
        #[cfg(feature = "demo")]
        {
            if demo_enabled && crate::demo::is_demo_credentials(&credentials) {
                return SignInMethod::Demo;
            }
        }

        SignInMethod::Password(credentials)
    }
}
