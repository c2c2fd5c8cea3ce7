use std::panic::Location;
use std::result::Result as StdResult;

use error_location::ErrorLocation;
use ld_config::ConfigError;
use ld_gateway::GatewayError;
use ld_session::SessionError;
use ld_social::SocialError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration error: {source} {location}")]
    Config {
        #[source]
        source: ConfigError,
        location: ErrorLocation,
    },

    #[error("Backend error: {source} {location}")]
    Gateway {
        #[source]
        source: GatewayError,
        location: ErrorLocation,
    },

    #[error("{source} {location}")]
    Session {
        #[source]
        source: SessionError,
        location: ErrorLocation,
    },

    #[error("{source} {location}")]
    Social {
        #[source]
        source: SocialError,
        location: ErrorLocation,
    },

    #[error("Logger error: {message} {location}")]
    Logger {
        message: String,
        location: ErrorLocation,
    },

    #[error("Output error: {source} {location}")]
    Io {
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },
}

impl CliError {
    #[track_caller]
    pub fn logger(message: impl Into<String>) -> Self {
        CliError::Logger {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// What the member sees on stderr
    pub fn user_message(&self) -> String {
        match self {
            CliError::Config { source, .. } => source.to_string(),
            CliError::Gateway { source, .. } => source.user_message(),
            CliError::Session { source, .. } => match source {
                SessionError::Authentication { message, .. } => {
                    format!("Authentication failed: {}", message)
                }
                SessionError::ProfileUpdate { message, .. } => {
                    format!("Account created but the profile could not be saved: {}", message)
                }
                SessionError::NotFound { message, .. }
                | SessionError::Validation { message, .. } => message.clone(),
            },
            CliError::Social { source, .. } => match source {
                SocialError::NotAuthenticated { .. } => {
                    String::from("Not signed in. Run `district sign-in` first.")
                }
                SocialError::Gateway { .. } => source.user_message(),
            },
            CliError::Logger { message, .. } => message.clone(),
            CliError::Io { source, .. } => source.to_string(),
        }
    }
}

impl From<ConfigError> for CliError {
    #[track_caller]
    fn from(source: ConfigError) -> Self {
        CliError::Config {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<GatewayError> for CliError {
    #[track_caller]
    fn from(source: GatewayError) -> Self {
        CliError::Gateway {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<SessionError> for CliError {
    #[track_caller]
    fn from(source: SessionError) -> Self {
        CliError::Session {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<SocialError> for CliError {
    #[track_caller]
    fn from(source: SocialError) -> Self {
        CliError::Social {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<std::io::Error> for CliError {
    #[track_caller]
    fn from(source: std::io::Error) -> Self {
        CliError::Io {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = StdResult<T, CliError>;
