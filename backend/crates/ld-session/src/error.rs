use std::panic::Location;
use std::result::Result as StdResult;

use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Authentication error: {message} {location}")]
    Authentication {
        message: String,
        location: ErrorLocation,
    },

    #[error("Profile update error: {message} {location}")]
    ProfileUpdate {
        message: String,
        location: ErrorLocation,
    },

    #[error("Not found: {message} {location}")]
    NotFound {
        message: String,
        location: ErrorLocation,
    },

    #[error("Validation error: {message} {location}")]
    Validation {
        message: String,
        location: ErrorLocation,
    },
}

impl SessionError {
    #[track_caller]
    pub fn authentication(message: impl Into<String>) -> Self {
        SessionError::Authentication {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn profile_update(message: impl Into<String>) -> Self {
        SessionError::ProfileUpdate {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn not_found(message: impl Into<String>) -> Self {
        SessionError::NotFound {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn validation(message: impl Into<String>) -> Self {
        SessionError::Validation {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// The message to show the member, without the source location
    pub fn user_message(&self) -> &str {
        match self {
            SessionError::Authentication { message, .. }
            | SessionError::ProfileUpdate { message, .. }
            | SessionError::NotFound { message, .. }
            | SessionError::Validation { message, .. } => message,
        }
    }
}

pub type Result<T> = StdResult<T, SessionError>;
