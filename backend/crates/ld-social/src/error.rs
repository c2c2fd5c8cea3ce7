use std::panic::Location;
use std::result::Result as StdResult;

use error_location::ErrorLocation;
use ld_gateway::GatewayError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SocialError {
    #[error("User not authenticated {location}")]
    NotAuthenticated { location: ErrorLocation },

    #[error("Backend error: {source} {location}")]
    Gateway {
        #[source]
        source: GatewayError,
        location: ErrorLocation,
    },
}

impl SocialError {
    #[track_caller]
    pub fn not_authenticated() -> Self {
        SocialError::NotAuthenticated {
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Message suitable for display to the member
    pub fn user_message(&self) -> String {
        match self {
            SocialError::NotAuthenticated { .. } => String::from("User not authenticated"),
            SocialError::Gateway { source, .. } => source.user_message(),
        }
    }
}

impl From<GatewayError> for SocialError {
    #[track_caller]
    fn from(source: GatewayError) -> Self {
        SocialError::Gateway {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = StdResult<T, SocialError>;
