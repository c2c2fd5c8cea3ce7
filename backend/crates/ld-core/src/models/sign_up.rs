//! Sign-up input: credentials, profile fields and the optional professional record.

use crate::{CoreError, Credentials, Result as CoreErrorResult};

use std::panic::Location;

use error_location::ErrorLocation;
use serde::Serialize;

/// Specialty stored when a professional record is created without one
pub const DEFAULT_SPECIALTY: &str = "Non spécifié";

/// Minimum password length accepted by the auth backend
const MIN_PASSWORD_LENGTH: usize = 6;

/// Profile columns written right after the account is created.
/// Unset fields are left untouched on the row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProfileFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
}

impl ProfileFields {
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none() && self.phone.is_none() && self.district.is_none()
    }
}

/// Professional data supplied at sign-up
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfessionalFields {
    pub specialty: Option<String>,
    pub structure: Option<String>,
}

/// Row inserted into `health_professionals`, minus the owning user id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfessionalRecord {
    pub specialty: String,
    pub structure: Option<String>,
}

/// Metadata attached to the auth account itself
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SignUpMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SignUpRequest {
    pub credentials: Credentials,
    pub profile: ProfileFields,
    pub professional: Option<ProfessionalFields>,
}

impl SignUpRequest {
    pub fn new(credentials: Credentials, profile: ProfileFields) -> Self {
        Self {
            credentials,
            profile,
            professional: None,
        }
    }

    pub fn with_professional(mut self, professional: ProfessionalFields) -> Self {
        self.professional = Some(professional);
        self
    }

    pub fn metadata(&self) -> SignUpMetadata {
        SignUpMetadata {
            full_name: self.profile.full_name.clone(),
        }
    }

    /// The professional record to create, if any.
    ///
    /// A record is created when professional data was supplied or when the
    /// member picked a district.
    pub fn professional_record(&self) -> Option<ProfessionalRecord> {
        if self.professional.is_none() && self.profile.district.is_none() {
            return None;
        }

        let professional = self.professional.clone().unwrap_or_default();
        Some(ProfessionalRecord {
            specialty: professional
                .specialty
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| String::from(DEFAULT_SPECIALTY)),
            structure: professional.structure,
        })
    }

    /// Cheap local checks before anything is sent to the backend.
    #[track_caller]
    pub fn validate(&self) -> CoreErrorResult<()> {
        if !self.credentials.email.contains('@') {
            return Err(CoreError::Validation {
                message: format!("'{}' is not a valid email", self.credentials.email),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if self.credentials.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(CoreError::Validation {
                message: format!(
                    "password must be at least {} characters",
                    MIN_PASSWORD_LENGTH
                ),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if self
            .profile
            .full_name
            .as_deref()
            .is_some_and(|name| name.trim().is_empty())
        {
            return Err(CoreError::Validation {
                message: String::from("full_name cannot be blank"),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(())
    }
}
