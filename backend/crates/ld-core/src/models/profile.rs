//! Profile entity - the domain-level record of a district member.

use crate::serde_helpers::null_as_default;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Row of the `profiles` table. `id` equals the auth identity id.
///
/// The backend creates the row at sign-up with whatever metadata it was
/// given, so `full_name` and `district` may still be empty afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub full_name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub district: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Profile {
    /// True once both the name and the district have been filled in
    pub fn is_complete(&self) -> bool {
        !self.full_name.trim().is_empty() && !self.district.trim().is_empty()
    }

    /// Name to show in lists; falls back to the email, then the id.
    pub fn display_name(&self) -> &str {
        if !self.full_name.trim().is_empty() {
            &self.full_name
        } else if let Some(email) = self.email.as_deref() {
            email
        } else {
            &self.id
        }
    }
}
