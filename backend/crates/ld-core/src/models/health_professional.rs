use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Row of the `health_professionals` table, keyed by the profile id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthProfessional {
    pub user_id: String,
    pub specialty: String,
    #[serde(default)]
    pub structure: Option<String>,
    #[serde(default)]
    pub professional_id: Option<String>,
    pub created_at: DateTime<Utc>,
}
