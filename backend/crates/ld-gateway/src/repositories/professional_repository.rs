use crate::repositories::{decode_inserted, decode_rows};
use crate::tables::HEALTH_PROFESSIONALS;
use crate::{GatewayError, Query, Result as GatewayErrorResult, SortOrder, TableApi};

use ld_core::{HealthProfessional, ProfessionalRecord};
use serde::Serialize;

pub struct ProfessionalRepository<'a> {
    gateway: &'a dyn TableApi,
}

impl<'a> ProfessionalRepository<'a> {
    pub fn new(gateway: &'a dyn TableApi) -> Self {
        Self { gateway }
    }

    /// Insert the member's professional record. Failures are `ProfileUpdate`.
    pub async fn insert(
        &self,
        user_id: &str,
        record: &ProfessionalRecord,
    ) -> GatewayErrorResult<HealthProfessional> {
        #[derive(Serialize)]
        struct NewProfessional<'b> {
            user_id: &'b str,
            specialty: &'b str,
            #[serde(skip_serializing_if = "Option::is_none")]
            structure: Option<&'b str>,
        }

        let row = NewProfessional {
            user_id,
            specialty: &record.specialty,
            structure: record.structure.as_deref(),
        };
        let payload = serde_json::to_value(&row)
            .map_err(|e| GatewayError::profile_update(e.to_string()))?;

        let rows = self
            .gateway
            .insert(HEALTH_PROFESSIONALS, payload)
            .await
            .map_err(|e| GatewayError::profile_update(e.user_message()))?;
        decode_inserted(rows, HEALTH_PROFESSIONALS)
    }

    pub async fn find_by_user(
        &self,
        user_id: &str,
    ) -> GatewayErrorResult<Option<HealthProfessional>> {
        let rows = self
            .gateway
            .select(
                &Query::table(HEALTH_PROFESSIONALS)
                    .eq("user_id", user_id)
                    .limit(1),
            )
            .await?;
        Ok(decode_rows(rows)?.into_iter().next())
    }

    /// Directory listing, newest first, optionally for one specialty.
    pub async fn list(
        &self,
        specialty: Option<&str>,
    ) -> GatewayErrorResult<Vec<HealthProfessional>> {
        let mut query =
            Query::table(HEALTH_PROFESSIONALS).order("created_at", SortOrder::Descending);
        if let Some(specialty) = specialty {
            query = query.eq("specialty", specialty);
        }

        decode_rows(self.gateway.select(&query).await?)
    }
}
