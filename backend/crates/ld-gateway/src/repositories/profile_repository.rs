use crate::repositories::decode_rows;
use crate::tables::PROFILES;
use crate::{GatewayError, Query, Result as GatewayErrorResult, TableApi};

use chrono::{SecondsFormat, Utc};
use ld_core::{Profile, ProfileFields};
use serde_json::Value;

pub struct ProfileRepository<'a> {
    gateway: &'a dyn TableApi,
}

impl<'a> ProfileRepository<'a> {
    pub fn new(gateway: &'a dyn TableApi) -> Self {
        Self { gateway }
    }

    /// Exactly one profile row; `NotFound` when there is none.
    pub async fn find_by_id(&self, id: &str) -> GatewayErrorResult<Profile> {
        let rows = self
            .gateway
            .select(&Query::table(PROFILES).eq("id", id).limit(1))
            .await?;

        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| GatewayError::not_found("Profile", id))?;
        Ok(serde_json::from_value(row)?)
    }

    pub async fn find_many(&self, ids: &[String]) -> GatewayErrorResult<Vec<Profile>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = self
            .gateway
            .select(&Query::table(PROFILES).in_list("id", ids.iter().cloned()))
            .await?;
        decode_rows(rows)
    }

    /// Profiles among `ids` in `district` whose name contains `name`
    /// (case-insensitive). Unset filters match everything.
    pub async fn search(
        &self,
        ids: &[String],
        district: Option<&str>,
        name: Option<&str>,
    ) -> GatewayErrorResult<Vec<Profile>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query = Query::table(PROFILES).in_list("id", ids.iter().cloned());
        if let Some(district) = district {
            query = query.eq("district", district);
        }
        if let Some(name) = name.map(str::trim).filter(|n| !n.is_empty()) {
            query = query.ilike("full_name", format!("%{}%", name));
        }

        decode_rows(self.gateway.select(&query).await?)
    }

    /// Write the supplied fields onto the profile row.
    ///
    /// Every failure, including a missing row, is reported as `ProfileUpdate`.
    pub async fn update(&self, id: &str, fields: &ProfileFields) -> GatewayErrorResult<()> {
        if fields.is_empty() {
            return Ok(());
        }

        let mut patch = serde_json::to_value(fields)
            .map_err(|e| GatewayError::profile_update(e.to_string()))?;
        if let Value::Object(ref mut map) = patch {
            map.insert(
                String::from("updated_at"),
                Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)),
            );
        }

        let updated = self
            .gateway
            .update(&Query::table(PROFILES).eq("id", id), patch)
            .await
            .map_err(|e| GatewayError::profile_update(e.user_message()))?;

        if updated.is_empty() {
            return Err(GatewayError::profile_update(format!(
                "no profile row for {}",
                id
            )));
        }

        Ok(())
    }
}
