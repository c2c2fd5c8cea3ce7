use std::collections::HashMap;

use ld_core::Profile;
use ld_gateway::{ProfileRepository, Result as GatewayErrorResult, TableApi};

/// Profiles keyed by id, fetched in one query.
#[derive(Debug, Default)]
pub(crate) struct ProfileIndex {
    profiles: HashMap<String, Profile>,
}

impl ProfileIndex {
    pub(crate) async fn load<'a, I>(gateway: &dyn TableApi, ids: I) -> GatewayErrorResult<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let ids = unique_ids(ids);
        let profiles = ProfileRepository::new(gateway).find_many(&ids).await?;
        Ok(Self::from(profiles))
    }

    pub(crate) fn get(&self, id: &str) -> Option<Profile> {
        self.profiles.get(id).cloned()
    }
}

impl From<Vec<Profile>> for ProfileIndex {
    fn from(profiles: Vec<Profile>) -> Self {
        Self {
            profiles: profiles
                .into_iter()
                .map(|profile| (profile.id.clone(), profile))
                .collect(),
        }
    }
}

/// Distinct ids in first-seen order
pub(crate) fn unique_ids<'a, I>(ids: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = Vec::<String>::new();
    for id in ids {
        if !seen.iter().any(|known| known == id) {
            seen.push(id.to_string());
        }
    }
    seen
}
