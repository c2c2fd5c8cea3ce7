use crate::profile_index::ProfileIndex;
use crate::view_state::ViewStore;
use crate::{ProfessionalView, Reader, ViewState};

use std::cmp::Ordering;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use ld_gateway::tables::{HEALTH_PROFESSIONALS, PROFILES};
use ld_gateway::{
    ChangeFilter, ProfessionalRepository, ProfileRepository, Result as GatewayErrorResult,
    TableApi,
};
use log::{error, warn};
use tokio::sync::watch;

/// Directory filters. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryQuery {
    pub district: Option<String>,
    pub specialty: Option<String>,
    /// Case-insensitive substring of the full name
    pub search: Option<String>,
}

impl DirectoryQuery {
    fn filters_profiles(&self) -> bool {
        self.district.is_some() || self.search.as_deref().is_some_and(|s| !s.trim().is_empty())
    }
}

/// Health professionals with their profiles, sorted by name.
pub struct DirectoryReader {
    gateway: Arc<dyn TableApi>,
    query: Mutex<DirectoryQuery>,
    view: ViewStore<ProfessionalView>,
}

impl DirectoryReader {
    pub fn new(gateway: Arc<dyn TableApi>) -> Self {
        Self::with_query(gateway, DirectoryQuery::default())
    }

    pub fn with_query(gateway: Arc<dyn TableApi>, query: DirectoryQuery) -> Self {
        Self {
            gateway,
            query: Mutex::new(query),
            view: ViewStore::new(),
        }
    }

    pub fn state(&self) -> ViewState<ProfessionalView> {
        self.view.state()
    }

    pub fn watch(&self) -> watch::Receiver<ViewState<ProfessionalView>> {
        self.view.subscribe()
    }

    pub fn query(&self) -> DirectoryQuery {
        match self.query.lock() {
            Ok(query) => query.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Replace the filters and re-fetch.
    pub async fn set_query(&self, query: DirectoryQuery) {
        match self.query.lock() {
            Ok(mut current) => *current = query,
            Err(poisoned) => {
                warn!("Directory query lock poisoned, recovering");
                *poisoned.into_inner() = query;
            }
        }
        self.refresh().await;
    }

    async fn fetch(&self, query: &DirectoryQuery) -> GatewayErrorResult<Vec<ProfessionalView>> {
        let gateway = self.gateway.as_ref();
        let professionals = ProfessionalRepository::new(gateway)
            .list(query.specialty.as_deref())
            .await?;
        let ids: Vec<String> = professionals
            .iter()
            .map(|professional| professional.user_id.clone())
            .collect();

        let profiles = ProfileIndex::from(
            ProfileRepository::new(gateway)
                .search(&ids, query.district.as_deref(), query.search.as_deref())
                .await?,
        );

        let mut views: Vec<ProfessionalView> = professionals
            .into_iter()
            .map(|professional| ProfessionalView {
                profile: profiles.get(&professional.user_id),
                professional,
            })
            .filter(|view| view.profile.is_some() || !query.filters_profiles())
            .collect();
        views.sort_by(by_name);
        Ok(views)
    }
}

/// Case-insensitive by full name; professionals without a profile last.
fn by_name(a: &ProfessionalView, b: &ProfessionalView) -> Ordering {
    match (&a.profile, &b.profile) {
        (Some(left), Some(right)) => left
            .full_name
            .to_lowercase()
            .cmp(&right.full_name.to_lowercase()),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[async_trait]
impl Reader for DirectoryReader {
    fn name(&self) -> &'static str {
        "directory"
    }

    fn change_filters(&self) -> Vec<ChangeFilter> {
        vec![
            ChangeFilter::table(HEALTH_PROFESSIONALS),
            ChangeFilter::table(PROFILES),
        ]
    }

    async fn refresh(&self) {
        let query = self.query();
        match self.fetch(&query).await {
            Ok(professionals) => self.view.replace(professionals),
            Err(e) => {
                error!("Error fetching professionals: {}", e);
                self.view.settle();
            }
        }
    }
}
