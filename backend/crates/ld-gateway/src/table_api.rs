use crate::{ChangeFilter, ChangeSubscription, Query, Result as GatewayErrorResult};

use async_trait::async_trait;
use serde_json::Value;

/// Row-oriented access to the backend's tables plus change notifications.
///
/// Rows are plain JSON objects; the repositories turn them into models.
#[async_trait]
pub trait TableApi: Send + Sync {
    async fn select(&self, query: &Query) -> GatewayErrorResult<Vec<Value>>;

    /// Insert one row (object) or several (array). Returns the stored rows.
    async fn insert(&self, table: &str, rows: Value) -> GatewayErrorResult<Vec<Value>>;

    /// Merge `patch` into every row matching `query`. Returns the updated rows.
    async fn update(&self, query: &Query, patch: Value) -> GatewayErrorResult<Vec<Value>>;

    /// Returns the deleted rows
    async fn delete(&self, query: &Query) -> GatewayErrorResult<Vec<Value>>;

    fn subscribe(&self, filters: Vec<ChangeFilter>) -> ChangeSubscription;
}
