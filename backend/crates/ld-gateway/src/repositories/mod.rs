mod comment_repository;
mod conversation_repository;
mod message_repository;
mod post_repository;
mod professional_repository;
mod profile_repository;

pub use comment_repository::CommentRepository;
pub use conversation_repository::ConversationRepository;
pub use message_repository::MessageRepository;
pub use post_repository::PostRepository;
pub use professional_repository::ProfessionalRepository;
pub use profile_repository::ProfileRepository;

use crate::{GatewayError, Result as GatewayErrorResult};

use serde::de::DeserializeOwned;
use serde_json::Value;

fn decode_rows<T: DeserializeOwned>(rows: Vec<Value>) -> GatewayErrorResult<Vec<T>> {
    rows.into_iter()
        .map(|row| serde_json::from_value(row).map_err(GatewayError::from))
        .collect()
}

/// The single row a `return=representation` insert hands back.
fn decode_inserted<T: DeserializeOwned>(rows: Vec<Value>, table: &str) -> GatewayErrorResult<T> {
    let row = rows.into_iter().next().ok_or_else(|| {
        GatewayError::api(500, "EMPTY", format!("backend returned no row for {}", table))
    })?;
    Ok(serde_json::from_value(row)?)
}
