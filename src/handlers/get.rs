use crate::error::ApiError;
use crate::models::GetQuery;
use crate::routes;
use crate::state::AppState;
use crate::store::StoreError;
use axum::extract::{Query, State};

/// GET /get handler - Retrieve the value stored under a key
///
/// A missing key is reported as 500 with `key does not exist`, the same
/// status as a store failure.
#[utoipa::path(
    get,
    path = routes::KV_GET,
    params(GetQuery),
    responses(
        (status = 200, description = "Value found", body = String, content_type = "text/plain"),
        (status = 500, description = "Key does not exist or store error", body = String, content_type = "text/plain")
    ),
    tag = "kv"
)]
pub async fn get_handler(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<String, ApiError> {
    let query = GetQuery::from_pairs(pairs);

    match state.store.get(&query.key).await {
        Ok(value) => {
            tracing::info!("Successfully retrieved key: {}", query.key);
            Ok(format!("Value for key {}: {}", query.key, value))
        }
        Err(StoreError::KeyNotFound) => {
            tracing::info!("Key not found: {}", query.key);
            Err(StoreError::KeyNotFound.into())
        }
        Err(e) => {
            tracing::error!("Failed to get key '{}': {}", query.key, e);
            Err(e.into())
        }
    }
}
