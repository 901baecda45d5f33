use crate::error::ApiError;
use crate::models::SetQuery;
use crate::routes;
use crate::state::AppState;
use axum::extract::{Query, State};

/// GET /set handler - Store a value under a key
#[utoipa::path(
    get,
    path = routes::KV_SET,
    params(SetQuery),
    responses(
        (status = 200, description = "Value stored", body = String, content_type = "text/plain"),
        (status = 500, description = "Store error", body = String, content_type = "text/plain")
    ),
    tag = "kv"
)]
pub async fn set_handler(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<String, ApiError> {
    let query = SetQuery::from_pairs(pairs);

    if let Err(e) = state.store.put(&query.key, &query.value).await {
        tracing::error!("Failed to set key '{}': {}", query.key, e);
        return Err(e.into());
    }

    tracing::info!("Successfully set key: {}", query.key);
    Ok(format!("Key {} set successfully!", query.key))
}
