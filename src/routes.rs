// Route path constants - single source of truth for all API paths

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::api_doc;
use crate::handlers::{get_handler, health_handler, set_handler};
use crate::state::AppState;

pub const HEALTH: &str = "/health";
pub const KV_SET: &str = "/set";
pub const KV_GET: &str = "/get";
pub const OPENAPI_JSON: &str = "/api-docs/openapi.json";

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(KV_SET, get(set_handler))
        .route(KV_GET, get(get_handler))
        .route(HEALTH, get(health_handler))
        .route(OPENAPI_JSON, get(api_doc::openapi_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
