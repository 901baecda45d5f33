use axum::Json;
use utoipa::OpenApi;

use crate::error::{HealthResponse, UnhealthyResponse};
use crate::handlers;

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "redis-kv-gateway API",
        version = "1.0.0",
        description = "HTTP front end for a Redis key-value store"
    ),
    paths(
        handlers::health::health_handler,
        handlers::set::set_handler,
        handlers::get::get_handler
    ),
    components(
        schemas(
            HealthResponse,
            UnhealthyResponse
        )
    ),
    tags(
        (name = "health", description = "Health check operations"),
        (name = "kv", description = "Key-value store operations")
    )
)]
pub struct ApiDoc;

/// GET /api-docs/openapi.json handler
pub async fn openapi_handler() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
