pub mod health;
pub mod live;
pub mod static_files;

use axum::Router;
use utoipa::OpenApi;

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(live::router())
        .fallback(static_files::serve)
}

#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health,
        // Relay
        live::subscribe,
        live::publish,
    ),
    components(
        schemas(
            crate::error::ApiErrorBody,
            crate::error::ApiErrorDetail,
            health::HealthResponse,
        )
    ),
    tags(
        (name = "Health", description = "Health check"),
        (name = "Relay", description = "Room publish/subscribe over Server-Sent Events"),
    )
)]
pub struct ApiDoc;
