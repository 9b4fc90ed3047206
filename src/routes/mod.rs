use axum::Router;

use crate::state::SharedState;

/// Swagger UI and OpenAPI document.
pub mod docs;
/// Health check route.
pub mod health;
/// Live SSE route.
pub mod sse;
/// Telemetry ingestion and read routes.
pub mod telemetry;

/// Compose all route trees, wiring in shared state and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    let api_router = health::router()
        .merge(sse::router())
        .merge(telemetry::router(state.clone()));

    api_router.merge(docs::router()).with_state(state)
}
