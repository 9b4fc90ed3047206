use crate::{dto::health::HealthResponse, services::snapshot_service, state::SharedState};

/// Respond with the service status and how recently the bridge reported.
pub fn health_status(state: &SharedState) -> HealthResponse {
    HealthResponse::ok(snapshot_service::current_activity(state))
}
