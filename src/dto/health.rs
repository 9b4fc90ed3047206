use serde::Serialize;
use utoipa::ToSchema;

use crate::services::staleness::Activity;

/// Simple health response returned by the `/healthcheck` route.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Health status of the service itself (always "ok" while it answers).
    pub status: String,
    /// How recently the game-server bridge pushed match telemetry.
    pub bridge: Activity,
}

impl HealthResponse {
    /// Create a health response for a running service.
    pub fn ok(bridge: Activity) -> Self {
        Self {
            status: "ok".to_string(),
            bridge,
        }
    }
}
