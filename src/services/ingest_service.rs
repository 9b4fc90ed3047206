//! Acceptance of bridge telemetry pushes into the snapshot store.

use std::time::SystemTime;

use tracing::{debug, warn};

use crate::{
    config::AppConfig,
    dto::{format_system_time, live_match::IngestAck, telemetry::MatchPayload},
    error::ServiceError,
    services::sse_events,
    state::SharedState,
};

/// Check the secret presented by the caller against the configured bridge secret.
///
/// Ingestion is open when no secret is configured.
pub fn authorize(config: &AppConfig, provided: Option<&str>) -> Result<(), ServiceError> {
    let Some(expected) = config.bridge_secret() else {
        return Ok(());
    };

    match provided {
        Some(secret) if secret == expected => Ok(()),
        Some(_) => Err(ServiceError::Unauthorized("invalid bridge secret".into())),
        None => Err(ServiceError::Unauthorized(
            "missing bridge secret header `X-Bridge-Secret`".into(),
        )),
    }
}

/// Check the roster limit and, when accepted, replace the stored snapshot with the push.
///
/// Partial pushes are accepted; player entries without a usable alias are dropped during
/// normalization. A rejected payload leaves the store untouched.
pub fn ingest(state: &SharedState, payload: MatchPayload) -> Result<IngestAck, ServiceError> {
    let max_players = state.config().max_players();
    if payload.players.len() > max_players {
        warn!(
            players = payload.players.len(),
            max_players, "rejecting oversized telemetry roster"
        );
        return Err(ServiceError::InvalidInput(format!(
            "roster of {} players exceeds the limit of {max_players}",
            payload.players.len()
        )));
    }

    let received_at = SystemTime::now();
    let snapshot = payload.into_snapshot(received_at);
    let players = snapshot.players.len();
    let event = sse_events::match_updated(&snapshot, received_at, state.config().staleness());

    state.snapshots().replace(snapshot);
    debug!(
        players,
        arena = event.arena_name.as_deref().unwrap_or("-"),
        "telemetry snapshot replaced"
    );
    sse_events::broadcast_match_updated(state, &event);

    Ok(IngestAck {
        accepted: true,
        message: "snapshot replaced".into(),
        players,
        last_updated: format_system_time(received_at),
    })
}
