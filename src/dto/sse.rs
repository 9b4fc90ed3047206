use serde::Serialize;
use utoipa::ToSchema;

use crate::services::staleness::Activity;

#[derive(Clone, Debug)]
/// Dispatched payload carried across SSE channels.
pub struct ServerEvent {
    /// SSE event name, if any.
    pub event: Option<String>,
    /// Serialized event payload.
    pub data: String,
}

impl ServerEvent {
    /// Build an event from an already-encoded data field.
    pub fn new<E>(event: E, data: String) -> Self
    where
        E: Into<Option<String>>,
    {
        Self {
            event: event.into(),
            data,
        }
    }

    /// Convenience wrapper that serialises `payload` into the SSE data field.
    pub fn json<E, T>(event: E, payload: &T) -> serde_json::Result<Self>
    where
        E: Into<Option<String>>,
        T: Serialize,
    {
        Ok(Self {
            event: event.into(),
            data: serde_json::to_string(payload)?,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
/// Broadcast after every accepted telemetry push.
pub struct MatchUpdatedEvent {
    /// Arena name, if reported.
    pub arena_name: Option<String>,
    /// RFC 3339 ingestion time.
    pub last_updated: String,
    /// Activity right after the push.
    pub activity: Activity,
    /// Roster size.
    pub total_players: usize,
    /// Players assigned to a team.
    pub playing_players: usize,
    /// Players without a team.
    pub spectators: usize,
    /// Number of active duels.
    pub duels: usize,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when the bridge activity classification changes.
pub struct ActivityChangedEvent {
    /// Classification before the change.
    pub previous: Activity,
    /// Classification after the change.
    pub current: Activity,
}
