use std::time::SystemTime;

use serde::Serialize;
use tracing::warn;

use crate::{
    dto::{
        format_system_time,
        sse::{ActivityChangedEvent, MatchUpdatedEvent, ServerEvent},
    },
    services::{
        duels::duel_pairings,
        staleness::{self, Activity, StalenessThresholds},
    },
    state::{SharedState, live_match::MatchSnapshot},
};

const EVENT_MATCH_UPDATED: &str = "match.updated";
const EVENT_ACTIVITY_CHANGED: &str = "activity.changed";

/// Summarise `snapshot` for the live stream as seen at `now`.
pub fn match_updated(
    snapshot: &MatchSnapshot,
    now: SystemTime,
    thresholds: &StalenessThresholds,
) -> MatchUpdatedEvent {
    let counts = snapshot.roster_counts();
    MatchUpdatedEvent {
        arena_name: snapshot.arena_name.known().cloned(),
        last_updated: format_system_time(snapshot.last_updated),
        activity: staleness::classify(Some(snapshot.last_updated), now, thresholds),
        total_players: counts.total,
        playing_players: counts.playing,
        spectators: counts.spectators,
        duels: duel_pairings(&snapshot.players).count(),
    }
}

/// Broadcast that a new snapshot was accepted.
pub fn broadcast_match_updated(state: &SharedState, event: &MatchUpdatedEvent) {
    send_live_event(state, EVENT_MATCH_UPDATED, event);
}

/// Broadcast a change of the bridge activity classification.
pub fn broadcast_activity_changed(state: &SharedState, previous: Activity, current: Activity) {
    let payload = ActivityChangedEvent { previous, current };
    send_live_event(state, EVENT_ACTIVITY_CHANGED, &payload);
}

fn send_live_event(state: &SharedState, event: &str, payload: &impl Serialize) {
    match ServerEvent::json(Some(event.to_string()), payload) {
        Ok(event) => state.live_sse().broadcast(event),
        Err(err) => warn!(event, error = %err, "failed to serialize live SSE payload"),
    }
}
