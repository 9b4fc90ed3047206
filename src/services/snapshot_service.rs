//! Read-side projection of the stored snapshot into the client view.

use std::time::SystemTime;

use crate::{
    dto::{
        format_system_time,
        live_match::{DuelView, LiveMatchQuery, LiveMatchView, PlayerView},
    },
    services::{
        duels::duel_pairings,
        staleness::{self, Activity, StalenessThresholds},
    },
    state::{SharedState, live_match::MatchSnapshot},
};

/// Return the derived view of the current match as seen right now.
pub fn live_view(state: &SharedState, query: &LiveMatchQuery) -> LiveMatchView {
    let snapshot = state.snapshots().read();
    build_view(
        snapshot.as_deref(),
        SystemTime::now(),
        state.config().staleness(),
        query.include_participants,
    )
}

/// Activity classification of the current snapshot as seen right now.
pub fn current_activity(state: &SharedState) -> Activity {
    let last_updated = state.snapshots().read().map(|snapshot| snapshot.last_updated);
    staleness::classify(last_updated, SystemTime::now(), state.config().staleness())
}

/// Derive the client view from `snapshot` as seen at `now`.
///
/// A missing snapshot yields an empty roster with [`Activity::Unknown`].
pub fn build_view(
    snapshot: Option<&MatchSnapshot>,
    now: SystemTime,
    thresholds: &StalenessThresholds,
    include_participants: bool,
) -> LiveMatchView {
    let Some(snapshot) = snapshot else {
        return LiveMatchView {
            arena_name: None,
            game_type: None,
            base_used: None,
            winning_team: None,
            game_start_time: None,
            game_duration_ms: None,
            last_updated: None,
            age_seconds: None,
            activity: Activity::Unknown,
            total_players: 0,
            playing_players: 0,
            spectators: 0,
            players: Vec::new(),
            duels: Vec::new(),
            participant_data: include_participants.then(Vec::new),
        };
    };

    let counts = snapshot.roster_counts();
    LiveMatchView {
        arena_name: snapshot.arena_name.known().cloned(),
        game_type: snapshot.game_type.known().cloned(),
        base_used: snapshot.base_used.known().cloned(),
        winning_team: snapshot.winning_team.known().cloned(),
        game_start_time: snapshot.game_start_time.known().cloned(),
        game_duration_ms: snapshot.game_duration_ms.known().copied(),
        last_updated: Some(format_system_time(snapshot.last_updated)),
        age_seconds: Some(staleness::snapshot_age(snapshot.last_updated, now).as_secs()),
        activity: staleness::classify(Some(snapshot.last_updated), now, thresholds),
        total_players: counts.total,
        playing_players: counts.playing,
        spectators: counts.spectators,
        players: snapshot.players.iter().map(PlayerView::from).collect(),
        duels: duel_pairings(&snapshot.players).map(DuelView::from).collect(),
        participant_data: include_participants.then(|| snapshot.participant_data.clone()),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;

    use super::*;
    use crate::{
        config::AppConfig, dto::telemetry::MatchPayload, services::ingest_service, state::AppState,
    };

    fn payload() -> MatchPayload {
        serde_json::from_value(json!({
            "arenaName": "Twin Peaks",
            "gameType": "CTF",
            "participantData": [{ "alias": "A", "squad": "Alpha" }],
            "players": [
                { "alias": "A", "team": "Red", "isDueling": true, "duelOpponent": "B", "duelType": "ranked" },
                { "alias": "B", "team": "Red", "isDueling": true, "duelOpponent": "A", "duelType": "ranked" },
                { "alias": "C", "team": null }
            ]
        }))
        .expect("payload parses")
    }

    #[test]
    fn no_snapshot_yields_empty_unknown_view() {
        let view = build_view(None, SystemTime::now(), &StalenessThresholds::default(), false);
        assert_eq!(view.activity, Activity::Unknown);
        assert_eq!(view.total_players, 0);
        assert!(view.players.is_empty());
        assert!(view.duels.is_empty());
        assert!(view.last_updated.is_none());
        assert!(view.participant_data.is_none());
    }

    #[test]
    fn view_reports_counts_duels_and_activity() {
        let now = SystemTime::now();
        let snapshot = payload().into_snapshot(now - Duration::from_secs(10));
        let view = build_view(Some(&snapshot), now, &StalenessThresholds::default(), false);

        assert_eq!(view.arena_name.as_deref(), Some("Twin Peaks"));
        assert_eq!(view.activity, Activity::Active);
        assert_eq!(view.age_seconds, Some(10));
        assert_eq!(
            (view.total_players, view.playing_players, view.spectators),
            (3, 2, 1)
        );
        assert_eq!(view.duels.len(), 1);
        assert_eq!(view.duels[0].duel_type, "ranked");
        assert!(view.duels[0].mutual);
        assert!(view.participant_data.is_none());
    }

    #[test]
    fn participants_are_included_on_request() {
        let now = SystemTime::now();
        let snapshot = payload().into_snapshot(now);
        let view = build_view(Some(&snapshot), now, &StalenessThresholds::default(), true);
        assert_eq!(
            view.participant_data,
            Some(vec![json!({ "alias": "A", "squad": "Alpha" })])
        );
    }

    #[test]
    fn stale_snapshot_stays_readable() {
        let now = SystemTime::now();
        let snapshot = payload().into_snapshot(now - Duration::from_secs(3_600));
        let view = build_view(Some(&snapshot), now, &StalenessThresholds::default(), false);
        assert_eq!(view.activity, Activity::Unknown);
        assert_eq!(view.total_players, 3);
    }

    #[test]
    fn identical_pushes_differ_only_in_timestamp() {
        let now = SystemTime::now();
        let thresholds = StalenessThresholds::default();
        let first = payload().into_snapshot(now - Duration::from_secs(5));
        let second = payload().into_snapshot(now);

        let mut first_view = build_view(Some(&first), now, &thresholds, true);
        let mut second_view = build_view(Some(&second), now, &thresholds, true);
        assert_ne!(first_view.last_updated, second_view.last_updated);

        for view in [&mut first_view, &mut second_view] {
            view.last_updated = None;
            view.age_seconds = None;
        }
        assert_eq!(first_view, second_view);
    }

    #[test]
    fn live_view_reads_from_the_state_store() {
        let state = AppState::new(AppConfig::default());
        assert_eq!(current_activity(&state), Activity::Unknown);

        state
            .snapshots()
            .replace(payload().into_snapshot(SystemTime::now()));
        let view = live_view(&state, &LiveMatchQuery::default());
        assert_eq!(view.activity, Activity::Active);
        assert_eq!(current_activity(&state), Activity::Active);
        assert_eq!(view.players.len(), 3);
    }

    #[test]
    fn identical_ingested_pushes_read_back_identically() {
        let state = AppState::new(AppConfig::default());
        let query = LiveMatchQuery {
            include_participants: true,
        };

        ingest_service::ingest(&state, payload()).expect("first push accepted");
        let mut first = live_view(&state, &query);
        ingest_service::ingest(&state, payload()).expect("second push accepted");
        let mut second = live_view(&state, &query);

        assert!(first.last_updated.is_some());
        assert!(second.last_updated.is_some());
        for view in [&mut first, &mut second] {
            view.last_updated = None;
            view.age_seconds = None;
        }
        assert_eq!(first, second);
    }

    #[test]
    fn configured_thresholds_drive_the_live_view() {
        let thresholds = StalenessThresholds::new(Duration::from_secs(60), Duration::from_secs(600))
            .expect("ordered thresholds");
        let state = AppState::new(AppConfig::default().with_staleness(thresholds));
        state
            .snapshots()
            .replace(payload().into_snapshot(SystemTime::now() - Duration::from_secs(45)));

        assert_eq!(current_activity(&state), Activity::Active);
        let default_view = build_view(
            state.snapshots().read().as_deref(),
            SystemTime::now(),
            &StalenessThresholds::default(),
            false,
        );
        assert_eq!(default_view.activity, Activity::Idle);
    }
}
