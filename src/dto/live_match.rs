use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

use crate::{
    services::{
        duels::{DuelKind, DuelPairing},
        staleness::Activity,
    },
    state::live_match::{PlayerState, Reported},
};

/// Label used when the duel type cannot be settled.
pub const UNSPECIFIED_DUEL_TYPE: &str = "unspecified";

/// Query parameters accepted by the snapshot read endpoint.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct LiveMatchQuery {
    /// Include the opaque participant enrichment records.
    #[serde(default, alias = "include_participants")]
    pub include_participants: bool,
}

/// Client-ready view of the tracked match.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LiveMatchView {
    /// Arena name, null when not reported.
    pub arena_name: Option<String>,
    /// Game mode.
    pub game_type: Option<String>,
    /// Base layout in use.
    pub base_used: Option<String>,
    /// Winning team once the match has ended.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winning_team: Option<String>,
    /// Start time as sent by the bridge.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_start_time: Option<String>,
    /// Match duration in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_duration_ms: Option<u64>,
    /// RFC 3339 time of the last accepted push, null before the first one.
    pub last_updated: Option<String>,
    /// Whole seconds since the last accepted push.
    pub age_seconds: Option<u64>,
    /// Liveness of the bridge feed.
    pub activity: Activity,
    /// Roster size.
    pub total_players: usize,
    /// Players assigned to a team.
    pub playing_players: usize,
    /// Players without a team.
    pub spectators: usize,
    /// Roster in the order received.
    pub players: Vec<PlayerView>,
    /// Active duels, each listed once.
    pub duels: Vec<DuelView>,
    /// Present only when requested with `includeParticipants=true`.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Vec<Object>>)]
    pub participant_data: Option<Vec<Value>>,
}

/// Public projection of a player.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlayerView {
    /// In-game alias.
    pub alias: String,
    /// Team name; null for spectators.
    pub team: Option<String>,
    /// Team category.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_type: Option<String>,
    /// Current class.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    /// Whether the player is on offense.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_offense: Option<bool>,
    /// Equipped weapon.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weapon: Option<String>,
    /// Cumulative seconds per class.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub class_play_times: Option<IndexMap<String, f64>>,
    /// Total seconds played.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_play_time: Option<f64>,
    /// Raw duel flag reported by the bridge.
    pub is_dueling: bool,
    /// Opponent alias as reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duel_opponent: Option<String>,
    /// Duel type as reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duel_type: Option<String>,
    /// Health as reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_health: Option<f64>,
    /// Energy as reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_energy: Option<f64>,
    /// Whether the player is alive.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_alive: Option<bool>,
    /// False for spectators.
    pub is_playing: bool,
}

impl From<&PlayerState> for PlayerView {
    fn from(player: &PlayerState) -> Self {
        Self {
            alias: player.alias.clone(),
            team: player.team.known().cloned(),
            team_type: player.team_type.known().cloned(),
            class_name: player.class_name.known().cloned(),
            is_offense: player.is_offense.known().copied(),
            weapon: player.weapon.known().cloned(),
            class_play_times: player.class_play_times.known().cloned(),
            total_play_time: player.total_play_time.known().copied(),
            is_dueling: matches!(player.is_dueling, Reported::Known(true)),
            duel_opponent: player.duel_opponent.known().cloned(),
            duel_type: player.duel_type.known().cloned(),
            current_health: player.current_health.known().copied(),
            current_energy: player.current_energy.known().copied(),
            is_alive: player.is_alive.known().copied(),
            is_playing: player.is_playing(),
        }
    }
}

/// One active duel between two players on the roster.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DuelView {
    /// First player in roster order claiming the duel.
    pub player: String,
    /// The other side of the duel.
    pub opponent: String,
    /// Agreed duel type, or `unspecified`.
    pub duel_type: String,
    /// True when both players report the duel.
    pub mutual: bool,
    /// Each side's stated type when they disagree.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claims: Option<DuelClaims>,
}

/// Conflicting duel types reported by the two players.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DuelClaims {
    /// Type claimed by `player`.
    pub player: String,
    /// Type claimed by `opponent`.
    pub opponent: String,
}

impl From<DuelPairing<'_>> for DuelView {
    fn from(pairing: DuelPairing<'_>) -> Self {
        let (duel_type, claims) = match pairing.kind {
            DuelKind::Known(kind) => (kind.to_owned(), None),
            DuelKind::Disputed { player, opponent } => (
                UNSPECIFIED_DUEL_TYPE.to_owned(),
                Some(DuelClaims {
                    player: player.to_owned(),
                    opponent: opponent.to_owned(),
                }),
            ),
            DuelKind::Unspecified => (UNSPECIFIED_DUEL_TYPE.to_owned(), None),
        };

        Self {
            player: pairing.player.alias.clone(),
            opponent: pairing.opponent.alias.clone(),
            duel_type,
            mutual: pairing.is_mutual(),
            claims,
        }
    }
}

/// Acknowledgement returned to the bridge for an accepted push.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IngestAck {
    /// Always true for an acknowledgement.
    pub accepted: bool,
    /// Human-readable outcome.
    pub message: String,
    /// Players stored after normalization.
    pub players: usize,
    /// RFC 3339 ingestion time.
    pub last_updated: String,
}
