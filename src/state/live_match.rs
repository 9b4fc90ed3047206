use std::time::SystemTime;

use indexmap::IndexMap;
use serde_json::Value;

/// Tri-state value for attributes the bridge may or may not report.
#[derive(Debug, Clone, PartialEq)]
pub enum Reported<T> {
    /// The key was absent from the push.
    Missing,
    /// The key was present but null (or blank once normalized).
    Null,
    /// The key carried a value.
    Known(T),
}

impl<T> Default for Reported<T> {
    fn default() -> Self {
        Self::Missing
    }
}

impl<T> Reported<T> {
    /// Borrow the value when one was reported.
    pub fn known(&self) -> Option<&T> {
        match self {
            Self::Known(value) => Some(value),
            Self::Missing | Self::Null => None,
        }
    }

    /// Consume and return the value when one was reported.
    pub fn into_known(self) -> Option<T> {
        match self {
            Self::Known(value) => Some(value),
            Self::Missing | Self::Null => None,
        }
    }

    /// True when the key was sent at all, even as null.
    pub fn is_reported(&self) -> bool {
        !matches!(self, Self::Missing)
    }

    /// Keep a known value only when `keep` accepts it; rejected values become [`Reported::Null`].
    pub fn filter(self, keep: impl FnOnce(&T) -> bool) -> Self {
        match self {
            Self::Known(value) if keep(&value) => Self::Known(value),
            Self::Known(_) => Self::Null,
            other => other,
        }
    }

    /// Transform a known value, keeping missing and null as they are.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Reported<U> {
        match self {
            Self::Known(value) => Reported::Known(f(value)),
            Self::Null => Reported::Null,
            Self::Missing => Reported::Missing,
        }
    }
}

impl Reported<String> {
    /// Trim a reported string, turning blank strings into [`Reported::Null`].
    pub fn trimmed(self) -> Self {
        self.map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
    }

    /// Borrow a known string as `&str`.
    pub fn as_deref(&self) -> Option<&str> {
        self.known().map(String::as_str)
    }
}

impl<T> From<Option<Option<T>>> for Reported<T> {
    fn from(value: Option<Option<T>>) -> Self {
        match value {
            None => Self::Missing,
            Some(None) => Self::Null,
            Some(Some(value)) => Self::Known(value),
        }
    }
}

/// State of a single player as reported in the last push.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlayerState {
    /// In-game alias, unique within one snapshot.
    pub alias: String,
    /// Team name; unset or null marks a spectator.
    pub team: Reported<String>,
    /// Team category.
    pub team_type: Reported<String>,
    /// Current class.
    pub class_name: Reported<String>,
    /// Whether the player is on offense.
    pub is_offense: Reported<bool>,
    /// Equipped weapon.
    pub weapon: Reported<String>,
    /// Cumulative seconds per class, in the order the bridge listed them.
    pub class_play_times: Reported<IndexMap<String, f64>>,
    /// Total seconds played.
    pub total_play_time: Reported<f64>,
    /// Whether the player reports being in a duel.
    pub is_dueling: Reported<bool>,
    /// Alias of the claimed duel opponent.
    pub duel_opponent: Reported<String>,
    /// Duel type claimed by this player.
    pub duel_type: Reported<String>,
    /// Current health.
    pub current_health: Reported<f64>,
    /// Current energy.
    pub current_energy: Reported<f64>,
    /// Whether the player is alive.
    pub is_alive: Reported<bool>,
}

impl PlayerState {
    /// A player counts as playing once assigned to a non-empty team.
    pub fn is_playing(&self) -> bool {
        self.team
            .as_deref()
            .is_some_and(|team| !team.trim().is_empty())
    }

    /// Opponent alias when this player claims to be in a duel.
    pub fn claimed_opponent(&self) -> Option<&str> {
        match self.is_dueling {
            Reported::Known(true) => self.duel_opponent.as_deref(),
            _ => None,
        }
    }
}

/// Complete state of the tracked match at the instant of the last accepted push.
///
/// Values are immutable once built; a new push produces a new snapshot that replaces
/// this one wholesale.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchSnapshot {
    /// Arena name.
    pub arena_name: Reported<String>,
    /// Game mode.
    pub game_type: Reported<String>,
    /// Base layout in use.
    pub base_used: Reported<String>,
    /// Roster in the order received.
    pub players: Vec<PlayerState>,
    /// Ingestion time of the push this snapshot was built from.
    pub last_updated: SystemTime,
    /// Winning team once the match has ended.
    pub winning_team: Reported<String>,
    /// Start time as sent by the bridge; not interpreted.
    pub game_start_time: Reported<String>,
    /// Match duration in milliseconds.
    pub game_duration_ms: Reported<u64>,
    /// Enrichment records passed through untouched.
    pub participant_data: Vec<Value>,
}

impl MatchSnapshot {
    /// Snapshot with no match details and an empty roster.
    pub fn empty(last_updated: SystemTime) -> Self {
        Self {
            arena_name: Reported::Missing,
            game_type: Reported::Missing,
            base_used: Reported::Missing,
            players: Vec::new(),
            last_updated,
            winning_team: Reported::Missing,
            game_start_time: Reported::Missing,
            game_duration_ms: Reported::Missing,
            participant_data: Vec::new(),
        }
    }

    /// Count players and spectators in the roster.
    pub fn roster_counts(&self) -> RosterCounts {
        RosterCounts::from_players(&self.players)
    }
}

/// Roster-derived head counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RosterCounts {
    /// Roster size.
    pub total: usize,
    /// Players assigned to a team.
    pub playing: usize,
    /// Players without a team.
    pub spectators: usize,
}

impl RosterCounts {
    /// Count the roster.
    pub fn from_players(players: &[PlayerState]) -> Self {
        let playing = players.iter().filter(|player| player.is_playing()).count();
        Self {
            total: players.len(),
            playing,
            spectators: players.len() - playing,
        }
    }
}
