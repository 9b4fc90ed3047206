//! Payloads pushed by the game-server bridge and their conversion into a [`MatchSnapshot`].

use std::{collections::HashSet, time::SystemTime};

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use serde_with::{DefaultOnNull, serde_as};
use tracing::warn;
use utoipa::ToSchema;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{
    dto::validation::validate_alias,
    state::live_match::{MatchSnapshot, PlayerState, Reported},
};

/// Complete state of the current match as reported by the bridge.
///
/// Every field is optional: an empty object is a valid push meaning "no active match".
/// Keys that are absent stay unreported, keys sent as `null` are recorded as such, and
/// unknown keys are ignored. Player entries without a usable alias are dropped.
#[serde_as]
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MatchPayload {
    /// Arena name.
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub arena_name: Option<Option<String>>,
    /// Game mode.
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub game_type: Option<Option<String>>,
    /// Base layout in use.
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub base_used: Option<Option<String>>,
    /// Roster at the time of the push; `null` is treated as an empty roster.
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub players: Vec<PlayerPayload>,
    /// Winning team once the match has ended.
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub winning_team: Option<Option<String>>,
    /// Start time, not interpreted.
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub game_start_time: Option<Option<String>>,
    /// Match duration in milliseconds.
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<u64>)]
    pub game_duration_ms: Option<Option<u64>>,
    /// Opaque enrichment records, stored and returned untouched.
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    #[schema(value_type = Vec<Object>)]
    pub participant_data: Vec<Value>,
}

/// State of one player inside a [`MatchPayload`].
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlayerPayload {
    /// Entries whose alias is missing, null, or invalid are skipped.
    #[serde(default)]
    pub alias: Option<String>,
    /// Team name; `null` or blank marks a spectator.
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub team: Option<Option<String>>,
    /// Team category.
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub team_type: Option<Option<String>>,
    /// Current class.
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub class_name: Option<Option<String>>,
    /// Whether the player is on offense.
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<bool>)]
    pub is_offense: Option<Option<bool>>,
    /// Equipped weapon.
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub weapon: Option<Option<String>>,
    /// Cumulative seconds played per class.
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<Object>)]
    pub class_play_times: Option<Option<IndexMap<String, Option<f64>>>>,
    /// Total seconds played.
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<f64>)]
    pub total_play_time: Option<Option<f64>>,
    /// Whether the player reports being in a duel.
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<bool>)]
    pub is_dueling: Option<Option<bool>>,
    /// Alias of the opponent when `isDueling` is true.
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub duel_opponent: Option<Option<String>>,
    /// Duel type claimed by this player.
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub duel_type: Option<Option<String>>,
    /// Current health; fractional values are kept.
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<f64>)]
    pub current_health: Option<Option<f64>>,
    /// Current energy; fractional values are kept.
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<f64>)]
    pub current_energy: Option<Option<f64>>,
    /// Whether the player is alive.
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<bool>)]
    pub is_alive: Option<Option<bool>>,
}

impl Validate for PlayerPayload {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let checked = match self.alias.as_deref() {
            Some(alias) => validate_alias(alias),
            None => {
                let mut err = ValidationError::new("alias_missing");
                err.message = Some("Player alias is required".into());
                Err(err)
            }
        };
        if let Err(e) = checked {
            errors.add("alias", e);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl MatchPayload {
    /// Normalize the payload into a snapshot stamped with `received_at`.
    ///
    /// Strings are trimmed and blank optional strings become null. Entries failing
    /// alias validation are dropped, and when an alias appears more than once only its
    /// first entry is kept.
    pub fn into_snapshot(self, received_at: SystemTime) -> MatchSnapshot {
        let mut seen = HashSet::with_capacity(self.players.len());
        let mut players = Vec::with_capacity(self.players.len());
        for (index, payload) in self.players.into_iter().enumerate() {
            if let Err(err) = payload.validate() {
                warn!(index, error = %err, "dropping player entry from push");
                continue;
            }

            let player = PlayerState::from(payload);
            if seen.insert(player.alias.clone()) {
                players.push(player);
            } else {
                warn!(alias = %player.alias, "dropping duplicate player alias from push");
            }
        }

        MatchSnapshot {
            arena_name: Reported::from(self.arena_name).trimmed(),
            game_type: Reported::from(self.game_type).trimmed(),
            base_used: Reported::from(self.base_used).trimmed(),
            players,
            last_updated: received_at,
            winning_team: Reported::from(self.winning_team).trimmed(),
            game_start_time: Reported::from(self.game_start_time).trimmed(),
            game_duration_ms: self.game_duration_ms.into(),
            participant_data: self.participant_data,
        }
    }
}

impl From<PlayerPayload> for PlayerState {
    fn from(value: PlayerPayload) -> Self {
        Self {
            alias: value.alias.as_deref().unwrap_or_default().trim().to_owned(),
            team: Reported::from(value.team).trimmed(),
            team_type: Reported::from(value.team_type).trimmed(),
            class_name: Reported::from(value.class_name).trimmed(),
            is_offense: value.is_offense.into(),
            weapon: Reported::from(value.weapon).trimmed(),
            class_play_times: Reported::from(value.class_play_times).map(|times| {
                times
                    .into_iter()
                    .filter_map(|(class, secs)| secs.map(|secs| (class, secs)))
                    .collect()
            }),
            total_play_time: value.total_play_time.into(),
            is_dueling: value.is_dueling.into(),
            duel_opponent: Reported::from(value.duel_opponent).trimmed(),
            duel_type: Reported::from(value.duel_type).trimmed(),
            current_health: value.current_health.into(),
            current_energy: value.current_energy.into(),
            is_alive: value.is_alive.into(),
        }
    }
}
