//! Liveness classification of the stored snapshot based on the time since the last push.

use std::time::{Duration, SystemTime};

use serde::Serialize;
use utoipa::ToSchema;

/// Default age up to which a snapshot is considered live.
pub const DEFAULT_ACTIVE_AFTER: Duration = Duration::from_secs(30);
/// Default age after which a snapshot is no longer trusted at all.
pub const DEFAULT_IDLE_AFTER: Duration = Duration::from_secs(5 * 60);

/// How recently the bridge reported the match state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Activity {
    /// The bridge pushed within the active window.
    Active,
    /// The last push is older than the active window but still recent.
    Idle,
    /// No push yet, or the last one is too old to describe a live match.
    Unknown,
}

/// Age thresholds separating [`Activity`] levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StalenessThresholds {
    active: Duration,
    idle: Duration,
}

impl StalenessThresholds {
    /// Build thresholds, returning `None` when `active` exceeds `idle`.
    pub fn new(active: Duration, idle: Duration) -> Option<Self> {
        (active <= idle).then_some(Self { active, idle })
    }

    /// Largest age still classified as active.
    pub fn active(&self) -> Duration {
        self.active
    }

    /// Largest age still classified as idle.
    pub fn idle(&self) -> Duration {
        self.idle
    }
}

impl Default for StalenessThresholds {
    fn default() -> Self {
        Self {
            active: DEFAULT_ACTIVE_AFTER,
            idle: DEFAULT_IDLE_AFTER,
        }
    }
}

/// Age of a snapshot at `now`. Timestamps ahead of `now` count as fresh.
pub fn snapshot_age(last_updated: SystemTime, now: SystemTime) -> Duration {
    now.duration_since(last_updated).unwrap_or(Duration::ZERO)
}

/// Classify a snapshot last updated at `last_updated` as seen at `now`.
pub fn classify(
    last_updated: Option<SystemTime>,
    now: SystemTime,
    thresholds: &StalenessThresholds,
) -> Activity {
    let Some(last_updated) = last_updated else {
        return Activity::Unknown;
    };

    let age = snapshot_age(last_updated, now);
    if age <= thresholds.active {
        Activity::Active
    } else if age <= thresholds.idle {
        Activity::Idle
    } else {
        Activity::Unknown
    }
}
