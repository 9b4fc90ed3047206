//! Background task announcing changes of the bridge activity classification.

use std::time::SystemTime;

use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info};

use crate::{
    services::{
        sse_events,
        staleness::{self, Activity},
    },
    state::{CurrentSnapshot, SharedState},
};

/// Tracks the last announced classification and reports transitions.
#[derive(Debug)]
pub struct ActivityTracker {
    last: Activity,
}

impl ActivityTracker {
    /// Start from [`Activity::Unknown`], the classification of an empty store.
    pub fn new() -> Self {
        Self {
            last: Activity::Unknown,
        }
    }

    /// Record `current` and return the previous value when it differs.
    pub fn observe(&mut self, current: Activity) -> Option<Activity> {
        if current == self.last {
            return None;
        }
        Some(std::mem::replace(&mut self.last, current))
    }
}

impl Default for ActivityTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Re-classify the stored snapshot on every store change and every poll tick,
/// broadcasting each transition on the live SSE stream.
pub async fn run_activity_monitor(state: SharedState) {
    let mut changes = state.snapshots().subscribe();
    let mut ticker = interval(state.config().activity_poll());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut tracker = ActivityTracker::new();

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            changed = changes.changed() => {
                if changed.is_err() {
                    debug!("snapshot store dropped; stopping activity monitor");
                    return;
                }
            }
        }

        let current = classify_current(&changes.borrow_and_update(), &state);
        if let Some(previous) = tracker.observe(current) {
            info!(?previous, ?current, "bridge activity changed");
            sse_events::broadcast_activity_changed(&state, previous, current);
        }
    }
}

fn classify_current(snapshot: &CurrentSnapshot, state: &SharedState) -> Activity {
    staleness::classify(
        snapshot.as_ref().map(|snapshot| snapshot.last_updated),
        SystemTime::now(),
        state.config().staleness(),
    )
}
