/// Match snapshot model.
pub mod live_match;
mod snapshot_store;
mod sse;

use std::sync::Arc;

use crate::config::AppConfig;

pub use self::snapshot_store::{CurrentSnapshot, SnapshotStore};
pub use self::sse::SseHub;

/// Application state shared by handlers and background tasks.
pub type SharedState = Arc<AppState>;

/// Capacity of the live SSE broadcast channel.
const LIVE_SSE_CAPACITY: usize = 32;

/// Central application state: configuration, the match snapshot, and the live event hub.
pub struct AppState {
    config: AppConfig,
    snapshots: SnapshotStore,
    live_sse: SseHub,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    ///
    /// The snapshot store starts empty until the bridge pushes for the first time.
    pub fn new(config: AppConfig) -> SharedState {
        Arc::new(Self {
            config,
            snapshots: SnapshotStore::new(),
            live_sse: SseHub::new(LIVE_SSE_CAPACITY),
        })
    }

    /// Runtime configuration loaded at startup.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Store holding the current match snapshot.
    pub fn snapshots(&self) -> &SnapshotStore {
        &self.snapshots
    }

    /// Broadcast hub used for the live SSE stream.
    pub fn live_sse(&self) -> &SseHub {
        &self.live_sse
    }
}
