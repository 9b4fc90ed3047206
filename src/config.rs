//! Application-level configuration loading: staleness thresholds, ingestion limits, and the
//! bridge shared secret.

use std::{env, fs, io::ErrorKind, path::PathBuf, time::Duration};

use serde::Deserialize;
use tracing::{info, warn};

use crate::services::staleness::StalenessThresholds;

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "ARENA_LIVE_CONFIG_PATH";
/// Environment variable that overrides the configured bridge secret.
const BRIDGE_SECRET_ENV: &str = "ARENA_BRIDGE_SECRET";
const DEFAULT_MAX_PLAYERS: usize = 256;
const DEFAULT_MAX_PAYLOAD_BYTES: usize = 1024 * 1024;
const DEFAULT_ACTIVITY_POLL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    staleness: StalenessThresholds,
    bridge_secret: Option<String>,
    max_players: usize,
    max_payload_bytes: usize,
    activity_poll: Duration,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to built-in defaults.
    ///
    /// The bridge secret from [`BRIDGE_SECRET_ENV`] wins over the one found in the file.
    pub fn load() -> Self {
        let path = resolve_config_path();
        let config = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let app_config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        active_secs = app_config.staleness.active().as_secs(),
                        idle_secs = app_config.staleness.idle().as_secs(),
                        "loaded configuration"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        };

        match env::var(BRIDGE_SECRET_ENV) {
            Ok(secret) if !secret.trim().is_empty() => config.with_bridge_secret(secret),
            _ => config,
        }
    }

    /// Replace the shared secret expected from the bridge.
    pub fn with_bridge_secret(mut self, secret: impl Into<String>) -> Self {
        self.bridge_secret = Some(secret.into());
        self
    }

    /// Replace the staleness thresholds.
    pub fn with_staleness(mut self, staleness: StalenessThresholds) -> Self {
        self.staleness = staleness;
        self
    }

    /// Replace the maximum roster size accepted in one push.
    pub fn with_max_players(mut self, max_players: usize) -> Self {
        self.max_players = max_players;
        self
    }

    /// Replace the maximum accepted ingestion body size.
    pub fn with_max_payload_bytes(mut self, max_payload_bytes: usize) -> Self {
        self.max_payload_bytes = max_payload_bytes;
        self
    }

    /// Thresholds separating active, idle, and unknown bridges.
    pub fn staleness(&self) -> &StalenessThresholds {
        &self.staleness
    }

    /// Shared secret the bridge must present, if ingestion is guarded.
    pub fn bridge_secret(&self) -> Option<&str> {
        self.bridge_secret.as_deref()
    }

    /// Largest roster accepted in one push.
    pub fn max_players(&self) -> usize {
        self.max_players
    }

    /// Upper bound on the size of an ingestion request body.
    pub fn max_payload_bytes(&self) -> usize {
        self.max_payload_bytes
    }

    /// Interval at which the activity monitor re-evaluates staleness.
    pub fn activity_poll(&self) -> Duration {
        self.activity_poll
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            staleness: StalenessThresholds::default(),
            bridge_secret: None,
            max_players: DEFAULT_MAX_PLAYERS,
            max_payload_bytes: DEFAULT_MAX_PAYLOAD_BYTES,
            activity_poll: DEFAULT_ACTIVITY_POLL,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    #[serde(default)]
    staleness: RawStaleness,
    bridge_secret: Option<String>,
    max_players: Option<usize>,
    max_payload_bytes: Option<usize>,
    activity_poll_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Staleness thresholds, in seconds.
struct RawStaleness {
    active_secs: Option<u64>,
    idle_secs: Option<u64>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let defaults = Self::default();
        Self {
            staleness: value.staleness.into(),
            bridge_secret: value
                .bridge_secret
                .filter(|secret| !secret.trim().is_empty()),
            max_players: value.max_players.unwrap_or(defaults.max_players),
            max_payload_bytes: value
                .max_payload_bytes
                .unwrap_or(defaults.max_payload_bytes),
            activity_poll: value
                .activity_poll_secs
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.activity_poll),
        }
    }
}

impl From<RawStaleness> for StalenessThresholds {
    fn from(value: RawStaleness) -> Self {
        let defaults = StalenessThresholds::default();
        let active = value
            .active_secs
            .map(Duration::from_secs)
            .unwrap_or(defaults.active());
        let idle = value
            .idle_secs
            .map(Duration::from_secs)
            .unwrap_or(defaults.idle());

        StalenessThresholds::new(active, idle).unwrap_or_else(|| {
            warn!(
                active_secs = active.as_secs(),
                idle_secs = idle.as_secs(),
                "active threshold exceeds idle threshold; using defaults"
            );
            defaults
        })
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}
