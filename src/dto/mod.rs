use std::time::SystemTime;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

/// Health check payloads.
pub mod health;
/// Read-side match views and ingestion acknowledgements.
pub mod live_match;
/// Server-Sent Events payloads.
pub mod sse;
/// Bridge telemetry payloads.
pub mod telemetry;
/// Validation helpers.
pub mod validation;

pub(crate) fn format_system_time(time: SystemTime) -> String {
    OffsetDateTime::from(time)
        .format(&Rfc3339)
        .unwrap_or_else(|_| "invalid-timestamp".into())
}
