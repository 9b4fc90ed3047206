/// Background classification of bridge activity.
pub mod activity_monitor;
/// OpenAPI documentation generation.
pub mod documentation;
/// Duel pairing derivation from player duel flags.
pub mod duels;
/// Health check service.
pub mod health_service;
/// Validation and storage of bridge telemetry pushes.
pub mod ingest_service;
/// Client view of the stored match snapshot.
pub mod snapshot_service;
/// Server-Sent Events message generation.
pub mod sse_events;
/// Server-Sent Events broadcasting service.
pub mod sse_service;
/// Snapshot liveness classification.
pub mod staleness;
