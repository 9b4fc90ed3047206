use utoipa::OpenApi;

/// OpenAPI document covering every public route.
#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the live match service.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::sse::live_stream,
        crate::routes::telemetry::ingest_match,
        crate::routes::telemetry::get_live_match,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::telemetry::MatchPayload,
            crate::dto::telemetry::PlayerPayload,
            crate::dto::live_match::IngestAck,
            crate::dto::live_match::LiveMatchView,
            crate::dto::live_match::PlayerView,
            crate::dto::live_match::DuelView,
            crate::dto::live_match::DuelClaims,
            crate::dto::sse::MatchUpdatedEvent,
            crate::dto::sse::ActivityChangedEvent,
            crate::services::staleness::Activity,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "sse", description = "Server-sent events streams"),
        (name = "telemetry", description = "Live match ingestion and snapshot reads"),
    )
)]
pub struct ApiDoc;
