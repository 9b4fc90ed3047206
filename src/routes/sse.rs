use std::convert::Infallible;

use axum::{Router, extract::State, response::sse::Sse, routing::get};
use futures::Stream;
use tracing::info;

use crate::{services::sse_service, state::SharedState};

#[utoipa::path(
    get,
    path = "/sse/live",
    tag = "sse",
    responses((status = 200, description = "Live match SSE stream", content_type = "text/event-stream", body = String))
)]
/// Stream match updates and bridge activity changes to connected frontends.
pub async fn live_stream(
    State(state): State<SharedState>,
) -> Sse<impl Stream<Item = Result<axum::response::sse::Event, Infallible>>> {
    let receiver = sse_service::subscribe_live(&state);
    info!(
        subscribers = state.live_sse().subscriber_count(),
        "New live SSE connection"
    );
    sse_service::broadcast_live_info(state.live_sse(), "live stream connected");
    sse_service::to_sse_stream(receiver)
}

/// Configure the SSE endpoints.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new().route("/sse/live", get(live_stream))
}
