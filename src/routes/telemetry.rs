use axum::{
    Json, Router,
    body::Body,
    extract::{
        DefaultBodyLimit, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::Request,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use tracing::warn;

use crate::{
    dto::{
        live_match::{IngestAck, LiveMatchQuery, LiveMatchView},
        telemetry::MatchPayload,
    },
    error::AppError,
    services::{ingest_service, snapshot_service},
    state::SharedState,
};

const BRIDGE_SECRET_HEADER: &str = "x-bridge-secret";

/// Bridge ingestion and client read endpoints for the live match snapshot.
pub fn router(state: SharedState) -> Router<SharedState> {
    let body_limit = state.config().max_payload_bytes();
    let ingest = post(ingest_match)
        .layer(DefaultBodyLimit::max(body_limit))
        .route_layer(middleware::from_fn_with_state(state, require_bridge_secret));

    Router::new().route("/telemetry/match", get(get_live_match).merge(ingest))
}

/// Accept a complete match state pushed by the game-server bridge.
#[utoipa::path(
    post,
    path = "/telemetry/match",
    tag = "telemetry",
    params(("X-Bridge-Secret" = Option<String>, Header, description = "Shared secret, required when configured")),
    request_body = MatchPayload,
    responses(
        (status = 200, description = "Snapshot replaced", body = IngestAck),
        (status = 400, description = "Malformed payload; snapshot unchanged"),
        (status = 401, description = "Missing or invalid bridge secret"),
        (status = 413, description = "Payload exceeds the configured size limit")
    )
)]
pub async fn ingest_match(
    State(state): State<SharedState>,
    payload: Result<Json<MatchPayload>, JsonRejection>,
) -> Result<Json<IngestAck>, AppError> {
    let Json(payload) = payload.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "rejecting malformed telemetry push");
        AppError::from(rejection)
    })?;

    let ack = ingest_service::ingest(&state, payload)?;
    Ok(Json(ack))
}

/// Return the current match view with activity, roster counts, and duels.
#[utoipa::path(
    get,
    path = "/telemetry/match",
    tag = "telemetry",
    params(LiveMatchQuery),
    responses(
        (status = 200, description = "Current match view", body = LiveMatchView),
        (status = 400, description = "Malformed query string")
    )
)]
pub async fn get_live_match(
    State(state): State<SharedState>,
    query: Result<Query<LiveMatchQuery>, QueryRejection>,
) -> Result<Json<LiveMatchView>, AppError> {
    let Query(query) = query.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "rejecting malformed match query");
        AppError::from(rejection)
    })?;

    Ok(Json(snapshot_service::live_view(&state, &query)))
}

async fn require_bridge_secret(
    State(state): State<SharedState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let provided = req
        .headers()
        .get(BRIDGE_SECRET_HEADER)
        .and_then(|value| value.to_str().ok());

    if let Err(err) = ingest_service::authorize(state.config(), provided) {
        warn!(error = %err, "rejecting unauthenticated telemetry push");
        return Err(err.into());
    }

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{self, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{Value, json};
    use tower::ServiceExt; // for `oneshot`

    use crate::{config::AppConfig, routes, state::AppState};

    fn push(body: impl Into<Body>, secret: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/telemetry/match")
            .header("content-type", "application/json");
        if let Some(secret) = secret {
            builder = builder.header("x-bridge-secret", secret);
        }
        builder.body(body.into()).unwrap()
    }

    fn read(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn read_before_any_push_is_empty_view() {
        let app = routes::router(AppState::new(AppConfig::default()));
        let resp = app.oneshot(read("/telemetry/match")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let view = json_body(resp).await;
        assert_eq!(view["activity"], "unknown");
        assert_eq!(view["totalPlayers"], 0);
        assert_eq!(view["lastUpdated"], Value::Null);
    }

    #[tokio::test]
    async fn push_then_read_returns_derived_view() {
        let app = routes::router(AppState::new(AppConfig::default()));
        let payload = json!({
            "arenaName": "Twin Peaks",
            "participantData": [{ "alias": "A" }],
            "players": [
                { "alias": "A", "team": "Red", "isDueling": true, "duelOpponent": "B" },
                { "alias": "B", "team": "Red", "isDueling": true, "duelOpponent": "A" },
                { "alias": "C", "team": null }
            ]
        });

        let resp = app
            .clone()
            .oneshot(push(payload.to_string(), None))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let ack = json_body(resp).await;
        assert_eq!(ack["accepted"], true);
        assert_eq!(ack["players"], 3);

        let resp = app
            .oneshot(read("/telemetry/match?includeParticipants=true"))
            .await
            .unwrap();
        let view = json_body(resp).await;
        assert_eq!(view["activity"], "active");
        assert_eq!(view["arenaName"], "Twin Peaks");
        assert_eq!(view["playingPlayers"], 2);
        assert_eq!(view["spectators"], 1);
        assert_eq!(view["duels"].as_array().map(Vec::len), Some(1));
        assert_eq!(view["duels"][0]["duelType"], "unspecified");
        assert_eq!(view["participantData"][0]["alias"], "A");
    }

    #[tokio::test]
    async fn malformed_push_is_rejected_without_mutation() {
        let state = AppState::new(AppConfig::default());
        let app = routes::router(state.clone());

        let resp = app
            .clone()
            .oneshot(push(json!({ "players": [{ "alias": "A" }] }).to_string(), None))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let before = state.snapshots().read();

        for body in ["{not json", r#"{"players": "everyone"}"#, r#"{"players": [{"alias": 7}]}"#] {
            let resp = app.clone().oneshot(push(body, None)).await.unwrap();
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "body: {body}");
            let error = json_body(resp).await;
            assert_eq!(error["accepted"], false);
            assert!(error["message"].as_str().is_some_and(|m| !m.is_empty()));
        }

        assert_eq!(state.snapshots().read(), before);
    }

    #[tokio::test]
    async fn push_with_alias_less_player_stores_the_rest() {
        let state = AppState::new(AppConfig::default());
        let app = routes::router(state.clone());
        let payload = json!({
            "arenaName": "X",
            "players": [{ "alias": "A", "team": "Red" }, { "team": "Blue" }]
        });

        let resp = app.oneshot(push(payload.to_string(), None)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(json_body(resp).await["players"], 1);

        let snapshot = state.snapshots().read().expect("snapshot stored");
        assert_eq!(snapshot.players.len(), 1);
        assert_eq!(snapshot.players[0].alias, "A");
    }

    #[tokio::test]
    async fn fractional_combat_values_are_accepted() {
        let app = routes::router(AppState::new(AppConfig::default()));
        let payload = json!({
            "players": [{
                "alias": "A",
                "currentHealth": 80.5,
                "currentEnergy": 12.25,
                "classPlayTimes": { "Heavy": null, "Medic": 4.5 }
            }]
        });

        let resp = app
            .clone()
            .oneshot(push(payload.to_string(), None))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let view = json_body(app.oneshot(read("/telemetry/match")).await.unwrap()).await;
        assert_eq!(view["players"][0]["currentHealth"], 80.5);
        assert_eq!(view["players"][0]["currentEnergy"], 12.25);
        assert_eq!(view["players"][0]["classPlayTimes"], json!({ "Medic": 4.5 }));
    }

    #[tokio::test]
    async fn malformed_query_gets_json_error() {
        let app = routes::router(AppState::new(AppConfig::default()));
        let resp = app
            .oneshot(read("/telemetry/match?includeParticipants=yes"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let error = json_body(resp).await;
        assert_eq!(error["accepted"], false);
        assert!(error["message"].as_str().is_some_and(|m| !m.is_empty()));
    }

    #[tokio::test]
    async fn oversized_push_is_rejected() {
        let config = AppConfig::default().with_max_payload_bytes(64);
        let state = AppState::new(config);
        let app = routes::router(state.clone());

        let players: Vec<Value> = (0..20).map(|i| json!({ "alias": format!("p{i}") })).collect();
        let resp = app
            .oneshot(push(json!({ "players": players }).to_string(), None))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert!(state.snapshots().read().is_none());
    }

    #[tokio::test]
    async fn configured_secret_guards_ingestion_only() {
        let state = AppState::new(AppConfig::default().with_bridge_secret("s3cret"));
        let app = routes::router(state.clone());
        let body = json!({ "players": [] }).to_string();

        let resp = app.clone().oneshot(push(body.clone(), None)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let resp = app
            .clone()
            .oneshot(push(body.clone(), Some("wrong")))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert!(state.snapshots().read().is_none());

        let resp = app
            .clone()
            .oneshot(push(body, Some("s3cret")))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = app.oneshot(read("/telemetry/match")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
