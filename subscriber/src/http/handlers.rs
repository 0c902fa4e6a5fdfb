//! Route handlers (§6).

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::aggregator::AggregateSnapshot;
use crate::materializer::MaterializedSnapshot;
use crate::metrics;

use super::state::AppState;

/// Build the router exposing the four fixed routes (§6), with a
/// `tower-http` tracing layer on every request, matching the teacher's
/// `tower`/`tower-http` layering.
#[must_use]
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/aggregates", get(aggregates))
        .route("/materialized", get(materialized))
        .route("/metrics", get(render_metrics))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// `GET /health` → 200 when healthy, 503 otherwise (§6, §4.9).
async fn health(State(state): State<AppState>) -> (StatusCode, Json<crate::health::HealthResponse>) {
    let response = state.health.check().await;
    let status = if response.healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(response))
}

/// `GET /aggregates` → the aggregator snapshot (§6).
async fn aggregates(State(state): State<AppState>) -> Json<AggregateSnapshot> {
    Json(state.aggregator.snapshot())
}

/// `GET /materialized` → the materializer snapshot, refreshing the
/// labelled leaderboard gauges as a side effect (§6, §4.9).
async fn materialized(State(state): State<AppState>) -> Json<MaterializedSnapshot> {
    let snapshot = state.materializer.get_data();

    metrics::events_per_second(snapshot.events_per_second_moving_average);
    metrics::top_player_bets(snapshot.top_player_bets.id, snapshot.top_player_bets.count);
    metrics::top_player_wins(snapshot.top_player_wins.id, snapshot.top_player_wins.count);
    metrics::top_player_deposits_eur(
        snapshot.top_player_deposits.id,
        snapshot.top_player_deposits.count,
    );

    Json(snapshot)
}

/// `GET /metrics` → Prometheus exposition text (§6).
async fn render_metrics(State(state): State<AppState>) -> String {
    state.metrics_handle.render()
}
