//! Metrics registry (§4.9, §6 metric names).
//!
//! A single [`PrometheusHandle`] is built once at startup and stored in
//! `AppState` (§9 Design Note: "Global metrics registry... model as a
//! process-wide metrics registry with lifecycle init-at-startup,
//! teardown-at-shutdown, passed by handle") — never a `lazy_static`/
//! `OnceCell` global. All metric names below are fixed for wire
//! compatibility (§6) and must not be renamed.

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the process-wide Prometheus recorder and return a handle that
/// renders the exposition text on demand.
///
/// # Errors
/// Returns an error if a recorder is already installed in this process.
pub fn install() -> Result<PrometheusHandle, metrics_exporter_prometheus::BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Counter: total raw events seen by the subscriber (§4.7 step 1).
pub fn events_processed_total() {
    counter!("casino_events_processed_total").increment(1);
}

/// Counter: events that survived the full enricher chain (§4.7 step 6).
pub fn events_enriched_total() {
    counter!("casino_events_enriched_total").increment(1);
}

/// Counter: any dropped-event or recoverable-stage error (§7).
pub fn enrichment_errors_total() {
    counter!("casino_enrichment_errors_total").increment(1);
}

/// Histogram: per-event processing latency (§4.7 step 6).
pub fn event_processing_duration_seconds(seconds: f64) {
    histogram!("casino_event_processing_duration_seconds").record(seconds);
}

/// Histogram: health-check probe latency (§4.9).
pub fn health_check_duration_seconds(seconds: f64) {
    histogram!("casino_health_check_duration_seconds").record(seconds);
}

/// Gauge: store connectivity, 1.0/0.0 (§4.9).
pub fn database_connected(connected: bool) {
    gauge!("casino_database_connected").set(if connected { 1.0 } else { 0.0 });
}

/// Gauge: bus connectivity, 1.0/0.0 (§4.9).
pub fn nats_connected(connected: bool) {
    gauge!("casino_nats_connected").set(if connected { 1.0 } else { 0.0 });
}

/// Gauge: overall process liveness, always 1.0 once the runtime is up.
pub fn service_up() {
    gauge!("casino_service_up").set(1.0);
}

/// Gauge: moving-average events/sec, refreshed alongside the 15s health
/// tick and whenever `/materialized` is computed (§4.6, §4.9).
pub fn events_per_second(value: f64) {
    gauge!("casino_events_per_second").set(value);
}

/// Gauge: Unix timestamp of the last health check (§4.9).
pub fn health_check_timestamp_seconds(timestamp: f64) {
    gauge!("casino_health_check_timestamp_seconds").set(timestamp);
}

/// Labelled gauge: top bettor by player id (§4.6, §6).
pub fn top_player_bets(player_id: i64, count: i64) {
    gauge!("casino_top_player_bets", "player_id" => player_id.to_string()).set(count as f64);
}

/// Labelled gauge: top winner by player id (§4.6, §6).
pub fn top_player_wins(player_id: i64, count: i64) {
    gauge!("casino_top_player_wins", "player_id" => player_id.to_string()).set(count as f64);
}

/// Labelled gauge: top depositor by player id (§4.6, §6).
pub fn top_player_deposits_eur(player_id: i64, count: i64) {
    gauge!("casino_top_player_deposits_eur", "player_id" => player_id.to_string()).set(count as f64);
}

/// Labelled gauge: per-component health status, 1.0 for the reported
/// `status` label value and implicitly 0 for the rest (§4.9, §6).
pub fn component_status(component: &str, status: &str) {
    gauge!(
        "casino_component_status",
        "component" => component.to_string(),
        "status" => status.to_string()
    )
    .set(1.0);
}
