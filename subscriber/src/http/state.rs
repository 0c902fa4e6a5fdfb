//! Shared state handed to every axum handler.

use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;

use crate::aggregator::Aggregator;
use crate::health::HealthCheck;
use crate::materializer::Materializer;

/// Everything an HTTP handler needs, cloned cheaply per request (all
/// fields are `Arc`s or a `Clone`-cheap handle).
#[derive(Clone)]
pub struct AppState {
    pub aggregator: Arc<Aggregator>,
    pub materializer: Arc<Materializer>,
    pub health: Arc<HealthCheck>,
    pub metrics_handle: PrometheusHandle,
}
