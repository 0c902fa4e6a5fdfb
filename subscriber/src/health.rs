//! Health probe (§4.9): a synchronous check of the two critical
//! dependencies, store and bus.

use std::sync::Arc;
use std::time::Duration;

use casino_core::ports::Bus;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::metrics;
use crate::store::PostgresStore;

/// Deadline for the store ping (§5 "Store pings in health use a 1-second
/// deadline").
const STORE_PING_TIMEOUT: Duration = Duration::from_secs(1);

/// `GET /health` response body (§6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub healthy: bool,
    pub components: HealthComponents,
    pub timestamp: chrono::DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthComponents {
    pub database: String,
    pub nats: String,
}

/// Probes the store and the bus's live connection state on demand.
pub struct HealthCheck {
    store: Arc<PostgresStore>,
    bus: Arc<dyn Bus>,
}

impl std::fmt::Debug for HealthCheck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HealthCheck").finish_non_exhaustive()
    }
}

impl HealthCheck {
    #[must_use]
    pub fn new(store: Arc<PostgresStore>, bus: Arc<dyn Bus>) -> Self {
        Self { store, bus }
    }

    /// Run the health probe: `healthy = store_ok ∧ bus_ok` (§4.9).
    #[instrument(skip(self))]
    pub async fn check(&self) -> HealthResponse {
        let started = std::time::Instant::now();

        let store_ok = tokio::time::timeout(STORE_PING_TIMEOUT, self.store.ping())
            .await
            .is_ok_and(|result| result.is_ok());
        let bus_ok = self.bus.is_connected();

        metrics::health_check_duration_seconds(started.elapsed().as_secs_f64());
        metrics::database_connected(store_ok);
        metrics::nats_connected(bus_ok);
        metrics::health_check_timestamp_seconds(Utc::now().timestamp() as f64);
        metrics::component_status("database", if store_ok { "up" } else { "down" });
        metrics::component_status("nats", if bus_ok { "up" } else { "down" });

        HealthResponse {
            healthy: store_ok && bus_ok,
            components: HealthComponents {
                database: status_label(store_ok),
                nats: status_label(bus_ok),
            },
            timestamp: Utc::now(),
        }
    }
}

fn status_label(ok: bool) -> String {
    if ok { "up".to_string() } else { "down".to_string() }
}
