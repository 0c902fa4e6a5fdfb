//! The subscriber runtime (§4.7): bus subscription, enricher dispatch,
//! republish, aggregator/materializer feed, and the three background
//! tasks (HTTP server, rate-refresh ticker, 15s health-metric ticker).

use std::sync::Arc;
use std::time::{Duration, Instant};

use casino_core::ports::Bus;
use metrics_exporter_prometheus::PrometheusHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument, warn};

use crate::aggregator::Aggregator;
use crate::enrich::{EnrichOutcome, EnricherChain};
use crate::health::HealthCheck;
use crate::http::{self, AppState};
use crate::materializer::Materializer;
use crate::metrics;
use crate::rate_cache::RateCache;

/// 15-second health-metric refresh cadence (§4.7(c)).
const HEALTH_TICK: Duration = Duration::from_secs(15);

/// Everything the subscriber binary needs to run, injected at construction
/// (§9 Design Note (a)/(b): explicit construction, shared store/cache
/// handles, no runtime downcasting or hidden back-references).
pub struct Service {
    bus: Arc<dyn Bus>,
    chain: Arc<EnricherChain>,
    aggregator: Arc<Aggregator>,
    materializer: Arc<Materializer>,
    rate_cache: Arc<RateCache>,
    health: Arc<HealthCheck>,
    metrics_handle: PrometheusHandle,
    http_port: u16,
    refresh_interval: Duration,
}

impl Service {
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        bus: Arc<dyn Bus>,
        chain: Arc<EnricherChain>,
        aggregator: Arc<Aggregator>,
        materializer: Arc<Materializer>,
        rate_cache: Arc<RateCache>,
        health: Arc<HealthCheck>,
        metrics_handle: PrometheusHandle,
        http_port: u16,
        refresh_interval: Duration,
    ) -> Self {
        Self {
            bus,
            chain,
            aggregator,
            materializer,
            rate_cache,
            health,
            metrics_handle,
            http_port,
            refresh_interval,
        }
    }

    /// Run until `cancel` fires. Spawns the three background tasks and
    /// drives the raw-event dispatch loop on the calling task.
    ///
    /// # Errors
    /// Returns an error if the bus subscription cannot be established or
    /// the HTTP listener cannot bind — both startup-fatal (§7).
    pub async fn run(self: Arc<Self>, cancel: CancellationToken) -> casino_core::error::Result<()> {
        metrics::service_up();

        let http_task = tokio::spawn(self.clone().serve_http(cancel.clone()));
        let refresh_task = tokio::spawn(self.clone().run_refresh_ticker(cancel.clone()));
        let health_task = tokio::spawn(self.clone().run_health_ticker(cancel.clone()));

        self.dispatch_loop(cancel.clone()).await?;

        cancel.cancel();
        let _ = tokio::join!(http_task, refresh_task, health_task);
        Ok(())
    }

    /// The per-message dispatch loop (§4.7 steps 1-6).
    async fn dispatch_loop(&self, cancel: CancellationToken) -> casino_core::error::Result<()> {
        let mut raw = self.bus.subscribe_raw().await?;
        info!("subscribed to raw event topic");

        loop {
            let event = tokio::select! {
                () = cancel.cancelled() => break,
                event = raw.recv() => match event {
                    Some(event) => event,
                    None => {
                        warn!("raw subscription closed");
                        break;
                    }
                },
            };

            self.process_one(event, &cancel).await;
        }

        Ok(())
    }

    #[instrument(skip(self, cancel), fields(event_id = event.id))]
    async fn process_one(&self, mut event: casino_core::types::Event, cancel: &CancellationToken) {
        let started = Instant::now();

        let outcome = self.chain.run(&mut event, cancel).await;
        if outcome == EnrichOutcome::Aborted {
            metrics::enrichment_errors_total();
            return;
        }

        if let Err(err) = self.bus.publish_enriched(&event).await {
            warn!(error = %err, "publish to enriched topic failed, dropping event");
            metrics::enrichment_errors_total();
            return;
        }

        // O2: aggregate/materialize happen-before the enriched publish is
        // observable to outside callers (both run exactly once here).
        self.aggregator.record(&event);
        self.materializer.record(&event);

        metrics::events_enriched_total();
        metrics::event_processing_duration_seconds(started.elapsed().as_secs_f64());
    }

    async fn serve_http(self: Arc<Self>, cancel: CancellationToken) {
        let state = AppState {
            aggregator: self.aggregator.clone(),
            materializer: self.materializer.clone(),
            health: self.health.clone(),
            metrics_handle: self.metrics_handle.clone(),
        };
        let app = http::router(state);

        let addr = format!("0.0.0.0:{}", self.http_port);
        let listener = match tokio::net::TcpListener::bind(&addr).await {
            Ok(listener) => listener,
            Err(err) => {
                error!(error = %err, %addr, "failed to bind HTTP listener");
                return;
            }
        };
        info!(%addr, "HTTP surface listening");

        let shutdown = async move { cancel.cancelled().await };
        if let Err(err) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
        {
            error!(error = %err, "HTTP server exited with error");
        }
    }

    async fn run_refresh_ticker(self: Arc<Self>, cancel: CancellationToken) {
        let mut interval = tokio::time::interval(self.refresh_interval);
        interval.tick().await; // first tick fires immediately; consume it
        loop {
            tokio::select! {
                () = cancel.cancelled() => break,
                _ = interval.tick() => {
                    match self.rate_cache.refresh().await {
                        Ok(()) => info!("scheduled rate refresh succeeded"),
                        Err(err) => warn!(error = %err, "scheduled rate refresh failed, next tick retries"),
                    }
                }
            }
        }
    }

    async fn run_health_ticker(self: Arc<Self>, cancel: CancellationToken) {
        let mut interval = tokio::time::interval(HEALTH_TICK);
        loop {
            tokio::select! {
                () = cancel.cancelled() => break,
                _ = interval.tick() => {
                    let _ = self.health.check().await;
                    let data = self.materializer.get_data();
                    metrics::events_per_second(data.events_per_second_moving_average);
                }
            }
        }
    }
}
