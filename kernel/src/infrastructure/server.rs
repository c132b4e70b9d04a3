use crate::api::{self, DispatcherState};
use crate::infrastructure::config::{BindAddress, Settings};
use axum::{Router, routing::get};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::future::Future;
use std::sync::Arc;

async fn health_check() -> &'static str {
    "OK"
}

/// Builds the dispatcher application: board routes plus health probes.
pub fn router(state: Arc<DispatcherState>) -> Router {
    Router::new()
        .route("/health/live", get(health_check))
        .route("/health/ready", get(health_check))
        .merge(api::routes().with_state(state))
}

/// Runs the dispatcher HTTP server with Prometheus metrics until `shutdown`
/// resolves.
///
/// # Errors
///
/// Returns an error if the metrics recorder cannot be installed, the address
/// cannot be bound, or the server fails while running.
pub async fn run_server<S>(
    config: &Settings,
    state: Arc<DispatcherState>,
    shutdown: S,
) -> anyhow::Result<()>
where
    S: Future<Output = ()> + Send + 'static,
{
    let builder = PrometheusBuilder::new();
    let handle = builder
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install Prometheus recorder: {e}"))?;

    let app = router(state).route("/metrics", get(move || std::future::ready(handle.render())));

    let addr = BindAddress::from(&config.server).to_socket_addr()?;

    tracing::info!("Dispatcher listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}
