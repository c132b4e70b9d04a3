//! Trellis kernel binary: serves the board dispatcher.

use std::sync::Arc;

use anyhow::Context;
use trellis_kernel::api::{DispatcherState, TokenAuthenticator};
use trellis_kernel::infrastructure::{audit, config::Settings, server, telemetry::TelemetryBuilder};
use trellis_kernel::remote::RemoteBoardClient;
use tokio::signal;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Settings::new().context("Failed to load configuration")?;

    TelemetryBuilder::from_settings(&config.telemetry, env!("CARGO_PKG_VERSION"))
        .init()
        .context("Failed to initialize telemetry")?;

    info!("Trellis Kernel Starting...");
    audit::log_audit(&audit::AuditEvent::SystemStartup {
        component: "Dispatcher".into(),
    });

    let remote_config = config
        .remote
        .to_remote_config()
        .context("Invalid remote configuration")?;
    let client = RemoteBoardClient::new(remote_config, config.discovery.clone())
        .context("Failed to build remote board client")?;

    let auth = TokenAuthenticator::new(&config.auth.tokens);
    if auth.token_count() == 0 {
        warn!("No dispatcher tokens configured; every request will be rejected");
    }
    let state = Arc::new(DispatcherState::new(Arc::new(client), auth));

    info!(
        owner = %config.remote.owner,
        repository = %config.remote.repository,
        "Trellis Kernel Initialized. Serving until shutdown signal..."
    );

    if let Err(e) = server::run_server(&config, state, shutdown_signal()).await {
        error!("Dispatcher failed: {:?}", e);
        return Err(e);
    }

    info!("Shutdown signal received, cleaning up...");
    audit::log_audit(&audit::AuditEvent::SystemShutdown {
        reason: "Signal received".into(),
    });

    info!("Trellis Kernel Shutdown Complete.");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
