//! sonar-exporter
//!
//! Polls a SonarQube server every interval and serves the results as
//! Prometheus gauges on `/metrics`.

use std::net::SocketAddr;
use tracing_subscriber::{fmt, EnvFilter};

use sonar_exporter_agent::{app_state, config, fetch::SonarClient, poller::Poller, router};
use sonar_exporter_core::error::{ExporterError, Result};

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    let cfg = config::load()?;
    let listen: SocketAddr = cfg
        .listen
        .parse()
        .map_err(|e| ExporterError::Config(format!("listen must be a valid SocketAddr: {e}")))?;
    let client = SonarClient::new(&cfg.sonar)?;

    let state = app_state::AppState::new(cfg);
    let app = router::build_router(state.clone());

    // Bind before polling so scrapes are served from the start.
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| ExporterError::Internal(format!("failed to bind {listen}: {e}")))?;
    tracing::info!(%listen, sonar = %state.cfg().sonar.base_url, "sonar-exporter starting");

    tokio::spawn(Poller::new(client, state).run());

    axum::serve(listener, app)
        .await
        .map_err(|e| ExporterError::Internal(format!("server failed: {e}")))
}
