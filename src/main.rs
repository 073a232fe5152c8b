//! Symptom Triage Engine — Binary Entrypoint
//! Boots the Axum HTTP server, wiring the engine snapshot, routes, and
//! the Prometheus exporter. The UI collaborator talks to this over HTTP.

use std::net::SocketAddr;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use symptom_triage_engine::api::{self, AppState};
use symptom_triage_engine::config::EngineConfig;
use symptom_triage_engine::metrics::Metrics;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op in prod environments. This enables
    // TRIAGE_ASSET_DIR / TRIAGE_MATCH_THRESHOLD etc. from .env.
    let _ = dotenvy::dotenv();
    init_tracing();

    let config = EngineConfig::from_env()?;
    let state = AppState::from_config(config)?;
    let metrics = Metrics::init(state.disease_count());

    let router = api::create_router(state).merge(metrics.router());

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8000);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "symptom triage engine listening");
    axum::serve(listener, router).await?;
    Ok(())
}
