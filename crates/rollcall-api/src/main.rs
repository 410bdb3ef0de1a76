//! # rollcall-api — Binary Entry Point
//!
//! Starts the Axum HTTP server over an in-memory store. Binds to a
//! configurable port (default 8080) and serves Prometheus metrics at
//! `/metrics`.

use axum::routing::get;
use metrics_exporter_prometheus::PrometheusBuilder;

use rollcall_api::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    let prometheus = PrometheusBuilder::new().install_recorder().map_err(|e| {
        tracing::error!("Prometheus recorder installation failed: {e}");
        e
    })?;

    let state = AppState::in_memory();
    let app = rollcall_api::app(state)
        .route("/metrics", get(move || async move { prometheus.render() }));

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Rollcall API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
