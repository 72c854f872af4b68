pub mod api;
pub mod config;
pub mod error;
pub mod gateway;
pub mod prompt;

use std::sync::Arc;

use axum::Router;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::gateway::Completer;

#[derive(Clone)]
pub struct AppState {
    pub completer: Arc<dyn Completer>,
}

impl AppState {
    pub fn new(completer: impl Completer + 'static) -> Self {
        Self {
            completer: Arc::new(completer),
        }
    }
}

pub fn build_app(state: AppState) -> Router {
    api::router(state)
}

/// Installs the global fmt subscriber, filtered by `RUST_LOG` (default `info`).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

pub async fn run_server(app: Router, port: u16) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!(addr = %listener.local_addr()?, "explain proxy listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received");
    }
}
