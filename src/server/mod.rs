//! Web UI for running recognitions through the job platform.
//!
//! Routes:
//! - `GET /` - the page
//! - `GET /static/app.js` - page script
//! - `GET /health` - liveness
//! - `POST /api/recognize` - run one recognition job, JSON in and out

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::error::{Result, ResultExt};
use crate::jobs::JobOrchestrator;

pub mod health;
pub mod recognize;
pub mod ui;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Drives each recognition job
    pub orchestrator: Arc<JobOrchestrator>,
    /// Cancelled when the server shuts down; each request waits on a child
    pub shutdown: CancellationToken,
    /// Request body limit for `/api/recognize`
    pub max_body_bytes: usize,
}

impl AppState {
    pub fn new(orchestrator: Arc<JobOrchestrator>, shutdown: CancellationToken) -> Self {
        Self {
            orchestrator,
            shutdown,
            max_body_bytes: crate::config::ServerConfig::default().max_body_bytes,
        }
    }

    pub fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    let api = Router::new()
        .route("/api/recognize", post(recognize::recognize))
        .layer(DefaultBodyLimit::max(state.max_body_bytes));

    let public = Router::new()
        .route("/", get(ui::serve_index))
        .route("/static/app.js", get(ui::serve_app_js))
        .merge(health::health_routes());

    Router::new().merge(api).merge(public).with_state(state)
}

/// Serve the web UI until `shutdown` is cancelled.
///
/// In-flight recognitions are cancelled along with the server.
pub async fn serve(config: &Config, shutdown: CancellationToken) -> Result<()> {
    let orchestrator = JobOrchestrator::from_config(config)?;
    let state = AppState::new(Arc::new(orchestrator), shutdown.clone())
        .with_max_body_bytes(config.server.max_body_bytes);

    let listener = tokio::net::TcpListener::bind(&config.server.bind)
        .await
        .with_context(format!("Failed to bind to {}", config.server.bind))?;
    let addr = listener.local_addr()?;
    tracing::info!(%addr, "Web UI listening on http://{}", addr);

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .with_context("Server error")?;

    tracing::info!("Server shutdown complete");
    Ok(())
}
