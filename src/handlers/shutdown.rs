//! Contains the `/stop` endpoint filter.

use crate::AppState;
use axum::extract::State;
use axum::routing::post;
use axum::Router;
use tracing::warn;

pub trait ShutdownRoutes {
    /// Provides an API for initiating a shutdown.
    ///
    /// ```http
    /// POST /stop HTTP/1.1
    /// ```
    fn map_shutdown_endpoint(self) -> Self;
}

impl ShutdownRoutes for Router<AppState> {
    // Ensure HttpCallMetricTracker is updated.
    fn map_shutdown_endpoint(self) -> Self {
        self.route("/stop", post(shutdown))
    }
}

/// Initiates a graceful shutdown.
///
/// ```http
/// POST /stop
/// ```
async fn shutdown(State(state): State<AppState>) {
    warn!("Initiating shutdown from API call");
    state.shutdown_tx.send(()).ok();
}
