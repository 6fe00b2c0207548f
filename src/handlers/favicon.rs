//! Contains the `/favicon.ico` endpoint.

use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;

/// A tiny hourglass, inline so the service stays a single binary.
const FAVICON_SVG: &str = r##"<svg width="32" height="32" viewBox="0 0 32 32" xmlns="http://www.w3.org/2000/svg">
  <rect width="32" height="32" rx="6" fill="#f2c4c4"/>
  <path d="M10 6h12v4l-4 6 4 6v4H10v-4l4-6-4-6z" fill="none" stroke="#333333" stroke-width="2" stroke-linejoin="round"/>
  <path d="M13 24h6l-3-4z" fill="#333333"/>
</svg>
"##;

pub trait FaviconRoutes {
    /// Serves the static favicon.
    ///
    /// ```http
    /// GET /favicon.ico HTTP/1.1
    /// ```
    fn map_favicon_endpoint(self) -> Self;
}

impl<S> FaviconRoutes for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    // Ensure HttpCallMetricTracker is updated.
    fn map_favicon_endpoint(self) -> Self {
        self.route("/favicon.ico", get(favicon))
    }
}

async fn favicon() -> impl IntoResponse {
    (
        [
            (CONTENT_TYPE, "image/svg+xml"),
            (CACHE_CONTROL, "public, max-age=86400"),
        ],
        FAVICON_SVG,
    )
}
