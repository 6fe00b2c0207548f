//! Contains the countdown badge endpoint.

use crate::countdown::parse_path;
use crate::metrics::render::{RenderMetrics, RenderOutcome};
use crate::AppState;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tracing::debug;

const SVG_CONTENT_TYPE: &str = "image/svg+xml";

pub trait CountdownRoutes {
    /// Provides the countdown badge API.
    ///
    /// One path segment carries the `YYYYMMDD` target date, the other the
    /// event label; the order is irrelevant:
    ///
    /// ```http
    /// GET /20301231/launch-party HTTP/1.1
    /// GET /launch-party/20301231 HTTP/1.1
    /// ```
    fn map_countdown_endpoint(self) -> Self;
}

impl CountdownRoutes for Router<AppState> {
    // Ensure HttpCallMetricTracker is updated.
    fn map_countdown_endpoint(self) -> Self {
        // The wildcard keeps requests with the wrong segment count inside
        // this handler so they get the error badge rather than a bare 404.
        self.route("/*path", get(render_badge))
    }
}

/// Renders the countdown badge, or the error badge when the path does not
/// disambiguate into a date and a label.
async fn render_badge(Path(path): Path<String>, State(state): State<AppState>) -> Response {
    // `Path` has already URL-decoded the segments here.
    match parse_path(&path) {
        Ok(request) => {
            let result = state.formatter.format(&request);
            RenderMetrics::track(result.direction);
            svg_response(StatusCode::OK, state.renderer.render(&result))
        }
        Err(e) => {
            debug!("Serving error badge for {path:?}: {error}", error = e);
            RenderMetrics::track(RenderOutcome::Invalid);
            svg_response(StatusCode::BAD_REQUEST, state.renderer.render_error())
        }
    }
}

fn svg_response(status: StatusCode, svg: String) -> Response {
    (status, [(header::CONTENT_TYPE, SVG_CONTENT_TYPE)], svg).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_config::CountdownConfig;
    use crate::countdown::CountdownFormatter;
    use crate::svg::{RandomColorSource, SvgRenderer};
    use std::sync::Arc;
    use tokio::sync::broadcast;

    fn test_state() -> AppState {
        let (shutdown_tx, _) = broadcast::channel(1);
        let config = CountdownConfig::default();
        AppState {
            shutdown_tx,
            formatter: CountdownFormatter::new(config.utc_offset().unwrap()),
            renderer: Arc::new(SvgRenderer::new(
                config.width,
                config.height,
                Box::new(RandomColorSource),
            )),
        }
    }

    #[tokio::test]
    async fn valid_path_yields_svg_badge() {
        let response = render_badge(
            Path("20301231/launch".to_string()),
            State(test_state()),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            SVG_CONTENT_TYPE
        );

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read response body");
        let svg = String::from_utf8(body.to_vec()).expect("Body is not UTF-8");
        assert!(svg.contains("launch"));
        assert!(svg.contains("日") || svg.contains("当日"));
    }

    #[tokio::test]
    async fn segment_order_yields_identical_badges() {
        // Strip the nondeterministic background before comparing.
        async fn badge_text(path: &str) -> String {
            let response =
                render_badge(Path(path.to_string()), State(test_state())).await;
            let body = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .expect("Failed to read response body");
            let svg = String::from_utf8(body.to_vec()).expect("Body is not UTF-8");
            svg.lines()
                .filter(|line| line.contains("<text"))
                .collect::<Vec<_>>()
                .join("\n")
        }

        assert_eq!(
            badge_text("eventname/20301231").await,
            badge_text("20301231/eventname").await
        );
    }

    #[tokio::test]
    async fn unparseable_path_yields_error_badge() {
        for path in ["just-a-label", "a/b/c", "20301231/20310101", "a/b"] {
            let response =
                render_badge(Path(path.to_string()), State(test_state())).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "path {path}");
            assert_eq!(
                response.headers()[header::CONTENT_TYPE],
                SVG_CONTENT_TYPE
            );
        }
    }

    #[tokio::test]
    async fn impossible_date_yields_error_badge() {
        let response = render_badge(
            Path("20301332/event".to_string()),
            State(test_state()),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
