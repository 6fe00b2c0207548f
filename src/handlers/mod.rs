//! Contains the axum route handlers.

mod countdown;
mod favicon;
mod health;
mod index;
mod metrics;
mod shutdown;

pub use countdown::CountdownRoutes;
pub use favicon::FaviconRoutes;
pub use health::HealthRoutes;
pub use index::IndexRoutes;
pub use metrics::MetricsRoutes;
pub use shutdown::ShutdownRoutes;
