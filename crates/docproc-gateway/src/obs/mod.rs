//! Observability: the metrics registry and log subscriber setup.
//!
//! Metrics are stored as atomics and rendered by the `/metrics` handler in
//! Prometheus text format. Logs are JSON lines emitted through `tracing`.

pub mod logging;
pub mod metrics;

pub use metrics::Metrics;
