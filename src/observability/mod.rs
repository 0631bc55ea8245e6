//! Observability
//!
//! Structured logging and Prometheus metrics. Structured workout events
//! are written by [`crate::notify::EventLog`].

pub mod logging;
pub mod metrics;

pub use logging::{LogFormat, init_logging};
pub use metrics::init_metrics;
