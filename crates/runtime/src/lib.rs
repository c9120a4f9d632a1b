pub mod event_bus;
pub mod metrics;

pub use event_bus::*;
pub use metrics::{Metrics, MetricsSnapshot};
