//! Threshold-based alerting: rule, record lifecycle, and the engine.

pub mod engine;
/// Immutable alert records and their lifecycle enums.
pub mod record;
pub mod rule;

pub use engine::{AlertEngine, AlertObserver};
pub use record::{AlertRecord, AlertStatus, AlertType, Severity};
pub use rule::ThresholdRule;
