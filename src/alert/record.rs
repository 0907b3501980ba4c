use std::fmt;

use chrono::{DateTime, Local};

/// What condition an alert reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlertType {
    /// Total consumption exceeded its threshold.
    ConsumptionExcessive,
    /// Total production fell below its threshold.
    ProductionLow,
    /// Production minus consumption went negative.
    EnergyDeficit,
    /// A battery's charge percentage fell below its threshold.
    BatteryLow,
}

impl fmt::Display for AlertType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::ConsumptionExcessive => "CONSUMPTION_EXCESSIVE",
            Self::ProductionLow => "PRODUCTION_LOW",
            Self::EnergyDeficit => "ENERGY_DEFICIT",
            Self::BatteryLow => "BATTERY_LOW",
        };
        f.write_str(label)
    }
}

/// How serious an alert is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Numeric weight used for aggregate statistics.
    pub fn score(self) -> f64 {
        match self {
            Self::Critical => 1.0,
            Self::High => 0.75,
            Self::Medium => 0.5,
            Self::Low => 0.25,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Critical => "CRITICAL",
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
        };
        f.write_str(label)
    }
}

/// Lifecycle state of an alert record.
///
/// `Active` is the only non-terminal state: an alert may move to
/// `Acknowledged` or `Resolved` once, by operator action, and never
/// transitions out of either.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlertStatus {
    Active,
    Acknowledged,
    Resolved,
}

impl fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Active => "ACTIVE",
            Self::Acknowledged => "ACKNOWLEDGED",
            Self::Resolved => "RESOLVED",
        };
        f.write_str(label)
    }
}

/// An immutable, timestamped notice of a threshold breach.
///
/// Status changes never mutate a record: [`with_status`](Self::with_status)
/// produces a copy that replaces the prior record in the engine's
/// history, so anything still holding the old record sees a consistent
/// value.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertRecord {
    timestamp: DateTime<Local>,
    alert_type: AlertType,
    severity: Severity,
    message: String,
    status: AlertStatus,
    measured_value: f64,
    threshold_value: f64,
}

impl AlertRecord {
    /// Creates an `Active` record stamped with the current wall clock.
    pub fn new(
        alert_type: AlertType,
        severity: Severity,
        message: impl Into<String>,
        measured_value: f64,
        threshold_value: f64,
    ) -> Self {
        Self {
            timestamp: Local::now(),
            alert_type,
            severity,
            message: message.into(),
            status: AlertStatus::Active,
            measured_value,
            threshold_value,
        }
    }

    /// Copy of this record with a different status. Timestamp and all
    /// measurement fields are preserved.
    pub fn with_status(&self, status: AlertStatus) -> Self {
        Self {
            status,
            ..self.clone()
        }
    }

    /// When the breach was detected.
    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }

    /// Condition this alert reports.
    pub fn alert_type(&self) -> AlertType {
        self.alert_type
    }

    /// Severity classification.
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Human-readable description.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Lifecycle status.
    pub fn status(&self) -> AlertStatus {
        self.status
    }

    /// Value measured at detection time.
    pub fn measured_value(&self) -> f64 {
        self.measured_value
    }

    /// Threshold that was crossed.
    pub fn threshold_value(&self) -> f64 {
        self.threshold_value
    }

    /// True while the alert awaits operator action.
    pub fn is_active(&self) -> bool {
        self.status == AlertStatus::Active
    }

    /// True for `Critical` severity.
    pub fn is_critical(&self) -> bool {
        self.severity == Severity::Critical
    }

    /// Severity weight (1.0 critical down to 0.25 low).
    pub fn severity_score(&self) -> f64 {
        self.severity.score()
    }
}

impl fmt::Display for AlertRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} - {}: {} (status: {})",
            self.timestamp.format("%d/%m/%Y %H:%M:%S"),
            self.severity,
            self.alert_type,
            self.message,
            self.status
        )
    }
}
