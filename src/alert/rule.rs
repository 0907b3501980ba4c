use crate::error::EnergyError;
use crate::sim::snapshot::Snapshot;

/// The pair of limits the manager checks each tick: maximum acceptable
/// consumption and minimum acceptable production.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdRule {
    consumption_threshold: f64,
    production_threshold: f64,
}

impl ThresholdRule {
    /// Creates a rule.
    ///
    /// # Errors
    ///
    /// Returns [`EnergyError::InvalidParameter`] if either threshold is
    /// negative.
    pub fn new(
        consumption_threshold: f64,
        production_threshold: f64,
    ) -> Result<Self, EnergyError> {
        if consumption_threshold < 0.0 || production_threshold < 0.0 {
            return Err(EnergyError::InvalidParameter(format!(
                "alert thresholds must be >= 0, got consumption={consumption_threshold} production={production_threshold}"
            )));
        }
        Ok(Self {
            consumption_threshold,
            production_threshold,
        })
    }

    /// Maximum acceptable consumption.
    pub fn consumption_threshold(&self) -> f64 {
        self.consumption_threshold
    }

    /// Minimum acceptable production.
    pub fn production_threshold(&self) -> f64 {
        self.production_threshold
    }

    /// True when the snapshot breaches either limit: consumption above
    /// its threshold, or production below its threshold.
    pub fn is_breached(&self, snapshot: &Snapshot) -> bool {
        snapshot.total_consumption() > self.consumption_threshold
            || snapshot.total_production() < self.production_threshold
    }
}
