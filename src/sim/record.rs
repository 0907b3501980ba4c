use std::fmt;

use crate::error::EnergyError;
use crate::sim::snapshot::Snapshot;

/// Immutable result of one simulation tick.
///
/// Validated at construction: consumption and production are never
/// negative. This is the unit persisted by the
/// [`Ledger`](crate::ledger::Ledger).
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationRecord {
    tick: u64,
    consumption: f64,
    production: f64,
}

impl SimulationRecord {
    /// Creates a validated record.
    ///
    /// # Errors
    ///
    /// Returns [`EnergyError::InvalidParameter`] if consumption or
    /// production is negative.
    pub fn new(tick: u64, consumption: f64, production: f64) -> Result<Self, EnergyError> {
        if consumption < 0.0 {
            return Err(EnergyError::InvalidParameter(format!(
                "record consumption must be >= 0, got {consumption}"
            )));
        }
        if production < 0.0 {
            return Err(EnergyError::InvalidParameter(format!(
                "record production must be >= 0, got {production}"
            )));
        }
        Ok(Self {
            tick,
            consumption,
            production,
        })
    }

    /// Builds a record from a snapshot. The snapshot totals are sums of
    /// non-negative terms, so the validation in [`new`](Self::new) cannot
    /// fire here.
    pub(crate) fn from_snapshot(snapshot: &Snapshot) -> Self {
        debug_assert!(snapshot.total_consumption() >= 0.0);
        debug_assert!(snapshot.total_production() >= 0.0);
        Self {
            tick: snapshot.tick(),
            consumption: snapshot.total_consumption(),
            production: snapshot.total_production(),
        }
    }

    /// Tick index this record was captured at.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Total consumption for the tick.
    pub fn consumption(&self) -> f64 {
        self.consumption
    }

    /// Total production for the tick.
    pub fn production(&self) -> f64 {
        self.production
    }

    /// Energy balance: `production - consumption`.
    pub fn balance(&self) -> f64 {
        self.production - self.consumption
    }

    /// True when production covers consumption.
    pub fn is_surplus(&self) -> bool {
        self.production >= self.consumption
    }

    /// True when consumption exceeds production.
    pub fn is_deficit(&self) -> bool {
        !self.is_surplus()
    }
}

impl fmt::Display for SimulationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "tick={:>4} | consumption={:.2} kWh | production={:.2} kWh | balance={:.2} kWh",
            self.tick,
            self.consumption,
            self.production,
            self.balance()
        )
    }
}
