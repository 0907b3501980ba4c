use crate::consumer::Consumer;
use crate::sources::EnergySource;

/// Aggregate production/consumption computed from the live collections
/// at one tick.
///
/// A snapshot is transient: it is captured whole before anything reads
/// it, so alert evaluation never observes a partial sum. Persistence
/// goes through [`SimulationRecord`](super::record::SimulationRecord)
/// instead.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    tick: u64,
    total_production: f64,
    total_consumption: f64,
}

impl Snapshot {
    /// Sums the current source and consumer collections.
    pub fn capture(tick: u64, sources: &[EnergySource], consumers: &[Consumer]) -> Self {
        let total_production = sources.iter().map(EnergySource::production).sum();
        let total_consumption = consumers.iter().map(Consumer::consumption).sum();
        Self {
            tick,
            total_production,
            total_consumption,
        }
    }

    /// Tick index the snapshot was captured at.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Sum of `production()` over all sources.
    pub fn total_production(&self) -> f64 {
        self.total_production
    }

    /// Sum of `consumption()` over all consumers.
    pub fn total_consumption(&self) -> f64 {
        self.total_consumption
    }

    /// `production - consumption` at this tick.
    pub fn balance(&self) -> f64 {
        self.total_production - self.total_consumption
    }
}
