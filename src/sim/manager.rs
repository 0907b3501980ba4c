//! Orchestrator owning the source/consumer collections and the tick loop.

use std::collections::HashMap;

use tracing::warn;

use crate::alert::ThresholdRule;
use crate::consumer::Consumer;
use crate::error::EnergyError;
use crate::sim::record::SimulationRecord;
use crate::sim::snapshot::Snapshot;
use crate::sources::EnergySource;

/// Authoritative owner of the grid state.
///
/// The manager holds the source and consumer collections, the simulated
/// tick counter, the record history, and the single active
/// [`ThresholdRule`]. Collections and history are only ever handed out
/// as copies so callers cannot corrupt an in-flight tick.
#[derive(Debug, Default)]
pub struct EnergyManager {
    sources: Vec<EnergySource>,
    consumers: Vec<Consumer>,
    history: Vec<SimulationRecord>,
    rule: Option<ThresholdRule>,
    tick: u64,
}

impl EnergyManager {
    /// Creates an empty manager at tick zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a source. Entities are validated by their own constructors,
    /// so adding cannot fail.
    pub fn add_source(&mut self, source: impl Into<EnergySource>) {
        self.sources.push(source.into());
    }

    /// Adds a consumer.
    pub fn add_consumer(&mut self, consumer: Consumer) {
        self.consumers.push(consumer);
    }

    /// Removes and returns the source at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`EnergyError::InvalidState`] for an out-of-range index;
    /// the collection is unchanged.
    pub fn remove_source(&mut self, index: usize) -> Result<EnergySource, EnergyError> {
        if index >= self.sources.len() {
            return Err(EnergyError::InvalidState(format!(
                "no source at index {index} (len {})",
                self.sources.len()
            )));
        }
        Ok(self.sources.remove(index))
    }

    /// Removes and returns the consumer at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`EnergyError::InvalidState`] for an out-of-range index.
    pub fn remove_consumer(&mut self, index: usize) -> Result<Consumer, EnergyError> {
        if index >= self.consumers.len() {
            return Err(EnergyError::InvalidState(format!(
                "no consumer at index {index} (len {})",
                self.consumers.len()
            )));
        }
        Ok(self.consumers.remove(index))
    }

    /// Replaces the source at `index`, returning the previous one.
    ///
    /// # Errors
    ///
    /// Returns [`EnergyError::InvalidState`] for an out-of-range index.
    pub fn replace_source(
        &mut self,
        index: usize,
        source: impl Into<EnergySource>,
    ) -> Result<EnergySource, EnergyError> {
        match self.sources.get_mut(index) {
            Some(slot) => Ok(std::mem::replace(slot, source.into())),
            None => Err(EnergyError::InvalidState(format!(
                "no source at index {index} (len {})",
                self.sources.len()
            ))),
        }
    }

    /// Replaces the consumer at `index`, returning the previous one.
    ///
    /// # Errors
    ///
    /// Returns [`EnergyError::InvalidState`] for an out-of-range index.
    pub fn replace_consumer(
        &mut self,
        index: usize,
        consumer: Consumer,
    ) -> Result<Consumer, EnergyError> {
        match self.consumers.get_mut(index) {
            Some(slot) => Ok(std::mem::replace(slot, consumer)),
            None => Err(EnergyError::InvalidState(format!(
                "no consumer at index {index} (len {})",
                self.consumers.len()
            ))),
        }
    }

    /// Copy of the source collection.
    pub fn sources(&self) -> Vec<EnergySource> {
        self.sources.clone()
    }

    /// Copy of the consumer collection.
    pub fn consumers(&self) -> Vec<Consumer> {
        self.consumers.clone()
    }

    /// Number of registered sources.
    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Number of registered consumers.
    pub fn consumer_count(&self) -> usize {
        self.consumers.len()
    }

    /// Captures the aggregate state at the current tick.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(self.tick, &self.sources, &self.consumers)
    }

    /// Sum of `production()` over all sources.
    pub fn total_production(&self) -> f64 {
        self.snapshot().total_production()
    }

    /// Sum of `consumption()` over all consumers.
    pub fn total_consumption(&self) -> f64 {
        self.snapshot().total_consumption()
    }

    /// Name → consumption map over the consumer collection.
    pub fn consumption_by_consumer(&self) -> HashMap<String, f64> {
        self.consumers
            .iter()
            .map(|c| (c.name().to_string(), c.consumption()))
            .collect()
    }

    /// Advances simulated time by one tick.
    ///
    /// Increments the tick counter, captures a snapshot of the current
    /// totals, records it in the internal history, and returns the record
    /// for the caller to persist (typically via
    /// [`Ledger::append`](crate::ledger::Ledger::append)).
    pub fn tick(&mut self) -> SimulationRecord {
        self.tick += 1;
        let record = SimulationRecord::from_snapshot(&self.snapshot());
        self.history.push(record.clone());
        record
    }

    /// Current simulated tick. Starts at zero, increments per [`tick`](Self::tick).
    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    /// Copy of the record history.
    pub fn history(&self) -> Vec<SimulationRecord> {
        self.history.clone()
    }

    /// Most recent record, if any tick has run.
    pub fn last_record(&self) -> Option<SimulationRecord> {
        self.history.last().cloned()
    }

    /// Installs the active threshold rule, replacing any previous one.
    pub fn set_rule(&mut self, rule: ThresholdRule) {
        self.rule = Some(rule);
    }

    /// Removes the active threshold rule.
    pub fn clear_rule(&mut self) {
        self.rule = None;
    }

    /// The active threshold rule, if any.
    pub fn rule(&self) -> Option<ThresholdRule> {
        self.rule.clone()
    }

    /// True when the active rule is breached by the current totals.
    /// False when no rule is installed.
    pub fn check_alert(&self) -> bool {
        self.rule
            .as_ref()
            .is_some_and(|rule| rule.is_breached(&self.snapshot()))
    }

    /// Sets the wind speed of the turbine at source `index`.
    ///
    /// # Errors
    ///
    /// Returns [`EnergyError::InvalidState`] if the index is out of range
    /// or the source is not a wind turbine, and
    /// [`EnergyError::InvalidParameter`] for a negative speed.
    pub fn set_wind_speed(&mut self, index: usize, wind_speed: f64) -> Result<(), EnergyError> {
        match self.sources.get_mut(index) {
            Some(EnergySource::Wind(turbine)) => turbine.set_wind_speed(wind_speed),
            Some(other) => Err(EnergyError::InvalidState(format!(
                "source at index {index} is a {}, not a wind turbine",
                other.kind()
            ))),
            None => Err(EnergyError::InvalidState(format!(
                "no source at index {index} (len {})",
                self.sources.len()
            ))),
        }
    }

    /// Charges every battery by `qty`, logging per-battery failures
    /// instead of propagating them.
    pub fn charge_batteries(&mut self, qty: f64) {
        for source in &mut self.sources {
            if let Some(battery) = source.as_battery_mut() {
                if let Err(err) = battery.charge(qty) {
                    warn!(qty, %err, "battery charge skipped");
                }
            }
        }
    }
}
