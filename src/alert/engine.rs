//! Threshold evaluation and the alert-record lifecycle.

use std::collections::HashMap;

use crate::alert::record::{AlertRecord, AlertStatus, AlertType, Severity};
use crate::error::EnergyError;
use crate::sim::manager::EnergyManager;

/// Consumption beyond `threshold * 1.5` escalates to critical.
const CONSUMPTION_CRITICAL_FACTOR: f64 = 1.5;
/// Production under `threshold * 0.5` escalates to critical.
const PRODUCTION_CRITICAL_FACTOR: f64 = 0.5;
/// A deficit larger than this many kWh is critical outright.
const DEFICIT_CRITICAL_KWH: f64 = 50.0;
/// Battery charge under `threshold * 0.5` percent escalates to critical.
const BATTERY_CRITICAL_FACTOR: f64 = 0.5;

/// Callback invoked for every newly emitted alert.
pub type AlertObserver = Box<dyn FnMut(&AlertRecord) + Send>;

/// Evaluates threshold rules against the grid state and owns the
/// append-only alert history.
///
/// Records are never mutated in place: a status change replaces the
/// record at the same history position with a
/// [`with_status`](AlertRecord::with_status) copy. The engine holds a
/// single observer slot; registering a new observer silently replaces
/// the previous one (last registration wins).
pub struct AlertEngine {
    history: Vec<AlertRecord>,
    consumption_threshold: f64,
    production_threshold: f64,
    battery_threshold_pct: f64,
    observer: Option<AlertObserver>,
}

impl AlertEngine {
    /// Creates an engine with the default thresholds: consumption 100,
    /// production 50, battery 20%.
    pub fn new() -> Self {
        Self {
            history: Vec::new(),
            consumption_threshold: 100.0,
            production_threshold: 50.0,
            battery_threshold_pct: 20.0,
            observer: None,
        }
    }

    /// Reconfigures all three thresholds.
    ///
    /// # Errors
    ///
    /// Returns [`EnergyError::InvalidParameter`] if any threshold is
    /// negative; the previous thresholds stay in effect.
    pub fn configure_thresholds(
        &mut self,
        consumption: f64,
        production: f64,
        battery_pct: f64,
    ) -> Result<(), EnergyError> {
        if consumption < 0.0 || production < 0.0 || battery_pct < 0.0 {
            return Err(EnergyError::InvalidParameter(format!(
                "alert thresholds must be >= 0, got consumption={consumption} production={production} battery={battery_pct}"
            )));
        }
        self.consumption_threshold = consumption;
        self.production_threshold = production;
        self.battery_threshold_pct = battery_pct;
        Ok(())
    }

    /// Registers the observer notified on each emission, replacing any
    /// previous registration.
    pub fn register_observer(&mut self, observer: impl FnMut(&AlertRecord) + Send + 'static) {
        self.observer = Some(Box::new(observer));
    }

    /// Removes the registered observer, if any.
    pub fn clear_observer(&mut self) {
        self.observer = None;
    }

    /// Runs one rule pass over the manager's current state.
    ///
    /// The snapshot is captured whole before any rule fires, so every
    /// rule sees the same totals. Each breach appends one new `Active`
    /// record and notifies the observer; running the same state twice
    /// appends the same classifications twice (history only grows).
    pub fn evaluate(&mut self, manager: &EnergyManager) {
        let snapshot = manager.snapshot();
        let consumption = snapshot.total_consumption();
        let production = snapshot.total_production();
        let balance = snapshot.balance();

        if consumption > self.consumption_threshold {
            let severity = if consumption > self.consumption_threshold * CONSUMPTION_CRITICAL_FACTOR
            {
                Severity::Critical
            } else {
                Severity::High
            };
            self.emit(AlertRecord::new(
                AlertType::ConsumptionExcessive,
                severity,
                format!(
                    "consumption excessive: {consumption:.2} kWh (threshold: {:.2} kWh)",
                    self.consumption_threshold
                ),
                consumption,
                self.consumption_threshold,
            ));
        }

        if production < self.production_threshold {
            let severity = if production < self.production_threshold * PRODUCTION_CRITICAL_FACTOR {
                Severity::Critical
            } else {
                Severity::Medium
            };
            self.emit(AlertRecord::new(
                AlertType::ProductionLow,
                severity,
                format!(
                    "production low: {production:.2} kWh (threshold: {:.2} kWh)",
                    self.production_threshold
                ),
                production,
                self.production_threshold,
            ));
        }

        if balance < 0.0 {
            let severity = if balance.abs() > DEFICIT_CRITICAL_KWH {
                Severity::Critical
            } else {
                Severity::High
            };
            self.emit(AlertRecord::new(
                AlertType::EnergyDeficit,
                severity,
                format!("energy deficit: {:.2} kWh", balance.abs()),
                balance,
                0.0,
            ));
        }

        for source in manager.sources() {
            let Some(battery) = source.as_battery() else {
                continue;
            };
            let pct = battery.charge_pct();
            if pct < self.battery_threshold_pct {
                let severity = if pct < self.battery_threshold_pct * BATTERY_CRITICAL_FACTOR {
                    Severity::Critical
                } else {
                    Severity::High
                };
                self.emit(AlertRecord::new(
                    AlertType::BatteryLow,
                    severity,
                    format!(
                        "battery low: {pct:.1}% (threshold: {:.1}%)",
                        self.battery_threshold_pct
                    ),
                    pct,
                    self.battery_threshold_pct,
                ));
            }
        }
    }

    fn emit(&mut self, record: AlertRecord) {
        if let Some(observer) = self.observer.as_mut() {
            observer(&record);
        }
        self.history.push(record);
    }

    /// Copy of the full alert history, oldest first.
    pub fn alerts(&self) -> Vec<AlertRecord> {
        self.history.clone()
    }

    /// Alerts matching one severity.
    pub fn by_severity(&self, severity: Severity) -> Vec<AlertRecord> {
        self.history
            .iter()
            .filter(|a| a.severity() == severity)
            .cloned()
            .collect()
    }

    /// Alerts matching one type.
    pub fn by_type(&self, alert_type: AlertType) -> Vec<AlertRecord> {
        self.history
            .iter()
            .filter(|a| a.alert_type() == alert_type)
            .cloned()
            .collect()
    }

    /// Alerts matching one lifecycle status.
    pub fn by_status(&self, status: AlertStatus) -> Vec<AlertRecord> {
        self.history
            .iter()
            .filter(|a| a.status() == status)
            .cloned()
            .collect()
    }

    /// Alerts still awaiting operator action.
    pub fn active_alerts(&self) -> Vec<AlertRecord> {
        self.by_status(AlertStatus::Active)
    }

    /// Alerts classified critical, any status.
    pub fn critical_alerts(&self) -> Vec<AlertRecord> {
        self.by_severity(Severity::Critical)
    }

    /// Total number of alerts in history.
    pub fn len(&self) -> usize {
        self.history.len()
    }

    /// True when the history is empty.
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Number of `Active` alerts.
    pub fn active_count(&self) -> usize {
        self.history.iter().filter(|a| a.is_active()).count()
    }

    /// Severity → count over the full history.
    pub fn count_by_severity(&self) -> HashMap<Severity, usize> {
        let mut counts = HashMap::new();
        for alert in &self.history {
            *counts.entry(alert.severity()).or_insert(0) += 1;
        }
        counts
    }

    /// Most recently emitted alert, if any.
    pub fn last_alert(&self) -> Option<AlertRecord> {
        self.history.last().cloned()
    }

    /// Mean severity score over `Active` alerts, 0.0 when none are active.
    pub fn average_severity_score(&self) -> f64 {
        let active: Vec<f64> = self
            .history
            .iter()
            .filter(|a| a.is_active())
            .map(AlertRecord::severity_score)
            .collect();
        if active.is_empty() {
            return 0.0;
        }
        active.iter().sum::<f64>() / active.len() as f64
    }

    /// Moves every `Active` alert to `Acknowledged`. Acknowledged and
    /// resolved records are untouched.
    pub fn acknowledge_all(&mut self) {
        for slot in &mut self.history {
            if slot.is_active() {
                *slot = slot.with_status(AlertStatus::Acknowledged);
            }
        }
    }

    /// Acknowledges the alert at `index`. A no-op when the index is out
    /// of bounds or the record is not `Active`.
    pub fn acknowledge(&mut self, index: usize) {
        self.transition(index, AlertStatus::Acknowledged);
    }

    /// Resolves the alert at `index`. A no-op when the index is out of
    /// bounds or the record is not `Active`.
    pub fn resolve(&mut self, index: usize) {
        self.transition(index, AlertStatus::Resolved);
    }

    fn transition(&mut self, index: usize, status: AlertStatus) {
        if let Some(slot) = self.history.get_mut(index) {
            if slot.is_active() {
                *slot = slot.with_status(status);
            }
        }
    }

    /// Drops every `Resolved` record from history.
    pub fn purge_resolved(&mut self) {
        self.history.retain(|a| a.status() != AlertStatus::Resolved);
    }

    /// Empties the history unconditionally.
    pub fn clear(&mut self) {
        self.history.clear();
    }
}

impl Default for AlertEngine {
    fn default() -> Self {
        Self::new()
    }
}
