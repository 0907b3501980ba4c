//! Named energy consumers with a per-appliance breakdown.

use std::collections::HashMap;

use crate::error::EnergyError;

/// An energy consumer drawing a fixed amount per simulation tick.
///
/// The base consumption can be reshaped multiplicatively or additively;
/// both paths keep it non-negative. The appliance map is a breakdown for
/// reporting only; it does not feed the tick total.
#[derive(Debug, Clone, PartialEq)]
pub struct Consumer {
    name: String,
    base_consumption: f64,
    appliances: HashMap<String, f64>,
}

impl Consumer {
    /// Creates a new consumer.
    ///
    /// # Errors
    ///
    /// Returns [`EnergyError::InvalidParameter`] for an empty name and
    /// [`EnergyError::NegativeQuantity`] for a negative base consumption.
    pub fn new(name: impl Into<String>, base_consumption: f64) -> Result<Self, EnergyError> {
        let name = name.into();
        if name.is_empty() {
            return Err(EnergyError::InvalidParameter(
                "consumer name must not be empty".to_string(),
            ));
        }
        if base_consumption < 0.0 {
            return Err(EnergyError::NegativeQuantity(base_consumption));
        }
        Ok(Self {
            name,
            base_consumption,
            appliances: HashMap::new(),
        })
    }

    /// Consumer name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Consumption per tick. Never negative.
    pub fn consumption(&self) -> f64 {
        self.base_consumption
    }

    /// Scales the consumption by `factor`.
    ///
    /// # Errors
    ///
    /// Returns [`EnergyError::InvalidFactor`] if `factor <= 0`; the
    /// consumption is unchanged on error.
    pub fn adjust_multiplicative(&mut self, factor: f64) -> Result<(), EnergyError> {
        if factor <= 0.0 {
            return Err(EnergyError::InvalidFactor(factor));
        }
        self.base_consumption *= factor;
        Ok(())
    }

    /// Shifts the consumption by `delta`, clamping the result at zero.
    pub fn adjust_additive(&mut self, delta: f64) {
        self.base_consumption = (self.base_consumption + delta).max(0.0);
    }

    /// Records (or replaces) the consumption attributed to one appliance.
    ///
    /// # Errors
    ///
    /// Returns [`EnergyError::InvalidParameter`] for an empty appliance
    /// name or a negative consumption.
    pub fn add_appliance(
        &mut self,
        appliance: impl Into<String>,
        consumption: f64,
    ) -> Result<(), EnergyError> {
        let appliance = appliance.into();
        if appliance.is_empty() {
            return Err(EnergyError::InvalidParameter(
                "appliance name must not be empty".to_string(),
            ));
        }
        if consumption < 0.0 {
            return Err(EnergyError::InvalidParameter(format!(
                "appliance consumption must be >= 0, got {consumption}"
            )));
        }
        self.appliances.insert(appliance, consumption);
        Ok(())
    }

    /// Copy of the appliance breakdown.
    pub fn appliances(&self) -> HashMap<String, f64> {
        self.appliances.clone()
    }
}
