use crate::error::EnergyError;

/// A battery energy storage unit.
///
/// The stored level is always within `[0, max_capacity]`. Charging
/// applies the round-trip efficiency on the way in; discharging removes
/// the requested quantity one-for-one and refuses to go below empty.
/// As an [`EnergySource`](super::EnergySource) variant a battery reports
/// zero instantaneous production: it contributes to the grid only
/// through explicit discharge.
#[derive(Debug, Clone, PartialEq)]
pub struct Battery {
    max_capacity: f64,
    level: f64,
    efficiency: f64,
}

impl Battery {
    /// Creates a new battery.
    ///
    /// # Arguments
    ///
    /// * `max_capacity` - Storage capacity (must be > 0)
    /// * `initial_level` - Starting level (0 to `max_capacity`)
    /// * `efficiency` - Charge efficiency (0.0 to 1.0)
    ///
    /// # Errors
    ///
    /// Returns [`EnergyError::InvalidParameter`] if any argument is out of
    /// range.
    pub fn new(max_capacity: f64, initial_level: f64, efficiency: f64) -> Result<Self, EnergyError> {
        if max_capacity <= 0.0 {
            return Err(EnergyError::InvalidParameter(format!(
                "battery capacity must be > 0, got {max_capacity}"
            )));
        }
        if initial_level < 0.0 || initial_level > max_capacity {
            return Err(EnergyError::InvalidParameter(format!(
                "battery level must be in [0, {max_capacity}], got {initial_level}"
            )));
        }
        if !(0.0..=1.0).contains(&efficiency) {
            return Err(EnergyError::InvalidParameter(format!(
                "battery efficiency must be in [0, 1], got {efficiency}"
            )));
        }
        Ok(Self {
            max_capacity,
            level: initial_level,
            efficiency,
        })
    }

    /// Stores energy, applying the charge efficiency and capping at capacity.
    ///
    /// # Errors
    ///
    /// Returns [`EnergyError::NegativeQuantity`] if `qty < 0`.
    pub fn charge(&mut self, qty: f64) -> Result<(), EnergyError> {
        if qty < 0.0 {
            return Err(EnergyError::NegativeQuantity(qty));
        }
        self.level = (self.level + qty * self.efficiency).min(self.max_capacity);
        Ok(())
    }

    /// Withdraws energy from the store.
    ///
    /// # Errors
    ///
    /// Returns [`EnergyError::NegativeQuantity`] if `qty < 0`, or
    /// [`EnergyError::DischargeExceedsLevel`] if `qty` exceeds the current
    /// level. The level is unchanged on error.
    pub fn discharge(&mut self, qty: f64) -> Result<(), EnergyError> {
        if qty < 0.0 {
            return Err(EnergyError::NegativeQuantity(qty));
        }
        if qty > self.level {
            return Err(EnergyError::DischargeExceedsLevel {
                requested: qty,
                available: self.level,
            });
        }
        self.level = (self.level - qty).max(0.0);
        Ok(())
    }

    /// Instantaneous production. Always zero for a storage unit.
    pub fn production(&self) -> f64 {
        0.0
    }

    /// Maximum storage capacity.
    pub fn capacity(&self) -> f64 {
        self.max_capacity
    }

    /// Current stored level.
    pub fn level(&self) -> f64 {
        self.level
    }

    /// Charge efficiency.
    pub fn efficiency(&self) -> f64 {
        self.efficiency
    }

    /// Stored level as a percentage of capacity (0 to 100).
    pub fn charge_pct(&self) -> f64 {
        (self.level / self.max_capacity) * 100.0
    }
}
