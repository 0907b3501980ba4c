use crate::error::EnergyError;

/// A photovoltaic panel with a fixed surface, efficiency, and rated power.
///
/// Output is a pure function of the construction parameters: the model
/// carries no time-of-day irradiance factor, so `production()` is
/// constant for the lifetime of the panel.
#[derive(Debug, Clone, PartialEq)]
pub struct SolarPanel {
    surface: f64,
    efficiency: f64,
    rated_power: f64,
}

impl SolarPanel {
    /// Creates a new solar panel.
    ///
    /// # Arguments
    ///
    /// * `surface` - Panel surface area (must be > 0)
    /// * `efficiency` - Conversion efficiency (0.0 to 1.0)
    /// * `rated_power` - Nominal power rating (must be > 0)
    ///
    /// # Errors
    ///
    /// Returns [`EnergyError::InvalidParameter`] if any argument is out of
    /// range.
    pub fn new(surface: f64, efficiency: f64, rated_power: f64) -> Result<Self, EnergyError> {
        if surface <= 0.0 {
            return Err(EnergyError::InvalidParameter(format!(
                "solar panel surface must be > 0, got {surface}"
            )));
        }
        if !(0.0..=1.0).contains(&efficiency) {
            return Err(EnergyError::InvalidParameter(format!(
                "solar panel efficiency must be in [0, 1], got {efficiency}"
            )));
        }
        if rated_power <= 0.0 {
            return Err(EnergyError::InvalidParameter(format!(
                "solar panel rated power must be > 0, got {rated_power}"
            )));
        }
        Ok(Self {
            surface,
            efficiency,
            rated_power,
        })
    }

    /// Instantaneous output: `surface * efficiency * rated_power`.
    pub fn production(&self) -> f64 {
        self.surface * self.efficiency * self.rated_power
    }

    /// Nominal power rating.
    pub fn capacity(&self) -> f64 {
        self.rated_power
    }

    /// Panel surface area.
    pub fn surface(&self) -> f64 {
        self.surface
    }

    /// Conversion efficiency.
    pub fn efficiency(&self) -> f64 {
        self.efficiency
    }
}
