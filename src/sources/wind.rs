use crate::error::EnergyError;

/// Wind speed at which a turbine reaches its rated output.
const RATED_WIND_SPEED: f64 = 10.0;

/// A wind turbine producing power under a cubic wind-power law.
///
/// Output is `rated_power * (wind_speed / 10)^3`, clamped at zero below
/// calm. The wind speed is mutable (the simulation driver jitters it per
/// tick); the rated power is fixed at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct WindTurbine {
    wind_speed: f64,
    rated_power: f64,
}

impl WindTurbine {
    /// Creates a new wind turbine.
    ///
    /// # Arguments
    ///
    /// * `wind_speed` - Current wind speed (must be >= 0)
    /// * `rated_power` - Nominal power rating (must be > 0)
    ///
    /// # Errors
    ///
    /// Returns [`EnergyError::InvalidParameter`] if any argument is out of
    /// range.
    pub fn new(wind_speed: f64, rated_power: f64) -> Result<Self, EnergyError> {
        if wind_speed < 0.0 {
            return Err(EnergyError::InvalidParameter(format!(
                "wind speed must be >= 0, got {wind_speed}"
            )));
        }
        if rated_power <= 0.0 {
            return Err(EnergyError::InvalidParameter(format!(
                "wind turbine rated power must be > 0, got {rated_power}"
            )));
        }
        Ok(Self {
            wind_speed,
            rated_power,
        })
    }

    /// Instantaneous output under the cubic law.
    pub fn production(&self) -> f64 {
        let ratio = (self.wind_speed / RATED_WIND_SPEED).max(0.0);
        self.rated_power * ratio.powi(3)
    }

    /// Nominal power rating.
    pub fn capacity(&self) -> f64 {
        self.rated_power
    }

    /// Current wind speed.
    pub fn wind_speed(&self) -> f64 {
        self.wind_speed
    }

    /// Updates the wind speed.
    ///
    /// # Errors
    ///
    /// Returns [`EnergyError::InvalidParameter`] for a negative speed; the
    /// previous speed is left unchanged.
    pub fn set_wind_speed(&mut self, wind_speed: f64) -> Result<(), EnergyError> {
        if wind_speed < 0.0 {
            return Err(EnergyError::InvalidParameter(format!(
                "wind speed must be >= 0, got {wind_speed}"
            )));
        }
        self.wind_speed = wind_speed;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cubic_law_at_rated_speed() {
        let turbine = WindTurbine::new(10.0, 8.0).expect("valid turbine");
        assert!((turbine.production() - 8.0).abs() < 1e-12);
    }

    #[test]
    fn cubic_law_at_half_rated_speed() {
        // (5/10)^3 = 0.125
        let turbine = WindTurbine::new(5.0, 8.0).expect("valid turbine");
        assert!((turbine.production() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn calm_wind_produces_nothing() {
        let turbine = WindTurbine::new(0.0, 8.0).expect("valid turbine");
        assert_eq!(turbine.production(), 0.0);
    }

    #[test]
    fn rejects_negative_wind_speed() {
        assert!(WindTurbine::new(-1.0, 8.0).is_err());
    }

    #[test]
    fn rejects_non_positive_rated_power() {
        assert!(WindTurbine::new(5.0, 0.0).is_err());
        assert!(WindTurbine::new(5.0, -3.0).is_err());
    }

    #[test]
    fn setter_rejects_negative_and_keeps_prior_speed() {
        let mut turbine = WindTurbine::new(6.0, 8.0).expect("valid turbine");
        assert!(turbine.set_wind_speed(-2.0).is_err());
        assert_eq!(turbine.wind_speed(), 6.0);
    }

    #[test]
    fn setter_updates_production() {
        let mut turbine = WindTurbine::new(0.0, 8.0).expect("valid turbine");
        turbine.set_wind_speed(10.0).expect("valid speed");
        assert!((turbine.production() - 8.0).abs() < 1e-12);
    }
}
