//! Energy source variants for grid simulation.

/// Battery storage model.
pub mod battery;
/// Solar photovoltaic panel model.
pub mod solar;
/// Wind turbine model.
pub mod wind;

pub use battery::Battery;
pub use solar::SolarPanel;
pub use wind::WindTurbine;

/// A production source on the grid.
///
/// The variant set is closed: exhaustive matches stay exhaustive when
/// the simulation grows. All variants answer `production()` and
/// `capacity()`; storage operations are reached through
/// [`as_battery`](EnergySource::as_battery) /
/// [`as_battery_mut`](EnergySource::as_battery_mut).
#[derive(Debug, Clone, PartialEq)]
pub enum EnergySource {
    /// Photovoltaic panel.
    Solar(SolarPanel),
    /// Wind turbine.
    Wind(WindTurbine),
    /// Battery storage unit.
    Battery(Battery),
}

impl EnergySource {
    /// Instantaneous output of the source. Never negative.
    pub fn production(&self) -> f64 {
        match self {
            Self::Solar(panel) => panel.production(),
            Self::Wind(turbine) => turbine.production(),
            Self::Battery(battery) => battery.production(),
        }
    }

    /// Nominal (solar/wind) or maximum storage (battery) capacity.
    pub fn capacity(&self) -> f64 {
        match self {
            Self::Solar(panel) => panel.capacity(),
            Self::Wind(turbine) => turbine.capacity(),
            Self::Battery(battery) => battery.capacity(),
        }
    }

    /// Human-readable variant name.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Solar(_) => "SolarPanel",
            Self::Wind(_) => "WindTurbine",
            Self::Battery(_) => "Battery",
        }
    }

    /// Returns the battery behind this source, if it is one.
    pub fn as_battery(&self) -> Option<&Battery> {
        match self {
            Self::Battery(battery) => Some(battery),
            _ => None,
        }
    }

    /// Mutable access to the battery behind this source, if it is one.
    pub fn as_battery_mut(&mut self) -> Option<&mut Battery> {
        match self {
            Self::Battery(battery) => Some(battery),
            _ => None,
        }
    }
}

impl From<SolarPanel> for EnergySource {
    fn from(panel: SolarPanel) -> Self {
        Self::Solar(panel)
    }
}

impl From<WindTurbine> for EnergySource {
    fn from(turbine: WindTurbine) -> Self {
        Self::Wind(turbine)
    }
}

impl From<Battery> for EnergySource {
    fn from(battery: Battery) -> Self {
        Self::Battery(battery)
    }
}
