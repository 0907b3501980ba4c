//! TOML-based scenario configuration and preset definitions.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

/// Top-level scenario configuration parsed from TOML.
///
/// The `[simulation]` and `[alerts]` sections have defaults; sources and
/// consumers are given as repeated `[[solar_panel]]`, `[[wind_turbine]]`,
/// `[[battery]]`, and `[[consumer]]` tables. Load from TOML with
/// [`ScenarioConfig::from_toml_file`] or use
/// [`ScenarioConfig::baseline`] for the built-in default.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Simulation timing and global parameters.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Alert thresholds handed to the alert engine.
    #[serde(default)]
    pub alerts: AlertsConfig,
    /// Solar panel fleet.
    #[serde(default, rename = "solar_panel")]
    pub solar_panels: Vec<SolarPanelConfig>,
    /// Wind turbine fleet.
    #[serde(default, rename = "wind_turbine")]
    pub wind_turbines: Vec<WindTurbineConfig>,
    /// Battery fleet.
    #[serde(default, rename = "battery")]
    pub batteries: Vec<BatteryConfig>,
    /// Consumer population.
    #[serde(default, rename = "consumer")]
    pub consumers: Vec<ConsumerConfig>,
}

/// Simulation timing and global parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Number of ticks to simulate (must be > 0).
    pub ticks: u64,
    /// Master random seed for wind jitter.
    pub seed: u64,
    /// Gaussian standard deviation of the per-tick wind-speed jitter
    /// (0 disables jitter).
    pub wind_noise_std: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            ticks: 24,
            seed: 42,
            wind_noise_std: 0.5,
        }
    }
}

/// Alert thresholds handed to the alert engine.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AlertsConfig {
    /// Maximum acceptable total consumption.
    pub consumption_threshold: f64,
    /// Minimum acceptable total production.
    pub production_threshold: f64,
    /// Minimum acceptable battery charge (percent).
    pub battery_threshold_pct: f64,
}

impl Default for AlertsConfig {
    fn default() -> Self {
        Self {
            consumption_threshold: 100.0,
            production_threshold: 50.0,
            battery_threshold_pct: 20.0,
        }
    }
}

/// One solar panel.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SolarPanelConfig {
    /// Surface area (must be > 0).
    pub surface: f64,
    /// Conversion efficiency (0.0–1.0).
    pub efficiency: f64,
    /// Rated power (must be > 0).
    pub rated_power: f64,
}

/// One wind turbine.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WindTurbineConfig {
    /// Initial wind speed (must be >= 0).
    pub wind_speed: f64,
    /// Rated power (must be > 0).
    pub rated_power: f64,
}

/// One battery.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BatteryConfig {
    /// Storage capacity (must be > 0).
    pub max_capacity: f64,
    /// Initial level (0 to `max_capacity`).
    pub initial_level: f64,
    /// Charge efficiency (0.0–1.0).
    pub efficiency: f64,
}

/// One consumer.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConsumerConfig {
    /// Consumer name (must not be empty).
    pub name: String,
    /// Consumption per tick (must be >= 0).
    pub base_consumption: f64,
    /// Optional appliance-name → consumption breakdown.
    #[serde(default)]
    pub appliances: HashMap<String, f64>,
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"simulation.ticks"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {} — {}", self.field, self.message)
    }
}

impl ScenarioConfig {
    /// Returns the baseline scenario: a small mixed fleet with moderate
    /// thresholds.
    pub fn baseline() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            alerts: AlertsConfig {
                consumption_threshold: 20.0,
                production_threshold: 5.0,
                battery_threshold_pct: 20.0,
            },
            solar_panels: vec![SolarPanelConfig {
                surface: 10.0,
                efficiency: 0.2,
                rated_power: 5.0,
            }],
            wind_turbines: vec![WindTurbineConfig {
                wind_speed: 6.0,
                rated_power: 8.0,
            }],
            batteries: vec![BatteryConfig {
                max_capacity: 100.0,
                initial_level: 60.0,
                efficiency: 0.9,
            }],
            consumers: vec![
                ConsumerConfig {
                    name: "House".to_string(),
                    base_consumption: 8.0,
                    appliances: HashMap::from([
                        ("fridge".to_string(), 1.2),
                        ("heating".to_string(), 4.0),
                    ]),
                },
                ConsumerConfig {
                    name: "Workshop".to_string(),
                    base_consumption: 3.0,
                    appliances: HashMap::new(),
                },
            ],
        }
    }

    /// Returns the overload preset: heavy consumption against weak
    /// production, driving consumption and deficit alerts.
    pub fn overload() -> Self {
        Self {
            simulation: SimulationConfig {
                ticks: 12,
                ..SimulationConfig::default()
            },
            alerts: AlertsConfig {
                consumption_threshold: 30.0,
                production_threshold: 25.0,
                battery_threshold_pct: 20.0,
            },
            solar_panels: vec![SolarPanelConfig {
                surface: 4.0,
                efficiency: 0.15,
                rated_power: 3.0,
            }],
            wind_turbines: Vec::new(),
            batteries: Vec::new(),
            consumers: vec![
                ConsumerConfig {
                    name: "Factory".to_string(),
                    base_consumption: 55.0,
                    appliances: HashMap::new(),
                },
                ConsumerConfig {
                    name: "District".to_string(),
                    base_consumption: 18.0,
                    appliances: HashMap::new(),
                },
            ],
        }
    }

    /// Returns the battery-stress preset: nearly drained storage behind
    /// a calm-wind fleet, driving battery and production alerts.
    pub fn battery_stress() -> Self {
        Self {
            simulation: SimulationConfig {
                ticks: 12,
                wind_noise_std: 0.2,
                ..SimulationConfig::default()
            },
            alerts: AlertsConfig {
                consumption_threshold: 50.0,
                production_threshold: 10.0,
                battery_threshold_pct: 30.0,
            },
            solar_panels: Vec::new(),
            wind_turbines: vec![WindTurbineConfig {
                wind_speed: 2.0,
                rated_power: 6.0,
            }],
            batteries: vec![
                BatteryConfig {
                    max_capacity: 80.0,
                    initial_level: 6.0,
                    efficiency: 0.9,
                },
                BatteryConfig {
                    max_capacity: 40.0,
                    initial_level: 10.0,
                    efficiency: 0.85,
                },
            ],
            consumers: vec![ConsumerConfig {
                name: "Village".to_string(),
                base_consumption: 9.0,
                appliances: HashMap::new(),
            }],
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "overload", "battery_stress"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "overload" => Ok(Self::overload()),
            "battery_stress" => Ok(Self::battery_stress()),
            _ => Err(ConfigError {
                field: "preset".to_string(),
                message: format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            }),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is
    /// invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "scenario".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown
    /// fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let sim = &self.simulation;
        if sim.ticks == 0 {
            errors.push(ConfigError {
                field: "simulation.ticks".into(),
                message: "must be > 0".into(),
            });
        }
        if sim.wind_noise_std < 0.0 {
            errors.push(ConfigError {
                field: "simulation.wind_noise_std".into(),
                message: "must be >= 0".into(),
            });
        }

        let alerts = &self.alerts;
        for (field, value) in [
            ("alerts.consumption_threshold", alerts.consumption_threshold),
            ("alerts.production_threshold", alerts.production_threshold),
            ("alerts.battery_threshold_pct", alerts.battery_threshold_pct),
        ] {
            if value < 0.0 {
                errors.push(ConfigError {
                    field: field.into(),
                    message: "must be >= 0".into(),
                });
            }
        }

        for (i, panel) in self.solar_panels.iter().enumerate() {
            if panel.surface <= 0.0 {
                errors.push(ConfigError {
                    field: format!("solar_panel[{i}].surface"),
                    message: "must be > 0".into(),
                });
            }
            if !(0.0..=1.0).contains(&panel.efficiency) {
                errors.push(ConfigError {
                    field: format!("solar_panel[{i}].efficiency"),
                    message: "must be in [0.0, 1.0]".into(),
                });
            }
            if panel.rated_power <= 0.0 {
                errors.push(ConfigError {
                    field: format!("solar_panel[{i}].rated_power"),
                    message: "must be > 0".into(),
                });
            }
        }

        for (i, turbine) in self.wind_turbines.iter().enumerate() {
            if turbine.wind_speed < 0.0 {
                errors.push(ConfigError {
                    field: format!("wind_turbine[{i}].wind_speed"),
                    message: "must be >= 0".into(),
                });
            }
            if turbine.rated_power <= 0.0 {
                errors.push(ConfigError {
                    field: format!("wind_turbine[{i}].rated_power"),
                    message: "must be > 0".into(),
                });
            }
        }

        for (i, battery) in self.batteries.iter().enumerate() {
            if battery.max_capacity <= 0.0 {
                errors.push(ConfigError {
                    field: format!("battery[{i}].max_capacity"),
                    message: "must be > 0".into(),
                });
            }
            if battery.initial_level < 0.0 || battery.initial_level > battery.max_capacity {
                errors.push(ConfigError {
                    field: format!("battery[{i}].initial_level"),
                    message: "must be in [0, max_capacity]".into(),
                });
            }
            if !(0.0..=1.0).contains(&battery.efficiency) {
                errors.push(ConfigError {
                    field: format!("battery[{i}].efficiency"),
                    message: "must be in [0.0, 1.0]".into(),
                });
            }
        }

        for (i, consumer) in self.consumers.iter().enumerate() {
            if consumer.name.is_empty() {
                errors.push(ConfigError {
                    field: format!("consumer[{i}].name"),
                    message: "must not be empty".into(),
                });
            }
            if consumer.base_consumption < 0.0 {
                errors.push(ConfigError {
                    field: format!("consumer[{i}].base_consumption"),
                    message: "must be >= 0".into(),
                });
            }
            for (appliance, consumption) in &consumer.appliances {
                if *consumption < 0.0 {
                    errors.push(ConfigError {
                        field: format!("consumer[{i}].appliances.{appliance}"),
                        message: "must be >= 0".into(),
                    });
                }
            }
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_preset_valid() {
        let cfg = ScenarioConfig::baseline();
        let errors = cfg.validate();
        assert!(errors.is_empty(), "baseline should be valid: {errors:?}");
    }

    #[test]
    fn all_presets_are_valid() {
        for name in ScenarioConfig::PRESETS {
            let cfg = ScenarioConfig::from_preset(name);
            assert!(cfg.is_ok(), "preset \"{name}\" should load");
            let errors = cfg.as_ref().map(|c| c.validate()).unwrap_or_default();
            assert!(
                errors.is_empty(),
                "preset \"{name}\" should be valid: {errors:?}"
            );
        }
    }

    #[test]
    fn from_preset_unknown() {
        let err = ScenarioConfig::from_preset("nonexistent");
        assert!(err.is_err());
        let e = err.err().map(|e| e.message).unwrap_or_default();
        assert!(e.contains("unknown preset"));
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
[simulation]
ticks = 48
seed = 99
wind_noise_std = 0.3

[alerts]
consumption_threshold = 25.0
production_threshold = 10.0
battery_threshold_pct = 15.0

[[solar_panel]]
surface = 12.0
efficiency = 0.18
rated_power = 4.0

[[wind_turbine]]
wind_speed = 7.0
rated_power = 10.0

[[battery]]
max_capacity = 50.0
initial_level = 25.0
efficiency = 0.92

[[consumer]]
name = "House"
base_consumption = 6.5
appliances = { fridge = 1.1, oven = 2.4 }
"#;
        let cfg = ScenarioConfig::from_toml_str(toml);
        assert!(cfg.is_ok(), "valid TOML should parse: {:?}", cfg.err());
        let cfg = cfg.ok();
        assert_eq!(cfg.as_ref().map(|c| c.simulation.ticks), Some(48));
        assert_eq!(cfg.as_ref().map(|c| c.solar_panels.len()), Some(1));
        assert_eq!(
            cfg.as_ref()
                .and_then(|c| c.consumers[0].appliances.get("oven"))
                .copied(),
            Some(2.4)
        );
    }

    #[test]
    fn invalid_toml_unknown_field() {
        let toml = r#"
[simulation]
ticks = 24
bogus_field = true
"#;
        let result = ScenarioConfig::from_toml_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let toml = r#"
[simulation]
seed = 99
"#;
        let cfg = ScenarioConfig::from_toml_str(toml);
        assert!(cfg.is_ok());
        let cfg = cfg.ok();
        // seed overridden
        assert_eq!(cfg.as_ref().map(|c| c.simulation.seed), Some(99));
        // ticks kept default
        assert_eq!(cfg.as_ref().map(|c| c.simulation.ticks), Some(24));
        // alert thresholds kept default
        assert_eq!(
            cfg.as_ref().map(|c| c.alerts.consumption_threshold),
            Some(100.0)
        );
    }

    #[test]
    fn validation_catches_zero_ticks() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.simulation.ticks = 0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "simulation.ticks"));
    }

    #[test]
    fn validation_catches_bad_battery_level() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.batteries[0].initial_level = 500.0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "battery[0].initial_level"));
    }

    #[test]
    fn validation_catches_bad_efficiency() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.solar_panels[0].efficiency = 1.4;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "solar_panel[0].efficiency"));
    }

    #[test]
    fn validation_catches_empty_consumer_name() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.consumers[0].name.clear();
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "consumer[0].name"));
    }

    #[test]
    fn validation_catches_negative_appliance() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.consumers[0]
            .appliances
            .insert("leak".to_string(), -1.0);
        let errors = cfg.validate();
        assert!(
            errors
                .iter()
                .any(|e| e.field == "consumer[0].appliances.leak")
        );
    }

    #[test]
    fn overload_preset_runs_a_deficit() {
        let cfg = ScenarioConfig::overload();
        let production: f64 = cfg
            .solar_panels
            .iter()
            .map(|p| p.surface * p.efficiency * p.rated_power)
            .sum();
        let consumption: f64 = cfg.consumers.iter().map(|c| c.base_consumption).sum();
        assert!(consumption > production);
    }
}
