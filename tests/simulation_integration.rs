//! End-to-end tests of the manager, alert engine, and scenario runner.

mod common;

use grid_sim::alert::{AlertStatus, AlertType, Severity, ThresholdRule};
use grid_sim::config::ScenarioConfig;
use grid_sim::ledger::Ledger;
use grid_sim::runner::run_scenario;
use grid_sim::sim::EnergyManager;
use grid_sim::sources::{Battery, WindTurbine};

#[test]
fn solar_house_tick_matches_hand_computation() {
    // 10 m² * 0.2 * 5 kW = 10 kWh production against 8 kWh consumption
    let mut manager = common::solar_house_manager();
    let record = manager.tick();

    assert_eq!(record.tick(), 1);
    assert_eq!(record.consumption(), 8.0);
    assert_eq!(record.production(), 10.0);
    assert!((record.balance() - 2.0).abs() < 1e-12);
    assert!(record.is_surplus());
}

#[test]
fn alert_pass_after_tick_emits_expected_severities() {
    let mut manager = common::solar_house_manager();
    manager.set_rule(ThresholdRule::new(5.0, 50.0).expect("valid rule"));
    manager.tick();
    assert!(manager.check_alert());

    let mut engine = common::tight_engine();
    engine.evaluate(&manager);

    // consumption 8 > 5 and 8 > 1.5*5: critical
    let consumption = engine.by_type(AlertType::ConsumptionExcessive);
    assert_eq!(consumption.len(), 1);
    assert_eq!(consumption[0].severity(), Severity::Critical);
    assert_eq!(consumption[0].measured_value(), 8.0);
    assert_eq!(consumption[0].threshold_value(), 5.0);

    // production 10 < 50 but not < 25: medium
    let production = engine.by_type(AlertType::ProductionLow);
    assert_eq!(production.len(), 1);
    assert_eq!(production[0].severity(), Severity::Medium);

    // surplus: no deficit alert, and no batteries in the fleet
    assert_eq!(engine.len(), 2);
}

#[test]
fn wind_turbine_feeds_the_manager_totals() {
    let mut manager = EnergyManager::new();
    manager.add_source(WindTurbine::new(5.0, 8.0).expect("valid turbine"));

    // (5/10)^3 * 8 = 1.0
    assert!((manager.total_production() - 1.0).abs() < 1e-12);

    manager.set_wind_speed(0, 10.0).expect("turbine index");
    assert!((manager.total_production() - 8.0).abs() < 1e-12);
}

#[test]
fn battery_charge_discharge_round_trip_stays_in_bounds() {
    // quantities chosen so the capacity cap never bites: the round trip
    // returns to the starting level exactly
    for qty in [0.0, 1.0, 7.5, 30.0] {
        let mut battery = Battery::new(50.0, 20.0, 0.8).expect("valid battery");
        battery.charge(qty).expect("charge should succeed");
        battery
            .discharge(qty * 0.8)
            .expect("discharge should succeed");
        assert!(battery.level() >= 0.0 && battery.level() <= 50.0);
        assert!((battery.level() - 20.0).abs() < 1e-9);
    }

    // past the cap the level clamps at capacity but stays in bounds
    let mut battery = Battery::new(50.0, 20.0, 0.8).expect("valid battery");
    battery.charge(100.0).expect("charge should succeed");
    assert_eq!(battery.level(), 50.0);
    battery.discharge(50.0).expect("discharge should succeed");
    assert!(battery.level() >= 0.0 && battery.level() <= 50.0);
}

#[test]
fn battery_alerts_fire_per_breaching_battery() {
    let mut manager = common::solar_house_manager();
    manager.add_source(Battery::new(100.0, 8.0, 1.0).expect("valid battery")); // 8% < 10% -> critical
    manager.add_source(Battery::new(100.0, 15.0, 1.0).expect("valid battery")); // 15% -> high

    let mut engine = common::tight_engine();
    engine.evaluate(&manager);

    let battery_alerts = engine.by_type(AlertType::BatteryLow);
    assert_eq!(battery_alerts.len(), 2);
    assert_eq!(battery_alerts[0].severity(), Severity::Critical);
    assert_eq!(battery_alerts[1].severity(), Severity::High);
}

#[test]
fn acknowledge_all_drains_the_active_set_only() {
    let manager = common::solar_house_manager();
    let mut engine = common::tight_engine();

    engine.evaluate(&manager);
    engine.resolve(0);
    engine.evaluate(&manager);

    let resolved_before = engine.by_status(AlertStatus::Resolved).len();
    engine.acknowledge_all();

    assert_eq!(engine.active_count(), 0);
    assert_eq!(engine.by_status(AlertStatus::Resolved).len(), resolved_before);
    assert_eq!(engine.average_severity_score(), 0.0);
}

#[test]
fn manager_accessors_are_defensive_copies() {
    let manager = common::solar_house_manager();

    manager.sources().clear();
    manager.consumers().clear();
    manager.history().clear();

    assert_eq!(manager.source_count(), 1);
    assert_eq!(manager.consumer_count(), 1);
    assert_eq!(manager.total_production(), 10.0);
}

#[test]
fn baseline_preset_runs_end_to_end() {
    let config = ScenarioConfig::baseline();
    let dir = common::temp_dir("e2e_baseline");
    let path = dir.join("ledger.csv");
    let _ = std::fs::remove_file(&path);
    let ledger = Ledger::new(&path);

    let summary = run_scenario(&config, &ledger).expect("run should succeed");
    assert_eq!(summary.ticks_run, config.simulation.ticks);
    assert_eq!(summary.records_flushed, config.simulation.ticks as usize);

    let reloaded = Ledger::new(&path);
    let loaded = reloaded.load_from_file().expect("load should succeed");
    assert_eq!(loaded, config.simulation.ticks as usize);

    // records come back in tick order
    let records = reloaded.snapshot();
    for (i, record) in records.iter().enumerate() {
        assert_eq!(record.tick(), i as u64 + 1);
    }
}
