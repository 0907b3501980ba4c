//! Shared builders for integration tests.
#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use grid_sim::alert::AlertEngine;
use grid_sim::consumer::Consumer;
use grid_sim::ledger::Ledger;
use grid_sim::sim::EnergyManager;
use grid_sim::sources::SolarPanel;

/// Manager with one 10 kWh solar panel and one 8 kWh consumer.
pub fn solar_house_manager() -> EnergyManager {
    let mut manager = EnergyManager::new();
    manager.add_source(SolarPanel::new(10.0, 0.2, 5.0).expect("valid panel"));
    manager.add_consumer(Consumer::new("House", 8.0).expect("valid consumer"));
    manager
}

/// Engine with thresholds consumption=5, production=50, battery=20.
pub fn tight_engine() -> AlertEngine {
    let mut engine = AlertEngine::new();
    engine
        .configure_thresholds(5.0, 50.0, 20.0)
        .expect("valid thresholds");
    engine
}

/// Unique, pre-created temp directory for one test.
pub fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("grid_sim_it_{}_{name}", std::process::id()));
    fs::create_dir_all(&dir).expect("temp dir should be creatable");
    dir
}

/// Fresh ledger on a clean file inside a unique temp directory.
pub fn temp_ledger(name: &str) -> Ledger {
    let path = temp_dir(name).join("ledger.csv");
    let _ = fs::remove_file(&path);
    Ledger::new(path)
}
