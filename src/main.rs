//! Grid simulator entry point — CLI wiring and config-driven runs.

use std::path::{Path, PathBuf};
use std::process;

use grid_sim::config::ScenarioConfig;
use grid_sim::ledger::Ledger;
use grid_sim::runner::run_scenario;
use tracing_subscriber::EnvFilter;

/// Parsed CLI arguments.
struct CliArgs {
    scenario_path: Option<String>,
    preset: Option<String>,
    ticks_override: Option<u64>,
    seed_override: Option<u64>,
    ledger_path: PathBuf,
}

fn print_help() {
    eprintln!("grid-sim — Teaching-scale energy grid simulator");
    eprintln!();
    eprintln!("Usage: grid-sim [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --scenario <path>   Load scenario from TOML config file");
    eprintln!("  --preset <name>     Use a built-in preset (baseline, overload, battery_stress)");
    eprintln!("  --ticks <u64>       Override the number of ticks to simulate");
    eprintln!("  --seed <u64>        Override the wind-jitter seed");
    eprintln!("  --ledger <path>     Ledger file path (default: ledger.csv)");
    eprintln!("  --help              Show this help message");
    eprintln!();
    eprintln!("If no --scenario or --preset is given, the baseline preset is used.");
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        scenario_path: None,
        preset: None,
        ticks_override: None,
        seed_override: None,
        ledger_path: PathBuf::from("ledger.csv"),
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--scenario" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --scenario requires a path argument");
                    process::exit(1);
                }
                cli.scenario_path = Some(args[i].clone());
            }
            "--preset" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --preset requires a name argument");
                    process::exit(1);
                }
                cli.preset = Some(args[i].clone());
            }
            "--ticks" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --ticks requires a u64 argument");
                    process::exit(1);
                }
                if let Ok(t) = args[i].parse::<u64>() {
                    cli.ticks_override = Some(t);
                } else {
                    eprintln!("error: --ticks value \"{}\" is not a valid u64", args[i]);
                    process::exit(1);
                }
            }
            "--seed" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --seed requires a u64 argument");
                    process::exit(1);
                }
                if let Ok(s) = args[i].parse::<u64>() {
                    cli.seed_override = Some(s);
                } else {
                    eprintln!("error: --seed value \"{}\" is not a valid u64", args[i]);
                    process::exit(1);
                }
            }
            "--ledger" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --ledger requires a path argument");
                    process::exit(1);
                }
                cli.ledger_path = PathBuf::from(&args[i]);
            }
            other => {
                eprintln!("error: unknown argument \"{other}\"");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    if cli.scenario_path.is_some() && cli.preset.is_some() {
        eprintln!("error: --scenario and --preset are mutually exclusive; choose one source");
        process::exit(1);
    }

    cli
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = parse_args();

    // Load config: --scenario takes priority, then --preset, then baseline
    let mut scenario = if let Some(ref path) = cli.scenario_path {
        match ScenarioConfig::from_toml_file(Path::new(path)) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else if let Some(ref name) = cli.preset {
        match ScenarioConfig::from_preset(name) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else {
        ScenarioConfig::baseline()
    };

    // Apply overrides
    if let Some(ticks) = cli.ticks_override {
        scenario.simulation.ticks = ticks;
    }
    if let Some(seed) = cli.seed_override {
        scenario.simulation.seed = seed;
    }

    // Validate before anything mutates state
    let errors = scenario.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    // The flush protocol preserves existing file content, so a re-run
    // appends to the same ledger rather than replacing it.
    let ledger = Ledger::new(&cli.ledger_path);
    if ledger.path().exists() {
        println!("Appending to existing ledger: {}", ledger.path().display());
    }

    match run_scenario(&scenario, &ledger) {
        Ok(summary) => {
            println!("{summary}");
            println!("Ledger file: {}", ledger.path().display());
        }
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}
