//! Shared test fixtures for integration tests.
#![allow(dead_code)]

use std::collections::HashSet;
use std::path::PathBuf;
use std::process::{Command, Output};

use elec_trainer::demand::{ChargerLoad, DemandParameters};
use elec_trainer::faults::{Catalog, FaultScenario};

/// Float comparison tolerance for computed figures.
pub const EPS: f64 = 1e-9;

/// Two 7 kW chargers.
pub fn two_sevens() -> Vec<ChargerLoad> {
    vec![ChargerLoad::new(1, 7.0, 2)]
}

/// One 50 kW rapid charger.
pub fn one_rapid() -> Vec<ChargerLoad> {
    vec![ChargerLoad::new(1, 50.0, 1)]
}

/// Diversity 100 %, safety 15 %, no existing load.
pub fn default_params() -> DemandParameters {
    DemandParameters::new(100.0, 15.0, 0.0)
}

/// The compiled-in catalog.
pub fn builtin_catalog() -> Catalog {
    Catalog::builtin().expect("built-in catalog should parse")
}

/// Number of distinct circuit types in `scenarios`.
pub fn distinct_circuit_types(scenarios: &[&FaultScenario]) -> usize {
    scenarios
        .iter()
        .map(|s| s.circuit_type.as_str())
        .collect::<HashSet<_>>()
        .len()
}

/// Runs the `elec-trainer` binary with `args`, with `RUST_LOG` cleared.
pub fn run_cli(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_elec-trainer"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("elec-trainer process should run")
}

/// A unique path under the system temp dir for export tests.
pub fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("elec-trainer-{}-{name}", std::process::id()))
}
