//! `elec-trainer` entry point: CLI wiring around the demand and fault libraries.

mod cli;

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{error, info, warn};

use cli::{Cli, Command, DemandArgs, FaultsArgs};
use elec_trainer::config::{SiteConfig, TrainerConfig};
use elec_trainer::faults::{Catalog, FaultScenario, TrainerSession};
use elec_trainer::io::export::{export_advisories_csv, export_metrics_csv, export_session_csv};
use elec_trainer::logging;

/// Preset used when neither `--site` nor `--preset` is given.
const DEFAULT_PRESET: &str = "domestic";

fn load_site(site: Option<&Path>, preset: Option<&str>) -> Result<SiteConfig> {
    let cfg = match site {
        Some(path) => SiteConfig::from_toml_file(path)?,
        None => SiteConfig::from_preset(preset.unwrap_or(DEFAULT_PRESET))?,
    };

    let errors = cfg.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("  {e}");
        }
        bail!("invalid site configuration ({} error(s))", errors.len());
    }
    Ok(cfg)
}

fn run_demand(args: &DemandArgs) -> Result<ExitCode> {
    let mut site = load_site(args.site.as_deref(), args.preset.as_deref())?;
    if args.auto_diversity {
        site.demand.auto_diversity = true;
    }

    let report = site.evaluate()?;
    for field in report.parameters.out_of_range_fields() {
        warn!(field, "parameter outside its advisory range");
    }
    info!(
        chargers = report.total_charger_count,
        total_kw = report.result.total_max_demand_kw,
        advisories = report.advisories.len(),
        "demand evaluated"
    );
    println!("{report}");

    if let Some(path) = &args.csv_out {
        export_metrics_csv(&report, path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        eprintln!("Metrics written to {}", path.display());
    }
    if let Some(path) = &args.advisories_out {
        export_advisories_csv(&report.advisories, path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        eprintln!("Advisories written to {}", path.display());
    }
    if let Some(path) = &args.json_out {
        write_json(&report, path)?;
        eprintln!("Report written to {}", path.display());
    }

    Ok(ExitCode::SUCCESS)
}

#[cfg(feature = "json")]
fn write_json(report: &elec_trainer::demand::DemandReport, path: &Path) -> Result<()> {
    elec_trainer::io::export::export_report_json(report, path)
        .with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(not(feature = "json"))]
fn write_json(_report: &elec_trainer::demand::DemandReport, _path: &Path) -> Result<()> {
    bail!("--json-out needs a build with the `json` feature")
}

fn print_scenario(position: usize, s: &FaultScenario) {
    println!("[{position}] {} ({})", s.circuit_name, s.circuit_type);
    println!("  Symptom: {}", s.symptom);
    for point in &s.test_points {
        println!("  @ {}: {}", point.location, point.description);
        for reading in &point.tests {
            println!("      {reading}");
        }
    }
    println!("  Options:");
    for option in &s.diagnosis_options {
        println!("    {}) {}", option.id, option.label);
    }
    println!();
}

fn grade(session: &mut TrainerSession<'_>, answers: &[String]) -> Result<()> {
    if answers.len() > session.len() {
        bail!(
            "{} answers given for a session of {}",
            answers.len(),
            session.len()
        );
    }

    for (i, option_id) in answers.iter().enumerate() {
        let option_id = option_id.trim();
        let correct = session.submit(i, option_id)?;
        let scenario = session.scenarios()[i];
        if correct {
            println!("[{}] {option_id}: correct", i + 1);
        } else {
            let expected = scenario.correct_option().map_or("?", |o| o.id.as_str());
            println!("[{}] {option_id}: incorrect, answer was {expected}", i + 1);
        }
        println!("    Fault: {}", scenario.correct_location);
        println!("    Fix:   {}", scenario.rectification);
    }
    println!();
    println!("{}", session.score());
    Ok(())
}

fn run_faults(args: &FaultsArgs) -> Result<ExitCode> {
    let trainer = match &args.site {
        Some(path) => load_site(Some(path), None)?.trainer,
        None => TrainerConfig::default(),
    };
    let count = args.count.unwrap_or(trainer.session_size);
    if count == 0 {
        bail!("--count must be > 0");
    }
    let seed = args.seed.or(trainer.seed);

    let catalog = Catalog::builtin()?;
    let mut session = match seed {
        Some(seed) => {
            let mut rng = StdRng::seed_from_u64(seed);
            TrainerSession::start(catalog.scenarios(), count, &mut rng)
        }
        None => TrainerSession::start(catalog.scenarios(), count, &mut rand::rng()),
    };
    info!(requested = count, picked = session.len(), ?seed, "session started");

    println!("--- Fault-Finding Session ({} faults) ---", session.len());
    println!();
    for (i, s) in session.scenarios().iter().enumerate() {
        print_scenario(i + 1, s);
    }

    if !args.answers.is_empty() {
        grade(&mut session, &args.answers)?;
    }

    if let Some(path) = &args.csv_out {
        export_session_csv(&session, path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        eprintln!("Session written to {}", path.display());
    }

    Ok(ExitCode::SUCCESS)
}

fn run_catalog() -> Result<ExitCode> {
    let catalog = Catalog::builtin()?;
    println!("{} scenarios", catalog.len());
    for t in catalog.circuit_types() {
        let n = catalog
            .scenarios()
            .iter()
            .filter(|s| s.circuit_type == t)
            .count();
        println!("  {t:<12} {n}");
    }

    let issues = catalog.validate();
    if issues.is_empty() {
        println!("catalog OK");
        return Ok(ExitCode::SUCCESS);
    }
    for issue in &issues {
        eprintln!("  {issue}");
    }
    error!(issues = issues.len(), "catalog failed validation");
    Ok(ExitCode::FAILURE)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = logging::init(&cli.log_level) {
        eprintln!("warning: logging unavailable: {e}");
    }

    let outcome = match &cli.command {
        Command::Demand(args) => run_demand(args),
        Command::Faults(args) => run_faults(args),
        Command::Catalog => run_catalog(),
    };

    outcome.unwrap_or_else(|e| {
        error!("{e:#}");
        ExitCode::FAILURE
    })
}
