use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use elec_trainer::logging::DEFAULT_LEVEL;

/// EV charger maximum-demand assessment and fault-finding practice.
#[derive(Debug, Parser)]
#[command(name = "elec-trainer", version, about)]
pub struct Cli {
    /// Log filter, e.g. `info` or `elec_trainer=debug`. `RUST_LOG` overrides it.
    #[arg(long, global = true, default_value = DEFAULT_LEVEL)]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Assess maximum demand for a site and print advisories.
    Demand(DemandArgs),
    /// Pick a fault-finding session and optionally grade answers.
    Faults(FaultsArgs),
    /// Validate the built-in scenario catalog.
    Catalog,
}

#[derive(Debug, Args)]
pub struct DemandArgs {
    /// Site TOML file.
    #[arg(long, conflicts_with = "preset")]
    pub site: Option<PathBuf>,

    /// Built-in site preset (domestic, workplace, depot).
    #[arg(long)]
    pub preset: Option<String>,

    /// Use the recommended diversity for the charger count.
    #[arg(long)]
    pub auto_diversity: bool,

    /// Write demand metrics to a CSV file.
    #[arg(long)]
    pub csv_out: Option<PathBuf>,

    /// Write advisories to a CSV file.
    #[arg(long)]
    pub advisories_out: Option<PathBuf>,

    /// Write the full report as JSON (requires the `json` feature).
    #[arg(long)]
    pub json_out: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct FaultsArgs {
    /// Number of faults to pick; defaults to the site's session size.
    #[arg(long)]
    pub count: Option<usize>,

    /// Seed for a reproducible session.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Option ids to submit, in session order.
    #[arg(long, value_delimiter = ',')]
    pub answers: Vec<String>,

    /// Write the session table to a CSV file.
    #[arg(long)]
    pub csv_out: Option<PathBuf>,

    /// Site TOML file supplying `[trainer]` defaults.
    #[arg(long)]
    pub site: Option<PathBuf>,
}
