use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "qwvar - variational calculation of quantum-well exciton binding energies on a distributed grid.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Number of worker slots in the pool. Defaults to the QWVAR_SLOTS
    /// environment variable, then to 1.
    #[arg(short = 'j', long = "slots", global = true, value_name = "NUM")]
    pub slots: Option<usize>,
}

impl Cli {
    /// Pool size comes from the flag, then the environment, then one. Fixed
    /// for the lifetime of the run.
    pub fn resolve_slots(&self) -> usize {
        self.slots
            .or_else(|| {
                std::env::var("QWVAR_SLOTS")
                    .ok()
                    .and_then(|value| value.parse().ok())
            })
            .unwrap_or(1)
            .max(1)
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Minimize the exciton binding energy for a single well geometry.
    Bind(BindArgs),
    /// Tune the well dielectric constant against experimental reference
    /// energies across several well widths.
    Calibrate(CalibrateArgs),
}

/// Arguments for the `bind` subcommand.
#[derive(Args, Debug)]
pub struct BindArgs {
    /// Path to a run configuration file in TOML format. Built-in defaults
    /// apply when omitted.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the full well width in angstroms.
    #[arg(long, value_name = "FLOAT")]
    pub width: Option<f64>,

    /// Override the well dielectric constant.
    #[arg(long, value_name = "FLOAT")]
    pub eps_well: Option<f64>,

    /// Override the number of grid points.
    #[arg(long, value_name = "INT")]
    pub grid_points: Option<usize>,

    /// Override the image-series truncation depth.
    #[arg(long, value_name = "INT")]
    pub series_depth: Option<usize>,

    /// Override the initial trial radius, in effective Bohr radii.
    #[arg(long, value_name = "FLOAT")]
    pub initial_guess: Option<f64>,

    /// Print the full result as JSON instead of the plain result line.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `calibrate` subcommand.
#[derive(Args, Debug)]
pub struct CalibrateArgs {
    /// Path to a run configuration file in TOML format. Built-in defaults
    /// apply when omitted.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the outer initial guess for the well dielectric constant.
    #[arg(long, value_name = "FLOAT")]
    pub initial_guess: Option<f64>,

    /// Override the number of grid points.
    #[arg(long, value_name = "INT")]
    pub grid_points: Option<usize>,

    /// Override the image-series truncation depth.
    #[arg(long, value_name = "INT")]
    pub series_depth: Option<usize>,

    /// Print the full result as JSON instead of the plain result line.
    #[arg(long)]
    pub json: bool,
}
