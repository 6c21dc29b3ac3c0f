use crate::cli::{BindArgs, CalibrateArgs};
use crate::error::{CliError, Result};
use qwvar::core::well::{BarrierProfile, WellGeometry};
use qwvar::engine::config::{
    BindConfig, BindConfigBuilder, CalibrateConfig, CalibrateConfigBuilder, CalibrationSample,
    GridConfig, OptimizationConfig,
};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

// Built-in defaults: a symmetric GaAs-like well for `bind`, and the
// two-barrier device series with its experimental references for `calibrate`.

const DEFAULT_BIND_MASS: f64 = 0.06826386021;
const DEFAULT_BIND_WIDTH: f64 = 100.0;
const DEFAULT_BIND_EPS_WELL: f64 = 12.9;
const DEFAULT_BIND_BARRIER_RATIO: f64 = 100.0;

const DEFAULT_CAL_MASS: f64 = 0.117;
const DEFAULT_CAL_EPS_BOTTOM: f64 = 6.0;
const DEFAULT_CAL_EPS_TOP: f64 = 1.0;
const DEFAULT_CAL_GUESS: f64 = 3.5;
const DEFAULT_CAL_SAMPLES: [(f64, f64); 5] = [
    (59.0, 147.6),
    (78.0, 123.5),
    (101.0, 92.1),
    (143.0, 71.4),
    (262.0, 69.5),
];

const DEFAULT_GRID_POINTS: usize = 100;
const DEFAULT_SERIES_DEPTH: usize = 20;

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct RunFile {
    pub well: Option<WellSection>,
    pub grid: Option<GridSection>,
    pub optimization: Option<OptimizationSection>,
    pub calibration: Option<CalibrationSection>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct WellSection {
    #[serde(rename = "reduced-mass")]
    pub reduced_mass: Option<f64>,
    #[serde(rename = "width-angstrom")]
    pub width_angstrom: Option<f64>,
    #[serde(rename = "eps-well")]
    pub eps_well: Option<f64>,
    /// Symmetric barrier; mutually exclusive with the bottom/top pair.
    #[serde(rename = "eps-barrier")]
    pub eps_barrier: Option<f64>,
    #[serde(rename = "eps-bottom")]
    pub eps_bottom: Option<f64>,
    #[serde(rename = "eps-top")]
    pub eps_top: Option<f64>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct GridSection {
    #[serde(rename = "num-points")]
    pub num_points: Option<usize>,
    #[serde(rename = "num-series")]
    pub num_series: Option<usize>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct OptimizationSection {
    #[serde(rename = "initial-guess")]
    pub initial_guess: Option<f64>,
    #[serde(rename = "x-tolerance")]
    pub x_tolerance: Option<f64>,
    #[serde(rename = "f-tolerance")]
    pub f_tolerance: Option<f64>,
    #[serde(rename = "max-iterations")]
    pub max_iterations: Option<usize>,
    #[serde(rename = "max-evaluations")]
    pub max_evaluations: Option<usize>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct CalibrationSection {
    #[serde(rename = "initial-guess")]
    pub initial_guess: Option<f64>,
    #[serde(rename = "x-tolerance")]
    pub x_tolerance: Option<f64>,
    #[serde(rename = "f-tolerance")]
    pub f_tolerance: Option<f64>,
    #[serde(rename = "max-iterations")]
    pub max_iterations: Option<usize>,
    #[serde(rename = "max-evaluations")]
    pub max_evaluations: Option<usize>,
    pub samples: Option<Vec<SampleEntry>>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct SampleEntry {
    #[serde(rename = "width-angstrom")]
    pub width_angstrom: f64,
    #[serde(rename = "reference-mev")]
    pub reference_mev: f64,
}

pub fn load_file(path: &Path) -> Result<RunFile> {
    let text = std::fs::read_to_string(path)?;
    let file = toml::from_str(&text).map_err(|e| CliError::FileParsing {
        path: path.to_path_buf(),
        source: anyhow::Error::new(e),
    })?;
    debug!(path = %path.display(), "run configuration loaded");
    Ok(file)
}

fn optional_file(path: Option<&Path>) -> Result<RunFile> {
    match path {
        Some(path) => load_file(path),
        None => Ok(RunFile::default()),
    }
}

pub fn resolve_bind(args: &BindArgs) -> Result<BindConfig> {
    let file = optional_file(args.config.as_deref())?;
    let well = file.well.unwrap_or_default();
    let grid = file.grid.unwrap_or_default();
    let optimization = file.optimization.unwrap_or_default();

    let eps_well = args
        .eps_well
        .or(well.eps_well)
        .unwrap_or(DEFAULT_BIND_EPS_WELL);
    let barriers = resolve_barriers(&well, eps_well)?;

    let geometry = WellGeometry {
        reduced_mass: well.reduced_mass.unwrap_or(DEFAULT_BIND_MASS),
        width_angstrom: args
            .width
            .or(well.width_angstrom)
            .unwrap_or(DEFAULT_BIND_WIDTH),
        eps_well,
        barriers,
    };

    let config = BindConfigBuilder::new()
        .geometry(geometry)
        .grid(GridConfig {
            num_points: args
                .grid_points
                .or(grid.num_points)
                .unwrap_or(DEFAULT_GRID_POINTS),
            num_series: args
                .series_depth
                .or(grid.num_series)
                .unwrap_or(DEFAULT_SERIES_DEPTH),
        })
        .optimization(OptimizationConfig {
            initial_guess: args
                .initial_guess
                .or(optimization.initial_guess)
                .unwrap_or(1.0),
            x_tolerance: optimization.x_tolerance.unwrap_or(1e-7),
            f_tolerance: optimization.f_tolerance.unwrap_or(1e-7),
            max_iterations: optimization.max_iterations.unwrap_or(200),
            max_evaluations: optimization.max_evaluations.unwrap_or(400),
        })
        .build()?;
    Ok(config)
}

fn resolve_barriers(well: &WellSection, eps_well: f64) -> Result<BarrierProfile> {
    match (well.eps_barrier, well.eps_bottom, well.eps_top) {
        (Some(_), Some(_), _) | (Some(_), _, Some(_)) => Err(CliError::Config(
            "eps-barrier is mutually exclusive with eps-bottom/eps-top".to_string(),
        )),
        (Some(eps_barrier), None, None) => Ok(BarrierProfile::Symmetric { eps_barrier }),
        (None, Some(eps_bottom), Some(eps_top)) => Ok(BarrierProfile::TwoBarrier {
            eps_bottom,
            eps_top,
        }),
        (None, Some(_), None) | (None, None, Some(_)) => Err(CliError::Config(
            "eps-bottom and eps-top must be given together".to_string(),
        )),
        (None, None, None) => Ok(BarrierProfile::Symmetric {
            eps_barrier: eps_well / DEFAULT_BIND_BARRIER_RATIO,
        }),
    }
}

pub fn resolve_calibrate(args: &CalibrateArgs) -> Result<CalibrateConfig> {
    let file = optional_file(args.config.as_deref())?;
    let well = file.well.unwrap_or_default();
    let grid = file.grid.unwrap_or_default();
    let inner = file.optimization.unwrap_or_default();
    let outer = file.calibration.unwrap_or_default();

    let samples = match outer.samples {
        Some(entries) => entries
            .into_iter()
            .map(|entry| CalibrationSample {
                width_angstrom: entry.width_angstrom,
                reference_mev: entry.reference_mev,
            })
            .collect(),
        None => DEFAULT_CAL_SAMPLES
            .iter()
            .map(|&(width_angstrom, reference_mev)| CalibrationSample {
                width_angstrom,
                reference_mev,
            })
            .collect(),
    };

    let config = CalibrateConfigBuilder::new()
        .reduced_mass(well.reduced_mass.unwrap_or(DEFAULT_CAL_MASS))
        .eps_bottom(well.eps_bottom.unwrap_or(DEFAULT_CAL_EPS_BOTTOM))
        .eps_top(well.eps_top.unwrap_or(DEFAULT_CAL_EPS_TOP))
        .samples(samples)
        .grid(GridConfig {
            num_points: args
                .grid_points
                .or(grid.num_points)
                .unwrap_or(DEFAULT_GRID_POINTS),
            num_series: args
                .series_depth
                .or(grid.num_series)
                .unwrap_or(DEFAULT_SERIES_DEPTH),
        })
        .inner(OptimizationConfig {
            initial_guess: inner.initial_guess.unwrap_or(1.0),
            x_tolerance: inner.x_tolerance.unwrap_or(1e-6),
            f_tolerance: inner.f_tolerance.unwrap_or(1e-6),
            max_iterations: inner.max_iterations.unwrap_or(200),
            max_evaluations: inner.max_evaluations.unwrap_or(400),
        })
        .outer(OptimizationConfig {
            initial_guess: args
                .initial_guess
                .or(outer.initial_guess)
                .unwrap_or(DEFAULT_CAL_GUESS),
            x_tolerance: outer.x_tolerance.unwrap_or(1e-3),
            f_tolerance: outer.f_tolerance.unwrap_or(1e-3),
            max_iterations: outer.max_iterations.unwrap_or(100),
            max_evaluations: outer.max_evaluations.unwrap_or(200),
        })
        .build()?;
    Ok(config)
}
