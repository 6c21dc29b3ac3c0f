use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::minimize::SimplexOptions;
use crate::core::well::WellGeometry;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter {
        name: &'static str,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Number of sample points along the growth axis.
    pub num_points: usize,
    /// Truncation depth of the image series.
    pub num_series: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationConfig {
    pub initial_guess: f64,
    pub x_tolerance: f64,
    pub f_tolerance: f64,
    pub max_iterations: usize,
    pub max_evaluations: usize,
}

impl OptimizationConfig {
    pub fn simplex_options(&self) -> SimplexOptions {
        SimplexOptions {
            x_tolerance: self.x_tolerance,
            f_tolerance: self.f_tolerance,
            max_iterations: self.max_iterations,
            max_evaluations: self.max_evaluations,
        }
    }
}

/// One experimental reference point for the calibration loop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationSample {
    pub width_angstrom: f64,
    pub reference_mev: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BindConfig {
    pub geometry: WellGeometry,
    pub grid: GridConfig,
    pub optimization: OptimizationConfig,
}

#[derive(Default)]
pub struct BindConfigBuilder {
    geometry: Option<WellGeometry>,
    grid: Option<GridConfig>,
    optimization: Option<OptimizationConfig>,
}

impl BindConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn geometry(mut self, geometry: WellGeometry) -> Self {
        self.geometry = Some(geometry);
        self
    }
    pub fn grid(mut self, grid: GridConfig) -> Self {
        self.grid = Some(grid);
        self
    }
    pub fn optimization(mut self, optimization: OptimizationConfig) -> Self {
        self.optimization = Some(optimization);
        self
    }

    pub fn build(self) -> Result<BindConfig, ConfigError> {
        let geometry = self
            .geometry
            .ok_or(ConfigError::MissingParameter("geometry"))?;
        let grid = self.grid.ok_or(ConfigError::MissingParameter("grid"))?;
        let optimization = self
            .optimization
            .ok_or(ConfigError::MissingParameter("optimization"))?;
        validate_grid(&grid)?;
        validate_optimization(&optimization)?;
        Ok(BindConfig {
            geometry,
            grid,
            optimization,
        })
    }
}

/// Configuration of the outer dielectric-calibration loop. The well geometry
/// is rebuilt per sample from the shared mass, barrier constants, and the
/// outer trial dielectric; only the widths and references vary per sample.
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrateConfig {
    pub reduced_mass: f64,
    pub eps_bottom: f64,
    pub eps_top: f64,
    pub samples: Vec<CalibrationSample>,
    pub grid: GridConfig,
    pub inner: OptimizationConfig,
    pub outer: OptimizationConfig,
}

#[derive(Default)]
pub struct CalibrateConfigBuilder {
    reduced_mass: Option<f64>,
    eps_bottom: Option<f64>,
    eps_top: Option<f64>,
    samples: Option<Vec<CalibrationSample>>,
    grid: Option<GridConfig>,
    inner: Option<OptimizationConfig>,
    outer: Option<OptimizationConfig>,
}

impl CalibrateConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reduced_mass(mut self, mass: f64) -> Self {
        self.reduced_mass = Some(mass);
        self
    }
    pub fn eps_bottom(mut self, eps: f64) -> Self {
        self.eps_bottom = Some(eps);
        self
    }
    pub fn eps_top(mut self, eps: f64) -> Self {
        self.eps_top = Some(eps);
        self
    }
    pub fn samples(mut self, samples: Vec<CalibrationSample>) -> Self {
        self.samples = Some(samples);
        self
    }
    pub fn grid(mut self, grid: GridConfig) -> Self {
        self.grid = Some(grid);
        self
    }
    pub fn inner(mut self, optimization: OptimizationConfig) -> Self {
        self.inner = Some(optimization);
        self
    }
    pub fn outer(mut self, optimization: OptimizationConfig) -> Self {
        self.outer = Some(optimization);
        self
    }

    pub fn build(self) -> Result<CalibrateConfig, ConfigError> {
        let reduced_mass = self
            .reduced_mass
            .ok_or(ConfigError::MissingParameter("reduced_mass"))?;
        let eps_bottom = self
            .eps_bottom
            .ok_or(ConfigError::MissingParameter("eps_bottom"))?;
        let eps_top = self
            .eps_top
            .ok_or(ConfigError::MissingParameter("eps_top"))?;
        let samples = self
            .samples
            .ok_or(ConfigError::MissingParameter("samples"))?;
        let grid = self.grid.ok_or(ConfigError::MissingParameter("grid"))?;
        let inner = self.inner.ok_or(ConfigError::MissingParameter("inner"))?;
        let outer = self.outer.ok_or(ConfigError::MissingParameter("outer"))?;

        if samples.is_empty() {
            return Err(ConfigError::InvalidParameter {
                name: "samples",
                reason: "calibration needs at least one reference point".to_string(),
            });
        }
        if reduced_mass <= 0.0 {
            return Err(ConfigError::InvalidParameter {
                name: "reduced_mass",
                reason: format!("must be positive, got {reduced_mass}"),
            });
        }
        validate_grid(&grid)?;
        validate_optimization(&inner)?;
        validate_optimization(&outer)?;
        Ok(CalibrateConfig {
            reduced_mass,
            eps_bottom,
            eps_top,
            samples,
            grid,
            inner,
            outer,
        })
    }
}

fn validate_grid(grid: &GridConfig) -> Result<(), ConfigError> {
    if grid.num_points < 2 {
        return Err(ConfigError::InvalidParameter {
            name: "num_points",
            reason: format!("grid needs at least two points, got {}", grid.num_points),
        });
    }
    if grid.num_series == 0 {
        return Err(ConfigError::InvalidParameter {
            name: "num_series",
            reason: "image series needs at least one term".to_string(),
        });
    }
    Ok(())
}

fn validate_optimization(optimization: &OptimizationConfig) -> Result<(), ConfigError> {
    if optimization.initial_guess <= 0.0 {
        return Err(ConfigError::InvalidParameter {
            name: "initial_guess",
            reason: format!(
                "trial parameter must be positive, got {}",
                optimization.initial_guess
            ),
        });
    }
    Ok(())
}
