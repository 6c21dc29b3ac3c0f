use crate::core::grid::{Grid, GridError};
use crate::core::units;
use crate::core::well::WellParameters;
use crate::engine::comm::Communicator;
use crate::engine::config::BindConfig;
use crate::engine::error::EngineError;
use crate::engine::functional::BindingEnergyFunctional;
use crate::engine::minimize::{MinimizeResult, minimize};
use crate::engine::partition::GridPartition;
use crate::engine::progress::{Progress, ProgressReporter};
use serde::Serialize;
use tracing::{info, instrument, warn};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BindResult {
    /// Optimized exciton radius in units of the effective Bohr radius.
    pub exciton_radius: f64,
    pub exciton_radius_angstrom: f64,
    /// Minimized functional value in effective Rydberg units.
    pub binding_energy_ry: f64,
    pub binding_energy_mev: f64,
    pub converged: bool,
    pub iterations: usize,
    pub evaluations: usize,
}

/// Pick the grid convention matching the kernel: half-range with the
/// boundary condition in the weights for a two-barrier well, full-range for
/// a symmetric one.
pub(crate) fn build_grid(params: &WellParameters, num_points: usize) -> Result<Grid, GridError> {
    match params.mirror {
        Some(_) => Grid::half_range(params.half_width, num_points),
        None => Grid::full_range(params.half_width, num_points),
    }
}

#[instrument(skip_all, name = "bind_workflow")]
pub fn run<C: Communicator>(
    comm: &C,
    config: &BindConfig,
    reporter: &ProgressReporter,
) -> Result<BindResult, EngineError> {
    let params = WellParameters::derive(&config.geometry);
    let grid = build_grid(&params, config.grid.num_points)?;
    let kernel = params.image_kernel(config.grid.num_series);
    let partition = GridPartition::round_robin(grid.len(), comm.size());
    let functional = BindingEnergyFunctional::new(&params, &grid, &kernel, &partition);

    if comm.rank() == 0 {
        reporter.report(Progress::GeometryStart {
            width_angstrom: config.geometry.width_angstrom,
        });
        info!(
            width_angstrom = config.geometry.width_angstrom,
            grid_points = grid.len(),
            series_depth = config.grid.num_series,
            slots = comm.size(),
            "starting variational search"
        );
    }

    let outcome = minimize(
        |x| functional.evaluate(comm, x[0]),
        &[config.optimization.initial_guess],
        &config.optimization.simplex_options(),
    );

    if comm.rank() == 0 && !outcome.converged {
        warn!(
            iterations = outcome.iterations,
            evaluations = outcome.evaluations,
            "variational search did not converge within budget"
        );
    }

    let result = summarize(&params, &outcome);
    if comm.rank() == 0 {
        reporter.report(Progress::GeometryFinish {
            binding_energy_mev: result.binding_energy_mev,
        });
        info!(
            exciton_radius = result.exciton_radius,
            binding_energy_mev = result.binding_energy_mev,
            "variational search finished"
        );
    }
    Ok(result)
}

pub(crate) fn summarize(params: &WellParameters, outcome: &MinimizeResult) -> BindResult {
    let radius = outcome.best_point[0];
    BindResult {
        exciton_radius: radius,
        exciton_radius_angstrom: units::bohr_to_angstrom(radius * params.bohr_radius),
        binding_energy_ry: outcome.best_value,
        binding_energy_mev: params.binding_energy_mev(outcome.best_value),
        converged: outcome.converged,
        iterations: outcome.iterations,
        evaluations: outcome.evaluations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::well::{BarrierProfile, WellGeometry};
    use crate::engine::comm::{SerialComm, run_spmd};
    use crate::engine::config::{BindConfigBuilder, GridConfig, OptimizationConfig};
    use std::sync::Mutex;

    fn small_config() -> BindConfig {
        BindConfigBuilder::new()
            .geometry(WellGeometry {
                reduced_mass: 0.117,
                width_angstrom: 59.0,
                eps_well: 3.5,
                barriers: BarrierProfile::TwoBarrier {
                    eps_bottom: 6.0,
                    eps_top: 1.0,
                },
            })
            .grid(GridConfig {
                num_points: 16,
                num_series: 4,
            })
            .optimization(OptimizationConfig {
                initial_guess: 1.0,
                x_tolerance: 1e-6,
                f_tolerance: 1e-6,
                max_iterations: 200,
                max_evaluations: 400,
            })
            .build()
            .unwrap()
    }

    #[test]
    fn finds_a_bound_state_for_a_narrow_well() {
        let config = small_config();
        let result = run(&SerialComm, &config, &ProgressReporter::new()).unwrap();
        assert!(result.converged);
        assert!(result.exciton_radius > 0.0);
        assert!(result.binding_energy_ry < 0.0);
        assert!(result.binding_energy_mev > 0.0);
    }

    #[test]
    fn pool_and_serial_runs_agree() {
        let config = small_config();
        let serial = run(&SerialComm, &config, &ProgressReporter::new()).unwrap();
        let pooled = run_spmd(4, |comm| {
            run(comm, &config, &ProgressReporter::new()).unwrap()
        });
        assert!((serial.exciton_radius - pooled.exciton_radius).abs() < 1e-4);
        assert!((serial.binding_energy_mev - pooled.binding_energy_mev).abs() < 1e-4);
    }

    #[test]
    fn repeated_runs_are_identical() {
        let config = small_config();
        let first = run(&SerialComm, &config, &ProgressReporter::new()).unwrap();
        let second = run(&SerialComm, &config, &ProgressReporter::new()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn reports_geometry_start_and_finish() {
        let events = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|progress| {
            events.lock().unwrap().push(progress);
        }));
        let config = small_config();
        run(&SerialComm, &config, &reporter).unwrap();

        drop(reporter);
        let events = events.into_inner().unwrap();
        assert!(matches!(events.first(), Some(Progress::GeometryStart { .. })));
        assert!(matches!(events.last(), Some(Progress::GeometryFinish { .. })));
    }

    #[test]
    fn symmetric_wells_use_the_full_range_grid() {
        let geometry = WellGeometry {
            reduced_mass: 0.06826386021,
            width_angstrom: 100.0,
            eps_well: 12.9,
            barriers: BarrierProfile::Symmetric { eps_barrier: 0.129 },
        };
        let params = WellParameters::derive(&geometry);
        let grid = build_grid(&params, 11).unwrap();
        assert!((grid.position(0) + params.half_width).abs() < 1e-12);
        assert!((grid.position(10) - params.half_width).abs() < 1e-12);
    }
}
