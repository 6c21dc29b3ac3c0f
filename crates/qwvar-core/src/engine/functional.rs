use super::comm::Communicator;
use super::partition::GridPartition;
use crate::core::grid::Grid;
use crate::core::kernel::CoulombKernel;
use crate::core::well::WellParameters;

/// The distributed binding-energy functional.
///
/// One evaluation is a fixed collective protocol executed identically by every
/// slot: broadcast the trial parameter, accumulate this slot's share of the
/// weighted kernel double sum, all-reduce the partial sums, then combine with
/// the closed-form kinetic term. The returned value is identical on every
/// slot.
///
/// A trial parameter `<= 0` is a caller precondition violation: the kinetic
/// term goes singular and the resulting non-finite value propagates into the
/// minimizer unclamped.
pub struct BindingEnergyFunctional<'a> {
    params: &'a WellParameters,
    grid: &'a Grid,
    kernel: &'a dyn CoulombKernel,
    partition: &'a GridPartition,
}

impl<'a> BindingEnergyFunctional<'a> {
    pub fn new(
        params: &'a WellParameters,
        grid: &'a Grid,
        kernel: &'a dyn CoulombKernel,
        partition: &'a GridPartition,
    ) -> Self {
        Self {
            params,
            grid,
            kernel,
            partition,
        }
    }

    /// Evaluate the binding energy, in effective Rydberg units, for a trial
    /// exciton radius given in units of the effective Bohr radius.
    pub fn evaluate<C: Communicator>(&self, comm: &C, trial: f64) -> f64 {
        // The broadcast is the synchronization point: local computation must
        // not read the trial parameter before it completes.
        let trial = comm.broadcast(trial);
        let a = trial * self.params.bohr_radius;

        let kinetic = 1.0 / (2.0 * self.params.reduced_mass * a * a);

        let mut local = 0.0;
        for &i in self.partition.indices(comm.rank()) {
            let ze = self.grid.position(i);
            let mut inner = 0.0;
            for (zh, wh) in self.grid.iter() {
                inner += wh * self.kernel.evaluate(a, ze, zh);
            }
            local += self.grid.weight(i) * inner;
        }
        let total = comm.allreduce_sum(local);

        let ds = self.grid.spacing() * self.grid.spacing();
        let l = self.params.half_width;
        let potential = -2.0 / (self.params.eps_well * l * l * a) * total * ds;

        (kinetic + potential) / self.params.rydberg
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::well::{BarrierProfile, WellGeometry};
    use crate::engine::comm::{SerialComm, run_spmd};

    struct UnitKernel;

    impl CoulombKernel for UnitKernel {
        fn evaluate(&self, _a: f64, _ze: f64, _zh: f64) -> f64 {
            1.0
        }
    }

    fn test_geometry() -> WellGeometry {
        WellGeometry {
            reduced_mass: 0.117,
            width_angstrom: 59.0,
            eps_well: 3.5,
            barriers: BarrierProfile::TwoBarrier {
                eps_bottom: 6.0,
                eps_top: 1.0,
            },
        }
    }

    #[test]
    fn unit_kernel_with_unit_weights_reduces_to_the_closed_form() {
        let params = WellParameters::derive(&test_geometry());
        let n = 20;
        let positions: Vec<f64> = (0..n).map(|i| i as f64 * 0.05).collect();
        let grid = Grid::from_parts(positions, vec![1.0; n]).unwrap();
        let kernel = UnitKernel;
        let partition = GridPartition::round_robin(grid.len(), 1);
        let functional = BindingEnergyFunctional::new(&params, &grid, &kernel, &partition);

        let trial = 1.0;
        let energy = functional.evaluate(&SerialComm, trial);

        let a = trial * params.bohr_radius;
        let kinetic = 1.0 / (2.0 * params.reduced_mass * a * a);
        let ds = 0.05 * 0.05;
        let l = params.half_width;
        // Double sum over a unit kernel with unit weights is exactly N^2.
        let potential = -2.0 / (params.eps_well * l * l * a) * (n * n) as f64 * ds;
        let expected = (kinetic + potential) / params.rydberg;
        assert!((energy - expected).abs() < 1e-12 * expected.abs());
    }

    #[test]
    fn toy_kernel_minimum_matches_the_kinetic_potential_balance() {
        // With a unit kernel and unit weights the functional collapses to
        // E(a) * R = 1/(2 mu a^2) - c/a with c = 2 N^2 dS / (eps l^2), whose
        // minimum sits at a = 1/(mu c). The kinetic term dominates as the
        // trial radius shrinks, so the search is pushed out to that balance.
        let params = WellParameters::derive(&test_geometry());
        let n = 20;
        let positions: Vec<f64> = (0..n).map(|i| i as f64 * 0.05).collect();
        let grid = Grid::from_parts(positions, vec![1.0; n]).unwrap();
        let kernel = UnitKernel;
        let partition = GridPartition::round_robin(grid.len(), 1);
        let functional = BindingEnergyFunctional::new(&params, &grid, &kernel, &partition);

        let options = crate::engine::minimize::SimplexOptions {
            x_tolerance: 1e-6,
            f_tolerance: 1e-6,
            max_iterations: 500,
            max_evaluations: 1000,
        };
        let outcome = crate::engine::minimize::minimize(
            |x| functional.evaluate(&SerialComm, x[0]),
            &[1.0],
            &options,
        );

        let ds = 0.05 * 0.05;
        let l = params.half_width;
        let c = 2.0 * (n * n) as f64 * ds / (params.eps_well * l * l);
        let expected_radius = 1.0 / (params.reduced_mass * c) / params.bohr_radius;
        assert!(outcome.converged);
        assert!(
            (outcome.best_point[0] - expected_radius).abs() < 1e-3 * expected_radius,
            "expected {expected_radius}, got {}",
            outcome.best_point[0]
        );
    }

    #[test]
    fn result_is_invariant_under_pool_size() {
        let params = WellParameters::derive(&test_geometry());
        let grid = Grid::half_range(params.half_width, 24).unwrap();
        let kernel = params.image_kernel(5);
        let trial = 1.2;

        let serial = {
            let partition = GridPartition::round_robin(grid.len(), 1);
            let functional = BindingEnergyFunctional::new(&params, &grid, &kernel, &partition);
            functional.evaluate(&SerialComm, trial)
        };

        for pool in [2, 4] {
            let pooled = run_spmd(pool, |comm| {
                let partition = GridPartition::round_robin(grid.len(), comm.size());
                let functional = BindingEnergyFunctional::new(&params, &grid, &kernel, &partition);
                functional.evaluate(comm, trial)
            });
            assert!(
                (serial - pooled).abs() < 1e-12 * serial.abs(),
                "pool of {pool} drifted: {serial} vs {pooled}"
            );
        }
    }

    #[test]
    fn oversized_pool_contributes_empty_partial_sums() {
        let params = WellParameters::derive(&test_geometry());
        let grid = Grid::half_range(params.half_width, 3).unwrap();
        let kernel = params.image_kernel(3);
        let trial = 1.0;

        let serial = {
            let partition = GridPartition::round_robin(grid.len(), 1);
            let functional = BindingEnergyFunctional::new(&params, &grid, &kernel, &partition);
            functional.evaluate(&SerialComm, trial)
        };
        let pooled = run_spmd(6, |comm| {
            let partition = GridPartition::round_robin(grid.len(), comm.size());
            let functional = BindingEnergyFunctional::new(&params, &grid, &kernel, &partition);
            functional.evaluate(comm, trial)
        });
        assert!((serial - pooled).abs() < 1e-12 * serial.abs().max(1.0));
    }

    #[test]
    fn nonpositive_trial_parameter_surfaces_as_a_non_finite_value() {
        let params = WellParameters::derive(&test_geometry());
        let grid = Grid::half_range(params.half_width, 4).unwrap();
        let kernel = UnitKernel;
        let partition = GridPartition::round_robin(grid.len(), 1);
        let functional = BindingEnergyFunctional::new(&params, &grid, &kernel, &partition);
        assert!(!functional.evaluate(&SerialComm, 0.0).is_finite());
    }
}
