use serde::Serialize;

// Standard simplex moves: reflection, expansion, contraction, shrink.
const REFLECT: f64 = 1.0;
const EXPAND: f64 = 2.0;
const CONTRACT: f64 = 0.5;
const SHRINK: f64 = 0.5;

// Initial simplex displacement, relative and absolute.
const INITIAL_STEP: f64 = 0.05;
const INITIAL_STEP_ZERO: f64 = 0.00025;

#[derive(Debug, Clone, PartialEq)]
pub struct SimplexOptions {
    pub x_tolerance: f64,
    pub f_tolerance: f64,
    pub max_iterations: usize,
    pub max_evaluations: usize,
}

impl Default for SimplexOptions {
    fn default() -> Self {
        Self {
            x_tolerance: 1e-6,
            f_tolerance: 1e-6,
            max_iterations: 400,
            max_evaluations: 800,
        }
    }
}

/// Outcome of one minimization: best-effort even without convergence, which
/// is reported through the flag rather than an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MinimizeResult {
    pub best_point: Vec<f64>,
    pub best_value: f64,
    pub iterations: usize,
    pub evaluations: usize,
    pub converged: bool,
}

/// Derivative-free Nelder-Mead simplex minimization.
///
/// The objective is called as an opaque black box; when it wraps a
/// distributed functional, the optimizer's deterministic trial sequence keeps
/// every worker slot on the identical collective schedule. Non-finite
/// objective values are ordered worst (IEEE total order) so they steer the
/// simplex away instead of being masked.
pub fn minimize<F>(objective: F, initial: &[f64], options: &SimplexOptions) -> MinimizeResult
where
    F: FnMut(&[f64]) -> f64,
{
    minimize_with_callback(objective, initial, options, |_, _| {})
}

/// [`minimize`] with a per-iteration callback receiving the current best
/// point and value. The callback is a side channel for progress reporting and
/// must not influence the search.
pub fn minimize_with_callback<F, C>(
    mut objective: F,
    initial: &[f64],
    options: &SimplexOptions,
    mut callback: C,
) -> MinimizeResult
where
    F: FnMut(&[f64]) -> f64,
    C: FnMut(&[f64], f64),
{
    let dim = initial.len();
    let mut evaluations = 0;
    let mut eval = |point: &[f64], count: &mut usize| {
        *count += 1;
        objective(point)
    };

    // Initial simplex: the guess plus one vertex displaced along each axis.
    let mut simplex: Vec<Vec<f64>> = Vec::with_capacity(dim + 1);
    simplex.push(initial.to_vec());
    for axis in 0..dim {
        let mut vertex = initial.to_vec();
        if vertex[axis] != 0.0 {
            vertex[axis] *= 1.0 + INITIAL_STEP;
        } else {
            vertex[axis] = INITIAL_STEP_ZERO;
        }
        simplex.push(vertex);
    }
    let mut values: Vec<f64> = simplex
        .iter()
        .map(|vertex| eval(vertex, &mut evaluations))
        .collect();
    sort_simplex(&mut simplex, &mut values);

    let mut iterations = 0;
    let mut converged = simplex_converged(&simplex, &values, options);

    while !converged
        && iterations < options.max_iterations
        && evaluations < options.max_evaluations
    {
        let worst = dim;
        let centroid = centroid_of_best(&simplex);

        let reflected = affine(&centroid, &simplex[worst], -REFLECT);
        let f_reflected = eval(&reflected, &mut evaluations);

        if f_reflected < values[0] {
            let expanded = affine(&centroid, &simplex[worst], -REFLECT * EXPAND);
            let f_expanded = eval(&expanded, &mut evaluations);
            if f_expanded < f_reflected {
                simplex[worst] = expanded;
                values[worst] = f_expanded;
            } else {
                simplex[worst] = reflected;
                values[worst] = f_reflected;
            }
        } else if f_reflected < values[worst - 1] {
            simplex[worst] = reflected;
            values[worst] = f_reflected;
        } else {
            let mut shrink = false;
            if f_reflected < values[worst] {
                let contracted = affine(&centroid, &simplex[worst], -REFLECT * CONTRACT);
                let f_contracted = eval(&contracted, &mut evaluations);
                if f_contracted <= f_reflected {
                    simplex[worst] = contracted;
                    values[worst] = f_contracted;
                } else {
                    shrink = true;
                }
            } else {
                let contracted = affine(&centroid, &simplex[worst], CONTRACT);
                let f_contracted = eval(&contracted, &mut evaluations);
                if f_contracted < values[worst] {
                    simplex[worst] = contracted;
                    values[worst] = f_contracted;
                } else {
                    shrink = true;
                }
            }
            if shrink {
                for vertex in 1..=dim {
                    let shrunk = affine(&simplex[0], &simplex[vertex], SHRINK);
                    values[vertex] = eval(&shrunk, &mut evaluations);
                    simplex[vertex] = shrunk;
                }
            }
        }

        sort_simplex(&mut simplex, &mut values);
        iterations += 1;
        callback(&simplex[0], values[0]);
        converged = simplex_converged(&simplex, &values, options);
    }

    MinimizeResult {
        best_point: simplex[0].clone(),
        best_value: values[0],
        iterations,
        evaluations,
        converged,
    }
}

// centroid + scale * (other - centroid); scale < 0 reflects through it.
fn affine(centroid: &[f64], other: &[f64], scale: f64) -> Vec<f64> {
    centroid
        .iter()
        .zip(other.iter())
        .map(|(c, o)| c + scale * (o - c))
        .collect()
}

fn centroid_of_best(simplex: &[Vec<f64>]) -> Vec<f64> {
    let dim = simplex.len() - 1;
    let mut centroid = vec![0.0; dim];
    for vertex in &simplex[..dim] {
        for (acc, x) in centroid.iter_mut().zip(vertex.iter()) {
            *acc += x;
        }
    }
    for acc in &mut centroid {
        *acc /= dim as f64;
    }
    centroid
}

fn sort_simplex(simplex: &mut [Vec<f64>], values: &mut [f64]) {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
    let reordered_simplex: Vec<Vec<f64>> = order.iter().map(|&i| simplex[i].clone()).collect();
    let reordered_values: Vec<f64> = order.iter().map(|&i| values[i]).collect();
    simplex.clone_from_slice(&reordered_simplex);
    values.copy_from_slice(&reordered_values);
}

fn simplex_converged(simplex: &[Vec<f64>], values: &[f64], options: &SimplexOptions) -> bool {
    let spread_x = simplex[1..]
        .iter()
        .map(|vertex| {
            vertex
                .iter()
                .zip(simplex[0].iter())
                .map(|(a, b)| (a - b).abs())
                .fold(0.0_f64, f64::max)
        })
        .fold(0.0_f64, f64::max);
    let spread_f = values[1..]
        .iter()
        .map(|v| (v - values[0]).abs())
        .fold(0.0_f64, f64::max);
    spread_x <= options.x_tolerance && spread_f <= options.f_tolerance
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tight_options() -> SimplexOptions {
        SimplexOptions {
            x_tolerance: 1e-8,
            f_tolerance: 1e-8,
            max_iterations: 500,
            max_evaluations: 1000,
        }
    }

    #[test]
    fn finds_the_minimum_of_a_shifted_parabola() {
        let result = minimize(|x| (x[0] - 2.0).powi(2) + 3.0, &[1.0], &tight_options());
        assert!(result.converged);
        assert!((result.best_point[0] - 2.0).abs() < 1e-4);
        assert!((result.best_value - 3.0).abs() < 1e-7);
    }

    #[test]
    fn handles_a_two_dimensional_quadratic() {
        let result = minimize(
            |x| (x[0] - 1.0).powi(2) + 2.0 * (x[1] + 0.5).powi(2),
            &[0.0, 0.0],
            &tight_options(),
        );
        assert!(result.converged);
        assert!((result.best_point[0] - 1.0).abs() < 1e-3);
        assert!((result.best_point[1] + 0.5).abs() < 1e-3);
    }

    #[test]
    fn repeated_identical_calls_return_identical_results() {
        let objective = |x: &[f64]| x[0].powi(4) - 3.0 * x[0].powi(2) + x[0];
        let first = minimize(objective, &[0.5], &tight_options());
        let second = minimize(objective, &[0.5], &tight_options());
        assert_eq!(first, second);
    }

    #[test]
    fn exhausted_budget_reports_non_convergence_with_best_effort_point() {
        let options = SimplexOptions {
            max_iterations: 3,
            max_evaluations: 1000,
            ..tight_options()
        };
        let result = minimize(|x| (x[0] - 100.0).powi(2), &[0.0], &options);
        assert!(!result.converged);
        assert_eq!(result.iterations, 3);
        assert!(result.best_value.is_finite());
    }

    #[test]
    fn callback_sees_monotonically_improving_best_values() {
        let mut history = Vec::new();
        let result = minimize_with_callback(
            |x| (x[0] + 4.0).powi(2),
            &[3.0],
            &tight_options(),
            |_, value| history.push(value),
        );
        assert!(result.converged);
        assert_eq!(history.len(), result.iterations);
        for pair in history.windows(2) {
            assert!(pair[1] <= pair[0]);
        }
    }

    #[test]
    fn non_finite_objective_regions_are_avoided_not_masked() {
        // Singular below zero, quadratic above: the search must settle on the
        // finite side.
        let result = minimize(
            |x| {
                if x[0] <= 0.0 {
                    f64::NAN
                } else {
                    (x[0] - 1.5).powi(2)
                }
            },
            &[0.5],
            &tight_options(),
        );
        assert!(result.best_value.is_finite());
        assert!((result.best_point[0] - 1.5).abs() < 1e-3);
    }
}
