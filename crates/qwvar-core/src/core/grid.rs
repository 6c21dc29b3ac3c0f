use std::f64::consts::PI;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum GridError {
    #[error("Grid needs at least two points, got {0}")]
    TooFewPoints(usize),

    #[error("Position and weight sequences differ in length: {positions} vs {weights}")]
    MismatchedLengths { positions: usize, weights: usize },
}

/// Ordered sample positions along the growth axis with precomputed confinement
/// weights. Immutable once constructed; rebuilt whenever geometry changes.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    positions: Vec<f64>,
    weights: Vec<f64>,
    spacing: f64,
}

impl Grid {
    /// Half-range convention: `num_points` samples spanning `[-2l, 0]` with
    /// `sin^2(pi z / 2l)` weights. Used with the two-barrier kernel, where the
    /// boundary condition is baked into the weight profile.
    pub fn half_range(half_width: f64, num_points: usize) -> Result<Self, GridError> {
        let positions = linspace(-2.0 * half_width, 0.0, num_points)?;
        let weights = positions
            .iter()
            .map(|z| (PI * z / (2.0 * half_width)).sin().powi(2))
            .collect();
        Ok(Self::assemble(positions, weights))
    }

    /// Full-range convention: `num_points` samples spanning `[-l, l]` with
    /// `cos^2(pi z / 2l)` weights. Used with the symmetric kernel.
    pub fn full_range(half_width: f64, num_points: usize) -> Result<Self, GridError> {
        let positions = linspace(-half_width, half_width, num_points)?;
        let weights = positions
            .iter()
            .map(|z| (PI * z / (2.0 * half_width)).cos().powi(2))
            .collect();
        Ok(Self::assemble(positions, weights))
    }

    /// Build a grid from explicit positions and weights. Positions must be
    /// uniformly spaced; the spacing is taken from the first pair.
    pub fn from_parts(positions: Vec<f64>, weights: Vec<f64>) -> Result<Self, GridError> {
        if positions.len() < 2 {
            return Err(GridError::TooFewPoints(positions.len()));
        }
        if positions.len() != weights.len() {
            return Err(GridError::MismatchedLengths {
                positions: positions.len(),
                weights: weights.len(),
            });
        }
        Ok(Self::assemble(positions, weights))
    }

    fn assemble(positions: Vec<f64>, weights: Vec<f64>) -> Self {
        let spacing = positions[1] - positions[0];
        Self {
            positions,
            weights,
            spacing,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    #[inline]
    pub fn spacing(&self) -> f64 {
        self.spacing
    }

    #[inline]
    pub fn position(&self, index: usize) -> f64 {
        self.positions[index]
    }

    #[inline]
    pub fn weight(&self, index: usize) -> f64 {
        self.weights[index]
    }

    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.positions
            .iter()
            .copied()
            .zip(self.weights.iter().copied())
    }
}

fn linspace(start: f64, end: f64, num_points: usize) -> Result<Vec<f64>, GridError> {
    if num_points < 2 {
        return Err(GridError::TooFewPoints(num_points));
    }
    let step = (end - start) / (num_points - 1) as f64;
    Ok((0..num_points).map(|i| start + i as f64 * step).collect())
}
