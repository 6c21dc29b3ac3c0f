use super::specfn::{bessel_y1, struve_h1};
use std::f64::consts::FRAC_PI_2;

// Below this value of 2|gamma|/a the kernel is replaced by its analytic limit.
const DEGENERATE_SEPARATION: f64 = 1.0e-9;

/// In-plane Coulomb matrix element for an electron-hole pair separated by
/// `gamma` along the growth axis, for trial exciton radius `a` (both in bohr).
///
/// The exact form is `x * (pi/2 * (H1(x) - Y1(x)) - 1)` with `x = 2|gamma|/a`;
/// it decays like `1/x` and tends to `1` as the separation vanishes, which is
/// the value returned inside the degenerate window.
#[inline]
pub fn attraction(a: f64, gamma: f64) -> f64 {
    let x = 2.0 * gamma.abs() / a;
    if x < DEGENERATE_SEPARATION {
        1.0
    } else {
        x * (FRAC_PI_2 * (struve_h1(x) - bessel_y1(x)) - 1.0)
    }
}

/// A regularized Coulomb-like kernel evaluated for one grid-point pair.
///
/// Implementations must be pure: bit-for-bit reproducible for identical
/// inputs, with no side effects.
pub trait CoulombKernel: Send + Sync {
    fn evaluate(&self, a: f64, ze: f64, zh: f64) -> f64;
}

/// Truncated image-charge expansion of the electron-hole attraction in a
/// dielectric slab of half-width `half_width`.
///
/// Each series term reflects the hole position across the slab boundaries at
/// increasing multiples of the half-width and is damped by `q^n`. With
/// `mirror` set, the top and bottom barriers differ and every reflection
/// carries the top-barrier mismatch factor; without it the slab is symmetric
/// and only the `q^n` damping remains.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageSeriesKernel {
    pub half_width: f64,
    pub image_ratio: f64,
    pub mirror: Option<f64>,
    pub num_series: usize,
}

impl CoulombKernel for ImageSeriesKernel {
    fn evaluate(&self, a: f64, ze: f64, zh: f64) -> f64 {
        match self.mirror {
            Some(k) => self.evaluate_two_barrier(a, ze, zh, k),
            None => self.evaluate_symmetric(a, ze, zh),
        }
    }
}

impl ImageSeriesKernel {
    fn evaluate_two_barrier(&self, a: f64, ze: f64, zh: f64, k: f64) -> f64 {
        let l = self.half_width;
        let q = self.image_ratio;
        let mut sum = attraction(a, ze - zh) + k * attraction(a, ze + zh);
        if q == 0.0 {
            return sum;
        }
        let mut qn = 1.0;
        for n in 1..=self.num_series {
            qn *= q;
            let zp = -zh + 4.0 * n as f64 * l;
            let zm = zh + 4.0 * n as f64 * l;
            sum += qn
                * (k * attraction(a, ze - zp)
                    + attraction(a, ze + zp)
                    + attraction(a, ze - zm)
                    + attraction(a, ze + zm) / k);
        }
        sum
    }

    fn evaluate_symmetric(&self, a: f64, ze: f64, zh: f64) -> f64 {
        let l = self.half_width;
        let q = self.image_ratio;
        let mut sum = attraction(a, ze - zh);
        if q == 0.0 {
            return sum;
        }
        let mut qn = 1.0;
        for n in 1..=self.num_series {
            qn *= q;
            let zp = -zh + 4.0 * n as f64 * l;
            let zm = zh + 4.0 * n as f64 * l;
            sum += qn
                * (attraction(a, ze - zp)
                    + attraction(a, ze + zp)
                    + attraction(a, ze - zm)
                    + attraction(a, ze + zm));
        }
        sum
    }
}
