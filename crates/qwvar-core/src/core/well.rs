use super::kernel::ImageSeriesKernel;
use super::units;
use serde::{Deserialize, Serialize};

/// Dielectric environment outside the well.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BarrierProfile {
    /// Identical barriers on both sides.
    Symmetric { eps_barrier: f64 },
    /// Different dielectric constants below and above the well.
    TwoBarrier { eps_bottom: f64, eps_top: f64 },
}

/// Static description of one quantum-well device.
///
/// `width_angstrom` is the full well width; everything else is dimensionless
/// or in Hartree atomic units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WellGeometry {
    pub reduced_mass: f64,
    pub width_angstrom: f64,
    pub eps_well: f64,
    pub barriers: BarrierProfile,
}

/// Constants derived from a [`WellGeometry`], recomputed in full whenever the
/// geometry (or the calibrated dielectric constant) changes. Never cached
/// across outer-loop iterations.
#[derive(Debug, Clone, PartialEq)]
pub struct WellParameters {
    pub reduced_mass: f64,
    pub eps_well: f64,
    /// Effective exciton Bohr radius, bohr.
    pub bohr_radius: f64,
    /// Effective Rydberg energy, hartree.
    pub rydberg: f64,
    /// Well half-width, bohr.
    pub half_width: f64,
    /// Top-barrier mirror factor; `None` for a symmetric well.
    pub mirror: Option<f64>,
    /// Exponential damping ratio of the image series.
    pub image_ratio: f64,
}

impl WellParameters {
    pub fn derive(geometry: &WellGeometry) -> Self {
        let mu = geometry.reduced_mass;
        let eps_well = geometry.eps_well;
        let bohr_radius = eps_well / mu;
        let rydberg = mu / (2.0 * eps_well * eps_well);
        let half_width = units::angstrom_to_bohr(geometry.width_angstrom) / 2.0;

        let (mirror, image_ratio) = match geometry.barriers {
            BarrierProfile::Symmetric { eps_barrier } => {
                (None, (eps_well - eps_barrier) / (eps_well + eps_barrier))
            }
            BarrierProfile::TwoBarrier { eps_bottom, eps_top } => {
                let k = (eps_well - eps_top) / (eps_well + eps_top);
                let q = (eps_well - eps_bottom) / (eps_well + eps_bottom) * k;
                (Some(k), q)
            }
        };

        Self {
            reduced_mass: mu,
            eps_well,
            bohr_radius,
            rydberg,
            half_width,
            mirror,
            image_ratio,
        }
    }

    pub fn image_kernel(&self, num_series: usize) -> ImageSeriesKernel {
        ImageSeriesKernel {
            half_width: self.half_width,
            image_ratio: self.image_ratio,
            mirror: self.mirror,
            num_series,
        }
    }

    /// Convert a binding energy in effective Rydberg units to meV.
    #[inline]
    pub fn binding_energy_mev(&self, energy_ry: f64) -> f64 {
        -units::hartree_to_mev(energy_ry * self.rydberg)
    }
}
