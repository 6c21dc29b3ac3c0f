//! # Core Module
//!
//! This module provides the stateless physical foundation for the variational
//! quantum-well exciton calculation: units, special functions, the regularized
//! Coulomb kernel, well geometry, and the weighted integration grid.
//!
//! ## Overview
//!
//! Everything in this layer is a pure function of its inputs. Hartree atomic
//! units are used throughout unless a function name says otherwise; device
//! widths enter in angstroms and experimental reference energies in meV, and
//! both are converted at the boundary.
//!
//! ## Architecture
//!
//! The module is organized into specialized submodules:
//!
//! - **Units** ([`units`]) - Physical constants and unit conversions
//! - **Special Functions** ([`specfn`]) - Bessel and Struve function evaluations
//! - **Coulomb Kernel** ([`kernel`]) - Regularized image-series attraction kernel
//! - **Well Geometry** ([`well`]) - Quantum-well description and derived parameters
//! - **Integration Grid** ([`grid`]) - Sample positions with trigonometric weights
//!
//! ## Scientific Foundation
//!
//! The kernel follows the image-charge expansion of the electron-hole Coulomb
//! attraction in a dielectric slab: each term reflects the source position
//! across the well boundaries at increasing multiples of the half-width and is
//! damped by a power of the dielectric mismatch ratio. The in-plane part of
//! the matrix element reduces to a combination of the Struve function **H₁**
//! and the Bessel function **Y₁**, which decays smoothly with separation.

pub mod grid;
pub mod kernel;
pub mod specfn;
pub mod units;
pub mod well;
