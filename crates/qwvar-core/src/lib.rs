//! # QWVAR Core Library
//!
//! A variational engine for computing the binding energy of an exciton confined
//! in a semiconductor quantum well, with the energy functional evaluated on a
//! grid distributed across a fixed pool of lock-step worker slots.
//!
//! ## Architectural Philosophy
//!
//! The library is designed with a strict three-layer architecture to ensure a
//! clear separation of concerns, making it modular, testable, and extensible.
//!
//! - **[`core`]: The Foundation.** Contains stateless physics: unit conversions
//!   (Hartree atomic units throughout), the special functions behind the
//!   regularized Coulomb kernel (`specfn`), the image-series kernel itself
//!   (`kernel`), well geometry with its derived parameters (`well`), and the
//!   weighted integration grid (`grid`).
//!
//! - **[`engine`]: The Logic Core.** This layer orchestrates the distributed
//!   evaluation and minimization: the collective-communication abstraction
//!   (`comm`), round-robin grid partitioning (`partition`), the distributed
//!   binding-energy functional (`functional`), the derivative-free simplex
//!   minimizer (`minimize`), plus configuration, progress reporting, and
//!   error types.
//!
//! - **[`workflows`]: The Public API.** The highest-level, user-facing layer.
//!   It ties the `engine` and `core` together to execute complete procedures:
//!   a single-geometry variational run (`bind`) and the multi-geometry
//!   dielectric calibration loop (`calibrate`).

pub mod core;
pub mod engine;
pub mod workflows;
