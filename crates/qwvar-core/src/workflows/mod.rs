//! # Workflows Module
//!
//! High-level entry points that tie the `core` physics and the `engine`
//! machinery together into complete procedures.
//!
//! ## Overview
//!
//! Each workflow is written to be executed by every slot of a worker pool
//! simultaneously (single program, multiple data): pass the slot's
//! [`Communicator`](crate::engine::comm::Communicator) in and call the
//! workflow from every slot. A pool of one ([`SerialComm`](crate::engine::comm::SerialComm))
//! runs the identical code path. Progress reporting and logging are emitted
//! by the coordinator slot only; the numerical results are identical on every
//! slot.
//!
//! ## Workflows
//!
//! - **Binding** ([`bind`]) - Variational search for the exciton radius and
//!   binding energy of a single quantum-well geometry.
//! - **Calibration** ([`calibrate`]) - Outer optimization of the well
//!   dielectric constant against a set of experimental reference energies,
//!   with one full variational search per geometry per outer evaluation.

pub mod bind;
pub mod calibrate;
