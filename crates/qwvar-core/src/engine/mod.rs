//! # Engine Module
//!
//! This module implements the distributed evaluation and minimization engine:
//! the machinery that turns one trial parameter into one binding-energy value
//! across a pool of lock-step worker slots, and drives that value through a
//! derivative-free minimization.
//!
//! ## Overview
//!
//! Every worker slot executes the same program. The only cross-slot value is
//! the trial parameter, which moves exclusively through the blocking
//! collective operations of [`comm::Communicator`]; grid, partition, and
//! derived parameters are read-only after construction and need no locking.
//! The minimizer itself runs identically on every slot so that each slot
//! participates in every broadcast/reduce rendezvous — divergent control flow
//! between slots deadlocks the pool, and the engine offers prevention (this
//! discipline), not recovery.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Run parameters, tolerances, and builders
//! - **Collectives** ([`comm`]) - Broadcast/all-reduce over a fixed slot pool
//! - **Partitioning** ([`partition`]) - Round-robin grid index assignment
//! - **Functional** ([`functional`]) - The distributed binding-energy evaluation
//! - **Minimizer** ([`minimize`]) - Derivative-free Nelder-Mead simplex search
//! - **Progress** ([`progress`]) - Coordinator-side progress callbacks
//! - **Errors** ([`error`]) - Engine-specific error types

pub mod comm;
pub mod config;
pub mod error;
pub mod functional;
pub mod minimize;
pub mod partition;
pub mod progress;
