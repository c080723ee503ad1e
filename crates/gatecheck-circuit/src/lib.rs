//! Combinational circuit model for gatecheck
//!
//! This crate provides:
//! - Circuit description records (JSON/TOML loadable)
//! - Gate kinds with arity rules
//! - Structural validation producing a [`Circuit`]

pub mod circuit;
pub mod description;
pub mod error;
pub mod gate;

pub use circuit::{validate, Circuit, Gate};
pub use description::{CircuitDescription, GateDescription};
pub use error::{LoadError, Result, StructuralError};
pub use gate::{Arity, GateKind, UnknownGateKind};
