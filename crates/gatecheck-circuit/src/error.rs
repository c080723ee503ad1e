//! Structural error types for circuit validation

use thiserror::Error;

use crate::gate::{Arity, GateKind};

/// Result type for structural validation
pub type Result<T> = std::result::Result<T, StructuralError>;

/// A violation of circuit well-formedness, detected before any query runs
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StructuralError {
    /// Two gates, two primary inputs, or an input and a gate share a name
    #[error("duplicate signal name '{0}' in circuit")]
    DuplicateSignal(String),

    /// A gate reads a signal that is not a primary input or an earlier gate
    #[error("signal '{signal}' used in gate '{gate}' is not defined")]
    UndefinedSignal { gate: String, signal: String },

    /// The gate type string is not one of the supported kinds
    #[error("unsupported gate type '{gate_type}' on gate '{gate}'")]
    UnsupportedGateType { gate: String, gate_type: String },

    /// The gate has the wrong number of inputs for its kind
    #[error("{kind} gate '{gate}' must have {expected} input(s), found {found}")]
    Arity {
        gate: String,
        kind: GateKind,
        expected: Arity,
        found: usize,
    },

    /// The circuit declares no outputs
    #[error("circuit declares no outputs")]
    NoOutputs,

    /// An output names a signal that does not exist
    #[error("output signal '{0}' is not defined in the circuit")]
    UndefinedOutput(String),
}

/// Errors that can occur while loading a circuit description file
#[derive(Debug, Error)]
pub enum LoadError {
    /// I/O error reading the description file
    #[error("I/O error: {0}")]
    Io(String),

    /// Malformed JSON or TOML
    #[error("failed to parse circuit description: {0}")]
    Parse(String),

    /// Extension is neither `.json` nor `.toml`
    #[error("unrecognised circuit description format '{0}'")]
    UnknownFormat(String),
}
