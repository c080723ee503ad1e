//! Gate kinds and their arity rules

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The seven supported combinational gate functions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GateKind {
    And,
    Or,
    Not,
    Nand,
    Nor,
    Xor,
    Xnor,
}

/// Number of inputs a gate kind accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Exactly this many inputs
    Exactly(usize),
    /// One or more inputs
    AtLeastOne,
}

impl Arity {
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Exactly(n) => count == n,
            Arity::AtLeastOne => count >= 1,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exactly(n) => write!(f, "exactly {}", n),
            Arity::AtLeastOne => write!(f, "at least one"),
        }
    }
}

impl GateKind {
    pub const ALL: [GateKind; 7] = [
        GateKind::And,
        GateKind::Or,
        GateKind::Not,
        GateKind::Nand,
        GateKind::Nor,
        GateKind::Xor,
        GateKind::Xnor,
    ];

    pub fn arity(self) -> Arity {
        match self {
            GateKind::Not => Arity::Exactly(1),
            GateKind::Xor | GateKind::Xnor => Arity::Exactly(2),
            GateKind::And | GateKind::Or | GateKind::Nand | GateKind::Nor => Arity::AtLeastOne,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GateKind::And => "AND",
            GateKind::Or => "OR",
            GateKind::Not => "NOT",
            GateKind::Nand => "NAND",
            GateKind::Nor => "NOR",
            GateKind::Xor => "XOR",
            GateKind::Xnor => "XNOR",
        }
    }

    /// Evaluate the gate function directly on concrete values.
    ///
    /// Callers are expected to pass a slice that satisfies [`GateKind::arity`].
    pub fn apply(self, inputs: &[bool]) -> bool {
        match self {
            GateKind::And => inputs.iter().all(|&v| v),
            GateKind::Or => inputs.iter().any(|&v| v),
            GateKind::Not => !inputs[0],
            GateKind::Nand => !inputs.iter().all(|&v| v),
            GateKind::Nor => !inputs.iter().any(|&v| v),
            GateKind::Xor => inputs[0] ^ inputs[1],
            GateKind::Xnor => !(inputs[0] ^ inputs[1]),
        }
    }
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a gate type string is not recognised
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownGateKind(pub String);

impl FromStr for GateKind {
    type Err = UnknownGateKind;

    /// Case-insensitive parse of a gate type name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AND" => Ok(GateKind::And),
            "OR" => Ok(GateKind::Or),
            "NOT" => Ok(GateKind::Not),
            "NAND" => Ok(GateKind::Nand),
            "NOR" => Ok(GateKind::Nor),
            "XOR" => Ok(GateKind::Xor),
            "XNOR" => Ok(GateKind::Xnor),
            _ => Err(UnknownGateKind(s.to_string())),
        }
    }
}
