//! Circuit description records as supplied by callers
//!
//! A description is the untyped, unvalidated form of a circuit: gate types are
//! plain strings and signal references are not yet checked. Use
//! [`crate::validate`] to turn one into a [`crate::Circuit`].

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::LoadError;

/// A circuit as written by its author
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitDescription {
    /// Primary input signal names
    #[serde(default)]
    pub inputs: Vec<String>,

    /// Gates, expected in topological order
    #[serde(default)]
    pub gates: Vec<GateDescription>,

    /// Output signal names
    #[serde(default)]
    pub outputs: Vec<String>,
}

/// A single gate record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateDescription {
    /// Gate name, which is also the name of its output signal
    pub name: String,

    /// Gate type, matched case-insensitively
    #[serde(rename = "type")]
    pub gate_type: String,

    /// Input signal names
    #[serde(default)]
    pub inputs: Vec<String>,
}

impl CircuitDescription {
    /// Start a description with the given primary inputs
    pub fn with_inputs<I, S>(inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            inputs: inputs.into_iter().map(Into::into).collect(),
            gates: Vec::new(),
            outputs: Vec::new(),
        }
    }

    /// Append a gate
    pub fn gate<I, S>(mut self, name: &str, gate_type: &str, inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.gates.push(GateDescription {
            name: name.to_string(),
            gate_type: gate_type.to_string(),
            inputs: inputs.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Set the output list
    pub fn outputs<I, S>(mut self, outputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.outputs = outputs.into_iter().map(Into::into).collect();
        self
    }

    /// Parse a JSON description
    pub fn from_json(s: &str) -> Result<Self, LoadError> {
        serde_json::from_str(s).map_err(|e| LoadError::Parse(e.to_string()))
    }

    /// Parse a TOML description
    pub fn from_toml(s: &str) -> Result<Self, LoadError> {
        toml::from_str(s).map_err(|e| LoadError::Parse(e.to_string()))
    }

    /// Load a description from disk, choosing the format by extension
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let contents =
            std::fs::read_to_string(path).map_err(|e| LoadError::Io(e.to_string()))?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&contents),
            Some("toml") => Self::from_toml(&contents),
            other => Err(LoadError::UnknownFormat(
                other.unwrap_or_default().to_string(),
            )),
        }
    }
}
