//! Validated circuit model

use indexmap::{IndexMap, IndexSet};
use std::collections::HashSet;

use crate::description::CircuitDescription;
use crate::error::{Result, StructuralError};
use crate::gate::GateKind;

/// A gate whose kind has been resolved and whose inputs are known to exist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gate {
    pub name: String,
    pub kind: GateKind,
    pub inputs: Vec<String>,
}

/// A structurally valid combinational circuit.
///
/// Only obtainable through [`validate`], so every value upholds:
/// unique signal names, gates in topological order, correct arity, and a
/// non-empty list of resolvable outputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Circuit {
    inputs: IndexSet<String>,
    gates: Vec<Gate>,
    outputs: Vec<String>,
}

impl Circuit {
    pub fn inputs(&self) -> &IndexSet<String> {
        &self.inputs
    }

    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    pub fn outputs(&self) -> &[String] {
        &self.outputs
    }

    pub fn is_input(&self, name: &str) -> bool {
        self.inputs.contains(name)
    }

    /// True if `name` is a primary input or a gate output
    pub fn has_signal(&self, name: &str) -> bool {
        self.is_input(name) || self.gates.iter().any(|g| g.name == name)
    }

    /// Simulate the circuit on a complete input assignment.
    ///
    /// Returns `None` if any primary input is missing from `assignment`.
    pub fn evaluate(&self, assignment: &IndexMap<String, bool>) -> Option<IndexMap<String, bool>> {
        let mut values: IndexMap<&str, bool> =
            IndexMap::with_capacity(self.inputs.len() + self.gates.len());

        for input in &self.inputs {
            values.insert(input.as_str(), *assignment.get(input)?);
        }

        for gate in &self.gates {
            let args: Vec<bool> = gate.inputs.iter().map(|s| values[s.as_str()]).collect();
            values.insert(gate.name.as_str(), gate.kind.apply(&args));
        }

        Some(
            self.outputs
                .iter()
                .map(|o| (o.clone(), values[o.as_str()]))
                .collect(),
        )
    }
}

/// Check a description for well-formedness and produce a [`Circuit`].
///
/// Checks run as separate passes in a fixed order and the first violation
/// is returned:
/// 1. duplicate signal names (inputs and gates share one namespace)
/// 2. every gate input refers to a primary input or an earlier gate
/// 3. gate types are supported and arities match
/// 4. outputs are non-empty and every output resolves
pub fn validate(desc: &CircuitDescription) -> Result<Circuit> {
    check_unique_names(desc)?;
    check_topological_order(desc)?;
    let gates = resolve_gates(desc)?;
    check_outputs(desc)?;

    Ok(Circuit {
        inputs: desc.inputs.iter().cloned().collect(),
        gates,
        outputs: desc.outputs.clone(),
    })
}

fn check_unique_names(desc: &CircuitDescription) -> Result<()> {
    let mut seen: HashSet<&str> = HashSet::new();
    let names = desc
        .inputs
        .iter()
        .map(String::as_str)
        .chain(desc.gates.iter().map(|g| g.name.as_str()));

    for name in names {
        if !seen.insert(name) {
            return Err(StructuralError::DuplicateSignal(name.to_string()));
        }
    }
    Ok(())
}

fn check_topological_order(desc: &CircuitDescription) -> Result<()> {
    let mut defined: HashSet<&str> = desc.inputs.iter().map(String::as_str).collect();

    for gate in &desc.gates {
        if let Some(missing) = gate.inputs.iter().find(|s| !defined.contains(s.as_str())) {
            return Err(StructuralError::UndefinedSignal {
                gate: gate.name.clone(),
                signal: missing.clone(),
            });
        }
        defined.insert(gate.name.as_str());
    }
    Ok(())
}

fn resolve_gates(desc: &CircuitDescription) -> Result<Vec<Gate>> {
    desc.gates
        .iter()
        .map(|g| {
            let kind: GateKind =
                g.gate_type
                    .parse()
                    .map_err(|_| StructuralError::UnsupportedGateType {
                        gate: g.name.clone(),
                        gate_type: g.gate_type.clone(),
                    })?;

            let expected = kind.arity();
            if !expected.accepts(g.inputs.len()) {
                return Err(StructuralError::Arity {
                    gate: g.name.clone(),
                    kind,
                    expected,
                    found: g.inputs.len(),
                });
            }

            Ok(Gate {
                name: g.name.clone(),
                kind,
                inputs: g.inputs.clone(),
            })
        })
        .collect()
}

fn check_outputs(desc: &CircuitDescription) -> Result<()> {
    if desc.outputs.is_empty() {
        return Err(StructuralError::NoOutputs);
    }

    let defined: HashSet<&str> = desc
        .inputs
        .iter()
        .map(String::as_str)
        .chain(desc.gates.iter().map(|g| g.name.as_str()))
        .collect();

    match desc.outputs.iter().find(|o| !defined.contains(o.as_str())) {
        Some(missing) => Err(StructuralError::UndefinedOutput(missing.clone())),
        None => Ok(()),
    }
}
