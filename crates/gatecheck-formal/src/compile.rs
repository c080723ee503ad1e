//! Circuit to formula compilation
//!
//! Two modes are supported:
//! - [`CompileMode::Constrained`]: every gate gets its own variable plus a
//!   defining constraint `gate == f(inputs)`. Internal signals can then be
//!   forced independently and conflicts surface as unsatisfiability.
//! - [`CompileMode::Inlined`]: every gate maps straight to the composed
//!   expression over the input variables; no constraints are produced.

use gatecheck_circuit::{Circuit, GateKind, StructuralError};
use indexmap::IndexMap;

use crate::aig::{Aig, AigLit, Scope, VarKey};

/// How gate outputs are represented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompileMode {
    Constrained,
    Inlined,
}

/// Result of compiling one circuit into a pool
#[derive(Debug, Clone)]
pub struct CompiledCircuit {
    /// Scope the circuit's internal signals were declared under
    pub scope: Scope,
    /// Every signal in the circuit's namespace
    pub signals: IndexMap<String, AigLit>,
    /// Gate-defining constraints (empty in inlined mode)
    pub constraints: Vec<AigLit>,
    /// Outputs in declaration order
    pub outputs: Vec<(String, AigLit)>,
}

impl CompiledCircuit {
    pub fn signal(&self, name: &str) -> Option<AigLit> {
        self.signals.get(name).copied()
    }
}

/// Apply a gate function to already-compiled input literals.
///
/// `args` must satisfy the arity of `kind`.
pub fn gate_function(aig: &mut Aig, kind: GateKind, args: &[AigLit]) -> AigLit {
    match kind {
        GateKind::And => aig.add_and_all(args.iter().copied()),
        GateKind::Or => aig.add_or_all(args.iter().copied()),
        GateKind::Not => args[0].invert(),
        GateKind::Nand => aig.add_and_all(args.iter().copied()).invert(),
        GateKind::Nor => aig.add_or_all(args.iter().copied()).invert(),
        GateKind::Xor => aig.add_xor(args[0], args[1]),
        GateKind::Xnor => aig.add_xor(args[0], args[1]).invert(),
    }
}

/// Compile `circuit` into `aig`.
///
/// Primary inputs are declared as shared [`VarKey::Input`] variables; in
/// constrained mode gate variables are declared under `scope`.
pub fn compile(
    circuit: &Circuit,
    mode: CompileMode,
    scope: Scope,
    aig: &mut Aig,
) -> Result<CompiledCircuit, StructuralError> {
    let mut signals: IndexMap<String, AigLit> =
        IndexMap::with_capacity(circuit.inputs().len() + circuit.gates().len());
    let mut constraints = Vec::new();

    for input in circuit.inputs() {
        let lit = aig.declare(VarKey::input(input.as_str()));
        signals.insert(input.clone(), lit);
    }

    for gate in circuit.gates() {
        let args = gate
            .inputs
            .iter()
            .map(|s| {
                signals
                    .get(s)
                    .copied()
                    .ok_or_else(|| StructuralError::UndefinedSignal {
                        gate: gate.name.clone(),
                        signal: s.clone(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let expr = gate_function(aig, gate.kind, &args);

        let lit = match mode {
            CompileMode::Inlined => expr,
            CompileMode::Constrained => {
                let var = aig.declare(VarKey::internal(scope, gate.name.as_str()));
                constraints.push(aig.add_eq(var, expr));
                var
            }
        };
        signals.insert(gate.name.clone(), lit);
    }

    // Guards against a circuit that validated but still cannot resolve an
    // output here.
    let outputs = circuit
        .outputs()
        .iter()
        .map(|o| {
            signals
                .get(o)
                .map(|&lit| (o.clone(), lit))
                .ok_or_else(|| StructuralError::UndefinedOutput(o.clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    log::debug!(
        "compiled scope {} ({:?}): {} signal(s), {} constraint(s), {} output(s)",
        scope.0,
        mode,
        signals.len(),
        constraints.len(),
        outputs.len()
    );

    Ok(CompiledCircuit {
        scope,
        signals,
        constraints,
        outputs,
    })
}
