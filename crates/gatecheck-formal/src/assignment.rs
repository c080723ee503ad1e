//! Validation of input and internal-signal assignments against a circuit

use std::time::Instant;

use gatecheck_circuit::Circuit;
use indexmap::IndexMap;

use crate::aig::Scope;
use crate::compile::{compile, CompileMode};
use crate::observer::{CheckObserver, QueryKind};
use crate::oracle::{OracleSession, SatOracle, SatResult};
use crate::{FormalError, FormalResult};

/// Signal name to forced value
pub type Assignment = IndexMap<String, bool>;

/// Result of validating an assignment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignmentOutcome {
    /// The assignment is consistent; carries a witness value for every output
    Consistent { outputs: IndexMap<String, bool> },
    /// An input assignment names something that is not a primary input
    UndefinedInput(String),
    /// A signal assignment names something outside the circuit's namespace
    UndefinedSignal(String),
    /// No value for the free inputs satisfies both the gates and the
    /// assignment
    Contradiction,
    /// The oracle could not decide
    Indeterminate(String),
}

impl AssignmentOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, AssignmentOutcome::Consistent { .. })
    }

    pub fn outputs(&self) -> Option<&IndexMap<String, bool>> {
        match self {
            AssignmentOutcome::Consistent { outputs } => Some(outputs),
            _ => None,
        }
    }

    /// Human-readable reason for an invalid outcome
    pub fn reason(&self) -> Option<String> {
        match self {
            AssignmentOutcome::Consistent { .. } => None,
            AssignmentOutcome::UndefinedInput(name) => {
                Some(format!("Input '{}' is not defined in the circuit.", name))
            }
            AssignmentOutcome::UndefinedSignal(name) => {
                Some(format!("Signal '{}' is not defined in the circuit.", name))
            }
            AssignmentOutcome::Contradiction => Some(
                "Contradiction detected: the input or signal assignments lead to an \
                 unsatisfiable circuit."
                    .to_string(),
            ),
            AssignmentOutcome::Indeterminate(reason) => {
                Some(format!("Indeterminate: the oracle could not decide ({})", reason))
            }
        }
    }
}

/// Check `inputs` and `signals` against the gate semantics of `circuit`.
///
/// Unmentioned inputs are left free; when the assignment is consistent the
/// reported outputs come from one satisfying witness and need not be unique.
pub fn check_assignment<O: SatOracle>(
    circuit: &Circuit,
    inputs: &Assignment,
    signals: &Assignment,
    oracle: O,
    observer: &dyn CheckObserver,
) -> FormalResult<AssignmentOutcome> {
    let mut session = OracleSession::new(oracle);

    let compiled = compile(circuit, CompileMode::Constrained, Scope(0), session.aig_mut())
        .map_err(|e| FormalError::structural("circuit", e))?;
    observer.on_compiled("circuit", &compiled, session.aig());

    for &constraint in &compiled.constraints {
        session.assert(constraint);
    }

    for (name, &value) in inputs {
        let lit = match compiled.signal(name) {
            Some(lit) if circuit.is_input(name) => lit,
            _ => {
                log::debug!("assignment names unknown input '{}'", name);
                return Ok(AssignmentOutcome::UndefinedInput(name.clone()));
            }
        };
        session.assert(lit.with_polarity(value));
    }

    for (name, &value) in signals {
        let lit = match compiled.signal(name) {
            Some(lit) => lit,
            None => {
                log::debug!("assignment names unknown signal '{}'", name);
                return Ok(AssignmentOutcome::UndefinedSignal(name.clone()));
            }
        };
        session.assert(lit.with_polarity(value));
    }

    let start = Instant::now();
    let result = session.check()?;
    observer.on_query(QueryKind::Assignment, &result, start.elapsed());

    match result {
        SatResult::Sat => {
            let model = session.model().ok_or_else(|| {
                FormalError::SolverError("SAT answer without a model".to_string())
            })?;
            let outputs = compiled
                .outputs
                .iter()
                .map(|(name, lit)| (name.clone(), session.evaluate(model, *lit)))
                .collect();
            Ok(AssignmentOutcome::Consistent { outputs })
        }
        SatResult::Unsat => Ok(AssignmentOutcome::Contradiction),
        SatResult::Unknown(reason) => Ok(AssignmentOutcome::Indeterminate(reason)),
    }
}
