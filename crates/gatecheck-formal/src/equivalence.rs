//! Combinational equivalence checking
//!
//! Both circuits are compiled in inlined mode into one pool. Primary inputs
//! with the same name become the same variable; gate signals are scoped per
//! circuit. Outputs are paired by position, never by name.
//!
//! # Algorithm
//!
//! 1. Compile both circuits (scopes 0 and 1)
//! 2. Output counts differ: not equivalent, no query
//! 3. Build a miter: XOR each output pair, OR all XORs
//! 4. UNSAT = equivalent, SAT = the model is a counterexample

use std::time::Instant;

use gatecheck_circuit::Circuit;
use indexmap::IndexMap;

use crate::aig::{Aig, AigLit, Scope};
use crate::compile::{compile, CompileMode, CompiledCircuit};
use crate::observer::{CheckObserver, QueryKind};
use crate::oracle::{Model, OracleSession, SatOracle, SatResult};
use crate::{FormalError, FormalResult};

// ============================================================================
// Results
// ============================================================================

/// One positional output pair whose values disagree under a counterexample
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputMismatch {
    /// Index into both output lists
    pub position: usize,
    pub left_name: String,
    pub right_name: String,
    pub left_value: bool,
    pub right_value: bool,
}

/// Input assignment on which the circuits disagree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Counterexample {
    /// Value of every primary input of either circuit
    pub inputs: IndexMap<String, bool>,
    /// Exactly the pairs that differ under `inputs`
    pub differing_outputs: Vec<OutputMismatch>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NonEquivalence {
    /// Decided structurally; no query was made
    OutputCountMismatch { left: usize, right: usize },
    Counterexample(Counterexample),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EquivalenceVerdict {
    Equivalent,
    NotEquivalent(NonEquivalence),
    /// The oracle returned unknown or timed out
    Indeterminate(String),
}

/// Size of the combined formula
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MiterStats {
    pub variables: usize,
    pub and_nodes: usize,
    pub output_pairs: usize,
}

/// Result of equivalence checking
#[derive(Debug, Clone)]
pub struct EquivalenceResult {
    pub verdict: EquivalenceVerdict,
    pub stats: MiterStats,
    /// Oracle time in milliseconds
    pub time_ms: u64,
}

impl EquivalenceResult {
    pub fn is_equivalent(&self) -> bool {
        matches!(self.verdict, EquivalenceVerdict::Equivalent)
    }

    pub fn is_indeterminate(&self) -> bool {
        matches!(self.verdict, EquivalenceVerdict::Indeterminate(_))
    }

    pub fn counterexample(&self) -> Option<&Counterexample> {
        match &self.verdict {
            EquivalenceVerdict::NotEquivalent(NonEquivalence::Counterexample(cex)) => Some(cex),
            _ => None,
        }
    }
}

// ============================================================================
// Miter Construction
// ============================================================================

/// A positional output pair and its mismatch literal
#[derive(Debug, Clone)]
pub struct OutputPair {
    pub position: usize,
    pub left: (String, AigLit),
    pub right: (String, AigLit),
    pub differs: AigLit,
}

/// Combined formula that is true iff some output pair differs
#[derive(Debug, Clone)]
pub struct Miter {
    pub output: AigLit,
    pub pairs: Vec<OutputPair>,
}

/// Build a miter over two circuits compiled into the same pool.
///
/// Pairs the first `min(len)` outputs by position; callers reject differing
/// output counts before getting here.
pub fn build_miter(aig: &mut Aig, left: &CompiledCircuit, right: &CompiledCircuit) -> Miter {
    let pairs: Vec<OutputPair> = left
        .outputs
        .iter()
        .zip(&right.outputs)
        .enumerate()
        .map(|(position, (l, r))| OutputPair {
            position,
            left: l.clone(),
            right: r.clone(),
            differs: aig.add_xor(l.1, r.1),
        })
        .collect();

    let output = aig.add_or_all(pairs.iter().map(|p| p.differs));
    Miter { output, pairs }
}

fn extract_counterexample<O: SatOracle>(
    session: &OracleSession<O>,
    model: &Model,
    left: &CompiledCircuit,
    right: &CompiledCircuit,
    left_circuit: &Circuit,
    right_circuit: &Circuit,
    miter: &Miter,
) -> Counterexample {
    let mut inputs = IndexMap::new();
    for (name, compiled) in left_circuit
        .inputs()
        .iter()
        .map(|n| (n, left))
        .chain(right_circuit.inputs().iter().map(|n| (n, right)))
    {
        if inputs.contains_key(name) {
            continue;
        }
        if let Some(lit) = compiled.signal(name) {
            inputs.insert(name.clone(), session.evaluate(model, lit));
        }
    }

    let differing_outputs = miter
        .pairs
        .iter()
        .filter_map(|pair| {
            let left_value = session.evaluate(model, pair.left.1);
            let right_value = session.evaluate(model, pair.right.1);
            (left_value != right_value).then(|| OutputMismatch {
                position: pair.position,
                left_name: pair.left.0.clone(),
                right_name: pair.right.0.clone(),
                left_value,
                right_value,
            })
        })
        .collect();

    Counterexample {
        inputs,
        differing_outputs,
    }
}

// ============================================================================
// SAT-Based Equivalence Checking
// ============================================================================

/// Decide whether `left` and `right` compute the same outputs for every
/// input.
///
/// `labels` name the two circuits in structural errors and observer events.
pub fn check_circuits<O: SatOracle>(
    left: &Circuit,
    right: &Circuit,
    labels: (&str, &str),
    oracle: O,
    observer: &dyn CheckObserver,
) -> FormalResult<EquivalenceResult> {
    let mut session = OracleSession::new(oracle);

    let compiled_left = compile(left, CompileMode::Inlined, Scope(0), session.aig_mut())
        .map_err(|e| FormalError::structural(labels.0, e))?;
    observer.on_compiled(labels.0, &compiled_left, session.aig());

    let compiled_right = compile(right, CompileMode::Inlined, Scope(1), session.aig_mut())
        .map_err(|e| FormalError::structural(labels.1, e))?;
    observer.on_compiled(labels.1, &compiled_right, session.aig());

    let (n_left, n_right) = (compiled_left.outputs.len(), compiled_right.outputs.len());
    if n_left != n_right {
        log::info!(
            "'{}' has {} output(s), '{}' has {}: not equivalent",
            labels.0,
            n_left,
            labels.1,
            n_right
        );
        return Ok(EquivalenceResult {
            verdict: EquivalenceVerdict::NotEquivalent(NonEquivalence::OutputCountMismatch {
                left: n_left,
                right: n_right,
            }),
            stats: MiterStats {
                variables: session.aig().var_count(),
                and_nodes: session.aig().and_count(),
                output_pairs: 0,
            },
            time_ms: 0,
        });
    }

    let miter = build_miter(session.aig_mut(), &compiled_left, &compiled_right);
    session.assert(miter.output);

    let stats = MiterStats {
        variables: session.aig().var_count(),
        and_nodes: session.aig().and_count(),
        output_pairs: miter.pairs.len(),
    };

    let start = Instant::now();
    let result = session.check()?;
    let elapsed = start.elapsed();
    observer.on_query(QueryKind::Equivalence, &result, elapsed);

    let verdict = match result {
        SatResult::Unsat => EquivalenceVerdict::Equivalent,
        SatResult::Unknown(reason) => EquivalenceVerdict::Indeterminate(reason),
        SatResult::Sat => {
            let model = session.model().ok_or_else(|| {
                FormalError::SolverError("SAT answer without a model".to_string())
            })?;
            let cex = extract_counterexample(
                &session,
                model,
                &compiled_left,
                &compiled_right,
                left,
                right,
                &miter,
            );
            EquivalenceVerdict::NotEquivalent(NonEquivalence::Counterexample(cex))
        }
    };

    Ok(EquivalenceResult {
        verdict,
        stats,
        time_ms: elapsed.as_millis() as u64,
    })
}

// ============================================================================
// Tests
// ============================================================================
