//! Satisfiability oracle interface and per-query sessions

use std::collections::HashMap;

use crate::aig::{Aig, AigLit, AigNodeId, VarKey};
use crate::FormalResult;

/// Answer of a satisfiability check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SatResult {
    Sat,
    Unsat,
    /// The oracle gave up; carries the reason (timeout, resource limit)
    Unknown(String),
}

/// What a backend returns from a single solve
#[derive(Debug, Clone)]
pub enum SatOutcome {
    Sat(Model),
    Unsat,
    Unknown(String),
}

/// Satisfiability backend.
///
/// A backend is stateless between calls: every `solve` builds and discards
/// its own solver instance, so one oracle may serve concurrent queries.
pub trait SatOracle: Send + Sync {
    /// Short backend name for logs and reports
    fn name(&self) -> &str;

    /// Decide whether all `assertions` can hold at once
    fn solve(&self, aig: &Aig, assertions: &[AigLit]) -> FormalResult<SatOutcome>;
}

impl<O: SatOracle + ?Sized> SatOracle for &O {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn solve(&self, aig: &Aig, assertions: &[AigLit]) -> FormalResult<SatOutcome> {
        (**self).solve(aig, assertions)
    }
}

/// A complete assignment to the declared variables of a pool
#[derive(Debug, Clone, Default)]
pub struct Model {
    values: HashMap<AigNodeId, bool>,
}

impl Model {
    /// Build a model over every variable in `aig`.
    ///
    /// Variables the backend did not report are completed to `false`, so the
    /// result always answers every query with a definite value.
    pub fn complete(aig: &Aig, value_of: impl Fn(AigNodeId) -> Option<bool>) -> Self {
        let values = aig
            .variables()
            .map(|(_, id)| (id, value_of(id).unwrap_or(false)))
            .collect();
        Self { values }
    }

    /// Value of a variable node
    pub fn value(&self, id: AigNodeId) -> bool {
        self.values.get(&id).copied().unwrap_or(false)
    }

    /// Every declared variable with its value, in declaration order
    pub fn assignment<'a>(
        &'a self,
        aig: &'a Aig,
    ) -> impl Iterator<Item = (&'a VarKey, bool)> + 'a {
        aig.variables().map(move |(key, id)| (key, self.value(id)))
    }
}

/// One query's formula pool, accumulated constraints, and oracle answer
pub struct OracleSession<O: SatOracle> {
    aig: Aig,
    oracle: O,
    assertions: Vec<AigLit>,
    model: Option<Model>,
}

impl<O: SatOracle> OracleSession<O> {
    pub fn new(oracle: O) -> Self {
        Self {
            aig: Aig::new(),
            oracle,
            assertions: Vec::new(),
            model: None,
        }
    }

    pub fn aig(&self) -> &Aig {
        &self.aig
    }

    pub fn aig_mut(&mut self) -> &mut Aig {
        &mut self.aig
    }

    pub fn oracle_name(&self) -> &str {
        self.oracle.name()
    }

    /// Idempotent for a given key
    pub fn declare_boolean(&mut self, key: VarKey) -> AigLit {
        self.aig.declare(key)
    }

    /// Add a hard constraint
    pub fn assert(&mut self, formula: AigLit) {
        self.assertions.push(formula);
    }

    pub fn assertion_count(&self) -> usize {
        self.assertions.len()
    }

    pub fn check(&mut self) -> FormalResult<SatResult> {
        log::trace!(
            "{}: checking {} assertion(s) over {} variable(s), {} AND node(s)",
            self.oracle_name(),
            self.assertion_count(),
            self.aig.var_count(),
            self.aig.and_count()
        );

        let outcome = self.oracle.solve(&self.aig, &self.assertions)?;
        Ok(match outcome {
            SatOutcome::Sat(model) => {
                self.model = Some(model);
                SatResult::Sat
            }
            SatOutcome::Unsat => {
                self.model = None;
                SatResult::Unsat
            }
            SatOutcome::Unknown(reason) => {
                self.model = None;
                SatResult::Unknown(reason)
            }
        })
    }

    /// The model from the last satisfiable `check`
    pub fn model(&self) -> Option<&Model> {
        self.model.as_ref()
    }

    pub fn evaluate(&self, model: &Model, formula: AigLit) -> bool {
        self.aig.eval(formula, |id| model.value(id))
    }
}

// ============================================================================
// Test Backends
// ============================================================================

/// Oracle that always returns a fixed answer.
///
/// A satisfiable answer carries the all-false completed model.
#[derive(Debug, Clone)]
pub struct MockOracle {
    result: SatResult,
}

impl MockOracle {
    pub fn new(result: SatResult) -> Self {
        Self { result }
    }

    pub fn unknown(reason: &str) -> Self {
        Self::new(SatResult::Unknown(reason.to_string()))
    }
}

impl SatOracle for MockOracle {
    fn name(&self) -> &str {
        "mock"
    }

    fn solve(&self, aig: &Aig, _assertions: &[AigLit]) -> FormalResult<SatOutcome> {
        Ok(match &self.result {
            SatResult::Sat => SatOutcome::Sat(Model::complete(aig, |_| None)),
            SatResult::Unsat => SatOutcome::Unsat,
            SatResult::Unknown(reason) => SatOutcome::Unknown(reason.clone()),
        })
    }
}

/// Oracle that enumerates every assignment of the variables in the cone of
/// the assertions.
///
/// Gives up with `Unknown` above `max_vars` variables.
#[derive(Debug, Clone)]
pub struct ExhaustiveOracle {
    max_vars: usize,
}

impl ExhaustiveOracle {
    pub fn new(max_vars: usize) -> Self {
        Self {
            max_vars: max_vars.min(32),
        }
    }
}

impl Default for ExhaustiveOracle {
    fn default() -> Self {
        Self::new(20)
    }
}

impl SatOracle for ExhaustiveOracle {
    fn name(&self) -> &str {
        "exhaustive"
    }

    fn solve(&self, aig: &Aig, assertions: &[AigLit]) -> FormalResult<SatOutcome> {
        let cone = aig.cone(assertions);
        let free: Vec<AigNodeId> = aig
            .variables()
            .map(|(_, id)| id)
            .filter(|id| cone[id.0 as usize])
            .collect();

        if free.len() > self.max_vars {
            return Ok(SatOutcome::Unknown(format!(
                "{} free variables exceed exhaustive limit {}",
                free.len(),
                self.max_vars
            )));
        }

        for bits in 0u64..(1u64 << free.len()) {
            let value_of = |id: AigNodeId| {
                free.iter()
                    .position(|&v| v == id)
                    .map(|pos| (bits >> pos) & 1 == 1)
            };
            let holds = assertions
                .iter()
                .all(|&a| aig.eval(a, |id| value_of(id).unwrap_or(false)));
            if holds {
                return Ok(SatOutcome::Sat(Model::complete(aig, value_of)));
            }
        }

        Ok(SatOutcome::Unsat)
    }
}
