//! SAT oracle backed by varisat
//!
//! The cone of the asserted literals is Tseitin-encoded into CNF: one SAT
//! variable per AIG node, three clauses per AND node, one unit clause per
//! assertion.

use std::collections::HashSet;
use std::sync::mpsc;
use std::time::Duration;

use varisat::{CnfFormula, ExtendFormula, Lit, Solver, Var};

use crate::aig::{Aig, AigLit, AigNode, AigNodeId};
use crate::oracle::{Model, SatOracle, SatOutcome};
use crate::{FormalError, FormalResult};

/// Varisat-based oracle with an optional wall-clock timeout
#[derive(Debug, Clone, Default)]
pub struct VarisatOracle {
    timeout: Option<Duration>,
}

impl VarisatOracle {
    pub fn new() -> Self {
        Self { timeout: None }
    }

    /// Give up with `Unknown` if no answer arrives within `timeout`.
    ///
    /// The solve runs on a worker thread; on timeout the worker is detached
    /// and its answer discarded. The solve is abandoned, not cancelled: the
    /// thread keeps its CPU until varisat finishes.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

fn sat_lit(lit: AigLit) -> Lit {
    let var = Var::from_index(lit.node.0 as usize);
    if lit.inverted {
        Lit::negative(var)
    } else {
        Lit::positive(var)
    }
}

/// Tseitin encoding of the cone of `assertions`, with every assertion as a
/// unit clause
pub fn aig_to_cnf(aig: &Aig, assertions: &[AigLit]) -> CnfFormula {
    let mut formula = CnfFormula::new();
    let cone = aig.cone(assertions);

    // Node 0 is always false
    formula.add_clause(&[Lit::negative(Var::from_index(0))]);

    for (idx, node) in aig.nodes().iter().enumerate() {
        if !cone[idx] {
            continue;
        }
        if let AigNode::And { left, right } = node {
            let out = Lit::positive(Var::from_index(idx));
            let left_lit = sat_lit(*left);
            let right_lit = sat_lit(*right);

            // (out -> left), (out -> right), (left AND right -> out)
            formula.add_clause(&[!out, left_lit]);
            formula.add_clause(&[!out, right_lit]);
            formula.add_clause(&[out, !left_lit, !right_lit]);
        }
    }

    for &assertion in assertions {
        formula.add_clause(&[sat_lit(assertion)]);
    }

    formula
}

type RawAnswer = Result<Option<Vec<Lit>>, String>;

fn run_solver(formula: &CnfFormula) -> RawAnswer {
    let mut solver = Solver::new();
    solver.add_formula(formula);

    match solver.solve() {
        Ok(true) => Ok(solver.model()),
        Ok(false) => Ok(None),
        Err(e) => Err(e.to_string()),
    }
}

impl SatOracle for VarisatOracle {
    fn name(&self) -> &str {
        "varisat"
    }

    fn solve(&self, aig: &Aig, assertions: &[AigLit]) -> FormalResult<SatOutcome> {
        let formula = aig_to_cnf(aig, assertions);

        let answer = match self.timeout {
            None => run_solver(&formula),
            Some(timeout) => {
                let (tx, rx) = mpsc::channel();
                std::thread::Builder::new()
                    .name("gatecheck-sat".to_string())
                    .spawn(move || {
                        // The receiver is gone if we already timed out.
                        let _ = tx.send(run_solver(&formula));
                    })
                    .map_err(|e| FormalError::SolverError(e.to_string()))?;

                match rx.recv_timeout(timeout) {
                    Ok(answer) => answer,
                    Err(mpsc::RecvTimeoutError::Timeout) => {
                        log::warn!("varisat: no answer after {:?}", timeout);
                        return Ok(SatOutcome::Unknown(format!(
                            "timeout after {} ms",
                            timeout.as_millis()
                        )));
                    }
                    Err(mpsc::RecvTimeoutError::Disconnected) => {
                        return Err(FormalError::SolverError(
                            "solver thread exited without an answer".to_string(),
                        ));
                    }
                }
            }
        };

        match answer {
            Ok(Some(model)) => {
                let true_vars: HashSet<AigNodeId> = model
                    .iter()
                    .filter(|lit| lit.is_positive())
                    .map(|lit| AigNodeId(lit.var().index() as u32))
                    .collect();
                Ok(SatOutcome::Sat(Model::complete(aig, |id| {
                    Some(true_vars.contains(&id))
                })))
            }
            Ok(None) => Ok(SatOutcome::Unsat),
            Err(e) => Err(FormalError::SolverError(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aig::VarKey;
    use crate::oracle::{OracleSession, SatResult};

    #[test]
    fn test_simple_sat() {
        // (x1 OR x2) AND (NOT x1 OR x2) => x2 must be true
        let mut session = OracleSession::new(VarisatOracle::new());
        let x1 = session.declare_boolean(VarKey::input("x1"));
        let x2 = session.declare_boolean(VarKey::input("x2"));
        let c1 = session.aig_mut().add_or(x1, x2);
        let c2 = session.aig_mut().add_or(!x1, x2);
        session.assert(c1);
        session.assert(c2);

        assert_eq!(session.check().unwrap(), SatResult::Sat);
        let model = session.model().unwrap().clone();
        assert!(session.evaluate(&model, x2), "x2 should be true");
    }

    #[test]
    fn test_simple_unsat() {
        // x1 AND NOT x1 => UNSAT
        let mut session = OracleSession::new(VarisatOracle::new());
        let x1 = session.declare_boolean(VarKey::input("x1"));
        session.assert(x1);
        session.assert(!x1);

        assert_eq!(session.check().unwrap(), SatResult::Unsat);
    }

    #[test]
    fn test_constant_assertions() {
        let mut session = OracleSession::new(VarisatOracle::new());
        let t = session.aig().true_lit();
        session.assert(t);
        assert_eq!(session.check().unwrap(), SatResult::Sat);

        let f = session.aig().false_lit();
        session.assert(f);
        assert_eq!(session.check().unwrap(), SatResult::Unsat);
    }

    #[test]
    fn test_unreferenced_variable_is_completed() {
        let mut session = OracleSession::new(VarisatOracle::new());
        let a = session.declare_boolean(VarKey::input("a"));
        let _free = session.declare_boolean(VarKey::input("free"));
        session.assert(a);

        assert_eq!(session.check().unwrap(), SatResult::Sat);
        let model = session.model().unwrap();
        let assignment: Vec<_> = model.assignment(session.aig()).collect();
        assert_eq!(assignment.len(), 2);
        assert_eq!(assignment[0], (&VarKey::input("a"), true));
    }

    /// `pigeons` pigeons into `pigeons - 1` holes: unsatisfiable, and hard
    /// for resolution-based solvers
    fn pigeonhole(session: &mut OracleSession<VarisatOracle>, pigeons: usize) {
        let holes = pigeons - 1;
        let p: Vec<Vec<AigLit>> = (0..pigeons)
            .map(|i| {
                (0..holes)
                    .map(|j| session.declare_boolean(VarKey::input(format!("p{}_{}", i, j))))
                    .collect()
            })
            .collect();

        for row in &p {
            let somewhere = session.aig_mut().add_or_all(row.iter().copied());
            session.assert(somewhere);
        }
        for j in 0..holes {
            for i in 0..pigeons {
                for k in i + 1..pigeons {
                    let both = session.aig_mut().add_and(p[i][j], p[k][j]);
                    session.assert(!both);
                }
            }
        }
    }

    #[test]
    fn test_timeout_on_hard_instance_is_unknown() {
        let oracle = VarisatOracle::new().with_timeout(Duration::from_millis(20));
        let mut session = OracleSession::new(oracle);
        pigeonhole(&mut session, 9);

        match session.check().unwrap() {
            SatResult::Unknown(reason) => assert_eq!(reason, "timeout after 20 ms"),
            other => panic!("expected a timeout, got {:?}", other),
        }
        assert!(session.model().is_none());
    }

    #[test]
    fn test_with_timeout_answers_small_problem() {
        let oracle = VarisatOracle::new().with_timeout(Duration::from_secs(30));
        let mut session = OracleSession::new(oracle);
        let a = session.declare_boolean(VarKey::input("a"));
        let b = session.declare_boolean(VarKey::input("b"));
        let x = session.aig_mut().add_xor(a, b);
        session.assert(x);
        session.assert(a);

        assert_eq!(session.check().unwrap(), SatResult::Sat);
        let model = session.model().unwrap().clone();
        assert!(!session.evaluate(&model, b));
    }
}
