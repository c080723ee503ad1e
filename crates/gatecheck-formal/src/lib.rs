//! Formal checking of combinational gate circuits
//!
//! This crate provides:
//! - An And-Inverter Graph formula pool shared by the circuits of one query
//! - Circuit compilation in constrained and inlined modes
//! - A satisfiability oracle contract with a varisat backend
//! - Assignment validation against gate semantics
//! - Miter-based combinational equivalence checking with counterexamples
//!
//! # Algorithm
//!
//! 1. Validate both circuit descriptions
//! 2. Compile both into one pool; inputs unify by name, gates stay scoped
//! 3. Build a miter: XOR positionally paired outputs, OR all XORs
//! 4. UNSAT = circuits are equivalent, SAT = counterexample found

pub mod aig;
pub mod assignment;
pub mod checker;
pub mod compile;
pub mod config;
pub mod equivalence;
pub mod observer;
pub mod oracle;
pub mod report;
pub mod sat_solver;

pub use aig::{Aig, AigLit, AigNode, AigNodeId, Scope, VarKey};
pub use assignment::{check_assignment, Assignment, AssignmentOutcome};
pub use checker::CircuitChecker;
pub use compile::{compile, CompileMode, CompiledCircuit};
pub use config::CheckerConfig;
pub use equivalence::{
    build_miter, check_circuits, Counterexample, EquivalenceResult, EquivalenceVerdict, Miter,
    MiterStats, NonEquivalence, OutputMismatch, OutputPair,
};
pub use observer::{CheckObserver, LogObserver, NoopObserver, QueryKind};
pub use oracle::{ExhaustiveOracle, MockOracle, Model, OracleSession, SatOracle, SatResult};
pub use report::{EquivalenceReport, ReportStatus};
pub use sat_solver::VarisatOracle;

use gatecheck_circuit::StructuralError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FormalError {
    #[error("structural error in circuit '{circuit}': {source}")]
    Structural {
        circuit: String,
        source: StructuralError,
    },
    #[error("SAT solver error: {0}")]
    SolverError(String),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("I/O error: {0}")]
    Io(String),
}

impl FormalError {
    pub fn structural(circuit: &str, source: StructuralError) -> Self {
        FormalError::Structural {
            circuit: circuit.to_string(),
            source,
        }
    }
}

pub type FormalResult<T> = Result<T, FormalError>;
