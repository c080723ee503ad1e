//! High-level checking API
//!
//! [`CircuitChecker`] takes raw circuit descriptions, validates them, and runs
//! assignment or equivalence queries. Every query builds its own formula pool
//! and oracle session; nothing is cached between calls.

use gatecheck_circuit::{validate, Circuit, CircuitDescription};

use crate::assignment::{check_assignment, Assignment, AssignmentOutcome};
use crate::config::CheckerConfig;
use crate::equivalence::{check_circuits, EquivalenceResult};
use crate::observer::{CheckObserver, LogObserver};
use crate::sat_solver::VarisatOracle;
use crate::{FormalError, FormalResult, SatOracle};

/// Validates circuits and answers assignment and equivalence queries
pub struct CircuitChecker<O: SatOracle = VarisatOracle> {
    oracle: O,
    observer: Box<dyn CheckObserver>,
    labels: (String, String),
}

impl CircuitChecker<VarisatOracle> {
    pub fn new() -> Self {
        Self::with_oracle(VarisatOracle::new())
    }

    /// Checker with the oracle timeout and labels from `config`
    pub fn from_config(config: &CheckerConfig) -> Self {
        let oracle = match config.timeout() {
            Some(timeout) => VarisatOracle::new().with_timeout(timeout),
            None => VarisatOracle::new(),
        };
        let (a, b) = config.labels();
        Self::with_oracle(oracle).with_labels(a, b)
    }
}

impl Default for CircuitChecker<VarisatOracle> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O: SatOracle> CircuitChecker<O> {
    pub fn with_oracle(oracle: O) -> Self {
        Self {
            oracle,
            observer: Box::new(LogObserver),
            labels: ("A".to_string(), "B".to_string()),
        }
    }

    pub fn with_observer(mut self, observer: impl CheckObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    /// Names used for the two circuits of an equivalence query
    pub fn with_labels(mut self, left: &str, right: &str) -> Self {
        self.labels = (left.to_string(), right.to_string());
        self
    }

    pub fn labels(&self) -> (&str, &str) {
        (&self.labels.0, &self.labels.1)
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Structural validation only
    pub fn validate(&self, label: &str, desc: &CircuitDescription) -> FormalResult<Circuit> {
        let circuit = validate(desc).map_err(|e| FormalError::structural(label, e))?;
        self.observer.on_validated(label, &circuit);
        Ok(circuit)
    }

    /// Check input and internal-signal assignments against `desc`
    pub fn validate_assignment(
        &self,
        desc: &CircuitDescription,
        inputs: &Assignment,
        signals: &Assignment,
    ) -> FormalResult<AssignmentOutcome> {
        let label = self.labels.0.as_str();
        let circuit = self.validate(label, desc)?;
        check_assignment(&circuit, inputs, signals, &self.oracle, self.observer.as_ref())
            .map_err(|e| relabel(e, label))
    }

    /// Decide whether `left` and `right` are combinationally equivalent
    pub fn check_equivalence(
        &self,
        left: &CircuitDescription,
        right: &CircuitDescription,
    ) -> FormalResult<EquivalenceResult> {
        let (label_left, label_right) = self.labels();
        let left = self.validate(label_left, left)?;
        let right = self.validate(label_right, right)?;
        check_circuits(
            &left,
            &right,
            (label_left, label_right),
            &self.oracle,
            self.observer.as_ref(),
        )
    }
}

fn relabel(err: FormalError, label: &str) -> FormalError {
    match err {
        FormalError::Structural { source, .. } => FormalError::structural(label, source),
        other => other,
    }
}
