//! Extension points for tracing a check as it runs

use std::time::Duration;

use gatecheck_circuit::Circuit;

use crate::aig::Aig;
use crate::compile::CompiledCircuit;
use crate::oracle::SatResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    Assignment,
    Equivalence,
}

/// Receives callbacks after validation, after compilation, and after each
/// oracle query. All hooks default to doing nothing.
pub trait CheckObserver: Send + Sync {
    fn on_validated(&self, _label: &str, _circuit: &Circuit) {}

    fn on_compiled(&self, _label: &str, _compiled: &CompiledCircuit, _aig: &Aig) {}

    fn on_query(&self, _kind: QueryKind, _result: &SatResult, _elapsed: Duration) {}
}

/// Observer that ignores every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl CheckObserver for NoopObserver {}

/// Observer that forwards every event to the `log` facade
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl CheckObserver for LogObserver {
    fn on_validated(&self, label: &str, circuit: &Circuit) {
        log::info!(
            "circuit '{}' validated: {} input(s), {} gate(s), {} output(s)",
            label,
            circuit.inputs().len(),
            circuit.gates().len(),
            circuit.outputs().len()
        );
    }

    fn on_compiled(&self, label: &str, compiled: &CompiledCircuit, aig: &Aig) {
        log::debug!(
            "circuit '{}' compiled into scope {}: {} constraint(s); pool now {} variable(s), {} AND node(s)",
            label,
            compiled.scope.0,
            compiled.constraints.len(),
            aig.var_count(),
            aig.and_count()
        );
    }

    fn on_query(&self, kind: QueryKind, result: &SatResult, elapsed: Duration) {
        log::info!("{:?} query answered {:?} in {:?}", kind, result, elapsed);
    }
}
