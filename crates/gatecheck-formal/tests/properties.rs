//! End-to-end checks of assignment validation and equivalence checking

use gatecheck_circuit::{Arity, CircuitDescription, GateKind, StructuralError};
use gatecheck_formal::{
    Assignment, AssignmentOutcome, CheckerConfig, CircuitChecker, EquivalenceVerdict,
    FormalError, NonEquivalence,
};

fn assignment(pairs: &[(&str, bool)]) -> Assignment {
    pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

/// (A AND B) OR C
fn and_or() -> CircuitDescription {
    CircuitDescription::with_inputs(["A", "B", "C"])
        .gate("D", "AND", ["A", "B"])
        .gate("E", "OR", ["D", "C"])
        .outputs(["E"])
}

/// (A OR C) AND (B OR C)
fn or_and() -> CircuitDescription {
    CircuitDescription::with_inputs(["A", "B", "C"])
        .gate("F", "OR", ["A", "C"])
        .gate("G", "OR", ["B", "C"])
        .gate("H", "AND", ["F", "G"])
        .outputs(["H"])
}

fn expect_structural(err: FormalError) -> StructuralError {
    match err {
        FormalError::Structural { source, .. } => source,
        other => panic!("expected a structural error, got {}", other),
    }
}

#[test]
fn test_distributive_identity() {
    let result = CircuitChecker::new()
        .check_equivalence(&and_or(), &or_and())
        .unwrap();

    assert_eq!(result.verdict, EquivalenceVerdict::Equivalent);
    assert!(result.counterexample().is_none());
    assert_eq!(result.stats.output_pairs, 1);
}

#[test]
fn test_de_morgan() {
    let nand = CircuitDescription::with_inputs(["A", "B"])
        .gate("N", "NAND", ["A", "B"])
        .outputs(["N"]);
    let or_of_nots = CircuitDescription::with_inputs(["A", "B"])
        .gate("NA", "NOT", ["A"])
        .gate("NB", "NOT", ["B"])
        .gate("O", "OR", ["NA", "NB"])
        .outputs(["O"]);

    let result = CircuitChecker::new()
        .check_equivalence(&nand, &or_of_nots)
        .unwrap();
    assert!(result.is_equivalent());
}

#[test]
fn test_gateless_circuit_passes_inputs_through() {
    let wires = CircuitDescription::with_inputs(["A", "B"]).outputs(["B", "A"]);

    let outcome = CircuitChecker::new()
        .validate_assignment(
            &wires,
            &assignment(&[("A", true), ("B", false)]),
            &Assignment::new(),
        )
        .unwrap();

    let outputs = outcome.outputs().unwrap();
    assert_eq!(outputs.len(), 2);
    assert!(!outputs["B"]);
    assert!(outputs["A"]);
}

#[test]
fn test_flipped_gate_is_detected() {
    let flipped = CircuitDescription::with_inputs(["A", "B", "C"])
        .gate("D", "OR", ["A", "B"])
        .gate("E", "OR", ["D", "C"])
        .outputs(["E"]);

    let result = CircuitChecker::new()
        .check_equivalence(&and_or(), &flipped)
        .unwrap();
    let cex = result.counterexample().unwrap();

    assert!(!cex.inputs.is_empty());
    assert_eq!(cex.differing_outputs.len(), 1);

    // the witness must really separate the two: C low, exactly one of A, B high
    assert!(!cex.inputs["C"]);
    assert_ne!(cex.inputs["A"], cex.inputs["B"]);
    let mismatch = &cex.differing_outputs[0];
    assert_eq!(mismatch.position, 0);
    assert!(!mismatch.left_value);
    assert!(mismatch.right_value);
}

#[test]
fn test_output_count_mismatch_has_no_counterexample() {
    let two_outputs = and_or().outputs(["E", "D"]);

    let result = CircuitChecker::new()
        .check_equivalence(&and_or(), &two_outputs)
        .unwrap();

    assert_eq!(
        result.verdict,
        EquivalenceVerdict::NotEquivalent(NonEquivalence::OutputCountMismatch {
            left: 1,
            right: 2
        })
    );
    assert!(result.counterexample().is_none());
}

#[test]
fn test_single_differing_output_among_many() {
    let left = CircuitDescription::with_inputs(["A", "B"])
        .gate("S", "XOR", ["A", "B"])
        .gate("C", "AND", ["A", "B"])
        .gate("O", "OR", ["A", "B"])
        .outputs(["S", "C", "O"]);
    let right = CircuitDescription::with_inputs(["A", "B"])
        .gate("S", "XNOR", ["A", "B"])
        .gate("NS", "NOT", ["S"])
        .gate("C", "NOR", ["A", "B"])
        .gate("O", "OR", ["A", "B"])
        .outputs(["NS", "C", "O"]);

    let result = CircuitChecker::new().check_equivalence(&left, &right).unwrap();
    let cex = result.counterexample().unwrap();

    // AND and NOR never agree when A = B, and are both false otherwise
    for mismatch in &cex.differing_outputs {
        assert_eq!(mismatch.position, 1);
        assert_eq!(mismatch.left_name, "C");
        assert_eq!(mismatch.right_name, "C");
        assert_ne!(mismatch.left_value, mismatch.right_value);
    }
    assert_eq!(cex.differing_outputs.len(), 1);
    assert_eq!(cex.inputs["A"], cex.inputs["B"]);
}

#[test]
fn test_duplicate_gate_rejected_by_every_operation() {
    let duplicated = and_or().gate("D", "OR", ["A", "C"]);
    let checker = CircuitChecker::new();

    let err = checker.validate("dup", &duplicated).unwrap_err();
    assert_eq!(
        expect_structural(err),
        StructuralError::DuplicateSignal("D".to_string())
    );

    let err = checker
        .validate_assignment(&duplicated, &Assignment::new(), &Assignment::new())
        .unwrap_err();
    assert!(matches!(
        expect_structural(err),
        StructuralError::DuplicateSignal(_)
    ));

    let err = checker.check_equivalence(&duplicated, &and_or()).unwrap_err();
    assert!(matches!(
        expect_structural(err),
        StructuralError::DuplicateSignal(_)
    ));
}

#[test]
fn test_not_with_two_inputs_is_arity_error() {
    let bad = CircuitDescription::with_inputs(["A", "B"])
        .gate("N", "NOT", ["A", "B"])
        .outputs(["N"]);

    let err = CircuitChecker::new().validate("bad", &bad).unwrap_err();
    assert_eq!(
        expect_structural(err),
        StructuralError::Arity {
            gate: "N".to_string(),
            kind: GateKind::Not,
            expected: Arity::Exactly(1),
            found: 2,
        }
    );
}

#[test]
fn test_unsupported_gate_type_is_named() {
    let buff = CircuitDescription::with_inputs(["A"])
        .gate("Q", "BUFF", ["A"])
        .outputs(["Q"]);

    let err = CircuitChecker::new()
        .check_equivalence(&buff, &buff)
        .unwrap_err();
    assert!(err.to_string().contains("BUFF"));
    assert_eq!(
        expect_structural(err),
        StructuralError::UnsupportedGateType {
            gate: "Q".to_string(),
            gate_type: "BUFF".to_string(),
        }
    );
}

#[test]
fn test_inconsistent_forced_signal_is_contradiction() {
    let circuit = CircuitDescription::with_inputs(["A", "B"])
        .gate("E1", "AND", ["A", "B"])
        .gate("E2", "NOT", ["A"])
        .gate("E", "OR", ["E1", "E2"])
        .outputs(["E"]);

    let outcome = CircuitChecker::new()
        .validate_assignment(
            &circuit,
            &assignment(&[("A", true), ("B", false)]),
            &assignment(&[("E2", true)]),
        )
        .unwrap();

    assert_eq!(outcome, AssignmentOutcome::Contradiction);
    assert!(outcome.outputs().is_none());
}

#[test]
fn test_unknown_assignment_targets() {
    let checker = CircuitChecker::new();

    let outcome = checker
        .validate_assignment(&and_or(), &assignment(&[("X", true)]), &Assignment::new())
        .unwrap();
    assert_eq!(outcome, AssignmentOutcome::UndefinedInput("X".to_string()));
    assert_eq!(
        outcome.reason().unwrap(),
        "Input 'X' is not defined in the circuit."
    );

    let outcome = checker
        .validate_assignment(&and_or(), &Assignment::new(), &assignment(&[("Y", false)]))
        .unwrap();
    assert_eq!(outcome, AssignmentOutcome::UndefinedSignal("Y".to_string()));
    assert_eq!(
        outcome.reason().unwrap(),
        "Signal 'Y' is not defined in the circuit."
    );
}

#[test]
fn test_forced_internal_signal_is_honoured() {
    // D = A AND B forced high means A = B = 1, so E = 1 whatever C is
    let outcome = CircuitChecker::new()
        .validate_assignment(&and_or(), &Assignment::new(), &assignment(&[("D", true)]))
        .unwrap();
    assert!(outcome.outputs().unwrap()["E"]);
}

#[test]
fn test_same_gate_names_do_not_alias() {
    // both circuits name their only gate "G"; the functions differ
    let left = CircuitDescription::with_inputs(["A", "B"])
        .gate("G", "AND", ["A", "B"])
        .outputs(["G"]);
    let right = CircuitDescription::with_inputs(["A", "B"])
        .gate("G", "NAND", ["A", "B"])
        .outputs(["G"]);

    let result = CircuitChecker::new().check_equivalence(&left, &right).unwrap();
    assert!(matches!(
        result.verdict,
        EquivalenceVerdict::NotEquivalent(NonEquivalence::Counterexample(_))
    ));
}

/// Output is true iff `pigeons` pigeons fit into `pigeons - 1` holes, which
/// never happens
fn pigeonhole(pigeons: usize) -> CircuitDescription {
    let holes = pigeons - 1;
    let var = |i: usize, j: usize| format!("p{}_{}", i, j);

    let inputs: Vec<String> = (0..pigeons)
        .flat_map(|i| (0..holes).map(move |j| var(i, j)))
        .collect();
    let mut desc = CircuitDescription::with_inputs(inputs);
    let mut clauses = Vec::new();

    for i in 0..pigeons {
        let name = format!("placed{}", i);
        desc = desc.gate(&name, "OR", (0..holes).map(|j| var(i, j)));
        clauses.push(name);
    }
    for j in 0..holes {
        for i in 0..pigeons {
            for k in i + 1..pigeons {
                let name = format!("apart{}_{}_{}", j, i, k);
                desc = desc.gate(&name, "NAND", [var(i, j), var(k, j)]);
                clauses.push(name);
            }
        }
    }
    desc.gate("fits", "AND", clauses).outputs(["fits"])
}

#[test]
fn test_solver_timeout_is_indeterminate() {
    let never = CircuitDescription::with_inputs(["p0_0"])
        .gate("n", "NOT", ["p0_0"])
        .gate("never", "AND", ["p0_0", "n"])
        .outputs(["never"]);
    let config = CheckerConfig::from_str("timeout_ms = 20").unwrap();

    let result = CircuitChecker::from_config(&config)
        .check_equivalence(&pigeonhole(10), &never)
        .unwrap();

    assert!(result.is_indeterminate());
    assert_eq!(
        result.verdict,
        EquivalenceVerdict::Indeterminate("timeout after 20 ms".to_string())
    );
    assert!(result.counterexample().is_none());
}
