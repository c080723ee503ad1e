//! Loading circuit descriptions from disk and validating them

use gatecheck_circuit::{validate, CircuitDescription, GateKind, LoadError, StructuralError};
use indexmap::IndexMap;
use std::fs;
use tempfile::TempDir;

const HALF_ADDER_JSON: &str = r#"{
    "inputs": ["A", "B"],
    "gates": [
        {"name": "S", "type": "xor", "inputs": ["A", "B"]},
        {"name": "C", "type": "AND", "inputs": ["A", "B"]}
    ],
    "outputs": ["S", "C"]
}"#;

const HALF_ADDER_TOML: &str = r#"
inputs = ["A", "B"]
outputs = ["S", "C"]

[[gates]]
name = "S"
type = "xor"
inputs = ["A", "B"]

[[gates]]
name = "C"
type = "AND"
inputs = ["A", "B"]
"#;

#[test]
fn test_json_and_toml_load_the_same_circuit() {
    let temp = TempDir::new().unwrap();
    let json_path = temp.path().join("half_adder.json");
    let toml_path = temp.path().join("half_adder.toml");
    fs::write(&json_path, HALF_ADDER_JSON).unwrap();
    fs::write(&toml_path, HALF_ADDER_TOML).unwrap();

    let from_json = CircuitDescription::from_path(&json_path).unwrap();
    let from_toml = CircuitDescription::from_path(&toml_path).unwrap();
    assert_eq!(from_json, from_toml);

    let circuit = validate(&from_json).unwrap();
    assert_eq!(circuit.gates()[0].kind, GateKind::Xor);
    assert_eq!(circuit.outputs(), ["S".to_string(), "C".to_string()]);
}

#[test]
fn test_half_adder_truth_table() {
    let circuit = validate(&CircuitDescription::from_json(HALF_ADDER_JSON).unwrap()).unwrap();

    for (a, b) in [(false, false), (false, true), (true, false), (true, true)] {
        let inputs: IndexMap<String, bool> =
            [("A".to_string(), a), ("B".to_string(), b)].into_iter().collect();
        let outputs = circuit.evaluate(&inputs).unwrap();
        assert_eq!(outputs["S"], a ^ b);
        assert_eq!(outputs["C"], a && b);
    }
}

#[test]
fn test_unknown_extension() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("circuit.yaml");
    fs::write(&path, "inputs: []").unwrap();

    match CircuitDescription::from_path(&path) {
        Err(LoadError::UnknownFormat(ext)) => assert_eq!(ext, "yaml"),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_missing_file_and_bad_syntax() {
    let temp = TempDir::new().unwrap();
    assert!(matches!(
        CircuitDescription::from_path(temp.path().join("absent.json")),
        Err(LoadError::Io(_))
    ));

    let path = temp.path().join("broken.json");
    fs::write(&path, "{\"inputs\": [").unwrap();
    assert!(matches!(
        CircuitDescription::from_path(&path),
        Err(LoadError::Parse(_))
    ));
}

#[test]
fn test_loaded_file_with_forward_reference() {
    let desc = CircuitDescription::from_json(
        r#"{
            "inputs": ["A"],
            "gates": [
                {"name": "X", "type": "NOT", "inputs": ["Y"]},
                {"name": "Y", "type": "NOT", "inputs": ["A"]}
            ],
            "outputs": ["X"]
        }"#,
    )
    .unwrap();

    assert_eq!(
        validate(&desc).unwrap_err(),
        StructuralError::UndefinedSignal {
            gate: "X".to_string(),
            signal: "Y".to_string(),
        }
    );
}
