use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gatecheck_circuit::CircuitDescription;
use gatecheck_formal::{
    Assignment, AssignmentOutcome, CheckerConfig, CircuitChecker, EquivalenceReport,
    EquivalenceResult, EquivalenceVerdict, NonEquivalence,
};
use std::path::{Path, PathBuf};
use tracing::info;

/// gatecheck - validate assignments and prove equivalence of gate circuits
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a circuit description for structural errors
    Check {
        /// Circuit description (.json or .toml)
        circuit: PathBuf,
    },

    /// Validate input and signal assignments and compute outputs
    Eval {
        /// Circuit description (.json or .toml)
        circuit: PathBuf,

        /// Primary input assignment, e.g. A=1
        #[arg(short, long = "input", value_parser = parse_assignment)]
        inputs: Vec<(String, bool)>,

        /// Internal signal assignment, e.g. E2=0
        #[arg(short, long = "signal", value_parser = parse_assignment)]
        signals: Vec<(String, bool)>,

        #[command(flatten)]
        solver: SolverArgs,
    },

    /// Check whether two circuits compute the same outputs
    Equiv {
        /// First circuit description
        left: PathBuf,

        /// Second circuit description
        right: PathBuf,

        /// Write a JSON report to this path
        #[arg(short, long)]
        report: Option<PathBuf>,

        #[command(flatten)]
        solver: SolverArgs,
    },
}

#[derive(clap::Args)]
struct SolverArgs {
    /// Oracle timeout in milliseconds
    #[arg(short, long)]
    timeout_ms: Option<u64>,

    /// Checker configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl SolverArgs {
    /// File settings first, then command-line overrides
    fn load(&self) -> Result<CheckerConfig> {
        let mut config = match &self.config {
            Some(path) => CheckerConfig::from_path(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => CheckerConfig::default(),
        };
        if self.timeout_ms.is_some() {
            config.timeout_ms = self.timeout_ms;
        }
        config.validate()?;
        Ok(config)
    }
}

fn parse_assignment(s: &str) -> Result<(String, bool), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", s))?;
    let value = match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" => true,
        "0" | "false" => false,
        other => return Err(format!("'{}' is not a boolean (use 0/1/true/false)", other)),
    };
    let name = name.trim();
    if name.is_empty() {
        return Err("signal name is empty".to_string());
    }
    Ok((name.to_string(), value))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Check { circuit } => {
            check_circuit(&circuit)?;
        }

        Commands::Eval {
            circuit,
            inputs,
            signals,
            solver,
        } => {
            let config = solver.load()?;
            evaluate_circuit(&circuit, inputs, signals, &config)?;
        }

        Commands::Equiv {
            left,
            right,
            report,
            solver,
        } => {
            let mut config = solver.load()?;
            if report.is_some() {
                config.report_path = report;
            }
            compare_circuits(&left, &right, &config)?;
        }
    }

    Ok(())
}

fn load_circuit(path: &Path) -> Result<CircuitDescription> {
    CircuitDescription::from_path(path)
        .with_context(|| format!("failed to load circuit {}", path.display()))
}

fn file_label(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("circuit")
        .to_string()
}

fn check_circuit(path: &Path) -> Result<()> {
    let desc = load_circuit(path)?;
    let circuit = CircuitChecker::new().validate(&file_label(path), &desc)?;

    println!(
        "{}: ok ({} inputs, {} gates, {} outputs)",
        path.display(),
        circuit.inputs().len(),
        circuit.gates().len(),
        circuit.outputs().len()
    );
    Ok(())
}

fn evaluate_circuit(
    path: &Path,
    inputs: Vec<(String, bool)>,
    signals: Vec<(String, bool)>,
    config: &CheckerConfig,
) -> Result<()> {
    let desc = load_circuit(path)?;
    let inputs: Assignment = inputs.into_iter().collect();
    let signals: Assignment = signals.into_iter().collect();

    info!(
        "Validating {} input and {} signal assignment(s) on {}",
        inputs.len(),
        signals.len(),
        path.display()
    );

    let label = file_label(path);
    let checker = CircuitChecker::from_config(config).with_labels(&label, "");
    let outcome = checker.validate_assignment(&desc, &inputs, &signals)?;

    match &outcome {
        AssignmentOutcome::Consistent { outputs } => {
            println!("The assignments are valid.");
            println!("Outputs:");
            for (name, value) in outputs {
                println!("  {} = {}", name, value);
            }
        }
        _ => {
            let reason = outcome.reason().unwrap_or_default();
            println!("Validation failed: {}", reason);
        }
    }
    Ok(())
}

fn compare_circuits(left: &Path, right: &Path, config: &CheckerConfig) -> Result<()> {
    let left_desc = load_circuit(left)?;
    let right_desc = load_circuit(right)?;

    // each side falls back to its file name on its own
    let label_left = config.label_a.clone().unwrap_or_else(|| file_label(left));
    let label_right = config.label_b.clone().unwrap_or_else(|| file_label(right));
    if label_left == label_right {
        info!("Both circuits are labelled '{}'", label_left);
    }

    let checker = CircuitChecker::from_config(config).with_labels(&label_left, &label_right);
    let result = checker.check_equivalence(&left_desc, &right_desc)?;

    print_equivalence(&result, &label_left, &label_right);

    if let Some(path) = &config.report_path {
        EquivalenceReport::from_result(&result, &label_left, &label_right)
            .write_json(path)
            .with_context(|| format!("failed to write report {}", path.display()))?;
        info!("Report written to {}", path.display());
    }

    Ok(())
}

fn print_equivalence(result: &EquivalenceResult, left: &str, right: &str) {
    match &result.verdict {
        EquivalenceVerdict::Equivalent => {
            println!("The circuits are equivalent.");
        }
        EquivalenceVerdict::Indeterminate(reason) => {
            println!("Equivalence is indeterminate: {}", reason);
        }
        EquivalenceVerdict::NotEquivalent(NonEquivalence::OutputCountMismatch {
            left: n_left,
            right: n_right,
        }) => {
            println!("The circuits are NOT equivalent.");
            println!(
                "Circuits have different numbers of outputs: {} has {}, {} has {}.",
                left, n_left, right, n_right
            );
        }
        EquivalenceVerdict::NotEquivalent(NonEquivalence::Counterexample(cex)) => {
            println!("The circuits are NOT equivalent.");
            println!();
            println!("Counterexample where circuits differ:");
            for (name, value) in &cex.inputs {
                println!("  {} = {}", name, value);
            }
            println!();
            println!("Differing Outputs:");
            for m in &cex.differing_outputs {
                println!(
                    "  [{}] {}.{} = {} vs {}.{} = {}",
                    m.position, left, m.left_name, m.left_value, right, m.right_name, m.right_value
                );
            }
        }
    }
}
