//! JSON report generation for equivalence results

use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::equivalence::{EquivalenceResult, EquivalenceVerdict, NonEquivalence};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EquivalenceReport {
    pub left: String,
    pub right: String,
    pub status: ReportStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_count_mismatch: Option<OutputCounts>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counterexample: Option<indexmap::IndexMap<String, bool>>,
    pub differing_outputs: Vec<MismatchEntry>,
    pub stats: ReportStats,
}

/// Overall verdict of a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportStatus {
    Equivalent,
    NotEquivalent,
    Indeterminate,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputCounts {
    pub left: usize,
    pub right: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MismatchEntry {
    pub position: usize,
    pub left_name: String,
    pub right_name: String,
    pub left_value: bool,
    pub right_value: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportStats {
    pub variables: usize,
    pub and_nodes: usize,
    pub output_pairs: usize,
    pub solve_ms: u64,
}

impl EquivalenceReport {
    /// Build a report from an equivalence result
    pub fn from_result(result: &EquivalenceResult, left: &str, right: &str) -> Self {
        let mut report = EquivalenceReport {
            left: left.to_string(),
            right: right.to_string(),
            status: ReportStatus::Equivalent,
            reason: None,
            output_count_mismatch: None,
            counterexample: None,
            differing_outputs: Vec::new(),
            stats: ReportStats {
                variables: result.stats.variables,
                and_nodes: result.stats.and_nodes,
                output_pairs: result.stats.output_pairs,
                solve_ms: result.time_ms,
            },
        };

        match &result.verdict {
            EquivalenceVerdict::Equivalent => {}
            EquivalenceVerdict::Indeterminate(reason) => {
                report.status = ReportStatus::Indeterminate;
                report.reason = Some(reason.clone());
            }
            EquivalenceVerdict::NotEquivalent(NonEquivalence::OutputCountMismatch {
                left,
                right,
            }) => {
                report.status = ReportStatus::NotEquivalent;
                report.output_count_mismatch = Some(OutputCounts {
                    left: *left,
                    right: *right,
                });
            }
            EquivalenceVerdict::NotEquivalent(NonEquivalence::Counterexample(cex)) => {
                report.status = ReportStatus::NotEquivalent;
                report.counterexample = Some(cex.inputs.clone());
                report.differing_outputs = cex
                    .differing_outputs
                    .iter()
                    .map(|m| MismatchEntry {
                        position: m.position,
                        left_name: m.left_name.clone(),
                        right_name: m.right_name.clone(),
                        left_value: m.left_value,
                        right_value: m.right_value,
                    })
                    .collect();
            }
        }

        report
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Write the report as JSON to a file
    pub fn write_json(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self).map_err(std::io::Error::other)
    }
}
