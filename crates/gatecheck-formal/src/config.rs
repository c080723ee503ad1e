//! Checker configuration loaded from `gatecheck.toml`

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::{FormalError, FormalResult};

/// Settings shared by every query a checker runs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CheckerConfig {
    /// Oracle timeout per query, in milliseconds; no limit when absent
    #[serde(default)]
    pub timeout_ms: Option<u64>,

    /// Where to write the JSON equivalence report
    #[serde(default)]
    pub report_path: Option<PathBuf>,

    /// Name of the first circuit in messages and reports
    #[serde(default)]
    pub label_a: Option<String>,

    /// Name of the second circuit in messages and reports
    #[serde(default)]
    pub label_b: Option<String>,
}

impl CheckerConfig {
    /// Parse a configuration from a file path
    pub fn from_path(path: impl AsRef<Path>) -> FormalResult<Self> {
        let contents =
            std::fs::read_to_string(path.as_ref()).map_err(|e| FormalError::Io(e.to_string()))?;
        Self::from_str(&contents)
    }

    /// Parse a configuration from a string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> FormalResult<Self> {
        let config: CheckerConfig =
            toml::from_str(s).map_err(|e| FormalError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> FormalResult<()> {
        if self.timeout_ms == Some(0) {
            return Err(FormalError::Config(
                "timeout_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    pub fn labels(&self) -> (&str, &str) {
        (
            self.label_a.as_deref().unwrap_or("A"),
            self.label_b.as_deref().unwrap_or("B"),
        )
    }
}
