//! `ferry.toml` configuration.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::LevelFilter;
use serde::{Deserialize, Serialize};

use crate::case::{select_cases, ConformanceCase};
use crate::error::{HarnessError, Result};

/// Name of the configuration file searched for by [`FerryConfig::find_and_load`].
pub const CONFIG_FILE: &str = "ferry.toml";

/// The top-level configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FerryConfig {
    #[serde(default)]
    pub harness: HarnessConfig,
}

/// Harness section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HarnessConfig {
    /// Report format.
    #[serde(default)]
    pub report: ReportFormat,
    /// Run only these cases (all when empty).
    #[serde(default)]
    pub only: Vec<String>,
    /// Exclude these cases.
    #[serde(default)]
    pub skip: Vec<String>,
    /// Log level name, e.g. "warn".
    #[serde(default)]
    pub log_level: Option<String>,
}

/// How the report is rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Human,
    Json,
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "human" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown report format '{other}'. Choose: human, json")),
        }
    }
}

impl FerryConfig {
    /// Parse and validate a configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        let config: FerryConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate the configuration at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Search upward from `start_dir` for a `ferry.toml` file, parse and
    /// return it along with the path it was found at.
    pub fn find_and_load(start_dir: &Path) -> Result<Option<(Self, PathBuf)>> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let candidate = dir.join(CONFIG_FILE);
            if candidate.is_file() {
                let config = Self::load(&candidate)?;
                log::debug!("loaded configuration from {}", candidate.display());
                return Ok(Some((config, candidate)));
            }
            if !dir.pop() {
                break;
            }
        }
        Ok(None)
    }

    /// Reject case names and log levels that do not exist.
    pub fn validate(&self) -> Result<()> {
        self.harness.cases()?;
        self.harness.log_level()?;
        Ok(())
    }
}

impl HarnessConfig {
    /// The configured case selection, in execution order.
    pub fn cases(&self) -> Result<Vec<ConformanceCase>> {
        select_cases(&self.only, &self.skip)
    }

    /// The configured log level, if any.
    pub fn log_level(&self) -> Result<Option<LevelFilter>> {
        self.log_level
            .as_deref()
            .map(|value| {
                LevelFilter::from_str(value).map_err(|_| HarnessError::InvalidLogLevel {
                    value: value.to_string(),
                })
            })
            .transpose()
    }
}
