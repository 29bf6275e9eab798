//! `ferry run`: execute the conformance suite.

use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use ferry_bridge::Bridge;
use ferry_harness::{fixture_surface, run_cases, select_cases, FerryConfig, ReportFormat};

/// Load the explicit config file, or the nearest `ferry.toml`, or defaults.
pub fn load_config(cwd: &Path, explicit: Option<&Path>) -> Result<FerryConfig> {
    match explicit {
        Some(path) => FerryConfig::load(path).with_context(|| format!("loading {}", path.display())),
        None => {
            let found = FerryConfig::find_and_load(cwd).context("loading ferry.toml")?;
            Ok(found.map(|(config, _)| config).unwrap_or_default())
        }
    }
}

/// Run the selected cases. Returns whether all of them passed.
///
/// Command-line values replace the corresponding configuration values.
pub fn run(
    config: &FerryConfig,
    report_format: Option<&str>,
    only: &[String],
    skip: &[String],
) -> Result<bool> {
    let format = match report_format {
        Some(s) => s.parse::<ReportFormat>().map_err(anyhow::Error::msg)?,
        None => config.harness.report,
    };
    let only = if only.is_empty() { &config.harness.only[..] } else { only };
    let skip = if skip.is_empty() { &config.harness.skip[..] } else { skip };
    let cases = select_cases(only, skip)?;

    let bridge = Bridge::new(fixture_surface());
    let report = match format {
        ReportFormat::Human => {
            let mut out = io::stdout().lock();
            writeln!(out, "\n --- Running Tests --- \n")?;
            let report = run_cases(&bridge, &cases, &mut out)?;
            writeln!(out)?;
            write!(out, "{report}")?;
            report
        }
        ReportFormat::Json => {
            let report = run_cases(&bridge, &cases, &mut io::sink())?;
            println!("{}", serde_json::to_string_pretty(&report.to_json())?);
            report
        }
    };

    if !report.all_passed() {
        eprintln!(
            "error: {} of {} conformance case(s) failed",
            report.summary.failed, report.summary.total
        );
    }
    Ok(report.all_passed())
}
