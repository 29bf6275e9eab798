//! Sequential case execution.

use std::io::Write;

use ferry_bridge::Bridge;

use crate::case::ConformanceCase;
use crate::error::Result;
use crate::report::{outcome_line, CaseResult, ConformanceReport};

/// Run `cases` in order through `bridge`.
///
/// A `Running <case>...` line is written to `progress` before each call and
/// the outcome is appended once the call returns. A failing case is recorded
/// and the run continues.
pub fn run_cases(
    bridge: &Bridge,
    cases: &[ConformanceCase],
    progress: &mut dyn Write,
) -> Result<ConformanceReport> {
    log::info!("running {} conformance case(s)", cases.len());
    let mut results = Vec::with_capacity(cases.len());

    for case in cases {
        write!(progress, "Running {}...  ", case.name)?;
        progress.flush()?;

        let outcome = case.evaluate(bridge.call(case.operation, case.input.clone()));
        writeln!(progress, "{}", outcome_line(&outcome))?;
        if !outcome.is_pass() {
            log::warn!("case {} failed", case.name);
        }

        results.push(CaseResult {
            name: case.name,
            operation: case.operation,
            outcome,
        });
    }

    let report = ConformanceReport::from_results(results);
    log::info!(
        "finished: {} passed, {} failed",
        report.summary.passed,
        report.summary.failed
    );
    Ok(report)
}
