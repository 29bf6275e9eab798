//! Conformance report with summary statistics.

use std::fmt;

use ferry_bridge::Operation;
use serde::Serialize;

use crate::case::Outcome;

/// The outcome of one case.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseResult {
    pub name: &'static str,
    pub operation: Operation,
    pub outcome: Outcome,
}

/// Summary statistics for a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
}

/// The complete conformance report.
#[derive(Debug, Clone, Default)]
pub struct ConformanceReport {
    pub summary: ReportSummary,
    pub results: Vec<CaseResult>,
}

impl ConformanceReport {
    pub fn from_results(results: Vec<CaseResult>) -> Self {
        let passed = results.iter().filter(|r| r.outcome.is_pass()).count();
        let summary = ReportSummary {
            total: results.len(),
            passed,
            failed: results.len() - passed,
        };
        Self { summary, results }
    }

    pub fn all_passed(&self) -> bool {
        self.summary.failed == 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &CaseResult> {
        self.results.iter().filter(|r| !r.outcome.is_pass())
    }

    /// Machine-readable form of the report.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "summary": self.summary,
            "cases": self.results.iter().map(|r| {
                let mut case = serde_json::json!({
                    "name": r.name,
                    "operation": r.operation.name(),
                });
                match &r.outcome {
                    Outcome::Passed => {
                        case["status"] = "passed".into();
                    }
                    Outcome::AssertionFailed { expected, actual } => {
                        case["status"] = "assertion_failed".into();
                        case["expected"] = expected.to_string().into();
                        case["actual"] = actual.to_string().into();
                    }
                    Outcome::BridgeFailed(e) => {
                        case["status"] = "bridge_failed".into();
                        case["error"] = e.to_string().into();
                    }
                }
                case
            }).collect::<Vec<_>>(),
        })
    }
}

/// The line printed after `Running <case>...` for one outcome.
pub fn outcome_line(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Passed => "Passed".to_string(),
        Outcome::AssertionFailed { expected, actual } => {
            format!("FAILED: expected {expected}, got {actual}")
        }
        Outcome::BridgeFailed(e) => format!("FAILED: {e}"),
    }
}

impl fmt::Display for ConformanceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Conformance Report ===")?;
        writeln!(
            f,
            "Total: {} | Passed: {} | Failed: {}",
            self.summary.total, self.summary.passed, self.summary.failed,
        )?;

        if self.all_passed() {
            writeln!(f, "All cases passed.")?;
        } else {
            writeln!(f, "--- Failures ---")?;
            for r in self.failures() {
                writeln!(f, "[{}] {}: {}", r.name, r.operation, outcome_line(&r.outcome))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::case::Observation;
    use ferry_bridge::BridgeError;
    use ferry_codec::Value;

    fn sample() -> ConformanceReport {
        ConformanceReport::from_results(vec![
            CaseResult {
                name: "u64",
                operation: Operation::U64,
                outcome: Outcome::Passed,
            },
            CaseResult {
                name: "text",
                operation: Operation::Text,
                outcome: Outcome::AssertionFailed {
                    expected: Observation::Value(Value::Text("aa".into())),
                    actual: Observation::Value(Value::Text("a".into())),
                },
            },
            CaseResult {
                name: "mapping",
                operation: Operation::Mapping,
                outcome: Outcome::BridgeFailed(BridgeError::ForeignPanic {
                    operation: "mapping_op",
                    message: "bad".into(),
                }),
            },
        ])
    }

    #[test]
    fn summary_statistics_correct() {
        let report = sample();
        assert_eq!(
            report.summary,
            ReportSummary {
                total: 3,
                passed: 1,
                failed: 2
            }
        );
        assert!(!report.all_passed());
        assert_eq!(report.failures().count(), 2);
    }

    #[test]
    fn human_formatting() {
        let output = sample().to_string();
        assert!(output.contains("Conformance Report"));
        assert!(output.contains("Total: 3 | Passed: 1 | Failed: 2"));
        assert!(output.contains("[text] text_op: FAILED: expected \"aa\", got \"a\""));
        assert!(output.contains("[mapping] mapping_op: FAILED: mapping_op panicked"));
    }

    #[test]
    fn empty_report_passes() {
        let report = ConformanceReport::from_results(vec![]);
        assert!(report.all_passed());
        assert!(report.to_string().contains("All cases passed."));
    }

    #[test]
    fn json_shape() {
        let json = sample().to_json();
        assert_eq!(json["summary"]["failed"], 2);
        assert_eq!(json["cases"][0]["status"], "passed");
        assert_eq!(json["cases"][1]["status"], "assertion_failed");
        assert_eq!(json["cases"][1]["expected"], "\"aa\"");
        assert_eq!(json["cases"][2]["status"], "bridge_failed");
        assert_eq!(json["cases"][2]["operation"], "mapping_op");
    }
}
