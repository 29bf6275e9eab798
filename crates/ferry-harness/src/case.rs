//! The scripted conformance cases.
//!
//! One case per category, run in a fixed order. Each case pairs a
//! representative input with the transformation the counterparty documents
//! for its operation.

use std::collections::BTreeMap;
use std::fmt;

use ferry_bridge::{BridgeError, Operation};
use ferry_codec::{ArithmeticError, Bridgeable, Point, Value, ValueKind};

use crate::error::{HarnessError, Result};

/// What a case expects, or what a run observed.
#[derive(Debug, Clone, PartialEq)]
pub enum Observation {
    Value(Value),
    Failure(BridgeError),
}

impl From<std::result::Result<Value, BridgeError>> for Observation {
    fn from(result: std::result::Result<Value, BridgeError>) -> Self {
        match result {
            Ok(v) => Self::Value(v),
            Err(e) => Self::Failure(e),
        }
    }
}

impl fmt::Display for Observation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => write!(f, "{v}"),
            Self::Failure(e) => write!(f, "error: {e}"),
        }
    }
}

/// Result of evaluating one case.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Passed,
    /// The call completed but its observation did not match.
    AssertionFailed {
        expected: Observation,
        actual: Observation,
    },
    /// The adapter returned an error where a value was expected.
    BridgeFailed(BridgeError),
}

impl Outcome {
    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Passed)
    }
}

/// What a case compares the call against.
#[derive(Debug, Clone)]
pub enum Expectation {
    Exactly(Observation),
    /// Applied to a local copy of the input once the call has returned.
    AfterCall(fn(Value) -> Value),
}

/// One scripted round trip.
#[derive(Debug, Clone)]
pub struct ConformanceCase {
    pub name: &'static str,
    pub operation: Operation,
    pub input: Value,
    pub expected: Expectation,
}

impl ConformanceCase {
    fn returns(name: &'static str, operation: Operation, input: Value, expected: Value) -> Self {
        Self {
            name,
            operation,
            input,
            expected: Expectation::Exactly(Observation::Value(expected)),
        }
    }

    fn derives(
        name: &'static str,
        operation: Operation,
        input: Value,
        after_call: fn(Value) -> Value,
    ) -> Self {
        Self {
            name,
            operation,
            input,
            expected: Expectation::AfterCall(after_call),
        }
    }

    /// The observation this case expects, computed now.
    pub fn expected_observation(&self) -> Observation {
        match &self.expected {
            Expectation::Exactly(observation) => observation.clone(),
            Expectation::AfterCall(after_call) => {
                Observation::Value(after_call(self.input.clone()))
            }
        }
    }

    /// Compare what the bridge produced against this case's expectation.
    ///
    /// Call only after the bridge call has returned.
    pub fn evaluate(&self, actual: std::result::Result<Value, BridgeError>) -> Outcome {
        match (self.expected_observation(), actual) {
            (Observation::Value(_), Err(e)) => Outcome::BridgeFailed(e),
            (expected, actual) => {
                let actual = Observation::from(actual);
                if expected == actual {
                    Outcome::Passed
                } else {
                    Outcome::AssertionFailed { expected, actual }
                }
            }
        }
    }
}

fn text_list(items: &[&str]) -> Value {
    items
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .into_value()
}

fn text_map(entries: &[(&str, i32)]) -> Value {
    let entries: BTreeMap<String, Value> = entries
        .iter()
        .map(|(k, v)| (k.to_string(), Value::I32(*v)))
        .collect();
    Value::Mapping {
        value: ValueKind::i32(),
        entries,
    }
}

fn insert_zero(mut mapping: Value) -> Value {
    if let Value::Mapping { entries, .. } = &mut mapping {
        entries.insert("zero".to_string(), Value::I32(0));
    }
    mapping
}

/// All cases, in execution order.
pub fn standard_cases() -> Vec<ConformanceCase> {
    vec![
        ConformanceCase::returns("bool", Operation::Bool, Value::Bool(false), Value::Bool(true)),
        ConformanceCase::returns("i8", Operation::I8, Value::I8(0), Value::I8(1)),
        ConformanceCase::returns("i16", Operation::I16, Value::I16(0), Value::I16(1)),
        ConformanceCase::returns("i32", Operation::I32, Value::I32(0), Value::I32(1)),
        ConformanceCase::returns("i64", Operation::I64, Value::I64(0), Value::I64(1)),
        ConformanceCase::returns("u8", Operation::U8, Value::U8(0), Value::U8(1)),
        ConformanceCase::returns("u16", Operation::U16, Value::U16(0), Value::U16(1)),
        ConformanceCase::returns("u32", Operation::U32, Value::U32(0), Value::U32(1)),
        ConformanceCase::returns("u64", Operation::U64, Value::U64(0), Value::U64(1)),
        ConformanceCase::returns("f32", Operation::F32, Value::F32(0.0), Value::F32(1.0)),
        ConformanceCase::returns("f64", Operation::F64, Value::F64(0.0), Value::F64(1.0)),
        ConformanceCase::returns(
            "text",
            Operation::Text,
            Value::Text("Hello World!".into()),
            Value::Text("Hello World!Hello World!".into()),
        ),
        ConformanceCase::returns(
            "record",
            Operation::Record,
            Value::Record(Point::new(1.0, 2.0)),
            Value::Record(Point::new(2.0, 3.0)),
        ),
        ConformanceCase::returns(
            "optional-present",
            Operation::Optional,
            Some(0i32).into_value(),
            Some(1i32).into_value(),
        ),
        ConformanceCase::returns(
            "optional-absent",
            Operation::Optional,
            None::<i32>.into_value(),
            None::<i32>.into_value(),
        ),
        ConformanceCase::returns(
            "sequence",
            Operation::Sequence,
            text_list(&["one", "two", "three"]),
            text_list(&["one", "two", "three", "one", "two", "three"]),
        ),
        ConformanceCase::derives(
            "mapping",
            Operation::Mapping,
            text_map(&[("one", 1), ("two", 2), ("three", 3)]),
            insert_zero,
        ),
        ConformanceCase::returns("void", Operation::Void, Value::I32(0), Value::Void),
        ConformanceCase::returns(
            "fallible-success",
            Operation::Fallible,
            vec![0u64, 1].into_value(),
            Value::U64(1),
        ),
        ConformanceCase {
            name: "fallible-overflow",
            operation: Operation::Fallible,
            input: vec![u64::MAX, 1].into_value(),
            expected: Expectation::Exactly(Observation::Failure(BridgeError::ForeignCallFailed {
                operation: Operation::Fallible.name(),
                error: ArithmeticError::IntegerOverflow { a: u64::MAX, b: 1 },
            })),
        },
    ]
}

/// Case names in execution order.
pub fn case_names() -> Vec<&'static str> {
    standard_cases().iter().map(|c| c.name).collect()
}

/// Filter the standard cases, keeping execution order.
///
/// An empty `only` keeps every case. Names in either list must exist.
pub fn select_cases(only: &[String], skip: &[String]) -> Result<Vec<ConformanceCase>> {
    let known = case_names();
    for name in only.iter().chain(skip) {
        if !known.contains(&name.as_str()) {
            return Err(HarnessError::UnknownCase {
                name: name.clone(),
                known: known.join(", "),
            });
        }
    }

    Ok(standard_cases()
        .into_iter()
        .filter(|c| only.is_empty() || only.iter().any(|n| n == c.name))
        .filter(|c| !skip.iter().any(|n| n == c.name))
        .collect())
}
