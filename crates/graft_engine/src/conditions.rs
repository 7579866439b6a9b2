//! Condition evaluation for the `::when` meta-operator.
//!
//! A conditions object maps operator names to `[fieldName, expectedValue]`
//! pairs and is evaluated against the already-resolved output of a node's
//! real children. Every key must pass for the block's children to be
//! included.

use graft_core::error::StructuralError;
use regex::Regex;
use serde_json::{Map, Value};
use std::cmp::Ordering;

/// Evaluates a conditions object against a resolved sibling output map.
pub fn conditions_pass(
    conditions: &Map<String, Value>,
    output: &Map<String, Value>,
) -> Result<bool, StructuralError> {
    for (operator, spec) in conditions {
        let (field, expected) = split_condition(operator, spec)?;
        let value = output.get(field).unwrap_or(&Value::Null);

        if !evaluate(operator, value, expected)? {
            return Ok(false);
        }
    }
    Ok(true)
}

fn split_condition<'a>(
    operator: &str,
    spec: &'a Value,
) -> Result<(&'a str, &'a Value), StructuralError> {
    let malformed = || StructuralError::MalformedCondition(operator.to_string());

    let pair = spec.as_array().ok_or_else(malformed)?;
    let field = pair.first().and_then(Value::as_str).ok_or_else(malformed)?;
    // Unary operators (truthy/falsy) ignore the expected value.
    let expected = pair.get(1).unwrap_or(&Value::Null);
    Ok((field, expected))
}

fn evaluate(operator: &str, value: &Value, expected: &Value) -> Result<bool, StructuralError> {
    let passed = match operator {
        "eql" => value == expected,
        "nql" => value != expected,
        "lt" => compare(value, expected).is_some_and(|o| o == Ordering::Less),
        "gt" => compare(value, expected).is_some_and(|o| o == Ordering::Greater),
        "lte" => compare(value, expected).is_some_and(|o| o != Ordering::Greater),
        "gte" => compare(value, expected).is_some_and(|o| o != Ordering::Less),
        "truthy" => is_truthy(value),
        "falsy" => !is_truthy(value),
        "match" => {
            let pattern = expected
                .as_str()
                .ok_or_else(|| StructuralError::MalformedCondition(operator.to_string()))?;
            let re = Regex::new(pattern)
                .map_err(|_| StructuralError::MalformedCondition(operator.to_string()))?;
            value.as_str().is_some_and(|s| re.is_match(s))
        }
        "contains" => match value {
            Value::String(s) => expected.as_str().is_some_and(|needle| s.contains(needle)),
            Value::Array(items) => items.contains(expected),
            _ => false,
        },
        other => return Err(StructuralError::UnknownOperator(other.to_string())),
    };

    Ok(passed)
}

/// Numbers compare numerically, strings lexicographically; anything else
/// never orders.
fn compare(value: &Value, expected: &Value) -> Option<Ordering> {
    match (value, expected) {
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
