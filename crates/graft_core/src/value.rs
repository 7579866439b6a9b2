//! Native JSON type helpers.

use serde_json::Value;

/// True for a JSON object that is not an array (the "plain object" shape).
pub fn is_plain_object(value: &Value) -> bool {
    value.is_object()
}

/// The runtime JSON type name of a value, used in error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Checks a non-null value against a native type name.
///
/// Arrays never match here: callers handle array descriptors elementwise.
pub fn matches_native_type(value: &Value, native_name: &str) -> bool {
    match native_name {
        "String" => value.is_string(),
        "Number" => value.is_number(),
        "Boolean" => value.is_boolean(),
        "Object" => is_plain_object(value),
        _ => false,
    }
}
