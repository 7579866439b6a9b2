//! Argument and result validation.
//!
//! Both validators run against the same declarative spec: arguments before
//! the resolver is invoked, results after. Failures here are structural; a
//! mismatch means the client broke the declared contract or a resolver
//! returned malformed data.

use crate::registry::ArgSpec;
use graft_core::descriptor::{TypeDescriptor, TypeToken};
use graft_core::error::StructuralError;
use graft_core::value::{json_type_name, matches_native_type};
use serde_json::{Map, Value};

/// Checks a call's supplied arguments against a field's declared contract.
pub fn validate_args(
    field: &str,
    args: Option<&Map<String, Value>>,
    expect: Option<&ArgSpec>,
) -> Result<(), StructuralError> {
    let declared = match expect.filter(|e| !e.is_empty()) {
        Some(declared) => declared,
        None => {
            // No contract: arguments must be absent or empty.
            if args.is_some_and(|a| !a.is_empty()) {
                return Err(StructuralError::UnexpectedArgs {
                    field: field.to_string(),
                });
            }
            return Ok(());
        }
    };

    let args = args.ok_or_else(|| StructuralError::MissingArgs {
        field: field.to_string(),
    })?;

    for name in args.keys() {
        if !declared.contains_key(name) {
            return Err(StructuralError::UnexpectedArg {
                field: field.to_string(),
                name: name.clone(),
            });
        }
    }

    for (name, token) in declared {
        let value = args.get(name).ok_or_else(|| StructuralError::MissingArg {
            field: field.to_string(),
            name: name.clone(),
        })?;

        validate_arg_value(field, name, value, token)?;
    }

    Ok(())
}

fn validate_arg_value(
    field: &str,
    name: &str,
    value: &Value,
    token: &TypeToken,
) -> Result<(), StructuralError> {
    let desc = TypeDescriptor::from_token(token);

    if value.is_null() {
        if desc.is_required {
            return Err(StructuralError::NullArg {
                field: field.to_string(),
                name: name.to_string(),
            });
        }
        // Optional arguments accept null regardless of declared type.
        return Ok(());
    }

    let mismatch = || StructuralError::ArgTypeMismatch {
        field: field.to_string(),
        name: name.to_string(),
        expected: token.raw_name().to_string(),
    };

    if desc.is_array {
        let items = value.as_array().ok_or_else(mismatch)?;
        if items.iter().any(|item| !matches_native_type(item, &desc.name)) {
            return Err(mismatch());
        }
        return Ok(());
    }

    if !matches_native_type(value, &desc.name) {
        return Err(mismatch());
    }

    Ok(())
}

/// Checks resolver-returned data against a native type descriptor.
///
/// Custom-type results are not checked here: the engine validates their
/// child-presence and type-existence requirements before descending.
pub fn validate_native_result(
    field: &str,
    data: &Value,
    desc: &TypeDescriptor,
    children_requested: bool,
) -> Result<(), StructuralError> {
    if children_requested {
        return Err(StructuralError::ChildrenOnNative(field.to_string()));
    }

    if desc.is_array {
        let items = data
            .as_array()
            .ok_or_else(|| StructuralError::ExpectedArray {
                field: field.to_string(),
                got: json_type_name(data).to_string(),
            })?;

        for item in items {
            if !matches_native_type(item, &desc.name) {
                return Err(StructuralError::TypeMismatch {
                    field: field.to_string(),
                    expected: desc.name.clone(),
                    got: json_type_name(item).to_string(),
                });
            }
        }
        return Ok(());
    }

    if data.is_null() {
        if desc.is_required {
            return Err(StructuralError::NullForRequired(field.to_string()));
        }
        return Ok(());
    }

    if !matches_native_type(data, &desc.name) {
        return Err(StructuralError::TypeMismatch {
            field: field.to_string(),
            expected: desc.name.clone(),
            got: json_type_name(data).to_string(),
        });
    }

    Ok(())
}
