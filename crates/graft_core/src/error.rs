//! Structural errors.
//!
//! A structural error means the request violated the declared contract (or a
//! resolver returned malformed data): the whole request aborts and the
//! response carries errors only, no partial data. Resolver failures are not
//! structural; the engine captures those locally.

use thiserror::Error;

/// A request-aborting contract violation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructuralError {
    #[error("the value \"{0}\" must be an array")]
    NotAnArray(String),

    #[error("the value \"{0}\" must be a call name")]
    InvalidCallName(String),

    #[error("children in a graph must be strings or arrays")]
    InvalidChild,

    #[error("the call name \"{0}\" is not allowed")]
    UnknownCall(String),

    #[error("type name \"{0}\" is not defined")]
    UnknownType(String),

    #[error("\"::compose\" does not accept arguments")]
    ComposeArgs,

    #[error("\"::when\" is only valid among a field's children")]
    MisplacedWhen,

    #[error("a \"::when\" block requires a conditions object")]
    MissingConditions,

    #[error("unknown condition operator \"{0}\"")]
    UnknownOperator(String),

    #[error("malformed condition for operator \"{0}\": expected [field, value]")]
    MalformedCondition(String),

    #[error("unexpected arguments provided for field \"{field}\"")]
    UnexpectedArgs { field: String },

    #[error("args for field \"{field}\" are missing or not an object")]
    MissingArgs { field: String },

    #[error("missing expected arg \"{name}\" for field \"{field}\"")]
    MissingArg { field: String, name: String },

    #[error("unexpected arg \"{name}\" for field \"{field}\"")]
    UnexpectedArg { field: String, name: String },

    #[error("arg \"{name}\" for field \"{field}\" can not be null")]
    NullArg { field: String, name: String },

    #[error("arg \"{name}\" for field \"{field}\" does not match expected type \"{expected}\"")]
    ArgTypeMismatch {
        field: String,
        name: String,
        expected: String,
    },

    #[error("can not request child data on native type field \"{0}\"")]
    ChildrenOnNative(String),

    #[error("queries on custom type field \"{0}\" require identifying children")]
    MissingChildren(String),

    #[error("can not return a null value for required field \"{0}\"")]
    NullForRequired(String),

    #[error("expected field \"{field}\" to resolve to an array but got \"{got}\"")]
    ExpectedArray { field: String, got: String },

    #[error("data type \"{got}\" for field \"{field}\" does not match expected type \"{expected}\"")]
    TypeMismatch {
        field: String,
        expected: String,
        got: String,
    },
}
