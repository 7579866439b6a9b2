//! Core types for GraftQL.
//!
//! This crate provides the foundational types shared by the engine and its
//! transports:
//! - `descriptor`: Raw type tokens and their normalized descriptors
//! - `call`: The canonical call-tree representation and its JSON decoding
//! - `value`: Native JSON type helpers
//! - `error`: Structural (request-aborting) errors

pub mod call;
pub mod descriptor;
pub mod error;
pub mod value;

pub use call::{CallNode, COMPOSE, WHEN};
pub use descriptor::{is_native_type, TypeDescriptor, TypeToken};
pub use error::StructuralError;
pub use value::{is_plain_object, json_type_name, matches_native_type};
