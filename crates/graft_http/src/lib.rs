//! HTTP adapter for GraftQL.
//!
//! Exposes an engine over HTTP:
//! - `GET <path>?graph=...` - graph JSON-encoded (optionally
//!   percent-encoded) in a query parameter
//! - `POST <path>` - graph as the JSON request body
//! - any other method - 405 with an `Allow: GET, POST` header
//! - `GET /ui` - a static explorer page, when enabled
//!
//! Successful resolution returns 200 with the result envelope; failures in
//! the adapter itself (malformed JSON, unreadable bodies) return 500 with
//! `{"error": message}`.

pub mod handler;
pub mod server;

pub use server::{GraftServer, ServerBuilder, ServerConfig, ServerError};
