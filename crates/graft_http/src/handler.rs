//! Request handling: transport decoding, routing, and status mapping.

use bytes::Bytes;
use graft_engine::{Context, Engine, RequestInfo};
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::http::request::Parts;
use hyper::{Method, Request, Response, StatusCode};
use serde_json::{json, Value};
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

use crate::server::ServerConfig;

pub(crate) type BoxBody = http_body_util::combinators::BoxBody<Bytes, hyper::Error>;

static UI_TEMPLATE: &str = include_str!("ui.html");

/// Adapter-level failure, distinct from engine envelopes: these become a
/// 500 with `{"error": message}`.
#[derive(Debug, Error)]
pub(crate) enum AdapterError {
    #[error("missing \"graph\" query parameter")]
    MissingGraph,

    #[error("the graph must be valid JSON: {0}")]
    InvalidJson(String),

    #[error("failed to read request body: {0}")]
    Body(String),
}

fn full<T: Into<Bytes>>(chunk: T) -> BoxBody {
    Full::new(chunk.into())
        .map_err(|never| match never {})
        .boxed()
}

fn json_response(status: StatusCode, value: &Value) -> Response<BoxBody> {
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(full(value.to_string()))
        .unwrap()
}

/// Handles one inbound connection request.
pub(crate) async fn handle_request(
    req: Request<Incoming>,
    engine: &Engine,
    config: &ServerConfig,
) -> Response<BoxBody> {
    let (parts, body) = req.into_parts();

    let body_bytes = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            let err = AdapterError::Body(e.to_string());
            return json_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &json!({ "error": err.to_string() }),
            );
        }
    };

    respond(&parts, body_bytes, engine, config).await
}

/// Routes a decomposed request. Split from [`handle_request`] so tests can
/// exercise routing without a live connection body.
pub(crate) async fn respond(
    parts: &Parts,
    body: Bytes,
    engine: &Engine,
    config: &ServerConfig,
) -> Response<BoxBody> {
    if parts.method != Method::GET && parts.method != Method::POST {
        return Response::builder()
            .status(StatusCode::METHOD_NOT_ALLOWED)
            .header("Allow", "GET, POST")
            .header("Content-Type", "application/json")
            .body(full(
                json!({ "error": "graftql only supports GET and POST requests" }).to_string(),
            ))
            .unwrap();
    }

    let path = parts.uri.path();

    if config.ui && parts.method == Method::GET && path == "/ui" {
        return Response::builder()
            .status(StatusCode::OK)
            .header("Content-Type", "text/html; charset=utf-8")
            .body(full(UI_TEMPLATE))
            .unwrap();
    }

    if path != config.path {
        return json_response(StatusCode::NOT_FOUND, &json!({ "error": "not found" }));
    }

    let graph = if parts.method == Method::GET {
        graph_from_query(parts.uri.query().unwrap_or_default())
    } else {
        graph_from_body(&body)
    };

    let graph = match graph {
        Ok(graph) => graph,
        Err(e) => {
            debug!(error = %e, "graph decoding failed");
            return json_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &json!({ "error": e.to_string() }),
            );
        }
    };

    let context = Context::with_request(request_info(parts));
    let response = engine.execute(&graph, context).await;

    match serde_json::to_value(&response) {
        Ok(envelope) => json_response(StatusCode::OK, &envelope),
        Err(e) => json_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            &json!({ "error": e.to_string() }),
        ),
    }
}

/// Extracts and decodes the `graph` query parameter of a GET request.
///
/// The value may arrive percent-encoded. An encoded graph always starts
/// with an escape (`[` encodes to `%5B`), so decoding is gated on a
/// leading `%`; a plain-sent graph with a literal `%` inside a string
/// passes through untouched.
fn graph_from_query(query: &str) -> Result<Value, AdapterError> {
    let raw = query
        .split('&')
        .find_map(|pair| pair.strip_prefix("graph="))
        .ok_or(AdapterError::MissingGraph)?;

    let decoded = if raw.starts_with('%') {
        urlencoding::decode(raw)
            .map_err(|e| AdapterError::InvalidJson(e.to_string()))?
            .into_owned()
    } else {
        raw.to_string()
    };

    serde_json::from_str(&decoded).map_err(|e| AdapterError::InvalidJson(e.to_string()))
}

/// Parses a POST body as the graph JSON value.
fn graph_from_body(body: &Bytes) -> Result<Value, AdapterError> {
    serde_json::from_slice(body).map_err(|e| AdapterError::InvalidJson(e.to_string()))
}

fn request_info(parts: &Parts) -> RequestInfo {
    let headers: HashMap<String, String> = parts
        .headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect();

    RequestInfo {
        method: parts.method.to_string(),
        path: parts.uri.path().to_string(),
        headers,
    }
}
