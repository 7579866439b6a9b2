//! Per-request context threaded through one resolution tree.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// The inbound transport request, opaque to the engine.
#[derive(Debug, Clone, Default)]
pub struct RequestInfo {
    /// HTTP method, if the request arrived over HTTP.
    pub method: String,
    /// Request path.
    pub path: String,
    /// Request headers.
    pub headers: HashMap<String, String>,
}

/// Request-scoped carrier handed to every resolver in one request.
///
/// Created at the start of a request and never shared across requests. The
/// engine never reads it; it exists for host resolvers (auth material,
/// loaders, the inbound request).
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// The inbound transport request.
    pub request: RequestInfo,
    /// String-keyed request-scoped data.
    data: HashMap<String, Value>,
}

impl Context {
    /// Creates an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context carrying the inbound transport request.
    pub fn with_request(request: RequestInfo) -> Self {
        Self {
            request,
            data: HashMap::new(),
        }
    }

    /// Sets a value in the context.
    pub fn set<T: Serialize>(&mut self, key: impl Into<String>, value: T) {
        if let Ok(v) = serde_json::to_value(value) {
            self.data.insert(key.into(), v);
        }
    }

    /// Gets a value from the context.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.data
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// Gets a request header value.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.request.headers.get(key).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_data() {
        let mut ctx = Context::new();
        ctx.set("user_id", "123");

        assert_eq!(ctx.get::<String>("user_id"), Some("123".to_string()));
        assert_eq!(ctx.get::<String>("missing"), None);
    }

    #[test]
    fn test_context_request() {
        let mut info = RequestInfo {
            method: "POST".to_string(),
            path: "/graft".to_string(),
            headers: HashMap::new(),
        };
        info.headers
            .insert("authorization".to_string(), "Bearer x".to_string());

        let ctx = Context::with_request(info);
        assert_eq!(ctx.request.method, "POST");
        assert_eq!(ctx.header("authorization"), Some("Bearer x"));
    }
}
