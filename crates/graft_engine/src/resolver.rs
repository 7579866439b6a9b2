//! Resolver trait and adapters.
//!
//! A resolver produces a field's data given the call's arguments, the
//! request context, and the parent node's data. Resolver failures are
//! local: the engine records them and nulls the field instead of aborting
//! the request.

use crate::context::Context;
use serde_json::{Map, Value};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use thiserror::Error;

/// Everything a resolver receives for one invocation.
#[derive(Debug, Clone)]
pub struct ResolverRequest {
    /// The call's arguments (empty map when none were supplied).
    pub args: Map<String, Value>,
    /// The request-scoped context.
    pub context: Arc<Context>,
    /// The parent node's resolved data (`Null` at the root).
    pub data: Value,
}

impl ResolverRequest {
    /// Gets an argument as a concrete type.
    pub fn arg<T: serde::de::DeserializeOwned>(&self, name: &str) -> Option<T> {
        self.args
            .get(name)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// Gets a required argument, failing the field if absent or mistyped.
    pub fn require<T: serde::de::DeserializeOwned>(&self, name: &str) -> Result<T, ResolverError> {
        self.args
            .get(name)
            .ok_or_else(|| ResolverError::MissingArgument(name.to_string()))
            .and_then(|v| {
                serde_json::from_value(v.clone())
                    .map_err(|e| ResolverError::ArgumentParse(name.to_string(), e.to_string()))
            })
    }
}

/// Error from a resolver. Captured locally by the engine.
#[derive(Debug, Clone, Error)]
pub enum ResolverError {
    #[error("missing required argument: {0}")]
    MissingArgument(String),

    #[error("failed to parse argument \"{0}\": {1}")]
    ArgumentParse(String, String),

    #[error("{0}")]
    Custom(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ResolverError {
    /// Creates a custom error with the given message.
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom(message.into())
    }
}

/// Result type for resolvers.
pub type ResolverResult = Result<Value, ResolverError>;

/// Future type for async resolvers.
pub type ResolverFuture = Pin<Box<dyn Future<Output = ResolverResult> + Send + 'static>>;

/// Trait for field resolvers.
pub trait Resolve: Send + Sync {
    /// Resolves a field value.
    fn resolve(&self, req: ResolverRequest) -> ResolverFuture;
}

/// A boxed resolver.
pub type BoxedResolver = Box<dyn Resolve>;

/// A wrapper for sync resolver functions.
pub struct FnResolver {
    func: Arc<dyn Fn(&ResolverRequest) -> ResolverResult + Send + Sync>,
}

impl FnResolver {
    /// Creates a new function resolver.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&ResolverRequest) -> ResolverResult + Send + Sync + 'static,
    {
        Self { func: Arc::new(f) }
    }
}

impl Resolve for FnResolver {
    fn resolve(&self, req: ResolverRequest) -> ResolverFuture {
        let result = (self.func)(&req);
        Box::pin(async move { result })
    }
}

/// A wrapper for async resolver functions.
pub struct AsyncFnResolver {
    func: Arc<dyn Fn(ResolverRequest) -> ResolverFuture + Send + Sync>,
}

impl AsyncFnResolver {
    /// Creates a new async function resolver.
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn(ResolverRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ResolverResult> + Send + 'static,
    {
        Self {
            func: Arc::new(move |req| Box::pin(f(req))),
        }
    }
}

impl Resolve for AsyncFnResolver {
    fn resolve(&self, req: ResolverRequest) -> ResolverFuture {
        (self.func)(req)
    }
}
