//! Execution engine for GraftQL.
//!
//! This crate resolves call trees against a host-declared spec registry:
//! - `registry`: Spec registry and builder
//! - `resolver`: Resolver trait and sync/async adapters
//! - `validate`: Argument and result validation
//! - `conditions`: `::when` condition evaluation
//! - `executor`: The recursive async engine and result envelope
//! - `context`: Per-request context
//!
//! # Example
//!
//! ```ignore
//! use graft_engine::{Context, Engine, FieldSpec, SpecRegistry};
//! use serde_json::json;
//!
//! let registry = SpecRegistry::builder()
//!     .query("viewer", FieldSpec::resolve_fn("Person!", |_req| {
//!         Ok(json!({"id": "123"}))
//!     }))
//!     .field("Person", "id", FieldSpec::resolve_fn("String", |req| {
//!         Ok(req.data["id"].clone())
//!     }))
//!     .build();
//!
//! let engine = Engine::new(registry);
//! let response = engine.execute(&json!(["viewer", "id"]), Context::new()).await;
//! assert_eq!(response.data, Some(json!({"viewer": {"id": "123"}})));
//! ```

pub mod conditions;
pub mod context;
pub mod executor;
pub mod registry;
pub mod resolver;
pub mod validate;

pub use conditions::conditions_pass;
pub use context::{Context, RequestInfo};
pub use executor::{Engine, ErrorEntry, Response, PROCESSING_ERROR};
pub use registry::{ArgSpec, FieldSpec, RegistryBuilder, SpecRegistry, TypeChunk};
pub use resolver::{
    AsyncFnResolver, BoxedResolver, FnResolver, Resolve, ResolverError, ResolverFuture,
    ResolverRequest, ResolverResult,
};

// Re-export the core types hosts touch when declaring a registry.
pub use graft_core::{CallNode, StructuralError, TypeDescriptor, TypeToken};
