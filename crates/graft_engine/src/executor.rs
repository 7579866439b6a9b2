//! The execution engine.
//!
//! Walks a call tree recursively, validating each node against the spec
//! registry, invoking resolvers, and assembling the result envelope.
//! Independent sub-resolutions (siblings, array elements, `::compose`
//! children, admitted `::when` batches) are launched concurrently and
//! awaited jointly.
//!
//! Two failure tiers apply. Structural violations (unknown calls, argument
//! contract breaches, malformed resolver output) abort the whole request
//! and surface as a `processingError` envelope with no data. A resolver
//! failure is local: it is caught at the invocation boundary, logged as
//! `[callName, message]`, and the field resolves to null while siblings
//! and ancestors continue.

use crate::conditions::conditions_pass;
use crate::context::Context;
use crate::registry::{SpecRegistry, TypeChunk};
use crate::resolver::ResolverRequest;
use crate::validate::{validate_args, validate_native_result};
use futures::future::join_all;
use graft_core::call::CallNode;
use graft_core::descriptor::TypeDescriptor;
use graft_core::error::StructuralError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Tag used for request-level structural failures.
pub const PROCESSING_ERROR: &str = "processingError";

/// One entry in the request error log: `[callName, message]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEntry(pub String, pub String);

/// The result envelope.
///
/// A present `data` key signals partial-or-full success (check `errors`
/// for local failures); `errors` alone signals total failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// The resolved data, absent on structural failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Collected `[callName, message]` errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ErrorEntry>>,
}

impl Response {
    /// Returns true if the response carries data.
    pub fn has_data(&self) -> bool {
        self.data.is_some()
    }

    /// Returns true if the response carries errors.
    pub fn has_errors(&self) -> bool {
        self.errors.as_ref().is_some_and(|e| !e.is_empty())
    }

    fn total_failure(error: &StructuralError) -> Self {
        Self {
            data: None,
            errors: Some(vec![ErrorEntry(
                PROCESSING_ERROR.to_string(),
                error.to_string(),
            )]),
        }
    }
}

/// Per-request execution state shared by all branches of one resolution.
struct ExecutionScope<'a> {
    registry: &'a SpecRegistry,
    context: Arc<Context>,
    // Append-only; entries land in the order failures are observed under
    // in-order polling of sibling futures.
    errors: Arc<RwLock<Vec<ErrorEntry>>>,
}

/// The query execution engine.
///
/// Holds an immutable spec registry and is safely shared across concurrent
/// requests.
pub struct Engine {
    registry: Arc<SpecRegistry>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine").finish_non_exhaustive()
    }
}

impl Engine {
    /// Creates an engine over a registry.
    pub fn new(registry: SpecRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    /// Creates an engine over an already-shared registry.
    pub fn from_arc(registry: Arc<SpecRegistry>) -> Self {
        Self { registry }
    }

    /// The engine's registry.
    pub fn registry(&self) -> &SpecRegistry {
        &self.registry
    }

    /// Resolves a wire-format graph value and returns the result envelope.
    ///
    /// Structural errors anywhere in the traversal (including decoding)
    /// abort into `{errors: [["processingError", message]]}` with no data.
    pub async fn execute(&self, graph: &Value, context: Context) -> Response {
        match CallNode::from_value(graph) {
            Ok(node) => self.execute_call(&node, context).await,
            Err(e) => Response::total_failure(&e),
        }
    }

    /// Resolves an already-decoded call tree.
    pub async fn execute_call(&self, node: &CallNode, context: Context) -> Response {
        debug!(call = %node.name, "resolving graph");

        let scope = ExecutionScope {
            registry: &self.registry,
            context: Arc::new(context),
            errors: Arc::new(RwLock::new(Vec::new())),
        };

        match resolve_node(node, self.registry.queries(), &Value::Null, &scope).await {
            Ok(data) => {
                let errors = scope.errors.read().await;
                Response {
                    data: Some(data),
                    errors: (!errors.is_empty()).then(|| errors.clone()),
                }
            }
            Err(e) => {
                debug!(call = %node.name, error = %e, "graph aborted");
                Response::total_failure(&e)
            }
        }
    }
}

/// Resolves one call node against the active query table, returning the
/// wrapped `{callName: value}` object (or, for `::compose`, a positional
/// array of its children's results).
fn resolve_node<'a>(
    node: &'a CallNode,
    chunk: &'a TypeChunk,
    parent: &'a Value,
    scope: &'a ExecutionScope<'a>,
) -> Pin<Box<dyn Future<Output = Result<Value, StructuralError>> + Send + 'a>> {
    Box::pin(async move {
        if node.is_compose() {
            return resolve_compose(node, chunk, parent, scope).await;
        }

        // `::when` blocks are consumed while resolving a custom type's
        // children; reaching one here means it was used as a call.
        if node.is_when() {
            return Err(StructuralError::MisplacedWhen);
        }

        let field = chunk
            .get(&node.name)
            .ok_or_else(|| StructuralError::UnknownCall(node.name.clone()))?;

        validate_args(&node.name, node.args.as_ref(), field.expected_args())?;

        let desc = TypeDescriptor::from_token(field.ty());
        if !desc.is_native && !scope.registry.has_type(&desc.name) {
            return Err(StructuralError::UnknownType(desc.name.clone()));
        }

        let request = ResolverRequest {
            args: node.args.clone().unwrap_or_default(),
            context: Arc::clone(&scope.context),
            data: parent.clone(),
        };

        let data = match field.resolver().resolve(request).await {
            Ok(data) => data,
            Err(e) => {
                // Local failure: record it and null the field; siblings
                // and ancestors continue.
                debug!(field = %node.name, error = %e, "resolver failed");
                scope
                    .errors
                    .write()
                    .await
                    .push(ErrorEntry(node.name.clone(), e.to_string()));
                return Ok(wrap(&node.name, Value::Null));
            }
        };

        if desc.is_native {
            validate_native_result(&node.name, &data, &desc, !node.children.is_empty())?;
            return Ok(wrap(&node.name, data));
        }

        if node.children.is_empty() {
            return Err(StructuralError::MissingChildren(node.name.clone()));
        }

        // Existence was checked above; the chunk lookup cannot miss.
        let child_chunk = scope
            .registry
            .type_chunk(&desc.name)
            .ok_or_else(|| StructuralError::UnknownType(desc.name.clone()))?;

        if desc.is_array {
            let items = data
                .as_array()
                .ok_or_else(|| StructuralError::ExpectedArray {
                    field: node.name.clone(),
                    got: graft_core::value::json_type_name(&data).to_string(),
                })?;

            let outs = join_all(
                items
                    .iter()
                    .map(|item| resolve_children(&node.children, child_chunk, item, scope)),
            )
            .await
            .into_iter()
            .map(|out| out.map(Value::Object))
            .collect::<Result<Vec<_>, _>>()?;

            return Ok(wrap(&node.name, Value::Array(outs)));
        }

        let out = resolve_children(&node.children, child_chunk, &data, scope).await?;
        Ok(wrap(&node.name, Value::Object(out)))
    })
}

/// Resolves `::compose`: each child is an independent call against the same
/// query table and parent data. Output is positional regardless of
/// completion order.
async fn resolve_compose<'a>(
    node: &'a CallNode,
    chunk: &'a TypeChunk,
    parent: &'a Value,
    scope: &'a ExecutionScope<'a>,
) -> Result<Value, StructuralError> {
    if node.args.is_some() {
        return Err(StructuralError::ComposeArgs);
    }

    let results = join_all(
        node.children
            .iter()
            .map(|child| resolve_node(child, chunk, parent, scope)),
    )
    .await
    .into_iter()
    .collect::<Result<Vec<_>, _>>()?;

    Ok(Value::Array(results))
}

/// Resolves the children of a custom-type node against one data item.
///
/// Real children resolve first, concurrently; `::when` blocks are then
/// evaluated against the merged output and their admitted children resolve
/// as a second concurrent batch.
async fn resolve_children<'a>(
    children: &'a [CallNode],
    chunk: &'a TypeChunk,
    parent: &'a Value,
    scope: &'a ExecutionScope<'a>,
) -> Result<Map<String, Value>, StructuralError> {
    let (conditions, real): (Vec<&CallNode>, Vec<&CallNode>) =
        children.iter().partition(|child| child.is_when());

    let mut out = Map::new();

    let results = join_all(
        real.iter()
            .map(|child| resolve_node(child, chunk, parent, scope)),
    )
    .await;
    for result in results {
        merge_into(&mut out, result?);
    }

    let mut admitted: Vec<&CallNode> = Vec::new();
    for block in conditions {
        let conds = block
            .args
            .as_ref()
            .ok_or(StructuralError::MissingConditions)?;
        if conditions_pass(conds, &out)? {
            admitted.extend(block.children.iter());
        }
    }

    let results = join_all(
        admitted
            .iter()
            .map(|child| resolve_node(child, chunk, parent, scope)),
    )
    .await;
    for result in results {
        merge_into(&mut out, result?);
    }

    Ok(out)
}

fn wrap(name: &str, value: Value) -> Value {
    let mut obj = Map::new();
    obj.insert(name.to_string(), value);
    Value::Object(obj)
}

/// Merges a child result into its parent's output map by key. A positional
/// array (from a nested `::compose`) merges each contained object.
fn merge_into(out: &mut Map<String, Value>, value: Value) {
    match value {
        Value::Object(map) => out.extend(map),
        Value::Array(items) => {
            for item in items {
                if let Value::Object(map) = item {
                    out.extend(map);
                }
            }
        }
        _ => {}
    }
}
