//! The spec registry: the declarative map of types and root queries.
//!
//! Constructed once by the host before any request and treated as read-only
//! for the lifetime of the process. The engine never mutates it, so it is
//! safely shared behind an `Arc` across concurrent requests.

use crate::resolver::{
    AsyncFnResolver, BoxedResolver, FnResolver, Resolve, ResolverRequest, ResolverResult,
};
use graft_core::descriptor::TypeToken;
use indexmap::IndexMap;
use std::fmt;
use std::future::Future;

/// An argument contract: argument name to declared (native) type token.
pub type ArgSpec = IndexMap<String, TypeToken>;

/// A type chunk: field name to field definition.
pub type TypeChunk = IndexMap<String, FieldSpec>;

/// A single field definition: return type, optional argument contract, and
/// the resolver that produces its data.
pub struct FieldSpec {
    ty: TypeToken,
    expect: Option<ArgSpec>,
    resolver: BoxedResolver,
}

impl FieldSpec {
    /// Creates a field with an explicit resolver.
    pub fn new<R: Resolve + 'static>(ty: impl Into<TypeToken>, resolver: R) -> Self {
        Self {
            ty: ty.into(),
            expect: None,
            resolver: Box::new(resolver),
        }
    }

    /// Creates a field resolved by a sync function.
    pub fn resolve_fn<F>(ty: impl Into<TypeToken>, f: F) -> Self
    where
        F: Fn(&ResolverRequest) -> ResolverResult + Send + Sync + 'static,
    {
        Self::new(ty, FnResolver::new(f))
    }

    /// Creates a field resolved by an async function.
    pub fn resolve_async<F, Fut>(ty: impl Into<TypeToken>, f: F) -> Self
    where
        F: Fn(ResolverRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ResolverResult> + Send + 'static,
    {
        Self::new(ty, AsyncFnResolver::new(f))
    }

    /// Declares an expected argument.
    pub fn expect(mut self, name: impl Into<String>, ty: impl Into<TypeToken>) -> Self {
        self.expect
            .get_or_insert_with(IndexMap::new)
            .insert(name.into(), ty.into());
        self
    }

    /// The field's raw return type token.
    pub fn ty(&self) -> &TypeToken {
        &self.ty
    }

    /// The field's argument contract, if it declares one.
    pub fn expected_args(&self) -> Option<&ArgSpec> {
        self.expect.as_ref()
    }

    /// The field's resolver.
    pub fn resolver(&self) -> &dyn Resolve {
        self.resolver.as_ref()
    }
}

impl fmt::Debug for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSpec")
            .field("ty", &self.ty)
            .field("expect", &self.expect)
            .finish()
    }
}

/// The immutable mapping of type name -> field name -> field definition,
/// plus the root-level query table.
#[derive(Debug, Default)]
pub struct SpecRegistry {
    types: IndexMap<String, TypeChunk>,
    queries: TypeChunk,
}

impl SpecRegistry {
    /// Creates a new registry builder.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// The root query table.
    pub fn queries(&self) -> &TypeChunk {
        &self.queries
    }

    /// Looks up a custom type's chunk by name.
    pub fn type_chunk(&self, name: &str) -> Option<&TypeChunk> {
        self.types.get(name)
    }

    /// True if a custom type with this name is declared.
    pub fn has_type(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }
}

/// Builder for [`SpecRegistry`].
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    registry: SpecRegistry,
}

impl RegistryBuilder {
    /// Adds a root-level query.
    pub fn query(mut self, name: impl Into<String>, field: FieldSpec) -> Self {
        self.registry.queries.insert(name.into(), field);
        self
    }

    /// Adds a field to a custom type, declaring the type if needed.
    pub fn field(
        mut self,
        type_name: impl Into<String>,
        field_name: impl Into<String>,
        field: FieldSpec,
    ) -> Self {
        self.registry
            .types
            .entry(type_name.into())
            .or_default()
            .insert(field_name.into(), field);
        self
    }

    /// Builds the registry.
    pub fn build(self) -> SpecRegistry {
        self.registry
    }
}
