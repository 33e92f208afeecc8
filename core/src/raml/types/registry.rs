//! # Type Registry
//!
//! Maps a type-kind name (`"object"`, `"string"`, ...) to the factory that builds descriptors
//! of that kind. The built-in kinds come from one static list; a process-wide instance holding
//! exactly that list is built once and never mutated afterwards. Additional kinds go on an
//! owned registry.

use crate::error::AppResult;
use crate::raml::types::descriptors::{ObjectType, StringType, TypeDescriptor};
use serde_yaml::Mapping;
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

/// Builds a descriptor from its name and the declaration fields left after `type` was removed.
pub type TypeFactory = fn(&str, Mapping) -> AppResult<TypeDescriptor>;

/// Kinds every registry created with [`TypeRegistry::with_builtins`] starts with.
pub const BUILTIN_KINDS: [(&str, TypeFactory); 2] = [
    (ObjectType::KIND, ObjectType::from_fields as TypeFactory),
    (StringType::KIND, StringType::from_fields as TypeFactory),
];

/// Kind name -> descriptor factory.
#[derive(Clone, Default)]
pub struct TypeRegistry {
    kinds: HashMap<String, TypeFactory>,
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<&str> = self.kinds().collect();
        kinds.sort_unstable();
        f.debug_struct("TypeRegistry").field("kinds", &kinds).finish()
    }
}

impl TypeRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding [`BUILTIN_KINDS`].
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for (kind, factory) in BUILTIN_KINDS {
            registry.register_kind(kind, factory);
        }
        registry
    }

    /// The shared read-only registry of built-in kinds.
    pub fn global() -> &'static TypeRegistry {
        static GLOBAL: OnceLock<TypeRegistry> = OnceLock::new();
        GLOBAL.get_or_init(TypeRegistry::with_builtins)
    }

    /// Associates `kind` with `factory`. The last registration for a name wins; the factory it
    /// replaced, if any, is returned.
    pub fn register_kind(
        &mut self,
        kind: impl Into<String>,
        factory: TypeFactory,
    ) -> Option<TypeFactory> {
        let kind = kind.into();
        tracing::debug!(kind = %kind, "registering type kind");
        self.kinds.insert(kind, factory)
    }

    /// Factory registered for `kind`.
    pub fn lookup_kind(&self, kind: &str) -> Option<TypeFactory> {
        self.kinds.get(kind).copied()
    }

    /// Whether `kind` is registered.
    pub fn contains_kind(&self, kind: &str) -> bool {
        self.kinds.contains_key(kind)
    }

    /// Registered kind names, in no particular order.
    pub fn kinds(&self) -> impl Iterator<Item = &str> + '_ {
        self.kinds.keys().map(String::as_str)
    }
}
