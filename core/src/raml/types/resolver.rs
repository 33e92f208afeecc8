//! # Type Resolution
//!
//! Resolves the `type:` expression of a raw declaration to a registered kind and builds the
//! descriptor. Only kinds are resolved: `type: Person` naming another declared type is not
//! followed and fails like any other unknown kind.

use crate::error::{AppError, AppResult};
use crate::raml::types::descriptors::TypeDescriptor;
use crate::raml::types::registry::TypeRegistry;
use indexmap::IndexMap;
use serde_yaml::{Mapping, Value};

/// Kind used when a declaration has no `type` key.
pub const DEFAULT_TYPE_KIND: &str = "string";

impl TypeRegistry {
    /// Resolves one declaration against this registry.
    ///
    /// `raw` is never modified; the factory receives a copy without the `type` key.
    pub fn resolve(&self, name: &str, raw: &Mapping) -> AppResult<TypeDescriptor> {
        let mut fields = raw.clone();
        let expression = match fields.remove("type") {
            None => DEFAULT_TYPE_KIND.to_string(),
            Some(Value::String(expr)) => expr,
            Some(other) => return Err(AppError::UnknownType(render_expression(&other))),
        };

        let factory = self
            .lookup_kind(&expression)
            .ok_or_else(|| AppError::UnknownType(expression.clone()))?;
        tracing::debug!(name, kind = %expression, "resolving type");
        factory(name, fields)
    }

    /// Resolves a whole `types:` section in declaration order, stopping at the first error.
    ///
    /// Besides full declarations, a bare kind name (`Email: string`) and an empty declaration
    /// (`Anything:`) are accepted.
    pub fn resolve_all(&self, section: &Mapping) -> AppResult<IndexMap<String, TypeDescriptor>> {
        let mut types = IndexMap::with_capacity(section.len());
        for (key, decl) in section {
            let name = key.as_str().ok_or_else(|| {
                AppError::invalid_declaration(format!("{:?}", key), "type names must be strings")
            })?;
            let raw = match decl {
                Value::Mapping(m) => m.clone(),
                Value::Null => Mapping::new(),
                Value::String(expr) => {
                    let mut m = Mapping::new();
                    m.insert(Value::String("type".into()), Value::String(expr.clone()));
                    m
                }
                other => {
                    return Err(AppError::invalid_declaration(
                        name,
                        format!("expected a type declaration, found {:?}", other),
                    ))
                }
            };

            let descriptor = self.resolve(name, &raw).inspect_err(|err| {
                if let AppError::UnknownType(expr) = err {
                    if section.contains_key(expr.as_str()) {
                        tracing::warn!(
                            name,
                            parent = %expr,
                            "inheriting from a declared type is not supported"
                        );
                    }
                }
            })?;
            types.insert(name.to_string(), descriptor);
        }
        Ok(types)
    }
}

/// Resolves one declaration against the built-in kinds.
pub fn create_type(name: &str, raw: &Mapping) -> AppResult<TypeDescriptor> {
    TypeRegistry::global().resolve(name, raw)
}

/// Resolves a `types:` section against the built-in kinds.
pub fn resolve_types(section: &Mapping) -> AppResult<IndexMap<String, TypeDescriptor>> {
    TypeRegistry::global().resolve_all(section)
}

fn render_expression(value: &Value) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| format!("{:?}", value))
}
