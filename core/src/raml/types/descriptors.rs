//! # Type Descriptors
//!
//! The immutable shapes produced by type resolution. Each variant owns a statically declared
//! field set; declarations carrying anything else are rejected while decoding.

use crate::error::{AppError, AppResult};
use crate::raml::content::Content;
use crate::raml::types::properties::{parse_properties, Property};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use std::fmt;

/// A resolved custom type.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDescriptor {
    /// `type: object`
    Object(ObjectType),
    /// `type: string` (also the default when `type` is omitted).
    String(StringType),
    /// A kind registered at runtime on a [`crate::raml::types::TypeRegistry`].
    Extension(ExtensionType),
}

impl TypeDescriptor {
    /// Declared name of the type.
    pub fn name(&self) -> &str {
        match self {
            TypeDescriptor::Object(t) => &t.name,
            TypeDescriptor::String(t) => &t.name,
            TypeDescriptor::Extension(t) => &t.name,
        }
    }

    /// Description, empty when none was declared.
    pub fn description(&self) -> &Content {
        match self {
            TypeDescriptor::Object(t) => &t.description,
            TypeDescriptor::String(t) => &t.description,
            TypeDescriptor::Extension(t) => &t.description,
        }
    }

    /// The registry key this descriptor was built for.
    pub fn kind(&self) -> &str {
        match self {
            TypeDescriptor::Object(_) => ObjectType::KIND,
            TypeDescriptor::String(_) => StringType::KIND,
            TypeDescriptor::Extension(t) => &t.kind,
        }
    }

    /// Returns the object variant, if this is one.
    pub fn as_object(&self) -> Option<&ObjectType> {
        match self {
            TypeDescriptor::Object(t) => Some(t),
            _ => None,
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Object(t) => fmt::Display::fmt(t, f),
            TypeDescriptor::String(t) => fmt::Display::fmt(t, f),
            TypeDescriptor::Extension(t) => fmt::Display::fmt(t, f),
        }
    }
}

/// An object type with named properties.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectType {
    /// Declared name.
    pub name: String,
    /// Description.
    pub description: Content,
    /// Property name -> property descriptor, in declaration order.
    pub properties: IndexMap<String, Property>,
    /// Minimum number of properties.
    pub min_properties: usize,
    /// Maximum number of properties.
    pub max_properties: usize,
    /// `additionalProperties`, passed through untouched.
    pub additional_properties: Option<Value>,
    /// `patternProperties`, passed through untouched.
    pub pattern_properties: Option<Value>,
    /// `discriminator`, passed through untouched.
    pub discriminator: Option<Value>,
    /// `discriminatorValue`, passed through untouched.
    pub discriminator_value: Option<Value>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct ObjectTypeFields {
    #[serde(default)]
    description: Option<Content>,
    #[serde(default)]
    properties: Option<Mapping>,
    #[serde(default)]
    min_properties: Option<usize>,
    #[serde(default)]
    max_properties: Option<usize>,
    #[serde(default)]
    additional_properties: Option<Value>,
    #[serde(default)]
    pattern_properties: Option<Value>,
    #[serde(default)]
    discriminator: Option<Value>,
    #[serde(default)]
    discriminator_value: Option<Value>,
}

impl ObjectType {
    /// Registry key.
    pub const KIND: &'static str = "object";

    /// Builds an object type from the fields left after `type` was taken out.
    pub fn from_fields(name: &str, fields: Mapping) -> AppResult<TypeDescriptor> {
        let decl: ObjectTypeFields = decode_fields(name, fields)?;

        let properties = match &decl.properties {
            Some(raw) => parse_properties(raw)?,
            None => IndexMap::new(),
        };
        let min_properties = decl.min_properties.unwrap_or(0);
        let max_properties = decl.max_properties.unwrap_or(usize::MAX);
        if min_properties > max_properties {
            return Err(AppError::invalid_field(
                "minProperties",
                min_properties,
                format!(
                    "type '{}' declares minProperties greater than maxProperties ({})",
                    name, max_properties
                ),
            ));
        }

        Ok(TypeDescriptor::Object(ObjectType {
            name: name.to_string(),
            description: decl.description.unwrap_or_default(),
            properties,
            min_properties,
            max_properties,
            additional_properties: decl.additional_properties,
            pattern_properties: decl.pattern_properties,
            discriminator: decl.discriminator,
            discriminator_value: decl.discriminator_value,
        }))
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectType(name={:?}, properties={{", self.name)?;
        for (i, (key, prop)) in self.properties.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{:?}: {}", key, prop)?;
        }
        f.write_str("})")
    }
}

/// A leaf string type.
#[derive(Debug, Clone, PartialEq)]
pub struct StringType {
    /// Declared name.
    pub name: String,
    /// Description.
    pub description: Content,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct StringTypeFields {
    #[serde(default)]
    description: Option<Content>,
}

impl StringType {
    /// Registry key.
    pub const KIND: &'static str = "string";

    /// Builds a string type from the fields left after `type` was taken out.
    pub fn from_fields(name: &str, fields: Mapping) -> AppResult<TypeDescriptor> {
        let decl: StringTypeFields = decode_fields(name, fields)?;
        Ok(TypeDescriptor::String(StringType {
            name: name.to_string(),
            description: decl.description.unwrap_or_default(),
        }))
    }
}

impl fmt::Display for StringType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StringType(name={:?})", self.name)
    }
}

/// A type whose kind was registered at runtime.
///
/// Only `description` is interpreted; every other declared facet is kept as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtensionType {
    /// Registry key.
    pub kind: String,
    /// Declared name.
    pub name: String,
    /// Description.
    pub description: Content,
    /// Remaining facets of the declaration.
    pub facets: Mapping,
}

impl ExtensionType {
    /// Splits `description` off the remaining fields.
    pub fn new(kind: impl Into<String>, name: &str, mut fields: Mapping) -> AppResult<Self> {
        let description = match fields.remove("description") {
            None | Some(Value::Null) => Content::default(),
            Some(Value::String(s)) => Content::new(s),
            Some(other) => {
                return Err(AppError::invalid_field(
                    "description",
                    format!("{:?}", other),
                    format!("description of type '{}' must be a string", name),
                ))
            }
        };
        Ok(Self {
            kind: kind.into(),
            name: name.to_string(),
            description,
            facets: fields,
        })
    }
}

impl fmt::Display for ExtensionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ExtensionType(kind={:?}, name={:?})", self.kind, self.name)
    }
}

fn decode_fields<T: for<'de> Deserialize<'de>>(name: &str, fields: Mapping) -> AppResult<T> {
    serde_yaml::from_value(Value::Mapping(fields))
        .map_err(|e| AppError::invalid_declaration(name, e))
}
