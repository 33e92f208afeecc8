//! # Property Descriptors
//!
//! Turns the `properties:` map of an object type into [`Property`] records, one per key.
//! The `type` of a property is kept as a name; it is not resolved against the registry.

use crate::error::{AppError, AppResult};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use std::fmt;

/// A single declared property of an object type.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Property {
    /// Unset, `true` or `false`.
    #[serde(default)]
    pub required: Option<bool>,
    /// Default value, untyped.
    #[serde(default)]
    pub default: Option<Value>,
    /// Declared type name.
    #[serde(rename = "type", default = "default_property_type")]
    pub ty: String,
}

fn default_property_type() -> String {
    "string".to_string()
}

impl Default for Property {
    fn default() -> Self {
        Self {
            required: None,
            default: None,
            ty: default_property_type(),
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Property(type={:?})", self.ty)
    }
}

/// Builds one [`Property`] per entry of `raw`, keyed identically.
///
/// Accepted declarations:
/// - a mapping with `required`, `default` and `type`;
/// - a bare type name (`name: string`);
/// - nothing at all (`name:`), which yields the defaults.
pub fn parse_properties(raw: &Mapping) -> AppResult<IndexMap<String, Property>> {
    let mut properties = IndexMap::with_capacity(raw.len());
    for (key, decl) in raw {
        let name = match key {
            Value::String(s) => s.clone(),
            other => {
                return Err(AppError::invalid_declaration(
                    format!("{:?}", other),
                    "property names must be strings",
                ))
            }
        };
        let property = parse_property(&name, decl)?;
        properties.insert(name, property);
    }
    Ok(properties)
}

fn parse_property(name: &str, decl: &Value) -> AppResult<Property> {
    match decl {
        Value::Null => Ok(Property::default()),
        Value::String(ty) => Ok(Property {
            ty: ty.clone(),
            ..Property::default()
        }),
        Value::Mapping(_) => serde_yaml::from_value(decl.clone())
            .map_err(|e| AppError::invalid_declaration(name, e)),
        other => Err(AppError::invalid_declaration(
            name,
            format!("expected a property declaration, found {:?}", other),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(yaml: &str) -> Mapping {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_defaults() {
        let props = parse_properties(&mapping("name:\n  type: string\n")).unwrap();
        let name = &props["name"];
        assert_eq!(name.ty, "string");
        assert_eq!(name.required, None);
        assert_eq!(name.default, None);
    }

    #[test]
    fn test_one_descriptor_per_key() {
        let raw = mapping("a: {}\nb:\n  required: true\nc:\n  type: number\n  default: 4\n");
        let props = parse_properties(&raw).unwrap();
        let keys: Vec<&str> = props.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
        assert_eq!(props["a"], Property::default());
        assert_eq!(props["b"].required, Some(true));
        assert_eq!(props["c"].ty, "number");
        assert_eq!(props["c"].default.as_ref().and_then(Value::as_i64), Some(4));
    }

    #[test]
    fn test_empty_map() {
        assert!(parse_properties(&Mapping::new()).unwrap().is_empty());
    }

    #[test]
    fn test_shorthand_and_null() {
        let props = parse_properties(&mapping("email: Email\nnick:\n")).unwrap();
        assert_eq!(props["email"].ty, "Email");
        assert_eq!(props["nick"], Property::default());
    }

    #[test]
    fn test_property_type_is_not_resolved() {
        let props = parse_properties(&mapping("owner:\n  type: NoSuchType\n")).unwrap();
        assert_eq!(props["owner"].ty, "NoSuchType");
    }

    #[test]
    fn test_unknown_property_field() {
        let err = parse_properties(&mapping("name:\n  minLenght: 2\n")).unwrap_err();
        assert!(matches!(err, AppError::InvalidDeclaration { ref name, .. } if name == "name"));
    }

    #[test]
    fn test_non_mapping_declaration() {
        let err = parse_properties(&mapping("tags: [a, b]\n")).unwrap_err();
        assert!(matches!(err, AppError::InvalidDeclaration { .. }));
    }
}
