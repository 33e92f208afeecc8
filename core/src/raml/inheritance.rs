//! # Resource-Type Attribute Inheritance
//!
//! Decides the effective value of one attribute (`description`, `headers`, `body`, ...) of a
//! resource method: the resource's own declaration wins; otherwise the value comes from the
//! assigned template, but only when that template was declared for the same method. Whole
//! attributes are replaced, never merged.

use crate::raml::resource_types::ResourceType;
use serde_yaml::Value;

/// Outcome of reading `node[method][attribute]` off a raw resource node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeLookup<'a> {
    /// Explicitly declared.
    Present(&'a Value),
    /// Method or attribute not declared (or declared empty).
    Absent,
    /// Something on the path is not a mapping. Handled exactly like `Absent`.
    Malformed,
}

/// Reads `node[method][attribute]`.
pub fn lookup_node_attribute<'a>(node: &'a Value, method: &str, attribute: &str) -> NodeLookup<'a> {
    let Value::Mapping(node) = node else {
        return match node {
            Value::Null => NodeLookup::Absent,
            _ => NodeLookup::Malformed,
        };
    };
    match node.get(method) {
        None | Some(Value::Null) => NodeLookup::Absent,
        Some(Value::Mapping(declared)) => match declared.get(attribute) {
            None | Some(Value::Null) => NodeLookup::Absent,
            Some(value) => NodeLookup::Present(value),
        },
        Some(_) => NodeLookup::Malformed,
    }
}

/// Effective value of `attribute` for `method` on `node`, given the inherited template.
pub fn resolve_attribute<'a>(
    inherited: Option<&'a ResourceType>,
    node: &'a Value,
    method: &str,
    attribute: &str,
) -> Option<&'a Value> {
    match lookup_node_attribute(node, method, attribute) {
        NodeLookup::Present(value) => return Some(value),
        NodeLookup::Absent => {}
        NodeLookup::Malformed => {
            tracing::debug!(method, attribute, "malformed method declaration, using template");
        }
    }

    let template = inherited?;
    if template.method.as_deref() != Some(method) {
        return None;
    }
    let value = template.attribute(attribute);
    if value.is_some() {
        tracing::debug!(
            resource_type = %template.name,
            method,
            attribute,
            "inheriting attribute from resource type"
        );
    }
    value
}

/// First template named `name`.
pub fn find_resource_type<'a>(
    resource_types: &'a [ResourceType],
    name: &str,
) -> Option<&'a ResourceType> {
    resource_types.iter().find(|t| t.name == name)
}

/// First template named `name` declared for `method`.
pub fn find_resource_type_for_method<'a>(
    resource_types: &'a [ResourceType],
    name: &str,
    method: &str,
) -> Option<&'a ResourceType> {
    resource_types
        .iter()
        .find(|t| t.name == name && t.method.as_deref() == Some(method))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParserConfig;
    use crate::raml::resource_types::parse_resource_types;

    fn yaml(text: &str) -> Value {
        serde_yaml::from_str(text).unwrap()
    }

    fn templates(text: &str) -> Vec<ResourceType> {
        parse_resource_types(&yaml(text), &ParserConfig::default()).unwrap()
    }

    #[test]
    fn test_explicit_value_wins() {
        let types = templates("base:\n  get:\n    description: B\n");
        let node = yaml("get:\n  description: A\n");
        let value = resolve_attribute(types.first(), &node, "get", "description");
        assert_eq!(value.and_then(Value::as_str), Some("A"));
    }

    #[test]
    fn test_falls_back_to_template() {
        let types = templates("base:\n  get:\n    description: B\n");
        let node = yaml("displayName: Items\n");
        let value = resolve_attribute(types.first(), &node, "get", "description");
        assert_eq!(value.and_then(Value::as_str), Some("B"));
    }

    #[test]
    fn test_method_mismatch_is_absent() {
        let types = templates("base:\n  get:\n    description: B\n");
        let node = yaml("displayName: Items\n");
        assert!(resolve_attribute(types.first(), &node, "post", "description").is_none());
    }

    #[test]
    fn test_missing_attribute_under_declared_method_falls_back() {
        let types = templates("base:\n  get:\n    headers:\n      X-Trace: {}\n");
        let node = yaml("get:\n  description: mine\n");
        let value = resolve_attribute(types.first(), &node, "get", "headers");
        assert!(value.is_some_and(Value::is_mapping));
    }

    #[test]
    fn test_malformed_node_is_treated_as_absent() {
        let types = templates("base:\n  get:\n    description: B\n");
        let node = yaml("get: just a string\n");
        assert_eq!(
            lookup_node_attribute(&node, "get", "description"),
            NodeLookup::Malformed
        );
        let value = resolve_attribute(types.first(), &node, "get", "description");
        assert_eq!(value.and_then(Value::as_str), Some("B"));

        let scalar_node = yaml("42");
        let value = resolve_attribute(types.first(), &scalar_node, "get", "description");
        assert_eq!(value.and_then(Value::as_str), Some("B"));
    }

    #[test]
    fn test_no_template() {
        let node = yaml("get: {}\n");
        assert_eq!(lookup_node_attribute(&node, "get", "body"), NodeLookup::Absent);
        assert!(resolve_attribute(None, &node, "get", "body").is_none());
    }

    #[test]
    fn test_lookup_by_name() {
        let types = templates(
            "- a:\n    get: {}\n    post: {}\n- b:\n    put: {}\n- a:\n    delete: {}\n",
        );
        let first = find_resource_type(&types, "a").unwrap();
        assert_eq!(first.method.as_deref(), Some("get"));
        assert!(find_resource_type(&types, "missing").is_none());

        let delete = find_resource_type_for_method(&types, "a", "delete").unwrap();
        assert_eq!(delete.method.as_deref(), Some("delete"));
        assert!(find_resource_type_for_method(&types, "b", "get").is_none());
    }
}
