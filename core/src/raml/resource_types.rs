//! # Resource Types
//!
//! Parses the `resourceTypes:` section into method-scoped templates. A template declaring
//! `get` and `post` yields two [`ResourceType`] entries sharing a name; one declaring no
//! method yields a single entry with `method == None`.

use crate::config::ParserConfig;
use crate::error::{AppError, AppResult};
use crate::raml::content::Content;
use crate::raml::parameters::scalar_key;
use serde_yaml::{Mapping, Value};

/// A resource-type template, scoped to one HTTP method.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceType {
    /// Template name.
    pub name: String,
    /// Method this entry describes, lower-case.
    pub method: Option<String>,
    /// Declared as `get?`: applies only where the resource declares the method itself.
    pub optional: bool,
    /// `displayName`, defaulting to `name`.
    pub display_name: String,
    /// Method description, falling back to the template description.
    pub description: Option<Content>,
    /// `usage`.
    pub usage: Option<String>,
    /// Method-level declaration.
    pub method_raw: Mapping,
    /// Template-level keys other than methods.
    pub shared: Mapping,
    /// The whole template declaration as written.
    pub raw: Value,
}

impl ResourceType {
    /// Reads `attribute` off the template: method-level first, then template-level.
    pub fn attribute(&self, attribute: &str) -> Option<&Value> {
        self.method_raw
            .get(attribute)
            .or_else(|| self.shared.get(attribute))
            .filter(|v| !v.is_null())
    }
}

/// Parses a `resourceTypes:` section. Accepts the RAML 0.8 list of single-key maps and the
/// RAML 1.0 mapping form.
pub fn parse_resource_types(
    section: &Value,
    config: &ParserConfig,
) -> AppResult<Vec<ResourceType>> {
    let mut out = Vec::new();
    match section {
        Value::Null => {}
        Value::Mapping(m) => collect_templates(m, config, &mut out)?,
        Value::Sequence(items) => {
            for item in items {
                match item {
                    Value::Mapping(m) => collect_templates(m, config, &mut out)?,
                    other => {
                        return Err(AppError::invalid_declaration(
                            "resourceTypes",
                            format!("expected a mapping, found {:?}", other),
                        ))
                    }
                }
            }
        }
        other => {
            return Err(AppError::invalid_declaration(
                "resourceTypes",
                format!("expected a mapping or a list, found {:?}", other),
            ))
        }
    }
    Ok(out)
}

fn collect_templates(
    templates: &Mapping,
    config: &ParserConfig,
    out: &mut Vec<ResourceType>,
) -> AppResult<()> {
    for (key, decl) in templates {
        let name = scalar_key(key, "resourceTypes")?;
        out.extend(parse_template(&name, decl, config)?);
    }
    Ok(())
}

fn parse_template(name: &str, decl: &Value, config: &ParserConfig) -> AppResult<Vec<ResourceType>> {
    let decl_map = match decl {
        Value::Null => Mapping::new(),
        Value::Mapping(m) => m.clone(),
        other => {
            return Err(AppError::invalid_declaration(
                name,
                format!("expected a resource type declaration, found {:?}", other),
            ))
        }
    };

    let mut shared = Mapping::new();
    let mut methods = Vec::new();
    for (key, value) in &decl_map {
        let key_str = key.as_str().unwrap_or_default();
        let method = key_str.trim_end_matches('?');
        if config.is_http_method(method) {
            methods.push((method.to_string(), key_str.ends_with('?'), value));
        } else {
            shared.insert(key.clone(), value.clone());
        }
    }

    let display_name = shared
        .get("displayName")
        .and_then(Value::as_str)
        .unwrap_or(name)
        .to_string();
    let usage = shared.get("usage").and_then(Value::as_str).map(str::to_string);
    let shared_description = shared
        .get("description")
        .and_then(Value::as_str)
        .map(Content::from);

    if methods.is_empty() {
        tracing::debug!(resource_type = name, "resource type declares no methods");
        return Ok(vec![ResourceType {
            name: name.to_string(),
            method: None,
            optional: false,
            display_name,
            description: shared_description,
            usage,
            method_raw: Mapping::new(),
            shared,
            raw: decl.clone(),
        }]);
    }

    methods
        .into_iter()
        .map(|(method, optional, value)| {
            let method_raw = match value {
                Value::Null => Mapping::new(),
                Value::Mapping(m) => m.clone(),
                other => {
                    return Err(AppError::invalid_declaration(
                        format!("{}.{}", name, method),
                        format!("expected a method declaration, found {:?}", other),
                    ))
                }
            };
            let description = method_raw
                .get("description")
                .and_then(Value::as_str)
                .map(Content::from)
                .or_else(|| shared_description.clone());
            Ok(ResourceType {
                name: name.to_string(),
                method: Some(method),
                optional,
                display_name: display_name.clone(),
                description,
                usage: usage.clone(),
                method_raw,
                shared: shared.clone(),
                raw: decl.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(text: &str) -> Value {
        serde_yaml::from_str(text).unwrap()
    }

    #[test]
    fn test_one_entry_per_method() {
        let section = yaml(
            "- collection:\n    description: A list\n    usage: for lists\n    get:\n      description: Fetch all\n    post?:\n      body: {}\n",
        );
        let types = parse_resource_types(&section, &ParserConfig::default()).unwrap();
        assert_eq!(types.len(), 2);

        let get = &types[0];
        assert_eq!(get.name, "collection");
        assert_eq!(get.method.as_deref(), Some("get"));
        assert!(!get.optional);
        assert_eq!(get.description.as_ref().map(Content::raw), Some("Fetch all"));
        assert_eq!(get.usage.as_deref(), Some("for lists"));

        let post = &types[1];
        assert_eq!(post.method.as_deref(), Some("post"));
        assert!(post.optional);
        assert_eq!(post.description.as_ref().map(Content::raw), Some("A list"));
    }

    #[test]
    fn test_mapping_form_and_methodless_template() {
        let section = yaml("member:\n  uriParameters:\n    id: integer\nbare:\n");
        let types = parse_resource_types(&section, &ParserConfig::default()).unwrap();
        assert_eq!(types.len(), 2);
        assert!(types.iter().all(|t| t.method.is_none()));
        assert!(types[0].attribute("uriParameters").is_some());
        assert_eq!(types[1].display_name, "bare");
    }

    #[test]
    fn test_attribute_prefers_method_level() {
        let section = yaml("item:\n  description: shared\n  get:\n    description: own\n");
        let types = parse_resource_types(&section, &ParserConfig::default()).unwrap();
        assert_eq!(
            types[0].attribute("description").and_then(Value::as_str),
            Some("own")
        );
        assert!(types[0].attribute("headers").is_none());
    }

    #[test]
    fn test_bad_method_declaration() {
        let section = yaml("item:\n  get: nope\n");
        assert!(parse_resource_types(&section, &ParserConfig::default()).is_err());
    }
}
