//! # RAML Documents
//!
//! Entry point turning a decoded RAML document into a [`RamlRoot`]. Loading files and
//! resolving `!include`s happen before this; the input is the already-decoded tree.

use crate::config::ParserConfig;
use crate::error::{AppError, AppResult};
use crate::raml::content::Content;
use crate::raml::inheritance::find_resource_type;
use crate::raml::parameters::render_scalar;
use crate::raml::resource_types::{parse_resource_types, ResourceType};
use crate::raml::resources::{parse_resources, Resource, ResourceContext};
use crate::raml::types::{TypeDescriptor, TypeRegistry};
use crate::raml::validate;
use indexmap::IndexMap;
use serde_yaml::{Mapping, Value};
use url::Url;

/// Header line prefix every RAML document starts with.
pub const RAML_HEADER: &str = "#%RAML";

/// The parsed API.
#[derive(Debug, Clone, PartialEq)]
pub struct RamlRoot {
    /// Version from the `#%RAML` header, when parsed from text.
    pub raml_version: Option<String>,
    /// API title.
    pub title: String,
    /// API version.
    pub version: Option<String>,
    /// `baseUri`.
    pub base_uri: Option<String>,
    /// Protocols, declared or taken from the `baseUri` scheme.
    pub protocols: Vec<String>,
    /// Default media type of bodies.
    pub media_type: Option<String>,
    /// API description.
    pub description: Option<Content>,
    /// Declared custom types, in declaration order.
    pub types: IndexMap<String, TypeDescriptor>,
    /// Resource-type templates, one entry per declared method.
    pub resource_types: Vec<ResourceType>,
    /// Resources, one entry per path and method.
    pub resources: Vec<Resource>,
    /// The document as decoded.
    pub raw: Value,
}

impl RamlRoot {
    /// First resource type named `name`.
    pub fn find_resource_type(&self, name: &str) -> Option<&ResourceType> {
        find_resource_type(&self.resource_types, name)
    }
}

/// Parses RAML text: checks the `#%RAML` header, decodes the YAML and builds the model.
pub fn parse_raml_str(text: &str, config: &ParserConfig) -> AppResult<RamlRoot> {
    let raml_version = raml_header_version(text);
    if raml_version.is_none() && config.validate {
        let first_line = text.lines().next().unwrap_or_default();
        return Err(AppError::invalid_field(
            RAML_HEADER,
            first_line,
            "document must start with a '#%RAML <version>' line",
        ));
    }

    let raw: Value = serde_yaml::from_str(text)?;
    let mut root = parse_raml(&raw, config)?;
    root.raml_version = raml_version;
    Ok(root)
}

/// Builds the model from a decoded document, resolving types against the built-in kinds.
pub fn parse_raml(raw: &Value, config: &ParserConfig) -> AppResult<RamlRoot> {
    parse_raml_with_registry(raw, config, TypeRegistry::global())
}

/// Builds the model from a decoded document, resolving types against `registry`.
pub fn parse_raml_with_registry(
    raw: &Value,
    config: &ParserConfig,
    registry: &TypeRegistry,
) -> AppResult<RamlRoot> {
    let doc = raw.as_mapping().ok_or_else(|| {
        AppError::General("RAML document root must be a mapping".to_string())
    })?;

    let title = match doc.get("title").map(render_scalar) {
        Some(title) if !title.is_empty() => title,
        _ if config.validate => {
            return Err(AppError::invalid_field(
                "title",
                "",
                "RAML document must define a title",
            ))
        }
        _ => String::new(),
    };
    let version = doc.get("version").filter(|v| !v.is_null()).map(render_scalar);
    let base_uri = doc.get("baseUri").and_then(Value::as_str).map(str::to_string);

    let media_type = doc.get("mediaType").and_then(Value::as_str).map(str::to_string);
    if let (Some(mt), true) = (media_type.as_deref(), config.validate) {
        validate::media_type("mediaType", mt, config)?;
    }

    let protocols = root_protocols(doc, base_uri.as_deref());
    if config.validate {
        validate::protocols(&protocols, config)?;
    }

    let types = match doc.get("types") {
        None | Some(Value::Null) => IndexMap::new(),
        Some(Value::Mapping(section)) => registry.resolve_all(section)?,
        Some(other) => {
            return Err(AppError::invalid_declaration(
                "types",
                format!("expected a mapping, found {:?}", other),
            ))
        }
    };

    let resource_types = match doc.get("resourceTypes") {
        Some(section) => parse_resource_types(section, config)?,
        None => Vec::new(),
    };

    let ctx = ResourceContext {
        config,
        resource_types: &resource_types,
        base_uri: base_uri.as_deref(),
        media_type: media_type.as_deref(),
        protocols: &protocols,
    };
    let resources = parse_resources(doc, &ctx)?;
    tracing::debug!(
        title = %title,
        types = types.len(),
        resource_types = resource_types.len(),
        resources = resources.len(),
        "parsed RAML document"
    );

    Ok(RamlRoot {
        raml_version: None,
        title,
        version,
        base_uri,
        protocols,
        media_type,
        description: doc
            .get("description")
            .and_then(Value::as_str)
            .map(Content::from),
        types,
        resource_types,
        resources,
        raw: raw.clone(),
    })
}

/// Version following `#%RAML` on the first line.
pub fn raml_header_version(text: &str) -> Option<String> {
    let first = text.lines().next()?.trim();
    let version = first.strip_prefix(RAML_HEADER)?.trim();
    if version.is_empty() {
        None
    } else {
        Some(version.to_string())
    }
}

/// Declared `protocols`, or the scheme of `baseUri` upper-cased.
fn root_protocols(doc: &Mapping, base_uri: Option<&str>) -> Vec<String> {
    if let Some(Value::Sequence(items)) = doc.get("protocols") {
        return items.iter().map(|p| render_scalar(p).to_uppercase()).collect();
    }
    let Some(base_uri) = base_uri else {
        return Vec::new();
    };
    let scheme = match Url::parse(base_uri) {
        Ok(url) => Some(url.scheme().to_string()),
        Err(e) => {
            tracing::warn!(base_uri, error = %e, "baseUri is not an absolute URI");
            base_uri.split_once("://").map(|(scheme, _)| scheme.to_string())
        }
    };
    scheme.map(|s| vec![s.to_uppercase()]).unwrap_or_default()
}
