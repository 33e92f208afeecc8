//! # Resources
//!
//! Walks the `/path` keys of a document and builds one [`Resource`] per (path, method).
//! Method attributes go through [`resolve_attribute`] against the template assigned with
//! `type:`, so what a resource declares itself always wins over what it inherits.

use crate::config::ParserConfig;
use crate::error::{AppError, AppResult};
use crate::raml::content::Content;
use crate::raml::inheritance::{
    find_resource_type, find_resource_type_for_method, lookup_node_attribute, resolve_attribute,
    NodeLookup,
};
use crate::raml::parameters::{
    parse_bodies, parse_named_parameters, parse_responses, render_scalar, Body, NamedParameter,
    ParameterLocation, Response,
};
use crate::raml::resource_types::ResourceType;
use crate::raml::validate;
use regex::Regex;
use serde_yaml::{Mapping, Value};
use std::sync::OnceLock;

/// A resource path, scoped to one method.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    /// Relative key as written, e.g. `/{id}`.
    pub name: String,
    /// Absolute path, e.g. `/users/{id}`.
    pub path: String,
    /// `baseUri` followed by `path`.
    pub absolute_uri: String,
    /// Absolute path of the enclosing resource.
    pub parent_path: Option<String>,
    /// HTTP method, `None` for a resource that declares none.
    pub method: Option<String>,
    /// `displayName`, defaulting to `name`.
    pub display_name: String,
    /// Method description, then the resource's own, then the template's.
    pub description: Option<Content>,
    /// Name of the assigned resource type.
    pub resource_type: Option<String>,
    /// Declared and implicit URI parameters, including those of enclosing resources.
    pub uri_params: Vec<NamedParameter>,
    /// Query parameters.
    pub query_params: Vec<NamedParameter>,
    /// Request headers.
    pub headers: Vec<NamedParameter>,
    /// Request bodies.
    pub body: Vec<Body>,
    /// Responses.
    pub responses: Vec<Response>,
    /// Protocols, defaulting to the document's.
    pub protocols: Vec<String>,
    /// The resource node as written.
    pub raw: Value,
}

/// Document-level inputs the resource walk needs.
#[derive(Debug, Clone, Copy)]
pub struct ResourceContext<'a> {
    /// Parser configuration.
    pub config: &'a ParserConfig,
    /// Parsed `resourceTypes`.
    pub resource_types: &'a [ResourceType],
    /// Root `baseUri`.
    pub base_uri: Option<&'a str>,
    /// Root `mediaType`, used by bodies not keyed by media type.
    pub media_type: Option<&'a str>,
    /// Root protocols.
    pub protocols: &'a [String],
}

/// Builds the resources declared at the top level of `root` and, recursively, below them.
pub fn parse_resources(root: &Mapping, ctx: &ResourceContext<'_>) -> AppResult<Vec<Resource>> {
    let mut out = Vec::new();
    walk(root, None, &[], ctx, &mut out)?;
    Ok(out)
}

fn walk(
    node: &Mapping,
    parent_path: Option<&str>,
    parent_uri_params: &[NamedParameter],
    ctx: &ResourceContext<'_>,
    out: &mut Vec<Resource>,
) -> AppResult<()> {
    for (key, child) in node {
        let Some(name) = key.as_str().filter(|k| k.starts_with('/')) else {
            continue;
        };
        let path = format!("{}{}", parent_path.unwrap_or_default(), name);
        let child = match child {
            Value::Null => Value::Mapping(Mapping::new()),
            Value::Mapping(_) => child.clone(),
            other => {
                return Err(AppError::invalid_declaration(
                    path,
                    format!("expected a resource declaration, found {:?}", other),
                ))
            }
        };

        let uri_params =
            build_resource(name, &path, parent_path, parent_uri_params, &child, ctx, out)?;
        if let Value::Mapping(children) = &child {
            walk(children, Some(&path), &uri_params, ctx, out)?;
        }
    }
    Ok(())
}

/// Builds every method of one resource node and returns the URI parameters in scope for its
/// children.
fn build_resource(
    name: &str,
    path: &str,
    parent_path: Option<&str>,
    parent_uri_params: &[NamedParameter],
    node: &Value,
    ctx: &ResourceContext<'_>,
    out: &mut Vec<Resource>,
) -> AppResult<Vec<NamedParameter>> {
    let config = ctx.config;
    let assigned = assigned_resource_type(node);
    if let Some(assigned) = assigned.as_deref() {
        if config.validate && find_resource_type(ctx.resource_types, assigned).is_none() {
            return Err(AppError::invalid_field(
                "type",
                assigned,
                format!("resource '{}' uses an undefined resource type", path),
            ));
        }
    }

    let template_any = assigned
        .as_deref()
        .and_then(|a| find_resource_type(ctx.resource_types, a));
    let uri_section = node
        .get("uriParameters")
        .filter(|v| !v.is_null())
        .or_else(|| template_any.and_then(|t| t.shared.get("uriParameters")));
    let mut uri_params = parent_uri_params.to_vec();
    if let Some(section) = uri_section {
        for param in parse_named_parameters(ParameterLocation::Uri, section, None, config)? {
            uri_params.retain(|p| p.name != param.name);
            uri_params.push(param);
        }
    }
    for placeholder in uri_placeholders(path) {
        if !uri_params.iter().any(|p| p.name == placeholder) {
            uri_params.push(NamedParameter::implicit_uri(&placeholder));
        }
    }

    let display_name = node
        .get("displayName")
        .and_then(Value::as_str)
        .unwrap_or(name)
        .to_string();
    let resource_description = node
        .get("description")
        .and_then(Value::as_str)
        .map(Content::from);
    let absolute_uri = format!("{}{}", ctx.base_uri.unwrap_or_default(), path);

    let methods = resource_methods(node, assigned.as_deref(), ctx);
    if methods.is_empty() {
        out.push(Resource {
            name: name.to_string(),
            path: path.to_string(),
            absolute_uri,
            parent_path: parent_path.map(str::to_string),
            method: None,
            display_name,
            description: resource_description,
            resource_type: assigned,
            uri_params: uri_params.clone(),
            query_params: Vec::new(),
            headers: Vec::new(),
            body: Vec::new(),
            responses: Vec::new(),
            protocols: ctx.protocols.to_vec(),
            raw: node.clone(),
        });
        return Ok(uri_params);
    }

    for method in methods {
        let template = assigned
            .as_deref()
            .and_then(|a| find_resource_type_for_method(ctx.resource_types, a, &method));
        let attribute = |attr: &str| resolve_attribute(template, node, &method, attr);

        let description = match lookup_node_attribute(node, &method, "description") {
            NodeLookup::Present(v) => Some(Content::new(render_scalar(v))),
            _ => resource_description.clone().or_else(|| {
                attribute("description").map(|v| Content::new(render_scalar(v)))
            }),
        };
        let headers = match attribute("headers") {
            Some(section) => {
                parse_named_parameters(ParameterLocation::Header, section, Some(&method), config)?
            }
            None => Vec::new(),
        };
        let query_params = match attribute("queryParameters") {
            Some(section) => {
                parse_named_parameters(ParameterLocation::Query, section, None, config)?
            }
            None => Vec::new(),
        };
        let body = match attribute("body") {
            Some(section) => parse_bodies(section, ctx.media_type, config)?,
            None => Vec::new(),
        };
        let responses = match attribute("responses") {
            Some(section) => parse_responses(section, Some(&method), ctx.media_type, config)?,
            None => Vec::new(),
        };
        let protocols = match attribute("protocols") {
            Some(Value::Sequence(items)) => {
                let declared: Vec<String> =
                    items.iter().map(|p| render_scalar(p).to_uppercase()).collect();
                if config.validate {
                    validate::protocols(&declared, config)?;
                }
                declared
            }
            _ => ctx.protocols.to_vec(),
        };

        out.push(Resource {
            name: name.to_string(),
            path: path.to_string(),
            absolute_uri: absolute_uri.clone(),
            parent_path: parent_path.map(str::to_string),
            method: Some(method.clone()),
            display_name: display_name.clone(),
            description,
            resource_type: assigned.clone(),
            uri_params: uri_params.clone(),
            query_params,
            headers,
            body,
            responses,
            protocols,
            raw: node.clone(),
        });
    }
    Ok(uri_params)
}

/// `type: name` or the parameterised `type: { name: {...} }`.
fn assigned_resource_type(node: &Value) -> Option<String> {
    match node.get("type")? {
        Value::String(name) => Some(name.clone()),
        Value::Mapping(m) => m.keys().next().and_then(Value::as_str).map(str::to_string),
        _ => None,
    }
}

/// Methods the node declares, then the non-optional methods of its template.
fn resource_methods(
    node: &Value,
    assigned: Option<&str>,
    ctx: &ResourceContext<'_>,
) -> Vec<String> {
    let mut methods: Vec<String> = node
        .as_mapping()
        .map(|m| {
            m.keys()
                .filter_map(Value::as_str)
                .filter(|k| ctx.config.is_http_method(k))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    if let Some(assigned) = assigned {
        for template in ctx.resource_types.iter().filter(|t| t.name == assigned) {
            if template.optional {
                continue;
            }
            if let Some(method) = &template.method {
                if !methods.contains(method) {
                    methods.push(method.clone());
                }
            }
        }
    }
    methods
}

/// Names of the `{placeholder}`s in `path`, in order of appearance.
pub fn uri_placeholders(path: &str) -> Vec<String> {
    static PLACEHOLDER_RE: OnceLock<Regex> = OnceLock::new();
    let re =
        PLACEHOLDER_RE.get_or_init(|| Regex::new(r"\{([^{}/]+)\}").expect("Invalid regex"));
    re.captures_iter(path)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
        .collect()
}
