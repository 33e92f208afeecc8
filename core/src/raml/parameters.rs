//! # Parameter Model
//!
//! Validated records for the parts of a method: named parameters (URI, query, form,
//! header), request/response bodies and responses. Each record is decoded from its raw
//! declaration with a fixed field set, then checked by [`crate::raml::validate`] when the
//! configuration asks for it.

use crate::config::ParserConfig;
use crate::error::{AppError, AppResult};
use crate::raml::content::Content;
use crate::raml::payload::load_schema;
use crate::raml::validate;
use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use std::fmt;

/// Where a named parameter lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterLocation {
    /// `uriParameters`, e.g. `id` in `/foo/{id}`.
    Uri,
    /// `queryParameters`, e.g. `baz` in `/foo/bar?baz=123`.
    Query,
    /// `formParameters` of a form body.
    Form,
    /// `headers`.
    Header,
}

impl ParameterLocation {
    /// `required` when the declaration says nothing. Only URI parameters default to required.
    pub fn default_required(self) -> bool {
        matches!(self, ParameterLocation::Uri)
    }

    /// RAML key of the section holding parameters of this location.
    pub fn section_key(self) -> &'static str {
        match self {
            ParameterLocation::Uri => "uriParameters",
            ParameterLocation::Query => "queryParameters",
            ParameterLocation::Form => "formParameters",
            ParameterLocation::Header => "headers",
        }
    }
}

impl fmt::Display for ParameterLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParameterLocation::Uri => "URI parameters",
            ParameterLocation::Query => "query parameters",
            ParameterLocation::Form => "form parameters",
            ParameterLocation::Header => "headers",
        };
        f.write_str(name)
    }
}

/// A URI, query or form parameter, or a header.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedParameter {
    /// Parameter name.
    pub name: String,
    /// Where the parameter lives.
    pub location: ParameterLocation,
    /// The declaration as written.
    pub raw: Value,
    /// `displayName`, defaulting to `name`.
    pub display_name: String,
    /// Description.
    pub description: Option<Content>,
    /// Primitive type, defaulting to `string`.
    pub ty: String,
    /// Whether the parameter must be sent.
    pub required: bool,
    /// Default value.
    pub default: Option<Value>,
    /// Example value.
    pub example: Option<Value>,
    /// Allowed values.
    pub enum_values: Option<Vec<Value>>,
    /// Regular expression string values must match.
    pub pattern: Option<String>,
    /// Minimum string length.
    pub min_length: Option<u64>,
    /// Maximum string length.
    pub max_length: Option<u64>,
    /// Minimum numeric value.
    pub minimum: Option<f64>,
    /// Maximum numeric value.
    pub maximum: Option<f64>,
    /// Whether the parameter may be repeated.
    pub repeat: bool,
    /// HTTP method the header belongs to (headers only).
    pub method: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct NamedParameterFields {
    display_name: Option<String>,
    description: Option<Content>,
    #[serde(rename = "type")]
    ty: Option<String>,
    #[serde(rename = "enum")]
    enum_values: Option<Vec<Value>>,
    pattern: Option<String>,
    min_length: Option<u64>,
    max_length: Option<u64>,
    minimum: Option<f64>,
    maximum: Option<f64>,
    example: Option<Value>,
    default: Option<Value>,
    required: Option<bool>,
    repeat: Option<bool>,
}

impl NamedParameter {
    /// Decodes and validates one parameter declaration.
    ///
    /// `raw` may be a full declaration, a bare type name, or empty.
    pub fn parse(
        location: ParameterLocation,
        name: &str,
        raw: &Value,
        method: Option<&str>,
        config: &ParserConfig,
    ) -> AppResult<Self> {
        let fields = match raw {
            Value::Null => NamedParameterFields::default(),
            Value::String(ty) => NamedParameterFields {
                ty: Some(ty.clone()),
                ..NamedParameterFields::default()
            },
            Value::Mapping(_) => serde_yaml::from_value(raw.clone())
                .map_err(|e| AppError::invalid_declaration(name, e))?,
            other => {
                return Err(AppError::invalid_declaration(
                    name,
                    format!("expected a parameter declaration, found {:?}", other),
                ))
            }
        };

        let param = NamedParameter {
            name: name.to_string(),
            location,
            raw: raw.clone(),
            display_name: fields.display_name.unwrap_or_else(|| name.to_string()),
            description: fields.description,
            ty: fields.ty.unwrap_or_else(|| "string".to_string()),
            required: fields.required.unwrap_or(location.default_required()),
            default: fields.default,
            example: fields.example,
            enum_values: fields.enum_values,
            pattern: fields.pattern,
            min_length: fields.min_length,
            max_length: fields.max_length,
            minimum: fields.minimum,
            maximum: fields.maximum,
            repeat: fields.repeat.unwrap_or(false),
            method: match location {
                ParameterLocation::Header => method.map(str::to_string),
                _ => None,
            },
        };

        if config.validate {
            validate::named_parameter(&param)?;
        }
        Ok(param)
    }

    /// URI parameter.
    pub fn uri(name: &str, raw: &Value, config: &ParserConfig) -> AppResult<Self> {
        Self::parse(ParameterLocation::Uri, name, raw, None, config)
    }

    /// Query parameter.
    pub fn query(name: &str, raw: &Value, config: &ParserConfig) -> AppResult<Self> {
        Self::parse(ParameterLocation::Query, name, raw, None, config)
    }

    /// Form parameter.
    pub fn form(name: &str, raw: &Value, config: &ParserConfig) -> AppResult<Self> {
        Self::parse(ParameterLocation::Form, name, raw, None, config)
    }

    /// Header, optionally tied to an HTTP method.
    pub fn header(
        name: &str,
        raw: &Value,
        method: Option<&str>,
        config: &ParserConfig,
    ) -> AppResult<Self> {
        Self::parse(ParameterLocation::Header, name, raw, method, config)
    }

    /// The URI parameter assumed for a `{placeholder}` nobody declared.
    pub fn implicit_uri(name: &str) -> Self {
        NamedParameter {
            name: name.to_string(),
            location: ParameterLocation::Uri,
            raw: Value::Null,
            display_name: name.to_string(),
            description: None,
            ty: "string".to_string(),
            required: true,
            default: None,
            example: None,
            enum_values: None,
            pattern: None,
            min_length: None,
            max_length: None,
            minimum: None,
            maximum: None,
            repeat: false,
            method: None,
        }
    }
}

/// Decodes a parameter section (`name -> declaration`). An empty section yields no parameters.
pub fn parse_named_parameters(
    location: ParameterLocation,
    section: &Value,
    method: Option<&str>,
    config: &ParserConfig,
) -> AppResult<Vec<NamedParameter>> {
    let entries = match section {
        Value::Null => return Ok(Vec::new()),
        Value::Mapping(m) => m,
        other => {
            return Err(AppError::invalid_declaration(
                location.section_key(),
                format!("expected a mapping, found {:?}", other),
            ))
        }
    };

    entries
        .iter()
        .map(|(key, raw)| {
            let name = scalar_key(key, location.section_key())?;
            NamedParameter::parse(location, &name, raw, method, config)
        })
        .collect()
}

/// Body of a request or response.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    /// Media type of the body.
    pub mime_type: String,
    /// The declaration as written.
    pub raw: Value,
    /// Description.
    pub description: Option<Content>,
    /// `type` of a RAML 1.0 body, kept as the declared name.
    pub ty: Option<String>,
    /// Schema, decoded when it holds JSON or XML.
    pub schema: Option<Value>,
    /// Example payload, decoded like `schema`.
    pub example: Option<Value>,
    /// Form parameters, for form media types only.
    pub form_params: Option<Vec<NamedParameter>>,
}

#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct BodyFields {
    description: Option<Content>,
    #[serde(rename = "type")]
    ty: Option<String>,
    schema: Option<Value>,
    example: Option<Value>,
    form_parameters: Option<Value>,
}

impl Body {
    /// Decodes and validates the body declared for `mime_type`.
    pub fn parse(mime_type: &str, raw: &Value, config: &ParserConfig) -> AppResult<Self> {
        let fields: BodyFields = match raw {
            Value::Null => BodyFields::default(),
            Value::String(ty) => BodyFields {
                ty: Some(ty.clone()),
                ..BodyFields::default()
            },
            _ => serde_yaml::from_value(raw.clone())
                .map_err(|e| AppError::invalid_declaration(mime_type, e))?,
        };

        let form_params = fields
            .form_parameters
            .as_ref()
            .map(|section| {
                parse_named_parameters(ParameterLocation::Form, section, None, config)
            })
            .transpose()?;

        let body = Body {
            mime_type: mime_type.to_string(),
            raw: raw.clone(),
            description: fields.description,
            ty: fields.ty,
            schema: fields.schema.map(load_schema),
            example: fields.example.map(load_schema),
            form_params,
        };

        if config.validate {
            body.validate(config)?;
        }
        Ok(body)
    }

    /// Runs the body validators.
    pub fn validate(&self, config: &ParserConfig) -> AppResult<()> {
        validate::body_mime_type(&self.mime_type, config)?;
        validate::body_schema(&self.mime_type, self.schema.as_ref())?;
        validate::body_example(&self.mime_type, self.example.as_ref())?;
        validate::body_form(&self.mime_type, self.form_params.as_deref())
    }
}

/// Decodes a `body:` section.
///
/// The section is either keyed by media type, or is itself a single body declaration that
/// takes `default_media_type` (the root `mediaType`).
pub fn parse_bodies(
    section: &Value,
    default_media_type: Option<&str>,
    config: &ParserConfig,
) -> AppResult<Vec<Body>> {
    let entries = match section {
        Value::Null => return Ok(Vec::new()),
        Value::Mapping(m) => m,
        other => {
            return Err(AppError::invalid_declaration(
                "body",
                format!("expected a mapping, found {:?}", other),
            ))
        }
    };

    if !entries.is_empty() && !keyed_by_media_type(entries) {
        let mime_type = default_media_type.ok_or_else(|| {
            AppError::invalid_field(
                "body",
                "<no media type>",
                "body has no media type and the document declares no mediaType",
            )
        })?;
        return Ok(vec![Body::parse(mime_type, section, config)?]);
    }

    entries
        .iter()
        .map(|(key, raw)| {
            let mime_type = scalar_key(key, "body")?;
            Body::parse(&mime_type, raw, config)
        })
        .collect()
}

fn keyed_by_media_type(entries: &Mapping) -> bool {
    entries
        .keys()
        .all(|k| k.as_str().is_some_and(|s| s.contains('/')))
}

/// Expected response of a method.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    /// HTTP status code.
    pub code: u16,
    /// The declaration as written.
    pub raw: Value,
    /// Description.
    pub description: Option<Content>,
    /// Response headers.
    pub headers: Vec<NamedParameter>,
    /// Response bodies.
    pub body: Vec<Body>,
    /// HTTP method of the request this responds to.
    pub method: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct ResponseFields {
    description: Option<Content>,
    headers: Option<Value>,
    body: Option<Value>,
}

impl Response {
    /// Decodes and validates the response declared under `code`.
    pub fn parse(
        code: &Value,
        raw: &Value,
        method: Option<&str>,
        default_media_type: Option<&str>,
        config: &ParserConfig,
    ) -> AppResult<Self> {
        let code = response_code(code)?;
        if config.validate {
            validate::response_code(code, config)?;
        }

        let fields: ResponseFields = match raw {
            Value::Null => ResponseFields::default(),
            _ => serde_yaml::from_value(raw.clone())
                .map_err(|e| AppError::invalid_declaration(code.to_string(), e))?,
        };

        let headers = match &fields.headers {
            Some(section) => {
                parse_named_parameters(ParameterLocation::Header, section, method, config)?
            }
            None => Vec::new(),
        };
        let body = match &fields.body {
            Some(section) => parse_bodies(section, default_media_type, config)?,
            None => Vec::new(),
        };

        Ok(Response {
            code,
            raw: raw.clone(),
            description: fields.description,
            headers,
            body,
            method: method.map(str::to_string),
        })
    }
}

/// Decodes a `responses:` section (`code -> declaration`).
pub fn parse_responses(
    section: &Value,
    method: Option<&str>,
    default_media_type: Option<&str>,
    config: &ParserConfig,
) -> AppResult<Vec<Response>> {
    match section {
        Value::Null => Ok(Vec::new()),
        Value::Mapping(m) => m
            .iter()
            .map(|(code, raw)| Response::parse(code, raw, method, default_media_type, config))
            .collect(),
        other => Err(AppError::invalid_declaration(
            "responses",
            format!("expected a mapping, found {:?}", other),
        )),
    }
}

fn response_code(key: &Value) -> AppResult<u16> {
    let parsed = match key {
        Value::Number(n) => n.as_u64().and_then(|c| u16::try_from(c).ok()),
        Value::String(s) => s.trim().parse::<u16>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| {
        AppError::invalid_field("code", render_scalar(key), "response code must be an integer")
    })
}

pub(crate) fn scalar_key(key: &Value, section: &str) -> AppResult<String> {
    match key {
        Value::String(_) | Value::Number(_) | Value::Bool(_) => Ok(render_scalar(key)),
        other => Err(AppError::invalid_declaration(
            section,
            format!("keys must be scalars, found {:?}", other),
        )),
    }
}

pub(crate) fn render_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        other => format!("{:?}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(text: &str) -> Value {
        serde_yaml::from_str(text).unwrap()
    }

    #[test]
    fn test_location_defaults() {
        let cfg = ParserConfig::default();
        let uri = NamedParameter::uri("id", &Value::Null, &cfg).unwrap();
        assert!(uri.required);
        assert_eq!(uri.ty, "string");
        assert_eq!(uri.display_name, "id");

        let query = NamedParameter::query("page", &yaml("type: integer\n"), &cfg).unwrap();
        assert!(!query.required);
        assert_eq!(query.ty, "integer");
        assert!(query.method.is_none());
    }

    #[test]
    fn test_header_keeps_method() {
        let cfg = ParserConfig::default();
        let header = NamedParameter::header(
            "X-Token",
            &yaml("displayName: Token\nrequired: true\n"),
            Some("get"),
            &cfg,
        )
        .unwrap();
        assert_eq!(header.method.as_deref(), Some("get"));
        assert_eq!(header.display_name, "Token");
        assert!(header.required);
    }

    #[test]
    fn test_header_file_type_rejected() {
        let cfg = ParserConfig::default();
        let err =
            NamedParameter::header("X-Upload", &yaml("type: file\n"), None, &cfg).unwrap_err();
        assert!(matches!(err, AppError::InvalidField { ref field, .. } if field == "type"));

        // Validation off: the record is built anyway.
        let lenient = ParserConfig::lenient();
        let header =
            NamedParameter::header("X-Upload", &yaml("type: file\n"), None, &lenient).unwrap();
        assert_eq!(header.ty, "file");
    }

    #[test]
    fn test_unknown_parameter_field() {
        let cfg = ParserConfig::default();
        let err = NamedParameter::query("q", &yaml("colour: red\n"), &cfg).unwrap_err();
        assert!(matches!(err, AppError::InvalidDeclaration { ref name, .. } if name == "q"));
    }

    #[test]
    fn test_parameter_section() {
        let cfg = ParserConfig::default();
        let section = yaml("page:\n  type: integer\n  minimum: 1\nsort: string\n");
        let params =
            parse_named_parameters(ParameterLocation::Query, &section, None, &cfg).unwrap();
        assert_eq!(params.len(), 2);
        assert_eq!(params[0].name, "page");
        assert_eq!(params[0].minimum, Some(1.0));
        assert_eq!(params[1].ty, "string");
    }

    #[test]
    fn test_json_body_schema_is_decoded() {
        let cfg = ParserConfig::default();
        let body = Body::parse(
            "application/json",
            &yaml("schema: '{\"type\": \"object\"}'\nexample: '{}'\n"),
            &cfg,
        )
        .unwrap();
        let schema = body.schema.unwrap();
        assert_eq!(schema.get("type").and_then(Value::as_str), Some("object"));
        assert!(body.form_params.is_none());
    }

    #[test]
    fn test_body_example_and_xml_schema_are_decoded() {
        let cfg = ParserConfig::default();
        let body = Body::parse(
            "application/json",
            &yaml("schema: '<xs:schema/>'\nexample: '{\"a\": 1}'\n"),
            &cfg,
        )
        .unwrap();
        let schema = body.schema.unwrap();
        assert!(schema.get("xs:schema").is_some());
        let example = body.example.unwrap();
        assert_eq!(example.get("a").and_then(Value::as_u64), Some(1));
    }

    #[test]
    fn test_form_body_requires_form_parameters() {
        let cfg = ParserConfig::default();
        let err = Body::parse("multipart/form-data", &yaml("schema: '{}'\n"), &cfg).unwrap_err();
        assert!(matches!(err, AppError::InvalidField { ref field, .. } if field == "schema"));

        let err = Body::parse("multipart/form-data", &Value::Null, &cfg).unwrap_err();
        assert!(matches!(
            err,
            AppError::InvalidField { ref field, .. } if field == "formParameters"
        ));

        let body = Body::parse(
            "multipart/form-data",
            &yaml("formParameters:\n  file:\n    type: file\n"),
            &cfg,
        )
        .unwrap();
        let params = body.form_params.unwrap();
        assert_eq!(params[0].location, ParameterLocation::Form);
        assert_eq!(params[0].ty, "file");
    }

    #[test]
    fn test_bodies_without_media_type_keys() {
        let cfg = ParserConfig::default();
        let section = yaml("schema: '{}'\n");
        let bodies = parse_bodies(&section, Some("application/json"), &cfg).unwrap();
        assert_eq!(bodies.len(), 1);
        assert_eq!(bodies[0].mime_type, "application/json");

        assert!(parse_bodies(&section, None, &cfg).is_err());
    }

    #[test]
    fn test_response() {
        let cfg = ParserConfig::default();
        let raw = yaml(
            "description: Found\nheaders:\n  X-Rate: integer\nbody:\n  application/json:\n    example: '{}'\n",
        );
        let resp = Response::parse(&yaml("200"), &raw, Some("get"), None, &cfg).unwrap();
        assert_eq!(resp.code, 200);
        assert_eq!(resp.method.as_deref(), Some("get"));
        assert_eq!(resp.description.as_ref().map(Content::raw), Some("Found"));
        assert_eq!(resp.headers[0].method.as_deref(), Some("get"));
        assert_eq!(resp.body[0].mime_type, "application/json");
    }

    #[test]
    fn test_response_codes() {
        let cfg = ParserConfig::default();
        let ok = Response::parse(&Value::String("404".into()), &Value::Null, None, None, &cfg);
        assert_eq!(ok.unwrap().code, 404);

        let err = Response::parse(&yaml("299"), &Value::Null, None, None, &cfg).unwrap_err();
        assert!(matches!(err, AppError::InvalidField { ref value, .. } if value == "299"));

        let err = Response::parse(&yaml("abc"), &Value::Null, None, None, &cfg).unwrap_err();
        assert!(matches!(err, AppError::InvalidField { ref field, .. } if field == "code"));
    }
}
