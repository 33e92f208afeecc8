//! # Field Validators
//!
//! Per-field checks the record constructors call out to. Each returns `Ok(())` or an
//! [`AppError::InvalidField`] naming the field and value. Callers skip them entirely when
//! `ParserConfig::validate` is off.

use crate::config::ParserConfig;
use crate::error::{AppError, AppResult};
use crate::raml::parameters::{NamedParameter, ParameterLocation};
use regex::Regex;
use serde_yaml::Value;
use std::sync::OnceLock;

/// Types a named parameter may declare.
pub const NAMED_PARAMETER_TYPES: [&str; 6] =
    ["string", "number", "integer", "date", "boolean", "file"];

/// MIME types whose bodies are described by `formParameters`.
pub const FORM_MIME_TYPES: [&str; 2] = ["multipart/form-data", "application/x-www-form-urlencoded"];

/// Whether `mime_type` is one of [`FORM_MIME_TYPES`].
pub fn is_form_mime_type(mime_type: &str) -> bool {
    FORM_MIME_TYPES.contains(&mime_type)
}

/// `type` of a named parameter. `file` is only meaningful for form parameters.
pub fn parameter_type(location: ParameterLocation, ty: &str) -> AppResult<()> {
    if !NAMED_PARAMETER_TYPES.contains(&ty) {
        return Err(AppError::invalid_field(
            "type",
            ty,
            format!("expected one of {}", NAMED_PARAMETER_TYPES.join(", ")),
        ));
    }
    if ty == "file" && location != ParameterLocation::Form {
        return Err(AppError::invalid_field(
            "type",
            ty,
            format!("'file' is only allowed for form parameters, not {}", location),
        ));
    }
    Ok(())
}

/// `pattern` must compile.
pub fn pattern(pattern: &str) -> AppResult<()> {
    Regex::new(pattern)
        .map(|_| ())
        .map_err(|e| AppError::invalid_field("pattern", pattern, e.to_string()))
}

/// `enum` must list at least one value.
pub fn enum_values(values: &[Value]) -> AppResult<()> {
    if values.is_empty() {
        return Err(AppError::invalid_field(
            "enum",
            "[]",
            "enum must contain at least one value",
        ));
    }
    Ok(())
}

/// `minLength` must not exceed `maxLength`.
pub fn length_bounds(min: Option<u64>, max: Option<u64>) -> AppResult<()> {
    match (min, max) {
        (Some(min), Some(max)) if min > max => Err(AppError::invalid_field(
            "minLength",
            min,
            format!("greater than maxLength ({})", max),
        )),
        _ => Ok(()),
    }
}

/// `minimum` must not exceed `maximum`.
pub fn numeric_bounds(min: Option<f64>, max: Option<f64>) -> AppResult<()> {
    match (min, max) {
        (Some(min), Some(max)) if min > max => Err(AppError::invalid_field(
            "minimum",
            min,
            format!("greater than maximum ({})", max),
        )),
        _ => Ok(()),
    }
}

/// All checks for a named parameter.
pub fn named_parameter(param: &NamedParameter) -> AppResult<()> {
    parameter_type(param.location, &param.ty)?;
    if let Some(p) = &param.pattern {
        pattern(p)?;
    }
    if let Some(values) = &param.enum_values {
        enum_values(values)?;
    }
    length_bounds(param.min_length, param.max_length)?;
    numeric_bounds(param.minimum, param.maximum)
}

/// A media type must be `type/subtype` (RFC 6838 restricted names), or be listed in
/// `config.media_types`.
pub fn media_type(field: &str, mime_type: &str, config: &ParserConfig) -> AppResult<()> {
    static MEDIA_TYPE_RE: OnceLock<Regex> = OnceLock::new();
    let re = MEDIA_TYPE_RE.get_or_init(|| {
        Regex::new(concat!(
            r"^[A-Za-z0-9][A-Za-z0-9!#$&^_.+-]{0,126}",
            r"/[A-Za-z0-9*][A-Za-z0-9!#$&^_.+*-]{0,126}$",
        ))
        .expect("Invalid regex")
    });

    if re.is_match(mime_type) || config.media_types.iter().any(|m| m == mime_type) {
        return Ok(());
    }
    Err(AppError::invalid_field(
        field,
        mime_type,
        "not a valid media type",
    ))
}

/// `mime_type` of a body.
pub fn body_mime_type(mime_type: &str, config: &ParserConfig) -> AppResult<()> {
    if mime_type.is_empty() {
        return Err(AppError::invalid_field(
            "mime_type",
            mime_type,
            "body must define a media type",
        ));
    }
    media_type("mime_type", mime_type, config)
}

/// A form body cannot carry a `schema`.
pub fn body_schema(mime_type: &str, schema: Option<&Value>) -> AppResult<()> {
    match schema {
        Some(_) if is_form_mime_type(mime_type) => Err(AppError::invalid_field(
            "schema",
            mime_type,
            "form bodies must use formParameters instead of schema",
        )),
        _ => Ok(()),
    }
}

/// A form body cannot carry an `example`.
pub fn body_example(mime_type: &str, example: Option<&Value>) -> AppResult<()> {
    match example {
        Some(_) if is_form_mime_type(mime_type) => Err(AppError::invalid_field(
            "example",
            mime_type,
            "form bodies must use formParameters instead of example",
        )),
        _ => Ok(()),
    }
}

/// Form bodies require `formParameters`; other bodies cannot have them.
pub fn body_form(mime_type: &str, form_params: Option<&[NamedParameter]>) -> AppResult<()> {
    match (is_form_mime_type(mime_type), form_params) {
        (true, None) => Err(AppError::invalid_field(
            "formParameters",
            mime_type,
            "form bodies require formParameters",
        )),
        (false, Some(_)) => Err(AppError::invalid_field(
            "formParameters",
            mime_type,
            "formParameters are only allowed for multipart/form-data or application/x-www-form-urlencoded",
        )),
        _ => Ok(()),
    }
}

/// Response codes must be listed in `config.resp_codes`.
pub fn response_code(code: u16, config: &ParserConfig) -> AppResult<()> {
    if config.resp_codes.contains(&code) {
        return Ok(());
    }
    Err(AppError::invalid_field(
        "code",
        code,
        "not a supported HTTP response code",
    ))
}

/// Every protocol must be listed in `config.protocols` (case-insensitive).
pub fn protocols(protocols: &[String], config: &ParserConfig) -> AppResult<()> {
    for protocol in protocols {
        if !config
            .protocols
            .iter()
            .any(|p| p.eq_ignore_ascii_case(protocol))
        {
            return Err(AppError::invalid_field(
                "protocols",
                protocol,
                format!("expected one of {}", config.protocols.join(", ")),
            ));
        }
    }
    Ok(())
}
