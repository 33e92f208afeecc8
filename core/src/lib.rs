#![deny(missing_docs)]

//! # RAML Core
//!
//! In-memory model builder for RAML API descriptions: custom type resolution,
//! resource-type inheritance and the validated parameter model.

/// Shared error types.
pub mod error;

/// Parser configuration.
pub mod config;

/// RAML parsing utilities.
pub mod raml;

pub use config::ParserConfig;
pub use error::{AppError, AppResult};
pub use raml::{
    create_type, find_resource_type, parse_raml, parse_raml_str, resolve_attribute,
    resolve_types, Body, Content, NamedParameter, ParameterLocation, Property, RamlRoot,
    Resource, ResourceType, Response, TypeDescriptor, TypeRegistry,
};
