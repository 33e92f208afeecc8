//! # RAML Parsing Module
//!
//! - **types**: custom type registry and resolution.
//! - **parameters**: named parameters, bodies and responses.
//! - **payload**: JSON/XML decoding of schema and example text.
//! - **validate**: field validators used by the parameter model.
//! - **resource_types**: method-scoped resource-type templates.
//! - **inheritance**: per-method attribute inheritance from templates.
//! - **resources**: resource/method nodes.
//! - **document**: the document entry point.

pub mod content;
pub mod document;
pub mod inheritance;
pub mod parameters;
pub mod payload;
pub mod resource_types;
pub mod resources;
pub mod types;
pub mod validate;

pub use content::Content;
pub use document::{parse_raml, parse_raml_str, parse_raml_with_registry, RamlRoot};
pub use inheritance::{
    find_resource_type, find_resource_type_for_method, lookup_node_attribute, resolve_attribute,
    NodeLookup,
};
pub use parameters::{Body, NamedParameter, ParameterLocation, Response};
pub use payload::load_schema;
pub use resource_types::ResourceType;
pub use resources::Resource;
pub use types::{create_type, resolve_types, Property, TypeDescriptor, TypeRegistry};
