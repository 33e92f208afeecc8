//! # Custom Type System
//!
//! - **registry**: kind name -> descriptor factory.
//! - **resolver**: `type:` expression resolution.
//! - **descriptors**: the resolved shapes (`object`, `string`, runtime kinds).
//! - **properties**: object property descriptors.

pub mod descriptors;
pub mod properties;
pub mod registry;
pub mod resolver;

pub use descriptors::{ExtensionType, ObjectType, StringType, TypeDescriptor};
pub use properties::{parse_properties, Property};
pub use registry::{TypeFactory, TypeRegistry, BUILTIN_KINDS};
pub use resolver::{create_type, resolve_types, DEFAULT_TYPE_KIND};
