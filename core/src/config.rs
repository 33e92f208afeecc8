//! # Parser Configuration
//!
//! Knobs consulted by the field validators and the resource builder.
//! Reading the configuration from disk is left to the caller; this module only decodes it.

use crate::error::AppResult;
use serde::Deserialize;

/// HTTP methods recognised as resource method keys when nothing else is configured.
pub const DEFAULT_HTTP_METHODS: [&str; 9] = [
    "get", "post", "put", "delete", "patch", "head", "options", "trace", "connect",
];

/// Protocols accepted in the root `protocols` list.
pub const DEFAULT_PROTOCOLS: [&str; 2] = ["HTTP", "HTTPS"];

/// IANA registered HTTP status codes.
pub const DEFAULT_RESP_CODES: [u16; 63] = [
    100, 101, 102, 103, 200, 201, 202, 203, 204, 205, 206, 207, 208, 226, 300, 301, 302, 303,
    304, 305, 306, 307, 308, 400, 401, 402, 403, 404, 405, 406, 407, 408, 409, 410, 411, 412,
    413, 414, 415, 416, 417, 418, 421, 422, 423, 424, 425, 426, 428, 429, 431, 451, 500, 501,
    502, 503, 504, 505, 506, 507, 508, 510, 511,
];

/// Parser configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Run field validators. When `false`, records are built from whatever was declared.
    pub validate: bool,
    /// Lower-case HTTP method names treated as method keys on resource nodes.
    pub http_methods: Vec<String>,
    /// Upper-case protocol names accepted in `protocols`.
    pub protocols: Vec<String>,
    /// Accepted response status codes.
    pub resp_codes: Vec<u16>,
    /// Extra media types accepted verbatim, on top of syntactically valid ones.
    pub media_types: Vec<String>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            validate: true,
            http_methods: DEFAULT_HTTP_METHODS.iter().map(|m| m.to_string()).collect(),
            protocols: DEFAULT_PROTOCOLS.iter().map(|p| p.to_string()).collect(),
            resp_codes: DEFAULT_RESP_CODES.to_vec(),
            media_types: Vec::new(),
        }
    }
}

impl ParserConfig {
    /// Decodes a configuration document. Missing keys keep their defaults.
    pub fn from_yaml_str(yaml: &str) -> AppResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Configuration with validation switched off.
    pub fn lenient() -> Self {
        Self {
            validate: false,
            ..Self::default()
        }
    }

    /// Whether `method` is a configured HTTP method key.
    pub fn is_http_method(&self, method: &str) -> bool {
        self.http_methods.iter().any(|m| m == method)
    }
}
