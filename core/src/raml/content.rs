//! # Rich Text Content
//!
//! `description` fields in RAML are Markdown. The model keeps the source text; rendering is
//! left to whoever presents it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Markdown text attached to a RAML node.
#[derive(Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Content(String);

impl Content {
    /// Wraps raw Markdown.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The raw Markdown source.
    pub fn raw(&self) -> &str {
        &self.0
    }

    /// True when no text was declared.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for Content {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for Content {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl fmt::Debug for Content {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Content({:?})", self.0)
    }
}

impl fmt::Display for Content {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
