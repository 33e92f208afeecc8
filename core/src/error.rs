//! # Error Handling
//!
//! Provides the unified `AppError` enum used across the workspace.

use derive_more::{Display, From};

/// The Global Error Enum.
///
/// We use `derive_more` for boilerplate.
/// Note: String errors default to `General`.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// A `type:` expression names a kind absent from the type registry.
    #[from(ignore)]
    #[display("{_0} type expression is not supported or not defined")]
    UnknownType(String),

    /// A field failed its validator.
    #[from(ignore)]
    #[display("Invalid value '{value}' for '{field}': {message}")]
    InvalidField {
        /// Name of the offending field (RAML spelling).
        field: String,
        /// The rejected value, rendered for display.
        value: String,
        /// Why the value was rejected.
        message: String,
    },

    /// A declaration whose keys or shapes do not match its statically declared field set.
    #[from(ignore)]
    #[display("Invalid declaration '{name}': {message}")]
    InvalidDeclaration {
        /// Name of the declaration (type, parameter, body...).
        name: String,
        /// Decoder message.
        message: String,
    },

    /// Wrapper for YAML decoding errors.
    #[display("YAML Error: {_0}")]
    Yaml(serde_yaml::Error),

    /// Wrapper for standard IO errors.
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

impl AppError {
    /// Shorthand for [`AppError::InvalidField`].
    pub fn invalid_field(
        field: impl Into<String>,
        value: impl ToString,
        message: impl Into<String>,
    ) -> Self {
        AppError::InvalidField {
            field: field.into(),
            value: value.to_string(),
            message: message.into(),
        }
    }

    /// Shorthand for [`AppError::InvalidDeclaration`].
    pub fn invalid_declaration(name: impl Into<String>, message: impl ToString) -> Self {
        AppError::InvalidDeclaration {
            name: name.into(),
            message: message.to_string(),
        }
    }
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;
