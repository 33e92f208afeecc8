#![deny(missing_docs)]

//! # Commands
//!
//! - `validate`: parses a RAML file and reports the first invalid declaration.
//! - `types`: lists the custom types a RAML file declares.

use crate::error::CliResult;
use raml_core::{parse_raml_str, ParserConfig, RamlRoot};
use std::fs;
use std::io::Write;
use std::path::PathBuf;

/// Arguments shared by every command.
#[derive(clap::Args, Debug, Clone)]
pub struct DocumentArgs {
    /// Path to the RAML file. Includes are not followed.
    pub file: PathBuf,

    /// Build the model without running field validators.
    #[clap(long)]
    pub no_validate: bool,
}

impl DocumentArgs {
    fn config(&self) -> ParserConfig {
        if self.no_validate {
            ParserConfig::lenient()
        } else {
            ParserConfig::default()
        }
    }

    fn load(&self) -> CliResult<RamlRoot> {
        let text = fs::read_to_string(&self.file)?;
        tracing::debug!(file = %self.file.display(), "loaded RAML document");
        Ok(parse_raml_str(&text, &self.config())?)
    }
}

/// Parses the file and writes a one-line summary.
pub fn validate(args: &DocumentArgs, out: &mut impl Write) -> CliResult<()> {
    let api = args.load()?;
    writeln!(
        out,
        "{}: valid RAML {} ({} types, {} resource types, {} resources)",
        args.file.display(),
        api.raml_version.as_deref().unwrap_or("?"),
        api.types.len(),
        api.resource_types.len(),
        api.resources.len()
    )?;
    Ok(())
}

/// Parses the file and writes one line per declared type.
pub fn types(args: &DocumentArgs, out: &mut impl Write) -> CliResult<()> {
    let api = args.load()?;
    for descriptor in api.types.values() {
        writeln!(out, "{}", descriptor)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use raml_core::AppError;

    fn write_doc(dir: &tempfile::TempDir, text: &str) -> PathBuf {
        let path = dir.path().join("api.raml");
        fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn test_validate_summary() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_doc(&dir, "#%RAML 1.0\ntitle: T\n/users:\n  get: {}\n");
        let args = DocumentArgs { file, no_validate: false };

        let mut out: Vec<u8> = Vec::new();
        validate(&args, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(
            text.ends_with(": valid RAML 1.0 (0 types, 0 resource types, 1 resources)\n"),
            "{}",
            text
        );
    }

    #[test]
    fn test_types_listing() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_doc(
            &dir,
            "#%RAML 1.0\ntitle: T\ntypes:\n  Person:\n    type: object\n    properties:\n      name: string\n  Email: string\n",
        );
        let args = DocumentArgs { file, no_validate: false };

        let mut out: Vec<u8> = Vec::new();
        types(&args, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "ObjectType(name=\"Person\", properties={\"name\": Property(type=\"string\")})\nStringType(name=\"Email\")\n"
        );
    }

    #[test]
    fn test_no_validate_flag() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_doc(&dir, "title: T\n");

        let strict = DocumentArgs { file: file.clone(), no_validate: false };
        let err = validate(&strict, &mut Vec::<u8>::new()).unwrap_err();
        assert!(matches!(err, CliError::Raml(AppError::InvalidField { .. })));

        let lenient = DocumentArgs { file, no_validate: true };
        assert!(validate(&lenient, &mut Vec::<u8>::new()).is_ok());
    }

    #[test]
    fn test_missing_file() {
        let args = DocumentArgs {
            file: PathBuf::from("/nonexistent/api.raml"),
            no_validate: false,
        };
        assert!(matches!(validate(&args, &mut Vec::<u8>::new()), Err(CliError::Io(_))));
    }
}
