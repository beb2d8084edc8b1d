//! Decoding configuration documents.
//!
//! Responsibilities:
//! - Parse YAML or JSON text into a top-level `Declaration` mapping.
//! - Read documents from disk, choosing the format from the file extension.
//!
//! Does NOT handle:
//! - Validating sections or declarations (see `registry` module).
//!
//! Invariants:
//! - Parse errors name the document origin but never echo document contents.
//! - A non-mapping root is an error; an empty or `null` root is `None`.

use std::path::Path;

use serde_json::Value;

use crate::error::ConfigurationError;
use crate::types::Declaration;

/// Text format of a configuration document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocumentFormat {
    #[default]
    Yaml,
    Json,
}

impl DocumentFormat {
    /// `.json` files are JSON; everything else is read as YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Yaml,
        }
    }
}

/// Parse document text. `origin` names the document in error messages.
pub fn parse_document(
    text: &str,
    format: DocumentFormat,
    origin: &str,
) -> Result<Option<Declaration>, ConfigurationError> {
    if text.trim().is_empty() {
        return Ok(None);
    }

    let root: Value = match format {
        DocumentFormat::Yaml => {
            serde_yaml::from_str(text).map_err(|e| ConfigurationError::DocumentParse {
                origin: origin.to_string(),
                message: location_only(e.location().map(|l| (l.line(), l.column())), "YAML"),
            })?
        }
        DocumentFormat::Json => {
            serde_json::from_str(text).map_err(|e| ConfigurationError::DocumentParse {
                origin: origin.to_string(),
                message: location_only(Some((e.line(), e.column())), "JSON"),
            })?
        }
    };

    match root {
        Value::Null => Ok(None),
        Value::Object(map) => Ok(Some(map)),
        _ => Err(ConfigurationError::DocumentNotMapping {
            origin: origin.to_string(),
        }),
    }
}

/// Read and parse the document at `path`.
pub fn read_document(path: &Path) -> Result<Option<Declaration>, ConfigurationError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigurationError::DocumentRead {
        path: path.to_path_buf(),
        source,
    })?;
    parse_document(&text, DocumentFormat::from_path(path), &path.display().to_string())
}

/// Parser messages can quote offending lines, which may hold secrets.
fn location_only(location: Option<(usize, usize)>, format: &str) -> String {
    match location {
        Some((line, column)) => format!("invalid {format} at line {line}, column {column}"),
        None => format!("invalid {format}"),
    }
}
