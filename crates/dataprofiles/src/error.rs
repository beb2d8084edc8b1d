//! Error types for profile and credential configuration.
//!
//! Responsibilities:
//! - Define every failure surfaced by loading, validating, and looking up
//!   profiles and credentials as a single `ConfigurationError` type.
//! - Render multi-line diagnostics (source listings, batch error reports).
//!
//! Does NOT handle:
//! - Warnings. Those are returned in `LoadReport` and logged, never raised.
//!
//! Invariants:
//! - Lookup failures always name the missing identifier.
//! - Batch failures enumerate every collected error and warning plus every
//!   known source location.
//! - Messages never include secret values from declarations.

use std::path::PathBuf;

use thiserror::Error;

use crate::constants::LISTING_INDENT;

/// Errors raised while loading or resolving configuration.
#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("Error missing data source profile '{identifier}'.{}", render_listing("PROFILES URIS:", .source_uris))]
    ProfileNotFound {
        identifier: String,
        source_uris: Vec<String>,
    },

    #[error("Error missing credential '{identifier}'.{}", render_listing("CREDENTIAL URIS:", .source_uris))]
    CredentialNotFound {
        identifier: String,
        source_uris: Vec<String>,
    },

    #[error("No '{section}' field found.")]
    MissingSection { section: &'static str },

    #[error("The '{section}' field must be a list of declarations.")]
    MalformedSection { section: &'static str },

    #[error("Item #{index} in '{section}' must be a mapping.")]
    MalformedDeclaration { section: &'static str, index: usize },

    #[error("{item} items in '{section}' must have an 'identifier' member.")]
    MissingIdentifier {
        item: &'static str,
        section: &'static str,
    },

    #[error("Item #{index} in '{section}' has an 'identifier' that is not a non-empty string.")]
    InvalidIdentifier { section: &'static str, index: usize },

    #[error("Identifier '{identifier}' is declared more than once in '{section}'.")]
    DuplicateIdentifier {
        section: &'static str,
        identifier: String,
    },

    #[error("Identifier '{identifier}' in '{section}' is already registered by an earlier load.")]
    AlreadyRegistered {
        section: &'static str,
        identifier: String,
    },

    #[error("Datasource profile '{identifier}' must have a 'category' member.")]
    MissingProfileCategory { identifier: String },

    #[error("Credential '{identifier}' must have a 'category' or 'categories' member.")]
    MissingCredentialCategory { identifier: String },

    #[error("Credential '{identifier}' has invalid categories: {message}")]
    InvalidCategories { identifier: String, message: String },

    #[error(
        "The only categories of credentials that can be used together are ['basic', 'ssh (with password)', 'rest-basic'], credential '{identifier}' declares {categories:?}."
    )]
    InvalidCategoryCombination {
        identifier: String,
        categories: Vec<String>,
    },

    #[error(
        "Multi category credential '{identifier}' must have common attributes. Currently, the only common credential supported is a 'username' and 'password' credential."
    )]
    MissingCommonFields { identifier: String },

    #[error("{item} '{identifier}' with category '{category}' is invalid: {message}")]
    InvalidDeclaration {
        item: &'static str,
        identifier: String,
        category: String,
        message: String,
    },

    #[error("Errors found in '{section}'.{}", render_batch(.errors, .warnings, .source_uris))]
    BatchValidation {
        section: &'static str,
        errors: Vec<String>,
        warnings: Vec<String>,
        source_uris: Vec<String>,
    },

    #[error("Datasource profile '{profile}' references unknown credential '{credential}'.")]
    UnresolvedCredential { profile: String, credential: String },

    #[error("Failed to read configuration document at {path}: {source}")]
    DocumentRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse configuration document {origin}: {message}")]
    DocumentParse { origin: String, message: String },

    #[error("Configuration document {origin} must be a mapping at the top level.")]
    DocumentNotMapping { origin: String },
}

impl ConfigurationError {
    /// Errors collected by a failed batch, empty for every other variant.
    pub fn batch_errors(&self) -> &[String] {
        match self {
            Self::BatchValidation { errors, .. } => errors,
            _ => &[],
        }
    }
}

/// Render a header followed by one indented line per entry, or nothing when empty.
fn render_listing(header: &str, entries: &[String]) -> String {
    if entries.is_empty() {
        return String::new();
    }

    let mut rendered = format!("\n{header}");
    for entry in entries {
        rendered.push('\n');
        rendered.push_str(LISTING_INDENT);
        rendered.push_str(entry);
    }
    rendered
}

fn render_batch(errors: &[String], warnings: &[String], source_uris: &[String]) -> String {
    let mut rendered = String::new();
    for (header, entries) in [
        ("ERRORS:", errors),
        ("WARNINGS:", warnings),
        ("SOURCE URIS:", source_uris),
    ] {
        rendered.push('\n');
        rendered.push_str(header);
        for entry in entries {
            rendered.push('\n');
            rendered.push_str(LISTING_INDENT);
            rendered.push_str(entry);
        }
    }
    rendered
}
