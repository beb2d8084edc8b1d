//! Two-phase batch loading shared by the profile and credential registries.
//!
//! Phase one walks every declaration of a section, collecting errors and
//! warnings and staging the values that built cleanly. Phase two, run by the
//! caller, commits the staged values only if no error was collected.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Display;

use serde_json::Value;

use crate::error::ConfigurationError;
use crate::types::Declaration;
use crate::types::declaration::{IdentifierField, identifier_field};

/// What a registry does when an identifier is declared twice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CollisionPolicy {
    /// Duplicate identifiers fail the batch.
    #[default]
    Reject,
    /// The last declaration processed wins; a warning is recorded.
    Overwrite,
}

/// Outcome of a successful load call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Identifiers committed by this call, each listed once, in order of first
    /// declaration.
    pub registered: Vec<String>,
    /// Non-fatal diagnostics such as unknown categories or ignored fields.
    pub warnings: Vec<String>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    pub(crate) fn merge(&mut self, other: LoadReport) {
        self.registered.extend(other.registered);
        self.warnings.extend(other.warnings);
    }
}

/// Errors and warnings collected while staging a batch.
#[derive(Debug, Default)]
pub(crate) struct Diagnostics {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl Diagnostics {
    pub(crate) fn error(&mut self, error: impl Display) {
        self.errors.push(error.to_string());
    }

    pub(crate) fn warn(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }
}

/// Declarations of one section that built cleanly, awaiting commit.
pub(crate) struct StagedBatch<T> {
    pub(crate) entries: Vec<(String, T)>,
    pub(crate) warnings: Vec<String>,
}

/// Section being staged, used in diagnostics.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Section {
    /// Document key, e.g. `datasources`.
    pub(crate) key: &'static str,
    /// Human name of one item, e.g. `Datasource profile`.
    pub(crate) item: &'static str,
}

/// Locate the declaration list for `section` in a non-empty document.
pub(crate) fn section_declarations<'a>(
    config: &'a Declaration,
    section: Section,
) -> Result<&'a [Value], ConfigurationError> {
    match config.get(section.key) {
        None => Err(ConfigurationError::MissingSection {
            section: section.key,
        }),
        Some(Value::Null) => Ok(&[]),
        Some(Value::Array(items)) => Ok(items.as_slice()),
        Some(_) => Err(ConfigurationError::MalformedSection {
            section: section.key,
        }),
    }
}

/// Phase one: validate and build every declaration of a section.
///
/// `build` returns `None` when the declaration was skipped; it records its
/// own errors and warnings in the supplied `Diagnostics`. The batch fails as a
/// whole when any error was collected.
pub(crate) fn stage<T>(
    section: Section,
    declarations: &[Value],
    registered: &BTreeMap<String, T>,
    policy: CollisionPolicy,
    source_uris: &[String],
    mut build: impl FnMut(&str, &Declaration, &mut Diagnostics) -> Option<T>,
) -> Result<StagedBatch<T>, ConfigurationError> {
    let mut diagnostics = Diagnostics::default();
    let mut entries = Vec::with_capacity(declarations.len());
    let mut seen = BTreeSet::new();

    for (index, value) in declarations.iter().enumerate() {
        let Some(declaration) = value.as_object() else {
            diagnostics.error(ConfigurationError::MalformedDeclaration {
                section: section.key,
                index,
            });
            continue;
        };

        let identifier = match identifier_field(declaration) {
            IdentifierField::Present(identifier) => identifier,
            IdentifierField::Missing => {
                diagnostics.error(ConfigurationError::MissingIdentifier {
                    item: section.item,
                    section: section.key,
                });
                continue;
            }
            IdentifierField::Invalid => {
                diagnostics.error(ConfigurationError::InvalidIdentifier {
                    section: section.key,
                    index,
                });
                continue;
            }
        };

        if !seen.insert(identifier) {
            match policy {
                CollisionPolicy::Reject => {
                    diagnostics.error(ConfigurationError::DuplicateIdentifier {
                        section: section.key,
                        identifier: identifier.to_string(),
                    });
                    continue;
                }
                CollisionPolicy::Overwrite => diagnostics.warn(format!(
                    "{} '{identifier}' is declared more than once; the last declaration wins",
                    section.item
                )),
            }
        } else if registered.contains_key(identifier) {
            match policy {
                CollisionPolicy::Reject => {
                    diagnostics.error(ConfigurationError::AlreadyRegistered {
                        section: section.key,
                        identifier: identifier.to_string(),
                    });
                    continue;
                }
                CollisionPolicy::Overwrite => diagnostics.warn(format!(
                    "{} '{identifier}' replaces a previously loaded declaration",
                    section.item
                )),
            }
        }

        if let Some(entry) = build(identifier, declaration, &mut diagnostics) {
            entries.push((identifier.to_string(), entry));
        }
    }

    let Diagnostics { errors, warnings } = diagnostics;
    if !errors.is_empty() {
        return Err(ConfigurationError::BatchValidation {
            section: section.key,
            errors,
            warnings,
            source_uris: source_uris.to_vec(),
        });
    }

    Ok(StagedBatch { entries, warnings })
}

/// Phase two: insert staged entries in order, so later duplicates win.
pub(crate) fn commit<T>(
    registry: &mut BTreeMap<String, T>,
    section: Section,
    staged: StagedBatch<T>,
) -> LoadReport {
    let mut registered = Vec::with_capacity(staged.entries.len());
    for (identifier, entry) in staged.entries {
        tracing::debug!(section = section.key, identifier = %identifier, "registered declaration");
        registry.insert(identifier.clone(), entry);
        if !registered.contains(&identifier) {
            registered.push(identifier);
        }
    }
    for warning in &staged.warnings {
        tracing::warn!(section = section.key, "{warning}");
    }
    LoadReport {
        registered,
        warnings: staged.warnings,
    }
}
