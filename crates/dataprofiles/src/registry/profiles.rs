//! Data source profile registry.
//!
//! Responsibilities:
//! - Load profile declarations from the `datasources` section of a document.
//! - Dispatch each declaration to its variant through the `ProfileCatalog`.
//! - Resolve profiles by identifier with errors that list every known source.
//!
//! Does NOT handle:
//! - Decoding documents (see `loader`).
//! - Credentials referenced by profiles (see `credentials.rs`).
//!
//! Invariants:
//! - `source_uris` is append-only, even when a load fails or is a no-op.
//! - A load either commits every declaration of its batch or none of them.
//! - Unknown categories and unrecognized fields are warnings, never errors.

use std::collections::BTreeMap;

use serde_json::Value;

use super::batch::{self, CollisionPolicy, LoadReport, Section};
use super::catalog::ProfileCatalog;
use crate::constants::{CATEGORY_KEY, DATASOURCES_SECTION};
use crate::error::ConfigurationError;
use crate::types::declaration::describe_value;
use crate::types::{DataProfile, Declaration};

const SECTION: Section = Section {
    key: DATASOURCES_SECTION,
    item: "Datasource profile",
};

/// Registry of data source profiles keyed by identifier.
#[derive(Debug, Clone, Default)]
pub struct DataProfileManager {
    profiles: BTreeMap<String, DataProfile>,
    source_uris: Vec<String>,
    catalog: ProfileCatalog,
    collision_policy: CollisionPolicy,
}

impl DataProfileManager {
    /// Create an empty registry using the default catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the category dispatch table.
    pub fn with_catalog(mut self, catalog: ProfileCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Set how duplicate identifiers are handled.
    pub fn with_collision_policy(mut self, policy: CollisionPolicy) -> Self {
        self.collision_policy = policy;
        self
    }

    /// Registered profiles, sorted by identifier.
    pub fn profiles(&self) -> &BTreeMap<String, DataProfile> {
        &self.profiles
    }

    /// Every source location passed to a load call, in call order.
    pub fn source_uris(&self) -> &[String] {
        &self.source_uris
    }

    pub fn catalog(&self) -> &ProfileCatalog {
        &self.catalog
    }

    /// Mutable access to the dispatch table, for registering extra categories.
    pub fn catalog_mut(&mut self) -> &mut ProfileCatalog {
        &mut self.catalog
    }

    pub fn collision_policy(&self) -> CollisionPolicy {
        self.collision_policy
    }

    /// Append source locations without loading anything.
    pub(crate) fn record_sources<I, S>(&mut self, source_uris: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.source_uris
            .extend(source_uris.into_iter().map(Into::into));
    }

    /// Look up a profile by identifier.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::ProfileNotFound` naming the identifier and
    /// listing every recorded source location.
    pub fn lookup_profile(&self, identifier: &str) -> Result<&DataProfile, ConfigurationError> {
        self.profiles
            .get(identifier)
            .ok_or_else(|| ConfigurationError::ProfileNotFound {
                identifier: identifier.to_string(),
                source_uris: self.source_uris.clone(),
            })
    }

    /// Load the `datasources` section of a decoded document.
    ///
    /// `source_uris` are recorded first and unconditionally. An absent or
    /// empty document registers nothing.
    ///
    /// # Errors
    ///
    /// - `MissingSection` / `MalformedSection` when a non-empty document has
    ///   no usable `datasources` list.
    /// - `BatchValidation` when any declaration is structurally invalid; no
    ///   profile from the batch is registered.
    pub fn load_profiles<I, S>(
        &mut self,
        config: Option<&Declaration>,
        source_uris: I,
    ) -> Result<LoadReport, ConfigurationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.record_sources(source_uris);

        let Some(config) = config.filter(|config| !config.is_empty()) else {
            return Ok(LoadReport::default());
        };

        let declarations = batch::section_declarations(config, SECTION)?;
        let catalog = &self.catalog;
        let staged = batch::stage(
            SECTION,
            declarations,
            &self.profiles,
            self.collision_policy,
            &self.source_uris,
            |identifier, declaration, diagnostics| {
                let category = match declaration.get(CATEGORY_KEY) {
                    None | Some(Value::Null) => {
                        diagnostics.error(ConfigurationError::MissingProfileCategory {
                            identifier: identifier.to_string(),
                        });
                        return None;
                    }
                    Some(Value::String(category)) => category,
                    Some(other) => {
                        diagnostics.error(ConfigurationError::InvalidDeclaration {
                            item: SECTION.item,
                            identifier: identifier.to_string(),
                            category: describe_value(other),
                            message: "'category' must be a string".to_string(),
                        });
                        return None;
                    }
                };

                let Some(constructor) = catalog.get(category) else {
                    diagnostics.warn(format!(
                        "Unknown category '{category}' found in datasource profile '{identifier}'"
                    ));
                    return None;
                };

                for field in constructor.unrecognized_fields(declaration) {
                    diagnostics.warn(format!(
                        "Ignoring unrecognized field '{field}' in datasource profile '{identifier}'"
                    ));
                }

                match constructor.build(identifier, declaration) {
                    Ok(profile) => Some(profile),
                    Err(message) => {
                        diagnostics.error(ConfigurationError::InvalidDeclaration {
                            item: SECTION.item,
                            identifier: identifier.to_string(),
                            category: category.clone(),
                            message,
                        });
                        None
                    }
                }
            },
        )?;

        let report = batch::commit(&mut self.profiles, SECTION, staged);
        tracing::debug!(
            registered = report.registered.len(),
            warnings = report.warnings.len(),
            total = self.profiles.len(),
            "loaded datasource profiles"
        );
        Ok(report)
    }
}
