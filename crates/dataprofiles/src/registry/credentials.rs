//! Credential registry.
//!
//! Loads the `credentials` section with the same two-phase contract as the
//! profile registry, delegating category handling to `CredentialCatalog`.

use std::collections::BTreeMap;

use super::batch::{self, CollisionPolicy, LoadReport, Section};
use super::classifier::{Classification, CredentialCatalog};
use crate::constants::CREDENTIALS_SECTION;
use crate::error::ConfigurationError;
use crate::types::{Credential, Declaration};

const SECTION: Section = Section {
    key: CREDENTIALS_SECTION,
    item: "Credential",
};

/// Registry of credentials keyed by identifier.
#[derive(Debug, Clone, Default)]
pub struct CredentialManager {
    credentials: BTreeMap<String, Credential>,
    source_uris: Vec<String>,
    catalog: CredentialCatalog,
    collision_policy: CollisionPolicy,
}

impl CredentialManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_catalog(mut self, catalog: CredentialCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_collision_policy(mut self, policy: CollisionPolicy) -> Self {
        self.collision_policy = policy;
        self
    }

    pub fn credentials(&self) -> &BTreeMap<String, Credential> {
        &self.credentials
    }

    pub fn source_uris(&self) -> &[String] {
        &self.source_uris
    }

    pub fn catalog(&self) -> &CredentialCatalog {
        &self.catalog
    }

    /// Mutable access to the dispatch table, for registering extra categories.
    pub fn catalog_mut(&mut self) -> &mut CredentialCatalog {
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

    /// Look up a credential by identifier.
    pub fn lookup_credential(&self, identifier: &str) -> Result<&Credential, ConfigurationError> {
        self.credentials
            .get(identifier)
            .ok_or_else(|| ConfigurationError::CredentialNotFound {
                identifier: identifier.to_string(),
                source_uris: self.source_uris.clone(),
            })
    }

    /// Load the `credentials` section of a decoded document.
    ///
    /// Source locations are recorded unconditionally; an absent or empty
    /// document registers nothing. Any classification error fails the whole
    /// batch, while an unknown single category only skips that credential.
    pub fn load_credentials<I, S>(
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
            &self.credentials,
            self.collision_policy,
            &self.source_uris,
            |identifier, declaration, diagnostics| {
                match catalog.classify(identifier, declaration) {
                    Ok(Classification::Credential {
                        credential,
                        unrecognized,
                    }) => {
                        for field in unrecognized {
                            diagnostics.warn(format!(
                                "Ignoring unrecognized field '{field}' in credential '{identifier}'"
                            ));
                        }
                        Some(credential)
                    }
                    Ok(Classification::UnknownCategory { category }) => {
                        diagnostics.warn(format!(
                            "Unknown category '{category}' found in credential '{identifier}'"
                        ));
                        None
                    }
                    Err(err) => {
                        diagnostics.error(err);
                        None
                    }
                }
            },
        )?;

        let report = batch::commit(&mut self.credentials, SECTION, staged);
        tracing::debug!(
            registered = report.registered.len(),
            warnings = report.warnings.len(),
            total = self.credentials.len(),
            "loaded credentials"
        );
        Ok(report)
    }
}
