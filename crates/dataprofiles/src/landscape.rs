//! Combined registry over profiles and credentials.
//!
//! Responsibilities:
//! - Load both sections of a landscape document in one call.
//! - Load documents from files and from `DATAPROFILES_CONFIG_PATH`.
//! - Resolve a profile together with the credential it references.
//!
//! Does NOT handle:
//! - Validation of individual sections (see `registry` module).
//!
//! Invariants:
//! - A document either commits all of its entries or none of them.
//! - Source locations are recorded even when a document fails to load.
//! - Credentials load before profiles, so a failed credentials section never
//!   leaves profiles pointing at missing entries.

use std::path::Path;

use crate::constants::{CREDENTIALS_SECTION, DATASOURCES_SECTION};
use crate::error::ConfigurationError;
use crate::loader::{config_paths_from_env, read_document};
use crate::registry::{CollisionPolicy, CredentialManager, DataProfileManager, LoadReport};
use crate::types::{Credential, DataProfile, Declaration};

/// A profile paired with the credential it references, if any.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedProfile<'a> {
    pub profile: &'a DataProfile,
    pub credential: Option<&'a Credential>,
}

/// Profile and credential registries loaded from the same documents.
#[derive(Debug, Clone, Default)]
pub struct DataSourceRegistry {
    profiles: DataProfileManager,
    credentials: CredentialManager,
}

impl DataSourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one collision policy to both registries.
    pub fn with_collision_policy(mut self, policy: CollisionPolicy) -> Self {
        self.profiles = self.profiles.with_collision_policy(policy);
        self.credentials = self.credentials.with_collision_policy(policy);
        self
    }

    pub fn profiles(&self) -> &DataProfileManager {
        &self.profiles
    }

    pub fn credentials(&self) -> &CredentialManager {
        &self.credentials
    }

    /// Mutable access for registering extra profile or credential categories.
    pub fn profiles_mut(&mut self) -> &mut DataProfileManager {
        &mut self.profiles
    }

    pub fn credentials_mut(&mut self) -> &mut CredentialManager {
        &mut self.credentials
    }

    /// Build a registry from every document listed in the environment.
    ///
    /// An unset variable yields an empty registry.
    pub fn from_env() -> Result<Self, ConfigurationError> {
        let paths = config_paths_from_env();
        let mut registry = Self::new();
        registry.load_files(&paths)?;
        Ok(registry)
    }

    /// Load the `credentials` and `datasources` sections of one document.
    ///
    /// Either section may be absent, but a non-empty document must carry at
    /// least one of them. Source locations are recorded on both registries,
    /// whether or not the document loads.
    ///
    /// # Errors
    ///
    /// Any section error; no profile or credential from the document is kept.
    pub fn load_document<I, S>(
        &mut self,
        config: Option<&Declaration>,
        source_uris: I,
    ) -> Result<LoadReport, ConfigurationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let source_uris: Vec<String> = source_uris.into_iter().map(Into::into).collect();
        let mut next = self.clone();
        match next.load_sections(config, &source_uris) {
            Ok(report) => {
                *self = next;
                Ok(report)
            }
            Err(err) => {
                self.record_sources(&source_uris);
                Err(err)
            }
        }
    }

    fn load_sections(
        &mut self,
        config: Option<&Declaration>,
        source_uris: &[String],
    ) -> Result<LoadReport, ConfigurationError> {
        let config = config.filter(|config| !config.is_empty());
        let has_credentials = config.is_some_and(|c| c.contains_key(CREDENTIALS_SECTION));
        let has_datasources = config.is_some_and(|c| c.contains_key(DATASOURCES_SECTION));

        let mut report = self.credentials.load_credentials(
            config.filter(|_| has_credentials),
            source_uris.iter().cloned(),
        )?;
        // Credentials alone are a complete document; otherwise let the profile
        // registry report the missing section.
        let profile_config = if has_credentials && !has_datasources {
            None
        } else {
            config
        };
        report.merge(
            self.profiles
                .load_profiles(profile_config, source_uris.iter().cloned())?,
        );
        Ok(report)
    }

    fn record_sources(&mut self, source_uris: &[String]) {
        self.credentials.record_sources(source_uris.iter().cloned());
        self.profiles.record_sources(source_uris.iter().cloned());
    }

    /// Read and load each file in order, using its path as source location.
    ///
    /// Loading stops at the first failing file; earlier files stay loaded and
    /// the failing file is still recorded as a source location.
    pub fn load_files<P: AsRef<Path>>(
        &mut self,
        paths: &[P],
    ) -> Result<LoadReport, ConfigurationError> {
        let mut report = LoadReport::default();
        for path in paths {
            let path = path.as_ref();
            let source = path.display().to_string();
            let document = match read_document(path) {
                Ok(document) => document,
                Err(err) => {
                    self.record_sources(&[source]);
                    return Err(err);
                }
            };
            tracing::debug!(path = %source, "loading landscape document");
            report.merge(self.load_document(document.as_ref(), [source])?);
        }
        Ok(report)
    }

    /// Look up a profile and the credential it references.
    ///
    /// # Errors
    ///
    /// - `ProfileNotFound` when the identifier is not registered.
    /// - `UnresolvedCredential` when the profile names an unknown credential.
    pub fn resolve(&self, identifier: &str) -> Result<ResolvedProfile<'_>, ConfigurationError> {
        let profile = self.profiles.lookup_profile(identifier)?;
        let credential = match profile.credential() {
            None => None,
            Some(reference) => Some(
                self.credentials
                    .credentials()
                    .get(reference)
                    .ok_or_else(|| ConfigurationError::UnresolvedCredential {
                        profile: identifier.to_string(),
                        credential: reference.to_string(),
                    })?,
            ),
        };
        Ok(ResolvedProfile {
            profile,
            credential,
        })
    }
}
