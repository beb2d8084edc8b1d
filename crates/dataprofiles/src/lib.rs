//! Data source profile registry.
//!
//! This crate turns a decoded configuration document into typed descriptors of
//! external data stores (databases, document stores, cloud warehouses) and the
//! credentials they reference, and resolves both by identifier.

pub mod constants;
mod error;
mod landscape;
mod loader;
pub mod registry;
pub mod types;

pub use error::ConfigurationError;
pub use landscape::{DataSourceRegistry, ResolvedProfile};
pub use loader::{
    DocumentFormat, config_paths_from_env, env_var_or_none, parse_document, read_document,
};
pub use registry::{
    Classification, CollisionPolicy, CredentialCatalog, CredentialManager, DataProfileManager,
    LoadReport, ProfileCatalog, ProfileConstructor,
};
pub use types::{
    Credential, CredentialShape, DataProfile, Declaration, ProfileDetails, ProfileVariant,
};
