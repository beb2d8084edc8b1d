//! Profile and credential registries.
//!
//! Responsibilities:
//! - Dispatch declarations to typed values through registered catalogs.
//! - Validate whole batches before committing any entry.
//! - Resolve entries by identifier with diagnostics naming every source.
//!
//! Does NOT handle:
//! - Decoding text or files into declarations (see `loader` module).
//! - Field-level validation of a single variant (see `types` module).
//!
//! Invariants:
//! - Mutation takes `&mut self`; once loading is done a registry can be shared
//!   read-only across threads.
//! - Source locations only grow; they are never deduplicated.

mod batch;
mod catalog;
mod classifier;
mod credentials;
mod profiles;

pub use batch::{CollisionPolicy, LoadReport};
pub use catalog::{ProfileCatalog, ProfileConstructor};
pub use classifier::{
    Classification, CredentialCatalog, CredentialConstructor, normalize_categories,
};
pub use credentials::CredentialManager;
pub use profiles::DataProfileManager;

#[cfg(test)]
mod tests;
