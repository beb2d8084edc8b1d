//! Centralized constants for the data source profile registry.
//!
//! Section keys, declaration keys, and environment variable names live here so
//! the registry, loader, and error messages agree on spelling.

// =============================================================================
// Document Sections
// =============================================================================

/// Top-level key holding the list of data source profile declarations.
pub const DATASOURCES_SECTION: &str = "datasources";

/// Top-level key holding the list of credential declarations.
pub const CREDENTIALS_SECTION: &str = "credentials";

// =============================================================================
// Declaration Keys
// =============================================================================

/// Key carrying the registry identifier of a declaration.
pub const IDENTIFIER_KEY: &str = "identifier";

/// Key carrying the category discriminator of a declaration.
pub const CATEGORY_KEY: &str = "category";

/// Alternate key for credentials declaring one or more categories.
pub const CATEGORIES_KEY: &str = "categories";

/// Key on a profile declaration referencing a credential identifier.
pub const CREDENTIAL_KEY: &str = "credential";

/// Credential categories that may be combined on a single username/password credential.
pub const MULTI_CATEGORY_COMPATIBLE: &[&str] = &["basic", "ssh", "rest-basic"];

// =============================================================================
// Environment & Diagnostics
// =============================================================================

/// Environment variable listing configuration documents, separated like `PATH`.
pub const CONFIG_PATH_ENV: &str = "DATAPROFILES_CONFIG_PATH";

/// Indentation used for itemized lines in diagnostic messages.
pub const LISTING_INDENT: &str = "    ";
