//! Document front-end for the registries.
//!
//! Responsibilities:
//! - Decode YAML or JSON text and files into the generic `Declaration` mapping.
//! - Discover configuration document locations from the environment.
//!
//! Does NOT handle:
//! - Interpreting sections or declarations (see `registry` module).
//!
//! Invariants / Assumptions:
//! - An empty or `null` document decodes to `None`, never to an error.
//! - Empty or whitespace-only environment variables are treated as unset.

mod document;
mod env;

pub use document::{DocumentFormat, parse_document, read_document};
pub use env::{config_paths_from_env, env_var_or_none};
