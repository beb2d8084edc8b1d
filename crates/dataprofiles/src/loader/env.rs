//! Environment variable handling for document discovery.

use std::path::PathBuf;

use crate::constants::CONFIG_PATH_ENV;

/// Read an environment variable, returning None if unset, empty, or whitespace-only.
/// Returns the trimmed value (leading/trailing whitespace removed) if present.
pub fn env_var_or_none(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == s.len() {
            Some(s)
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Configuration documents listed in `DATAPROFILES_CONFIG_PATH`.
///
/// Entries are separated like `PATH` on the current platform; empty entries
/// are skipped.
pub fn config_paths_from_env() -> Vec<PathBuf> {
    env_var_or_none(CONFIG_PATH_ENV)
        .map(|value| {
            std::env::split_paths(&value)
                .filter(|path| !path.as_os_str().is_empty())
                .collect()
        })
        .unwrap_or_default()
}
