//! Key file resolution
//!
//! Order of precedence:
//! 1. `keys["account/repository"]`, used as-is
//! 2. `key_path` joined with the rendered `key_name_format`, if the file exists
//! 3. `fallback_key`, if set
//!
//! Only step 2 touches the filesystem, and only to check for presence.
//! A rendered name always lands inside `key_path`, even if it starts with `/`.

use crate::config::Config;
use crate::error::KeychainError;
use crate::identify::RepositoryReference;
use crate::template::KeyNameTemplate;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Pick the key file for a repository
pub fn resolve(config: &Config, repo: &RepositoryReference) -> Result<PathBuf, KeychainError> {
    resolve_with(config, repo, |path| path.exists())
}

/// Pick the key file, using `exists` for the naming-convention presence check
pub fn resolve_with<F>(
    config: &Config,
    repo: &RepositoryReference,
    exists: F,
) -> Result<PathBuf, KeychainError>
where
    F: FnOnce(&Path) -> bool,
{
    if let Some(key) = config.keys.get(&repo.to_string()) {
        tracing::debug!(key = %key, "Found key via custom keys map");
        return Ok(PathBuf::from(key));
    }

    let vars = HashMap::from([
        ("account", repo.account.as_str()),
        ("repository", repo.repository.as_str()),
    ]);
    let key_name = KeyNameTemplate::parse(&config.key_name_format)?.render(&vars)?;
    let candidate = config
        .key_path
        .join(key_name.trim_start_matches(std::path::is_separator));

    tracing::debug!(
        key_name = %key_name,
        path = %candidate.display(),
        "Generated key name"
    );

    if exists(&candidate) {
        tracing::debug!(path = %candidate.display(), "Found key via generated key name");
        return Ok(candidate);
    }

    if !config.fallback_key.is_empty() {
        tracing::debug!(key = %config.fallback_key, "Using fallback key");
        return Ok(PathBuf::from(&config.fallback_key));
    }

    Err(KeychainError::NoKeyAvailable)
}
