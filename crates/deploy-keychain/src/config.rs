//! Configuration loading
//!
//! Config files (first one found wins):
//! - ~/.deploy-keychain/deploy-keychain.yaml (or .yml)
//! - ./deploy-keychain.yaml (or .yml)
//!
//! Fields missing from the file keep their defaults.

use crate::error::ConfigError;
use keychain_core::Paths;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Default key file name format
pub const DEFAULT_KEY_NAME_FORMAT: &str = "{account}-{repository}.pem";

/// Default SSH client
pub const DEFAULT_SSH_COMMAND: &str = "ssh";

/// Resolved deploy-keychain configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory searched for keys named by `key_name_format`
    pub key_path: PathBuf,

    /// File name format for per-repository keys
    pub key_name_format: String,

    /// Explicit keys, keyed by "account/repository"
    pub keys: HashMap<String, String>,

    /// SSH client to run
    pub ssh_command: String,

    /// Key used when nothing else matches (empty for none)
    pub fallback_key: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            key_path: PathBuf::new(),
            key_name_format: DEFAULT_KEY_NAME_FORMAT.to_string(),
            keys: HashMap::new(),
            ssh_command: DEFAULT_SSH_COMMAND.to_string(),
            fallback_key: String::new(),
        }
    }
}

/// On-disk config file; every field optional
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    key_path: Option<PathBuf>,
    key_name_format: Option<String>,
    keys: Option<HashMap<String, String>>,
    ssh_command: Option<String>,
    fallback_key: Option<String>,
}

impl Config {
    /// Defaults for the given paths (key_path under the home directory)
    pub fn with_defaults(paths: &Paths) -> Self {
        Self {
            key_path: paths.key_dir().unwrap_or_default(),
            ..Self::default()
        }
    }

    /// Load configuration using explicit paths
    ///
    /// Without a home directory only the working directory is searched and
    /// `key_path` stays empty.
    pub fn load_with(paths: &Paths) -> Result<Self, ConfigError> {
        if paths.home.is_none() {
            tracing::warn!("Unable to determine the user's home directory");
        }

        match paths.config_candidates().into_iter().find(|p| p.is_file()) {
            Some(path) => Self::load_from(&path, paths),
            None => {
                tracing::debug!(search = ?paths.config_dirs(), "No config file found, using defaults");
                Ok(Self::with_defaults(paths))
            }
        }
    }

    /// Load a specific config file on top of the defaults for `paths`
    pub fn load_from(path: &Path, paths: &Paths) -> Result<Self, ConfigError> {
        Self::with_defaults(paths).merge_file(path)
    }

    /// Overlay the fields set in a config file onto `self`
    fn merge_file(mut self, path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let file: ConfigFile = if content.trim().is_empty() {
            ConfigFile::default()
        } else {
            serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?
        };

        if let Some(key_path) = file.key_path {
            self.key_path = key_path;
        }
        if let Some(format) = file.key_name_format {
            self.key_name_format = format;
        }
        if let Some(keys) = file.keys {
            self.keys = keys;
        }
        if let Some(command) = file.ssh_command {
            self.ssh_command = command;
        }
        if let Some(fallback) = file.fallback_key {
            self.fallback_key = fallback;
        }

        tracing::debug!(path = %path.display(), config = ?self, "Config loaded");
        Ok(self)
    }
}
