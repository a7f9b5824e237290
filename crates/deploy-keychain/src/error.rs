//! Error types for deploy-keychain

use crate::template::TemplateError;
use std::path::PathBuf;
use thiserror::Error;

/// Failures while choosing a key for the current invocation
#[derive(Error, Debug)]
pub enum KeychainError {
    #[error("unable to identify repository")]
    RepositoryNotIdentified,

    #[error("no key available for this repository")]
    NoKeyAvailable,

    #[error("invalid key name format: {0}")]
    KeyNameFormat(#[from] TemplateError),
}

/// Failures while loading the config file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config from {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}
