//! deploy-keychain - Per-repository deploy keys for Git over SSH
//!
//! Git runs this tool in place of `ssh`. It reads the remote command line
//! Git hands to SSH (`git-upload-pack 'account/repo.git'`), picks the
//! private key for that repository, and runs the real SSH client with
//! `-i <key>` prepended.
//!
//! Keys are found in order:
//! - an explicit `keys` entry for `account/repository`
//! - a file named by `key_name_format` inside `key_path`
//! - the `fallback_key`, if one is configured

pub mod config;
pub mod error;
pub mod identify;
pub mod resolve;
pub mod settings;
pub mod template;

pub use config::Config;
pub use error::{ConfigError, KeychainError};
pub use identify::{identify, RepositoryReference};
pub use resolve::resolve;
pub use settings::Settings;
pub use template::{KeyNameTemplate, TemplateError};
