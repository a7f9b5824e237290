//! Keychain Core - Shared functionality for deploy-keychain
//!
//! Standard locations (home directory, key directory, config search path)
//! and the pass-through launcher for the real SSH client.

pub mod paths;
pub mod process;

pub use paths::Paths;
pub use process::{LaunchError, SshLauncher};
