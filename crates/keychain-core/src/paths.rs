//! Standard paths used by deploy-keychain

use std::path::PathBuf;

/// Base name of the config file, without extension
pub const CONFIG_NAME: &str = "deploy-keychain";

/// Config file extensions, in lookup order
pub const CONFIG_EXTENSIONS: &[&str] = &["yaml", "yml"];

/// Standard deploy-keychain paths
#[derive(Debug, Clone)]
pub struct Paths {
    /// User's home directory, if one could be determined
    pub home: Option<PathBuf>,
    /// Directory searched after the home config directory (".")
    pub working: PathBuf,
}

impl Default for Paths {
    fn default() -> Self {
        Self::new()
    }
}

impl Paths {
    pub fn new() -> Self {
        Self {
            home: dirs::home_dir(),
            working: PathBuf::from("."),
        }
    }

    /// Build paths rooted at explicit directories
    pub fn with_dirs(home: Option<PathBuf>, working: PathBuf) -> Self {
        Self { home, working }
    }

    /// Default directory holding per-repository keys (~/.ssh/deploy-keys)
    pub fn key_dir(&self) -> Option<PathBuf> {
        self.home.as_ref().map(|h| h.join(".ssh").join("deploy-keys"))
    }

    /// Directories searched for the config file, in priority order
    pub fn config_dirs(&self) -> Vec<PathBuf> {
        let mut dirs = Vec::with_capacity(2);
        if let Some(home) = &self.home {
            dirs.push(home.join(".deploy-keychain"));
        }
        dirs.push(self.working.clone());
        dirs
    }

    /// Every candidate config file, in priority order
    pub fn config_candidates(&self) -> Vec<PathBuf> {
        self.config_dirs()
            .into_iter()
            .flat_map(|dir| {
                CONFIG_EXTENSIONS
                    .iter()
                    .map(move |ext| dir.join(format!("{}.{}", CONFIG_NAME, ext)))
            })
            .collect()
    }
}
