//! Runtime settings read from the environment

/// Environment variable enabling debug output on stderr
pub const DEBUG_ENV: &str = "DEPLOY_KEYCHAIN_DEBUG";

/// Per-invocation settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Settings {
    /// Write diagnostics to stderr
    pub debug: bool,
}

impl Settings {
    /// Read settings from the process environment
    pub fn from_env() -> Self {
        Self::from_debug_value(std::env::var(DEBUG_ENV).ok().as_deref())
    }

    /// Build settings from the raw value of `DEPLOY_KEYCHAIN_DEBUG`
    ///
    /// Unset, empty, or unrecognised values leave debug off.
    pub fn from_debug_value(value: Option<&str>) -> Self {
        Self {
            debug: value.and_then(parse_bool).unwrap_or(false),
        }
    }
}

/// Parse the usual spellings of a boolean
pub fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}
