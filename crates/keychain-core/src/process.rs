//! Launching the real SSH client
//!
//! The launcher is a pass-through: stdio is inherited, the key is injected
//! with `-i`, and every other argument reaches SSH untouched.

use std::ffi::{OsStr, OsString};
use std::path::Path;
use std::process::{Command, ExitStatus};
use thiserror::Error;

/// Failure to start the SSH client
#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("failed to run {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

/// Runs the configured SSH client with a specific identity file
#[derive(Debug, Clone)]
pub struct SshLauncher {
    command: String,
}

impl SshLauncher {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    /// Build the argument list: `-i <key>` followed by the forwarded arguments
    pub fn args<I, S>(key: &Path, forwarded: I) -> Vec<OsString>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut args = vec![OsString::from("-i"), key.as_os_str().to_os_string()];
        args.extend(forwarded.into_iter().map(|a| a.as_ref().to_os_string()));
        args
    }

    /// Run SSH to completion and return its exit code
    pub fn run<I, S>(&self, key: &Path, forwarded: I) -> Result<i32, LaunchError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let args = Self::args(key, forwarded);
        tracing::debug!(command = %self.command, ?args, "Running SSH");

        let status = Command::new(&self.command)
            .args(&args)
            .status()
            .map_err(|source| LaunchError::Spawn {
                command: self.command.clone(),
                source,
            })?;

        Ok(exit_code(status))
    }
}

/// Map an exit status to a process exit code, shell style for signals
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    1
}
