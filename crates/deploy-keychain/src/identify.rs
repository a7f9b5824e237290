//! Repository identification from SSH arguments
//!
//! Git invokes SSH with the remote command as a single argument, e.g.
//! `git-upload-pack 'nint8835/deploy-keychain.git'`. Each argument is split
//! on spaces and every piece is tested against the repository pattern.

use crate::error::KeychainError;
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Optional quote, optional leading slash, `account/repository.git`, optional quote
const REPOSITORY_PATTERN: &str = r"^'?/?(.+)/(.+)\.git'?$";

fn repository_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(REPOSITORY_PATTERN).expect("repository pattern is valid"))
}

/// The repository a Git command is operating on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryReference {
    pub account: String,
    pub repository: String,
}

impl RepositoryReference {
    pub fn new(account: impl Into<String>, repository: impl Into<String>) -> Self {
        Self {
            account: account.into(),
            repository: repository.into(),
        }
    }
}

/// Formats as "account/repository", the lookup key for the explicit `keys` map
impl fmt::Display for RepositoryReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.account, self.repository)
    }
}

/// Match a single space-free token against the repository pattern
fn match_token(token: &str) -> Option<RepositoryReference> {
    let caps = repository_regex().captures(token)?;
    Some(RepositoryReference::new(&caps[1], &caps[2]))
}

/// Find the repository named in the arguments Git passed to SSH
///
/// The first matching token wins, scanning arguments in order and the
/// space-separated pieces of each argument in order.
pub fn identify<S: AsRef<str>>(args: &[S]) -> Result<RepositoryReference, KeychainError> {
    let found = args
        .iter()
        .flat_map(|arg| arg.as_ref().split(' '))
        .find_map(match_token);

    match found {
        Some(reference) => {
            tracing::debug!(
                account = %reference.account,
                repository = %reference.repository,
                "Found repository details"
            );
            Ok(reference)
        }
        None => Err(KeychainError::RepositoryNotIdentified),
    }
}
