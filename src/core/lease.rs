use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LeaseError {
    #[error("Malformed force lease '{0}': expected <branch>:<commit sha>")]
    Malformed(String),
}

/// Permission to overwrite one specific remote branch tip
///
/// Handed out with every `NeedsPull` answer. A force push must present it
/// back; if the remote has moved since, the lease no longer matches and the
/// push is refused instead of discarding commits nobody has seen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForceLease {
    branch: String,
    remote_head: String,
}

impl ForceLease {
    pub fn new(branch: impl Into<String>, remote_head: impl Into<String>) -> Self {
        Self {
            branch: branch.into(),
            remote_head: remote_head.into(),
        }
    }

    pub fn branch(&self) -> &str {
        &self.branch
    }

    pub fn remote_head(&self) -> &str {
        &self.remote_head
    }

    /// Argument for `git push` that makes git itself re-check the lease
    pub fn git_arg(&self) -> String {
        format!("--force-with-lease={}:{}", self.branch, self.remote_head)
    }
}

impl fmt::Display for ForceLease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.branch, self.remote_head)
    }
}

impl FromStr for ForceLease {
    type Err = LeaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let malformed = || LeaseError::Malformed(trimmed.to_string());

        let (branch, sha) = trimmed.rsplit_once(':').ok_or_else(malformed)?;

        // sha1 or sha256 object names
        let sha_ok = matches!(sha.len(), 40 | 64) && sha.chars().all(|c| c.is_ascii_hexdigit());
        if branch.is_empty() || branch.starts_with('-') || !sha_ok {
            return Err(malformed());
        }

        Ok(Self::new(branch, sha.to_ascii_lowercase()))
    }
}
