use std::path::{Path, PathBuf};

use crate::core::cancel::CancelToken;
use crate::core::error::SyncError;
use crate::core::lease::ForceLease;
use crate::core::ports::FileSystem;

/// An existing working directory, identified by its absolute path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryRef {
    path: PathBuf,
}

impl RepositoryRef {
    /// Resolve `path` against the current directory and check it exists
    ///
    /// # Errors
    /// * `SyncError::NotADirectory` - Nothing usable exists at `path`
    /// * `SyncError::FileSystem` - The current directory cannot be read
    pub fn resolve(fs: &dyn FileSystem, path: &Path) -> Result<Self, SyncError> {
        let path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            fs.current_dir()?.join(path)
        };

        if !fs.is_dir(&path) {
            return Err(SyncError::NotADirectory(path));
        }

        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Final path component, used to derive the hosted repository name
    pub fn dir_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|name| name.to_str())
    }
}

/// A repository plus the message its changes are committed with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRequest {
    repository: RepositoryRef,
    message: String,
}

impl CommitRequest {
    /// # Errors
    /// * `SyncError::EmptyCommitMessage` - The message is blank after trimming
    pub fn new(repository: RepositoryRef, message: &str) -> Result<Self, SyncError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(SyncError::EmptyCommitMessage);
        }

        Ok(Self {
            repository,
            message: message.to_string(),
        })
    }

    pub fn repository(&self) -> &RepositoryRef {
        &self.repository
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// What the engine's push entry point receives
///
/// `force` is only ever set from a lease the caller got back from an earlier
/// `NeedsPull` answer; a plain request never overwrites remote history.
#[derive(Debug, Clone)]
pub struct SyncRequest {
    pub commit: CommitRequest,
    pub force: Option<ForceLease>,
    pub cancel: Option<CancelToken>,
}

impl SyncRequest {
    pub fn new(commit: CommitRequest) -> Self {
        Self {
            commit,
            force: None,
            cancel: None,
        }
    }

    #[must_use]
    pub fn with_force(mut self, lease: ForceLease) -> Self {
        self.force = Some(lease);
        self
    }

    #[must_use]
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn path(&self) -> &Path {
        self.commit.repository().path()
    }
}
