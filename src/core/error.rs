use std::path::PathBuf;

use thiserror::Error;

use crate::core::ports::{FileSystemError, ProcessError};
use crate::core::provisioner::ProvisionError;

/// Everything that can stop a synchronization call
///
/// Variants carrying `output` hold the tool's raw text so an operator can see
/// exactly what git said.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Please enter a commit message")]
    EmptyCommitMessage,

    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("Not a Git repository: {}", .0.display())]
    NotARepository(PathBuf),

    #[error("No remote is configured for {}", .0.display())]
    NoRemote(PathBuf),

    #[error("Invalid branch name '{0}'")]
    InvalidBranch(String),

    #[error("Failed to initialize Git repository:\n{output}")]
    InitFailed { output: String },

    #[error("Failed to stage changes:\n{output}")]
    StageFailed { output: String },

    #[error("Failed to commit changes:\n{output}")]
    CommitFailed { output: String },

    #[error("Could not set up the remote repository: {0}")]
    Provision(#[from] ProvisionError),

    #[error(
        "The remote has {behind} commit(s) you do not have (you are {ahead} ahead). Pull first, or force push to overwrite them"
    )]
    PushRejectedNeedsPull { ahead: u32, behind: u32 },

    #[error("Failed to push changes:\n{output}")]
    PushFailed { output: String },

    #[error(
        "The remote branch '{branch}' moved since the force push was offered (expected {expected}, found {}). Review the new commits first",
        .actual.as_deref().unwrap_or("nothing")
    )]
    StaleForceLease {
        branch: String,
        expected: String,
        actual: Option<String>,
    },

    #[error("You have uncommitted changes that might be lost. Commit them first, then pull:\n{}", .status.join("\n"))]
    UncommittedChangesBlockPull { status: Vec<String> },

    #[error("Failed to pull changes:\n{output}")]
    PullFailed { output: String },

    #[error(transparent)]
    Process(#[from] ProcessError),

    #[error("File system error: {0}")]
    FileSystem(#[from] FileSystemError),
}

impl SyncError {
    /// True when the operation was stopped by the caller rather than by a failure
    pub fn is_cancelled(&self) -> bool {
        matches!(self, SyncError::Process(ProcessError::Cancelled { .. }))
    }

    pub fn is_timed_out(&self) -> bool {
        matches!(self, SyncError::Process(ProcessError::TimedOut { .. }))
    }
}
