use thiserror::Error;

use crate::configs::ConfigError;
use crate::core::lease::LeaseError;
use crate::core::ports::{FileSystemError, InteractionError};
use crate::core::{Stage, SyncError};

/// Exit status for a push the remote refused until the caller pulls
pub const EXIT_NEEDS_PULL: i32 = 2;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Sync(#[from] SyncError),

    #[error("Push stopped at the {stage} step: {source}")]
    Push { stage: Stage, source: SyncError },

    #[error("{0}")]
    Lease(#[from] LeaseError),

    #[error("Input error: {0}")]
    Interaction(#[from] InteractionError),

    #[error("File system error: {0}")]
    FileSystem(#[from] FileSystemError),
}

impl AppError {
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Sync(SyncError::PushRejectedNeedsPull { .. })
            | AppError::Push {
                source: SyncError::PushRejectedNeedsPull { .. },
                ..
            } => EXIT_NEEDS_PULL,
            _ => 1,
        }
    }
}
