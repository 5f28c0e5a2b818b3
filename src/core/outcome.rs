use std::fmt;

use crate::core::error::SyncError;
use crate::core::lease::ForceLease;
use crate::core::remote::RemoteDescriptor;

/// The step of a push at which the engine stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validate,
    Init,
    Inspect,
    Stage,
    Commit,
    Provision,
    Push,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Validate => "validate",
            Stage::Init => "init",
            Stage::Inspect => "inspect",
            Stage::Stage => "stage",
            Stage::Commit => "commit",
            Stage::Provision => "provision",
            Stage::Push => "push",
        };
        f.write_str(name)
    }
}

/// Terminal answer to a push request
#[derive(Debug)]
pub enum SyncOutcome {
    Success {
        message: String,
        detail: String,
        web_url: Option<String>,
        initialized: bool,
        provisioned: Option<RemoteDescriptor>,
    },
    NothingToCommit,
    NeedsPull {
        ahead: u32,
        behind: u32,
        can_force_push: bool,
        /// Present whenever `can_force_push` is; pass it back to force push
        lease: Option<ForceLease>,
    },
    Failure {
        stage: Stage,
        error: SyncError,
    },
}

/// Result of a successful pull
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullReport {
    pub branch: String,
    pub detail: String,
}
