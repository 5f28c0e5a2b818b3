use std::path::Path;
use std::sync::Arc;

use crate::configs::Config;
use crate::core::ports::{FileSystem, ProcessRunner, UserInteraction};
use crate::core::{ForceLease, SyncEngine, SyncError, SyncOutcome};
use crate::errors::AppError;

pub struct PushChangesUseCase {
    runner: Arc<dyn ProcessRunner>,
    fs: Arc<dyn FileSystem>,
    ui: Arc<dyn UserInteraction>,
}

impl PushChangesUseCase {
    pub fn new(
        runner: Arc<dyn ProcessRunner>,
        fs: Arc<dyn FileSystem>,
        ui: Arc<dyn UserInteraction>,
    ) -> Self {
        Self { runner, fs, ui }
    }

    /// Commit and publish the directory at `path`
    ///
    /// With `force`, a rejected push is followed by a confirmation prompt and,
    /// only on an explicit yes, a force push bound to the lease just returned.
    pub fn execute(
        &self,
        config: &Config,
        path: &Path,
        message: &str,
        lease: Option<ForceLease>,
        force: bool,
    ) -> Result<(), AppError> {
        let engine = SyncEngine::new(self.runner.clone(), self.fs.clone(), config.clone());

        match engine.push_message(path, message, lease) {
            SyncOutcome::NeedsPull {
                ahead,
                behind,
                lease,
                ..
            } => {
                self.ui.print(&format!(
                    "The remote has {behind} commit(s) that are not in your copy, and you have {ahead} that are not on the remote."
                ));

                let Some(lease) = lease else {
                    self.ui.print("Pull first to merge the remote changes.");
                    return Err(SyncError::PushRejectedNeedsPull { ahead, behind }.into());
                };

                if !force {
                    self.ui.print("Pull first to merge the remote changes, or overwrite them with:");
                    self.ui.print(&format!("  --lease {lease}"));
                    return Err(SyncError::PushRejectedNeedsPull { ahead, behind }.into());
                }

                self.ui.print_error(&format!(
                    "Warning: a force push permanently discards the {behind} remote commit(s)."
                ));
                if !self.ui.confirm("Force push anyway?")? {
                    return Err(SyncError::PushRejectedNeedsPull { ahead, behind }.into());
                }

                let outcome = engine.push_message(path, message, Some(lease));
                self.report(outcome)
            }
            outcome => self.report(outcome),
        }
    }

    fn report(&self, outcome: SyncOutcome) -> Result<(), AppError> {
        match outcome {
            SyncOutcome::Success {
                message,
                detail,
                web_url,
                ..
            } => {
                if !detail.is_empty() {
                    self.ui.print(&detail);
                }
                self.ui.print(&message);
                if let Some(url) = web_url {
                    self.ui.print(&format!("View it at {url}"));
                }
                Ok(())
            }
            SyncOutcome::NothingToCommit => {
                self.ui.print("No changes to commit.");
                Ok(())
            }
            SyncOutcome::NeedsPull { ahead, behind, .. } => {
                Err(SyncError::PushRejectedNeedsPull { ahead, behind }.into())
            }
            SyncOutcome::Failure { stage, error } => Err(AppError::Push {
                stage,
                source: error,
            }),
        }
    }
}
