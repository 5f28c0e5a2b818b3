use std::path::Path;
use std::sync::Arc;

use crate::configs::Config;
use crate::core::SyncEngine;
use crate::core::ports::{FileSystem, ProcessRunner, UserInteraction};
use crate::errors::AppError;

pub struct PullChangesUseCase {
    runner: Arc<dyn ProcessRunner>,
    fs: Arc<dyn FileSystem>,
    ui: Arc<dyn UserInteraction>,
}

impl PullChangesUseCase {
    pub fn new(
        runner: Arc<dyn ProcessRunner>,
        fs: Arc<dyn FileSystem>,
        ui: Arc<dyn UserInteraction>,
    ) -> Self {
        Self { runner, fs, ui }
    }

    pub fn execute(&self, config: &Config, path: &Path, branch: Option<&str>) -> Result<(), AppError> {
        let engine = SyncEngine::new(self.runner.clone(), self.fs.clone(), config.clone());
        let report = engine.pull(path, branch, None)?;

        if !report.detail.is_empty() {
            self.ui.print(&report.detail);
        }
        self.ui.print(&format!(
            "Pulled the latest changes from {}/{}.",
            config.remote, report.branch
        ));
        Ok(())
    }
}
