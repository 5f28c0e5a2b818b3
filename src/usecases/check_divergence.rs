use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::configs::Config;
use crate::core::ports::{FileSystem, ProcessRunner, UserInteraction};
use crate::core::{CancelToken, DivergenceNotifier};
use crate::errors::AppError;

pub struct CheckDivergenceUseCase {
    runner: Arc<dyn ProcessRunner>,
    fs: Arc<dyn FileSystem>,
    ui: Arc<dyn UserInteraction>,
}

impl CheckDivergenceUseCase {
    pub fn new(
        runner: Arc<dyn ProcessRunner>,
        fs: Arc<dyn FileSystem>,
        ui: Arc<dyn UserInteraction>,
    ) -> Self {
        Self { runner, fs, ui }
    }

    fn notifier(&self, config: &Config) -> DivergenceNotifier {
        DivergenceNotifier::new(self.runner.clone(), self.fs.clone(), config.clone())
    }

    pub fn execute(&self, config: &Config, path: &Path) -> Result<(), AppError> {
        match self.notifier(config).check(path, None)? {
            Some(notification) => self.ui.print(&notification.to_string()),
            None => self.ui.print("No new commits on the remote."),
        }
        Ok(())
    }

    /// Keep checking until `cancel` fires or `rounds` checks have run
    pub fn watch(
        &self,
        config: &Config,
        path: &Path,
        interval: Duration,
        rounds: Option<u32>,
        cancel: &CancelToken,
    ) -> Result<(), AppError> {
        self.ui.print(&format!(
            "Watching {} every {}s",
            path.display(),
            interval.as_secs()
        ));

        let delivered = self
            .notifier(config)
            .watch(path, interval, rounds, cancel, |notification| {
                self.ui.print(&notification.to_string());
            })?;

        if delivered == 0 {
            self.ui.print("No new commits on the remote.");
        }
        Ok(())
    }
}
