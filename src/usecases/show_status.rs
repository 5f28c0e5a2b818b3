use std::path::Path;
use std::sync::Arc;

use crate::configs::Config;
use crate::core::SyncEngine;
use crate::core::ports::{FileSystem, ProcessRunner, UserInteraction};
use crate::errors::AppError;

pub struct ShowStatusUseCase {
    runner: Arc<dyn ProcessRunner>,
    fs: Arc<dyn FileSystem>,
    ui: Arc<dyn UserInteraction>,
}

impl ShowStatusUseCase {
    pub fn new(
        runner: Arc<dyn ProcessRunner>,
        fs: Arc<dyn FileSystem>,
        ui: Arc<dyn UserInteraction>,
    ) -> Self {
        Self { runner, fs, ui }
    }

    pub fn execute(&self, config: &Config, path: &Path) -> Result<(), AppError> {
        let engine = SyncEngine::new(self.runner.clone(), self.fs.clone(), config.clone());
        let state = engine.status(path, None)?;

        self.ui.print(&format!("{}: {state}", path.display()));
        if state.divergence.is_some_and(|divergence| divergence.is_diverged()) {
            self.ui.print("Both sides have new commits. Pull to merge them before pushing.");
        } else if state.behind() > 0 {
            self.ui.print(&format!("Pull to get {} new commit(s).", state.behind()));
        } else if state.ahead() > 0 {
            self.ui.print(&format!("{} commit(s) are waiting to be pushed.", state.ahead()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::test_helpers::{MockFileSystem, MockProcessRunner, MockUserInteraction};

    #[test]
    fn test_prints_state() {
        let runner = Arc::new(MockProcessRunner::new());
        let fs = Arc::new(MockFileSystem::new());
        let ui = Arc::new(MockUserInteraction::new());
        fs.add_git_repo("/work/ktwp-foo");
        runner.on("git", &["symbolic-ref"], 0, "main");

        let usecase = ShowStatusUseCase::new(runner, fs, ui.clone());
        usecase
            .execute(&Config::default(), Path::new("/work/ktwp-foo"))
            .unwrap();

        assert_eq!(
            ui.get_printed_messages(),
            vec!["/work/ktwp-foo: branch main, no remote".to_string()]
        );
    }

    #[test]
    fn test_diverged_hint() {
        let runner = Arc::new(MockProcessRunner::new());
        let fs = Arc::new(MockFileSystem::new());
        let ui = Arc::new(MockUserInteraction::new());
        fs.add_git_repo("/work/ktwp-foo");
        runner.on("git", &["symbolic-ref"], 0, "main");
        runner.on("git", &["remote"], 0, "origin");
        runner.on("git", &["rev-list", "--count", "origin/main..HEAD"], 0, "2");
        runner.on("git", &["rev-list", "--count", "HEAD..origin/main"], 0, "3");

        ShowStatusUseCase::new(runner, fs, ui.clone())
            .execute(&Config::default(), Path::new("/work/ktwp-foo"))
            .unwrap();
        assert!(ui.has_printed("branch main, 2 ahead, 3 behind"));
        assert!(ui.has_printed("Both sides have new commits"));
    }
}
