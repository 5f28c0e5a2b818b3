use std::sync::Arc;

use crate::adapters::{SystemRunner, TerminalInteraction, UnixFs};
use crate::configs::Config;
use crate::core::ports::{FileSystem, ProcessRunner, UserInteraction};

pub struct AppContainer {
    pub runner: Arc<dyn ProcessRunner>,
    pub fs: Arc<dyn FileSystem>,
    pub ui: Arc<dyn UserInteraction>,
}

impl AppContainer {
    pub fn new(fs: Arc<dyn FileSystem>, config: &Config) -> Self {
        Self {
            runner: Arc::new(SystemRunner::with_timeout(config.process_timeout)),
            fs,
            ui: Arc::new(TerminalInteraction::new()),
        }
    }

    /// Load configuration from the real environment and wire the system adapters
    ///
    /// # Errors
    /// Propagates any configuration source that fails to parse.
    pub fn load() -> Result<(Self, Config), crate::configs::ConfigError> {
        let fs: Arc<dyn FileSystem> = Arc::new(UnixFs::new());
        let config = Config::load(fs.clone())?;
        Ok((Self::new(fs, &config), config))
    }
}
