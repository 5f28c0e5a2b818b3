use std::sync::Arc;

use crate::configs::{ConfigError, ConfigLayer, provider::ConfigProvider};
use crate::core::ports::FileSystem;

const RC_FILE_NAME: &str = ".reposyncrc";

/// Provider for ~/.reposyncrc configuration file
///
/// Reads and parses a TOML file at `~/.reposyncrc`, for example:
///
/// ```toml
/// default_branch = "main"
/// local_prefix = "ktwp-"
/// hosted_prefix = "ktwp-wp-plugin-"
/// description_prefix = "WordPress plugin: "
/// timeout_secs = 120
/// ```
pub struct RcFileProvider {
    fs: Arc<dyn FileSystem>,
}

impl RcFileProvider {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }
}

impl ConfigProvider for RcFileProvider {
    fn load(&self) -> Result<ConfigLayer, ConfigError> {
        let rc_path = self.fs.home_dir()?.join(RC_FILE_NAME);

        // If file doesn't exist, leave every key to the next provider
        let content = match self.fs.read_to_string(&rc_path) {
            Ok(Some(content)) => content,
            Ok(None) => return Ok(ConfigLayer::default()),
            Err(e) => return Err(ConfigError::Io(format!("Failed to read {RC_FILE_NAME}: {e}"))),
        };

        // Parse TOML - any parse error should stop immediately
        toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse {RC_FILE_NAME}: {e}")))
    }
}
