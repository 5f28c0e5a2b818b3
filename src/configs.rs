//! Configuration management for reposync
//!
//! This module provides a unified `Config` struct assembled from several
//! sources. Every source may set any subset of keys; for each key the
//! highest-priority source that sets it wins. The internal provider
//! implementations are private to enforce the standard loading pattern.
//!
//! # Configuration Priority
//!
//! 1. Environment variables `REPOSYNC_*`
//! 2. `~/.reposyncrc` (TOML format)
//! 3. `~/.gitconfig` ([reposync] section)
//! 4. Built-in defaults

// Internal provider implementations (private)
mod default_provider;
mod env_provider;
mod gitconfig_provider;
mod rcfile_provider;
pub(crate) mod provider; // Available within crate for testing

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::core::ports::{FileSystem, FileSystemError};
use crate::utils::path;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Failed to read config: {0}")]
    Io(String),

    #[error("Git config error: {0}")]
    GitConfig(String),

    #[error("Environment variable error: {0}")]
    Env(String),

    #[error("Invalid config value: {0}")]
    Invalid(String),

    #[error("Path error: {0}")]
    Path(String),

    #[error("File system error: {0}")]
    FileSystem(#[from] FileSystemError),
}

/// Keys a single configuration source may provide
///
/// Also the on-disk shape of `~/.reposyncrc`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigLayer {
    pub git_program: Option<String>,
    pub hosting_program: Option<String>,
    pub host: Option<String>,
    pub remote: Option<String>,
    pub default_branch: Option<String>,
    pub local_prefix: Option<String>,
    pub hosted_prefix: Option<String>,
    pub description_prefix: Option<String>,
    pub license_template: Option<String>,
    pub timeout_secs: Option<u64>,
    pub mark_safe_directory: Option<bool>,
}

impl ConfigLayer {
    /// Fill every key this layer leaves unset from `lower`
    #[must_use]
    pub fn or(self, lower: ConfigLayer) -> ConfigLayer {
        ConfigLayer {
            git_program: self.git_program.or(lower.git_program),
            hosting_program: self.hosting_program.or(lower.hosting_program),
            host: self.host.or(lower.host),
            remote: self.remote.or(lower.remote),
            default_branch: self.default_branch.or(lower.default_branch),
            local_prefix: self.local_prefix.or(lower.local_prefix),
            hosted_prefix: self.hosted_prefix.or(lower.hosted_prefix),
            description_prefix: self.description_prefix.or(lower.description_prefix),
            license_template: self.license_template.or(lower.license_template),
            timeout_secs: self.timeout_secs.or(lower.timeout_secs),
            mark_safe_directory: self.mark_safe_directory.or(lower.mark_safe_directory),
        }
    }
}

/// reposync configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Version-control program, normally `git`
    pub git_program: String,
    /// Hosting-service CLI, normally `gh`
    pub hosting_program: String,
    /// Host used when composing URLs for newly created repositories
    pub host: String,
    /// Name of the single tracked remote
    pub remote: String,
    /// Branch for fresh repositories and fallback when HEAD cannot be read
    pub default_branch: String,
    /// Stripped from the directory name when deriving the hosted name
    pub local_prefix: String,
    /// Prepended to the hosted repository name
    pub hosted_prefix: String,
    /// Hosted repository description is this prefix plus the directory name
    pub description_prefix: String,
    /// File whose content replaces the built-in LICENSE text
    pub license_template: Option<PathBuf>,
    /// Upper bound for any single subprocess
    pub process_timeout: Option<Duration>,
    /// Register repositories in git's global `safe.directory` list
    pub mark_safe_directory: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            git_program: "git".into(),
            hosting_program: "gh".into(),
            host: "github.com".into(),
            remote: "origin".into(),
            default_branch: "main".into(),
            local_prefix: String::new(),
            hosted_prefix: String::new(),
            description_prefix: "Project: ".into(),
            license_template: None,
            process_timeout: None,
            mark_safe_directory: false,
        }
    }
}

impl Config {
    /// Load configuration from every source
    ///
    /// Priority order:
    /// 1. ENV `REPOSYNC_*`
    /// 2. ~/.reposyncrc (TOML format)
    /// 3. ~/.gitconfig ([reposync] section)
    /// 4. Built-in defaults
    ///
    /// # Errors
    /// Any source that exists but cannot be parsed stops loading.
    pub fn load(fs: Arc<dyn FileSystem>) -> Result<Self, ConfigError> {
        use provider::ConfigProvider;

        let providers: Vec<Box<dyn ConfigProvider>> = vec![
            Box::new(env_provider::EnvProvider::from_env()),
            Box::new(rcfile_provider::RcFileProvider::new(fs.clone())),
            Box::new(gitconfig_provider::GitConfigProvider::open_default()),
            Box::new(default_provider::DefaultProvider),
        ];

        Self::from_providers(&providers)
    }

    pub(crate) fn from_providers(
        providers: &[Box<dyn provider::ConfigProvider>],
    ) -> Result<Self, ConfigError> {
        let mut merged = ConfigLayer::default();
        for provider in providers {
            // Parse error - stop immediately
            let layer = provider.load()?;
            merged = merged.or(layer);
        }

        Self::from_layer(merged)
    }

    /// Build a configuration, using defaults for anything `layer` leaves unset
    ///
    /// # Errors
    /// * `ConfigError::Invalid` - A branch or remote name that git would read as an option
    /// * `ConfigError::Path` - The license template path cannot be normalized
    pub fn from_layer(layer: ConfigLayer) -> Result<Self, ConfigError> {
        let defaults = Config::default();

        let remote = layer.remote.unwrap_or(defaults.remote);
        let default_branch = layer.default_branch.unwrap_or(defaults.default_branch);
        for (key, value) in [("remote", &remote), ("default_branch", &default_branch)] {
            if value.trim().is_empty() || value.starts_with('-') {
                return Err(ConfigError::Invalid(format!("{key} = '{value}'")));
            }
        }

        let license_template = layer
            .license_template
            .as_deref()
            .map(path::normalize_path)
            .transpose()?;

        Ok(Self {
            git_program: layer.git_program.unwrap_or(defaults.git_program),
            hosting_program: layer.hosting_program.unwrap_or(defaults.hosting_program),
            host: layer.host.unwrap_or(defaults.host),
            remote,
            default_branch,
            local_prefix: layer.local_prefix.unwrap_or(defaults.local_prefix),
            hosted_prefix: layer.hosted_prefix.unwrap_or(defaults.hosted_prefix),
            description_prefix: layer.description_prefix.unwrap_or(defaults.description_prefix),
            license_template,
            process_timeout: layer
                .timeout_secs
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
            mark_safe_directory: layer.mark_safe_directory.unwrap_or(defaults.mark_safe_directory),
        })
    }
}
