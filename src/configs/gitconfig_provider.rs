use crate::configs::{ConfigError, ConfigLayer, provider::ConfigProvider};

/// Provider for ~/.gitconfig configuration
///
/// Reads keys from the `[reposync]` section.
///
/// Example configuration:
///
/// ```ini
/// [reposync]
///     defaultBranch = main
///     hostedPrefix = ktwp-wp-plugin-
///     markSafeDirectory = true
/// ```
pub struct GitConfigProvider {
    config: Option<git2::Config>,
    open_error: Option<String>,
}

impl GitConfigProvider {
    pub fn open_default() -> Self {
        match git2::Config::open_default() {
            Ok(config) => Self::from_config(config),
            // If .gitconfig doesn't exist, skip to next provider
            Err(e) if e.code() == git2::ErrorCode::NotFound => Self {
                config: None,
                open_error: None,
            },
            Err(e) => Self {
                config: None,
                open_error: Some(e.to_string()),
            },
        }
    }

    /// String lookups only work on a read-only snapshot of the config
    pub fn from_config(mut config: git2::Config) -> Self {
        match config.snapshot() {
            Ok(snapshot) => Self {
                config: Some(snapshot),
                open_error: None,
            },
            Err(e) => Self {
                config: None,
                open_error: Some(e.to_string()),
            },
        }
    }
}

fn string_key(config: &git2::Config, key: &str) -> Result<Option<String>, ConfigError> {
    match config.get_string(key) {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
        Err(e) => Err(ConfigError::GitConfig(format!("{key}: {e}"))),
    }
}

fn bool_key(config: &git2::Config, key: &str) -> Result<Option<bool>, ConfigError> {
    match config.get_bool(key) {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
        Err(e) => Err(ConfigError::GitConfig(format!("{key}: {e}"))),
    }
}

impl ConfigProvider for GitConfigProvider {
    fn load(&self) -> Result<ConfigLayer, ConfigError> {
        if let Some(error) = &self.open_error {
            return Err(ConfigError::GitConfig(error.clone()));
        }
        let Some(config) = &self.config else {
            return Ok(ConfigLayer::default());
        };

        let timeout_secs = match config.get_i64("reposync.timeout") {
            Ok(secs) => Some(u64::try_from(secs).map_err(|_| {
                ConfigError::GitConfig(format!("reposync.timeout must not be negative: {secs}"))
            })?),
            Err(e) if e.code() == git2::ErrorCode::NotFound => None,
            Err(e) => return Err(ConfigError::GitConfig(e.to_string())),
        };

        Ok(ConfigLayer {
            git_program: string_key(config, "reposync.gitProgram")?,
            hosting_program: string_key(config, "reposync.hostingProgram")?,
            host: string_key(config, "reposync.host")?,
            remote: string_key(config, "reposync.remote")?,
            default_branch: string_key(config, "reposync.defaultBranch")?,
            local_prefix: string_key(config, "reposync.localPrefix")?,
            hosted_prefix: string_key(config, "reposync.hostedPrefix")?,
            description_prefix: string_key(config, "reposync.descriptionPrefix")?,
            license_template: string_key(config, "reposync.licenseTemplate")?,
            timeout_secs,
            mark_safe_directory: bool_key(config, "reposync.markSafeDirectory")?,
        })
    }
}
