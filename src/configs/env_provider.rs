use std::env::VarError;

use crate::configs::{ConfigError, ConfigLayer, provider::ConfigProvider};

type Lookup = Box<dyn Fn(&str) -> Result<String, VarError>>;

/// Provider for environment variable configuration
///
/// Reads `REPOSYNC_*` variables. Unset variables leave their key to lower
/// priority sources.
pub struct EnvProvider {
    lookup: Lookup,
}

impl EnvProvider {
    pub fn from_env() -> Self {
        Self::with_lookup(|key| std::env::var(key))
    }

    pub fn with_lookup(lookup: impl Fn(&str) -> Result<String, VarError> + 'static) -> Self {
        Self {
            lookup: Box::new(lookup),
        }
    }

    fn var(&self, key: &str) -> Result<Option<String>, ConfigError> {
        match (self.lookup)(key) {
            Ok(value) => Ok(Some(value)),
            Err(VarError::NotPresent) => Ok(None),
            Err(e) => Err(ConfigError::Env(format!("{key}: {e}"))),
        }
    }
}

impl ConfigProvider for EnvProvider {
    fn load(&self) -> Result<ConfigLayer, ConfigError> {
        let timeout_secs = self
            .var("REPOSYNC_TIMEOUT")?
            .map(|raw| {
                raw.trim().parse::<u64>().map_err(|e| {
                    ConfigError::Env(format!("REPOSYNC_TIMEOUT must be whole seconds: {e}"))
                })
            })
            .transpose()?;

        Ok(ConfigLayer {
            default_branch: self.var("REPOSYNC_DEFAULT_BRANCH")?,
            remote: self.var("REPOSYNC_REMOTE")?,
            local_prefix: self.var("REPOSYNC_LOCAL_PREFIX")?,
            hosted_prefix: self.var("REPOSYNC_HOSTED_PREFIX")?,
            host: self.var("REPOSYNC_HOST")?,
            timeout_secs,
            ..ConfigLayer::default()
        })
    }
}
