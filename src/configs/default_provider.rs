use crate::configs::{Config, ConfigError, ConfigLayer, provider::ConfigProvider};

/// Provider for the built-in defaults
///
/// Sets every key, so it should be last in the priority chain as a fallback.
pub struct DefaultProvider;

impl ConfigProvider for DefaultProvider {
    fn load(&self) -> Result<ConfigLayer, ConfigError> {
        let defaults = Config::default();

        Ok(ConfigLayer {
            git_program: Some(defaults.git_program),
            hosting_program: Some(defaults.hosting_program),
            host: Some(defaults.host),
            remote: Some(defaults.remote),
            default_branch: Some(defaults.default_branch),
            local_prefix: Some(defaults.local_prefix),
            hosted_prefix: Some(defaults.hosted_prefix),
            description_prefix: Some(defaults.description_prefix),
            license_template: None,
            timeout_secs: None,
            mark_safe_directory: Some(defaults.mark_safe_directory),
        })
    }
}
