use crate::configs::{ConfigError, ConfigLayer};

/// Trait for configuration providers
///
/// Each provider represents a source of configuration (environment variables,
/// config files, defaults, etc.) and reports the keys it knows about.
///
/// All providers are consulted; earlier providers take precedence key by key.
pub trait ConfigProvider {
    /// Read this configuration source
    ///
    /// # Returns
    ///
    /// - `Ok(layer)`: the keys this source sets (an empty layer when the source is absent)
    /// - `Err(e)`: the source exists but failed to parse (stop immediately)
    fn load(&self) -> Result<ConfigLayer, ConfigError>;
}
