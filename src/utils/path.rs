pub use std::path::absolute;
use std::path::PathBuf;

use crate::configs::ConfigError;

/// Get the home directory path
///
/// Uses the `dirs` crate for cross-platform home directory detection.
pub fn home_dir() -> Option<PathBuf> {
    dirs::home_dir().and_then(|path| absolute(&path).ok())
}

/// Get the home directory path or return an error
///
/// This is a convenience wrapper around `home_dir()` that returns
/// a `ConfigError` instead of `None`.
pub fn require_home_dir() -> Result<PathBuf, ConfigError> {
    home_dir().ok_or_else(|| ConfigError::Path("Home directory not found".into()))
}

/// Normalize a configured path string to an absolute ``PathBuf``
///
/// # Path Resolution Rules
///
/// - `~` or `~/path`: Expanded to home directory
/// - `/absolute/path`: Used as-is (absolute path)
/// - `relative/path`: **Resolved from HOME directory** (not current working directory)
///
/// Relative paths are resolved against the home directory so a value in
/// `~/.reposyncrc` means the same thing wherever the command is run from.
///
/// # Examples
///
/// ```ignore
/// normalize_path("~/licenses/gpl.txt")?;  // -> /home/user/licenses/gpl.txt
/// normalize_path("/etc/reposync/LICENSE")?; // -> /etc/reposync/LICENSE
/// normalize_path("templates/LICENSE")?;   // -> /home/user/templates/LICENSE
/// ```
///
/// # Errors
///
/// Returns `ConfigError::Path` if:
/// - The path is empty after trimming
/// - Home directory cannot be found
/// - Path starts with `~` but is not `~` or `~/...` (e.g., `~user/path`)
/// - Path cannot be converted to an absolute path
pub fn normalize_path(path_str: &str) -> Result<PathBuf, ConfigError> {
    let path_str = path_str.trim();

    if path_str.is_empty() {
        return Err(ConfigError::Path("Empty path".into()));
    }

    let path = if path_str.starts_with('~') {
        let home = require_home_dir()?;

        if path_str.len() == 1 {
            home
        } else if let Some(subpath) = path_str.strip_prefix("~/") {
            home.join(subpath)
        } else {
            return Err(ConfigError::Path(format!(
                "Path '{path_str}' is not supported. Use absolute path or ~/path format.",
            )));
        }
    } else {
        let path = PathBuf::from(path_str);
        if path.is_absolute() {
            path
        } else {
            require_home_dir()?.join(path)
        }
    };

    absolute(&path).map_err(|e| ConfigError::Path(e.to_string()))
}
