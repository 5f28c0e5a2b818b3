use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum FileSystemError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Path error: {0}")]
    PathError(String),
}

pub trait FileSystem: Send + Sync {
    /// Check if a path exists
    ///
    /// # Returns
    /// * `true` if the path exists (file or directory)
    /// * `false` if the path does not exist
    fn exists(&self, path: &Path) -> bool;

    /// Check if a path is an existing directory
    fn is_dir(&self, path: &Path) -> bool;

    /// Check if a path is a git repository
    ///
    /// # Returns
    /// * `true` if the path contains a `.git` directory or file (for worktrees)
    /// * `false` otherwise
    fn is_git_repository(&self, path: &Path) -> bool;

    /// Get the home directory path
    ///
    /// # Errors
    /// * `FileSystemError::PathError` - If the home directory cannot be determined
    fn home_dir(&self) -> Result<PathBuf, FileSystemError>;

    /// Get the current working directory
    ///
    /// # Errors
    /// * `FileSystemError::Io` - If the current directory cannot be determined
    fn current_dir(&self) -> Result<PathBuf, FileSystemError>;

    /// Read a whole file as UTF-8
    ///
    /// # Returns
    /// * `Ok(None)` - The file does not exist
    /// * `Ok(Some(content))` - The file content
    ///
    /// # Errors
    /// * `FileSystemError::Io` - The file exists but cannot be read
    fn read_to_string(&self, path: &Path) -> Result<Option<String>, FileSystemError>;

    /// Create or truncate a file with the given content
    ///
    /// # Errors
    /// * `FileSystemError::Io` - If the file cannot be written
    fn write(&self, path: &Path, content: &str) -> Result<(), FileSystemError>;
}
