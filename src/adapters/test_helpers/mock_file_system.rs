//! Mock filesystem for testing
//!
//! Provides an in-memory filesystem simulation with basic operations.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::core::ports::{FileSystem, FileSystemError};

/// Mock entry in the filesystem
#[derive(Debug, Clone)]
enum MockFsEntry {
    Dir,
    File(String),
}

/// Mock filesystem for testing
///
/// Parent directories are not created implicitly; tests add what they need.
pub struct MockFileSystem {
    entries: Mutex<HashMap<PathBuf, MockFsEntry>>,
    home_dir: PathBuf,
    current_dir: PathBuf,
    force_error: Mutex<Option<FileSystemError>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        let mut entries = HashMap::new();
        entries.insert(PathBuf::from("/"), MockFsEntry::Dir);

        Self {
            entries: Mutex::new(entries),
            home_dir: PathBuf::from("/home/testuser"),
            current_dir: PathBuf::from("/home/testuser/work"),
            force_error: Mutex::new(None),
        }
    }

    pub fn add_file_with_content(&self, path: impl AsRef<Path>, content: &str) {
        self.entries.lock().unwrap().insert(
            path.as_ref().to_path_buf(),
            MockFsEntry::File(content.to_string()),
        );
    }

    /// Add a directory to the mock filesystem
    pub fn add_dir(&self, path: impl AsRef<Path>) {
        self.entries
            .lock()
            .unwrap()
            .insert(path.as_ref().to_path_buf(), MockFsEntry::Dir);
    }

    /// Add a git repository to the mock filesystem
    pub fn add_git_repo(&self, path: impl AsRef<Path>) {
        let path = path.as_ref().to_path_buf();
        self.add_dir(&path);
        self.add_dir(path.join(".git"));
    }

    /// Content of a file, if one was added or written
    pub fn content(&self, path: impl AsRef<Path>) -> Option<String> {
        match self.entries.lock().unwrap().get(path.as_ref()) {
            Some(MockFsEntry::File(content)) => Some(content.clone()),
            _ => None,
        }
    }

    /// Inject an error to be returned on the next fallible operation
    pub fn inject_error(&self, error: FileSystemError) {
        *self.force_error.lock().unwrap() = Some(error);
    }

    fn check_error(&self) -> Result<(), FileSystemError> {
        if let Some(err) = self.force_error.lock().unwrap().take() {
            return Err(err);
        }
        Ok(())
    }
}

impl Default for MockFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem for MockFileSystem {
    fn exists(&self, path: &Path) -> bool {
        self.entries.lock().unwrap().contains_key(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        matches!(self.entries.lock().unwrap().get(path), Some(MockFsEntry::Dir))
    }

    fn is_git_repository(&self, path: &Path) -> bool {
        self.exists(&path.join(".git"))
    }

    fn home_dir(&self) -> Result<PathBuf, FileSystemError> {
        self.check_error()?;
        Ok(self.home_dir.clone())
    }

    fn current_dir(&self) -> Result<PathBuf, FileSystemError> {
        self.check_error()?;
        Ok(self.current_dir.clone())
    }

    fn read_to_string(&self, path: &Path) -> Result<Option<String>, FileSystemError> {
        self.check_error()?;

        match self.entries.lock().unwrap().get(path) {
            Some(MockFsEntry::File(content)) => Ok(Some(content.clone())),
            Some(MockFsEntry::Dir) => Err(FileSystemError::Io(std::io::Error::new(
                std::io::ErrorKind::IsADirectory,
                "Is a directory",
            ))),
            None => Ok(None),
        }
    }

    fn write(&self, path: &Path, content: &str) -> Result<(), FileSystemError> {
        self.check_error()?;
        self.add_file_with_content(path, content);
        Ok(())
    }
}
