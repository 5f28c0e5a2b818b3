use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf, absolute};

use crate::core::ports::{FileSystem, FileSystemError};

#[derive(Debug)]
pub struct UnixFs;

impl UnixFs {
    pub fn new() -> Self {
        Self
    }
}

impl Default for UnixFs {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem for UnixFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_git_repository(&self, path: &Path) -> bool {
        let git_path = path.join(".git");
        git_path.is_dir() || git_path.is_file()
    }

    fn home_dir(&self) -> Result<PathBuf, FileSystemError> {
        dirs::home_dir()
            .and_then(|path| absolute(&path).ok())
            .ok_or_else(|| FileSystemError::PathError("Home directory not found".into()))
    }

    fn current_dir(&self) -> Result<PathBuf, FileSystemError> {
        let dir = std::env::current_dir()?;
        Ok(dir)
    }

    fn read_to_string(&self, path: &Path) -> Result<Option<String>, FileSystemError> {
        match fs::read_to_string(path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, path: &Path, content: &str) -> Result<(), FileSystemError> {
        fs::write(path, content)?;
        Ok(())
    }
}
