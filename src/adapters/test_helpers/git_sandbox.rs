//! Real repositories for tests that drive the `git` binary
//!
//! A bare remote plus two clones of it, `local` and `other`, sharing one
//! initial commit on `main`. Everything lives in a temporary directory.

use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

pub struct GitSandbox {
    root: TempDir,
    pub remote: PathBuf,
    pub local: PathBuf,
    pub other: PathBuf,
}

/// Run git in `dir` and return trimmed stdout, panicking on failure
fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .env("GIT_TERMINAL_PROMPT", "0")
        .output()
        .expect("Failed to run git");
    assert!(
        output.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn set_identity(dir: &Path) {
    git(dir, &["config", "user.email", "you@example.com"]);
    git(dir, &["config", "user.name", "Your Name"]);
}

impl GitSandbox {
    pub fn new() -> Self {
        let root = TempDir::new().unwrap();

        let remote = root.path().join("remote.git");
        std::fs::create_dir(&remote).unwrap();
        git(&remote, &["init", "--bare", "--initial-branch=main"]);

        let local = root.path().join("local");
        std::fs::create_dir(&local).unwrap();
        git(&local, &["init", "--initial-branch=main"]);
        set_identity(&local);

        let sandbox = Self {
            root,
            remote,
            local,
            other: PathBuf::new(),
        };
        sandbox.commit_file(&sandbox.local, "README.md");
        git(&sandbox.local, &["remote", "add", "origin", &sandbox.remote.to_string_lossy()]);
        git(&sandbox.local, &["push", "origin", "main"]);

        let other = sandbox.root.path().join("other");
        git(
            sandbox.root.path(),
            &["clone", &sandbox.remote.to_string_lossy(), "other"],
        );
        set_identity(&other);

        Self { other, ..sandbox }
    }

    /// Write `name` with its own name as content and commit it
    pub fn commit_file(&self, dir: &Path, name: &str) {
        std::fs::write(dir.join(name), name).unwrap();
        git(dir, &["add", name]);
        git(dir, &["commit", "-m", &format!("Add {name}")]);
    }

    /// Commit each file in `other` and push them to the remote
    pub fn publish_from_other(&self, names: &[&str]) {
        for name in names {
            self.commit_file(&self.other, name);
        }
        git(&self.other, &["push", "origin", "main"]);
    }

    pub fn head(&self, dir: &Path) -> String {
        git(dir, &["rev-parse", "HEAD"])
    }

    pub fn remote_head(&self) -> String {
        git(&self.remote, &["rev-parse", "main"])
    }
}
