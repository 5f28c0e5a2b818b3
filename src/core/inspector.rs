use std::path::Path;
use std::sync::Arc;

use crate::configs::Config;
use crate::core::ports::{FileSystem, ProcessError, ProcessOutput};
use crate::core::repo_state::{Divergence, RepoState};
use crate::core::tool::Tool;

/// Reads repository state from `git` output
///
/// Every query names its repository explicitly and leaves no trace in this
/// process; nothing is remembered between calls.
pub struct StateInspector {
    git: Tool,
    fs: Arc<dyn FileSystem>,
    remote: String,
    default_branch: String,
}

impl StateInspector {
    pub fn new(git: Tool, fs: Arc<dyn FileSystem>, config: &Config) -> Self {
        Self {
            git,
            fs,
            remote: config.remote.clone(),
            default_branch: config.default_branch.clone(),
        }
    }

    pub fn remote(&self) -> &str {
        &self.remote
    }

    fn tracking_ref(&self, branch: &str) -> String {
        format!("{}/{branch}", self.remote)
    }

    pub fn is_repository(&self, path: &Path) -> bool {
        self.fs.is_git_repository(path)
    }

    /// Branch HEAD points at, or the configured default when HEAD is unreadable
    ///
    /// # Errors
    /// Only subprocess errors (spawn failure, cancellation); a failing query
    /// falls back to the default name.
    pub fn current_branch(&self, path: &Path) -> Result<String, ProcessError> {
        let output = self.git.run(path, ["symbolic-ref", "--short", "HEAD"])?;

        match output.first_line() {
            Some(branch) if output.success() && branch != "HEAD" => Ok(branch.to_string()),
            _ => {
                tracing::debug!(
                    "HEAD is not a branch in {}, using {}",
                    path.display(),
                    self.default_branch
                );
                Ok(self.default_branch.clone())
            }
        }
    }

    /// # Errors
    /// Subprocess errors only.
    pub fn has_remote(&self, path: &Path) -> Result<bool, ProcessError> {
        let output = self.git.run(path, ["remote"])?;
        Ok(output.success() && output.first_line().is_some())
    }

    /// # Errors
    /// Subprocess errors only.
    pub fn has_commits(&self, path: &Path) -> Result<bool, ProcessError> {
        let output = self.git.run(path, ["rev-parse", "--verify", "--quiet", "HEAD"])?;
        Ok(output.success())
    }

    /// `git status --porcelain` lines
    ///
    /// A failing status call returns its own error text, so the tree reads as
    /// dirty. That keeps every caller on the cautious path.
    ///
    /// # Errors
    /// Subprocess errors only.
    pub fn status_lines(&self, path: &Path) -> Result<Vec<String>, ProcessError> {
        let output = self.git.run(path, ["status", "--porcelain"])?;
        if !output.success() {
            tracing::warn!("git status failed in {}: {}", path.display(), output.text());
        }
        Ok(output.non_empty_lines())
    }

    /// # Errors
    /// Subprocess errors only.
    pub fn working_tree_dirty(&self, path: &Path) -> Result<bool, ProcessError> {
        Ok(!self.status_lines(path)?.is_empty())
    }

    /// Update remote-tracking refs; the output is returned so callers can report it
    ///
    /// # Errors
    /// Subprocess errors only.
    pub fn fetch(&self, path: &Path) -> Result<ProcessOutput, ProcessError> {
        let output = self.git.run(path, ["fetch", self.remote.as_str()])?;
        if !output.success() {
            tracing::warn!("fetch from {} failed: {}", self.remote, output.text());
        }
        Ok(output)
    }

    fn count(&self, path: &Path, range: &str) -> Result<Option<u32>, ProcessError> {
        let output = self.git.run(path, ["rev-list", "--count", range])?;
        if !output.success() {
            return Ok(None);
        }
        Ok(output.first_line().and_then(|line| line.parse().ok()))
    }

    /// Commit counts against the already-fetched tracking branch
    ///
    /// # Returns
    /// * `Ok(None)` - The tracking branch does not exist or a count could not be read
    ///
    /// # Errors
    /// Subprocess errors only.
    pub fn count_divergence(
        &self,
        path: &Path,
        branch: &str,
    ) -> Result<Option<Divergence>, ProcessError> {
        let tracking = self.tracking_ref(branch);

        let ahead = self.count(path, &format!("{tracking}..HEAD"))?;
        let behind = self.count(path, &format!("HEAD..{tracking}"))?;

        Ok(match (ahead, behind) {
            (Some(ahead), Some(behind)) => Some(Divergence::new(ahead, behind)),
            _ => None,
        })
    }

    /// Fetch, then count commits on each side
    ///
    /// # Returns
    /// * `Ok(None)` - The fetch failed (offline, auth) or counts are unavailable;
    ///   the divergence is unknown and must not be read as "in sync"
    ///
    /// # Errors
    /// Subprocess errors only.
    pub fn divergence(&self, path: &Path, branch: &str) -> Result<Option<Divergence>, ProcessError> {
        if !self.fetch(path)?.success() {
            return Ok(None);
        }
        self.count_divergence(path, branch)
    }

    /// Commit the tracking branch points at, as of the last fetch
    ///
    /// # Errors
    /// Subprocess errors only.
    pub fn remote_head(&self, path: &Path, branch: &str) -> Result<Option<String>, ProcessError> {
        let tracking = format!("refs/remotes/{}", self.tracking_ref(branch));
        let output = self.git.run(path, ["rev-parse", "--verify", "--quiet", tracking.as_str()])?;

        Ok(output
            .success()
            .then(|| output.first_line().map(str::to_string))
            .flatten())
    }

    /// # Errors
    /// Subprocess errors only.
    pub fn remote_url(&self, path: &Path) -> Result<Option<String>, ProcessError> {
        let output = self.git.run(path, ["remote", "get-url", self.remote.as_str()])?;

        Ok(output
            .success()
            .then(|| output.first_line().map(str::to_string))
            .flatten())
    }

    /// Add `path` to the user's global `safe.directory` list unless already there
    ///
    /// # Errors
    /// Subprocess errors only; a failing config write is logged and ignored.
    pub fn mark_safe_directory(&self, path: &Path) -> Result<(), ProcessError> {
        let dir = path.to_string_lossy().to_string();

        let listed = self
            .git
            .run(path, ["config", "--global", "--get-all", "safe.directory"])?;
        if listed.lines.iter().any(|line| line.trim() == dir) {
            return Ok(());
        }

        let added = self
            .git
            .run(path, ["config", "--global", "--add", "safe.directory", dir.as_str()])?;
        if !added.success() {
            tracing::warn!("could not mark {dir} as a safe directory: {}", added.text());
        }
        Ok(())
    }

    /// Full snapshot of a working directory
    ///
    /// # Errors
    /// Subprocess errors only.
    pub fn snapshot(&self, path: &Path) -> Result<RepoState, ProcessError> {
        if !self.is_repository(path) {
            return Ok(RepoState {
                is_repository: false,
                has_remote: false,
                current_branch: self.default_branch.clone(),
                has_uncommitted_changes: false,
                divergence: None,
            });
        }

        let current_branch = self.current_branch(path)?;
        let has_remote = self.has_remote(path)?;
        let has_uncommitted_changes = self.working_tree_dirty(path)?;
        let divergence = if has_remote {
            self.divergence(path, &current_branch)?
        } else {
            None
        };

        Ok(RepoState {
            is_repository: true,
            has_remote,
            current_branch,
            has_uncommitted_changes,
            divergence,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::test_helpers::{GitSandbox, MockFileSystem, MockProcessRunner};
    use crate::adapters::{SystemRunner, UnixFs};

    fn mock_inspector() -> (Arc<MockProcessRunner>, Arc<MockFileSystem>, StateInspector) {
        let runner = Arc::new(MockProcessRunner::new());
        let fs = Arc::new(MockFileSystem::new());
        fs.add_git_repo("/repo");
        let inspector = StateInspector::new(
            Tool::new(runner.clone(), "git", None),
            fs.clone(),
            &Config::default(),
        );
        (runner, fs, inspector)
    }

    #[test]
    fn test_current_branch_falls_back_to_default() {
        let (runner, _fs, inspector) = mock_inspector();
        runner.once("git", &["symbolic-ref"], 128, "fatal: ref HEAD is not a symbolic ref");
        assert_eq!(inspector.current_branch(Path::new("/repo")).unwrap(), "main");

        runner.once("git", &["symbolic-ref"], 0, "develop");
        assert_eq!(inspector.current_branch(Path::new("/repo")).unwrap(), "develop");
    }

    #[test]
    fn test_has_remote_requires_output() {
        let (runner, _fs, inspector) = mock_inspector();
        assert!(!inspector.has_remote(Path::new("/repo")).unwrap());

        runner.on("git", &["remote"], 0, "origin");
        assert!(inspector.has_remote(Path::new("/repo")).unwrap());
    }

    #[test]
    fn test_failing_status_reads_as_dirty() {
        let (runner, _fs, inspector) = mock_inspector();
        runner.on("git", &["status"], 128, "fatal: not a git repository");
        assert!(inspector.working_tree_dirty(Path::new("/repo")).unwrap());
    }

    #[test]
    fn test_divergence_unknown_when_fetch_fails() {
        let (runner, _fs, inspector) = mock_inspector();
        runner.on("git", &["fetch"], 128, "fatal: Authentication failed");
        runner.on("git", &["rev-list"], 0, "0");

        assert_eq!(inspector.divergence(Path::new("/repo"), "main").unwrap(), None);
        assert!(!runner.was_called("git", &["rev-list"]));
    }

    #[test]
    fn test_divergence_counts_both_sides() {
        let (runner, _fs, inspector) = mock_inspector();
        runner.on("git", &["rev-list", "--count", "origin/main..HEAD"], 0, "2");
        runner.on("git", &["rev-list", "--count", "HEAD..origin/main"], 0, "3");

        assert_eq!(
            inspector.divergence(Path::new("/repo"), "main").unwrap(),
            Some(Divergence::new(2, 3))
        );
    }

    #[test]
    fn test_divergence_unknown_without_tracking_branch() {
        let (runner, _fs, inspector) = mock_inspector();
        runner.on(
            "git",
            &["rev-list"],
            128,
            "fatal: ambiguous argument 'origin/main..HEAD': unknown revision",
        );

        assert_eq!(inspector.divergence(Path::new("/repo"), "main").unwrap(), None);
    }

    #[test]
    fn test_snapshot_of_plain_directory() {
        let (runner, fs, inspector) = mock_inspector();
        fs.add_dir("/plain");

        let state = inspector.snapshot(Path::new("/plain")).unwrap();
        assert!(!state.is_repository);
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn test_mark_safe_directory_once() {
        let (runner, _fs, inspector) = mock_inspector();
        runner.on("git", &["config", "--global", "--get-all"], 0, "/repo");

        inspector.mark_safe_directory(Path::new("/repo")).unwrap();
        assert!(!runner.was_called("git", &["config", "--global", "--add"]));
    }

    fn real_inspector() -> StateInspector {
        StateInspector::new(
            Tool::new(Arc::new(SystemRunner::new()), "git", None),
            Arc::new(UnixFs::new()),
            &Config::default(),
        )
    }

    #[test]
    fn test_real_repository_in_sync() {
        let sandbox = GitSandbox::new();
        let inspector = real_inspector();

        let state = inspector.snapshot(&sandbox.local).unwrap();
        assert!(state.is_repository);
        assert!(state.has_remote);
        assert_eq!(state.current_branch, "main");
        assert!(!state.has_uncommitted_changes);
        assert_eq!(state.divergence, Some(Divergence::new(0, 0)));
    }

    #[test]
    fn test_real_repository_diverged() {
        let sandbox = GitSandbox::new();
        sandbox.publish_from_other(&["a.txt", "b.txt", "c.txt"]);
        sandbox.commit_file(&sandbox.local, "x.txt");
        sandbox.commit_file(&sandbox.local, "y.txt");
        std::fs::write(sandbox.local.join("draft.txt"), "wip").unwrap();

        let inspector = real_inspector();
        assert_eq!(
            inspector.divergence(&sandbox.local, "main").unwrap(),
            Some(Divergence::new(2, 3))
        );
        assert!(inspector.working_tree_dirty(&sandbox.local).unwrap());
        assert_eq!(
            inspector.remote_head(&sandbox.local, "main").unwrap(),
            Some(sandbox.head(&sandbox.other))
        );
    }

    #[test]
    fn test_real_unreachable_remote_is_unknown() {
        let sandbox = GitSandbox::new();
        std::fs::remove_dir_all(&sandbox.remote).unwrap();

        let inspector = real_inspector();
        assert_eq!(inspector.divergence(&sandbox.local, "main").unwrap(), None);
    }
}
