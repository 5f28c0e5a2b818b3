use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::configs::Config;
use crate::core::cancel::CancelToken;
use crate::core::error::SyncError;
use crate::core::inspector::StateInspector;
use crate::core::ports::{FileSystem, ProcessRunner};
use crate::core::remote::RemoteDescriptor;
use crate::core::request::RepositoryRef;
use crate::core::tool::Tool;

const SLEEP_SLICE: Duration = Duration::from_millis(50);

/// The remote has commits the working directory lacks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub behind: u32,
    pub branch: String,
    /// Commit list of the remote branch in a browser
    pub view_url: String,
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "The remote has {} new commit(s) on {}. Review them at {}",
            self.behind, self.branch, self.view_url
        )
    }
}

pub struct DivergenceNotifier {
    runner: Arc<dyn ProcessRunner>,
    fs: Arc<dyn FileSystem>,
    config: Config,
}

impl DivergenceNotifier {
    pub fn new(runner: Arc<dyn ProcessRunner>, fs: Arc<dyn FileSystem>, config: Config) -> Self {
        Self { runner, fs, config }
    }

    /// One fetch-and-compare
    ///
    /// # Returns
    /// * `Ok(None)` - Not a repository, no remote, remote unreachable, or nothing new
    ///
    /// # Errors
    /// * `SyncError::NotADirectory` - `path` does not exist
    /// * `SyncError::Process` - git could not run at all
    pub fn check(
        &self,
        path: &Path,
        cancel: Option<CancelToken>,
    ) -> Result<Option<Notification>, SyncError> {
        let repository = RepositoryRef::resolve(self.fs.as_ref(), path)?;
        let path = repository.path();
        let git = Tool::new(self.runner.clone(), &self.config.git_program, cancel);
        let inspector = StateInspector::new(git, self.fs.clone(), &self.config);

        if !inspector.is_repository(path) || !inspector.has_remote(path)? {
            return Ok(None);
        }

        let branch = inspector.current_branch(path)?;
        let behind = match inspector.divergence(path, &branch)? {
            Some(divergence) if divergence.behind > 0 => divergence.behind,
            _ => return Ok(None),
        };

        let Some(url) = inspector.remote_url(path)? else {
            tracing::debug!("{} has no URL for {}", path.display(), inspector.remote());
            return Ok(None);
        };

        let view_url = RemoteDescriptor::from_url(&url).map_or_else(
            |_| format!("{}/commits/{branch}", url.trim()),
            |descriptor| descriptor.commits_url(&branch),
        );

        Ok(Some(Notification {
            behind,
            branch,
            view_url,
        }))
    }

    /// Check every `interval` until cancelled or `rounds` checks have run
    ///
    /// `on_notify` fires when a check first finds remote commits and again
    /// whenever their count changes; an unchanged count stays quiet.
    /// Returns how many notifications were delivered.
    ///
    /// A check that times out counts as an unknown divergence and the
    /// watch goes on.
    ///
    /// # Errors
    /// The first error from [`Self::check`] other than cancellation or a timeout.
    pub fn watch<F>(
        &self,
        path: &Path,
        interval: Duration,
        rounds: Option<u32>,
        cancel: &CancelToken,
        mut on_notify: F,
    ) -> Result<u32, SyncError>
    where
        F: FnMut(&Notification),
    {
        let mut delivered = 0;
        let mut last_behind = None;
        let mut completed = 0;

        while !cancel.is_cancelled() {
            match self.check(path, Some(cancel.clone())) {
                Ok(Some(notification)) => {
                    if last_behind != Some(notification.behind) {
                        last_behind = Some(notification.behind);
                        on_notify(&notification);
                        delivered += 1;
                    }
                }
                Ok(None) => last_behind = None,
                Err(e) if e.is_cancelled() => break,
                Err(e) if e.is_timed_out() => {
                    tracing::warn!("Check of {} gave up: {e}", path.display());
                    last_behind = None;
                }
                Err(e) => return Err(e),
            }

            completed += 1;
            if rounds.is_some_and(|limit| completed >= limit) {
                break;
            }

            let deadline = Instant::now() + interval;
            while !cancel.is_cancelled() {
                let now = Instant::now();
                if now >= deadline {
                    break;
                }
                thread::sleep(SLEEP_SLICE.min(deadline - now));
            }
        }

        tracing::debug!("Stopped watching {} after {completed} check(s)", path.display());
        Ok(delivered)
    }
}
