use std::path::Path;
use std::sync::Arc;

use crate::configs::Config;
use crate::core::cancel::CancelToken;
use crate::core::error::SyncError;
use crate::core::inspector::StateInspector;
use crate::core::lease::ForceLease;
use crate::core::outcome::{PullReport, Stage, SyncOutcome};
use crate::core::patterns::{self, CommitClass, PushClass};
use crate::core::ports::{FileSystem, ProcessRunner};
use crate::core::provisioner::{RemoteProvisioner, RepoSeed};
use crate::core::remote::{self, RemoteDescriptor};
use crate::core::repo_state::{Divergence, RepoState};
use crate::core::request::{CommitRequest, RepositoryRef, SyncRequest};
use crate::core::tool::Tool;

/// An error plus the step it ended
struct StageFailure {
    stage: Stage,
    error: SyncError,
}

trait AtStage<T> {
    fn at(self, stage: Stage) -> Result<T, StageFailure>;
}

impl<T, E: Into<SyncError>> AtStage<T> for Result<T, E> {
    fn at(self, stage: Stage) -> Result<T, StageFailure> {
        self.map_err(|error| StageFailure {
            stage,
            error: error.into(),
        })
    }
}

/// Tools for one call, all bound to that call's cancel token
struct Session {
    git: Tool,
    inspector: StateInspector,
    provisioner: RemoteProvisioner,
}

/// Commits, publishes and reconciles one working directory with its remote
///
/// Holds no per-repository state; every call rebuilds what it needs from the
/// working directory, so the same engine serves any number of paths.
pub struct SyncEngine {
    runner: Arc<dyn ProcessRunner>,
    fs: Arc<dyn FileSystem>,
    config: Config,
}

impl SyncEngine {
    pub fn new(runner: Arc<dyn ProcessRunner>, fs: Arc<dyn FileSystem>, config: Config) -> Self {
        Self { runner, fs, config }
    }

    fn session(&self, cancel: Option<CancelToken>) -> Session {
        let git = Tool::new(self.runner.clone(), &self.config.git_program, cancel.clone());
        let gh = Tool::new(self.runner.clone(), &self.config.hosting_program, cancel);

        Session {
            inspector: StateInspector::new(git.clone(), self.fs.clone(), &self.config),
            provisioner: RemoteProvisioner::new(git.clone(), gh, self.fs.clone(), &self.config),
            git,
        }
    }

    /// Validate raw input, then push
    ///
    /// A blank message or a missing directory ends at `Stage::Validate`
    /// before any program runs.
    pub fn push_message(&self, path: &Path, message: &str, force: Option<ForceLease>) -> SyncOutcome {
        let request = RepositoryRef::resolve(self.fs.as_ref(), path)
            .and_then(|repository| CommitRequest::new(repository, message));

        match request {
            Ok(commit) => {
                let mut request = SyncRequest::new(commit);
                if let Some(lease) = force {
                    request = request.with_force(lease);
                }
                self.push(&request)
            }
            Err(error) => SyncOutcome::Failure {
                stage: Stage::Validate,
                error,
            },
        }
    }

    /// Commit local edits and publish them
    ///
    /// Steps run in order and the first failure ends the call; nothing that
    /// already happened is undone.
    pub fn push(&self, request: &SyncRequest) -> SyncOutcome {
        match self.run_push(request) {
            Ok(outcome) => outcome,
            Err(StageFailure { stage, error }) => {
                tracing::warn!("Push of {} stopped at {stage}: {error}", request.path().display());
                SyncOutcome::Failure { stage, error }
            }
        }
    }

    fn run_push(&self, request: &SyncRequest) -> Result<SyncOutcome, StageFailure> {
        let path = request.path();
        let session = self.session(request.cancel.clone());
        let inspector = &session.inspector;

        let mut initialized = false;
        if !inspector.is_repository(path) {
            tracing::info!("Initializing Git repository in {}", path.display());
            let output = session
                .git
                .run(path, ["init", "-b", self.config.default_branch.as_str()])
                .at(Stage::Init)?;
            if !output.success() {
                return Err(SyncError::InitFailed {
                    output: output.text(),
                })
                .at(Stage::Init);
            }
            initialized = true;
        }

        if self.config.mark_safe_directory {
            inspector.mark_safe_directory(path).at(Stage::Init)?;
        }

        let branch = inspector.current_branch(path).at(Stage::Inspect)?;
        let has_remote = inspector.has_remote(path).at(Stage::Inspect)?;

        if inspector.working_tree_dirty(path).at(Stage::Inspect)? {
            if let Some(outcome) = Self::commit(&session, request)? {
                return Ok(outcome);
            }
        } else if !Self::has_unpublished_work(inspector, path, &branch, has_remote, request)? {
            tracing::info!("Nothing to commit in {}", path.display());
            return Ok(SyncOutcome::NothingToCommit);
        }

        let provisioned = if has_remote {
            None
        } else {
            let seed = RepoSeed::for_repository(request.commit.repository(), &self.config)
                .at(Stage::Provision)?;
            Some(
                session
                    .provisioner
                    .provision(path, &seed)
                    .at(Stage::Provision)?,
            )
        };

        let pushed = match (&request.force, has_remote) {
            (Some(lease), true) => self.force_push(&session, path, &branch, lease)?,
            (Some(_), false) => {
                tracing::debug!("Remote was just created; pushing without a lease");
                self.plain_push(&session, path, &branch)?
            }
            (None, _) => self.plain_push(&session, path, &branch)?,
        };
        let detail = match pushed {
            Pushed::Done(detail) => detail,
            Pushed::NeedsPull(outcome) => return Ok(outcome),
        };

        Ok(self.success(&session, path, &branch, detail, initialized, provisioned))
    }

    /// Decide whether a clean tree still has commits worth pushing
    ///
    /// A clean tree skips the commit, but a previous call may have committed
    /// and then stopped at the push. Only a tree with no commits, or one the
    /// remote already has, counts as nothing to do.
    fn has_unpublished_work(
        inspector: &StateInspector,
        path: &Path,
        branch: &str,
        has_remote: bool,
        request: &SyncRequest,
    ) -> Result<bool, StageFailure> {
        if !inspector.has_commits(path).at(Stage::Inspect)? {
            return Ok(false);
        }
        if !has_remote || request.force.is_some() {
            return Ok(true);
        }

        let divergence = inspector.divergence(path, branch).at(Stage::Inspect)?;
        Ok(!matches!(divergence, Some(Divergence { ahead: 0, .. })))
    }

    /// Stage everything and commit; `Some` ends the push early
    fn commit(session: &Session, request: &SyncRequest) -> Result<Option<SyncOutcome>, StageFailure> {
        let path = request.path();

        let added = session.git.run(path, ["add", "-A"]).at(Stage::Stage)?;
        if !added.success() {
            return Err(SyncError::StageFailed {
                output: added.text(),
            })
            .at(Stage::Stage);
        }

        let committed = session
            .git
            .run(path, ["commit", "-m", request.commit.message()])
            .at(Stage::Commit)?;

        match patterns::classify_commit(&committed) {
            CommitClass::Committed => {
                tracing::info!("Committed changes in {}", path.display());
                Ok(None)
            }
            CommitClass::NothingToCommit => Ok(Some(SyncOutcome::NothingToCommit)),
            CommitClass::Failed => Err(SyncError::CommitFailed {
                output: committed.text(),
            })
            .at(Stage::Commit),
        }
    }

    fn plain_push(&self, session: &Session, path: &Path, branch: &str) -> Result<Pushed, StageFailure> {
        let remote = self.config.remote.as_str();
        tracing::info!("Pushing {branch} to {remote}");

        let output = session.git.run(path, ["push", remote, branch]).at(Stage::Push)?;

        match patterns::classify_push(&output) {
            PushClass::Pushed => Ok(Pushed::Done(output.text())),
            PushClass::Rejected | PushClass::StaleLease => {
                tracing::info!("Push rejected; the remote has commits this copy lacks");
                Ok(Pushed::NeedsPull(Self::needs_pull(session, path, branch)?))
            }
            PushClass::Failed => Err(SyncError::PushFailed {
                output: output.text(),
            })
            .at(Stage::Push),
        }
    }

    /// Describe the divergence and hand out a lease on the remote head just seen
    fn needs_pull(session: &Session, path: &Path, branch: &str) -> Result<SyncOutcome, StageFailure> {
        let inspector = &session.inspector;

        let divergence = inspector
            .divergence(path, branch)
            .at(Stage::Push)?
            .unwrap_or_default();
        let lease = inspector
            .remote_head(path, branch)
            .at(Stage::Push)?
            .map(|head| ForceLease::new(branch, head));

        Ok(SyncOutcome::NeedsPull {
            ahead: divergence.ahead,
            behind: divergence.behind,
            can_force_push: lease.is_some(),
            lease,
        })
    }

    fn force_push(
        &self,
        session: &Session,
        path: &Path,
        branch: &str,
        lease: &ForceLease,
    ) -> Result<Pushed, StageFailure> {
        let inspector = &session.inspector;
        let remote = self.config.remote.as_str();

        if lease.branch() != branch {
            tracing::warn!("Lease for {} offered while on {branch}", lease.branch());
            return Err(SyncError::InvalidBranch(lease.branch().to_string())).at(Stage::Push);
        }

        let fetched = inspector.fetch(path).at(Stage::Push)?;
        if !fetched.success() {
            return Err(SyncError::PushFailed {
                output: fetched.text(),
            })
            .at(Stage::Push);
        }

        let actual = inspector.remote_head(path, branch).at(Stage::Push)?;
        if actual.as_deref() != Some(lease.remote_head()) {
            return Err(SyncError::StaleForceLease {
                branch: branch.to_string(),
                expected: lease.remote_head().to_string(),
                actual,
            })
            .at(Stage::Push);
        }

        let discarded = inspector
            .count_divergence(path, branch)
            .at(Stage::Push)?
            .map_or(0, |divergence| divergence.behind);
        tracing::warn!(
            "Force pushing {branch} to {remote}: overwriting {} and discarding {discarded} remote commit(s)",
            lease.remote_head()
        );

        let output = session
            .git
            .run(path, ["push", lease.git_arg().as_str(), remote, branch])
            .at(Stage::Push)?;

        match patterns::classify_push(&output) {
            PushClass::Pushed => Ok(Pushed::Done(output.text())),
            PushClass::StaleLease => Err(SyncError::StaleForceLease {
                branch: branch.to_string(),
                expected: lease.remote_head().to_string(),
                actual: None,
            })
            .at(Stage::Push),
            PushClass::Rejected | PushClass::Failed => Err(SyncError::PushFailed {
                output: output.text(),
            })
            .at(Stage::Push),
        }
    }

    fn success(
        &self,
        session: &Session,
        path: &Path,
        branch: &str,
        detail: String,
        initialized: bool,
        provisioned: Option<RemoteDescriptor>,
    ) -> SyncOutcome {
        let web_url = match session.inspector.remote_url(path) {
            Ok(url) => url.map(|url| remote::web_url_for(&url)),
            Err(e) => {
                tracing::debug!("Could not read the remote URL: {e}");
                None
            }
        };

        let mut message = String::new();
        if initialized {
            message.push_str("Initialized Git repository. ");
        }
        if provisioned.is_some() {
            message.push_str("Created new remote repository. ");
        }
        message.push_str(&format!("Changes pushed to {}/{branch}.", self.config.remote));

        SyncOutcome::Success {
            message,
            detail,
            web_url,
            initialized,
            provisioned,
        }
    }

    /// Merge the remote branch into a clean working tree
    ///
    /// # Errors
    /// * `SyncError::NotARepository` / `SyncError::NoRemote` - Nothing to pull from
    /// * `SyncError::UncommittedChangesBlockPull` - Local edits could be lost; `git pull` is not run
    /// * `SyncError::InvalidBranch` - `branch` looks like an option
    /// * `SyncError::PullFailed` - git refused, including merge conflicts
    pub fn pull(
        &self,
        path: &Path,
        branch: Option<&str>,
        cancel: Option<CancelToken>,
    ) -> Result<PullReport, SyncError> {
        let repository = RepositoryRef::resolve(self.fs.as_ref(), path)?;
        let path = repository.path();
        let session = self.session(cancel);
        let inspector = &session.inspector;

        if !inspector.is_repository(path) {
            return Err(SyncError::NotARepository(path.to_path_buf()));
        }
        if !inspector.has_remote(path)? {
            return Err(SyncError::NoRemote(path.to_path_buf()));
        }

        let status = inspector.status_lines(path)?;
        if !status.is_empty() {
            return Err(SyncError::UncommittedChangesBlockPull { status });
        }

        let branch = match branch {
            Some(branch) => branch.trim().to_string(),
            None => inspector.current_branch(path)?,
        };
        if branch.is_empty() || branch.starts_with('-') {
            return Err(SyncError::InvalidBranch(branch));
        }

        let remote = self.config.remote.as_str();
        tracing::info!("Pulling {remote}/{branch} into {}", path.display());
        let output = session.git.run(
            path,
            ["pull", "--no-rebase", "--no-edit", remote, branch.as_str()],
        )?;
        if !output.success() {
            return Err(SyncError::PullFailed {
                output: output.text(),
            });
        }

        Ok(PullReport {
            branch,
            detail: output.text(),
        })
    }

    /// Current state of a working directory, fetching first
    ///
    /// # Errors
    /// * `SyncError::NotADirectory` - `path` does not exist
    /// * `SyncError::Process` - A query could not run at all
    pub fn status(&self, path: &Path, cancel: Option<CancelToken>) -> Result<RepoState, SyncError> {
        let repository = RepositoryRef::resolve(self.fs.as_ref(), path)?;
        let session = self.session(cancel);
        Ok(session.inspector.snapshot(repository.path())?)
    }
}

enum Pushed {
    Done(String),
    NeedsPull(SyncOutcome),
}
