use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;

use crate::configs::Config;
use crate::core::inspector::StateInspector;
use crate::core::patterns::{self, CommitClass};
use crate::core::ports::{FileSystem, FileSystemError, ProcessError, ProcessOutput};
use crate::core::remote::{self, RemoteDescriptor, RemoteError};
use crate::core::request::RepositoryRef;
use crate::core::tool::Tool;

#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("The repository has no commits yet")]
    NoCommits,

    #[error("Failed to add {file}:\n{output}")]
    Bootstrap { file: String, output: String },

    #[error("The hosting CLI is not logged in. Run `gh auth login` first:\n{output}")]
    NotAuthenticated { output: String },

    #[error("A repository named '{name}' already exists on the hosting service")]
    AlreadyExists { name: String },

    #[error("Failed to create the remote repository:\n{output}")]
    CreateFailed { output: String },

    #[error("Could not determine the hosting account:\n{output}")]
    UserLookupFailed { output: String },

    #[error("Failed to add the remote:\n{output}")]
    RemoteAddFailed { output: String },

    #[error(transparent)]
    InvalidRepoName(#[from] RemoteError),

    #[error(transparent)]
    Process(#[from] ProcessError),

    #[error("File system error: {0}")]
    FileSystem(#[from] FileSystemError),
}

const DEFAULT_LICENSE: &str = "\
This program is free software: you can redistribute it and/or modify
it under the terms of the GNU General Public License as published by
the Free Software Foundation, either version 3 of the License, or
(at your option) any later version.

This program is distributed in the hope that it will be useful,
but WITHOUT ANY WARRANTY; without even the implied warranty of
MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
GNU General Public License for more details.

You should have received a copy of the GNU General Public License
along with this program.  If not, see <https://www.gnu.org/licenses/>.
";

/// Name and description of the hosted repository to create
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSeed {
    pub repo_name: String,
    pub description: String,
}

impl RepoSeed {
    /// # Errors
    /// * `ProvisionError::InvalidRepoName` - The derived name is not a valid slug
    pub fn for_repository(repository: &RepositoryRef, config: &Config) -> Result<Self, ProvisionError> {
        let dir_name = repository.dir_name().ok_or_else(|| {
            RemoteError::InvalidRepoName(repository.path().display().to_string())
        })?;

        Ok(Self {
            repo_name: remote::derive_repo_name(
                dir_name,
                &config.local_prefix,
                &config.hosted_prefix,
            )?,
            description: format!("{}{dir_name}", config.description_prefix),
        })
    }
}

#[derive(Deserialize)]
struct HostingUser {
    login: String,
}

/// Creates the hosted repository for a local one that has no remote yet
pub struct RemoteProvisioner {
    git: Tool,
    gh: Tool,
    fs: Arc<dyn FileSystem>,
    inspector: StateInspector,
    config: Config,
}

impl RemoteProvisioner {
    pub fn new(git: Tool, gh: Tool, fs: Arc<dyn FileSystem>, config: &Config) -> Self {
        let inspector = StateInspector::new(git.clone(), fs.clone(), config);
        Self {
            git,
            gh,
            fs,
            inspector,
            config: config.clone(),
        }
    }

    /// Make sure `path` has a hosted remote, creating one when missing
    ///
    /// Bootstrap commits made along the way stay in place if a later step fails.
    ///
    /// # Errors
    /// * `ProvisionError::NoCommits` - Nothing has been committed yet
    /// * `ProvisionError::NotAuthenticated` - `gh auth status` failed
    /// * `ProvisionError::AlreadyExists` - The hosted name is taken
    /// * Any other `ProvisionError` carrying the failing tool's output
    pub fn provision(&self, path: &Path, seed: &RepoSeed) -> Result<RemoteDescriptor, ProvisionError> {
        if self.inspector.has_remote(path)? {
            tracing::debug!("{} already has a remote", path.display());
            let url = self.inspector.remote_url(path)?.unwrap_or_default();
            return Ok(RemoteDescriptor::from_url(&url)?);
        }

        if !self.inspector.has_commits(path)? {
            return Err(ProvisionError::NoCommits);
        }

        let license = self.license_text()?;
        self.bootstrap_file(path, "LICENSE", &license, "Add LICENSE file")?;

        let readme = format!("# {}\n\n{}\n", seed.repo_name, seed.description);
        self.bootstrap_file(path, "README.md", &readme, "Add README.md")?;

        let auth = self.gh.run(path, ["auth", "status"])?;
        if !auth.success() {
            return Err(ProvisionError::NotAuthenticated {
                output: auth.text(),
            });
        }

        tracing::info!("Creating remote repository {}", seed.repo_name);
        let created = self.gh.run(
            path,
            [
                "repo",
                "create",
                seed.repo_name.as_str(),
                "--public",
                "--description",
                seed.description.as_str(),
            ],
        )?;
        if !created.success() {
            if patterns::repo_already_exists(&created) {
                return Err(ProvisionError::AlreadyExists {
                    name: seed.repo_name.clone(),
                });
            }
            return Err(ProvisionError::CreateFailed {
                output: created.text(),
            });
        }

        let owner = self.lookup_owner(path)?;
        let descriptor = RemoteDescriptor::new(&self.config.host, &owner, &seed.repo_name)?;

        let added = self.git.run(
            path,
            [
                "remote",
                "add",
                self.config.remote.as_str(),
                descriptor.url.as_str(),
            ],
        )?;
        if !added.success() {
            tracing::warn!(
                "{} was created but could not be added as {}",
                descriptor.url,
                self.config.remote
            );
            return Err(ProvisionError::RemoteAddFailed {
                output: added.text(),
            });
        }

        tracing::info!("Remote {} set to {}", self.config.remote, descriptor.url);
        Ok(descriptor)
    }

    fn license_text(&self) -> Result<String, ProvisionError> {
        let Some(template) = &self.config.license_template else {
            return Ok(DEFAULT_LICENSE.to_string());
        };

        self.fs
            .read_to_string(template)?
            .ok_or_else(|| ProvisionError::Bootstrap {
                file: "LICENSE".into(),
                output: format!("License template not found: {}", template.display()),
            })
    }

    /// Write and commit `file` unless it is already present
    fn bootstrap_file(
        &self,
        path: &Path,
        file: &str,
        content: &str,
        message: &str,
    ) -> Result<(), ProvisionError> {
        let target = path.join(file);
        if self.fs.exists(&target) {
            return Ok(());
        }

        self.fs.write(&target, content)?;

        let bootstrap_error = |output: &ProcessOutput| ProvisionError::Bootstrap {
            file: file.to_string(),
            output: output.text(),
        };

        let added = self.git.run(path, ["add", "--", file])?;
        if !added.success() {
            return Err(bootstrap_error(&added));
        }

        let committed = self.git.run(path, ["commit", "-m", message, "--", file])?;
        match patterns::classify_commit(&committed) {
            CommitClass::Committed => {
                tracing::info!("Committed {file}");
                Ok(())
            }
            CommitClass::NothingToCommit | CommitClass::Failed => Err(bootstrap_error(&committed)),
        }
    }

    fn lookup_owner(&self, path: &Path) -> Result<String, ProvisionError> {
        let output = self.gh.run(path, ["api", "user"])?;
        let lookup_failed = || ProvisionError::UserLookupFailed {
            output: output.text(),
        };

        if !output.success() {
            return Err(lookup_failed());
        }

        let user: HostingUser = serde_json::from_str(&output.text()).map_err(|_| lookup_failed())?;
        if user.login.is_empty() {
            return Err(lookup_failed());
        }
        Ok(user.login)
    }
}
