use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RemoteError {
    #[error("Invalid remote URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid repository name '{0}': only letters, digits and hyphens are allowed")]
    InvalidRepoName(String),
}

/// Where a repository lives on the hosting service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteDescriptor {
    pub host: String,
    pub owner: String,
    pub repo_name: String,
    pub url: String,
}

impl RemoteDescriptor {
    /// Describe a repository about to be created on `host`
    ///
    /// The clone URL follows the `https://{host}/{owner}/{repo_name}` form.
    pub fn new(host: &str, owner: &str, repo_name: &str) -> Result<Self, RemoteError> {
        if !is_valid_slug(repo_name) {
            return Err(RemoteError::InvalidRepoName(repo_name.to_string()));
        }

        Ok(Self {
            host: host.to_string(),
            owner: owner.to_string(),
            repo_name: repo_name.to_string(),
            url: format!("https://{host}/{owner}/{repo_name}"),
        })
    }

    /// Parse a configured remote URL
    ///
    /// examples of supported URL formats:
    /// - <https://host/owner/repo.git>
    /// - <ssh://git@host/owner/repo.git>
    /// - <git@host:owner/repo.git>
    pub fn from_url(url: &str) -> Result<Self, RemoteError> {
        let trimmed = url.trim();

        let formats = [
            ("https://", "/"),
            ("http://", "/"),
            ("ssh://git@", "/"),
            ("git@", ":"),
        ];

        for (prefix, separator) in formats {
            if let Some(without_scheme) = trimmed.strip_prefix(prefix) {
                let Some((host, path)) = without_scheme.split_once(separator) else {
                    return Err(RemoteError::InvalidUrl(format!(
                        "Expected format: {prefix}host{separator}owner/repo, got: {trimmed}",
                    )));
                };

                // credentials embedded in https URLs: https://token@host/...
                let host = host.rsplit('@').next().unwrap_or(host);

                let mut segments = path.trim_end_matches('/').split('/');
                let (Some(owner), Some(repo), None) =
                    (segments.next(), segments.next(), segments.next())
                else {
                    return Err(RemoteError::InvalidUrl(format!(
                        "Expected format: {prefix}host{separator}owner/repo, got: {trimmed}",
                    )));
                };

                let repo = repo.trim_end_matches(".git");
                if host.is_empty() || owner.is_empty() || repo.is_empty() {
                    return Err(RemoteError::InvalidUrl(trimmed.to_string()));
                }

                return Ok(Self {
                    host: host.to_string(),
                    owner: owner.to_string(),
                    repo_name: repo.to_string(),
                    url: trimmed.to_string(),
                });
            }
        }

        Err(RemoteError::InvalidUrl(format!(
            "Unsupported URL format. Supported: https://, git@, ssh://. Got: {trimmed}",
        )))
    }

    /// Browser address of the repository, without any `.git` suffix
    pub fn web_url(&self) -> String {
        format!("https://{}/{}/{}", self.host, self.owner, self.repo_name)
    }

    pub fn commits_url(&self, branch: &str) -> String {
        format!("{}/commits/{branch}", self.web_url())
    }
}

/// Best-effort browser address for whatever URL a remote is configured with
///
/// Remotes that are not on a recognized host (local paths, odd schemes) are
/// returned unchanged.
pub fn web_url_for(remote_url: &str) -> String {
    RemoteDescriptor::from_url(remote_url)
        .map(|descriptor| descriptor.web_url())
        .unwrap_or_else(|_| remote_url.trim().to_string())
}

pub fn is_valid_slug(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// Derive the hosted repository name from the local directory name
///
/// `local_prefix` is removed when present, then `hosted_prefix` is prepended:
/// `ktwp-foo` with prefixes `ktwp-` / `ktwp-wp-plugin-` becomes
/// `ktwp-wp-plugin-foo`.
pub fn derive_repo_name(
    dir_name: &str,
    local_prefix: &str,
    hosted_prefix: &str,
) -> Result<String, RemoteError> {
    let stem = dir_name.strip_prefix(local_prefix).unwrap_or(dir_name);
    let name = format!("{hosted_prefix}{stem}");

    if is_valid_slug(&name) {
        Ok(name)
    } else {
        Err(RemoteError::InvalidRepoName(name))
    }
}
