use std::fmt;

/// One-sided commit counts between `HEAD` and the remote tracking branch
///
/// Both sides can be nonzero at once; that is a true divergence and both
/// numbers are reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Divergence {
    pub ahead: u32,
    pub behind: u32,
}

impl Divergence {
    pub fn new(ahead: u32, behind: u32) -> Self {
        Self { ahead, behind }
    }

    pub fn is_diverged(&self) -> bool {
        self.ahead > 0 && self.behind > 0
    }

    pub fn is_in_sync(&self) -> bool {
        self.ahead == 0 && self.behind == 0
    }
}

/// Snapshot of a working directory, rebuilt on every call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoState {
    pub is_repository: bool,
    pub has_remote: bool,
    pub current_branch: String,
    pub has_uncommitted_changes: bool,
    /// `None` when the remote could not be fetched
    pub divergence: Option<Divergence>,
}

impl RepoState {
    pub fn ahead(&self) -> u32 {
        self.divergence.map_or(0, |d| d.ahead)
    }

    pub fn behind(&self) -> u32 {
        self.divergence.map_or(0, |d| d.behind)
    }
}

impl fmt::Display for RepoState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_repository {
            return write!(f, "not a Git repository");
        }

        write!(f, "branch {}", self.current_branch)?;
        if self.has_uncommitted_changes {
            write!(f, ", uncommitted changes")?;
        }

        if !self.has_remote {
            return write!(f, ", no remote");
        }

        match self.divergence {
            Some(d) if d.is_in_sync() => write!(f, ", up to date"),
            Some(d) => write!(f, ", {} ahead, {} behind", d.ahead, d.behind),
            None => write!(f, ", remote unreachable"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(divergence: Option<Divergence>) -> RepoState {
        RepoState {
            is_repository: true,
            has_remote: true,
            current_branch: "main".into(),
            has_uncommitted_changes: false,
            divergence,
        }
    }

    #[test]
    fn test_divergence_flags() {
        assert!(Divergence::new(2, 3).is_diverged());
        assert!(!Divergence::new(2, 0).is_diverged());
        assert!(Divergence::default().is_in_sync());
    }

    #[test]
    fn test_unknown_divergence_reads_as_zero() {
        let unknown = state(None);
        assert_eq!(unknown.ahead(), 0);
        assert_eq!(unknown.behind(), 0);
    }

    #[test]
    fn test_display() {
        assert_eq!(state(Some(Divergence::new(0, 0))).to_string(), "branch main, up to date");
        assert_eq!(
            state(Some(Divergence::new(2, 3))).to_string(),
            "branch main, 2 ahead, 3 behind"
        );
        assert_eq!(state(None).to_string(), "branch main, remote unreachable");
    }
}
