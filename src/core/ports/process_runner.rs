use std::path::{Path, PathBuf};

use crate::core::cancel::CancelToken;

#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} was cancelled")]
    Cancelled { program: String },

    #[error("{program} did not finish within {seconds}s")]
    TimedOut { program: String, seconds: u64 },

    #[error("IO error while running {program}: {source}")]
    Io {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// A single subprocess call: what to run and where
#[derive(Debug, Clone)]
pub struct Invocation {
    pub working_dir: PathBuf,
    pub program: String,
    pub args: Vec<String>,
    pub cancel: Option<CancelToken>,
}

impl Invocation {
    pub fn new(working_dir: &Path, program: &str) -> Self {
        Self {
            working_dir: working_dir.to_path_buf(),
            program: program.to_string(),
            args: Vec::new(),
            cancel: None,
        }
    }

    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn cancel_with(mut self, cancel: Option<CancelToken>) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelToken::is_cancelled)
    }

    /// Human readable form used in logs, e.g. `git push origin main`
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Exit status plus stdout and stderr lines in arrival order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    pub exit_code: i32,
    pub lines: Vec<String>,
}

impl ProcessOutput {
    pub fn new(exit_code: i32, lines: Vec<String>) -> Self {
        Self { exit_code, lines }
    }

    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// First line with visible content, trimmed
    pub fn first_line(&self) -> Option<&str> {
        self.lines
            .iter()
            .map(|line| line.trim())
            .find(|line| !line.is_empty())
    }

    /// Lines that carry any visible content
    pub fn non_empty_lines(&self) -> Vec<String> {
        self.lines
            .iter()
            .filter(|line| !line.trim().is_empty())
            .cloned()
            .collect()
    }
}

/// Runs external programs on behalf of the engine
///
/// Implementations must not treat a non-zero exit as an error: callers
/// classify failures from `exit_code` and the captured lines. `Err` is
/// reserved for cases where no exit status exists at all.
pub trait ProcessRunner: Send + Sync {
    /// Run `invocation.program` with its arguments inside `invocation.working_dir`
    ///
    /// # Errors
    /// * `ProcessError::Spawn` - The program could not be started
    /// * `ProcessError::Cancelled` - The invocation's cancel token fired
    /// * `ProcessError::TimedOut` - The runner's time limit elapsed
    /// * `ProcessError::Io` - Output could not be collected
    fn run(&self, invocation: &Invocation) -> Result<ProcessOutput, ProcessError>;
}
