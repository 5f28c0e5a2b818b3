use std::path::Path;
use std::sync::Arc;

use crate::core::cancel::CancelToken;
use crate::core::ports::{Invocation, ProcessError, ProcessOutput, ProcessRunner};

/// One external program bound to a runner and the current call's cancel token
///
/// Built fresh for every engine call; holds no state of its own.
#[derive(Clone)]
pub struct Tool {
    runner: Arc<dyn ProcessRunner>,
    program: String,
    cancel: Option<CancelToken>,
}

impl Tool {
    pub fn new(runner: Arc<dyn ProcessRunner>, program: &str, cancel: Option<CancelToken>) -> Self {
        Self {
            runner,
            program: program.to_string(),
            cancel,
        }
    }

    /// Run the program with `args` inside `dir`
    ///
    /// # Errors
    /// Only when there is no exit status at all; see [`ProcessRunner::run`].
    pub fn run<I, S>(&self, dir: &Path, args: I) -> Result<ProcessOutput, ProcessError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let invocation = Invocation::new(dir, &self.program)
            .args(args)
            .cancel_with(self.cancel.clone());

        self.runner.run(&invocation)
    }
}
