//! Mock process runner for testing
//!
//! Answers invocations from a script instead of spawning processes, and
//! records every invocation so tests can assert what was (or was not) run.

use std::sync::Mutex;

use crate::core::ports::{Invocation, ProcessError, ProcessOutput, ProcessRunner};

struct Scripted {
    program: String,
    args_prefix: Vec<String>,
    once: bool,
    reply: Option<Result<ProcessOutput, ProcessError>>,
}

impl Scripted {
    fn matches(&self, invocation: &Invocation) -> bool {
        self.program == invocation.program
            && invocation.args.len() >= self.args_prefix.len()
            && self
                .args_prefix
                .iter()
                .zip(&invocation.args)
                .all(|(expected, actual)| expected == actual)
    }
}

/// Mock process runner for testing
///
/// The matching rule is: longest argument prefix wins, then one-shot replies
/// (oldest first) before standing ones (newest first). Unscripted
/// invocations succeed with no output.
pub struct MockProcessRunner {
    script: Mutex<Vec<Scripted>>,
    calls: Mutex<Vec<Invocation>>,
}

fn to_output(exit_code: i32, output: &str) -> ProcessOutput {
    ProcessOutput::new(exit_code, output.lines().map(String::from).collect())
}

impl MockProcessRunner {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn push(&self, program: &str, args: &[&str], once: bool, reply: Result<ProcessOutput, ProcessError>) {
        self.script.lock().unwrap().push(Scripted {
            program: program.to_string(),
            args_prefix: args.iter().map(|arg| (*arg).to_string()).collect(),
            once,
            reply: Some(reply),
        });
    }

    /// Answer every matching invocation with `exit_code` and `output`
    pub fn on(&self, program: &str, args: &[&str], exit_code: i32, output: &str) {
        self.push(program, args, false, Ok(to_output(exit_code, output)));
    }

    /// Answer only the next matching invocation
    pub fn once(&self, program: &str, args: &[&str], exit_code: i32, output: &str) {
        self.push(program, args, true, Ok(to_output(exit_code, output)));
    }

    /// Fail the next matching invocation without an exit status
    pub fn fail_once(&self, program: &str, args: &[&str], error: ProcessError) {
        self.push(program, args, true, Err(error));
    }

    /// Every invocation so far, oldest first
    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
    }

    /// Command lines of every invocation so far, e.g. `git push origin main`
    pub fn command_lines(&self) -> Vec<String> {
        self.calls().iter().map(Invocation::command_line).collect()
    }

    pub fn call_count(&self, program: &str, args_prefix: &[&str]) -> usize {
        let wanted = Scripted {
            program: program.to_string(),
            args_prefix: args_prefix.iter().map(|arg| (*arg).to_string()).collect(),
            once: false,
            reply: None,
        };
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|invocation| wanted.matches(invocation))
            .count()
    }

    pub fn was_called(&self, program: &str, args_prefix: &[&str]) -> bool {
        self.call_count(program, args_prefix) > 0
    }
}

impl Default for MockProcessRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessRunner for MockProcessRunner {
    fn run(&self, invocation: &Invocation) -> Result<ProcessOutput, ProcessError> {
        self.calls.lock().unwrap().push(invocation.clone());

        if invocation.is_cancelled() {
            return Err(ProcessError::Cancelled {
                program: invocation.program.clone(),
            });
        }

        let mut script = self.script.lock().unwrap();
        let best = script
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.reply.is_some() && entry.matches(invocation))
            .max_by_key(|(index, entry)| {
                // one-shot replies are consumed in the order they were scripted
                let order = if entry.once { usize::MAX - index } else { *index };
                (entry.args_prefix.len(), entry.once, order)
            })
            .map(|(index, _)| index);

        let Some(index) = best else {
            return Ok(ProcessOutput::default());
        };

        let entry = &mut script[index];
        if entry.once {
            entry.reply.take().unwrap_or_else(|| Ok(ProcessOutput::default()))
        } else {
            match &entry.reply {
                Some(Ok(output)) => Ok(output.clone()),
                _ => Ok(ProcessOutput::default()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn git(args: &[&str]) -> Invocation {
        Invocation::new(Path::new("/repo"), "git").args(args.iter().copied())
    }

    #[test]
    fn test_longest_prefix_wins() {
        let runner = MockProcessRunner::new();
        runner.on("git", &["rev-list"], 1, "generic");
        runner.on("git", &["rev-list", "--count", "HEAD..origin/main"], 0, "3");

        let output = runner.run(&git(&["rev-list", "--count", "HEAD..origin/main"])).unwrap();
        assert_eq!(output.first_line(), Some("3"));
        assert_eq!(runner.run(&git(&["rev-list", "x"])).unwrap().exit_code, 1);
    }

    #[test]
    fn test_once_is_consumed() {
        let runner = MockProcessRunner::new();
        runner.on("git", &["push"], 0, "");
        runner.once("git", &["push"], 1, "! [rejected] main -> main (fetch first)");

        assert_eq!(runner.run(&git(&["push", "origin", "main"])).unwrap().exit_code, 1);
        assert_eq!(runner.run(&git(&["push", "origin", "main"])).unwrap().exit_code, 0);
        assert_eq!(runner.call_count("git", &["push"]), 2);
    }

    #[test]
    fn test_one_shots_are_first_in_first_out() {
        let runner = MockProcessRunner::new();
        runner.once("git", &["fetch"], 128, "offline");
        runner.once("git", &["fetch"], 0, "");

        assert_eq!(runner.run(&git(&["fetch", "origin"])).unwrap().exit_code, 128);
        assert_eq!(runner.run(&git(&["fetch", "origin"])).unwrap().exit_code, 0);
    }

    #[test]
    fn test_unscripted_succeeds_silently() {
        let runner = MockProcessRunner::new();
        let output = runner.run(&git(&["status"])).unwrap();
        assert_eq!(output, ProcessOutput::default());
        assert!(runner.was_called("git", &["status"]));
        assert!(!runner.was_called("gh", &[]));
    }
}
