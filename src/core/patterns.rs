//! Recognized phrases in `git` and `gh` output
//!
//! Every decision the engine takes from free-form tool output goes through
//! the tables below. Phrases are matched case-insensitively as substrings.
//!
//! Checked against git 2.25 through 2.47 and gh 2.x. Newer releases that
//! reword a message fall through to the `Failed` variants, which carry the
//! raw output; nothing here ever defaults to success.

use crate::core::ports::ProcessOutput;

/// `git commit` found nothing to record.
/// git < 2.37 and >= 2.37 word the hint differently; both share the prefix.
pub const NOTHING_TO_COMMIT: &[&str] = &[
    "nothing to commit",
    "nothing added to commit",
    "no changes added to commit",
];

/// `git push` refused because the remote has commits we do not.
pub const PUSH_REJECTED: &[&str] = &[
    "fetch first",
    "rejected",
    "would be overwritten by merge",
    "non-fast-forward",
    "updates were rejected",
];

/// The receiving side refused the update itself (hook, protected branch).
/// Pulling does not help, so these never count as a rejection.
pub const REMOTE_REFUSED: &[&str] = &["remote rejected"];

/// `git push --force-with-lease` refused because the remote moved.
pub const STALE_LEASE: &[&str] = &["stale info"];

/// `gh repo create` refused because the name is taken.
pub const REPO_ALREADY_EXISTS: &[&str] = &["name already exists", "already exists on this account"];

/// Summary line git prints after a successful commit: `[main 1a2b3c4] message`.
const COMMIT_SUMMARY_PREFIX: char = '[';

pub fn matches_any(output: &ProcessOutput, table: &[&str]) -> bool {
    output.lines.iter().any(|line| {
        let line = line.to_lowercase();
        table.iter().any(|phrase| line.contains(phrase))
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitClass {
    Committed,
    NothingToCommit,
    Failed,
}

/// Classify `git commit` by content first, exit code second
///
/// Some git versions exit 1 on "nothing to commit", others 0 when run with
/// certain hooks; only the text is reliable. A success summary line wins so a
/// commit message that happens to contain the phrase is not misread.
pub fn classify_commit(output: &ProcessOutput) -> CommitClass {
    let has_summary = output
        .lines
        .iter()
        .any(|line| line.trim_start().starts_with(COMMIT_SUMMARY_PREFIX));

    if output.success() && has_summary {
        CommitClass::Committed
    } else if matches_any(output, NOTHING_TO_COMMIT) {
        CommitClass::NothingToCommit
    } else if output.success() {
        CommitClass::Committed
    } else {
        CommitClass::Failed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushClass {
    Pushed,
    Rejected,
    StaleLease,
    Failed,
}

pub fn classify_push(output: &ProcessOutput) -> PushClass {
    if output.success() {
        PushClass::Pushed
    } else if matches_any(output, STALE_LEASE) {
        // checked first: a lease failure also prints "[rejected]"
        PushClass::StaleLease
    } else if matches_any(output, REMOTE_REFUSED) {
        PushClass::Failed
    } else if matches_any(output, PUSH_REJECTED) {
        PushClass::Rejected
    } else {
        PushClass::Failed
    }
}

pub fn repo_already_exists(output: &ProcessOutput) -> bool {
    matches_any(output, REPO_ALREADY_EXISTS)
}
