pub mod system_runner;
pub mod terminal_interaction;
pub mod unix_fs;

#[cfg(test)]
pub mod test_helpers;

pub use system_runner::SystemRunner;
pub use terminal_interaction::TerminalInteraction;
pub use unix_fs::UnixFs;
