pub mod file_system;
pub mod process_runner;
pub mod user_interaction;

pub use file_system::{FileSystem, FileSystemError};
pub use process_runner::{Invocation, ProcessError, ProcessOutput, ProcessRunner};
pub use user_interaction::{InteractionError, UserInteraction};
