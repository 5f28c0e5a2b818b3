use std::io;
use thiserror::Error;

/// Errors that can occur during user interaction
#[derive(Debug, Error)]
pub enum InteractionError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Interface for talking to whoever triggered the synchronization
///
/// The terminal implementation backs the CLI; tests use a scripted mock.
pub trait UserInteraction: Send + Sync {
    /// Ask for an explicit yes/no decision
    ///
    /// # Returns
    /// * `Ok(true)` - User confirmed (yes)
    /// * `Ok(false)` - User declined or gave no answer
    ///
    /// # Errors
    /// * `InteractionError::Io` - Failed to read user input
    fn confirm(&self, message: &str) -> Result<bool, InteractionError>;

    /// Prints a message to the user
    fn print(&self, message: &str);

    /// Prints an error message to the user
    fn print_error(&self, message: &str);
}
