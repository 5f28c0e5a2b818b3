//! Test helpers for mocking dependencies in tests
//!
//! This module provides mock implementations of the core ports:
//! - `MockProcessRunner`: Scripted subprocess answers
//! - `MockFileSystem`: In-memory filesystem simulation
//! - `MockUserInteraction`: User interaction simulation
//!
//! `GitSandbox` is the exception: real repositories for adapter tests.
//!
//! These mocks are designed to be simple and focused on testing,
//! avoiding unnecessary complexity while providing essential functionality.

mod git_sandbox;
mod mock_file_system;
mod mock_process_runner;
mod mock_user_interaction;

pub use git_sandbox::GitSandbox;
pub use mock_file_system::MockFileSystem;
pub use mock_process_runner::MockProcessRunner;
pub use mock_user_interaction::MockUserInteraction;
