pub mod ports;

pub mod cancel;
pub mod engine;
pub mod error;
pub mod inspector;
pub mod lease;
pub mod notifier;
pub mod outcome;
pub mod patterns;
pub mod provisioner;
pub mod remote;
pub mod repo_state;
pub mod request;
pub mod tool;

pub use cancel::CancelToken;
pub use engine::SyncEngine;
pub use error::SyncError;
pub use lease::ForceLease;
pub use notifier::DivergenceNotifier;
pub use outcome::{Stage, SyncOutcome};
