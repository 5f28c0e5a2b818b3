pub mod check_divergence;
pub mod pull_changes;
pub mod push_changes;
pub mod show_status;

pub use check_divergence::CheckDivergenceUseCase;
pub use pull_changes::PullChangesUseCase;
pub use push_changes::PushChangesUseCase;
pub use show_status::ShowStatusUseCase;
