use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Parser, Subcommand};

use crate::container::AppContainer;
use crate::core::{CancelToken, ForceLease};
use crate::errors::AppError;
use crate::usecases::{
    CheckDivergenceUseCase, PullChangesUseCase, PushChangesUseCase, ShowStatusUseCase,
};

#[derive(Debug, Parser)]
#[command(
    name = "reposync",
    about = "Keep a project directory in sync with its hosted Git repository",
    long_about = None
)]
pub struct Cli {
    #[arg(short, long, action = ArgAction::Count, global = true)]
    #[arg(help = "Log more detail (-v for info, -vv for debug, -vvv for trace)")]
    pub verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub fn execute(&self) -> Result<(), AppError> {
        let (container, config) = AppContainer::load()?;
        let AppContainer { runner, fs, ui } = container;

        match &self.command {
            Commands::Push {
                path,
                message,
                lease,
                force,
            } => {
                let lease = lease.as_deref().map(str::parse::<ForceLease>).transpose()?;
                PushChangesUseCase::new(runner, fs, ui).execute(&config, path, message, lease, *force)
            }
            Commands::Pull { path, branch } => {
                PullChangesUseCase::new(runner, fs, ui).execute(&config, path, branch.as_deref())
            }
            Commands::Status { path } => ShowStatusUseCase::new(runner, fs, ui).execute(&config, path),
            Commands::Check { path } => {
                CheckDivergenceUseCase::new(runner, fs, ui).execute(&config, path)
            }
            Commands::Watch {
                path,
                interval,
                rounds,
            } => CheckDivergenceUseCase::new(runner, fs, ui).watch(
                &config,
                path,
                Duration::from_secs(*interval),
                *rounds,
                &CancelToken::new(),
            ),
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(about = "Commit local changes and push them, creating the remote on first use")]
    Push {
        #[arg(help = "Project directory")]
        path: PathBuf,

        #[arg(short, long)]
        #[arg(help = "Commit message")]
        message: String,

        #[arg(long, value_name = "BRANCH:SHA")]
        #[arg(help = "Overwrite the remote branch, but only if it is still at SHA")]
        lease: Option<String>,

        #[arg(short, long)]
        #[arg(help = "Offer a force push (with confirmation) when the remote has new commits")]
        force: bool,
    },

    #[command(about = "Merge the remote branch into a clean working tree")]
    Pull {
        #[arg(help = "Project directory")]
        path: PathBuf,

        #[arg(short, long)]
        #[arg(help = "Branch to pull (defaults to the current branch)")]
        branch: Option<String>,
    },

    #[command(about = "Show branch, local changes and divergence from the remote")]
    Status {
        #[arg(help = "Project directory")]
        path: PathBuf,
    },

    #[command(about = "Check once whether the remote has commits you do not")]
    Check {
        #[arg(help = "Project directory")]
        path: PathBuf,
    },

    #[command(about = "Keep checking the remote for new commits")]
    Watch {
        #[arg(help = "Project directory")]
        path: PathBuf,

        #[arg(short, long, default_value_t = 300)]
        #[arg(help = "Seconds between checks")]
        interval: u64,

        #[arg(short, long)]
        #[arg(help = "Stop after this many checks")]
        rounds: Option<u32>,
    },
}
