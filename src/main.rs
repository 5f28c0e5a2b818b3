use clap::Parser;
use tracing_subscriber::EnvFilter;

mod adapters;
mod commands;
mod configs;
mod container;
mod core;
mod errors;
mod usecases;
mod utils;

use commands::Cli;

/// `RUST_LOG` wins; otherwise each `-v` raises the level one step from `warn`
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("reposync={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = cli.execute() {
        eprintln!("Error: {e}");
        std::process::exit(e.exit_code());
    }
}
