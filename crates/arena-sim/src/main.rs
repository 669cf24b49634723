//! Arena fight simulator.
//!
//! Loads combat content from a data directory and plays out a hero-versus-boss
//! fight with a simple turn scheduler.
//! Run with: `cargo run -p arena-sim -- simulate --hero knight --boss warden`

mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Check, Simulate};

/// Arena fight simulator
#[derive(Parser)]
#[command(name = "arena-sim")]
#[command(about = "Simulate arena fights from content files", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Play out one hero-versus-boss fight
    Simulate(Simulate),

    /// Load every catalog and report problems
    Check(Check),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Simulate(cmd) => cmd.execute(),
        Command::Check(cmd) => cmd.execute(),
    }
}
