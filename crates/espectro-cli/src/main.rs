//! Espectro CLI - play audio through a live equalizer with a terminal
//! spectrum display and dominant-frequency timeline.

mod commands;
mod render;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "espectro")]
#[command(author, version, about = "Audio player with live spectrum analysis", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play an audio file with the interactive spectrum view
    Play(commands::play::PlayArgs),

    /// Extract the dominant-frequency timeline of a file offline
    Analyze(commands::analyze::AnalyzeArgs),

    /// List equalizer presets
    Presets(commands::presets::PresetsArgs),

    /// List audio output devices
    Devices(commands::devices::DevicesArgs),
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so the alternate-screen UI stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Play(args) => commands::play::run(args),
        Commands::Analyze(args) => commands::analyze::run(args),
        Commands::Presets(args) => commands::presets::run(args),
        Commands::Devices(args) => commands::devices::run(args),
    }
}
