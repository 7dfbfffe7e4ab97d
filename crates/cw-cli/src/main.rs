//! Console frontend for the Coldwake interactive fiction engine.

mod commands;
mod console;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "coldwake",
    about = "Coldwake — a turn-based interactive fiction engine",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start or resume a game
    Play {
        /// Directory with world.json, dialogue.json and config.json
        /// (default: the built-in demo ship)
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// Save file stem to resume from (e.g. save01)
        #[arg(short, long)]
        load: Option<String>,

        /// Override the configured save directory
        #[arg(long)]
        saves: Option<PathBuf>,

        /// Override the teleport RNG seed
        #[arg(long)]
        seed: Option<u64>,

        /// Override the dialogue pacing delay in milliseconds
        #[arg(long)]
        delay: Option<u64>,
    },

    /// Validate a data directory without playing
    Validate {
        /// Directory with world.json, dialogue.json and config.json
        /// (default: the built-in demo ship)
        #[arg(short, long)]
        data: Option<PathBuf>,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Play {
            data,
            load,
            saves,
            seed,
            delay,
        } => commands::play::run(
            data.as_deref(),
            load.as_deref(),
            saves.as_deref(),
            seed,
            delay,
        ),
        Commands::Validate { data } => commands::validate::run(data.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
