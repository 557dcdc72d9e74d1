//! CLI frontend for the Fable story engine.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "fable",
    about = "Fable — a reader, validator, and builder toolchain for branching stories",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a story file and report diagnostics
    Check {
        /// Path to a .adventure.json story file
        file: PathBuf,
    },

    /// Play a story interactively in the terminal
    Play {
        /// Path to a .adventure.json story file
        file: PathBuf,
    },

    /// Show summary information about a story
    Info {
        /// Path to a .adventure.json story file
        file: PathBuf,
    },

    /// List the stories in a library manifest
    List {
        /// Path to a manifest.json file
        #[arg(default_value = "stories/manifest.json")]
        manifest: PathBuf,
    },

    /// Compile a builder draft into a story file
    Export {
        /// Path to a builder draft JSON file
        draft: PathBuf,

        /// Output story file (default: <id>.adventure.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check { file } => commands::check::run(&file),
        Commands::Play { file } => commands::play::run(&file),
        Commands::Info { file } => commands::info::run(&file),
        Commands::List { manifest } => commands::list::run(&manifest),
        Commands::Export { draft, output } => commands::export::run(&draft, output.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
