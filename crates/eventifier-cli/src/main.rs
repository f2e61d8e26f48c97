//! Eventifier CLI
//!
//! Command-line interface for snapshot-diff event detection

use clap::{Parser, Subcommand};
use eventifier_core::logging_facility::{init, Profile};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "eventifier")]
#[command(about = "Eventifier - detect and classify user record changes", long_about = None)]
struct Cli {
    /// Emit JSON log lines on stderr instead of human-readable ones
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Diff a snapshot against baselines and append events
    Detect(commands::detect::DetectArgs),
    /// Classify a queued event file and print a summary per entry
    Classify(commands::classify::ClassifyArgs),
}

fn main() {
    let cli = Cli::parse();

    init(if cli.json_logs {
        Profile::Production
    } else {
        Profile::Development
    });

    let result = match cli.command {
        Commands::Detect(args) => commands::detect::execute(args),
        Commands::Classify(args) => commands::classify::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
