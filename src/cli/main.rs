use std::path::PathBuf;

use clap::Parser;

use crate::Commands;

/// Main CLI application arguments and command structure
#[derive(Parser)]
#[clap(
    version,
    about = "Sticky-note keeper with archive, trash, tags, and checklists"
)]
pub struct Cli {
    /// Path to the data directory
    #[clap(long, value_parser)]
    pub data_dir: Option<PathBuf>,

    /// Editor command used for edit round-trips
    #[clap(long)]
    pub editor: Option<String>,

    /// Verbose output mode
    #[clap(short, long)]
    pub verbose: bool,

    /// Subcommands for the cakit application
    #[clap(subcommand)]
    pub command: Commands,
}
