use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)] // requires `derive` feature
#[command(name = "test-reorg")]
#[command(about = "Reorganize a flat test directory into the app's module layout", long_about = None)]
pub struct Cli {
    /// Show what would be done without making changes
    #[arg(long)]
    pub dry_run: bool,

    /// Always create backup
    #[arg(long)]
    pub backup: bool,

    /// Rollback from backup directory
    #[arg(long, value_name = "DIR")]
    pub rollback: Option<PathBuf>,
}
