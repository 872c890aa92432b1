mod commands;
mod logging;

use std::path::Path;
use std::process;

use clap::Parser;
use colored::*;
use commands::Cli;
use dotenv::dotenv;
use test_reorg::error::Error;
use test_reorg::{backup, config, ReorgEngine};
use tracing::{debug, error, info};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    let _guard = logging::init_logger();

    let config = match config::load_configuration() {
        Ok(config) => config,
        Err(err) => {
            error!("Error loading configuration: {}", err);
            process::exit(1);
        }
    };

    let args = Cli::parse();

    if let Some(backup_dir) = args.rollback.as_deref() {
        let tests_dir = Path::new(&config.tests_dir);
        match backup::rollback(tests_dir, backup_dir, args.dry_run) {
            Ok(()) => println!("Rollback completed!"),
            Err(Error::BackupMissing(path)) => {
                error!("Backup directory not found: {}", path.display());
            }
            Err(err) => {
                error!("Rollback failed: {}", err);
                process::exit(1);
            }
        }
        return Ok(());
    }

    if args.backup {
        // Backups are always created for a live run; the flag changes nothing.
        debug!("--backup flag set");
    }

    let engine = ReorgEngine::new(config).with_dry_run(args.dry_run);
    match engine.run() {
        Ok(result) => {
            println!();
            info!(
                "Backup: {}, Move: {}, Imports: {}",
                format!("{:.2}s", result.backup_duration.as_secs_f64()).green(),
                format!("{:.2}s", result.move_duration.as_secs_f64()).green(),
                format!("{:.2}s", result.rewrite_duration.as_secs_f64()).green(),
            );
            info!(
                "{} files moved, {} files with imports updated, {} missing after verify",
                format!("{}", result.moved.len()).green(),
                format!("{}", result.updated_imports.len()).green(),
                format!("{}", result.missing_after_verify).red(),
            );
            println!("\nReorganization completed!");
        }
        Err(err) => {
            error!("Error: {}", err);
            process::exit(1);
        }
    }

    Ok(())
}
