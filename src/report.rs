use crate::engine::ReorgResult;
use colored::*;
use std::path::Path;

/// Console summary of a run: moved files, import-updated files, backup
/// location. Paths are shown relative to the tests directory.
pub fn print_summary(result: &ReorgResult, tests_dir: &Path) {
    let rule = "=".repeat(50);

    println!("\n{rule}");
    println!("{}", "REORGANIZATION SUMMARY".bold());
    println!("{rule}");

    println!("Moved files: {}", result.moved.len());
    for record in &result.moved {
        let rel = record.dest.strip_prefix(tests_dir).unwrap_or(&record.dest);
        println!("  → {}", rel.display());
    }

    println!("\nUpdated imports: {}", result.updated_imports.len());
    for path in &result.updated_imports {
        let rel = path.strip_prefix(tests_dir).unwrap_or(path);
        println!("  → {}", rel.display());
    }

    println!("\nBackup created: {}", result.backup_dir.display());
    println!("{rule}");
}
