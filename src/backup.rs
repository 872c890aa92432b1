use crate::error::{Error, Result};
use anyhow::anyhow;
use chrono::Local;
use glob::Pattern;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error};
use walkdir::WalkDir;

/// Copy the whole tests tree to a timestamped sibling directory, skipping
/// cache artifacts. Runs before any mutation of the live tree; any failure
/// here is fatal to the run.
pub fn create_backup(
    tests_dir: &Path,
    ignore_patterns: &[String],
    dry_run: bool,
) -> Result<PathBuf> {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let parent = tests_dir.parent().unwrap_or_else(|| Path::new("."));
    let backup_dir = parent.join(format!("tests_backup_{timestamp}"));

    if !dry_run {
        println!("Creating backup: {}", backup_dir.display());
        copy_tree(tests_dir, &backup_dir, &compile_patterns(ignore_patterns))?;
    }

    Ok(backup_dir)
}

/// Restore the tests directory wholesale from a backup. The live tree is
/// deleted and replaced by a copy of the backup; move records are not
/// consulted. A missing backup directory aborts with no mutation.
pub fn rollback(tests_dir: &Path, backup_dir: &Path, dry_run: bool) -> Result<()> {
    if !backup_dir.exists() {
        return Err(Error::BackupMissing(backup_dir.to_path_buf()));
    }

    println!("Rolling back from: {}", backup_dir.display());

    if !dry_run {
        if tests_dir.exists() {
            fs::remove_dir_all(tests_dir)?;
        }
        copy_tree(backup_dir, tests_dir, &[])?;
    }

    Ok(())
}

fn compile_patterns(globs: &[String]) -> Vec<Pattern> {
    globs
        .iter()
        .filter_map(|glob| match Pattern::new(glob) {
            Ok(pattern) => Some(pattern),
            Err(err) => {
                error!("Invalid glob pattern '{}': {}", glob, err);
                None
            }
        })
        .collect()
}

/// Recursive copy of `src` into `dest`. Entries whose file name matches an
/// ignore pattern are skipped; a matching directory skips its whole subtree.
fn copy_tree(src: &Path, dest: &Path, ignore_patterns: &[Pattern]) -> Result<()> {
    let mut entry_count: usize = 0;
    let mut walker = WalkDir::new(src).into_iter();

    while let Some(entry) = walker.next() {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy();

        if entry.depth() > 0 && ignore_patterns.iter().any(|pattern| pattern.matches(&name)) {
            if entry.file_type().is_dir() {
                walker.skip_current_dir();
            }
            continue;
        }

        let rel = entry
            .path()
            .strip_prefix(src)
            .map_err(|err| anyhow!("path {} escapes {}: {}", entry.path().display(), src.display(), err))?;
        let target = dest.join(rel);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
            entry_count += 1;
        }
    }

    debug!("Copied {} files from {} to {}", entry_count, src.display(), dest.display());
    Ok(())
}
