use crate::error::Result;
use crate::layout::{self, LayoutNode};
use colored::*;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Marker file that makes a directory an importable Python package.
pub const PACKAGE_MARKER: &str = "__init__.py";

/// One relocated file: where it was, where it went. Created at move time and
/// read (never mutated) by import rewriting, cleanup, and the summary.
#[derive(Debug, Clone)]
pub struct MoveRecord {
    pub source: PathBuf,
    pub dest: PathBuf,
}

/// Relocate every layout file found in the flat tests directory into its
/// computed destination, creating directories and package markers on demand.
/// Files missing on disk produce a warning and no record; the run continues.
pub fn move_files(
    nodes: &[LayoutNode],
    tests_dir: &Path,
    dry_run: bool,
) -> Result<Vec<MoveRecord>> {
    println!("Moving files to new structure...");

    let mut records = Vec::new();

    for placement in layout::flatten(nodes) {
        let source = tests_dir.join(placement.filename);
        let target_dir: PathBuf = placement
            .segments
            .iter()
            .fold(tests_dir.to_path_buf(), |dir, segment| dir.join(segment));
        let dest = target_dir.join(placement.filename);

        if !source.exists() {
            println!(
                "  {} {} not found in tests directory",
                "WARNING:".yellow(),
                placement.filename
            );
            continue;
        }

        if !dry_run {
            fs::create_dir_all(&target_dir)?;
            relocate(&source, &dest)?;
            ensure_marker(&target_dir)?;
        }

        println!(
            "  Moved: {} -> {}/",
            placement.filename,
            placement.segments.join("/")
        );
        records.push(MoveRecord { source, dest });
    }

    Ok(records)
}

/// Make a directory an importable package if it isn't one already.
pub fn ensure_marker(dir: &Path) -> io::Result<()> {
    let marker = dir.join(PACKAGE_MARKER);
    if !marker.exists() {
        fs::File::create(&marker)?;
    }
    Ok(())
}

/// Same-filesystem rename when possible, copy+delete otherwise.
fn relocate(source: &Path, dest: &Path) -> io::Result<()> {
    match fs::rename(source, dest) {
        Ok(()) => Ok(()),
        Err(_) => {
            fs::copy(source, dest)?;
            fs::remove_file(source)
        }
    }
}

/// Delete originals that still exist after the move phase. A no-op when
/// relocation already removed the source.
pub fn clean_originals(records: &[MoveRecord], dry_run: bool) -> Result<()> {
    println!("Cleaning up...");

    for record in records {
        if record.source.exists() && !dry_run {
            fs::remove_file(&record.source)?;
            let name = record
                .source
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            println!("  Removed old file: {}", name);
        }
    }

    Ok(())
}
