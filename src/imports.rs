use crate::layout::{self, LayoutNode};
use crate::mover::MoveRecord;
use colored::*;
use regex::Regex;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::error;

/// Rewrite import statements in moved files so they reference the new nested
/// locations. Matching is purely textual; three statement shapes are handled:
/// `from <ns>.<module>`, `import <ns>.<module>`, and `from .<module>`.
///
/// Resolution is name-based only. In particular the `from .<module>` shape is
/// rewritten without checking that the target is still reachable from the
/// rewriting file's own new depth.
///
/// Per-file I/O errors are reported and skipped; the remaining files continue
/// to be processed. Returns the files whose text actually changed.
pub fn update_imports(
    records: &[MoveRecord],
    nodes: &[LayoutNode],
    namespace: &str,
    tests_dir: &Path,
    dry_run: bool,
) -> Vec<PathBuf> {
    println!("Updating imports in moved files...");

    let patterns = import_patterns(namespace);
    let mut updated = Vec::new();

    for record in records {
        if !record.dest.exists() {
            continue;
        }

        match rewrite_file(&record.dest, &patterns, nodes, dry_run) {
            Ok(true) => {
                let rel = record.dest.strip_prefix(tests_dir).unwrap_or(&record.dest);
                println!("  Updated imports in: {}", rel.display());
                updated.push(record.dest.clone());
            }
            Ok(false) => {}
            Err(err) => {
                println!(
                    "  {} updating imports in {}: {}",
                    "ERROR".red(),
                    record.dest.display(),
                    err
                );
            }
        }
    }

    updated
}

fn import_patterns(namespace: &str) -> Vec<Regex> {
    let ns = regex::escape(namespace);
    [
        format!(r"from {ns}\.(\w+)"),
        format!(r"import {ns}\.(\w+)"),
        r"from \.(\w+)".to_string(),
    ]
    .iter()
    .filter_map(|pattern| match Regex::new(pattern) {
        Ok(regex) => Some(regex),
        Err(err) => {
            error!("Invalid import pattern '{}': {}", pattern, err);
            None
        }
    })
    .collect()
}

/// Apply every pattern to the file text. Each matched statement keeps its
/// keyword and any remainder of the line; only the captured module name is
/// replaced by its resolved dotted location. Unresolvable names are left
/// untouched.
fn rewrite_file(
    path: &Path,
    patterns: &[Regex],
    nodes: &[LayoutNode],
    dry_run: bool,
) -> io::Result<bool> {
    let original = fs::read_to_string(path)?;
    let mut content = original.clone();

    for pattern in patterns {
        content = pattern
            .replace_all(&content, |caps: &regex::Captures| {
                let module = &caps[1];
                match layout::resolve_module(nodes, module) {
                    Some(resolved) => caps[0].replacen(module, &resolved, 1),
                    None => caps[0].to_string(),
                }
            })
            .into_owned();
    }

    if content != original {
        if !dry_run {
            fs::write(path, &content)?;
        }
        return Ok(true);
    }

    Ok(false)
}
