use crate::layout::{self, LayoutNode};
use colored::*;
use std::path::Path;

/// Walk the layout and report, per expected file, whether it exists at its
/// destination. Observational only: failures are printed, never raised.
pub fn verify_structure(nodes: &[LayoutNode], tests_dir: &Path) -> usize {
    println!("Verifying new structure...");

    let mut missing = 0;

    for placement in layout::flatten(nodes) {
        let rel = placement.relative_path();
        if tests_dir.join(&rel).exists() {
            println!("  {} {}", "✓".green(), rel.display());
        } else {
            println!("  {} MISSING: {}", "✗".red(), rel.display());
            missing += 1;
        }
    }

    missing
}
