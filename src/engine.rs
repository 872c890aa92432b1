use crate::backup;
use crate::config::AppConfig;
use crate::error::Result;
use crate::imports;
use crate::layout::{self, LayoutNode, TARGET_LAYOUT};
use crate::mover::{self, MoveRecord};
use crate::report;
use crate::verify;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info};

pub struct ReorgEngine {
    config: AppConfig,
    dry_run: bool,
}

/// Pipeline state assembled as the phases run; each stage contributes its
/// piece and reads earlier pieces, nothing is mutated after it is produced.
#[derive(Debug)]
pub struct ReorgResult {
    pub backup_dir: PathBuf,
    pub moved: Vec<MoveRecord>,
    pub updated_imports: Vec<PathBuf>,
    pub missing_after_verify: usize,
    pub backup_duration: Duration,
    pub move_duration: Duration,
    pub rewrite_duration: Duration,
}

impl ReorgEngine {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            dry_run: false,
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Run the full reorganization pipeline:
    /// 1. Timestamped backup of the flat tests directory
    /// 2. Target directory skeleton with package markers
    /// 3. File moves (flattening order)
    /// 4. Import rewriting in moved files
    /// 5. Cleanup of leftover originals
    /// 6. Structure verification
    /// 7. Console summary
    pub fn run(&self) -> Result<ReorgResult> {
        let tests_dir = Path::new(&self.config.tests_dir);
        let namespace = tests_namespace(tests_dir);

        println!("Starting test reorganization (dry_run={})", self.dry_run);
        println!("Tests directory: {}", tests_dir.display());

        // Phase 1: backup, before any mutation of the live tree
        info!("Creating backup...");
        let backup_start = Instant::now();
        let backup_dir =
            backup::create_backup(tests_dir, &self.config.ignore_patterns, self.dry_run)?;
        let backup_duration = backup_start.elapsed();
        debug!("Backup completed in {:.2}s", backup_duration.as_secs_f64());

        // Phase 2: directory skeleton
        create_directory_structure(&TARGET_LAYOUT, tests_dir, self.dry_run)?;

        // Phase 3: move files
        info!("Moving files...");
        let move_start = Instant::now();
        let moved = mover::move_files(&TARGET_LAYOUT, tests_dir, self.dry_run)?;
        let move_duration = move_start.elapsed();
        debug!(
            "Move completed in {:.2}s — {} files",
            move_duration.as_secs_f64(),
            moved.len(),
        );

        // Phase 4: rewrite imports
        info!("Updating imports...");
        let rewrite_start = Instant::now();
        let updated_imports = imports::update_imports(
            &moved,
            &TARGET_LAYOUT,
            &namespace,
            tests_dir,
            self.dry_run,
        );
        let rewrite_duration = rewrite_start.elapsed();
        debug!(
            "Import rewrite completed in {:.2}s — {} files updated",
            rewrite_duration.as_secs_f64(),
            updated_imports.len(),
        );

        // Phase 5: cleanup
        mover::clean_originals(&moved, self.dry_run)?;

        // Phase 6: verify
        let missing_after_verify = verify::verify_structure(&TARGET_LAYOUT, tests_dir);

        let result = ReorgResult {
            backup_dir,
            moved,
            updated_imports,
            missing_after_verify,
            backup_duration,
            move_duration,
            rewrite_duration,
        };

        // Phase 7: summary
        report::print_summary(&result, tests_dir);

        Ok(result)
    }
}

/// Materialize every directory the layout names, with its package marker.
/// Idempotent: existing directories and markers are left alone.
fn create_directory_structure(
    nodes: &[LayoutNode],
    tests_dir: &Path,
    dry_run: bool,
) -> Result<()> {
    println!("Creating directory structure...");

    for rel in layout::directories(nodes) {
        let dir_path = tests_dir.join(&rel);
        if !dry_run {
            if !dir_path.exists() {
                fs::create_dir_all(&dir_path)?;
            }
            mover::ensure_marker(&dir_path)?;
        }
        println!("  Created: {}", dir_path.display());
    }

    Ok(())
}

/// The old flat namespace referenced by imports is the tests directory's own
/// name (`from tests.foo import ...`).
fn tests_namespace(tests_dir: &Path) -> String {
    tests_dir
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "tests".to_string())
}
