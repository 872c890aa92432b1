use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

use test_reorg::error::Error;
use test_reorg::{backup, AppConfig, ReorgEngine};

fn app_config(tests_dir: &Path) -> AppConfig {
    AppConfig {
        tests_dir: tests_dir.to_string_lossy().into_owned(),
        ignore_patterns: vec!["__pycache__".to_string(), "*.pyc".to_string()],
    }
}

/// Create a flat tests directory with a handful of files the target layout
/// knows about. Layout after a run:
///   tests/
///     repositories/test_user_repository.py
///     repositories/test_api_key_repository.py
///     utils/test_utils.py
///     apps/api/routers/test_users.py
///     integration/test_main.py
fn write_flat_tests(tests_dir: &Path) {
    fs::create_dir_all(tests_dir).unwrap();
    fs::write(
        tests_dir.join("test_user_repository.py"),
        "from tests.test_user_repository import UserRepository\n\
         from tests.test_utils import make_user\n\n\
         def test_create_user():\n    pass\n",
    )
    .unwrap();
    fs::write(
        tests_dir.join("test_api_key_repository.py"),
        "from .test_user_repository import UserRepository\n\n\
         def test_api_keys():\n    pass\n",
    )
    .unwrap();
    fs::write(
        tests_dir.join("test_utils.py"),
        "import os\n\ndef make_user():\n    return object()\n",
    )
    .unwrap();
    fs::write(
        tests_dir.join("test_users.py"),
        "import tests.test_utils\n\ndef test_list_users():\n    pass\n",
    )
    .unwrap();
    fs::write(
        tests_dir.join("test_main.py"),
        "def test_main():\n    pass\n",
    )
    .unwrap();
}

/// Relative path → file bytes for every file under `root`.
fn snapshot_tree(root: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
    let mut tree = BTreeMap::new();
    collect_tree(root, root, &mut tree);
    tree
}

fn collect_tree(root: &Path, dir: &Path, tree: &mut BTreeMap<PathBuf, Vec<u8>>) {
    for entry in fs::read_dir(dir).unwrap().flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_tree(root, &path, tree);
        } else {
            let rel = path.strip_prefix(root).unwrap().to_path_buf();
            tree.insert(rel, fs::read(&path).unwrap());
        }
    }
}

#[test]
fn test_full_run_relocates_files_and_rewrites_imports() {
    let tmp = tempdir().unwrap();
    let tests_dir = tmp.path().join("tests");
    write_flat_tests(&tests_dir);

    let engine = ReorgEngine::new(app_config(&tests_dir));
    let result = engine.run().unwrap();

    assert_eq!(result.moved.len(), 5);

    // Every present file moved to its computed destination, flat copy gone
    assert!(tests_dir.join("repositories/test_user_repository.py").exists());
    assert!(!tests_dir.join("test_user_repository.py").exists());
    assert!(tests_dir.join("utils/test_utils.py").exists());
    assert!(tests_dir.join("apps/api/routers/test_users.py").exists());
    assert!(tests_dir.join("integration/test_main.py").exists());

    // Package markers along the way
    assert!(tests_dir.join("repositories/__init__.py").exists());
    assert!(tests_dir.join("apps/__init__.py").exists());
    assert!(tests_dir.join("apps/api/routers/__init__.py").exists());

    // Example scenario: namespace import rewritten, keyword and remainder kept
    let moved = fs::read_to_string(tests_dir.join("repositories/test_user_repository.py")).unwrap();
    assert!(moved.contains("from tests.repositories.test_user_repository import UserRepository"));
    assert!(moved.contains("from tests.utils.test_utils import make_user"));

    // Relative import shape
    let sibling =
        fs::read_to_string(tests_dir.join("repositories/test_api_key_repository.py")).unwrap();
    assert!(sibling.contains("from .repositories.test_user_repository import UserRepository"));

    // Plain import shape
    let routers = fs::read_to_string(tests_dir.join("apps/api/routers/test_users.py")).unwrap();
    assert!(routers.contains("import tests.utils.test_utils"));

    // test_main.py has no old-namespace imports, so it is not counted
    assert_eq!(result.updated_imports.len(), 3);

    // Backup holds the pre-run tree
    assert!(result.backup_dir.is_dir());
    let backed_up =
        fs::read_to_string(result.backup_dir.join("test_user_repository.py")).unwrap();
    assert!(backed_up.contains("from tests.test_user_repository import UserRepository"));
}

#[test]
fn test_missing_layout_files_warn_without_creating_artifacts() {
    let tmp = tempdir().unwrap();
    let tests_dir = tmp.path().join("tests");
    fs::create_dir_all(&tests_dir).unwrap();
    fs::write(tests_dir.join("test_utils.py"), "import os\n").unwrap();

    let engine = ReorgEngine::new(app_config(&tests_dir));
    let result = engine.run().unwrap();

    assert_eq!(result.moved.len(), 1);
    assert!(tests_dir.join("utils/test_utils.py").exists());

    // No partial or empty file appears for anything that was absent
    assert!(!tests_dir.join("repositories/test_user_repository.py").exists());
    assert!(!tests_dir.join("integration/test_main.py").exists());
    assert!(result.missing_after_verify > 0);
}

#[test]
fn test_dry_run_mutates_nothing() {
    let tmp = tempdir().unwrap();
    let tests_dir = tmp.path().join("tests");
    write_flat_tests(&tests_dir);
    let before = snapshot_tree(&tests_dir);

    let engine = ReorgEngine::new(app_config(&tests_dir)).with_dry_run(true);
    let result = engine.run().unwrap();

    // Same decisions as a live run would make...
    assert_eq!(result.moved.len(), 5);

    // ...but no filesystem mutation at all
    assert_eq!(snapshot_tree(&tests_dir), before);
    assert!(!tests_dir.join("repositories").exists());
    assert!(!result.backup_dir.exists());
}

#[test]
fn test_reorganize_then_rollback_restores_starting_tree() {
    let tmp = tempdir().unwrap();
    let tests_dir = tmp.path().join("tests");
    write_flat_tests(&tests_dir);
    let before = snapshot_tree(&tests_dir);

    let engine = ReorgEngine::new(app_config(&tests_dir));
    let result = engine.run().unwrap();
    assert_ne!(snapshot_tree(&tests_dir), before);

    backup::rollback(&tests_dir, &result.backup_dir, false).unwrap();

    assert_eq!(snapshot_tree(&tests_dir), before);
}

#[test]
fn test_rollback_with_missing_backup_leaves_tree_unchanged() {
    let tmp = tempdir().unwrap();
    let tests_dir = tmp.path().join("tests");
    write_flat_tests(&tests_dir);
    let before = snapshot_tree(&tests_dir);

    let missing = tmp.path().join("tests_backup_19700101_000000");
    let result = backup::rollback(&tests_dir, &missing, false);

    match result {
        Err(Error::BackupMissing(path)) => assert_eq!(path, missing),
        other => panic!("expected BackupMissing, got {:?}", other),
    }
    assert_eq!(snapshot_tree(&tests_dir), before);
}

#[test]
fn test_second_rewrite_pass_changes_nothing() {
    let tmp = tempdir().unwrap();
    let tests_dir = tmp.path().join("tests");
    write_flat_tests(&tests_dir);

    let engine = ReorgEngine::new(app_config(&tests_dir));
    engine.run().unwrap();
    let after_first = snapshot_tree(&tests_dir);

    // A second run finds no flat files to move, so it warns per file and
    // rewrites nothing further.
    let second = ReorgEngine::new(app_config(&tests_dir)).run().unwrap();
    assert_eq!(second.moved.len(), 0);
    assert_eq!(second.updated_imports.len(), 0);

    assert_eq!(snapshot_tree(&tests_dir), after_first);
}
