use lazy_static::lazy_static;
use std::path::PathBuf;

/// One node of the target layout tree.
///
/// `Leaf` files land directly in the directory the traversal is currently at,
/// so "files at this level plus deeper subdirectories" is a `Branch` whose
/// children start with a `Leaf`.
#[derive(Debug, Clone)]
pub enum LayoutNode {
    Leaf(Vec<&'static str>),
    Branch(&'static str, Vec<LayoutNode>),
}

use LayoutNode::{Branch, Leaf};

lazy_static! {
    /// Target tree for the reorganization, mirroring the application's module
    /// layout. Fixed for the life of the process.
    pub static ref TARGET_LAYOUT: Vec<LayoutNode> = vec![
        Branch("repositories", vec![Leaf(vec![
            "test_user_repository.py",
            "test_api_key_repository.py",
            "test_category_repository.py",
            "test_rss_feed_repository.py",
            "test_source_repository.py",
        ])]),
        Branch("utils", vec![Leaf(vec![
            "test_utils.py",
            "test_utils_api.py",
            "test_utils_cleanup.py",
            "test_utils_image.py",
            "test_utils_async_mocks.py",
            "test_utils_retry.py",
            "test_image.py",
            "test_image_utils.py",
            "test_video.py",
            "test_cleanup.py",
            "test_cache.py",
            "test_retry.py",
            "test_text.py",
        ])]),
        Branch("exceptions", vec![Leaf(vec![
            "test_cache_exceptions.py",
            "test_database_exceptions.py",
            "test_service_exceptions.py",
            "test_exceptions.py",
        ])]),
        Branch("services", vec![
            Branch("translation", vec![Leaf(vec!["test_translation_service.py"])]),
            Branch("text_analysis", vec![Leaf(vec!["test_duplicate_detector.py"])]),
            Branch("user", vec![Leaf(vec!["test_user_service.py"])]),
            Branch("email", vec![Leaf(vec![
                "test_email.py",
                "test_email_sender.py",
                "test_registration_success_email.py",
            ])]),
            Branch("maintenance", vec![Leaf(vec!["test_maintenance_service.py"])]),
        ]),
        Branch("apps", vec![
            Branch("api", vec![
                Leaf(vec![
                    "test_api.py",
                    "test_auth.py",
                    "test_models.py",
                    "test_middleware.py",
                    "test_websocket.py",
                ]),
                Branch("routers", vec![Leaf(vec![
                    "test_api_keys.py",
                    "test_categories.py",
                    "test_rss_feeds.py",
                    "test_rss_items_router.py",
                    "test_rss_router.py",
                    "test_telegram.py",
                    "test_users.py",
                ])]),
            ]),
            Branch("rss_parser", vec![
                Leaf(vec![
                    "test_rss_fetcher.py",
                    "test_rss_manager.py",
                    "test_rss_storage.py",
                    "test_rss_validator.py",
                ]),
                Branch("services", vec![Leaf(vec!["test_services.py"])]),
            ]),
        ]),
        Branch("integration", vec![Leaf(vec![
            "test_di_integration.py",
            "test_database.py",
            "test_database_pool_adapter.py",
            "test_app.py",
            "test_main.py",
        ])]),
    ];
}

/// Where a single file belongs: its name plus the directory segments under the
/// tests root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub filename: &'static str,
    pub segments: Vec<&'static str>,
}

impl Placement {
    pub fn relative_path(&self) -> PathBuf {
        let mut path: PathBuf = self.segments.iter().copied().collect();
        path.push(self.filename);
        path
    }
}

/// Flatten the tree into (filename, segments) placements, depth-first.
/// The order of the result is the traversal order; it drives the move phase
/// and first-match module resolution.
pub fn flatten(nodes: &[LayoutNode]) -> Vec<Placement> {
    let mut placements = Vec::new();
    collect(nodes, &mut Vec::new(), &mut placements);
    placements
}

fn collect(
    nodes: &[LayoutNode],
    path: &mut Vec<&'static str>,
    placements: &mut Vec<Placement>,
) {
    for node in nodes {
        match node {
            Leaf(files) => {
                for filename in files {
                    placements.push(Placement {
                        filename,
                        segments: path.clone(),
                    });
                }
            }
            Branch(name, children) => {
                path.push(name);
                collect(children, path, placements);
                path.pop();
            }
        }
    }
}

/// Every directory the tree names, parents before children.
pub fn directories(nodes: &[LayoutNode]) -> Vec<PathBuf> {
    fn walk(nodes: &[LayoutNode], prefix: &PathBuf, dirs: &mut Vec<PathBuf>) {
        for node in nodes {
            if let Branch(name, children) = node {
                let dir = prefix.join(name);
                dirs.push(dir.clone());
                walk(children, &dir, dirs);
            }
        }
    }

    let mut dirs = Vec::new();
    walk(nodes, &PathBuf::new(), &mut dirs);
    dirs
}

/// Resolve a bare module name to its new dotted location, e.g.
/// `test_user_repository` → `repositories.test_user_repository`.
/// First match in traversal order wins; unknown names resolve to `None`.
pub fn resolve_module(nodes: &[LayoutNode], module: &str) -> Option<String> {
    let filename = format!("{module}.py");
    flatten(nodes)
        .into_iter()
        .find(|placement| placement.filename == filename)
        .map(|placement| {
            let mut parts: Vec<&str> = placement.segments.to_vec();
            parts.push(module);
            parts.join(".")
        })
}
