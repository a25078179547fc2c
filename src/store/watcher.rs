//! Local change watcher.
//!
//! When the project is served from a local directory, edits made outside the
//! client (another editor, `git checkout`, a build) would otherwise leave the
//! explorer stale until a manual refresh. The watcher turns debounced
//! filesystem events into refresh requests for the affected directories.

use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use notify_debouncer_mini::{new_debouncer, DebouncedEventKind};

use crate::explorer::bridge::RefreshHandle;
use crate::explorer::entry::join_path;

/// Default patterns to ignore when watching the filesystem.
pub const DEFAULT_IGNORE_PATTERNS: &[&str] = &[
    ".git",
    "node_modules",
    "__pycache__",
    "venv",
    ".venv",
    ".tox",
    ".mypy_cache",
    ".pytest_cache",
    "target",
];

/// Default flood threshold (directories per debounce window).
pub const DEFAULT_FLOOD_THRESHOLD: usize = 100;

/// Watches a local project root and requests explorer refreshes.
///
/// Dropping the watcher stops it.
pub struct LocalWatcher {
    _debouncer: notify_debouncer_mini::Debouncer<notify::RecommendedWatcher>,
}

impl LocalWatcher {
    /// Watch `root` recursively; changes are reported against `tree_root`,
    /// the explorer path of the project root.
    ///
    /// If more than `flood_threshold` directories change in one debounce
    /// window, a single refresh of the root is requested instead.
    pub fn new(
        root: &Path,
        tree_root: String,
        debounce: Duration,
        ignore_patterns: Vec<String>,
        flood_threshold: usize,
        refresh: RefreshHandle,
    ) -> notify::Result<Self> {
        let root_path = root.to_path_buf();

        let mut debouncer = new_debouncer(
            debounce,
            move |result: Result<Vec<notify_debouncer_mini::DebouncedEvent>, notify::Error>| {
                match result {
                    Ok(events) => {
                        let paths: Vec<PathBuf> = events
                            .into_iter()
                            .filter(|e| e.kind == DebouncedEventKind::Any)
                            .map(|e| e.path)
                            .filter(|p| !should_ignore(p, &ignore_patterns))
                            .collect();
                        for target in
                            refresh_targets(&root_path, &tree_root, &paths, flood_threshold)
                        {
                            refresh.refresh(target);
                        }
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "filesystem watcher error");
                    }
                }
            },
        )?;

        debouncer
            .watcher()
            .watch(root, notify::RecursiveMode::Recursive)?;
        tracing::info!(root = %root.display(), "watching local project");

        Ok(Self {
            _debouncer: debouncer,
        })
    }
}

/// Check if a path should be ignored based on ignore patterns.
///
/// A path is ignored if any of its components match any ignore pattern exactly.
pub fn should_ignore(path: &Path, patterns: &[String]) -> bool {
    path.components().any(|component| match component {
        Component::Normal(name) => {
            let name = name.to_string_lossy();
            patterns.iter().any(|p| *p == name)
        }
        _ => false,
    })
}

/// Map changed filesystem paths to the explorer paths of the directories
/// whose listings they invalidate (each path's parent), deduplicated.
fn refresh_targets(
    root: &Path,
    tree_root: &str,
    changed: &[PathBuf],
    flood_threshold: usize,
) -> Vec<String> {
    let mut targets = BTreeSet::new();
    for path in changed {
        let Ok(relative) = path.strip_prefix(root) else {
            continue;
        };
        let parent = relative.parent().unwrap_or(Path::new(""));
        let tree_path = parent
            .components()
            .filter_map(|c| match c {
                Component::Normal(name) => Some(name.to_string_lossy().to_string()),
                _ => None,
            })
            .fold(tree_root.to_string(), |acc, name| join_path(&acc, &name));
        targets.insert(tree_path);
    }

    if targets.len() > flood_threshold {
        return vec![tree_root.to_string()];
    }
    targets.into_iter().collect()
}
