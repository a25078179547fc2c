use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use crate::explorer::entry::{is_listable_name, join_path, LoadState, TreeEntry};
use crate::store::{EntryKind, ListedEntry};

/// What a rendered row stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowKind {
    /// A real file or directory.
    Entry,
    /// Placeholder under an expanded directory whose first listing is in flight.
    Loading,
    /// Placeholder under an expanded directory whose last listing failed.
    Failed(String),
}

/// A flattened representation of a tree entry for rendering.
///
/// Placeholder rows carry the path of the directory they belong to, so
/// activating one acts on that directory.
#[derive(Debug, Clone)]
pub struct FlatItem {
    pub name: String,
    pub path: String,
    pub kind: EntryKind,
    pub row: RowKind,
    pub depth: usize,
    pub is_expanded: bool,
    pub is_loading: bool,
    pub is_errored: bool,
    pub is_last_sibling: bool,
}

/// Sibling order: directories first, then case-sensitive byte order of names.
pub fn compare_entries(a_kind: EntryKind, a_name: &str, b_kind: EntryKind, b_name: &str) -> Ordering {
    let rank = |kind: EntryKind| match kind {
        EntryKind::Directory => 0,
        EntryKind::File => 1,
    };
    rank(a_kind)
        .cmp(&rank(b_kind))
        .then_with(|| a_name.cmp(b_name))
}

/// Sort a listing in place with [`compare_entries`].
pub fn sort_listing(listing: &mut [ListedEntry]) {
    listing.sort_by(|a, b| compare_entries(a.kind, &a.name, b.kind, &b.name));
}

/// Path-indexed arena holding every loaded explorer entry.
///
/// The root is always present. Every other entry is reachable from the root
/// through `children` lists; removing a child from its parent's list removes
/// its whole subtree from the arena.
#[derive(Debug)]
pub struct EntryTree {
    root: String,
    entries: HashMap<String, TreeEntry>,
}

impl EntryTree {
    /// A tree holding only an unloaded root called `root_name`.
    pub fn new(root_name: &str) -> Self {
        let root = TreeEntry::root(root_name);
        let mut entries = HashMap::new();
        let path = root.path.clone();
        entries.insert(path.clone(), root);
        Self {
            root: path,
            entries,
        }
    }

    pub fn root_path(&self) -> &str {
        &self.root
    }

    pub fn get(&self, path: &str) -> Option<&TreeEntry> {
        self.entries.get(path)
    }

    pub fn get_mut(&mut self, path: &str) -> Option<&mut TreeEntry> {
        self.entries.get_mut(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// The loaded child of `parent` called `name`, if any.
    pub fn child_named(&self, parent: &str, name: &str) -> Option<&TreeEntry> {
        self.get(parent)?
            .children
            .as_ref()?
            .iter()
            .filter_map(|p| self.entries.get(p))
            .find(|child| child.name == name)
    }

    /// Replace `parent`'s children with `listing`.
    ///
    /// The listing is sorted, entries with unusable or duplicate names are
    /// dropped. A child whose path and kind survive keeps its arena record
    /// (and with it its expanded flag and loaded subtree); children that
    /// vanished are pruned with their descendants.
    ///
    /// Returns the paths pruned from the arena.
    pub fn replace_children(&mut self, parent: &str, mut listing: Vec<ListedEntry>) -> Vec<String> {
        let mut pruned = Vec::new();
        if !self.get(parent).is_some_and(TreeEntry::is_dir) {
            return pruned;
        }

        sort_listing(&mut listing);

        let mut seen = HashSet::new();
        let mut new_children = Vec::with_capacity(listing.len());
        for item in listing {
            if !is_listable_name(&item.name) {
                tracing::warn!(parent, name = %item.name, "skipping entry with unusable name");
                continue;
            }
            if !seen.insert(item.name.clone()) {
                tracing::warn!(parent, name = %item.name, "skipping duplicate entry in listing");
                continue;
            }
            let path = join_path(parent, &item.name);
            match self.entries.get(&path).map(|existing| existing.kind) {
                Some(kind) if kind == item.kind => {}
                Some(_) => {
                    self.remove_subtree(&path, &mut pruned);
                    self.entries
                        .insert(path.clone(), TreeEntry::child(parent, &item.name, item.kind));
                }
                None => {
                    self.entries
                        .insert(path.clone(), TreeEntry::child(parent, &item.name, item.kind));
                }
            }
            new_children.push(path);
        }

        let old_children = self
            .get_mut(parent)
            .and_then(|entry| entry.children.replace(new_children.clone()))
            .unwrap_or_default();
        let keep: HashSet<&String> = new_children.iter().collect();
        for old in old_children.iter().filter(|p| !keep.contains(p)) {
            self.remove_subtree(old, &mut pruned);
        }
        pruned
    }

    /// Remove `path` and everything beneath it from the arena.
    fn remove_subtree(&mut self, path: &str, pruned: &mut Vec<String>) {
        let mut stack = vec![path.to_string()];
        while let Some(current) = stack.pop() {
            if let Some(entry) = self.entries.remove(&current) {
                if let Some(children) = entry.children {
                    stack.extend(children);
                }
                pruned.push(current);
            }
        }
    }

    /// Flatten the visible part of the tree into render rows, root first.
    ///
    /// Explicit stack walk; the depth of the tree never touches the call stack.
    pub fn flatten(&self) -> Vec<FlatItem> {
        enum Pending<'a> {
            Entry {
                entry: &'a TreeEntry,
                depth: usize,
                is_last: bool,
            },
            Row(FlatItem),
        }

        let mut items = Vec::with_capacity(self.entries.len());
        let Some(root) = self.get(&self.root) else {
            return items;
        };
        let mut stack = vec![Pending::Entry {
            entry: root,
            depth: 0,
            is_last: true,
        }];

        while let Some(next) = stack.pop() {
            let (entry, depth, is_last) = match next {
                Pending::Row(row) => {
                    items.push(row);
                    continue;
                }
                Pending::Entry {
                    entry,
                    depth,
                    is_last,
                } => (entry, depth, is_last),
            };

            items.push(FlatItem {
                name: entry.name.clone(),
                path: entry.path.clone(),
                kind: entry.kind,
                row: RowKind::Entry,
                depth,
                is_expanded: entry.expanded,
                is_loading: entry.load.is_loading(),
                is_errored: matches!(entry.load, LoadState::Errored(_)),
                is_last_sibling: is_last,
            });

            if !entry.is_dir() || !entry.expanded {
                continue;
            }

            let children: Vec<&TreeEntry> = entry
                .children
                .iter()
                .flatten()
                .filter_map(|p| self.entries.get(p))
                .collect();

            for (i, child) in children.iter().enumerate().rev() {
                stack.push(Pending::Entry {
                    entry: *child,
                    depth: depth + 1,
                    is_last: i == children.len() - 1,
                });
            }

            let placeholder = match &entry.load {
                LoadState::Errored(err) => Some(RowKind::Failed(err.to_string())),
                LoadState::Loading { .. } if entry.children.is_none() => Some(RowKind::Loading),
                _ => None,
            };
            if let Some(row) = placeholder {
                let name = match &row {
                    RowKind::Failed(msg) => format!("failed to load: {}", msg),
                    _ => "loading…".to_string(),
                };
                stack.push(Pending::Row(FlatItem {
                    name,
                    path: entry.path.clone(),
                    kind: EntryKind::Directory,
                    row,
                    depth: depth + 1,
                    is_expanded: false,
                    is_loading: false,
                    is_errored: false,
                    is_last_sibling: children.is_empty(),
                }));
            }
        }

        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(items: &[(&str, EntryKind)]) -> Vec<ListedEntry> {
        items
            .iter()
            .map(|(name, kind)| ListedEntry {
                name: name.to_string(),
                kind: *kind,
            })
            .collect()
    }

    fn child_names(tree: &EntryTree, parent: &str) -> Vec<String> {
        tree.get(parent)
            .and_then(|e| e.children.as_ref())
            .map(|children| {
                children
                    .iter()
                    .map(|p| tree.get(p).unwrap().name.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn expand_loaded(tree: &mut EntryTree, path: &str) {
        let entry = tree.get_mut(path).unwrap();
        entry.expanded = true;
        entry.load = LoadState::Loaded;
    }

    #[test]
    fn directories_first_then_case_sensitive_names() {
        let mut tree = EntryTree::new("demo");
        tree.replace_children(
            "demo",
            listing(&[
                ("b.txt", EntryKind::File),
                ("A", EntryKind::Directory),
                ("a.txt", EntryKind::File),
                ("B", EntryKind::Directory),
            ]),
        );
        assert_eq!(child_names(&tree, "demo"), vec!["A", "B", "a.txt", "b.txt"]);
    }

    #[test]
    fn uppercase_sorts_before_lowercase() {
        let mut tree = EntryTree::new("demo");
        tree.replace_children(
            "demo",
            listing(&[
                ("zeta.rs", EntryKind::File),
                ("Zeta.rs", EntryKind::File),
                ("alpha.rs", EntryKind::File),
            ]),
        );
        assert_eq!(
            child_names(&tree, "demo"),
            vec!["Zeta.rs", "alpha.rs", "zeta.rs"]
        );
    }

    #[test]
    fn child_paths_join_parent_and_name() {
        let mut tree = EntryTree::new("demo");
        tree.replace_children("demo", listing(&[("src", EntryKind::Directory)]));
        tree.replace_children(
            "demo/src",
            listing(&[("components", EntryKind::Directory), ("App.jsx", EntryKind::File)]),
        );
        tree.replace_children(
            "demo/src/components",
            listing(&[("Header.jsx", EntryKind::File)]),
        );

        for item in tree.flatten() {
            let entry = tree.get(&item.path).unwrap();
            let expected = match crate::explorer::entry::parent_path(&entry.path) {
                Some(parent) => join_path(parent, &entry.name),
                None => entry.name.clone(),
            };
            assert_eq!(entry.path, expected);
        }
        assert!(tree.contains("demo/src/components/Header.jsx"));
    }

    #[test]
    fn duplicate_and_invalid_names_are_dropped() {
        let mut tree = EntryTree::new("demo");
        tree.replace_children(
            "demo",
            listing(&[
                ("a.txt", EntryKind::File),
                ("a.txt", EntryKind::File),
                ("bad/name", EntryKind::File),
                ("", EntryKind::File),
                (".", EntryKind::Directory),
                ("..", EntryKind::Directory),
            ]),
        );
        assert_eq!(child_names(&tree, "demo"), vec!["a.txt"]);
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn listed_names_with_spaces_and_backslashes_are_kept() {
        let mut tree = EntryTree::new("demo");
        tree.replace_children(
            "demo",
            listing(&[
                ("notes ", EntryKind::File),
                (" lead.txt", EntryKind::File),
                ("back\\slash.txt", EntryKind::File),
                ("ok.txt", EntryKind::File),
            ]),
        );
        assert_eq!(
            child_names(&tree, "demo"),
            vec![" lead.txt", "back\\slash.txt", "notes ", "ok.txt"]
        );
        assert!(tree.contains("demo/notes "));
        assert_eq!(tree.get("demo/notes ").map(|e| e.name.as_str()), Some("notes "));
    }

    #[test]
    fn surviving_directories_keep_view_state() {
        let mut tree = EntryTree::new("demo");
        tree.replace_children("demo", listing(&[("src", EntryKind::Directory)]));
        expand_loaded(&mut tree, "demo/src");
        tree.replace_children("demo/src", listing(&[("main.rs", EntryKind::File)]));

        tree.replace_children(
            "demo",
            listing(&[("src", EntryKind::Directory), ("new.txt", EntryKind::File)]),
        );

        let src = tree.get("demo/src").unwrap();
        assert!(src.expanded);
        assert_eq!(src.load, LoadState::Loaded);
        assert!(tree.contains("demo/src/main.rs"));
    }

    #[test]
    fn vanished_children_are_pruned_with_descendants() {
        let mut tree = EntryTree::new("demo");
        tree.replace_children(
            "demo",
            listing(&[("src", EntryKind::Directory), ("a.txt", EntryKind::File)]),
        );
        tree.replace_children("demo/src", listing(&[("main.rs", EntryKind::File)]));

        let pruned = tree.replace_children("demo", listing(&[("a.txt", EntryKind::File)]));

        assert!(!tree.contains("demo/src"));
        assert!(!tree.contains("demo/src/main.rs"));
        assert!(pruned.contains(&"demo/src/main.rs".to_string()));
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn kind_change_replaces_entry() {
        let mut tree = EntryTree::new("demo");
        tree.replace_children("demo", listing(&[("thing", EntryKind::Directory)]));
        tree.replace_children("demo/thing", listing(&[("x", EntryKind::File)]));

        tree.replace_children("demo", listing(&[("thing", EntryKind::File)]));

        assert_eq!(tree.get("demo/thing").unwrap().kind, EntryKind::File);
        assert!(!tree.contains("demo/thing/x"));
    }

    #[test]
    fn child_named_finds_loaded_sibling() {
        let mut tree = EntryTree::new("demo");
        assert!(tree.child_named("demo", "a.txt").is_none());
        tree.replace_children("demo", listing(&[("a.txt", EntryKind::File)]));
        assert!(tree.child_named("demo", "a.txt").is_some());
        assert!(tree.child_named("demo", "A.txt").is_none());
    }

    #[test]
    fn replace_on_file_is_ignored() {
        let mut tree = EntryTree::new("demo");
        tree.replace_children("demo", listing(&[("a.txt", EntryKind::File)]));
        tree.replace_children("demo/a.txt", listing(&[("x", EntryKind::File)]));
        assert!(tree.get("demo/a.txt").unwrap().children.is_none());
    }

    #[test]
    fn flatten_shows_only_expanded_subtrees() {
        let mut tree = EntryTree::new("demo");
        expand_loaded(&mut tree, "demo");
        tree.replace_children(
            "demo",
            listing(&[
                ("src", EntryKind::Directory),
                ("public", EntryKind::Directory),
                ("package.json", EntryKind::File),
            ]),
        );
        tree.replace_children("demo/src", listing(&[("main.jsx", EntryKind::File)]));

        let names: Vec<String> = tree.flatten().into_iter().map(|i| i.name).collect();
        assert_eq!(names, vec!["demo", "public", "src", "package.json"]);

        expand_loaded(&mut tree, "demo/src");
        let items = tree.flatten();
        let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["demo", "public", "src", "main.jsx", "package.json"]);
        assert_eq!(items[3].depth, 2);
        assert!(items[3].is_last_sibling);
        assert!(items[4].is_last_sibling);
        assert!(!items[1].is_last_sibling);
    }

    #[test]
    fn flatten_marks_loading_and_failed_directories() {
        let mut tree = EntryTree::new("demo");
        {
            let root = tree.get_mut("demo").unwrap();
            root.expanded = true;
            root.load = LoadState::Loading {
                request: 1,
                refresh_queued: false,
            };
        }
        let items = tree.flatten();
        assert_eq!(items.len(), 2);
        assert!(items[0].is_loading);
        assert_eq!(items[1].row, RowKind::Loading);

        tree.get_mut("demo").unwrap().load =
            LoadState::Errored(crate::error::StoreError::Transient("timeout".into()));
        let items = tree.flatten();
        assert!(items[0].is_errored);
        assert!(matches!(items[1].row, RowKind::Failed(_)));
        assert_eq!(items[1].path, "demo");
    }

    #[test]
    fn failed_refresh_keeps_previous_children_visible() {
        let mut tree = EntryTree::new("demo");
        expand_loaded(&mut tree, "demo");
        tree.replace_children("demo", listing(&[("a.txt", EntryKind::File)]));
        tree.get_mut("demo").unwrap().load =
            LoadState::Errored(crate::error::StoreError::Transient("timeout".into()));

        let rows: Vec<RowKind> = tree.flatten().into_iter().map(|i| i.row).collect();
        assert_eq!(rows.len(), 3);
        assert!(matches!(rows[1], RowKind::Failed(_)));
        assert_eq!(rows[2], RowKind::Entry);
    }
}
