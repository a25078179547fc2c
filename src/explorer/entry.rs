//! Tree node model: one explorer entry and its load state machine.

use crate::error::{StoreError, ValidationError};
use crate::store::EntryKind;

/// Identifier of one list-children request, monotonic per explorer.
pub type RequestId = u64;

/// Load state of a directory's children.
///
/// ```text
/// Unloaded ──expand──▶ Loading ──ok──▶ Loaded
///                         │               │
///                        err           refresh
///                         ▼               │
///                      Errored ◀──────────┘ (on failure)
/// ```
///
/// `Loaded` and `Errored` re-enter `Loading` on refresh; `Errored` also on
/// expand. Files stay `Unloaded` forever.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Unloaded,
    Loading {
        request: RequestId,
        /// A refresh arrived while this request was in flight; its result is
        /// stale on arrival and a new fetch follows.
        refresh_queued: bool,
    },
    Loaded,
    Errored(StoreError),
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading { .. })
    }
}

/// One file or directory in the explorer.
///
/// Children are referenced by path only; there is no parent link; the
/// parent of an entry is derived from its path.
#[derive(Debug, Clone)]
pub struct TreeEntry {
    pub name: String,
    pub path: String,
    pub kind: EntryKind,
    /// Ordered child paths. `None` until the first successful listing; kept
    /// through `Loading` and `Errored` so a failed refresh does not blank the
    /// directory.
    pub children: Option<Vec<String>>,
    pub expanded: bool,
    pub load: LoadState,
}

impl PartialEq for TreeEntry {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for TreeEntry {}

impl TreeEntry {
    /// The project root directory, unloaded and collapsed.
    pub fn root(name: &str) -> Self {
        Self::new(name.to_string(), name.to_string(), EntryKind::Directory)
    }

    /// A child entry of `parent_path` called `name`.
    pub fn child(parent_path: &str, name: &str, kind: EntryKind) -> Self {
        Self::new(name.to_string(), join_path(parent_path, name), kind)
    }

    fn new(name: String, path: String, kind: EntryKind) -> Self {
        Self {
            name,
            path,
            kind,
            children: None,
            expanded: false,
            load: LoadState::Unloaded,
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// Join a child name onto a parent path.
pub fn join_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", parent, name)
    }
}

/// Parent path of `path`, or `None` for a single-segment (root) path.
pub fn parent_path(path: &str) -> Option<&str> {
    path.rsplit_once('/').map(|(parent, _)| parent)
}

/// Last segment of `path`.
pub fn file_name(path: &str) -> &str {
    path.rsplit_once('/').map_or(path, |(_, name)| name)
}

/// Whether `path` is `ancestor` or lies beneath it.
pub fn is_within(path: &str, ancestor: &str) -> bool {
    path == ancestor
        || (path.starts_with(ancestor) && path.as_bytes().get(ancestor.len()) == Some(&b'/'))
}

/// Whether a name reported by a store can be joined onto its parent path.
///
/// Store listings are authoritative, so only names that would break the
/// path join are refused; spaces and backslashes are kept as listed.
pub fn is_listable_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains('/')
}

/// Check a user-supplied name for a new file or directory.
pub fn validate_name(name: &str) -> Result<&str, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if trimmed == "."
        || trimmed == ".."
        || trimmed.contains(['/', '\\'])
        || trimmed.chars().any(char::is_control)
    {
        return Err(ValidationError::InvalidName(trimmed.to_string()));
    }
    Ok(trimmed)
}
