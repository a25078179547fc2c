use std::future::Future;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::error::{ExplorerError, StoreError, ValidationError};
use crate::event::{Event, StoreCompletion};
use crate::explorer::bridge::{EventBus, ExplorerEvent, Operation, RefreshHandle};
use crate::explorer::entry::{is_within, parent_path, validate_name, LoadState, RequestId, TreeEntry};
use crate::explorer::tree::{EntryTree, FlatItem};
use crate::store::{EntryKind, ListedEntry, RemoteFileStore};

/// A create or delete sent to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    CreateFile { parent: String, name: String },
    CreateDirectory { parent: String, name: String },
    Delete { path: String, kind: EntryKind },
}

impl Mutation {
    pub fn operation(&self) -> Operation {
        match self {
            Mutation::CreateFile { .. } => Operation::CreateFile,
            Mutation::CreateDirectory { .. } => Operation::CreateDirectory,
            Mutation::Delete { .. } => Operation::Delete,
        }
    }

    /// Tree path of the entry being created or deleted.
    pub fn target(&self) -> String {
        match self {
            Mutation::CreateFile { parent, name } | Mutation::CreateDirectory { parent, name } => {
                format!("{}/{}", parent, name)
            }
            Mutation::Delete { path, .. } => path.clone(),
        }
    }

    /// Directory whose listing the mutation changes.
    pub fn parent(&self) -> &str {
        match self {
            Mutation::CreateFile { parent, .. } | Mutation::CreateDirectory { parent, .. } => parent,
            Mutation::Delete { path, .. } => parent_path(path).unwrap_or(path),
        }
    }
}

/// Explorer controller: the single writer of the file tree.
///
/// Operations mutate the tree synchronously and spawn store calls on the
/// tokio runtime. Each call reports back as an [`Event::Store`] on the
/// application channel; the event loop hands it to [`Explorer::apply_listing`]
/// or [`Explorer::apply_mutation`]. Store failures never escape as errors:
/// they are attached to the affected directory and published as
/// [`ExplorerEvent::OperationFailed`].
pub struct Explorer {
    tree: EntryTree,
    store: Arc<dyn RemoteFileStore>,
    tx: mpsc::UnboundedSender<Event>,
    bus: EventBus,
    active: Option<String>,
    next_request: RequestId,
    pending: usize,
}

impl Explorer {
    pub fn new(
        root_name: &str,
        store: Arc<dyn RemoteFileStore>,
        tx: mpsc::UnboundedSender<Event>,
    ) -> Self {
        Self {
            tree: EntryTree::new(root_name),
            store,
            tx,
            bus: EventBus::default(),
            active: None,
            next_request: 0,
            pending: 0,
        }
    }

    /// Load the root listing and show the root expanded.
    pub fn mount(&mut self) {
        let root = self.tree.root_path().to_string();
        self.expand(&root);
    }

    pub fn root_path(&self) -> &str {
        self.tree.root_path()
    }

    pub fn entry(&self, path: &str) -> Option<&TreeEntry> {
        self.tree.get(path)
    }

    /// The active selection, if any.
    pub fn active_file(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Number of store calls spawned and not yet applied.
    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Rows to render, root first.
    pub fn visible_items(&self) -> Vec<FlatItem> {
        self.tree.flatten()
    }

    /// Subscription point for collaborators.
    pub fn bus_mut(&mut self) -> &mut EventBus {
        &mut self.bus
    }

    /// Refresh signal collaborators can hold on to.
    pub fn refresh_handle(&self) -> RefreshHandle {
        RefreshHandle::new(self.tx.clone())
    }

    /// Path of a tree entry as the store addresses it (root is `""`).
    pub fn store_path(&self, path: &str) -> String {
        let root = self.tree.root_path();
        if path == root {
            return String::new();
        }
        path.strip_prefix(root)
            .and_then(|rest| rest.strip_prefix('/'))
            .unwrap_or(path)
            .to_string()
    }

    /// Expand a directory, fetching its children on first use or after a
    /// failed load. Returns the id of the listing request, if one was issued.
    pub fn expand(&mut self, path: &str) -> Option<RequestId> {
        let entry = self.tree.get_mut(path)?;
        if !entry.is_dir() {
            return None;
        }
        entry.expanded = true;
        match entry.load {
            LoadState::Unloaded | LoadState::Errored(_) => Some(self.start_listing(path)),
            LoadState::Loading { .. } | LoadState::Loaded => None,
        }
    }

    /// Hide a directory's children. Loaded children are kept.
    pub fn collapse(&mut self, path: &str) {
        if let Some(entry) = self.tree.get_mut(path) {
            entry.expanded = false;
        }
    }

    /// Collapse an expanded directory, expand a collapsed one.
    pub fn toggle(&mut self, path: &str) {
        match self.tree.get(path) {
            Some(entry) if entry.is_dir() && entry.expanded => self.collapse(path),
            Some(entry) if entry.is_dir() => {
                self.expand(path);
            }
            _ => {}
        }
    }

    /// Make `path` the single active selection. Paths that are not in the
    /// loaded tree are ignored.
    pub fn select(&mut self, path: &str) -> bool {
        if !self.tree.contains(path) {
            debug!(path, "ignoring selection of unknown path");
            return false;
        }
        self.active = Some(path.to_string());
        self.publish(ExplorerEvent::Selected {
            path: path.to_string(),
        });
        true
    }

    pub fn create_file(&mut self, parent: &str, name: &str) -> Result<(), ExplorerError> {
        let name = self.check_new_child(parent, name)?;
        self.spawn_mutation(Mutation::CreateFile {
            parent: parent.to_string(),
            name,
        });
        Ok(())
    }

    pub fn create_directory(&mut self, parent: &str, name: &str) -> Result<(), ExplorerError> {
        let name = self.check_new_child(parent, name)?;
        self.spawn_mutation(Mutation::CreateDirectory {
            parent: parent.to_string(),
            name,
        });
        Ok(())
    }

    /// Delete a file or directory. Confirmation is the caller's business.
    pub fn delete_entry(&mut self, path: &str) -> Result<(), ExplorerError> {
        if path == self.tree.root_path() {
            return Err(ValidationError::RootNotDeletable.into());
        }
        let kind = self
            .tree
            .get(path)
            .map(|entry| entry.kind)
            .ok_or_else(|| ValidationError::UnknownPath(path.to_string()))?;
        self.spawn_mutation(Mutation::Delete {
            path: path.to_string(),
            kind,
        });
        Ok(())
    }

    /// Re-fetch a directory regardless of its state. A file path refreshes
    /// its parent. If a listing is already in flight, the refresh is queued
    /// behind it instead of issuing a second call.
    pub fn refresh(&mut self, path: &str) -> Option<RequestId> {
        let entry = self.tree.get_mut(path)?;
        if !entry.is_dir() {
            let parent = parent_path(path)?.to_string();
            return self.refresh(&parent);
        }
        if let LoadState::Loading { refresh_queued, .. } = &mut entry.load {
            debug!(path, "refresh queued behind in-flight listing");
            *refresh_queued = true;
            return None;
        }
        Some(self.start_listing(path))
    }

    /// Apply a finished listing. Results for directories that left the tree,
    /// or for requests superseded by a newer one, are dropped.
    pub fn apply_listing(
        &mut self,
        path: String,
        request: RequestId,
        result: Result<Vec<ListedEntry>, StoreError>,
    ) {
        self.pending = self.pending.saturating_sub(1);

        let Some(entry) = self.tree.get_mut(&path) else {
            debug!(path, request, "discarding listing for directory no longer in tree");
            return;
        };
        let refresh_queued = match entry.load {
            LoadState::Loading {
                request: current,
                refresh_queued,
            } if current == request => refresh_queued,
            _ => {
                debug!(path, request, "discarding superseded listing");
                return;
            }
        };
        if refresh_queued {
            self.start_listing(&path);
            return;
        }

        match result {
            Ok(listing) => {
                debug!(path, count = listing.len(), "listing loaded");
                self.tree.replace_children(&path, listing);
                if let Some(entry) = self.tree.get_mut(&path) {
                    entry.load = LoadState::Loaded;
                }
                self.publish(ExplorerEvent::DirectoryLoaded { path });
                self.reconcile_selection();
            }
            Err(error) => {
                warn!(path, %error, "listing failed");
                if let Some(entry) = self.tree.get_mut(&path) {
                    entry.load = LoadState::Errored(error.clone());
                }
                self.publish(ExplorerEvent::OperationFailed {
                    operation: Operation::List,
                    path,
                    error,
                });
            }
        }
    }

    /// Apply a finished create or delete.
    pub fn apply_mutation(&mut self, mutation: Mutation, result: Result<(), StoreError>) {
        self.pending = self.pending.saturating_sub(1);

        let target = mutation.target();
        match result {
            Ok(()) => {
                info!(operation = %mutation.operation(), path = %target, "store mutation applied");
                let parent = mutation.parent().to_string();
                if let Mutation::Delete { path, .. } = &mutation {
                    if self.active.as_deref().is_some_and(|a| is_within(a, path)) {
                        self.active = None;
                        self.publish(ExplorerEvent::SelectionCleared);
                    }
                }
                self.refresh(&parent);
                if !matches!(mutation, Mutation::Delete { .. }) {
                    // Reveal the new entry.
                    if let Some(entry) = self.tree.get_mut(&parent) {
                        if entry.load.is_loading() {
                            entry.expanded = true;
                        }
                    }
                }
                self.publish(ExplorerEvent::TreeMutated { path: parent });
            }
            Err(error) => {
                warn!(operation = %mutation.operation(), path = %target, %error, "store mutation failed");
                self.publish(ExplorerEvent::OperationFailed {
                    operation: mutation.operation(),
                    path: target,
                    error,
                });
            }
        }
    }

    fn check_new_child(&self, parent: &str, name: &str) -> Result<String, ExplorerError> {
        let name = validate_name(name)?;
        let entry = self
            .tree
            .get(parent)
            .ok_or_else(|| ValidationError::UnknownPath(parent.to_string()))?;
        if !entry.is_dir() {
            return Err(ValidationError::NotADirectory(parent.to_string()).into());
        }
        if self.tree.child_named(parent, name).is_some() {
            return Err(ValidationError::DuplicateName(name.to_string()).into());
        }
        Ok(name.to_string())
    }

    fn start_listing(&mut self, path: &str) -> RequestId {
        self.next_request += 1;
        let request = self.next_request;
        if let Some(entry) = self.tree.get_mut(path) {
            entry.load = LoadState::Loading {
                request,
                refresh_queued: false,
            };
        }
        debug!(path, request, "listing requested");

        let call = self.store.list_children(self.store_path(path));
        let path = path.to_string();
        self.spawn(async move {
            StoreCompletion::Listing {
                path,
                request,
                result: call.await,
            }
        });
        request
    }

    fn spawn_mutation(&mut self, mutation: Mutation) {
        info!(operation = %mutation.operation(), path = %mutation.target(), "store mutation requested");
        let call = match &mutation {
            Mutation::CreateFile { parent, name } => {
                self.store.create_file(self.store_path(parent), name.clone())
            }
            Mutation::CreateDirectory { parent, name } => self
                .store
                .create_directory(self.store_path(parent), name.clone()),
            Mutation::Delete { path, kind } => self.store.delete_entry(self.store_path(path), *kind),
        };
        self.spawn(async move {
            StoreCompletion::Mutation {
                mutation,
                result: call.await,
            }
        });
    }

    fn spawn<F>(&mut self, task: F)
    where
        F: Future<Output = StoreCompletion> + Send + 'static,
    {
        self.pending += 1;
        let tx = self.tx.clone();
        tokio::spawn(async move {
            // A closed channel means the app is shutting down.
            let _ = tx.send(Event::Store(task.await));
        });
    }

    fn reconcile_selection(&mut self) {
        if let Some(active) = &self.active {
            if !self.tree.contains(active) {
                debug!(path = %active, "active selection left the tree");
                self.active = None;
                self.publish(ExplorerEvent::SelectionCleared);
            }
        }
    }

    fn publish(&mut self, event: ExplorerEvent) {
        self.bus.publish(&event);
    }
}
