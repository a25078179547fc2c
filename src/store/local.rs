use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::fs;

use crate::error::StoreError;
use crate::store::{sanitize_path, EntryKind, ListedEntry, RemoteFileStore, StoreFuture};

/// A directory on this machine served through the [`RemoteFileStore`] contract.
///
/// Used for offline work and as the backing store in tests. Every request
/// path is sanitised and resolved under `root`.
#[derive(Debug, Clone)]
pub struct LocalFileStore {
    root: Arc<PathBuf>,
}

impl LocalFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Arc::new(root.into()),
        }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let clean = sanitize_path(path);
        if clean.is_empty() {
            self.root.to_path_buf()
        } else {
            self.root.join(clean)
        }
    }
}

/// Map an I/O failure onto the store taxonomy.
fn map_io(err: std::io::Error, path: &str) -> StoreError {
    match err.kind() {
        ErrorKind::NotFound => StoreError::NotFound(path.to_string()),
        ErrorKind::AlreadyExists => StoreError::AlreadyExists(path.to_string()),
        ErrorKind::PermissionDenied => StoreError::Unauthorized,
        ErrorKind::Interrupted | ErrorKind::TimedOut | ErrorKind::WouldBlock => {
            StoreError::Transient(err.to_string())
        }
        _ => StoreError::Rejected(format!("{}: {}", path, err)),
    }
}

/// Validate a single new entry name before joining it onto a path.
fn checked_child(parent: &Path, name: &str) -> Result<PathBuf, StoreError> {
    if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(StoreError::Rejected(format!("invalid name: {}", name)));
    }
    Ok(parent.join(name))
}

async fn list_dir(dir: PathBuf, display: String) -> Result<Vec<ListedEntry>, StoreError> {
    let mut entries = fs::read_dir(&dir).await.map_err(|e| map_io(e, &display))?;
    let mut listed = Vec::new();
    // Unreadable entries and broken symlinks are skipped rather than failing
    // the whole listing.
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| map_io(e, &display))?
    {
        let Ok(metadata) = fs::metadata(entry.path()).await else {
            continue;
        };
        let name = entry.file_name().to_string_lossy().to_string();
        listed.push(ListedEntry {
            name,
            kind: if metadata.is_dir() {
                EntryKind::Directory
            } else {
                EntryKind::File
            },
        });
    }
    Ok(listed)
}

impl RemoteFileStore for LocalFileStore {
    fn list_children(&self, path: String) -> StoreFuture<Vec<ListedEntry>> {
        let dir = self.resolve(&path);
        Box::pin(async move {
            let metadata = fs::metadata(&dir).await.map_err(|e| map_io(e, &path))?;
            if !metadata.is_dir() {
                return Err(StoreError::Rejected(format!("not a directory: {}", path)));
            }
            list_dir(dir, path).await
        })
    }

    fn read_file(&self, path: String) -> StoreFuture<String> {
        let file = self.resolve(&path);
        Box::pin(async move {
            let bytes = fs::read(&file).await.map_err(|e| map_io(e, &path))?;
            Ok(String::from_utf8_lossy(&bytes).into_owned())
        })
    }

    fn write_file(&self, path: String, content: String) -> StoreFuture<()> {
        let file = self.resolve(&path);
        Box::pin(async move {
            // Writes only replace existing files, matching the remote API.
            let metadata = fs::metadata(&file).await.map_err(|e| map_io(e, &path))?;
            if !metadata.is_file() {
                return Err(StoreError::Rejected(format!("not a file: {}", path)));
            }
            fs::write(&file, content)
                .await
                .map_err(|e| map_io(e, &path))
        })
    }

    fn create_file(&self, parent: String, name: String) -> StoreFuture<()> {
        let dir = self.resolve(&parent);
        Box::pin(async move {
            let target = checked_child(&dir, &name)?;
            fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&target)
                .await
                .map(|_| ())
                .map_err(|e| map_io(e, &format!("{}/{}", parent, name)))
        })
    }

    fn create_directory(&self, parent: String, name: String) -> StoreFuture<()> {
        let dir = self.resolve(&parent);
        Box::pin(async move {
            let target = checked_child(&dir, &name)?;
            fs::create_dir(&target)
                .await
                .map_err(|e| map_io(e, &format!("{}/{}", parent, name)))
        })
    }

    fn delete_entry(&self, path: String, kind: EntryKind) -> StoreFuture<()> {
        let target = self.resolve(&path);
        let is_root = sanitize_path(&path).is_empty();
        Box::pin(async move {
            if is_root {
                return Err(StoreError::Rejected("refusing to delete project root".into()));
            }
            let result = match kind {
                EntryKind::Directory => fs::remove_dir_all(&target).await,
                EntryKind::File => fs::remove_file(&target).await,
            };
            result.map_err(|e| map_io(e, &path))
        })
    }
}
