//! Remote file store boundary.
//!
//! The explorer never touches a filesystem or a socket directly. It talks to
//! a [`RemoteFileStore`], which is either the Cloud IDE HTTP API
//! ([`http::HttpFileStore`]) or a local directory standing in for one
//! ([`local::LocalFileStore`]).
//!
//! All paths handed to a store are relative to the project root and
//! slash-separated; the root itself is the empty string.

pub mod http;
pub mod local;
pub mod watcher;

use std::future::Future;
use std::pin::Pin;

use serde::Deserialize;

use crate::error::StoreError;

/// Boxed async result used by [`RemoteFileStore`] methods.
pub type StoreFuture<T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + Send>>;

/// Kind of an entry on the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
}

/// One row of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedEntry {
    pub name: String,
    pub kind: EntryKind,
}

impl ListedEntry {
    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::File,
        }
    }

    pub fn directory(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Directory,
        }
    }
}

/// Async, fallible, latency-bearing access to a project's files.
///
/// Production uses [`http::HttpFileStore`] or [`local::LocalFileStore`];
/// tests inject `MockRemoteFileStore` to count calls and inject failures.
#[cfg_attr(test, mockall::automock)]
pub trait RemoteFileStore: Send + Sync {
    /// Lists the immediate children of the directory at `path`.
    ///
    /// # Errors
    /// `NotFound` if the directory is gone, `Unauthorized` for a bad
    /// session, `Transient` for network failures.
    fn list_children(&self, path: String) -> StoreFuture<Vec<ListedEntry>>;

    /// Reads the whole content of the file at `path`.
    fn read_file(&self, path: String) -> StoreFuture<String>;

    /// Replaces the content of an existing file.
    fn write_file(&self, path: String, content: String) -> StoreFuture<()>;

    /// Creates an empty file called `name` inside `parent`.
    ///
    /// # Errors
    /// `AlreadyExists` when `parent/name` is taken.
    fn create_file(&self, parent: String, name: String) -> StoreFuture<()>;

    /// Creates a directory called `name` inside `parent`.
    fn create_directory(&self, parent: String, name: String) -> StoreFuture<()>;

    /// Deletes the entry at `path`; directories are removed with their
    /// contents.
    fn delete_entry(&self, path: String, kind: EntryKind) -> StoreFuture<()>;
}

/// Normalise a store path: drop empty, `.` and `..` segments and leading or
/// trailing slashes, so no request can climb out of the project root.
pub fn sanitize_path(path: &str) -> String {
    path.split(['/', '\\'])
        .filter(|segment| !segment.is_empty() && *segment != "." && *segment != "..")
        .collect::<Vec<_>>()
        .join("/")
}
