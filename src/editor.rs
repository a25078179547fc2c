//! Read-only editor pane state: content of the active file.
//!
//! Content is fetched through [`RemoteFileStore::read_file`]. Each open
//! bumps a request counter; a read that completes after a newer open is
//! dropped.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;

use crate::error::StoreError;
use crate::event::{Event, StoreCompletion};
use crate::explorer::entry::file_name;
use crate::store::RemoteFileStore;

/// Bytes inspected when sniffing content for binary data.
const SNIFF_LEN: usize = 8192;

/// Extensions shown as a placeholder instead of text.
const BINARY_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "bmp", "ico", "webp", "pdf", "zip", "tar", "gz", "rar", "7z",
    "exe", "dll", "so", "dylib", "class", "pyc", "jar", "war", "ear", "mp3", "mp4", "avi", "mov",
    "flv", "wmv", "wav",
];

fn extension(path: &str) -> Option<String> {
    let name = file_name(path);
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => Some(ext.to_ascii_lowercase()),
        _ => None,
    }
}

/// Language label for the pane title, from the file extension.
pub fn detect_language(path: &str) -> &'static str {
    match extension(path).as_deref() {
        Some("py") => "python",
        Some("js" | "jsx") => "javascript",
        Some("ts" | "tsx") => "typescript",
        Some("html") => "html",
        Some("css") => "css",
        Some("scss") => "scss",
        Some("less") => "less",
        Some("json") => "json",
        Some("md") => "markdown",
        Some("java") => "java",
        Some("c" | "h") => "c",
        Some("cpp") => "cpp",
        Some("php") => "php",
        Some("rb") => "ruby",
        Some("sh" | "bash") => "shell",
        Some("yaml" | "yml") => "yaml",
        Some("xml") => "xml",
        Some("sql") => "sql",
        Some("go") => "go",
        Some("rs") => "rust",
        Some("swift") => "swift",
        Some("kt") => "kotlin",
        Some("vue") => "vue",
        _ => "plaintext",
    }
}

/// Whether the extension marks a binary format.
pub fn is_binary_name(path: &str) -> bool {
    extension(path).is_some_and(|ext| BINARY_EXTENSIONS.contains(&ext.as_str()))
}

/// Whether content looks binary (NUL byte in the first few KiB).
pub fn is_binary_content(content: &str) -> bool {
    content.as_bytes().iter().take(SNIFF_LEN).any(|b| *b == 0)
}

/// What the pane currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaneContent {
    /// Nothing selected yet.
    Welcome,
    Loading,
    Text(Vec<String>),
    Binary,
    Failed(String),
}

/// Editor pane state.
pub struct EditorPane {
    path: Option<String>,
    language: &'static str,
    content: PaneContent,
    request: u64,
    pub scroll_offset: usize,
}

impl Default for EditorPane {
    fn default() -> Self {
        Self {
            path: None,
            language: "plaintext",
            content: PaneContent::Welcome,
            request: 0,
            scroll_offset: 0,
        }
    }
}

impl EditorPane {
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn language(&self) -> &'static str {
        self.language
    }

    pub fn content(&self) -> &PaneContent {
        &self.content
    }

    pub fn line_count(&self) -> usize {
        match &self.content {
            PaneContent::Text(lines) => lines.len(),
            _ => 0,
        }
    }

    /// Open `path` (a tree path) and start reading `store_path` from the store.
    pub fn open(
        &mut self,
        path: &str,
        store_path: String,
        store: &Arc<dyn RemoteFileStore>,
        tx: &mpsc::UnboundedSender<Event>,
    ) {
        self.request += 1;
        self.path = Some(path.to_string());
        self.language = detect_language(path);
        self.scroll_offset = 0;

        if is_binary_name(path) {
            self.content = PaneContent::Binary;
            return;
        }
        self.content = PaneContent::Loading;

        let request = self.request;
        let call = store.read_file(store_path);
        let path = path.to_string();
        let tx = tx.clone();
        debug!(path, request, "file read requested");
        tokio::spawn(async move {
            let _ = tx.send(Event::Store(StoreCompletion::FileRead {
                path,
                request,
                result: call.await,
            }));
        });
    }

    /// Apply a finished read. Returns whether it was current.
    pub fn apply_read(
        &mut self,
        path: &str,
        request: u64,
        result: Result<String, StoreError>,
    ) -> bool {
        if request != self.request || self.path.as_deref() != Some(path) {
            debug!(path, request, "discarding stale file read");
            return false;
        }
        self.content = match result {
            Ok(text) if is_binary_content(&text) => PaneContent::Binary,
            Ok(text) => PaneContent::Text(text.lines().map(str::to_string).collect()),
            Err(err) => PaneContent::Failed(err.to_string()),
        };
        true
    }

    /// Back to the welcome screen; late reads are dropped.
    pub fn clear(&mut self) {
        self.request += 1;
        self.path = None;
        self.language = "plaintext";
        self.content = PaneContent::Welcome;
        self.scroll_offset = 0;
    }

    pub fn scroll_down(&mut self, lines: usize, viewport: usize) {
        let max = self.line_count().saturating_sub(viewport.max(1));
        self.scroll_offset = (self.scroll_offset + lines).min(max);
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(lines);
    }
}
