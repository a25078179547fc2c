use std::sync::Arc;
use std::time::{Duration, Instant};

use ratatui::layout::Rect;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::editor::EditorPane;
use crate::error::StoreError;
use crate::event::{Event, StoreCompletion};
use crate::explorer::bridge::{ExplorerEvent, Operation};
use crate::explorer::entry::parent_path;
use crate::explorer::tree::{FlatItem, RowKind};
use crate::explorer::Explorer;
use crate::store::{EntryKind, RemoteFileStore};
use crate::theme::{self, ThemeColors};

/// How long a status message stays visible.
const STATUS_TTL: Duration = Duration::from_secs(3);

/// The kind of dialog being displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogKind {
    CreateFile { parent: String },
    CreateDirectory { parent: String },
    DeleteConfirm { path: String, kind: EntryKind },
    Error { message: String },
}

/// Application mode.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub enum AppMode {
    #[default]
    Normal,
    Dialog(DialogKind),
}

/// State for a dialog's text input.
#[derive(Debug, Default)]
pub struct DialogState {
    pub input: String,
    pub cursor_position: usize,
}

/// Startup options resolved from config and CLI.
#[derive(Debug, Clone)]
pub struct AppOptions {
    pub confirm_delete: bool,
    pub use_icons: bool,
    pub sidebar_width: u16,
    pub theme: ThemeColors,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            confirm_delete: true,
            use_icons: true,
            sidebar_width: crate::config::DEFAULT_SIDEBAR_WIDTH,
            theme: theme::dark_theme(),
        }
    }
}

/// Main application state.
pub struct App {
    pub explorer: Explorer,
    pub editor: EditorPane,
    store: Arc<dyn RemoteFileStore>,
    tx: mpsc::UnboundedSender<Event>,
    /// Rows of the explorer as last flattened.
    pub rows: Vec<FlatItem>,
    pub selected_index: usize,
    pub scroll_offset: usize,
    pub mode: AppMode,
    pub dialog_state: DialogState,
    pub status_message: Option<(String, Instant, bool)>,
    pub sidebar_visible: bool,
    pub sidebar_width: u16,
    pub theme: ThemeColors,
    pub use_icons: bool,
    pub confirm_delete: bool,
    /// Inner area of the tree panel in the last frame, for mouse hits.
    pub tree_area: Rect,
    /// Text rows of the editor pane in the last frame.
    pub editor_viewport: usize,
    /// Whether a local watcher feeds refreshes (status bar indicator).
    pub watcher_active: bool,
    pub should_quit: bool,
}

impl App {
    /// Create the app for `project` and forward explorer events onto the
    /// event channel so collaborators react on the main loop.
    pub fn new(
        project: &str,
        store: Arc<dyn RemoteFileStore>,
        tx: mpsc::UnboundedSender<Event>,
        options: AppOptions,
    ) -> Self {
        let mut explorer = Explorer::new(project, store.clone(), tx.clone());
        let forward = tx.clone();
        explorer.bus_mut().subscribe(move |event| {
            let _ = forward.send(Event::Explorer(event.clone()));
        });

        let mut app = Self {
            explorer,
            editor: EditorPane::default(),
            store,
            tx,
            rows: Vec::new(),
            selected_index: 0,
            scroll_offset: 0,
            mode: AppMode::Normal,
            dialog_state: DialogState::default(),
            status_message: None,
            sidebar_visible: true,
            sidebar_width: options.sidebar_width,
            theme: options.theme,
            use_icons: options.use_icons,
            confirm_delete: options.confirm_delete,
            tree_area: Rect::default(),
            editor_viewport: 0,
            watcher_active: false,
            should_quit: false,
        };
        app.sync_rows();
        app
    }

    /// Load the project root.
    pub fn start(&mut self) {
        info!(project = %self.explorer.root_path(), "mounting explorer");
        self.explorer.mount();
        self.sync_rows();
    }

    /// Apply a non-input event.
    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Store(completion) => self.handle_store(completion),
            Event::Explorer(event) => self.handle_explorer_event(event),
            Event::RefreshRequested(path) => self.handle_refresh_request(&path),
            Event::Tick => self.clear_expired_status(),
            Event::Key(_) | Event::Mouse(_) | Event::Resize(_, _) => {}
        }
    }

    fn handle_store(&mut self, completion: StoreCompletion) {
        match completion {
            StoreCompletion::Listing {
                path,
                request,
                result,
            } => self.explorer.apply_listing(path, request, result),
            StoreCompletion::Mutation { mutation, result } => {
                self.explorer.apply_mutation(mutation, result)
            }
            StoreCompletion::FileRead {
                path,
                request,
                result,
            } => {
                self.editor.apply_read(&path, request, result);
            }
        }
        self.sync_rows();
    }

    fn handle_explorer_event(&mut self, event: ExplorerEvent) {
        match event {
            ExplorerEvent::Selected { path } => {
                let store_path = self.explorer.store_path(&path);
                self.editor.open(&path, store_path, &self.store, &self.tx);
            }
            ExplorerEvent::SelectionCleared => {
                self.editor.clear();
                self.set_status_message("Active file was removed".to_string());
            }
            ExplorerEvent::TreeMutated { path } => {
                self.set_status_message(format!("✓ Updated {}", path));
            }
            ExplorerEvent::DirectoryLoaded { .. } => {}
            ExplorerEvent::OperationFailed {
                operation,
                path,
                error,
            } => self.report_failure(operation, &path, &error),
        }
    }

    fn report_failure(&mut self, operation: Operation, path: &str, error: &StoreError) {
        let mut message = format!("{} failed for {}: {}", operation, path, error);
        if *error == StoreError::Unauthorized {
            message.push_str(" (check the session token)");
        }
        match operation {
            // shown inline in the tree as well
            Operation::List => self.set_error_message(message),
            _ => self.open_dialog(DialogKind::Error { message }),
        }
    }

    /// Refresh asked for by a collaborator. Directories that were never
    /// loaded are left alone; they fetch on first expand.
    pub fn handle_refresh_request(&mut self, path: &str) {
        let Some(entry) = self.explorer.entry(path) else {
            debug!(path, "refresh request for path outside loaded tree");
            return;
        };
        if entry.is_dir() && entry.children.is_none() && !entry.load.is_loading() {
            return;
        }
        self.explorer.refresh(path);
        self.sync_rows();
    }

    /// Re-flatten the tree, keeping the cursor on the same path if it survived.
    pub fn sync_rows(&mut self) {
        let previous = self
            .rows
            .get(self.selected_index)
            .map(|row| (row.path.clone(), row.row.clone()));
        self.rows = self.explorer.visible_items();
        if let Some((path, kind)) = previous {
            if let Some(idx) = self
                .rows
                .iter()
                .position(|row| row.path == path && row.row == kind)
            {
                self.selected_index = idx;
            }
        }
        if self.selected_index >= self.rows.len() {
            self.selected_index = self.rows.len().saturating_sub(1);
        }
    }

    pub fn selected_row(&self) -> Option<&FlatItem> {
        self.rows.get(self.selected_index)
    }

    // ── Dialog input ─────────────────────────────────────────────────────────

    /// Open a dialog of the given kind.
    pub fn open_dialog(&mut self, kind: DialogKind) {
        self.dialog_state = DialogState::default();
        self.mode = AppMode::Dialog(kind);
    }

    /// Close the current dialog and return to normal mode.
    pub fn close_dialog(&mut self) {
        self.mode = AppMode::Normal;
        self.dialog_state = DialogState::default();
    }

    /// Insert a character at the current cursor position.
    pub fn dialog_input_char(&mut self, c: char) {
        self.dialog_state
            .input
            .insert(self.dialog_state.cursor_position, c);
        self.dialog_state.cursor_position += c.len_utf8();
    }

    /// Delete the character before the cursor (backspace).
    pub fn dialog_delete_char(&mut self) {
        let before = &self.dialog_state.input[..self.dialog_state.cursor_position];
        if let Some(prev) = before.chars().next_back() {
            self.dialog_state.cursor_position -= prev.len_utf8();
            self.dialog_state
                .input
                .remove(self.dialog_state.cursor_position);
        }
    }

    pub fn dialog_move_cursor_left(&mut self) {
        let before = &self.dialog_state.input[..self.dialog_state.cursor_position];
        if let Some(prev) = before.chars().next_back() {
            self.dialog_state.cursor_position -= prev.len_utf8();
        }
    }

    pub fn dialog_move_cursor_right(&mut self) {
        let after = &self.dialog_state.input[self.dialog_state.cursor_position..];
        if let Some(next) = after.chars().next() {
            self.dialog_state.cursor_position += next.len_utf8();
        }
    }

    pub fn dialog_cursor_home(&mut self) {
        self.dialog_state.cursor_position = 0;
    }

    pub fn dialog_cursor_end(&mut self) {
        self.dialog_state.cursor_position = self.dialog_state.input.len();
    }

    /// Confirm the open dialog.
    pub fn submit_dialog(&mut self) {
        let AppMode::Dialog(kind) = self.mode.clone() else {
            return;
        };
        let result = match &kind {
            DialogKind::CreateFile { parent } => {
                self.explorer.create_file(parent, &self.dialog_state.input)
            }
            DialogKind::CreateDirectory { parent } => self
                .explorer
                .create_directory(parent, &self.dialog_state.input),
            DialogKind::DeleteConfirm { path, .. } => self.explorer.delete_entry(path),
            DialogKind::Error { .. } => Ok(()),
        };
        match result {
            Ok(()) => self.close_dialog(),
            // Keep input dialogs open so the name can be fixed.
            Err(err) => self.set_error_message(err.to_string()),
        }
    }

    // ── Status messages ──────────────────────────────────────────────────────

    /// Set a status message with current timestamp.
    pub fn set_status_message(&mut self, msg: String) {
        self.status_message = Some((msg, Instant::now(), false));
    }

    pub fn set_error_message(&mut self, msg: String) {
        self.status_message = Some((msg, Instant::now(), true));
    }

    /// Clear the status message once it has been shown long enough.
    pub fn clear_expired_status(&mut self) {
        if let Some((_, created, _)) = &self.status_message {
            if created.elapsed() > STATUS_TTL {
                self.status_message = None;
            }
        }
    }

    // ── Tree navigation ──────────────────────────────────────────────────────

    /// Directory new entries go into: the cursor's directory, or the parent
    /// of the cursor's file.
    pub fn current_dir(&self) -> String {
        match self.selected_row() {
            Some(row) if row.kind == EntryKind::Directory || row.row != RowKind::Entry => {
                row.path.clone()
            }
            Some(row) => parent_path(&row.path)
                .unwrap_or(self.explorer.root_path())
                .to_string(),
            None => self.explorer.root_path().to_string(),
        }
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn select_next(&mut self) {
        if self.selected_index + 1 < self.rows.len() {
            self.selected_index += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    pub fn select_first(&mut self) {
        self.selected_index = 0;
    }

    pub fn select_last(&mut self) {
        self.selected_index = self.rows.len().saturating_sub(1);
    }

    /// Keep the cursor row inside a viewport of `visible_height` rows.
    pub fn update_scroll(&mut self, visible_height: usize) {
        if visible_height == 0 {
            return;
        }
        if self.selected_index < self.scroll_offset {
            self.scroll_offset = self.selected_index;
        } else if self.selected_index >= self.scroll_offset + visible_height {
            self.scroll_offset = self.selected_index - visible_height + 1;
        }
    }

    /// Enter / click: toggle a directory, select a file. Placeholder rows
    /// retry their directory.
    pub fn activate_selected(&mut self) {
        let Some(row) = self.selected_row().cloned() else {
            return;
        };
        match (&row.row, row.kind) {
            (RowKind::Entry, EntryKind::Directory) => self.explorer.toggle(&row.path),
            (RowKind::Entry, EntryKind::File) => {
                self.explorer.select(&row.path);
            }
            (RowKind::Loading, _) => {}
            (RowKind::Failed(_), _) => {
                self.explorer.refresh(&row.path);
            }
        }
        self.sync_rows();
    }

    /// Right / l: expand a directory, or open a file.
    pub fn expand_selected(&mut self) {
        let Some(row) = self.selected_row().cloned() else {
            return;
        };
        if row.row != RowKind::Entry {
            return;
        }
        match row.kind {
            EntryKind::Directory => {
                self.explorer.expand(&row.path);
            }
            EntryKind::File => {
                self.explorer.select(&row.path);
            }
        }
        self.sync_rows();
    }

    /// Left / h: collapse an expanded directory, otherwise jump to the parent row.
    pub fn collapse_selected(&mut self) {
        let Some(row) = self.selected_row().cloned() else {
            return;
        };
        if row.row == RowKind::Entry && row.kind == EntryKind::Directory && row.is_expanded {
            self.explorer.collapse(&row.path);
            self.sync_rows();
            return;
        }
        let parent = match row.row {
            RowKind::Entry => parent_path(&row.path).map(str::to_string),
            _ => Some(row.path.clone()),
        };
        if let Some(parent) = parent {
            if let Some(idx) = self
                .rows
                .iter()
                .position(|r| r.path == parent && r.row == RowKind::Entry)
            {
                self.selected_index = idx;
            }
        }
    }

    /// Click on screen cell (`column`, `row`) inside the tree panel.
    pub fn click_tree(&mut self, column: u16, row: u16) {
        let area = self.tree_area;
        let inside = column >= area.x
            && column < area.x + area.width
            && row >= area.y
            && row < area.y + area.height;
        if !self.sidebar_visible || !inside {
            return;
        }
        let idx = self.scroll_offset + (row - area.y) as usize;
        if idx < self.rows.len() {
            self.selected_index = idx;
            self.activate_selected();
        }
    }

    // ── Explorer commands ────────────────────────────────────────────────────

    pub fn refresh_selected(&mut self) {
        if let Some(path) = self.selected_row().map(|row| row.path.clone()) {
            self.explorer.refresh(&path);
            self.sync_rows();
        }
    }

    pub fn refresh_root(&mut self) {
        let root = self.explorer.root_path().to_string();
        self.explorer.refresh(&root);
        self.sync_rows();
    }

    pub fn open_create_file(&mut self) {
        let parent = self.current_dir();
        self.open_dialog(DialogKind::CreateFile { parent });
    }

    pub fn open_create_directory(&mut self) {
        let parent = self.current_dir();
        self.open_dialog(DialogKind::CreateDirectory { parent });
    }

    /// Ask to delete the cursor's entry, or delete at once when
    /// confirmation is off.
    pub fn request_delete(&mut self) {
        let Some(row) = self.selected_row().cloned() else {
            return;
        };
        if row.row != RowKind::Entry {
            return;
        }
        if row.path == self.explorer.root_path() {
            self.set_error_message("The project root cannot be deleted".to_string());
            return;
        }
        if self.confirm_delete {
            self.open_dialog(DialogKind::DeleteConfirm {
                path: row.path,
                kind: row.kind,
            });
        } else if let Err(err) = self.explorer.delete_entry(&row.path) {
            self.set_error_message(err.to_string());
        }
    }

    pub fn page_down(&mut self) {
        let page = self.editor_viewport.max(1);
        self.editor.scroll_down(page, page);
    }

    pub fn page_up(&mut self) {
        self.editor.scroll_up(self.editor_viewport.max(1));
    }

    pub fn toggle_sidebar(&mut self) {
        self.sidebar_visible = !self.sidebar_visible;
    }

    pub fn toggle_theme(&mut self) {
        self.theme = theme::builtin(self.theme.mode.toggled());
        self.set_status_message(format!("Theme: {}", self.theme.mode.label()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};

    use tempfile::TempDir;

    use crate::editor::PaneContent;
    use crate::store::local::LocalFileStore;

    fn setup() -> (TempDir, App, mpsc::UnboundedReceiver<Event>) {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("public")).unwrap();
        fs::create_dir(dir.path().join("src")).unwrap();
        fs::write(dir.path().join("src").join("main.jsx"), "render();\n").unwrap();
        File::create(dir.path().join("package.json")).unwrap();
        let (tx, rx) = mpsc::unbounded_channel();
        let app = App::new(
            "demo",
            Arc::new(LocalFileStore::new(dir.path())),
            tx,
            AppOptions::default(),
        );
        (dir, app, rx)
    }

    /// Feed events back until nothing is in flight.
    async fn pump(app: &mut App, rx: &mut mpsc::UnboundedReceiver<Event>) {
        loop {
            while let Ok(event) = rx.try_recv() {
                app.handle_event(event);
            }
            if app.explorer.pending() == 0 && app.editor.content() != &PaneContent::Loading {
                break;
            }
            match rx.recv().await {
                Some(event) => app.handle_event(event),
                None => break,
            }
        }
    }

    async fn started() -> (TempDir, App, mpsc::UnboundedReceiver<Event>) {
        let (dir, mut app, mut rx) = setup();
        app.start();
        pump(&mut app, &mut rx).await;
        (dir, app, rx)
    }

    fn names(app: &App) -> Vec<&str> {
        app.rows.iter().map(|r| r.name.as_str()).collect()
    }

    #[tokio::test]
    async fn start_shows_root_listing() {
        let (_dir, app, _rx) = started().await;
        assert_eq!(names(&app), vec!["demo", "public", "src", "package.json"]);
        assert_eq!(app.selected_index, 0);
    }

    #[tokio::test]
    async fn navigation_clamps() {
        let (_dir, mut app, _rx) = started().await;
        app.select_previous();
        assert_eq!(app.selected_index, 0);
        app.select_last();
        assert_eq!(app.selected_index, 3);
        app.select_next();
        assert_eq!(app.selected_index, 3);
        app.select_first();
        assert_eq!(app.selected_index, 0);
    }

    #[tokio::test]
    async fn activating_file_opens_it_in_editor() {
        let (_dir, mut app, mut rx) = started().await;
        app.selected_index = 2;
        app.activate_selected();
        pump(&mut app, &mut rx).await;
        assert_eq!(names(&app), vec!["demo", "public", "src", "main.jsx", "package.json"]);

        app.selected_index = 3;
        app.activate_selected();
        pump(&mut app, &mut rx).await;

        assert_eq!(app.explorer.active_file(), Some("demo/src/main.jsx"));
        assert_eq!(app.editor.path(), Some("demo/src/main.jsx"));
        assert_eq!(app.editor.language(), "javascript");
        assert_eq!(
            app.editor.content(),
            &PaneContent::Text(vec!["render();".to_string()])
        );
    }

    #[tokio::test]
    async fn collapse_jumps_to_parent() {
        let (_dir, mut app, mut rx) = started().await;
        app.selected_index = 2;
        app.expand_selected();
        pump(&mut app, &mut rx).await;
        app.selected_index = 3;
        app.collapse_selected();
        assert_eq!(app.selected_index, 2);
        app.collapse_selected();
        assert!(!app.rows[2].is_expanded);
        assert_eq!(names(&app).len(), 4);
    }

    #[tokio::test]
    async fn create_dialog_targets_cursor_directory() {
        let (dir, mut app, mut rx) = started().await;
        app.selected_index = 3;
        app.open_create_file();
        assert_eq!(
            app.mode,
            AppMode::Dialog(DialogKind::CreateFile {
                parent: "demo".into()
            })
        );
        for c in "notes.md".chars() {
            app.dialog_input_char(c);
        }
        app.submit_dialog();
        assert_eq!(app.mode, AppMode::Normal);
        pump(&mut app, &mut rx).await;

        assert!(dir.path().join("notes.md").is_file());
        assert!(names(&app).contains(&"notes.md"));
        let (msg, _, is_error) = app.status_message.as_ref().unwrap();
        assert!(msg.contains("Updated demo"));
        assert!(!is_error);
    }

    #[tokio::test]
    async fn invalid_name_keeps_dialog_open() {
        let (_dir, mut app, _rx) = started().await;
        app.open_create_directory();
        app.dialog_input_char('s');
        app.dialog_input_char('r');
        app.dialog_input_char('c');
        app.submit_dialog();

        assert!(matches!(
            app.mode,
            AppMode::Dialog(DialogKind::CreateDirectory { .. })
        ));
        let (msg, _, is_error) = app.status_message.as_ref().unwrap();
        assert_eq!(msg, "'src' already exists here");
        assert!(is_error);
    }

    #[tokio::test]
    async fn delete_of_active_file_clears_editor() {
        let (dir, mut app, mut rx) = started().await;
        app.selected_index = 3;
        app.activate_selected();
        pump(&mut app, &mut rx).await;
        assert_eq!(app.editor.path(), Some("demo/package.json"));

        app.request_delete();
        assert!(matches!(app.mode, AppMode::Dialog(DialogKind::DeleteConfirm { .. })));
        app.submit_dialog();
        pump(&mut app, &mut rx).await;

        assert!(!dir.path().join("package.json").exists());
        assert_eq!(app.editor.content(), &PaneContent::Welcome);
        assert_eq!(names(&app), vec!["demo", "public", "src"]);
        assert!(app.selected_index < app.rows.len());
    }

    #[tokio::test]
    async fn root_delete_is_refused() {
        let (_dir, mut app, _rx) = started().await;
        app.request_delete();
        assert_eq!(app.mode, AppMode::Normal);
        assert!(app.status_message.as_ref().unwrap().2);
    }

    #[tokio::test]
    async fn refresh_request_skips_unloaded_directories() {
        let (dir, mut app, mut rx) = started().await;
        fs::write(dir.path().join("src").join("extra.js"), "").unwrap();
        app.handle_refresh_request("demo/src");
        assert_eq!(app.explorer.pending(), 0);

        fs::write(dir.path().join("README.md"), "").unwrap();
        app.handle_refresh_request("demo");
        pump(&mut app, &mut rx).await;
        assert!(names(&app).contains(&"README.md"));
    }

    #[tokio::test]
    async fn failed_mutation_opens_error_dialog() {
        let (dir, mut app, mut rx) = started().await;
        app.selected_index = 1;
        app.open_create_file();
        app.dialog_input_char('x');
        // remove the parent behind the explorer's back
        fs::remove_dir(dir.path().join("public")).unwrap();
        app.submit_dialog();
        pump(&mut app, &mut rx).await;

        match &app.mode {
            AppMode::Dialog(DialogKind::Error { message }) => {
                assert!(message.starts_with("create file failed for demo/public/x"));
            }
            other => panic!("unexpected mode: {:?}", other),
        }
    }

    #[tokio::test]
    async fn click_selects_row_under_cursor() {
        let (_dir, mut app, mut rx) = started().await;
        app.tree_area = Rect::new(1, 2, 30, 10);
        app.click_tree(5, 4);
        pump(&mut app, &mut rx).await;
        assert_eq!(app.rows[2].path, "demo/src");
        assert!(app.rows[2].is_expanded);

        app.click_tree(50, 4);
        app.click_tree(5, 40);
        assert_eq!(app.selected_index, 2);
    }

    #[test]
    fn dialog_cursor_editing() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut app = App::new(
            "demo",
            Arc::new(crate::store::MockRemoteFileStore::new()),
            tx,
            AppOptions::default(),
        );
        app.open_dialog(DialogKind::CreateFile {
            parent: "demo".into(),
        });
        for c in "añb".chars() {
            app.dialog_input_char(c);
        }
        app.dialog_move_cursor_left();
        app.dialog_delete_char();
        assert_eq!(app.dialog_state.input, "ab");
        assert_eq!(app.dialog_state.cursor_position, 1);
        app.dialog_cursor_end();
        app.dialog_move_cursor_right();
        assert_eq!(app.dialog_state.cursor_position, 2);
        app.dialog_cursor_home();
        app.dialog_delete_char();
        assert_eq!(app.dialog_state.input, "ab");
        app.close_dialog();
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[test]
    fn status_message_expires() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut app = App::new(
            "demo",
            Arc::new(crate::store::MockRemoteFileStore::new()),
            tx,
            AppOptions::default(),
        );
        app.set_status_message("fresh".into());
        app.clear_expired_status();
        assert!(app.status_message.is_some());
        app.status_message = Some(("old".into(), Instant::now() - Duration::from_secs(5), false));
        app.handle_event(Event::Tick);
        assert!(app.status_message.is_none());
    }

    #[test]
    fn theme_and_sidebar_toggle() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut app = App::new(
            "demo",
            Arc::new(crate::store::MockRemoteFileStore::new()),
            tx,
            AppOptions::default(),
        );
        app.toggle_theme();
        assert_eq!(app.theme.mode, theme::ThemeMode::Light);
        app.toggle_sidebar();
        assert!(!app.sidebar_visible);
    }
}
