use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind};

use crate::app::{App, AppMode, DialogKind};

/// Handle a key event.
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    if key.kind == KeyEventKind::Release {
        return;
    }
    match &app.mode {
        AppMode::Dialog(kind) => {
            let kind = kind.clone();
            handle_dialog_key(app, &kind, key);
        }
        AppMode::Normal => handle_normal_key(app, key),
    }
}

fn handle_normal_key(app: &mut App, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('c') if ctrl => app.quit(),
        KeyCode::Char('b') if ctrl => app.toggle_sidebar(),
        KeyCode::Char('t') => app.toggle_theme(),

        KeyCode::Char('j') | KeyCode::Down => app.select_next(),
        KeyCode::Char('k') | KeyCode::Up => app.select_previous(),
        KeyCode::Char('g') | KeyCode::Home => app.select_first(),
        KeyCode::Char('G') | KeyCode::End => app.select_last(),
        KeyCode::Enter | KeyCode::Char(' ') => app.activate_selected(),
        KeyCode::Char('l') | KeyCode::Right => app.expand_selected(),
        KeyCode::Char('h') | KeyCode::Left => app.collapse_selected(),

        KeyCode::Char('a') => app.open_create_file(),
        KeyCode::Char('A') => app.open_create_directory(),
        KeyCode::Char('d') | KeyCode::Delete => app.request_delete(),
        KeyCode::Char('r') => app.refresh_selected(),
        KeyCode::Char('R') => app.refresh_root(),

        KeyCode::PageDown => app.page_down(),
        KeyCode::PageUp => app.page_up(),
        _ => {}
    }
}

fn handle_dialog_key(app: &mut App, kind: &DialogKind, key: KeyEvent) {
    match kind {
        DialogKind::Error { .. } => {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                app.close_dialog();
            }
        }
        DialogKind::DeleteConfirm { .. } => match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => app.submit_dialog(),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.close_dialog(),
            _ => {}
        },
        DialogKind::CreateFile { .. } | DialogKind::CreateDirectory { .. } => match key.code {
            KeyCode::Esc => app.close_dialog(),
            KeyCode::Enter => app.submit_dialog(),
            KeyCode::Backspace => app.dialog_delete_char(),
            KeyCode::Left => app.dialog_move_cursor_left(),
            KeyCode::Right => app.dialog_move_cursor_right(),
            KeyCode::Home => app.dialog_cursor_home(),
            KeyCode::End => app.dialog_cursor_end(),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                app.dialog_input_char(c)
            }
            _ => {}
        },
    }
}

/// Handle a mouse event. Clicks only act in normal mode.
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent) {
    if app.mode != AppMode::Normal {
        return;
    }
    match mouse.kind {
        MouseEventKind::Down(crossterm::event::MouseButton::Left) => {
            app.click_tree(mouse.column, mouse.row)
        }
        MouseEventKind::ScrollDown => app.select_next(),
        MouseEventKind::ScrollUp => app.select_previous(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crossterm::event::{KeyEventState, MouseButton};
    use ratatui::layout::Rect;
    use tokio::sync::mpsc;

    use crate::app::AppOptions;
    use crate::store::MockRemoteFileStore;
    use crate::theme::ThemeMode;

    fn app() -> App {
        let (tx, _rx) = mpsc::unbounded_channel();
        App::new(
            "demo",
            Arc::new(MockRemoteFileStore::new()),
            tx,
            AppOptions::default(),
        )
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn quit_keys() {
        let mut a = app();
        handle_key_event(&mut a, key(KeyCode::Char('q')));
        assert!(a.should_quit);

        let mut a = app();
        handle_key_event(&mut a, ctrl('c'));
        assert!(a.should_quit);
    }

    #[test]
    fn release_events_are_ignored() {
        let mut a = app();
        let mut release = key(KeyCode::Char('q'));
        release.kind = KeyEventKind::Release;
        release.state = KeyEventState::NONE;
        handle_key_event(&mut a, release);
        assert!(!a.should_quit);
    }

    #[test]
    fn sidebar_and_theme_toggles() {
        let mut a = app();
        handle_key_event(&mut a, ctrl('b'));
        assert!(!a.sidebar_visible);
        handle_key_event(&mut a, key(KeyCode::Char('t')));
        assert_eq!(a.theme.mode, ThemeMode::Light);
    }

    #[test]
    fn create_dialog_typing_and_escape() {
        let mut a = app();
        handle_key_event(&mut a, key(KeyCode::Char('a')));
        assert!(matches!(a.mode, AppMode::Dialog(DialogKind::CreateFile { .. })));

        // 'q' is text inside a dialog, not quit
        for c in "qx".chars() {
            handle_key_event(&mut a, key(KeyCode::Char(c)));
        }
        handle_key_event(&mut a, key(KeyCode::Backspace));
        assert_eq!(a.dialog_state.input, "q");
        assert!(!a.should_quit);

        handle_key_event(&mut a, key(KeyCode::Esc));
        assert_eq!(a.mode, AppMode::Normal);
    }

    #[test]
    fn folder_dialog_uses_capital_a() {
        let mut a = app();
        handle_key_event(&mut a, key(KeyCode::Char('A')));
        assert_eq!(
            a.mode,
            AppMode::Dialog(DialogKind::CreateDirectory {
                parent: "demo".into()
            })
        );
    }

    #[test]
    fn delete_confirm_answers() {
        let mut a = app();
        a.open_dialog(DialogKind::DeleteConfirm {
            path: "demo/a.txt".into(),
            kind: crate::store::EntryKind::File,
        });
        handle_key_event(&mut a, key(KeyCode::Char('x')));
        assert!(matches!(a.mode, AppMode::Dialog(_)));
        handle_key_event(&mut a, key(KeyCode::Char('n')));
        assert_eq!(a.mode, AppMode::Normal);
    }

    #[test]
    fn error_dialog_dismissed_with_enter() {
        let mut a = app();
        a.open_dialog(DialogKind::Error {
            message: "boom".into(),
        });
        handle_key_event(&mut a, key(KeyCode::Char('q')));
        assert!(!a.should_quit);
        handle_key_event(&mut a, key(KeyCode::Enter));
        assert_eq!(a.mode, AppMode::Normal);
    }

    #[test]
    fn mouse_ignored_while_dialog_open() {
        let mut a = app();
        a.tree_area = Rect::new(0, 0, 20, 10);
        a.open_dialog(DialogKind::Error {
            message: "boom".into(),
        });
        handle_mouse_event(
            &mut a,
            MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column: 1,
                row: 0,
                modifiers: KeyModifiers::NONE,
            },
        );
        assert!(matches!(a.mode, AppMode::Dialog(_)));
    }
}
