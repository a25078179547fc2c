use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::Style,
    widgets::{Block, Borders},
    Frame,
};

use crate::app::{App, AppMode};
use crate::components::dialog::DialogWidget;
use crate::components::editor::EditorWidget;
use crate::components::header::HeaderWidget;
use crate::components::status_bar::StatusBarWidget;
use crate::components::tree::TreeWidget;

/// Render the application UI.
pub fn render(app: &mut App, frame: &mut Frame) {
    let [header_area, body_area, status_area] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .areas(frame.area());

    let active = app.explorer.active_file().map(str::to_string);
    let language = app.editor.path().map(|_| app.editor.language());
    frame.render_widget(
        HeaderWidget::new(app.explorer.root_path(), &app.theme).active(active.as_deref(), language),
        header_area,
    );

    let editor_area = if app.sidebar_visible {
        let [tree_area, editor_area] = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(app.sidebar_width),
                Constraint::Min(10),
            ])
            .areas(body_area);

        let block = Block::default()
            .title(" Explorer ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border_focused_fg))
            .style(Style::default().bg(app.theme.tree_bg));
        let inner = block.inner(tree_area);
        app.tree_area = inner;
        app.update_scroll(inner.height as usize);

        let tree = TreeWidget::new(&app.rows, &app.theme, app.use_icons)
            .cursor(app.selected_index, app.scroll_offset)
            .active(active.as_deref())
            .block(block);
        frame.render_widget(tree, tree_area);
        editor_area
    } else {
        body_area
    };

    let title = match app.editor.path() {
        Some(path) => format!(" {} ", path),
        None => " Welcome ".to_string(),
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border_fg))
        .style(Style::default().bg(app.theme.editor_bg));
    app.editor_viewport = block.inner(editor_area).height as usize;
    frame.render_widget(EditorWidget::new(&app.editor, &app.theme).block(block), editor_area);

    let path = active.as_deref().unwrap_or(app.explorer.root_path());
    let mut status = StatusBarWidget::new(path, &app.theme)
        .pending(app.explorer.pending())
        .watcher_active(app.watcher_active);
    if let Some((msg, _, is_error)) = &app.status_message {
        status = status.status_message(msg, *is_error);
    }
    frame.render_widget(status, status_area);

    if matches!(app.mode, AppMode::Dialog(_)) {
        frame.render_widget(
            DialogWidget::new(&app.mode, &app.dialog_state, &app.theme),
            frame.area(),
        );
    }
}
