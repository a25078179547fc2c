use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Padding, Widget},
};

use crate::app::{AppMode, DialogKind, DialogState};
use crate::explorer::entry::file_name;
use crate::store::EntryKind;
use crate::theme::ThemeColors;

/// Dialog widget that renders a centered modal overlay.
pub struct DialogWidget<'a> {
    mode: &'a AppMode,
    dialog_state: &'a DialogState,
    theme: &'a ThemeColors,
}

impl<'a> DialogWidget<'a> {
    pub fn new(mode: &'a AppMode, dialog_state: &'a DialogState, theme: &'a ThemeColors) -> Self {
        Self {
            mode,
            dialog_state,
            theme,
        }
    }

    /// Calculate a centered rectangle within the given area.
    fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
        let x = area.x + area.width.saturating_sub(width) / 2;
        let y = area.y + area.height.saturating_sub(height) / 2;
        Rect::new(x, y, width.min(area.width), height.min(area.height))
    }

    /// Clear `rect`, draw the frame and return the inner area.
    fn frame(&self, title: &str, border: ratatui::style::Color, rect: Rect, buf: &mut Buffer) -> Rect {
        Clear.render(rect, buf);
        let block = Block::default()
            .title(format!(" {} ", title))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .style(Style::default().bg(self.theme.dialog_bg))
            .padding(Padding::horizontal(1));
        let inner = block.inner(rect);
        block.render(rect, buf);
        inner
    }

    fn hint(&self, text: &str, inner: Rect, buf: &mut Buffer) {
        if inner.height > 1 {
            let style = Style::default()
                .fg(self.theme.dim_fg)
                .add_modifier(Modifier::DIM);
            let line = Line::from(Span::styled(text, style));
            buf.set_line(inner.x, inner.y + inner.height - 1, &line, inner.width);
        }
    }

    fn render_input(&self, title: &str, parent: &str, area: Rect, buf: &mut Buffer) {
        let rect = Self::centered_rect(50.min(area.width.saturating_sub(4)), 6, area);
        let inner = self.frame(title, self.theme.dialog_border_fg, rect, buf);
        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let location = Line::from(Span::styled(
            format!("in {}/", parent),
            Style::default().fg(self.theme.dim_fg),
        ));
        buf.set_line(inner.x, inner.y, &location, inner.width);

        let input = &self.dialog_state.input;
        let cursor = self.dialog_state.cursor_position.min(input.len());
        let (before, rest) = input.split_at(cursor);
        let mut rest_chars = rest.chars();
        let cursor_char = rest_chars
            .next()
            .map_or_else(|| " ".to_string(), |c| c.to_string());
        let after = rest_chars.as_str();

        // Keep the cursor visible by dropping characters from the left.
        let max_width = inner.width as usize;
        let overflow = (before.chars().count() + 1).saturating_sub(max_width);
        let before_display: String = before.chars().skip(overflow).collect();

        let input_style = Style::default().fg(self.theme.tree_fg);
        let cursor_style = Style::default()
            .bg(self.theme.tree_fg)
            .fg(self.theme.dialog_bg)
            .add_modifier(Modifier::BOLD);
        let line = Line::from(vec![
            Span::styled(before_display, input_style),
            Span::styled(cursor_char, cursor_style),
            Span::styled(after, input_style),
        ]);
        buf.set_line(inner.x, inner.y + 2.min(inner.height - 1), &line, inner.width);

        self.hint("[Enter] Confirm  [Esc] Cancel", inner, buf);
    }

    fn render_delete(&self, path: &str, kind: EntryKind, area: Rect, buf: &mut Buffer) {
        let name = file_name(path);
        let what = match kind {
            EntryKind::Directory => "Delete this folder and everything in it?",
            EntryKind::File => "Delete this file?",
        };
        // borders and horizontal padding take four columns
        let content = what.chars().count().max(name.chars().count() + 4) as u16;
        let width = (content + 4).max(40).min(area.width.saturating_sub(4));
        let rect = Self::centered_rect(width, 7, area);
        let inner = self.frame("Delete Confirmation", self.theme.error_fg, rect, buf);
        if inner.height == 0 || inner.width == 0 {
            return;
        }
        let header = Line::from(Span::styled(
            what,
            Style::default()
                .fg(self.theme.warning_fg)
                .add_modifier(Modifier::BOLD),
        ));
        buf.set_line(inner.x, inner.y, &header, inner.width);

        if inner.height > 2 {
            let target = Line::from(Span::styled(
                format!("  • {}", name),
                Style::default().fg(self.theme.tree_fg),
            ));
            buf.set_line(inner.x, inner.y + 2, &target, inner.width);
        }

        self.hint("[y] Yes  [n/Esc] Cancel", inner, buf);
    }

    fn render_error(&self, message: &str, area: Rect, buf: &mut Buffer) {
        let max_width = area.width.saturating_sub(4).max(1);
        let width = (message.chars().count() as u16 + 6).clamp(30.min(max_width), max_width);
        let text_width = width.saturating_sub(4).max(1) as usize;
        let lines = wrap(message, text_width);
        let height = (lines.len() as u16 + 4).min(area.height);
        let rect = Self::centered_rect(width, height, area);
        let inner = self.frame("Error", self.theme.error_fg, rect, buf);
        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let style = Style::default().fg(self.theme.error_fg);
        for (i, text) in lines.iter().take(inner.height.saturating_sub(1) as usize).enumerate() {
            let line = Line::from(Span::styled(text.as_str(), style));
            buf.set_line(inner.x, inner.y + i as u16, &line, inner.width);
        }

        self.hint("[Enter/Esc] Dismiss", inner, buf);
    }
}

/// Greedy word wrap into lines of at most `width` characters.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

impl<'a> Widget for DialogWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let AppMode::Dialog(kind) = self.mode else {
            return;
        };
        match kind {
            DialogKind::CreateFile { parent } => {
                self.render_input("New File", parent, area, buf)
            }
            DialogKind::CreateDirectory { parent } => {
                self.render_input("New Folder", parent, area, buf)
            }
            DialogKind::DeleteConfirm { path, kind } => self.render_delete(path, *kind, area, buf),
            DialogKind::Error { message } => self.render_error(message, area, buf),
        }
    }
}
