use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::theme::ThemeColors;

const KEY_HINTS: &str = " a:file  A:folder  d:del  r:refresh  ^b:sidebar  q:quit ";

/// Status bar: active path, request activity, key hints, or a transient message.
pub struct StatusBarWidget<'a> {
    path_str: &'a str,
    theme: &'a ThemeColors,
    status_message: Option<&'a str>,
    is_error: bool,
    pending: usize,
    watcher_active: bool,
}

impl<'a> StatusBarWidget<'a> {
    pub fn new(path_str: &'a str, theme: &'a ThemeColors) -> Self {
        Self {
            path_str,
            theme,
            status_message: None,
            is_error: false,
            pending: 0,
            watcher_active: false,
        }
    }

    pub fn status_message(mut self, msg: &'a str, is_error: bool) -> Self {
        self.status_message = Some(msg);
        self.is_error = is_error;
        self
    }

    /// Number of store calls in flight.
    pub fn pending(mut self, pending: usize) -> Self {
        self.pending = pending;
        self
    }

    pub fn watcher_active(mut self, active: bool) -> Self {
        self.watcher_active = active;
        self
    }
}

/// Keep the tail of `s` within `budget` characters, marking the cut.
fn truncate_left(s: &str, budget: usize) -> String {
    let len = s.chars().count();
    if len <= budget {
        return s.to_string();
    }
    if budget <= 3 {
        return s.chars().skip(len - budget).collect();
    }
    let tail: String = s.chars().skip(len - (budget - 3)).collect();
    format!("...{}", tail)
}

impl<'a> Widget for StatusBarWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        let width = area.width as usize;
        let base = Style::default()
            .bg(self.theme.status_bg)
            .fg(self.theme.status_fg);

        if let Some(msg) = self.status_message {
            let style = if self.is_error {
                Style::default()
                    .bg(self.theme.error_fg)
                    .fg(self.theme.status_bg)
            } else {
                base.fg(self.theme.success_fg)
            };
            let display: String = msg.chars().take(width).collect();
            let line = Line::from(Span::styled(format!("{:<width$}", display), style));
            buf.set_line(area.x, area.y, &line, area.width);
            return;
        }

        let mut right = Vec::new();
        if self.pending > 0 {
            right.push(Span::styled(
                format!(" ⟳ {} ", self.pending),
                base.fg(self.theme.info_fg).add_modifier(Modifier::BOLD),
            ));
        }
        if self.watcher_active {
            right.push(Span::styled(" watching ", base.fg(self.theme.dim_fg)));
        }
        right.push(Span::styled(
            KEY_HINTS,
            base.fg(self.theme.dim_fg).add_modifier(Modifier::DIM),
        ));
        let right_len: usize = right.iter().map(|s| s.content.chars().count()).sum();

        let path_display = truncate_left(self.path_str, width.saturating_sub(right_len + 1));
        let gap = width
            .saturating_sub(right_len)
            .saturating_sub(path_display.chars().count());

        let mut spans = vec![
            Span::styled(format!(" {}", path_display), base),
            Span::styled(" ".repeat(gap.saturating_sub(1)), base),
        ];
        spans.extend(right);
        buf.set_line(area.x, area.y, &Line::from(spans), area.width);
    }
}
