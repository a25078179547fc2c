use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::theme::ThemeColors;

/// Top bar: project name, active file and theme indicator.
pub struct HeaderWidget<'a> {
    project: &'a str,
    active: Option<&'a str>,
    language: Option<&'a str>,
    theme: &'a ThemeColors,
}

impl<'a> HeaderWidget<'a> {
    pub fn new(project: &'a str, theme: &'a ThemeColors) -> Self {
        Self {
            project,
            active: None,
            language: None,
            theme,
        }
    }

    pub fn active(mut self, path: Option<&'a str>, language: Option<&'a str>) -> Self {
        self.active = path;
        self.language = language;
        self
    }
}

impl<'a> Widget for HeaderWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        let base = Style::default()
            .bg(self.theme.header_bg)
            .fg(self.theme.header_fg);
        buf.set_style(area, base);

        let mut left = vec![
            Span::styled(
                " ☁ Cloud IDE ",
                base.fg(self.theme.accent_fg).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("│ {} ", self.project), base.add_modifier(Modifier::BOLD)),
        ];
        if let Some(path) = self.active {
            left.push(Span::styled(format!("│ {} ", path), base));
        }
        if let Some(language) = self.language {
            left.push(Span::styled(format!("[{}] ", language), base.fg(self.theme.dim_fg)));
        }

        let indicator = match self.theme.mode {
            crate::theme::ThemeMode::Dark => " ☾ dark ",
            crate::theme::ThemeMode::Light => " ☀ light ",
        };
        let indicator_len = indicator.chars().count() as u16;

        buf.set_line(
            area.x,
            area.y,
            &Line::from(left),
            area.width.saturating_sub(indicator_len),
        );
        if area.width > indicator_len {
            let line = Line::from(Span::styled(indicator, base.fg(self.theme.info_fg)));
            buf.set_line(area.x + area.width - indicator_len, area.y, &line, indicator_len);
        }
    }
}
