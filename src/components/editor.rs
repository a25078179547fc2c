use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Widget},
};

use crate::editor::{EditorPane, PaneContent};
use crate::theme::ThemeColors;

const WELCOME: &[&str] = &[
    "Cloud IDE",
    "",
    "Select a file in the explorer to open it.",
    "",
    "a  new file      A  new folder",
    "d  delete        r  refresh",
    "^b toggle sidebar  t  toggle theme",
];

/// Read-only view of the active file with a line-number gutter.
pub struct EditorWidget<'a> {
    pane: &'a EditorPane,
    theme: &'a ThemeColors,
    block: Option<Block<'a>>,
}

impl<'a> EditorWidget<'a> {
    pub fn new(pane: &'a EditorPane, theme: &'a ThemeColors) -> Self {
        Self {
            pane,
            theme,
            block: None,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = block.into();
        self
    }

    fn centered(&self, lines: &[&str], style: Style, inner: Rect, buf: &mut Buffer) {
        let top = inner.y + inner.height.saturating_sub(lines.len() as u16) / 2;
        for (i, text) in lines.iter().enumerate() {
            let y = top + i as u16;
            if y >= inner.y + inner.height {
                break;
            }
            let pad = inner.width.saturating_sub(text.chars().count() as u16) / 2;
            let line = Line::from(Span::styled(*text, style));
            buf.set_line(inner.x + pad, y, &line, inner.width.saturating_sub(pad));
        }
    }
}

impl<'a> Widget for EditorWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = match &self.block {
            Some(block) => {
                let inner = block.inner(area);
                block.clone().render(area, buf);
                inner
            }
            None => area,
        };
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let dim = Style::default().fg(self.theme.dim_fg);
        let lines = match self.pane.content() {
            PaneContent::Welcome => {
                return self.centered(WELCOME, dim, inner, buf);
            }
            PaneContent::Loading => {
                return self.centered(&["Loading…"], dim.add_modifier(Modifier::ITALIC), inner, buf);
            }
            PaneContent::Binary => {
                return self.centered(&["Binary file not shown"], dim, inner, buf);
            }
            PaneContent::Failed(message) => {
                let text = format!("Could not open file: {}", message);
                return self.centered(&[text.as_str()], Style::default().fg(self.theme.error_fg), inner, buf);
            }
            PaneContent::Text(lines) => lines,
        };

        let gutter = lines.len().max(1).to_string().len();
        let number_style = Style::default().fg(self.theme.editor_line_nr_fg);
        let text_style = Style::default().fg(self.theme.editor_fg);
        let start = self.pane.scroll_offset.min(lines.len());
        for (i, text) in lines[start..].iter().take(inner.height as usize).enumerate() {
            // tabs would misalign cells
            let text = text.replace('\t', "    ");
            let line = Line::from(vec![
                Span::styled(format!("{:>gutter$} │ ", start + i + 1), number_style),
                Span::styled(text, text_style),
            ]);
            buf.set_line(inner.x, inner.y + i as u16, &line, inner.width);
        }
    }
}
