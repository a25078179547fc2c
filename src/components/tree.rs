use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Widget},
};

use crate::explorer::tree::{FlatItem, RowKind};
use crate::store::EntryKind;
use crate::theme::ThemeColors;

/// Explorer tree with box-drawing connectors, loading/error rows and the
/// active-file highlight.
pub struct TreeWidget<'a> {
    items: &'a [FlatItem],
    selected: usize,
    scroll: usize,
    active: Option<&'a str>,
    theme: &'a ThemeColors,
    use_icons: bool,
    block: Option<Block<'a>>,
}

impl<'a> TreeWidget<'a> {
    pub fn new(items: &'a [FlatItem], theme: &'a ThemeColors, use_icons: bool) -> Self {
        Self {
            items,
            selected: 0,
            scroll: 0,
            active: None,
            theme,
            use_icons,
            block: None,
        }
    }

    pub fn cursor(mut self, selected: usize, scroll: usize) -> Self {
        self.selected = selected;
        self.scroll = scroll;
        self
    }

    pub fn active(mut self, path: Option<&'a str>) -> Self {
        self.active = path;
        self
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = block.into();
        self
    }

    /// Indentation for `items[index]`: a continuation bar for every ancestor
    /// level that still has siblings below, then this row's connector.
    fn build_prefix(items: &[FlatItem], index: usize) -> String {
        let item = &items[index];
        if item.depth == 0 {
            return String::new();
        }

        let mut prefix = String::new();
        for level in 1..item.depth {
            let ancestor_is_last = items[..index]
                .iter()
                .rev()
                .take_while(|row| row.depth >= level)
                .find(|row| row.depth == level)
                .is_some_and(|row| row.is_last_sibling);
            prefix.push_str(if ancestor_is_last { "   " } else { "│  " });
        }
        prefix.push_str(if item.is_last_sibling { "└──" } else { "├──" });
        prefix
    }

    fn indicator(&self, item: &FlatItem) -> &'static str {
        match (&item.row, item.kind, self.use_icons) {
            (RowKind::Loading, _, _) => "… ",
            (RowKind::Failed(_), _, _) => "⚠ ",
            (RowKind::Entry, EntryKind::Directory, true) if item.is_expanded => " ",
            (RowKind::Entry, EntryKind::Directory, true) => " ",
            (RowKind::Entry, EntryKind::File, true) => file_icon(&item.name),
            (RowKind::Entry, EntryKind::Directory, false) if item.is_expanded => "[-] ",
            (RowKind::Entry, EntryKind::Directory, false) => "[+] ",
            (RowKind::Entry, EntryKind::File, false) => "    ",
        }
    }

    fn row_style(&self, item: &FlatItem, is_cursor: bool) -> Style {
        if is_cursor {
            return Style::default()
                .bg(self.theme.tree_selected_bg)
                .fg(self.theme.tree_selected_fg)
                .add_modifier(Modifier::BOLD);
        }
        match (&item.row, item.kind) {
            (RowKind::Loading, _) => Style::default()
                .fg(self.theme.dim_fg)
                .add_modifier(Modifier::ITALIC),
            (RowKind::Failed(_), _) => Style::default().fg(self.theme.error_fg),
            (RowKind::Entry, _) if self.active == Some(item.path.as_str()) => Style::default()
                .fg(self.theme.tree_active_fg)
                .add_modifier(Modifier::BOLD),
            (RowKind::Entry, EntryKind::Directory) if item.is_errored => {
                Style::default().fg(self.theme.warning_fg)
            }
            (RowKind::Entry, EntryKind::Directory) => Style::default()
                .fg(self.theme.tree_dir_fg)
                .add_modifier(Modifier::BOLD),
            (RowKind::Entry, EntryKind::File) => Style::default().fg(self.theme.tree_file_fg),
        }
    }
}

/// Nerd Font icon for a file, by extension.
fn file_icon(name: &str) -> &'static str {
    let ext = name.rsplit('.').next().unwrap_or("").to_ascii_lowercase();
    match ext.as_str() {
        "rs" => " ",
        "py" => " ",
        "js" | "jsx" => " ",
        "ts" | "tsx" => " ",
        "html" | "htm" => " ",
        "css" | "scss" | "sass" | "less" => " ",
        "json" => " ",
        "toml" | "yaml" | "yml" | "ini" => " ",
        "md" | "markdown" | "txt" => " ",
        "sh" | "bash" => " ",
        "go" => " ",
        "java" => " ",
        "c" | "h" => " ",
        "cpp" | "hpp" => " ",
        "rb" => " ",
        "php" => " ",
        "vue" => " ",
        "png" | "jpg" | "jpeg" | "gif" | "svg" | "ico" | "webp" => " ",
        _ => " ",
    }
}

impl<'a> Widget for TreeWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = match &self.block {
            Some(block) => {
                let inner = block.inner(area);
                block.clone().render(area, buf);
                inner
            }
            None => area,
        };
        if self.items.is_empty() || inner.height == 0 {
            return;
        }

        let visible = self
            .items
            .iter()
            .enumerate()
            .skip(self.scroll)
            .take(inner.height as usize);

        for (offset, (idx, item)) in visible.enumerate() {
            let y = inner.y + offset as u16;
            let mut label = format!(
                "{}{}{}",
                Self::build_prefix(self.items, idx),
                self.indicator(item),
                item.name
            );
            if matches!(item.row, RowKind::Failed(_)) {
                label.push_str(" (r to retry)");
            } else if item.row == RowKind::Entry && item.is_loading && item.is_expanded {
                label.push_str(" …");
            }
            let line = Line::from(Span::styled(label, self.row_style(item, idx == self.selected)));
            buf.set_line(inner.x, y, &line, inner.width);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme;

    fn row(name: &str, path: &str, kind: EntryKind, depth: usize, last: bool) -> FlatItem {
        FlatItem {
            name: name.into(),
            path: path.into(),
            kind,
            row: RowKind::Entry,
            depth,
            is_expanded: kind == EntryKind::Directory,
            is_loading: false,
            is_errored: false,
            is_last_sibling: last,
        }
    }

    fn sample() -> Vec<FlatItem> {
        vec![
            row("demo", "demo", EntryKind::Directory, 0, true),
            row("src", "demo/src", EntryKind::Directory, 1, false),
            row("main.rs", "demo/src/main.rs", EntryKind::File, 2, true),
            row("README.md", "demo/README.md", EntryKind::File, 1, true),
        ]
    }

    fn render_lines(widget: TreeWidget<'_>, width: u16, height: u16) -> (Vec<String>, Buffer) {
        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);
        let lines = (0..height)
            .map(|y| {
                (0..width)
                    .map(|x| buf.cell((x, y)).unwrap().symbol().to_string())
                    .collect::<String>()
            })
            .collect();
        (lines, buf)
    }

    #[test]
    fn prefixes_follow_sibling_structure() {
        let items = sample();
        assert_eq!(TreeWidget::build_prefix(&items, 0), "");
        assert_eq!(TreeWidget::build_prefix(&items, 1), "├──");
        assert_eq!(TreeWidget::build_prefix(&items, 2), "│  └──");
        assert_eq!(TreeWidget::build_prefix(&items, 3), "└──");
    }

    #[test]
    fn renders_ascii_indicators() {
        let items = sample();
        let tc = theme::dark_theme();
        let (lines, _) = render_lines(TreeWidget::new(&items, &tc, false), 40, 4);
        assert!(lines[0].starts_with("[-] demo"));
        assert!(lines[1].contains("[-] src"));
        assert!(lines[2].contains("main.rs"));
    }

    #[test]
    fn failed_row_shows_retry_hint() {
        let mut items = sample();
        items[2] = FlatItem {
            name: "failed to load: unauthorized".into(),
            path: "demo/src".into(),
            row: RowKind::Failed("unauthorized".into()),
            ..items[2].clone()
        };
        let tc = theme::dark_theme();
        let (lines, buf) = render_lines(TreeWidget::new(&items, &tc, false), 60, 4);
        assert!(lines[2].contains("⚠ failed to load: unauthorized (r to retry)"));
        let x = lines[2].chars().position(|c| c == '⚠').unwrap() as u16;
        assert_eq!(buf.cell((x, 2)).unwrap().fg, tc.error_fg);
    }

    #[test]
    fn active_file_and_cursor_styles() {
        let items = sample();
        let tc = theme::dark_theme();
        let widget = TreeWidget::new(&items, &tc, false)
            .cursor(1, 0)
            .active(Some("demo/README.md"));
        let (_, buf) = render_lines(widget, 40, 4);
        assert_eq!(buf.cell((0, 1)).unwrap().bg, tc.tree_selected_bg);
        assert_eq!(buf.cell((0, 3)).unwrap().fg, tc.tree_active_fg);
    }

    #[test]
    fn scroll_skips_rows() {
        let items = sample();
        let tc = theme::dark_theme();
        let (lines, _) = render_lines(TreeWidget::new(&items, &tc, false).cursor(3, 2), 40, 2);
        assert!(lines[0].contains("main.rs"));
        assert!(lines[1].contains("README.md"));
    }
}
