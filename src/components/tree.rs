use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Widget},
};

use crate::app::RowView;
use crate::fs::entry::EntryKind;
use crate::state::Layout;
use crate::theme::ThemeColors;

/// Directory listing widget. In tree layout, nested rows are drawn with
/// box-drawing guides.
pub struct TreeWidget<'a> {
    rows: &'a [RowView],
    /// Shown in place of the rows when the directory could not be listed.
    error: Option<String>,
    cursor: usize,
    scroll_offset: usize,
    layout: Layout,
    theme: &'a ThemeColors,
    block: Option<Block<'a>>,
}

impl<'a> TreeWidget<'a> {
    pub fn new(rows: &'a [RowView], layout: Layout, theme: &'a ThemeColors) -> Self {
        Self {
            rows,
            error: None,
            cursor: 0,
            scroll_offset: 0,
            layout,
            theme,
            block: None,
        }
    }

    pub fn cursor(mut self, cursor: usize, scroll_offset: usize) -> Self {
        self.cursor = cursor;
        self.scroll_offset = scroll_offset;
        self
    }

    pub fn error(mut self, error: Option<String>) -> Self {
        self.error = error;
        self
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    /// Guides for the ancestors below the top level, then this row's connector.
    fn build_prefix(row: &RowView) -> String {
        if row.depth == 0 {
            return String::new();
        }
        let mut prefix: String = row
            .ancestor_last
            .iter()
            .skip(1)
            .map(|&last| if last { "   " } else { "│  " })
            .collect();
        prefix.push_str(if row.is_last_sibling { "└──" } else { "├──" });
        prefix
    }

    fn row_label(row: &RowView, layout: Layout) -> String {
        match layout {
            Layout::List => row.label.clone(),
            Layout::Tree => {
                let marker = match (row.kind, row.expanded) {
                    (EntryKind::Directory, true) => "▾ ",
                    (EntryKind::Directory, false) => "▸ ",
                    _ => "  ",
                };
                format!("{marker}{}", row.label)
            }
        }
    }

    fn row_style(&self, row: &RowView, selected: bool) -> Style {
        if selected {
            return Style::default()
                .bg(self.theme.selected_bg)
                .fg(self.theme.selected_fg)
                .add_modifier(Modifier::BOLD);
        }
        if row.hidden {
            return Style::default().fg(self.theme.hidden_fg);
        }
        match row.kind {
            EntryKind::Directory => Style::default()
                .fg(self.theme.dir_fg)
                .add_modifier(Modifier::BOLD),
            EntryKind::Other => Style::default().fg(self.theme.other_fg),
            EntryKind::File => Style::default().fg(self.theme.list_fg),
        }
    }
}

impl Widget for TreeWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = match &self.block {
            Some(block) => {
                let inner = block.inner(area);
                block.clone().render(area, buf);
                inner
            }
            None => area,
        };

        let visible_height = inner.height as usize;
        if visible_height == 0 || inner.width == 0 {
            return;
        }

        if self.rows.is_empty() {
            let line = match &self.error {
                Some(err) => Line::from(Span::styled(
                    err.as_str(),
                    Style::default().fg(self.theme.error_fg),
                )),
                None => Line::from(Span::styled(
                    "(empty)",
                    Style::default()
                        .fg(self.theme.dim_fg)
                        .add_modifier(Modifier::ITALIC),
                )),
            };
            buf.set_line(inner.x, inner.y, &line, inner.width);
            return;
        }

        let visible = self
            .rows
            .iter()
            .enumerate()
            .skip(self.scroll_offset)
            .take(visible_height);

        for (i, (idx, row)) in visible.enumerate() {
            let y = inner.y + i as u16;
            let selected = idx == self.cursor;
            let style = self.row_style(row, selected);
            let guide_style = if selected {
                style
            } else {
                Style::default().fg(self.theme.guide_fg)
            };
            let prefix = match self.layout {
                Layout::Tree => Self::build_prefix(row),
                Layout::List => String::new(),
            };

            if selected {
                buf.set_style(Rect::new(inner.x, y, inner.width, 1), style);
            }
            let line = Line::from(vec![
                Span::styled(prefix, guide_style),
                Span::styled(Self::row_label(row, self.layout), style),
            ]);
            buf.set_line(inner.x, y, &line, inner.width);
        }
    }
}
