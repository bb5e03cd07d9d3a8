use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Widget},
};

use crate::preview_content::{LineKind, PreviewText};
use crate::theme::ThemeColors;

/// Renders a generated [`PreviewText`], styling each line by its kind.
pub struct PreviewWidget<'a> {
    preview: &'a PreviewText,
    theme: &'a ThemeColors,
    block: Option<Block<'a>>,
}

impl<'a> PreviewWidget<'a> {
    pub fn new(preview: &'a PreviewText, theme: &'a ThemeColors) -> Self {
        Self {
            preview,
            theme,
            block: None,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    fn style_for(&self, kind: LineKind) -> Style {
        let base = Style::default();
        match kind {
            LineKind::Heading => base
                .fg(self.theme.heading_fg)
                .add_modifier(Modifier::BOLD),
            LineKind::DirEntry => base.fg(self.theme.dir_fg),
            LineKind::FileEntry | LineKind::Content => base.fg(self.theme.preview_fg),
            LineKind::Field => base.fg(self.theme.field_fg),
            LineKind::Separator => base.fg(self.theme.accent_fg),
            LineKind::Error => base.fg(self.theme.error_fg),
            LineKind::Placeholder => base
                .fg(self.theme.dim_fg)
                .add_modifier(Modifier::ITALIC),
        }
    }
}

impl Widget for PreviewWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = match self.block.as_ref() {
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

        for (i, line) in self
            .preview
            .lines
            .iter()
            .take(inner.height as usize)
            .enumerate()
        {
            let styled = Line::from(Span::styled(line.text.as_str(), self.style_for(line.kind)));
            buf.set_line(inner.x, inner.y + i as u16, &styled, inner.width);
        }
    }
}
