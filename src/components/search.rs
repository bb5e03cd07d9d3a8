use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::theme::ThemeColors;

const LABEL: &str = "Search: ";

/// One-line prefix input shown under the listing while searching.
pub struct SearchWidget<'a> {
    prefix: &'a str,
    theme: &'a ThemeColors,
}

impl<'a> SearchWidget<'a> {
    pub fn new(prefix: &'a str, theme: &'a ThemeColors) -> Self {
        Self { prefix, theme }
    }
}

impl Widget for SearchWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        // Keep the end of a long prefix visible next to the cursor.
        let room = (area.width as usize).saturating_sub(LABEL.len() + 1);
        let len = self.prefix.chars().count();
        let shown: String = self.prefix.chars().skip(len.saturating_sub(room)).collect();

        let line = Line::from(vec![
            Span::styled(
                LABEL,
                Style::default()
                    .fg(self.theme.accent_fg)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(shown, Style::default().fg(self.theme.list_fg)),
            Span::styled(
                " ",
                Style::default()
                    .bg(self.theme.list_fg)
                    .fg(self.theme.status_bg),
            ),
        ]);
        buf.set_line(area.x, area.y, &line, area.width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme;

    fn content(buf: &Buffer, width: u16) -> String {
        (0..width)
            .map(|x| buf.cell((x, 0)).unwrap().symbol().to_string())
            .collect()
    }

    #[test]
    fn renders_label_prefix_and_cursor() {
        let tc = theme::dark_theme();
        let area = Rect::new(0, 0, 30, 1);
        let mut buf = Buffer::empty(area);
        SearchWidget::new("src", &tc).render(area, &mut buf);

        assert!(content(&buf, 30).starts_with("Search: src"));
        assert_eq!(buf.cell((11, 0)).unwrap().bg, tc.list_fg);
    }

    #[test]
    fn long_prefix_keeps_tail_visible() {
        let tc = theme::dark_theme();
        let area = Rect::new(0, 0, 14, 1);
        let mut buf = Buffer::empty(area);
        SearchWidget::new("abcdefghij", &tc).render(area, &mut buf);
        // 14 columns: 8 for the label, 1 for the cursor.
        assert_eq!(content(&buf, 14), "Search: fghij ");
    }

    #[test]
    fn zero_area_does_not_panic() {
        let tc = theme::dark_theme();
        let area = Rect::new(0, 0, 0, 0);
        let mut buf = Buffer::empty(area);
        SearchWidget::new("x", &tc).render(area, &mut buf);
    }
}
