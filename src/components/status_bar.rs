use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::state::{Layout, Mode};
use crate::theme::ThemeColors;

const BROWSE_HINTS: &str = " j/k:move  l:open  h:up  s:hidden  f:search  t:tree  q:quit ";
const SEARCH_HINTS: &str = " type:filter  enter:keep  esc:cancel ";

/// Bottom line: current directory, view flags, mode and key hints.
/// A pending status message replaces the whole line.
pub struct StatusBarWidget<'a> {
    dir: &'a str,
    hidden_status: &'a str,
    search_status: &'a str,
    mode: Mode,
    layout: Layout,
    theme: &'a ThemeColors,
    status_message: Option<&'a str>,
}

impl<'a> StatusBarWidget<'a> {
    pub fn new(
        dir: &'a str,
        hidden_status: &'a str,
        search_status: &'a str,
        theme: &'a ThemeColors,
    ) -> Self {
        Self {
            dir,
            hidden_status,
            search_status,
            mode: Mode::Browse,
            layout: Layout::List,
            theme,
            status_message: None,
        }
    }

    pub fn mode(mut self, mode: Mode, layout: Layout) -> Self {
        self.mode = mode;
        self.layout = layout;
        self
    }

    pub fn status_message(mut self, msg: Option<&'a str>) -> Self {
        self.status_message = msg;
        self
    }
}

/// Keep the last `max` characters, marking the cut with `...`.
fn truncate_left(s: &str, max: usize) -> String {
    let len = s.chars().count();
    if len <= max {
        return s.to_string();
    }
    if max <= 3 {
        return s.chars().skip(len - max).collect();
    }
    let tail: String = s.chars().skip(len - (max - 3)).collect();
    format!("...{tail}")
}

impl Widget for StatusBarWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        let width = area.width as usize;
        let bar = Style::default()
            .bg(self.theme.status_bg)
            .fg(self.theme.status_fg);
        buf.set_style(area, bar);

        if let Some(msg) = self.status_message {
            let style = Style::default()
                .bg(self.theme.error_fg)
                .fg(self.theme.status_bg)
                .add_modifier(Modifier::BOLD);
            let display = format!("{:<width$}", msg, width = width);
            buf.set_line(area.x, area.y, &Line::from(Span::styled(display, style)), area.width);
            return;
        }

        let (mode_label, hints) = match self.mode {
            Mode::Browse => (" BROWSE ", BROWSE_HINTS),
            Mode::SearchEntry => (" SEARCH ", SEARCH_HINTS),
        };
        let flags = format!(
            " {} | {} | {} ",
            self.hidden_status,
            self.search_status,
            self.layout.label()
        );

        let fixed = mode_label.chars().count() + flags.chars().count();
        let hints_shown = if fixed + hints.chars().count() < width {
            hints
        } else {
            ""
        };
        let dir_budget = width
            .saturating_sub(fixed)
            .saturating_sub(hints_shown.chars().count())
            .saturating_sub(1);
        let dir = truncate_left(self.dir, dir_budget);

        let used = fixed + 1 + dir.chars().count() + hints_shown.chars().count();
        let pad = width.saturating_sub(used);

        let spans = vec![
            Span::styled(
                mode_label,
                Style::default()
                    .bg(self.theme.accent_fg)
                    .fg(self.theme.status_bg)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
            Span::styled(dir, bar.add_modifier(Modifier::BOLD)),
            Span::styled(flags, bar.fg(self.theme.dim_fg)),
            Span::raw(" ".repeat(pad)),
            Span::styled(hints_shown, bar.fg(self.theme.dim_fg)),
        ];
        buf.set_line(area.x, area.y, &Line::from(spans), area.width);
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
    fn normal_bar_shows_flags_and_hints() {
        let tc = theme::dark_theme();
        let widget = StatusBarWidget::new(
            "/home/user/project",
            "Hidden files: hidden",
            "Search: none",
            &tc,
        );
        let area = Rect::new(0, 0, 140, 1);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);

        let line = content(&buf, 140);
        assert!(line.contains("BROWSE"));
        assert!(line.contains("/home/user/project"));
        assert!(line.contains("Hidden files: hidden"));
        assert!(line.contains("Search: none"));
        assert!(line.contains("q:quit"));
    }

    #[test]
    fn search_mode_switches_hints() {
        let tc = theme::dark_theme();
        let widget = StatusBarWidget::new("/tmp", "Hidden files: shown", "Search: ab", &tc)
            .mode(Mode::SearchEntry, Layout::Tree);
        let area = Rect::new(0, 0, 120, 1);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);

        let line = content(&buf, 120);
        assert!(line.contains("SEARCH"));
        assert!(line.contains("Search: ab"));
        assert!(line.contains("tree"));
        assert!(line.contains("esc:cancel"));
        assert!(!line.contains("q:quit"));
    }

    #[test]
    fn status_message_replaces_bar() {
        let tc = theme::dark_theme();
        let widget = StatusBarWidget::new("/tmp", "Hidden files: hidden", "Search: none", &tc)
            .status_message(Some("Error: /tmp/gone not found"));
        let area = Rect::new(0, 0, 60, 1);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);

        let line = content(&buf, 60);
        assert!(line.contains("Error: /tmp/gone not found"));
        assert!(!line.contains("BROWSE"));
        assert_eq!(buf.cell((0, 0)).unwrap().bg, tc.error_fg);
    }

    #[test]
    fn narrow_bar_truncates_directory() {
        let tc = theme::dark_theme();
        let widget = StatusBarWidget::new(
            "/a/very/long/path/that/cannot/fit/in/the/bar",
            "Hidden files: hidden",
            "Search: none",
            &tc,
        );
        let area = Rect::new(0, 0, 60, 1);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);

        let line = content(&buf, 60);
        assert!(line.contains("..."));
        assert!(line.contains("bar"));
    }

    #[test]
    fn truncate_left_counts_chars() {
        assert_eq!(truncate_left("abc", 5), "abc");
        assert_eq!(truncate_left("abcdefgh", 6), "...fgh");
        assert_eq!(truncate_left("ééééé", 4), "...é");
        assert_eq!(truncate_left("abcdef", 2), "ef");
    }

    #[test]
    fn zero_area_does_not_panic() {
        let tc = theme::dark_theme();
        let widget = StatusBarWidget::new("/", "", "", &tc);
        let area = Rect::new(0, 0, 0, 0);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);
    }
}
