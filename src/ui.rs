use std::path::{Component, Path};

use ratatui::{
    layout::{Constraint, Direction, Layout as Split},
    style::Style,
    widgets::{Block, Borders},
    Frame,
};

use crate::app::App;
use crate::components::preview::PreviewWidget;
use crate::components::search::SearchWidget;
use crate::components::status_bar::StatusBarWidget;
use crate::components::tree::TreeWidget;
use crate::state::Mode;
use crate::theme::ThemeColors;

/// Render the application UI.
pub fn render(app: &mut App, theme: &ThemeColors, frame: &mut Frame) {
    let [main_area, status_area] = Split::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .areas(frame.area());

    let [list_column, preview_area] = Split::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .areas(main_area);

    let searching = app.nav.mode == Mode::SearchEntry;
    let [list_area, search_area] = Split::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(2),
            Constraint::Length(if searching { 1 } else { 0 }),
        ])
        .areas(list_column);

    // Keep the cursor visible inside the bordered list.
    app.update_scroll(list_area.height.saturating_sub(2) as usize);

    let snap = app.snapshot();

    let hidden_marker = if snap.show_hidden { " [+hidden]" } else { "" };
    let list_block = Block::default()
        .title(format!(
            " c3 - {}{} ",
            abbreviate_path(snap.current_dir),
            hidden_marker
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_focused_fg));
    let list = TreeWidget::new(&snap.rows, snap.layout, theme)
        .cursor(snap.cursor, snap.scroll_offset)
        .error(snap.listing_error.map(ToString::to_string))
        .block(list_block);
    frame.render_widget(list, list_area);

    if searching {
        frame.render_widget(SearchWidget::new(snap.search_prefix, theme), search_area);
    }

    let preview_block = Block::default()
        .title(" Preview ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_fg));
    frame.render_widget(
        PreviewWidget::new(snap.preview, theme).block(preview_block),
        preview_area,
    );

    let dir = snap.current_dir.display().to_string();
    let status = StatusBarWidget::new(&dir, &snap.hidden_status, &snap.search_status, theme)
        .mode(snap.mode, snap.layout)
        .status_message(snap.status_message);
    frame.render_widget(status, status_area);
}

/// Last two components of `path`, or `/` for the root.
fn abbreviate_path(path: &Path) -> String {
    let names: Vec<String> = path
        .components()
        .filter_map(|c| match c {
            Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    if names.is_empty() {
        return "/".to_string();
    }
    names[names.len().saturating_sub(2)..].join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::memory::MemFs;
    use crate::handler::Action;
    use crate::preview_content::PreviewSettings;
    use crate::theme;
    use ratatui::{backend::TestBackend, Terminal};
    use std::path::PathBuf;

    #[test]
    fn abbreviate_keeps_last_two_components() {
        assert_eq!(abbreviate_path(Path::new("/home/user/projects/c3")), "projects/c3");
        assert_eq!(abbreviate_path(Path::new("/tmp")), "tmp");
        assert_eq!(abbreviate_path(Path::new("/")), "/");
    }

    fn screen(terminal: &Terminal<TestBackend>) -> String {
        let buf = terminal.backend().buffer();
        let area = buf.area;
        (0..area.height)
            .map(|y| {
                (0..area.width)
                    .map(|x| buf.cell((x, y)).unwrap().symbol().to_string())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn app() -> App {
        let fs = MemFs::new()
            .dir("/home/me/A")
            .file("/home/me/a.txt", "alpha\n")
            .file("/home/me/b.txt", "beta\n");
        App::new(
            Box::new(fs),
            PathBuf::from("/home/me"),
            false,
            PreviewSettings::default(),
        )
    }

    #[test]
    fn full_frame_shows_listing_preview_and_status() {
        let mut app = app();
        app.apply(Action::MoveDown);
        let tc = theme::dark_theme();
        let mut terminal = Terminal::new(TestBackend::new(120, 20)).unwrap();
        terminal.draw(|f| render(&mut app, &tc, f)).unwrap();

        let text = screen(&terminal);
        assert!(text.contains("c3 - home/me"));
        assert!(text.contains("A/"));
        assert!(text.contains("File: a.txt"));
        assert!(text.contains("alpha"));
        assert!(text.contains("Hidden files: hidden"));
        assert!(text.contains("Search: none"));
        assert!(text.contains("BROWSE"));
    }

    #[test]
    fn search_mode_shows_input_line() {
        let mut app = app();
        app.apply(Action::BeginSearch);
        app.apply(Action::SearchInput('b'));
        let tc = theme::dark_theme();
        let mut terminal = Terminal::new(TestBackend::new(120, 20)).unwrap();
        terminal.draw(|f| render(&mut app, &tc, f)).unwrap();

        let text = screen(&terminal);
        assert!(text.contains("Search: b "));
        assert!(text.contains("SEARCH"));
        assert!(!text.contains("a.txt"));
    }

    #[test]
    fn hidden_marker_and_listing_error_reach_the_frame() {
        let fs = MemFs::new().dir("/w/locked").deny("/w/locked");
        let mut app = App::new(
            Box::new(fs),
            PathBuf::from("/w"),
            true,
            PreviewSettings::default(),
        );
        app.apply(Action::Open);
        let tc = theme::dark_theme();
        let mut terminal = Terminal::new(TestBackend::new(120, 20)).unwrap();
        terminal.draw(|f| render(&mut app, &tc, f)).unwrap();

        let text = screen(&terminal);
        assert!(text.contains("c3 - w/locked [+hidden]"));
        assert!(text.contains("Error reading directory"));
        assert!(!text.contains("(empty)"));
    }
}
