//! Key routing. Each mode has its own table, so a key that is a command in
//! browse mode (`q`, `s`, `f`, ...) is plain text while searching.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::App;
use crate::state::Mode;

/// Decoded logical key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Ctrl(char),
    Up,
    Down,
    Left,
    Right,
    Enter,
    Esc,
    Backspace,
    Home,
    End,
    /// Anything this application never binds.
    Unbound,
}

impl From<KeyEvent> for Key {
    fn from(key: KeyEvent) -> Self {
        match key.code {
            KeyCode::Char(c) if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Key::Ctrl(c.to_ascii_lowercase())
            }
            KeyCode::Char(_) if key.modifiers.contains(KeyModifiers::ALT) => Key::Unbound,
            KeyCode::Char(c) if !c.is_control() => Key::Char(c),
            KeyCode::Up => Key::Up,
            KeyCode::Down => Key::Down,
            KeyCode::Left => Key::Left,
            KeyCode::Right => Key::Right,
            KeyCode::Enter => Key::Enter,
            KeyCode::Esc => Key::Esc,
            KeyCode::Backspace => Key::Backspace,
            KeyCode::Home => Key::Home,
            KeyCode::End => Key::End,
            _ => Key::Unbound,
        }
    }
}

/// State transition requested by a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MoveUp,
    MoveDown,
    MoveFirst,
    MoveLast,
    /// Enter the selected directory (list) or toggle its expansion (tree).
    Open,
    Parent,
    ToggleHidden,
    ToggleLayout,
    BeginSearch,
    SearchInput(char),
    SearchBackspace,
    ConfirmSearch,
    CancelSearch,
    Quit,
}

/// Map `key` to an action for `mode`. Unbound keys yield `None`.
pub fn dispatch(mode: Mode, key: Key) -> Option<Action> {
    match mode {
        Mode::Browse => browse_action(key),
        Mode::SearchEntry => search_action(key),
    }
}

fn browse_action(key: Key) -> Option<Action> {
    let action = match key {
        Key::Down | Key::Char('j') => Action::MoveDown,
        Key::Up | Key::Char('k') => Action::MoveUp,
        Key::Home | Key::Char('g') => Action::MoveFirst,
        Key::End | Key::Char('G') => Action::MoveLast,
        Key::Enter | Key::Right | Key::Char('l') => Action::Open,
        Key::Left | Key::Backspace | Key::Char('h') => Action::Parent,
        Key::Char('s' | 'S' | '.') => Action::ToggleHidden,
        Key::Char('f' | 'F' | '/') => Action::BeginSearch,
        Key::Char('t') => Action::ToggleLayout,
        Key::Char('q') | Key::Esc | Key::Ctrl('c') => Action::Quit,
        _ => return None,
    };
    Some(action)
}

fn search_action(key: Key) -> Option<Action> {
    let action = match key {
        Key::Char(c) => Action::SearchInput(c),
        Key::Backspace => Action::SearchBackspace,
        Key::Down => Action::MoveDown,
        Key::Up => Action::MoveUp,
        Key::Enter => Action::ConfirmSearch,
        Key::Esc | Key::Ctrl('c') => Action::CancelSearch,
        _ => return None,
    };
    Some(action)
}

/// Handle a key event.
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }
    if let Some(action) = dispatch(app.nav.mode, Key::from(key)) {
        app.apply(action);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::memory::MemFs;
    use crate::preview_content::PreviewSettings;
    use std::path::PathBuf;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn app() -> App {
        let fs = MemFs::new()
            .file("/w/b.txt", "b")
            .dir("/w/A")
            .file("/w/A/inside.txt", "")
            .dir("/w/.git")
            .file("/w/a.txt", "a")
            .file("/w/quick.txt", "q");
        App::new(
            Box::new(fs),
            PathBuf::from("/w"),
            false,
            PreviewSettings::default(),
        )
    }

    fn type_keys(app: &mut App, keys: &str) {
        for c in keys.chars() {
            handle_key_event(app, press(KeyCode::Char(c)));
        }
    }

    #[test]
    fn key_conversion() {
        assert_eq!(Key::from(press(KeyCode::Char('x'))), Key::Char('x'));
        assert_eq!(Key::from(ctrl('c')), Key::Ctrl('c'));
        assert_eq!(
            Key::from(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::ALT)),
            Key::Unbound
        );
        assert_eq!(
            Key::from(KeyEvent::new(KeyCode::Char('S'), KeyModifiers::SHIFT)),
            Key::Char('S')
        );
        assert_eq!(Key::from(press(KeyCode::F(5))), Key::Unbound);
        assert_eq!(Key::from(press(KeyCode::Tab)), Key::Unbound);
    }

    #[test]
    fn browse_table_bindings() {
        assert_eq!(dispatch(Mode::Browse, Key::Char('q')), Some(Action::Quit));
        assert_eq!(dispatch(Mode::Browse, Key::Esc), Some(Action::Quit));
        assert_eq!(dispatch(Mode::Browse, Key::Right), Some(Action::Open));
        assert_eq!(dispatch(Mode::Browse, Key::Left), Some(Action::Parent));
        assert_eq!(
            dispatch(Mode::Browse, Key::Char('S')),
            Some(Action::ToggleHidden)
        );
        assert_eq!(
            dispatch(Mode::Browse, Key::Char('/')),
            Some(Action::BeginSearch)
        );
        assert_eq!(dispatch(Mode::Browse, Key::Char('z')), None);
        assert_eq!(dispatch(Mode::Browse, Key::Unbound), None);
    }

    #[test]
    fn search_table_treats_command_letters_as_text() {
        for c in ['q', 's', 'f', 'j', 'k', 't', 'h', 'l', '/'] {
            assert_eq!(
                dispatch(Mode::SearchEntry, Key::Char(c)),
                Some(Action::SearchInput(c))
            );
        }
        assert_eq!(
            dispatch(Mode::SearchEntry, Key::Esc),
            Some(Action::CancelSearch)
        );
        assert_eq!(
            dispatch(Mode::SearchEntry, Key::Enter),
            Some(Action::ConfirmSearch)
        );
        assert_eq!(dispatch(Mode::SearchEntry, Key::Left), None);
        assert_eq!(dispatch(Mode::SearchEntry, Key::Home), None);
    }

    #[test]
    fn quit_key_in_search_mode_edits_prefix() {
        let mut app = app();
        handle_key_event(&mut app, press(KeyCode::Char('f')));
        assert_eq!(app.nav.mode, Mode::SearchEntry);
        handle_key_event(&mut app, press(KeyCode::Char('q')));
        assert!(!app.should_quit);
        assert_eq!(app.nav.view.search_prefix, "q");
        assert_eq!(app.visible_names(), vec!["quick.txt"]);
    }

    #[test]
    fn escape_quits_only_in_browse_mode() {
        let mut app = app();
        handle_key_event(&mut app, press(KeyCode::Char('/')));
        handle_key_event(&mut app, press(KeyCode::Esc));
        assert!(!app.should_quit);
        assert_eq!(app.nav.mode, Mode::Browse);
        handle_key_event(&mut app, press(KeyCode::Esc));
        assert!(app.should_quit);
    }

    #[test]
    fn ctrl_c_cancels_search_then_quits() {
        let mut app = app();
        handle_key_event(&mut app, press(KeyCode::Char('f')));
        type_keys(&mut app, "a");
        handle_key_event(&mut app, ctrl('c'));
        assert!(!app.should_quit);
        assert!(app.nav.view.search_prefix.is_empty());
        handle_key_event(&mut app, ctrl('c'));
        assert!(app.should_quit);
    }

    #[test]
    fn typing_filters_live_and_confirm_keeps_filter() {
        let mut app = app();
        handle_key_event(&mut app, press(KeyCode::Char('f')));
        type_keys(&mut app, "a");
        assert_eq!(app.visible_names(), vec!["A/", "a.txt"]);
        handle_key_event(&mut app, press(KeyCode::Enter));
        assert_eq!(app.nav.mode, Mode::Browse);
        assert_eq!(app.visible_names(), vec!["A/", "a.txt"]);
    }

    #[test]
    fn backspace_in_search_widens_filter() {
        let mut app = app();
        handle_key_event(&mut app, press(KeyCode::Char('f')));
        type_keys(&mut app, "a.");
        assert_eq!(app.visible_names(), vec!["a.txt"]);
        handle_key_event(&mut app, press(KeyCode::Backspace));
        assert_eq!(app.visible_names(), vec!["A/", "a.txt"]);
    }

    #[test]
    fn unbound_keys_leave_state_untouched() {
        let mut app = app();
        app.nav.cursor = 1;
        let before = app.nav.clone();
        handle_key_event(&mut app, press(KeyCode::F(2)));
        handle_key_event(&mut app, press(KeyCode::Char('z')));
        handle_key_event(&mut app, press(KeyCode::Tab));
        assert_eq!(app.nav, before);
        assert!(!app.should_quit);
    }

    #[test]
    fn key_release_is_ignored() {
        let mut app = app();
        let mut key = press(KeyCode::Char('q'));
        key.kind = KeyEventKind::Release;
        handle_key_event(&mut app, key);
        assert!(!app.should_quit);
    }

    #[test]
    fn cursor_keys_move_through_search_results() {
        let mut app = app();
        handle_key_event(&mut app, press(KeyCode::Char('f')));
        type_keys(&mut app, "a");
        handle_key_event(&mut app, press(KeyCode::Down));
        assert_eq!(app.nav.cursor, 1);
        handle_key_event(&mut app, press(KeyCode::Down));
        assert_eq!(app.nav.cursor, 1);
        assert_eq!(app.nav.mode, Mode::SearchEntry);
    }

    #[test]
    fn enter_directory_then_parent_resets_search() {
        let mut app = app();
        handle_key_event(&mut app, press(KeyCode::Char('f')));
        type_keys(&mut app, "a");
        handle_key_event(&mut app, press(KeyCode::Enter));
        handle_key_event(&mut app, press(KeyCode::Enter));
        assert_eq!(app.nav.current_dir, PathBuf::from("/w/A"));
        assert!(app.nav.view.search_prefix.is_empty());
        handle_key_event(&mut app, press(KeyCode::Left));
        assert_eq!(app.nav.current_dir, PathBuf::from("/w"));
        assert_eq!(app.nav.mode, Mode::Browse);
        assert_eq!(app.nav.cursor, 0);
        assert_eq!(app.visible_names(), vec!["A/", "a.txt", "b.txt", "quick.txt"]);
    }
}
