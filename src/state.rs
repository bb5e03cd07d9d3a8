//! Navigation state and its pure transitions.
//!
//! Nothing here touches the filesystem; callers re-run the listing pipeline
//! after a transition and then call [`NavState::clamp_cursor`].

use std::path::{Path, PathBuf};

use crate::fs::listing::ViewConfig;

/// Interaction mode.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Keys navigate and act on the listing.
    #[default]
    Browse,
    /// Printable keys edit the search prefix.
    SearchEntry,
}

/// How the left panel presents the current directory.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Flat listing of the current directory.
    #[default]
    List,
    /// Directories expand in place.
    Tree,
}

impl Layout {
    pub fn toggled(self) -> Self {
        match self {
            Layout::List => Layout::Tree,
            Layout::Tree => Layout::List,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Layout::List => "list",
            Layout::Tree => "tree",
        }
    }
}

/// Current directory, cursor, mode and view configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavState {
    pub current_dir: PathBuf,
    pub mode: Mode,
    /// Index into the visible rows; `0` also when there are none.
    pub cursor: usize,
    pub view: ViewConfig,
    pub layout: Layout,
}

impl NavState {
    pub fn new(current_dir: PathBuf, show_hidden: bool) -> Self {
        Self {
            current_dir,
            mode: Mode::Browse,
            cursor: 0,
            view: ViewConfig {
                show_hidden,
                search_prefix: String::new(),
            },
            layout: Layout::List,
        }
    }

    /// Switch to `dir`, dropping any search context.
    pub fn enter_directory(&mut self, dir: PathBuf) {
        self.current_dir = dir;
        self.view.search_prefix.clear();
        self.mode = Mode::Browse;
        self.cursor = 0;
    }

    /// Parent of the current directory; `None` at the filesystem root.
    pub fn parent_dir(&self) -> Option<PathBuf> {
        self.current_dir.parent().map(Path::to_path_buf)
    }

    /// Keep the cursor inside `[0, len - 1]`, or at `0` for an empty listing.
    pub fn clamp_cursor(&mut self, len: usize) {
        if len == 0 {
            self.cursor = 0;
        } else if self.cursor >= len {
            self.cursor = len - 1;
        }
    }

    pub fn move_down(&mut self, len: usize) {
        if len > 0 && self.cursor < len - 1 {
            self.cursor += 1;
        }
    }

    pub fn move_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_first(&mut self) {
        self.cursor = 0;
    }

    pub fn move_last(&mut self, len: usize) {
        self.cursor = len.saturating_sub(1);
    }

    pub fn toggle_hidden(&mut self) {
        self.view.show_hidden = !self.view.show_hidden;
    }

    pub fn toggle_layout(&mut self) {
        self.layout = self.layout.toggled();
    }

    /// Enter search mode; the cursor and directory stay where they are.
    pub fn begin_search(&mut self) {
        self.mode = Mode::SearchEntry;
    }

    pub fn push_search_char(&mut self, c: char) {
        self.view.search_prefix.push(c);
    }

    pub fn pop_search_char(&mut self) {
        self.view.search_prefix.pop();
    }

    /// Leave search mode keeping the prefix as an active filter.
    pub fn confirm_search(&mut self) {
        self.mode = Mode::Browse;
    }

    /// Leave search mode and drop the prefix.
    pub fn cancel_search(&mut self) {
        self.mode = Mode::Browse;
        self.view.search_prefix.clear();
    }

    /// `Hidden files: shown|hidden`.
    pub fn hidden_status(&self) -> String {
        let state = if self.view.show_hidden {
            "shown"
        } else {
            "hidden"
        };
        format!("Hidden files: {state}")
    }

    /// `Search: <prefix>` or `Search: none`.
    pub fn search_status(&self) -> String {
        let prefix = self.view.search_prefix.trim();
        if prefix.is_empty() {
            "Search: none".to_string()
        } else {
            format!("Search: {prefix}")
        }
    }
}
