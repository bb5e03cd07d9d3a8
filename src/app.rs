use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, info, trace, warn};

use crate::error::BrowseError;
use crate::fs::accessor::FsAccessor;
use crate::fs::entry::{Entry, EntryKind};
use crate::fs::tree::DirTree;
use crate::handler::Action;
use crate::preview_content::{self, PreviewSettings, PreviewText};
use crate::state::{Layout, Mode, NavState};

/// One visible row, ready for drawing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    /// Name with a trailing `/` for directories.
    pub label: String,
    pub kind: EntryKind,
    pub depth: usize,
    pub expanded: bool,
    pub hidden: bool,
    pub is_last_sibling: bool,
    /// Per ancestor, outermost first: whether it was the last sibling.
    pub ancestor_last: Vec<bool>,
}

/// Read-only snapshot handed to the presentation layer after each mutation.
#[derive(Debug)]
pub struct RenderState<'a> {
    pub current_dir: &'a Path,
    pub rows: Vec<RowView>,
    pub cursor: usize,
    pub scroll_offset: usize,
    pub mode: Mode,
    pub layout: Layout,
    pub search_prefix: &'a str,
    pub show_hidden: bool,
    pub hidden_status: String,
    pub search_status: String,
    pub preview: &'a PreviewText,
    pub listing_error: Option<&'a BrowseError>,
    pub status_message: Option<&'a str>,
}

/// Main application state.
pub struct App {
    fs: Box<dyn FsAccessor>,
    pub nav: NavState,
    pub tree: DirTree,
    pub preview: PreviewText,
    pub preview_settings: PreviewSettings,
    pub scroll_offset: usize,
    pub should_quit: bool,
    pub status_message: Option<(String, Instant)>,
}

impl App {
    /// Create a new App showing `start_dir`.
    pub fn new(
        fs: Box<dyn FsAccessor>,
        start_dir: PathBuf,
        show_hidden: bool,
        preview_settings: PreviewSettings,
    ) -> Self {
        let nav = NavState::new(start_dir, show_hidden);
        let tree = DirTree::load(fs.as_ref(), &nav.current_dir, &nav.view);
        let mut app = Self {
            fs,
            nav,
            tree,
            preview: PreviewText::default(),
            preview_settings,
            scroll_offset: 0,
            should_quit: false,
            status_message: None,
        };
        app.log_listing();
        app.refresh_preview();
        app
    }

    /// Perform one dispatched action, then regenerate the preview.
    pub fn apply(&mut self, action: Action) {
        trace!(?action, mode = ?self.nav.mode, "apply");
        match action {
            Action::MoveDown => self.nav.move_down(self.tree.len()),
            Action::MoveUp => self.nav.move_up(),
            Action::MoveFirst => self.nav.move_first(),
            Action::MoveLast => self.nav.move_last(self.tree.len()),
            Action::Open => self.open_selected(),
            Action::Parent => self.go_to_parent(),
            Action::ToggleHidden => {
                self.nav.toggle_hidden();
                self.relist();
            }
            Action::ToggleLayout => {
                self.nav.toggle_layout();
                self.relist();
            }
            Action::BeginSearch => self.nav.begin_search(),
            Action::SearchInput(c) => {
                self.nav.push_search_char(c);
                self.relist();
            }
            Action::SearchBackspace => {
                self.nav.pop_search_char();
                self.relist();
            }
            Action::ConfirmSearch => self.nav.confirm_search(),
            Action::CancelSearch => {
                self.nav.cancel_search();
                self.relist();
            }
            Action::Quit => {
                self.quit();
                return;
            }
        }
        self.refresh_preview();
    }

    /// Entry under the cursor, if any.
    pub fn selected(&self) -> Option<&Entry> {
        self.tree.entry_at(self.nav.cursor)
    }

    /// Quit the application.
    pub fn quit(&mut self) {
        info!("quit requested");
        self.should_quit = true;
    }

    /// Set a status message with current timestamp.
    pub fn set_status_message(&mut self, msg: String) {
        self.status_message = Some((msg, Instant::now()));
    }

    /// Clear the status message if it has been displayed for more than 3 seconds.
    pub fn clear_expired_status(&mut self) {
        if let Some((_, ref created)) = self.status_message {
            if created.elapsed().as_secs() > 3 {
                self.status_message = None;
            }
        }
    }

    /// Re-list after the watcher reported changes under `paths`.
    ///
    /// Changes outside the directories currently on screen are stale (the
    /// user has navigated away since) and are dropped.
    pub fn handle_fs_change(&mut self, paths: Vec<PathBuf>) {
        let relevant = paths.iter().any(|p| {
            self.tree.shows_directory(p) || p.parent().is_some_and(|d| self.tree.shows_directory(d))
        });
        if !relevant {
            trace!(count = paths.len(), "ignoring change outside displayed directories");
            return;
        }

        debug!(count = paths.len(), dir = %self.nav.current_dir.display(), "refreshing after fs change");
        let selected = self.selected().map(|e| e.path.clone());
        self.relist();
        if let Some(row) = selected.and_then(|p| self.tree.find_row(&p)) {
            self.nav.cursor = row;
        }
        self.refresh_preview();
    }

    /// Update the scroll offset to ensure the cursor is visible and no
    /// rows are left off-screen when the listing fits.
    pub fn update_scroll(&mut self, visible_height: usize) {
        if visible_height == 0 {
            return;
        }
        if self.tree.is_empty() {
            self.scroll_offset = 0;
            return;
        }
        if self.nav.cursor < self.scroll_offset {
            self.scroll_offset = self.nav.cursor;
        } else if self.nav.cursor >= self.scroll_offset + visible_height {
            self.scroll_offset = self.nav.cursor - visible_height + 1;
        }
        let max_offset = self.tree.len().saturating_sub(visible_height);
        self.scroll_offset = self.scroll_offset.min(max_offset);
    }

    /// Everything the presentation layer needs for one frame.
    pub fn snapshot(&self) -> RenderState<'_> {
        let rows = (0..self.tree.len())
            .filter_map(|i| {
                let row = self.tree.rows()[i];
                let node = self.tree.node_at(i)?;
                Some(RowView {
                    label: node.entry.display_name(),
                    kind: node.entry.kind,
                    depth: row.depth,
                    expanded: node.expanded,
                    hidden: node.entry.is_hidden(),
                    is_last_sibling: row.is_last_sibling,
                    ancestor_last: self.tree.ancestor_last_flags(i),
                })
            })
            .collect();

        RenderState {
            current_dir: &self.nav.current_dir,
            rows,
            cursor: self.nav.cursor,
            scroll_offset: self.scroll_offset,
            mode: self.nav.mode,
            layout: self.nav.layout,
            search_prefix: &self.nav.view.search_prefix,
            show_hidden: self.nav.view.show_hidden,
            hidden_status: self.nav.hidden_status(),
            search_status: self.nav.search_status(),
            preview: &self.preview,
            listing_error: self.tree.error.as_ref(),
            status_message: self.status_message.as_ref().map(|(m, _)| m.as_str()),
        }
    }

    fn open_selected(&mut self) {
        let cursor = self.nav.cursor;
        let Some(node) = self.tree.node_at(cursor) else {
            return;
        };
        if !node.entry.is_dir() {
            return;
        }
        let path = node.entry.path.clone();
        let expanded = node.expanded;

        match self.nav.layout {
            Layout::List => self.enter_directory(path),
            Layout::Tree => {
                let id = self.tree.rows()[cursor].node;
                if expanded {
                    self.tree.collapse(id);
                } else if let Err(err) = self.tree.expand(self.fs.as_ref(), id, &self.nav.view) {
                    warn!(path = %path.display(), error = %err, "expand failed");
                    self.set_status_message(err.to_string());
                }
                self.nav.clamp_cursor(self.tree.len());
            }
        }
    }

    fn go_to_parent(&mut self) {
        match self.nav.parent_dir() {
            Some(parent) => self.enter_directory(parent),
            None => trace!("already at filesystem root"),
        }
    }

    /// Change directory after confirming the target still exists.
    fn enter_directory(&mut self, dir: PathBuf) {
        match self.fs.stat(&dir) {
            Ok(stat) if stat.kind == EntryKind::Directory => {
                info!(dir = %dir.display(), "entering directory");
                self.nav.enter_directory(dir);
                self.scroll_offset = 0;
                self.tree = DirTree::load(self.fs.as_ref(), &self.nav.current_dir, &self.nav.view);
                self.log_listing();
            }
            Ok(_) => debug!(dir = %dir.display(), "not a directory, ignoring"),
            Err(source) => {
                let err = BrowseError::PathVanished { path: dir, source };
                warn!(error = %err, "cannot enter directory");
                self.set_status_message(err.to_string());
                self.relist();
            }
        }
    }

    /// Rebuild the visible rows from the filesystem and clamp the cursor.
    fn relist(&mut self) {
        let expanded = match self.nav.layout {
            Layout::Tree => self.tree.expanded_paths(),
            Layout::List => Vec::new(),
        };
        self.tree = DirTree::reload(
            self.fs.as_ref(),
            &self.nav.current_dir,
            &self.nav.view,
            &expanded,
        );
        self.nav.clamp_cursor(self.tree.len());
        self.log_listing();
    }

    fn refresh_preview(&mut self) {
        self.preview = match (self.selected(), &self.tree.error) {
            (None, Some(err)) => PreviewText::from_error(err),
            (selection, _) => {
                preview_content::generate(self.fs.as_ref(), selection, &self.preview_settings)
            }
        };
    }

    fn log_listing(&self) {
        match &self.tree.error {
            Some(err) => warn!(error = %err, "listing failed"),
            None => debug!(
                dir = %self.nav.current_dir.display(),
                rows = self.tree.len(),
                hidden = self.nav.view.show_hidden,
                prefix = %self.nav.view.search_prefix,
                "listed"
            ),
        }
    }

    #[cfg(test)]
    pub fn visible_names(&self) -> Vec<String> {
        self.snapshot().rows.into_iter().map(|r| r.label).collect()
    }
}
