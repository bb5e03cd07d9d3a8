//! Turns a raw directory enumeration into the ordered, filtered listing.

use std::path::Path;

use tracing::debug;

use crate::error::BrowseError;
use crate::fs::accessor::FsAccessor;
use crate::fs::entry::Entry;

/// Filters that govern which entries are listed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewConfig {
    pub show_hidden: bool,
    pub search_prefix: String,
}

impl ViewConfig {
    /// Whether an entry named `name` passes the hidden and search filters.
    pub fn admits(&self, name: &str) -> bool {
        if !self.show_hidden && name.starts_with('.') {
            return false;
        }
        match self.active_prefix() {
            Some(prefix) => name.to_lowercase().starts_with(&prefix),
            None => true,
        }
    }

    /// Lowercased, whitespace-trimmed prefix, or `None` when it is blank.
    fn active_prefix(&self) -> Option<String> {
        let trimmed = self.search_prefix.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_lowercase())
        }
    }
}

/// Result of one pipeline evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    pub entries: Vec<Entry>,
    pub error: Option<BrowseError>,
}

/// Enumerate `dir` once and apply hidden filter, search filter, and ordering.
///
/// An enumeration failure yields an empty listing carrying
/// [`BrowseError::DirectoryUnreadable`].
pub fn list(fs: &dyn FsAccessor, dir: &Path, view: &ViewConfig) -> Listing {
    let raw = match fs.enumerate(dir) {
        Ok(raw) => raw,
        Err(source) => {
            debug!(path = %dir.display(), error = %source, "directory unreadable");
            return Listing {
                entries: Vec::new(),
                error: Some(BrowseError::DirectoryUnreadable {
                    path: dir.to_path_buf(),
                    source,
                }),
            };
        }
    };

    let mut entries: Vec<Entry> = raw
        .into_iter()
        .filter(|r| view.admits(&r.name))
        .map(|r| Entry::from_raw(dir, r))
        .collect();
    sort_entries(&mut entries);

    Listing {
        entries,
        error: None,
    }
}

/// Directories first, then everything else; each group by case-sensitive name.
///
/// `sort_by` is stable, so equal keys keep enumeration order.
pub fn sort_entries(entries: &mut [Entry]) {
    entries.sort_by(|a, b| b.is_dir().cmp(&a.is_dir()).then_with(|| a.name.cmp(&b.name)));
}
