//! Builds the side-pane text for the selected entry.
//!
//! Output is plain tagged lines so it can be tested without a terminal;
//! the preview widget maps each [`LineKind`] to a theme color.

use std::path::Path;
use std::time::SystemTime;

use time::format_description::well_known::Rfc2822;
use time::OffsetDateTime;
use tracing::debug;

use crate::error::BrowseError;
use crate::fs::accessor::{FsAccessor, Stat};
use crate::fs::entry::{is_textual, Entry, EntryKind};
use crate::fs::listing;

/// Number of leading lines shown for text files.
pub const PREVIEW_LINES: usize = 20;
/// Default upper bound on bytes read for a text excerpt (64 KiB).
pub const DEFAULT_MAX_PREVIEW_BYTES: usize = 64 * 1024;
/// Shown when nothing is selected.
pub const PLACEHOLDER: &str = "Select a file or directory to preview";

const TAB_WIDTH: usize = 4;

/// Tunables for preview generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewSettings {
    /// Bytes read from the start of a file at most.
    pub max_bytes: usize,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_PREVIEW_BYTES,
        }
    }
}

/// Role of a preview line, used for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Heading,
    DirEntry,
    FileEntry,
    Field,
    Separator,
    Content,
    Error,
    Placeholder,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewLine {
    pub kind: LineKind,
    pub text: String,
}

impl PreviewLine {
    pub fn new(kind: LineKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// Generated preview for one selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreviewText {
    pub lines: Vec<PreviewLine>,
}

impl PreviewText {
    pub fn placeholder() -> Self {
        Self {
            lines: vec![PreviewLine::new(LineKind::Placeholder, PLACEHOLDER)],
        }
    }

    pub fn from_error(err: &BrowseError) -> Self {
        Self {
            lines: vec![PreviewLine::new(LineKind::Error, err.to_string())],
        }
    }

    /// Whether a file content excerpt is part of this preview.
    #[cfg(test)]
    pub fn has_content_section(&self) -> bool {
        self.lines.iter().any(|l| l.kind == LineKind::Separator)
    }

    /// All lines joined with newlines.
    #[cfg(test)]
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Describe `selection`, or return the placeholder when there is none.
pub fn generate(
    fs: &dyn FsAccessor,
    selection: Option<&Entry>,
    settings: &PreviewSettings,
) -> PreviewText {
    match selection {
        None => PreviewText::placeholder(),
        Some(entry) if entry.is_dir() => directory_preview(fs, entry),
        Some(entry) => file_preview(fs, entry, settings),
    }
}

fn directory_preview(fs: &dyn FsAccessor, entry: &Entry) -> PreviewText {
    let mut lines = vec![PreviewLine::new(
        LineKind::Heading,
        format!("Directory: {}", entry.name),
    )];

    match fs.enumerate(&entry.path) {
        Ok(raw) => {
            let mut children: Vec<Entry> = raw
                .into_iter()
                .map(|r| Entry::from_raw(&entry.path, r))
                .collect();
            listing::sort_entries(&mut children);
            lines.extend(children.iter().map(|child| {
                let kind = if child.is_dir() {
                    LineKind::DirEntry
                } else {
                    LineKind::FileEntry
                };
                PreviewLine::new(kind, child.display_name())
            }));
        }
        Err(source) => {
            debug!(path = %entry.path.display(), error = %source, "preview enumerate failed");
            let err = BrowseError::DirectoryUnreadable {
                path: entry.path.clone(),
                source,
            };
            lines.push(PreviewLine::new(LineKind::Error, err.to_string()));
        }
    }

    PreviewText { lines }
}

fn file_preview(fs: &dyn FsAccessor, entry: &Entry, settings: &PreviewSettings) -> PreviewText {
    let stat = match fs.stat(&entry.path) {
        Ok(stat) => stat,
        Err(source) => {
            debug!(path = %entry.path.display(), error = %source, "selected path vanished");
            return PreviewText::from_error(&BrowseError::PathVanished {
                path: entry.path.clone(),
                source,
            });
        }
    };

    let mut lines = metadata_lines(entry, &stat);

    let textual = entry.kind == EntryKind::File
        && entry.content_type.is_some_and(is_textual);
    if textual {
        lines.push(PreviewLine::new(
            LineKind::Separator,
            format!("--- Content (first {PREVIEW_LINES} lines) ---"),
        ));
        lines.extend(content_lines(fs, &entry.path, settings.max_bytes));
    }

    PreviewText { lines }
}

fn metadata_lines(entry: &Entry, stat: &Stat) -> Vec<PreviewLine> {
    let heading = match entry.kind {
        EntryKind::Other => format!("Other: {}", entry.name),
        _ => format!("File: {}", entry.name),
    };
    vec![
        PreviewLine::new(LineKind::Heading, heading),
        PreviewLine::new(LineKind::Field, format!("Size: {}", describe_size(stat.size))),
        PreviewLine::new(
            LineKind::Field,
            format!("Modified: {}", format_modified(stat.modified)),
        ),
        PreviewLine::new(LineKind::Field, format!("Permissions: {}", stat.permissions)),
        PreviewLine::new(
            LineKind::Field,
            format!("MIME: {}", entry.content_type.unwrap_or("unknown")),
        ),
    ]
}

/// Up to [`PREVIEW_LINES`] lines from a bounded prefix of the file.
fn content_lines(fs: &dyn FsAccessor, path: &Path, max_bytes: usize) -> Vec<PreviewLine> {
    let bytes = match fs.read_prefix(path, max_bytes) {
        Ok(bytes) => bytes,
        Err(source) => {
            debug!(path = %path.display(), error = %source, "preview read failed");
            let err = BrowseError::ReadTruncated {
                path: path.to_path_buf(),
                source,
            };
            return vec![PreviewLine::new(LineKind::Error, err.to_string())];
        }
    };

    String::from_utf8_lossy(&bytes)
        .lines()
        .take(PREVIEW_LINES)
        .map(|line| PreviewLine::new(LineKind::Content, expand_tabs(line)))
        .collect()
}

fn expand_tabs(line: &str) -> String {
    line.replace('\t', &" ".repeat(TAB_WIDTH))
}

/// `N bytes (<human>)`.
fn describe_size(bytes: u64) -> String {
    format!("{bytes} bytes ({})", format_size(bytes))
}

/// Format bytes into human-readable size string.
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * KB;
    const GB: u64 = 1024 * MB;
    const TB: u64 = 1024 * GB;

    if bytes >= TB {
        format!("{:.2} TB", bytes as f64 / TB as f64)
    } else if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// RFC 2822 timestamp in UTC, or `unknown`.
fn format_modified(modified: Option<SystemTime>) -> String {
    modified
        .and_then(|t| OffsetDateTime::from(t).format(&Rfc2822).ok())
        .unwrap_or_else(|| "unknown".to_string())
}
