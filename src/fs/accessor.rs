//! Filesystem capability consumed by the listing pipeline and the preview.
//!
//! Every call is synchronous and attempted once. Failures are reported as
//! [`FsError`] and turned into inline annotations by the callers.

use std::fs::{self, File, Metadata};
use std::io::Read;
use std::path::Path;
use std::time::SystemTime;

use crate::error::FsError;
use crate::fs::entry::EntryKind;

/// One name returned by [`FsAccessor::enumerate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntry {
    pub name: String,
    pub kind: EntryKind,
}

/// Metadata returned by [`FsAccessor::stat`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stat {
    pub size: u64,
    pub modified: Option<SystemTime>,
    /// Display string such as `-rw-r--r--`.
    pub permissions: String,
    pub kind: EntryKind,
}

/// Directory enumeration, stat, and bounded reads.
pub trait FsAccessor {
    /// List the immediate children of `path`, in no particular order.
    fn enumerate(&self, path: &Path) -> Result<Vec<RawEntry>, FsError>;

    /// Stat `path`, following symlinks.
    fn stat(&self, path: &Path) -> Result<Stat, FsError>;

    /// Read at most `max_bytes` from the start of the file at `path`.
    fn read_prefix(&self, path: &Path, max_bytes: usize) -> Result<Vec<u8>, FsError>;
}

/// [`FsAccessor`] backed by the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFs;

impl FsAccessor for LocalFs {
    fn enumerate(&self, path: &Path) -> Result<Vec<RawEntry>, FsError> {
        let entries = fs::read_dir(path).map_err(|e| FsError::from_io(path, &e))?;

        let mut raw = Vec::new();
        for entry in entries {
            // Entries that disappear mid-enumeration are skipped.
            let entry = match entry {
                Ok(e) => e,
                Err(_) => continue,
            };
            let name = entry.file_name().to_string_lossy().to_string();
            let kind = match entry.file_type() {
                Ok(ft) if ft.is_symlink() => match fs::metadata(entry.path()) {
                    Ok(target) => kind_of(&target),
                    Err(_) => EntryKind::Other,
                },
                Ok(ft) if ft.is_dir() => EntryKind::Directory,
                Ok(ft) if ft.is_file() => EntryKind::File,
                _ => EntryKind::Other,
            };
            raw.push(RawEntry { name, kind });
        }
        Ok(raw)
    }

    fn stat(&self, path: &Path) -> Result<Stat, FsError> {
        let metadata = fs::metadata(path).map_err(|e| FsError::from_io(path, &e))?;
        Ok(Stat {
            size: metadata.len(),
            modified: metadata.modified().ok(),
            permissions: permission_string(&metadata),
            kind: kind_of(&metadata),
        })
    }

    fn read_prefix(&self, path: &Path, max_bytes: usize) -> Result<Vec<u8>, FsError> {
        let file = File::open(path).map_err(|e| FsError::from_io(path, &e))?;
        let mut buf = Vec::with_capacity(max_bytes.min(64 * 1024));
        file.take(max_bytes as u64)
            .read_to_end(&mut buf)
            .map_err(|e| FsError::from_io(path, &e))?;
        Ok(buf)
    }
}

fn kind_of(metadata: &Metadata) -> EntryKind {
    if metadata.is_dir() {
        EntryKind::Directory
    } else if metadata.is_file() {
        EntryKind::File
    } else {
        EntryKind::Other
    }
}

#[cfg(unix)]
fn permission_string(metadata: &Metadata) -> String {
    use std::os::unix::fs::{FileTypeExt, PermissionsExt};

    let ft = metadata.file_type();
    let type_char = if ft.is_dir() {
        'd'
    } else if ft.is_fifo() {
        'p'
    } else if ft.is_socket() {
        's'
    } else if ft.is_char_device() {
        'c'
    } else if ft.is_block_device() {
        'b'
    } else {
        '-'
    };

    let mode = metadata.permissions().mode();
    let mut s = String::with_capacity(10);
    s.push(type_char);
    s.push_str(&format_mode_bits(mode));
    s
}

#[cfg(not(unix))]
fn permission_string(metadata: &Metadata) -> String {
    let type_char = if metadata.is_dir() { 'd' } else { '-' };
    let rw = if metadata.permissions().readonly() {
        "r--r--r--"
    } else {
        "rw-rw-rw-"
    };
    format!("{type_char}{rw}")
}

/// Format the low nine mode bits as `rwxrwxrwx`.
pub fn format_mode_bits(mode: u32) -> String {
    let flags = [
        (0o400, 'r'),
        (0o200, 'w'),
        (0o100, 'x'),
        (0o040, 'r'),
        (0o020, 'w'),
        (0o010, 'x'),
        (0o004, 'r'),
        (0o002, 'w'),
        (0o001, 'x'),
    ];
    flags
        .iter()
        .map(|&(bit, ch)| if mode & bit != 0 { ch } else { '-' })
        .collect()
}
