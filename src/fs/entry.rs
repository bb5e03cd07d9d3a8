use std::path::{Path, PathBuf};

use crate::fs::accessor::RawEntry;

/// Kind of a directory child.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Directory,
    File,
    /// Special files and dangling symlinks.
    Other,
}

/// One child of a directory, as displayed in the listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub path: PathBuf,
    pub kind: EntryKind,
    /// MIME-like tag inferred from the name's extension.
    pub content_type: Option<&'static str>,
}

impl Entry {
    /// Build an entry for `raw`, a child of `dir`.
    pub fn from_raw(dir: &Path, raw: RawEntry) -> Self {
        let content_type = match raw.kind {
            EntryKind::Directory => None,
            _ => content_type_for(&raw.name),
        };
        Self {
            path: dir.join(&raw.name),
            name: raw.name,
            kind: raw.kind,
            content_type,
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    pub fn is_hidden(&self) -> bool {
        self.name.starts_with('.')
    }

    /// Name with a trailing `/` for directories.
    pub fn display_name(&self) -> String {
        if self.is_dir() {
            format!("{}/", self.name)
        } else {
            self.name.clone()
        }
    }
}

/// Infer a content type from the extension of `name`. No content sniffing.
pub fn content_type_for(name: &str) -> Option<&'static str> {
    let ext = Path::new(name).extension()?.to_str()?.to_ascii_lowercase();
    let ty = match ext.as_str() {
        "txt" | "text" | "log" | "ini" | "cfg" | "conf" => "text/plain",
        "md" | "markdown" => "text/markdown",
        "rst" => "text/x-rst",
        "csv" => "text/csv",
        "tsv" => "text/tab-separated-values",
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "xml" => "text/xml",
        "js" | "mjs" => "text/javascript",
        "ts" | "tsx" => "text/x-typescript",
        "rs" => "text/x-rust",
        "go" => "text/x-go",
        "py" => "text/x-python",
        "rb" => "text/x-ruby",
        "java" => "text/x-java",
        "c" | "h" => "text/x-c",
        "cpp" | "cxx" | "cc" | "hpp" => "text/x-c++",
        "lua" => "text/x-lua",
        "sql" => "text/x-sql",
        "sh" | "bash" | "zsh" | "fish" => "application/x-sh",
        "json" => "application/json",
        "toml" => "application/toml",
        "yaml" | "yml" => "application/yaml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "ico" => "image/x-icon",
        "svg" => "image/svg+xml",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "flac" => "audio/flac",
        "ogg" => "audio/ogg",
        "mp4" => "video/mp4",
        "mkv" => "video/x-matroska",
        "webm" => "video/webm",
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "gz" => "application/gzip",
        "tar" => "application/x-tar",
        "xz" => "application/x-xz",
        "bz2" => "application/x-bzip2",
        "7z" => "application/x-7z-compressed",
        "wasm" => "application/wasm",
        "exe" | "bin" | "so" | "dylib" | "dll" | "o" | "a" => "application/octet-stream",
        _ => return None,
    };
    Some(ty)
}

/// Whether `content_type` describes human-readable text.
pub fn is_textual(content_type: &str) -> bool {
    content_type.starts_with("text/")
        || matches!(
            content_type,
            "application/json" | "application/toml" | "application/yaml" | "application/x-sh"
        )
}
