//! In-memory [`FsAccessor`] for tests.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use crate::error::FsError;
use crate::fs::accessor::{FsAccessor, RawEntry, Stat};
use crate::fs::entry::EntryKind;

#[derive(Debug, Clone)]
enum MemNode {
    Dir,
    File(Vec<u8>),
    Other,
}

/// Builder-style fake filesystem. Children enumerate in insertion order.
#[derive(Debug, Default)]
pub struct MemFs {
    nodes: HashMap<PathBuf, MemNode>,
    children: HashMap<PathBuf, Vec<(String, EntryKind)>>,
    denied: HashSet<PathBuf>,
    broken_reads: HashSet<PathBuf>,
}

impl MemFs {
    pub fn new() -> Self {
        let mut fs = Self::default();
        fs.nodes.insert(PathBuf::from("/"), MemNode::Dir);
        fs
    }

    pub fn dir(mut self, path: &str) -> Self {
        self.insert(Path::new(path), MemNode::Dir, EntryKind::Directory);
        self
    }

    pub fn file(mut self, path: &str, contents: &str) -> Self {
        self.insert(
            Path::new(path),
            MemNode::File(contents.as_bytes().to_vec()),
            EntryKind::File,
        );
        self
    }

    pub fn bytes(mut self, path: &str, contents: &[u8]) -> Self {
        self.insert(Path::new(path), MemNode::File(contents.to_vec()), EntryKind::File);
        self
    }

    pub fn special(mut self, path: &str) -> Self {
        self.insert(Path::new(path), MemNode::Other, EntryKind::Other);
        self
    }

    /// Listed by its parent, but stat and reads fail with `NotFound`.
    pub fn ghost(mut self, path: &str) -> Self {
        let path = Path::new(path);
        let parent = path.parent().unwrap_or(Path::new("/")).to_path_buf();
        self.ensure_dir(&parent);
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        self.children
            .entry(parent)
            .or_default()
            .push((name, EntryKind::File));
        self
    }

    /// Enumeration of `path` fails with `PermissionDenied`.
    pub fn deny(mut self, path: &str) -> Self {
        self.denied.insert(PathBuf::from(path));
        self
    }

    /// Reads of `path` fail with an I/O error.
    pub fn broken_read(mut self, path: &str) -> Self {
        self.broken_reads.insert(PathBuf::from(path));
        self
    }

    fn insert(&mut self, path: &Path, node: MemNode, kind: EntryKind) {
        let parent = path.parent().unwrap_or(Path::new("/")).to_path_buf();
        self.ensure_dir(&parent);
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        self.children.entry(parent).or_default().push((name, kind));
        self.nodes.insert(path.to_path_buf(), node);
    }

    fn ensure_dir(&mut self, path: &Path) {
        if self.nodes.contains_key(path) {
            return;
        }
        self.insert(path, MemNode::Dir, EntryKind::Directory);
    }
}

impl FsAccessor for MemFs {
    fn enumerate(&self, path: &Path) -> Result<Vec<RawEntry>, FsError> {
        if self.denied.contains(path) {
            return Err(FsError::PermissionDenied(path.to_path_buf()));
        }
        match self.nodes.get(path) {
            Some(MemNode::Dir) => Ok(self
                .children
                .get(path)
                .map(|c| {
                    c.iter()
                        .map(|(name, kind)| RawEntry {
                            name: name.clone(),
                            kind: *kind,
                        })
                        .collect()
                })
                .unwrap_or_default()),
            Some(_) => Err(FsError::Io {
                path: path.to_path_buf(),
                message: "not a directory".into(),
            }),
            None => Err(FsError::NotFound(path.to_path_buf())),
        }
    }

    fn stat(&self, path: &Path) -> Result<Stat, FsError> {
        let (kind, size, permissions) = match self.nodes.get(path) {
            Some(MemNode::Dir) => (EntryKind::Directory, 4096, "drwxr-xr-x"),
            Some(MemNode::File(bytes)) => (EntryKind::File, bytes.len() as u64, "-rw-r--r--"),
            Some(MemNode::Other) => (EntryKind::Other, 0, "prw-r--r--"),
            None => return Err(FsError::NotFound(path.to_path_buf())),
        };
        Ok(Stat {
            size,
            modified: Some(SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000)),
            permissions: permissions.to_string(),
            kind,
        })
    }

    fn read_prefix(&self, path: &Path, max_bytes: usize) -> Result<Vec<u8>, FsError> {
        if self.broken_reads.contains(path) {
            return Err(FsError::Io {
                path: path.to_path_buf(),
                message: "input/output error".into(),
            });
        }
        match self.nodes.get(path) {
            Some(MemNode::File(bytes)) => Ok(bytes[..bytes.len().min(max_bytes)].to_vec()),
            Some(_) => Err(FsError::Io {
                path: path.to_path_buf(),
                message: "not a regular file".into(),
            }),
            None => Err(FsError::NotFound(path.to_path_buf())),
        }
    }
}
