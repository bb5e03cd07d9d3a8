//! Arena-backed view of the current directory.
//!
//! The root is the current directory itself and is not a row. Its children
//! are the flat listing; in tree layout, directory nodes can be expanded,
//! which lists them through the same pipeline and links the results as child
//! indices. Nodes are never patched: any configuration change rebuilds the
//! arena and re-expands the previously expanded paths.

use std::path::{Path, PathBuf};

use crate::error::BrowseError;
use crate::fs::accessor::FsAccessor;
use crate::fs::entry::Entry;
use crate::fs::listing::{self, ViewConfig};

/// Index into [`DirTree::nodes`].
pub type NodeId = usize;

/// A materialized directory child.
#[derive(Debug, Clone)]
pub struct Node {
    pub entry: Entry,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub depth: usize,
    pub expanded: bool,
    /// Whether `children` reflects a listing of this node.
    pub loaded: bool,
}

/// One visible line of the tree, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Row {
    pub node: NodeId,
    pub depth: usize,
    pub is_last_sibling: bool,
}

/// The visible subtree rooted at one directory.
#[derive(Debug, Clone)]
pub struct DirTree {
    root: PathBuf,
    nodes: Vec<Node>,
    top: Vec<NodeId>,
    rows: Vec<Row>,
    /// Failure listing the root directory, if any.
    pub error: Option<BrowseError>,
}

impl DirTree {
    /// List `root` and build the top level.
    pub fn load(fs: &dyn FsAccessor, root: &Path, view: &ViewConfig) -> Self {
        let listing = listing::list(fs, root, view);
        let mut tree = Self {
            root: root.to_path_buf(),
            nodes: Vec::new(),
            top: Vec::new(),
            rows: Vec::new(),
            error: listing.error,
        };
        tree.top = tree.attach(None, 0, listing.entries);
        tree.flatten();
        tree
    }

    /// Rebuild from the filesystem, then re-expand `expanded` (parent-first).
    pub fn reload(
        fs: &dyn FsAccessor,
        root: &Path,
        view: &ViewConfig,
        expanded: &[PathBuf],
    ) -> Self {
        let mut tree = Self::load(fs, root, view);
        for path in expanded {
            if let Some(id) = tree.find_node(path) {
                // Failures here only mean the directory went away or became
                // unreadable; it simply stays collapsed.
                let _ = tree.expand(fs, id, view);
            }
        }
        tree
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[cfg(test)]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    /// Node shown at display row `index`.
    pub fn node_at(&self, index: usize) -> Option<&Node> {
        self.rows.get(index).map(|row| &self.nodes[row.node])
    }

    pub fn entry_at(&self, index: usize) -> Option<&Entry> {
        self.node_at(index).map(|n| &n.entry)
    }

    /// Display row of the node whose path is `path`.
    pub fn find_row(&self, path: &Path) -> Option<usize> {
        self.rows
            .iter()
            .position(|row| self.nodes[row.node].entry.path == path)
    }

    /// List a directory node and show its children.
    ///
    /// Children are always re-listed, so re-expanding never shows stale data.
    /// Already expanded nodes are left alone.
    pub fn expand(
        &mut self,
        fs: &dyn FsAccessor,
        id: NodeId,
        view: &ViewConfig,
    ) -> Result<(), BrowseError> {
        if !self.nodes[id].entry.is_dir() || self.nodes[id].expanded {
            return Ok(());
        }
        let path = self.nodes[id].entry.path.clone();
        let listing = listing::list(fs, &path, view);
        if let Some(err) = listing.error {
            return Err(err);
        }
        let depth = self.nodes[id].depth + 1;
        let children = self.attach(Some(id), depth, listing.entries);
        let node = &mut self.nodes[id];
        node.children = children;
        node.loaded = true;
        node.expanded = true;
        self.flatten();
        Ok(())
    }

    /// Hide a node's children and drop them from the arena.
    ///
    /// Node ids taken before a collapse are invalid afterwards.
    pub fn collapse(&mut self, id: NodeId) {
        let node = &mut self.nodes[id];
        if !node.expanded {
            return;
        }
        node.expanded = false;
        node.loaded = false;
        node.children.clear();
        self.compact();
        self.flatten();
    }

    /// Rebuild the arena from the nodes still reachable from the top level.
    fn compact(&mut self) {
        let mut nodes = Vec::with_capacity(self.nodes.len());
        let top: Vec<NodeId> = self
            .top
            .iter()
            .map(|&id| self.relocate(id, None, &mut nodes))
            .collect();
        self.nodes = nodes;
        self.top = top;
    }

    fn relocate(&self, id: NodeId, parent: Option<NodeId>, out: &mut Vec<Node>) -> NodeId {
        let new_id = out.len();
        out.push(Node {
            parent,
            children: Vec::new(),
            ..self.nodes[id].clone()
        });
        let children = self.nodes[id]
            .children
            .iter()
            .map(|&child| self.relocate(child, Some(new_id), out))
            .collect();
        out[new_id].children = children;
        new_id
    }

    /// Expanded directory paths in display order, so parents come first.
    pub fn expanded_paths(&self) -> Vec<PathBuf> {
        self.rows
            .iter()
            .map(|row| &self.nodes[row.node])
            .filter(|n| n.expanded)
            .map(|n| n.entry.path.clone())
            .collect()
    }

    /// Whether `dir` is the root or a loaded, expanded node.
    pub fn shows_directory(&self, dir: &Path) -> bool {
        dir == self.root
            || self.rows.iter().any(|row| {
                let node = &self.nodes[row.node];
                node.expanded && node.loaded && node.entry.path == dir
            })
    }

    /// For each ancestor of the node at row `index`, outermost first, whether
    /// that ancestor is the last of its siblings.
    pub fn ancestor_last_flags(&self, index: usize) -> Vec<bool> {
        let mut flags = Vec::new();
        let Some(row) = self.rows.get(index) else {
            return flags;
        };
        let mut current = row.node;
        while let Some(parent) = self.nodes[current].parent {
            flags.push(self.is_last_child(parent));
            current = parent;
        }
        flags.reverse();
        flags
    }

    fn is_last_child(&self, id: NodeId) -> bool {
        let siblings = match self.nodes[id].parent {
            Some(p) => &self.nodes[p].children,
            None => &self.top,
        };
        siblings.last() == Some(&id)
    }

    fn find_node(&self, path: &Path) -> Option<NodeId> {
        self.find_row(path).map(|i| self.rows[i].node)
    }

    fn attach(&mut self, parent: Option<NodeId>, depth: usize, entries: Vec<Entry>) -> Vec<NodeId> {
        entries
            .into_iter()
            .map(|entry| {
                self.nodes.push(Node {
                    entry,
                    parent,
                    children: Vec::new(),
                    depth,
                    expanded: false,
                    loaded: false,
                });
                self.nodes.len() - 1
            })
            .collect()
    }

    fn flatten(&mut self) {
        let mut rows = Vec::with_capacity(self.nodes.len());
        Self::flatten_level(&self.nodes, &self.top, &mut rows);
        self.rows = rows;
    }

    fn flatten_level(nodes: &[Node], level: &[NodeId], rows: &mut Vec<Row>) {
        for (i, &id) in level.iter().enumerate() {
            let node = &nodes[id];
            rows.push(Row {
                node: id,
                depth: node.depth,
                is_last_sibling: i + 1 == level.len(),
            });
            if node.expanded {
                Self::flatten_level(nodes, &node.children, rows);
            }
        }
    }
}
