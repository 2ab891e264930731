/// Arena-backed file tree with upward size recomputation and whole-tree sorting.
///
/// All nodes live in a single `Vec<FileNode>`. Relationships between nodes
/// use `NodeIndex` (a thin `u32` wrapper) rather than heap pointers. The scan
/// root is always the first node in the arena.
use super::file_node::{FileNode, NodeIndex};
use compact_str::CompactString;
use std::fmt;
use std::path::{Path, PathBuf};

/// Ordering applied to every directory's children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    /// Largest first; equal sizes keep their previous relative order.
    #[default]
    BySizeDesc,
    /// Case-insensitive by name, A to Z.
    ByNameAsc,
}

impl SortMode {
    /// The other mode.
    pub fn toggled(self) -> Self {
        match self {
            Self::BySizeDesc => Self::ByNameAsc,
            Self::ByNameAsc => Self::BySizeDesc,
        }
    }

    /// Short label for status lines.
    pub fn label(self) -> &'static str {
        match self {
            Self::BySizeDesc => "size",
            Self::ByNameAsc => "name",
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The complete file tree produced by a scan.
#[derive(Debug, Clone)]
pub struct FileTree {
    /// Arena: every node ever created during the scan, including detached ones.
    pub nodes: Vec<FileNode>,

    /// The path the scan was started from.
    pub root_path: PathBuf,
}

impl FileTree {
    /// Create a tree holding only its root node.
    ///
    /// The root's name is the scan path exactly as given so that the title
    /// shows what the user typed.
    pub fn with_root(root_path: &Path, is_dir: bool, size: u64) -> Self {
        let name = CompactString::new(root_path.to_string_lossy());
        let root = if is_dir {
            FileNode::new_dir(name, None)
        } else {
            FileNode::new_file(name, size, None)
        };
        Self {
            nodes: vec![root],
            root_path: root_path.to_path_buf(),
        }
    }

    /// Index of the scan root.
    #[inline]
    pub fn root(&self) -> NodeIndex {
        NodeIndex(0)
    }

    /// Allocate a new node in the arena and return its index.
    pub fn add_node(&mut self, node: FileNode) -> NodeIndex {
        let idx = NodeIndex::new(self.nodes.len());
        self.nodes.push(node);
        idx
    }

    /// Attach `child` as the last child of `parent`.
    ///
    /// Does not touch sizes; the caller re-establishes the size invariant.
    pub fn add_child(&mut self, parent: NodeIndex, child: NodeIndex) {
        debug_assert!(self.nodes[parent.idx()].is_dir, "files cannot own children");
        self.nodes[child.idx()].parent = Some(parent);
        self.nodes[parent.idx()].children.push(child);
    }

    /// Remove `child` from its parent's children, matching by identity.
    ///
    /// Returns the former parent, or `None` if the node was already detached
    /// (or is the root).
    pub fn detach(&mut self, child: NodeIndex) -> Option<NodeIndex> {
        let parent = self.nodes[child.idx()].parent?;
        let siblings = &mut self.nodes[parent.idx()].children;
        let pos = siblings.iter().position(|&c| c == child)?;
        siblings.remove(pos);
        self.nodes[child.idx()].parent = None;
        Some(parent)
    }

    /// Recompute `size` as the sum of current children for `from` and every
    /// ancestor up to the root.
    pub fn recompute_ancestors(&mut self, from: NodeIndex) {
        let mut current = Some(from);
        while let Some(idx) = current {
            let node = &self.nodes[idx.idx()];
            if node.is_dir {
                let total: u64 = node
                    .children
                    .iter()
                    .map(|c| self.nodes[c.idx()].size)
                    .sum();
                self.nodes[idx.idx()].size = total;
            }
            current = self.nodes[idx.idx()].parent;
        }
    }

    /// Sort one directory's children. Both orders are stable.
    pub fn sort_children(&mut self, dir: NodeIndex, mode: SortMode) {
        let mut children = std::mem::take(&mut self.nodes[dir.idx()].children);
        match mode {
            SortMode::BySizeDesc => {
                children.sort_by(|a, b| self.nodes[b.idx()].size.cmp(&self.nodes[a.idx()].size));
            }
            SortMode::ByNameAsc => {
                children.sort_by_cached_key(|c| self.nodes[c.idx()].name.to_lowercase());
            }
        }
        self.nodes[dir.idx()].children = children;
    }

    /// Re-sort every reachable directory, starting at the root.
    ///
    /// Iterative (explicit stack) so that very deep trees cannot overflow the
    /// thread stack. O(total nodes · log children).
    pub fn sort_all(&mut self, mode: SortMode) {
        let mut stack = vec![self.root()];
        while let Some(dir) = stack.pop() {
            if !self.nodes[dir.idx()].is_dir {
                continue;
            }
            self.sort_children(dir, mode);
            stack.extend(
                self.nodes[dir.idx()]
                    .children
                    .iter()
                    .copied()
                    .filter(|c| self.nodes[c.idx()].is_dir),
            );
        }
    }

    /// `true` if `index` is still connected to the root.
    pub fn is_attached(&self, index: NodeIndex) -> bool {
        let mut current = index;
        loop {
            if current == self.root() {
                return true;
            }
            match self.nodes[current.idx()].parent {
                Some(p) => current = p,
                None => return false,
            }
        }
    }

    /// Reconstruct the full path for a node by walking up to the root.
    pub fn full_path(&self, index: NodeIndex) -> PathBuf {
        let mut segments = Vec::new();
        let mut current = index;
        while let Some(parent) = self.nodes[current.idx()].parent {
            segments.push(self.nodes[current.idx()].name.as_str());
            current = parent;
        }

        let mut path = self.root_path.clone();
        for segment in segments.into_iter().rev() {
            path.push(segment);
        }
        path
    }

    /// Direct children of a node, in display order.
    #[inline]
    pub fn children(&self, parent: NodeIndex) -> &[NodeIndex] {
        &self.nodes[parent.idx()].children
    }

    /// Get the node at the given index.
    #[inline]
    pub fn node(&self, index: NodeIndex) -> &FileNode {
        &self.nodes[index.idx()]
    }

    /// Total number of nodes in the arena (detached ones included).
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the arena contains no nodes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
