/// A single node in the arena-allocated file tree.
///
/// Nodes are stored in a flat `Vec<FileNode>`. Parent-child relationships use
/// indices rather than pointers, so the upward `parent` link never forms an
/// ownership cycle with the downward `children` list.
use compact_str::CompactString;

/// Lightweight index into the arena `Vec<FileNode>`.
///
/// Uses `u32` to keep nodes small; supports up to ~4 billion nodes,
/// which is more than enough for any real filesystem.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(pub u32);

impl NodeIndex {
    /// Create a new `NodeIndex` from a `usize`, panicking if it exceeds `u32::MAX`.
    #[inline]
    pub fn new(index: usize) -> Self {
        debug_assert!(index <= u32::MAX as usize, "NodeIndex overflow");
        Self(index as u32)
    }

    /// Return the index as a `usize` for Vec indexing.
    #[inline]
    pub fn idx(self) -> usize {
        self.0 as usize
    }
}

/// A single file or directory in the tree.
#[derive(Debug, Clone)]
pub struct FileNode {
    /// File or directory name only (NOT the full path), except for the scan
    /// root whose name is the scan path exactly as given.
    /// Full paths are reconstructed on demand by walking up via `parent`.
    pub name: CompactString,

    /// Logical size in bytes. For directories this is the sum of the
    /// current children's sizes.
    pub size: u64,

    /// `true` if this node represents a directory. Fixed at creation.
    pub is_dir: bool,

    /// Index of the parent node. `None` for the scan root and for nodes that
    /// have been detached by a deletion.
    pub parent: Option<NodeIndex>,

    /// Owned children in display order. Always empty for files.
    pub children: Vec<NodeIndex>,

    /// Set when this directory's listing could not be read. The node stays
    /// in the tree (size 0, no children) so users can see where it happened.
    pub scan_error: Option<String>,
}

impl FileNode {
    /// Create a new file node with the given name and size.
    pub fn new_file(name: CompactString, size: u64, parent: Option<NodeIndex>) -> Self {
        Self {
            name,
            size,
            is_dir: false,
            parent,
            children: Vec::new(),
            scan_error: None,
        }
    }

    /// Create a new, empty directory node.
    pub fn new_dir(name: CompactString, parent: Option<NodeIndex>) -> Self {
        Self {
            name,
            size: 0,
            is_dir: true,
            parent,
            children: Vec::new(),
            scan_error: None,
        }
    }

    /// `true` if this is a directory with something inside it.
    #[inline]
    pub fn has_children(&self) -> bool {
        self.is_dir && !self.children.is_empty()
    }
}
