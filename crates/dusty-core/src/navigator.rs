/// Navigator — the browsing state over a finished scan.
///
/// Holds the tree, the directory currently shown, the cursor within it, and
/// the active sort order. All operations act directly on the arena; there is
/// no separate view model to keep in sync.
use crate::error::DeleteError;
use crate::model::{FileTree, NodeIndex, SortMode};
use compact_str::CompactString;
use std::path::PathBuf;
use tracing::debug;

/// One row of the current directory listing.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryView {
    pub index: NodeIndex,
    pub name: CompactString,
    pub size: u64,
    /// Share of the current directory's size, 0.0–100.0.
    pub percent: f64,
    pub is_dir: bool,
    /// The directory could not be listed during the scan.
    pub has_error: bool,
}

/// Everything the presentation layer needs to draw the browser.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectoryView {
    pub path: PathBuf,
    pub size: u64,
    pub sort_mode: SortMode,
    pub entries: Vec<EntryView>,
    pub cursor: usize,
}

/// Cursor and position state over a [`FileTree`].
#[derive(Debug, Clone)]
pub struct Navigator {
    tree: FileTree,
    current: NodeIndex,
    cursor: usize,
    sort_mode: SortMode,
}

impl Navigator {
    /// Start browsing at the root. The scanner leaves every directory sorted
    /// largest-first, which is the initial mode.
    pub fn new(tree: FileTree) -> Self {
        let current = tree.root();
        Self {
            tree,
            current,
            cursor: 0,
            sort_mode: SortMode::BySizeDesc,
        }
    }

    pub fn tree(&self) -> &FileTree {
        &self.tree
    }

    pub fn root(&self) -> NodeIndex {
        self.tree.root()
    }

    pub fn current(&self) -> NodeIndex {
        self.current
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn sort_mode(&self) -> SortMode {
        self.sort_mode
    }

    /// The child under the cursor, if the current directory has any.
    pub fn selected(&self) -> Option<NodeIndex> {
        self.tree.children(self.current).get(self.cursor).copied()
    }

    /// Move the cursor by `delta`, clamped to the listing. No-op when empty.
    pub fn move_cursor(&mut self, delta: isize) {
        let len = self.tree.children(self.current).len();
        if len == 0 {
            return;
        }
        let target = self.cursor as isize + delta;
        self.cursor = target.clamp(0, len as isize - 1) as usize;
    }

    /// Descend into the selected directory.
    ///
    /// Files and directories with no children are not enterable. Returns
    /// whether the current directory changed.
    pub fn enter(&mut self) -> bool {
        let Some(selected) = self.selected() else {
            return false;
        };
        if !self.tree.node(selected).has_children() {
            return false;
        }
        self.current = selected;
        self.cursor = 0;
        true
    }

    /// Ascend to the parent, placing the cursor on the directory just left.
    ///
    /// No-op at the root. Returns whether the current directory changed.
    pub fn exit(&mut self) -> bool {
        let Some(parent) = self.tree.node(self.current).parent else {
            return false;
        };
        self.cursor = self
            .tree
            .children(parent)
            .iter()
            .position(|&c| c == self.current)
            .unwrap_or(0);
        self.current = parent;
        true
    }

    /// Flip the sort order and re-sort the whole tree, not just the current
    /// listing. The cursor returns to the top.
    pub fn toggle_sort(&mut self) {
        self.sort_mode = self.sort_mode.toggled();
        self.tree.sort_all(self.sort_mode);
        self.cursor = 0;
        debug!("Sort mode is now {}", self.sort_mode);
    }

    /// Jump back to the scan root.
    pub fn go_to_root(&mut self) {
        self.current = self.tree.root();
        self.cursor = 0;
    }

    /// On-disk location of `target`, checked for deletability.
    pub fn deletion_path(&self, target: NodeIndex) -> Result<PathBuf, DeleteError> {
        if target == self.tree.root() {
            return Err(DeleteError::RefuseRoot);
        }
        Ok(self.tree.full_path(target))
    }

    /// Reflect a successful on-disk removal of `target` in the tree.
    ///
    /// Detaches the node by identity, recomputes every ancestor's size, and
    /// clamps the cursor. Returns the number of bytes freed, or `None` if the
    /// node was the root or was no longer attached.
    pub fn apply_deletion(&mut self, target: NodeIndex) -> Option<u64> {
        let freed = self.tree.node(target).size;
        let parent = self.tree.detach(target)?;
        self.tree.recompute_ancestors(parent);

        if !self.tree.is_attached(self.current) {
            self.go_to_root();
        }
        let len = self.tree.children(self.current).len();
        if self.cursor >= len {
            self.cursor = len.saturating_sub(1);
        }
        Some(freed)
    }

    /// Snapshot of the current directory for rendering.
    pub fn view(&self) -> DirectoryView {
        let dir = self.tree.node(self.current);
        let entries = dir
            .children
            .iter()
            .map(|&idx| {
                let node = self.tree.node(idx);
                let percent = if dir.size > 0 {
                    node.size as f64 / dir.size as f64 * 100.0
                } else {
                    0.0
                };
                EntryView {
                    index: idx,
                    name: node.name.clone(),
                    size: node.size,
                    percent,
                    is_dir: node.is_dir,
                    has_error: node.scan_error.is_some(),
                }
            })
            .collect();

        DirectoryView {
            path: self.tree.full_path(self.current),
            size: dir.size,
            sort_mode: self.sort_mode,
            entries,
            cursor: self.cursor,
        }
    }
}
