/// Directory walker.
///
/// Folds a depth-first [`walkdir`] traversal into the arena. Directories are
/// yielded before their contents, so a stack of open directories is all the
/// state needed: an entry at depth `d` closes every open directory at depth
/// `d` or deeper, then attaches to the one left on top. Closing a directory
/// sums its children and sorts them largest-first.
///
/// Failure policy is best-effort: an entry that cannot be stat'ed is skipped,
/// a directory that cannot be listed is kept with `scan_error` set, and only a
/// failing stat of the root aborts the scan.
use crate::error::ScanError;
use crate::model::{FileNode, FileTree, NodeIndex, SortMode};
use crate::scanner::progress::{PreviewEntry, ProgressSlot, ScanSnapshot, PREVIEW_LEN};
use compact_str::CompactString;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info};
use walkdir::{DirEntry, WalkDir};

/// Running totals for a finished scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Files visited (symlinks count as whatever they point at).
    pub files: u64,
    /// Directories visited, the root included.
    pub dirs: u64,
    /// Size of the root.
    pub total_size: u64,
    pub duration: Duration,
}

/// A completed scan: the finished tree plus its counters.
#[derive(Debug, Clone)]
pub struct ScanResult {
    pub tree: FileTree,
    pub stats: ScanStats,
}

/// A directory whose contents are still being yielded.
struct OpenDir {
    index: NodeIndex,
    depth: usize,
    path: PathBuf,
}

/// The largest completed top-level entries, largest first, never more than
/// [`PREVIEW_LEN`]. Ties keep the entry that finished first.
#[derive(Debug, Default)]
struct TopEntries {
    entries: Vec<PreviewEntry>,
}

impl TopEntries {
    fn offer(&mut self, entry: PreviewEntry) {
        let full = self.entries.len() >= PREVIEW_LEN;
        if full && self.entries.last().is_some_and(|last| last.size >= entry.size) {
            return;
        }
        let pos = self
            .entries
            .iter()
            .position(|e| e.size < entry.size)
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, entry);
        self.entries.truncate(PREVIEW_LEN);
    }
}

/// Everything the fold carries between entries.
struct ScanAccumulator<'a> {
    tree: FileTree,
    open: Vec<OpenDir>,
    top: TopEntries,
    files: u64,
    dirs: u64,
    progress: &'a ProgressSlot,
}

impl<'a> ScanAccumulator<'a> {
    fn new(tree: FileTree, progress: &'a ProgressSlot) -> Self {
        Self {
            tree,
            open: Vec::new(),
            top: TopEntries::default(),
            files: 0,
            dirs: 0,
            progress,
        }
    }

    /// Publish the current counters and top-level preview. Lossy.
    fn publish(&self) {
        self.progress.publish(ScanSnapshot {
            files_scanned: self.files,
            dirs_scanned: self.dirs,
            total_size: self.tree.node(self.tree.root()).size,
            largest: self.top.entries.clone(),
        });
    }

    /// Attach one yielded entry below the root.
    fn add_entry(&mut self, entry: DirEntry) {
        let depth = entry.depth();
        self.close_to(depth);
        let Some(parent) = self.open.last().map(|d| d.index) else {
            return;
        };
        let name = CompactString::new(entry.file_name().to_string_lossy());

        if entry.file_type().is_dir() {
            self.dirs += 1;
            let idx = self.tree.add_node(FileNode::new_dir(name, Some(parent)));
            self.tree.add_child(parent, idx);
            self.open.push(OpenDir {
                index: idx,
                depth,
                path: entry.into_path(),
            });
            return;
        }

        let size = match entry.metadata() {
            Ok(meta) => meta.len(),
            Err(err) => {
                debug!("Skipping {}: {err}", entry.path().display());
                return;
            }
        };
        self.files += 1;
        let idx = self
            .tree
            .add_node(FileNode::new_file(name, size, Some(parent)));
        self.tree.add_child(parent, idx);
        if depth == 1 {
            self.finish_top_level(idx);
        }
    }

    /// Attribute a walk error: a directory that could not be listed keeps
    /// the message, anything else is skipped.
    fn record_error(&mut self, err: walkdir::Error) {
        let Some(path) = err.path() else {
            debug!("Skipping entry: {err}");
            return;
        };
        if let Some(ancestor) = err.loop_ancestor() {
            debug!(
                "Skipping symlink loop {} -> {}",
                path.display(),
                ancestor.display()
            );
            return;
        }

        match self.open.iter().rev().find(|d| d.path.as_path() == path) {
            Some(dir) => {
                debug!("Cannot list {}: {err}", path.display());
                let message = err
                    .io_error()
                    .map(ToString::to_string)
                    .unwrap_or_else(|| err.to_string());
                self.tree.nodes[dir.index.idx()].scan_error = Some(message);
            }
            None => debug!("Skipping {}: {err}", path.display()),
        }
    }

    /// Close every open directory at `depth` or deeper, innermost first.
    fn close_to(&mut self, depth: usize) {
        while self.open.last().is_some_and(|d| d.depth >= depth) {
            let Some(dir) = self.open.pop() else {
                break;
            };
            let size: u64 = self
                .tree
                .children(dir.index)
                .iter()
                .map(|c| self.tree.node(*c).size)
                .sum();
            self.tree.nodes[dir.index.idx()].size = size;
            self.tree.sort_children(dir.index, SortMode::BySizeDesc);

            if dir.depth == 1 {
                self.finish_top_level(dir.index);
            }
        }
    }

    /// A direct child of the root is complete: fold it into the root's
    /// running size and the preview, then publish.
    fn finish_top_level(&mut self, idx: NodeIndex) {
        let node = self.tree.node(idx);
        let size = node.size;
        self.top.offer(PreviewEntry {
            name: node.name.clone(),
            size,
            is_dir: node.is_dir,
        });

        let root = self.tree.root();
        let root_size = &mut self.tree.nodes[root.idx()].size;
        *root_size = root_size.saturating_add(size);
        self.publish();
    }
}

/// Scan `root_path` synchronously, publishing progress into `progress`.
///
/// Returns an error only when the root itself cannot be stat'ed.
pub fn scan_path(root_path: &Path, progress: &ProgressSlot) -> Result<ScanResult, ScanError> {
    let start = Instant::now();
    info!("Starting scan of {}", root_path.display());

    let meta = fs::metadata(root_path).map_err(|source| ScanError::RootInaccessible {
        path: root_path.to_path_buf(),
        source,
    })?;

    let tree = FileTree::with_root(root_path, meta.is_dir(), meta.len());
    let mut acc = ScanAccumulator::new(tree, progress);
    let root = acc.tree.root();

    if meta.is_dir() {
        acc.dirs += 1;
        acc.open.push(OpenDir {
            index: root,
            depth: 0,
            path: root_path.to_path_buf(),
        });

        let walker = WalkDir::new(root_path)
            .follow_links(true)
            .sort_by(|a, b| a.file_name().cmp(b.file_name()));
        for entry in walker {
            match entry {
                Ok(entry) if entry.depth() == 0 => {}
                Ok(entry) => acc.add_entry(entry),
                Err(err) => acc.record_error(err),
            }
        }
        acc.close_to(0);
    } else {
        acc.files += 1;
    }
    acc.publish();

    let stats = ScanStats {
        files: acc.files,
        dirs: acc.dirs,
        total_size: acc.tree.node(root).size,
        duration: start.elapsed(),
    };
    info!(
        "Scan complete: {} files, {} dirs, {} bytes in {:?}",
        stats.files, stats.dirs, stats.total_size, stats.duration
    );

    Ok(ScanResult {
        tree: acc.tree,
        stats,
    })
}
