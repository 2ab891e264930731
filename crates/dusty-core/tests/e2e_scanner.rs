/// End-to-end scanner integration tests.
///
/// These tests exercise the real walker and the background
/// `start_scan` thread against a real temporary filesystem, verifying that the
/// scanner enumerates files and directories, accumulates sizes, keeps the
/// size invariant, and reports progress through the mailbox.
use dusty_core::model::{FileTree, NodeIndex};
use dusty_core::scanner::{
    scan_path, start_scan, ProgressReporter, ProgressSlot, ScanHandle, ScanOutcome,
};
use dusty_core::ScanError;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;

// ── Helpers ──────────────────────────────────────────────────────────────────

/// Create a reproducible directory tree for scanner tests:
///
/// ```text
/// root/
///   alpha/
///     a.txt   (100 bytes)
///     b.rs    (200 bytes)
///   beta/
///     c.png   (300 bytes)
///   d.zip     (400 bytes)
/// ```
///
/// Total file bytes: 1 000.
fn build_test_tree(root: &Path) {
    let alpha = root.join("alpha");
    let beta = root.join("beta");
    fs::create_dir_all(&alpha).unwrap();
    fs::create_dir_all(&beta).unwrap();

    write_bytes(&alpha.join("a.txt"), 100);
    write_bytes(&alpha.join("b.rs"), 200);
    write_bytes(&beta.join("c.png"), 300);
    write_bytes(&root.join("d.zip"), 400);
}

fn write_bytes(path: &Path, n: usize) {
    let mut f = fs::File::create(path).unwrap();
    f.write_all(&vec![0u8; n]).unwrap();
}

/// Wait for the one-shot completion signal (or panic after a generous timeout).
fn wait_for_completion(handle: &ScanHandle) -> ScanOutcome {
    let deadline = std::time::Instant::now() + Duration::from_secs(30);
    loop {
        assert!(
            std::time::Instant::now() < deadline,
            "scanner did not complete within 30 seconds"
        );
        if let Some(outcome) = handle.try_complete() {
            return outcome;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
}

/// Every reachable directory's size equals the sum of its children.
fn assert_sizes_consistent(tree: &FileTree) {
    let mut stack = vec![tree.root()];
    while let Some(idx) = stack.pop() {
        let node = tree.node(idx);
        if node.is_dir {
            let sum: u64 = node.children.iter().map(|c| tree.node(*c).size).sum();
            assert_eq!(node.size, sum, "size mismatch at {}", tree.full_path(idx).display());
            stack.extend(node.children.iter().copied());
        } else {
            assert!(node.children.is_empty(), "file with children");
        }
    }
}

fn child_named(tree: &FileTree, dir: NodeIndex, name: &str) -> NodeIndex {
    tree.children(dir)
        .iter()
        .copied()
        .find(|c| tree.node(*c).name == name)
        .unwrap_or_else(|| panic!("no child named {name}"))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

/// The scanner must visit all files and directories and count each once.
#[test]
fn scan_counts_files_and_dirs_exactly() {
    let tmp = TempDir::new().expect("failed to create temp dir");
    build_test_tree(tmp.path());

    let slot = ProgressSlot::new();
    let result = scan_path(tmp.path(), &slot).expect("scan must succeed");

    assert_eq!(result.stats.files, 4);
    // alpha, beta, plus the root itself.
    assert_eq!(result.stats.dirs, 3);
    assert_eq!(result.stats.total_size, 1_000);
    assert_eq!(result.tree.node(result.tree.root()).size, 1_000);
    // 1 root + 2 dirs + 4 files.
    assert_eq!(result.tree.len(), 7);
    assert_sizes_consistent(&result.tree);
}

/// Children are attached largest-first.
#[test]
fn scan_sorts_children_by_size_descending() {
    let tmp = TempDir::new().expect("failed to create temp dir");
    build_test_tree(tmp.path());

    let result = scan_path(tmp.path(), &ProgressSlot::new()).unwrap();
    let tree = &result.tree;
    let names: Vec<&str> = tree
        .children(tree.root())
        .iter()
        .map(|c| tree.node(*c).name.as_str())
        .collect();
    // d.zip 400, alpha 300, beta 300 (stable between the equal pair is not
    // guaranteed by directory listing order, so only check the sizes).
    assert_eq!(names[0], "d.zip");
    let sizes: Vec<u64> = tree
        .children(tree.root())
        .iter()
        .map(|c| tree.node(*c).size)
        .collect();
    assert_eq!(sizes, vec![400, 300, 300]);

    let alpha = child_named(tree, tree.root(), "alpha");
    let alpha_names: Vec<&str> = tree
        .children(alpha)
        .iter()
        .map(|c| tree.node(*c).name.as_str())
        .collect();
    assert_eq!(alpha_names, vec!["b.rs", "a.txt"]);
}

/// The worked scenario: a.txt (500) next to sub/b.txt (1500).
#[test]
fn scan_small_scenario() {
    let tmp = TempDir::new().expect("failed to create temp dir");
    write_bytes(&tmp.path().join("a.txt"), 500);
    fs::create_dir_all(tmp.path().join("sub")).unwrap();
    write_bytes(&tmp.path().join("sub").join("b.txt"), 1_500);

    let result = scan_path(tmp.path(), &ProgressSlot::new()).unwrap();
    let tree = &result.tree;
    let root = tree.root();
    assert_eq!(tree.node(root).size, 2_000);
    assert_eq!(tree.children(root).len(), 2);

    let sub = child_named(tree, root, "sub");
    assert_eq!(tree.node(sub).size, 1_500);
    assert_eq!(tree.children(root)[0], sub, "sub sorts before a.txt");
}

/// An empty directory scans to a single root node of size 0.
#[test]
fn scan_empty_directory() {
    let tmp = TempDir::new().expect("failed to create temp dir");

    let result = scan_path(tmp.path(), &ProgressSlot::new()).unwrap();
    assert_eq!(result.tree.len(), 1);
    assert_eq!(result.stats.files, 0);
    assert_eq!(result.stats.dirs, 1);
    assert_eq!(result.stats.total_size, 0);
}

/// Scanning a file yields a one-node tree holding the file's length.
#[test]
fn scan_file_root() {
    let tmp = TempDir::new().expect("failed to create temp dir");
    let file = tmp.path().join("lonely.bin");
    write_bytes(&file, 321);

    let result = scan_path(&file, &ProgressSlot::new()).unwrap();
    let root = result.tree.root();
    assert!(!result.tree.node(root).is_dir);
    assert_eq!(result.tree.node(root).size, 321);
    assert_eq!(result.stats.files, 1);
    assert_eq!(result.stats.dirs, 0);
}

/// A missing root is the only fatal failure.
#[test]
fn scan_missing_root_is_fatal() {
    let tmp = TempDir::new().expect("failed to create temp dir");
    let missing = tmp.path().join("does-not-exist");

    let err = scan_path(&missing, &ProgressSlot::new()).unwrap_err();
    assert!(matches!(err, ScanError::RootInaccessible { .. }));
}

/// An unreadable subdirectory is kept with an error and size 0, and the rest
/// of the scan continues.
#[cfg(unix)]
#[test]
fn scan_unreadable_directory_is_partial() {
    use std::os::unix::fs::PermissionsExt;

    let tmp = TempDir::new().expect("failed to create temp dir");
    build_test_tree(tmp.path());
    let locked = tmp.path().join("locked");
    fs::create_dir_all(&locked).unwrap();
    write_bytes(&locked.join("hidden.bin"), 5_000);
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Running as root bypasses permission bits; nothing to observe then.
    if fs::read_dir(&locked).is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let result = scan_path(tmp.path(), &ProgressSlot::new()).unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    let tree = &result.tree;
    let node = tree.node(child_named(tree, tree.root(), "locked"));
    assert!(node.scan_error.is_some());
    assert_eq!(node.size, 0);
    assert!(node.children.is_empty());
    assert_eq!(result.stats.total_size, 1_000);
    assert_sizes_consistent(tree);
}

/// The scanner leaves a final snapshot in the mailbox that matches the result.
#[test]
fn scan_publishes_final_snapshot() {
    let tmp = TempDir::new().expect("failed to create temp dir");
    for i in 0..8 {
        write_bytes(&tmp.path().join(format!("file{i}.bin")), 100 * (i + 1));
    }

    let slot = ProgressSlot::new();
    let result = scan_path(tmp.path(), &slot).unwrap();
    let snapshot = slot.take().expect("final snapshot must be pending");

    assert_eq!(snapshot.files_scanned, result.stats.files);
    assert_eq!(snapshot.dirs_scanned, result.stats.dirs);
    assert_eq!(snapshot.total_size, result.stats.total_size);
    assert_eq!(snapshot.largest.len(), 5);
    assert_eq!(snapshot.largest[0].name, "file7.bin");
    assert_eq!(snapshot.largest[0].size, 800);
}

/// The background scan delivers the finished tree exactly once.
#[test]
fn background_scan_completes() {
    let tmp = TempDir::new().expect("failed to create temp dir");
    build_test_tree(tmp.path());

    let handle = start_scan(tmp.path().to_path_buf()).expect("spawn");
    let result = wait_for_completion(&handle).expect("scan must succeed");
    assert_eq!(result.stats.total_size, 1_000);
    assert_sizes_consistent(&result.tree);
}

/// The background scan reports a missing root through the completion channel.
#[test]
fn background_scan_reports_fatal_error() {
    let tmp = TempDir::new().expect("failed to create temp dir");
    let handle = start_scan(tmp.path().join("nope")).expect("spawn");
    let outcome = wait_for_completion(&handle);
    assert!(matches!(outcome, Err(ScanError::RootInaccessible { .. })));
}

/// A very deep chain of directories is walked without exhausting the scan
/// thread's stack.
#[test]
fn background_scan_survives_deep_tree() {
    const DEPTH: usize = 1_900;

    let tmp = TempDir::new().expect("failed to create temp dir");
    let mut dir = tmp.path().to_path_buf();
    for _ in 0..DEPTH {
        dir.push("d");
        fs::create_dir(&dir).unwrap();
    }
    write_bytes(&dir.join("leaf.bin"), 42);

    let handle = start_scan(tmp.path().to_path_buf()).expect("spawn");
    let result = wait_for_completion(&handle).expect("scan must succeed");
    assert_eq!(result.stats.dirs, DEPTH as u64 + 1);
    assert_eq!(result.stats.files, 1);
    assert_eq!(result.stats.total_size, 42);
    assert_sizes_consistent(&result.tree);

    let mut cursor = result.tree.root();
    for _ in 0..DEPTH {
        cursor = child_named(&result.tree, cursor, "d");
        assert_eq!(result.tree.node(cursor).size, 42);
    }
}

/// A root with many direct children scans completely and the preview still
/// carries only the five largest.
#[test]
fn scan_wide_root() {
    const WIDTH: usize = 20_000;

    let tmp = TempDir::new().expect("failed to create temp dir");
    for i in 0..WIDTH {
        fs::File::create(tmp.path().join(format!("empty{i:05}"))).unwrap();
    }
    for (name, n) in [("s1", 10), ("s2", 20), ("s3", 30), ("s4", 40), ("s5", 50), ("s6", 60)] {
        write_bytes(&tmp.path().join(name), n);
    }

    let slot = ProgressSlot::new();
    let result = scan_path(tmp.path(), &slot).unwrap();
    assert_eq!(result.stats.files, WIDTH as u64 + 6);
    assert_eq!(result.stats.total_size, 210);
    assert_eq!(result.tree.children(result.tree.root()).len(), WIDTH + 6);

    let snapshot = slot.take().expect("final snapshot must be pending");
    let preview: Vec<(&str, u64)> = snapshot
        .largest
        .iter()
        .map(|e| (e.name.as_str(), e.size))
        .collect();
    assert_eq!(
        preview,
        vec![("s6", 60), ("s5", 50), ("s4", 40), ("s3", 30), ("s2", 20)]
    );
}

/// The reporter republishes the final snapshot of a finished scan on its
/// first due tick.
#[test]
fn reporter_republishes_final_snapshot() {
    let tmp = TempDir::new().expect("failed to create temp dir");
    build_test_tree(tmp.path());

    let slot = ProgressSlot::new();
    let start = std::time::Instant::now();
    let mut reporter = ProgressReporter::starting_at(Duration::ZERO, start);
    assert!(!reporter.poll(start, &slot), "nothing published yet");

    let result = scan_path(tmp.path(), &slot).unwrap();
    assert!(reporter.poll(start, &slot));
    let progress = reporter.latest().expect("snapshot after tick");
    assert_eq!(progress.files_scanned, result.stats.files);
    assert_eq!(progress.dirs_scanned, result.stats.dirs);
    assert_eq!(progress.total_size, 1_000);
    assert_eq!(progress.largest[0].name, "d.zip");
    assert!(progress.largest[1].is_dir);
}

/// A symlink to a directory is walked as a directory and its contents count
/// toward the total.
#[cfg(unix)]
#[test]
fn scan_follows_directory_symlink() {
    let tmp = TempDir::new().expect("failed to create temp dir");
    let real = tmp.path().join("real");
    fs::create_dir_all(&real).unwrap();
    write_bytes(&real.join("x.bin"), 700);
    std::os::unix::fs::symlink(&real, tmp.path().join("link")).unwrap();

    let result = scan_path(tmp.path(), &ProgressSlot::new()).unwrap();
    let tree = &result.tree;
    let link = tree.node(child_named(tree, tree.root(), "link"));
    assert!(link.is_dir);
    assert_eq!(link.size, 700);
    assert_eq!(result.stats.dirs, 3);
    assert_eq!(result.stats.files, 2);
    assert_eq!(result.stats.total_size, 1_400);
    assert_sizes_consistent(tree);
}

/// A symlink pointing back at an ancestor is skipped instead of walked
/// forever.
#[cfg(unix)]
#[test]
fn scan_skips_symlink_loop() {
    let tmp = TempDir::new().expect("failed to create temp dir");
    build_test_tree(tmp.path());
    std::os::unix::fs::symlink(tmp.path(), tmp.path().join("alpha").join("back")).unwrap();

    let result = scan_path(tmp.path(), &ProgressSlot::new()).unwrap();
    let tree = &result.tree;
    let alpha = child_named(tree, tree.root(), "alpha");
    assert!(tree
        .children(alpha)
        .iter()
        .all(|c| tree.node(*c).name != "back"));
    assert_eq!(result.stats.total_size, 1_000);
    assert_sizes_consistent(tree);
}
