//! Integration tests for tree building determinism

use super::test_utils::{make_image, write_file};
use filetime::{set_file_mtime, FileTime};
use imgdiff::compare;
use imgdiff::tree::{build_tree, TreeBuilder};
use std::fs;
use tempfile::TempDir;

/// Test that the same directory produces the same tree on every build
#[test]
fn test_same_directory_same_tree() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("image");
    make_image(
        &root,
        &[
            ("file1.txt", "content1"),
            ("file2.txt", "content2"),
            ("dir1/file3.txt", "content3"),
        ],
    );

    let tree1 = build_tree(&root).unwrap();
    let tree2 = build_tree(&root).unwrap();

    let entries1: Vec<_> = tree1.entries().cloned().collect();
    let entries2: Vec<_> = tree2.entries().cloned().collect();
    assert_eq!(entries1, entries2);
}

/// Test that a tree compared with itself is all identical
#[test]
fn test_self_comparison_all_identical() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("image");
    make_image(
        &root,
        &[
            ("bin/sh", "shell"),
            ("etc/passwd", "root:x:0:0"),
            ("usr/lib/libc.so.6", "elf"),
        ],
    );

    let result = compare(&build_tree(&root).unwrap(), &build_tree(&root).unwrap());

    assert_eq!(result.identical, vec!["bin/sh", "etc/passwd", "usr/lib/libc.so.6"]);
    assert!(result.different.is_empty());
    assert!(result.only_in_left.is_empty());
    assert!(result.only_in_right.is_empty());
}

/// Test that modification time does not influence the digest
#[test]
fn test_mtime_change_still_identical() {
    let temp_dir = TempDir::new().unwrap();
    let left = temp_dir.path().join("a");
    let right = temp_dir.path().join("b");
    make_image(&left, &[("f.txt", "hello")]);
    make_image(&right, &[("f.txt", "hello")]);

    set_file_mtime(left.join("f.txt"), FileTime::from_unix_time(0, 0)).unwrap();
    set_file_mtime(right.join("f.txt"), FileTime::from_unix_time(1_700_000_000, 0)).unwrap();

    let result = compare(&build_tree(&left).unwrap(), &build_tree(&right).unwrap());
    assert_eq!(result.identical, vec!["f.txt"]);
    assert!(result.is_match());
}

/// Test that creation order on disk does not change the tree
#[test]
fn test_creation_order_irrelevant() {
    let temp_dir = TempDir::new().unwrap();
    let left = temp_dir.path().join("a");
    let right = temp_dir.path().join("b");

    make_image(&left, &[("z", "1"), ("m/n", "2"), ("a", "3")]);
    make_image(&right, &[("a", "3"), ("m/n", "2"), ("z", "1")]);

    let result = compare(&build_tree(&left).unwrap(), &build_tree(&right).unwrap());
    assert_eq!(result.identical, vec!["a", "m/n", "z"]);
}

/// Test that empty directories contribute nothing
#[test]
fn test_empty_directories_ignored() {
    let temp_dir = TempDir::new().unwrap();
    let left = temp_dir.path().join("a");
    let right = temp_dir.path().join("b");
    make_image(&left, &[("f.txt", "x")]);
    make_image(&right, &[("f.txt", "x")]);
    fs::create_dir_all(right.join("var").join("empty")).unwrap();

    let result = compare(&build_tree(&left).unwrap(), &build_tree(&right).unwrap());
    assert!(result.is_match());
}

/// Test that chunk size has no effect on the outcome
#[test]
fn test_chunk_size_does_not_affect_classification() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("image");
    let big: String = "0123456789abcdef".repeat(10_000);
    fs::create_dir_all(&root).unwrap();
    write_file(&root, "big.bin", &big);

    let small_chunks = TreeBuilder::new(root.clone()).with_chunk_size(3).build().unwrap();
    let default_chunks = build_tree(&root).unwrap();

    assert_eq!(
        small_chunks.get("big.bin").unwrap().digest,
        default_chunks.get("big.bin").unwrap().digest
    );
}

#[cfg(unix)]
#[test]
fn test_unreadable_file_aborts_build() {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("image");
    make_image(&root, &[("secret", "x")]);
    let secret = root.join("secret");
    fs::set_permissions(&secret, fs::Permissions::from_mode(0o000)).unwrap();

    // Privileged users can still read the file; only assert when denied.
    if fs::File::open(&secret).is_err() {
        assert!(build_tree(&root).is_err());
    }

    fs::set_permissions(&secret, fs::Permissions::from_mode(0o644)).unwrap();
}
