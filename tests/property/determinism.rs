//! Property-based tests for determinism guarantees

use imgdiff::compare;
use imgdiff::tree::build_tree;
use imgdiff::tree::hasher::{compute_stream_digest, DEFAULT_CHUNK_SIZE};
use proptest::prelude::*;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Small file trees: relative path -> content
fn tree_strategy() -> impl Strategy<Value = BTreeMap<String, Vec<u8>>> {
    let segment = "[a-z]{1,6}";
    let path = prop::collection::vec(segment, 1..3).prop_map(|segs| segs.join("/"));
    prop::collection::btree_map(path, any::<Vec<u8>>(), 0..8).prop_filter(
        "a path may not be both a file and a directory",
        |files| {
            files.keys().all(|k| {
                !files
                    .keys()
                    .any(|other| other != k && other.starts_with(&format!("{}/", k)))
            })
        },
    )
}

fn materialize(root: &Path, files: &BTreeMap<String, Vec<u8>>) {
    fs::create_dir_all(root).unwrap();
    for (rel, content) in files {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }
}

/// Test that digests are independent of the chunk size used to read them
#[test]
fn test_digest_chunk_size_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&(any::<Vec<u8>>(), 1usize..512), |(content, chunk)| {
            let chunked = compute_stream_digest(&content[..], chunk).unwrap();
            let whole = compute_stream_digest(&content[..], DEFAULT_CHUNK_SIZE).unwrap();
            prop_assert_eq!(chunked, whole);
            Ok(())
        })
        .unwrap();
}

/// Test that comparison results match a straightforward map-based model
#[test]
fn test_compare_matches_model() {
    let mut config = ProptestConfig::default();
    config.cases = 32;
    let mut runner = proptest::test_runner::TestRunner::new(config);

    runner
        .run(&(tree_strategy(), tree_strategy()), |(left, right)| {
            let temp_dir = TempDir::new().unwrap();
            let left_root = temp_dir.path().join("a");
            let right_root = temp_dir.path().join("b");
            materialize(&left_root, &left);
            materialize(&right_root, &right);

            let left_tree = build_tree(&left_root).unwrap();
            let right_tree = build_tree(&right_root).unwrap();
            let result = compare(&left_tree, &right_tree);

            let mut identical = Vec::new();
            let mut different = Vec::new();
            let mut only_in_left = Vec::new();
            for (path, content) in &left {
                match right.get(path) {
                    Some(other) if other == content => identical.push(path.clone()),
                    Some(_) => different.push(path.clone()),
                    None => only_in_left.push(path.clone()),
                }
            }
            let only_in_right: Vec<String> =
                right.keys().filter(|k| !left.contains_key(*k)).cloned().collect();

            prop_assert_eq!(result.identical, identical);
            prop_assert_eq!(result.different, different);
            prop_assert_eq!(result.only_in_left, only_in_left);
            prop_assert_eq!(result.only_in_right, only_in_right);
            Ok(())
        })
        .unwrap();
}

/// Test that any tree compared with itself is a full match
#[test]
fn test_self_comparison_property() {
    let mut config = ProptestConfig::default();
    config.cases = 32;
    let mut runner = proptest::test_runner::TestRunner::new(config);

    runner
        .run(&tree_strategy(), |files| {
            let temp_dir = TempDir::new().unwrap();
            let root = temp_dir.path().join("image");
            materialize(&root, &files);

            let tree = build_tree(&root).unwrap();
            let result = compare(&tree, &tree);
            prop_assert!(result.is_match());
            prop_assert_eq!(result.identical.len(), files.len());
            Ok(())
        })
        .unwrap();
}
