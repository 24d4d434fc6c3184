//! Integration tests for archive image inputs

use super::test_utils::{make_image, pack_tar_bz2, pack_tar_gz};
use imgdiff::cli::{RunContext, RunOutcome};
use imgdiff::config::ImgdiffConfig;
use imgdiff::image::{self, ImageKind};
use imgdiff::{build_tree, compare};
use tempfile::TempDir;

/// Test that a .tar.bz2 of a directory matches the directory itself
#[test]
fn test_bz2_archive_matches_its_source_directory() {
    let temp_dir = TempDir::new().unwrap();
    let src = temp_dir.path().join("rootfs");
    make_image(&src, &[("etc/hostname", "builder"), ("usr/bin/env", "#!"), ("README", "hi")]);
    let archive = temp_dir.path().join("rootfs.tar.bz2");
    pack_tar_bz2(&src, &archive);

    let image = image::resolve(&archive).unwrap();
    assert_eq!(image.kind(), ImageKind::TarBzip2);

    let result = compare(&build_tree(image.root()).unwrap(), &build_tree(&src).unwrap());
    assert!(result.is_match());
    assert_eq!(result.identical, vec!["README", "etc/hostname", "usr/bin/env"]);
}

/// Test that two archives with one differing file are reported
#[test]
fn test_two_archives_with_difference() {
    let temp_dir = TempDir::new().unwrap();
    let src1 = temp_dir.path().join("build1");
    let src2 = temp_dir.path().join("build2");
    make_image(&src1, &[("lib/libfoo.so", "v1"), ("etc/motd", "hi")]);
    make_image(&src2, &[("lib/libfoo.so", "v2"), ("etc/motd", "hi")]);
    let archive1 = temp_dir.path().join("build1.tar.bz2");
    let archive2 = temp_dir.path().join("build2.tar.gz");
    pack_tar_bz2(&src1, &archive1);
    pack_tar_gz(&src2, &archive2);

    let context = RunContext::new(ImgdiffConfig::default(), archive1, archive2);
    let report = context.compare_images().unwrap();

    assert!(!report.matched);
    assert_eq!(report.result.different, vec!["lib/libfoo.so"]);
    assert_eq!(report.result.identical, vec!["etc/motd"]);
}

/// Test that the extraction directory is removed once the image is dropped
#[test]
fn test_extraction_directory_removed_after_run() {
    let temp_dir = TempDir::new().unwrap();
    let src = temp_dir.path().join("rootfs");
    make_image(&src, &[("f.txt", "hello")]);
    let archive = temp_dir.path().join("rootfs.tar.bz2");
    pack_tar_bz2(&src, &archive);

    let extracted = {
        let image = image::resolve(&archive).unwrap();
        assert!(image.root().join("f.txt").is_file());
        image.root().to_path_buf()
    };
    assert!(!extracted.exists());
}

/// Test that a comparison against an unreadable input is rejected up front
#[test]
fn test_unrecognized_input_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let bogus = temp_dir.path().join("image.tar.bz2");
    std::fs::write(&bogus, "not an archive at all").unwrap();
    let dir = temp_dir.path().join("dir");
    make_image(&dir, &[("f", "x")]);

    let context = RunContext::new(ImgdiffConfig::default(), bogus, dir);
    let err = context.execute().unwrap_err();
    assert!(err.to_string().contains("Unsupported image"));
}

/// Test that an archive compared with itself matches
#[test]
fn test_archive_self_comparison() {
    let temp_dir = TempDir::new().unwrap();
    let src = temp_dir.path().join("rootfs");
    make_image(&src, &[("a/b/c", "deep")]);
    let archive = temp_dir.path().join("rootfs.tar.bz2");
    pack_tar_bz2(&src, &archive);

    let context = RunContext::new(ImgdiffConfig::default(), archive.clone(), archive)
        .with_output_file(Some(temp_dir.path().join("report.txt")));
    assert_eq!(context.execute().unwrap(), RunOutcome::Match);
}
