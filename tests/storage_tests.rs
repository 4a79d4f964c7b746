// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for the output directory and naming policy

use chrono::TimeZone;
use ecocam::storage;
use std::path::PathBuf;

fn temp_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("ecocam-storage-{}-{}", tag, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

#[test]
fn test_override_directory_is_created_and_writable() {
    let dir = temp_dir("override");
    let resolved = storage::resolve_output_dir_with_override(Some(&dir)).unwrap();

    assert_eq!(resolved, dir);
    assert!(resolved.is_dir());
    // The directory must accept writes before any capture completes
    std::fs::write(resolved.join("capture.jpg"), b"jpeg").unwrap();

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_media_paths_carry_kind_extensions() {
    let at = chrono::Local
        .with_ymd_and_hms(2024, 3, 15, 10, 20, 30)
        .unwrap();
    let dir = PathBuf::from("/media");

    let photo = storage::photo_path(&dir, at);
    let video = storage::video_path(&dir, at);

    assert_eq!(photo.extension().unwrap(), "jpg");
    assert_eq!(video.extension().unwrap(), "mp4");
    assert_eq!(
        photo.file_name().unwrap().to_str().unwrap(),
        "2024-03-15-10-20-30-000.jpg"
    );
}

#[test]
fn test_probe_file_is_cleaned_up() {
    let dir = temp_dir("probe");
    storage::resolve_output_dir_with_override(Some(&dir)).unwrap();

    let leftovers: Vec<_> = std::fs::read_dir(&dir).unwrap().collect();
    assert!(leftovers.is_empty(), "write probe must not linger");

    let _ = std::fs::remove_dir_all(&dir);
}
