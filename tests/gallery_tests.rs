// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for the media gallery listing

use ecocam::gallery::{self, MediaKind, NoThumbnailer};
use std::path::PathBuf;

fn temp_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("ecocam-gallery-{}-{}", tag, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn test_listing_classifies_sorts_and_skips() {
    let dir = temp_dir("listing");
    std::fs::write(dir.join("2024-01-01-09-00-00-000.jpg"), b"jpeg").unwrap();
    std::fs::write(dir.join("2024-01-02-09-00-00-000.mp4"), b"mp4").unwrap();
    std::fs::write(dir.join("notes.txt"), b"not media").unwrap();

    let entries = gallery::list_media(&dir).unwrap();

    // Exactly the two media files, video first (descending name order)
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].kind, MediaKind::Video);
    assert_eq!(
        entries[0].path.file_name().unwrap().to_str().unwrap(),
        "2024-01-02-09-00-00-000.mp4"
    );
    assert_eq!(entries[1].kind, MediaKind::Image);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_thumbnail_failure_keeps_entry_listed() {
    let dir = temp_dir("thumbs");
    // Video thumbnails are unavailable without a platform media stack, and
    // this "jpeg" does not decode; both entries must still be listed
    std::fs::write(dir.join("2024-05-05-12-00-00-000.mp4"), b"mp4").unwrap();
    std::fs::write(dir.join("2024-05-04-12-00-00-000.jpg"), b"not a jpeg").unwrap();

    let entries = gallery::list_media_with_thumbnails(&dir, &NoThumbnailer).unwrap();

    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|entry| entry.thumbnail.is_none()));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_image_thumbnail_is_decoded_and_downscaled() {
    let dir = temp_dir("decoded");

    let image = image::RgbImage::from_fn(512, 256, |x, _| image::Rgb([(x / 2) as u8, 64, 128]));
    image
        .save(dir.join("2024-05-06-12-00-00-000.jpg"))
        .unwrap();

    let entries = gallery::list_media_with_thumbnails(&dir, &NoThumbnailer).unwrap();
    assert_eq!(entries.len(), 1);

    // Aspect ratio preserved while fitting the thumbnail bounds
    let thumbnail = entries[0].thumbnail.as_ref().expect("image preview");
    assert_eq!((thumbnail.width, thumbnail.height), (256, 128));
    assert_eq!(
        thumbnail.rgba.len(),
        (thumbnail.width * thumbnail.height * 4) as usize
    );

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_small_image_thumbnail_keeps_native_size() {
    let dir = temp_dir("small");

    let image = image::RgbImage::from_fn(32, 16, |x, _| image::Rgb([(x * 8) as u8, 64, 128]));
    image
        .save(dir.join("2024-05-07-12-00-00-000.jpg"))
        .unwrap();

    let entries = gallery::list_media_with_thumbnails(&dir, &NoThumbnailer).unwrap();
    let thumbnail = entries[0].thumbnail.as_ref().expect("image preview");
    assert_eq!((thumbnail.width, thumbnail.height), (32, 16));

    let _ = std::fs::remove_dir_all(&dir);
}
