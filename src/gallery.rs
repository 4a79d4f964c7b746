// SPDX-License-Identifier: GPL-3.0-only

//! Media gallery listing
//!
//! The output directory is the only source of truth: no manifest, no index
//! file. Entries are classified by extension and sorted by filename
//! descending, which is reverse-chronological because filenames are
//! timestamp-prefixed.

use crate::constants::{GALLERY_THUMBNAIL_SIZE, PHOTO_EXTENSION, VIDEO_EXTENSION};
use crate::errors::AppResult;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, warn};

/// Classification of a listed media file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Classify a file extension; unrecognized extensions are skipped
    pub fn from_extension(extension: &str) -> Option<Self> {
        if extension.eq_ignore_ascii_case(PHOTO_EXTENSION) {
            Some(MediaKind::Image)
        } else if extension.eq_ignore_ascii_case(VIDEO_EXTENSION) {
            Some(MediaKind::Video)
        } else {
            None
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaKind::Image => write!(f, "image"),
            MediaKind::Video => write!(f, "video"),
        }
    }
}

/// Decoded preview image for a gallery entry
#[derive(Debug, Clone)]
pub struct Thumbnail {
    pub rgba: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Video preview-frame extraction, performed by the platform media stack
///
/// A provider failure never removes an entry from the listing; the entry is
/// shown without a preview image.
pub trait ThumbnailProvider: Send + Sync {
    fn video_thumbnail(&self, path: &Path) -> Result<Thumbnail, String>;
}

/// Provider used when no platform media stack is present
pub struct NoThumbnailer;

impl ThumbnailProvider for NoThumbnailer {
    fn video_thumbnail(&self, _path: &Path) -> Result<Thumbnail, String> {
        Err("video thumbnail extraction not available".to_string())
    }
}

/// A single listed photo or video file
///
/// Immutable once created; disappears from subsequent listings when the
/// underlying file is deleted.
#[derive(Debug, Clone)]
pub struct MediaEntry {
    pub path: PathBuf,
    pub kind: MediaKind,
    pub created_at: SystemTime,
    pub thumbnail: Option<Thumbnail>,
}

/// List all media entries in `dir`, newest first, without thumbnails
///
/// Files with unrecognized extensions are skipped. A missing directory
/// yields an empty listing (nothing has been captured yet).
pub fn list_media(dir: &Path) -> AppResult<Vec<MediaEntry>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut entries = Vec::new();
    for dir_entry in std::fs::read_dir(dir)? {
        let dir_entry = dir_entry?;
        let path = dir_entry.path();
        if !path.is_file() {
            continue;
        }

        let Some(kind) = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(MediaKind::from_extension)
        else {
            continue;
        };

        let created_at = dir_entry
            .metadata()
            .ok()
            .and_then(|meta| meta.created().or_else(|_| meta.modified()).ok())
            .unwrap_or(SystemTime::UNIX_EPOCH);

        entries.push(MediaEntry {
            path,
            kind,
            created_at,
            thumbnail: None,
        });
    }

    // Filenames are timestamp-prefixed; descending name order is
    // reverse-chronological
    entries.sort_by(|a, b| b.path.file_name().cmp(&a.path.file_name()));

    debug!(dir = %dir.display(), count = entries.len(), "Media listed");
    Ok(entries)
}

/// List all media entries in `dir` and attach preview thumbnails
///
/// Image previews are decoded and downscaled in process; video previews go
/// through the given [`ThumbnailProvider`]. Either failing leaves the entry
/// in the listing without a preview.
pub fn list_media_with_thumbnails(
    dir: &Path,
    provider: &dyn ThumbnailProvider,
) -> AppResult<Vec<MediaEntry>> {
    let mut entries = list_media(dir)?;

    for entry in &mut entries {
        let result = match entry.kind {
            MediaKind::Image => image_thumbnail(&entry.path),
            MediaKind::Video => provider.video_thumbnail(&entry.path),
        };

        match result {
            Ok(thumbnail) => entry.thumbnail = Some(thumbnail),
            Err(e) => {
                warn!(path = %entry.path.display(), error = %e, "Thumbnail unavailable");
            }
        }
    }

    Ok(entries)
}

/// Decode an image file and downscale it to thumbnail size
///
/// Images already within the thumbnail bounds are kept at native size.
fn image_thumbnail(path: &Path) -> Result<Thumbnail, String> {
    let image = image::open(path).map_err(|e| format!("Failed to decode image: {}", e))?;
    let preview = if image.width() > GALLERY_THUMBNAIL_SIZE || image.height() > GALLERY_THUMBNAIL_SIZE
    {
        image.thumbnail(GALLERY_THUMBNAIL_SIZE, GALLERY_THUMBNAIL_SIZE)
    } else {
        image
    };
    let rgba = preview.to_rgba8();
    let (width, height) = rgba.dimensions();

    Ok(Thumbnail {
        rgba: rgba.into_raw(),
        width,
        height,
    })
}
