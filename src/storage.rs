// SPDX-License-Identifier: GPL-3.0-only

//! Output directory resolution and file naming policy
//!
//! All captured media lands in a single flat directory; the directory
//! listing is the only source of truth for the gallery. Filenames are
//! timestamp-prefixed with millisecond precision, so two captures inside
//! the same millisecond collide and the later write replaces the earlier
//! file (last-write-wins).

use crate::constants::{MEDIA_DIR_NAME, PHOTO_EXTENSION, TIMESTAMP_FORMAT, VIDEO_EXTENSION};
use crate::errors::AppResult;
use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Build a timestamped media filename: `yyyy-MM-dd-HH-mm-ss-SSS.<ext>`
pub fn timestamped_filename(at: DateTime<Local>, extension: &str) -> String {
    format!("{}.{}", at.format(TIMESTAMP_FORMAT), extension)
}

/// Destination path for a photo captured at the given instant
pub fn photo_path(output_dir: &Path, at: DateTime<Local>) -> PathBuf {
    output_dir.join(timestamped_filename(at, PHOTO_EXTENSION))
}

/// Destination path for a video started at the given instant
pub fn video_path(output_dir: &Path, at: DateTime<Local>) -> PathBuf {
    output_dir.join(timestamped_filename(at, VIDEO_EXTENSION))
}

/// Resolve the media output directory.
///
/// Prefers a user-visible media directory (`~/Pictures/ecocam`), falling
/// back to the app-private data directory when no pictures directory exists
/// or it cannot be written. The returned directory exists and has passed a
/// write probe; captures must never target an unverified directory.
pub fn resolve_output_dir() -> AppResult<PathBuf> {
    resolve_output_dir_with_override(None)
}

/// Resolve the media output directory, honoring an explicit override.
///
/// An override that cannot be created or written is an error rather than a
/// silent fallback; the automatic candidates fall through quietly.
pub fn resolve_output_dir_with_override(overridden: Option<&Path>) -> AppResult<PathBuf> {
    if let Some(dir) = overridden {
        ensure_writable(dir)?;
        return Ok(dir.to_path_buf());
    }

    if let Some(dir) = preferred_media_dir() {
        match ensure_writable(&dir) {
            Ok(()) => return Ok(dir),
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "Preferred media directory unusable");
            }
        }
    }

    let fallback = private_media_dir()
        .ok_or_else(|| crate::errors::AppError::Storage("No usable data directory".to_string()))?;
    ensure_writable(&fallback)?;
    Ok(fallback)
}

/// User-visible media directory candidate
fn preferred_media_dir() -> Option<PathBuf> {
    dirs::picture_dir().map(|dir| dir.join(MEDIA_DIR_NAME))
}

/// App-private fallback directory
fn private_media_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|dir| dir.join(MEDIA_DIR_NAME).join("media"))
}

/// Create the directory if absent and verify it accepts writes
fn ensure_writable(dir: &Path) -> std::io::Result<()> {
    fs::create_dir_all(dir)?;

    let probe = dir.join(format!(".write-probe-{}", std::process::id()));
    fs::write(&probe, b"probe")?;
    fs::remove_file(&probe)?;

    debug!(dir = %dir.display(), "Output directory ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_filename_format() {
        let at = Local
            .with_ymd_and_hms(2024, 1, 31, 14, 5, 9)
            .unwrap()
            .checked_add_signed(chrono::Duration::milliseconds(123))
            .unwrap();
        assert_eq!(
            timestamped_filename(at, PHOTO_EXTENSION),
            "2024-01-31-14-05-09-123.jpg"
        );
        assert_eq!(
            timestamped_filename(at, VIDEO_EXTENSION),
            "2024-01-31-14-05-09-123.mp4"
        );
    }

    #[test]
    fn test_same_millisecond_names_collide() {
        let at = Local.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap();
        // Deterministic collision: the later write replaces the earlier file
        assert_eq!(
            timestamped_filename(at, PHOTO_EXTENSION),
            timestamped_filename(at, PHOTO_EXTENSION)
        );
    }

    #[test]
    fn test_filenames_sort_chronologically() {
        let earlier = Local.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let later = Local.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        let a = timestamped_filename(earlier, PHOTO_EXTENSION);
        let b = timestamped_filename(later, PHOTO_EXTENSION);
        assert!(b > a, "later captures must sort after earlier ones");
    }
}
