// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

use serde::{Deserialize, Serialize};

/// Saturation multiplier applied to every captured photo.
///
/// Values above 1.0 push colors away from their gray value; 1.0 is a no-op.
pub const SATURATION_BOOST: f32 = 1.2;

/// Timestamp format used for media filenames (millisecond precision).
///
/// Produces names like `2024-01-31-14-05-09-123`, so a plain descending
/// filename sort yields reverse-chronological order.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d-%H-%M-%S-%3f";

/// File extension for captured photos
pub const PHOTO_EXTENSION: &str = "jpg";

/// File extension for recorded videos
pub const VIDEO_EXTENSION: &str = "mp4";

/// Name of the media directory created under the user's pictures directory
pub const MEDIA_DIR_NAME: &str = "ecocam";

/// Zoom bounds assumed when the camera device does not report its own
pub const DEFAULT_MIN_ZOOM: f32 = 1.0;
pub const DEFAULT_MAX_ZOOM: f32 = 10.0;

/// Edge length of gallery thumbnails in pixels
pub const GALLERY_THUMBNAIL_SIZE: u32 = 256;

/// JPEG quality presets for photo re-encoding
///
/// Captured photos are decoded, filtered, and re-encoded in place; the
/// preset controls how much the re-encode is allowed to compress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum JpegQuality {
    /// Low quality - smallest files
    Low,
    /// Medium quality - balanced
    Medium,
    /// High quality - larger files
    High,
    /// Maximum quality - minimal compression (default)
    #[default]
    Maximum,
}

impl JpegQuality {
    /// Get all preset variants for iteration
    pub const ALL: [JpegQuality; 4] = [
        JpegQuality::Low,
        JpegQuality::Medium,
        JpegQuality::High,
        JpegQuality::Maximum,
    ];

    /// Get display name for the preset
    pub fn display_name(&self) -> &'static str {
        match self {
            JpegQuality::Low => "Low",
            JpegQuality::Medium => "Medium",
            JpegQuality::High => "High",
            JpegQuality::Maximum => "Maximum",
        }
    }

    /// Get JPEG quality value (0-100)
    pub fn value(&self) -> u8 {
        match self {
            JpegQuality::Low => 60,
            JpegQuality::Medium => 80,
            JpegQuality::High => 92,
            JpegQuality::Maximum => 100,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quality_presets_ordered() {
        let mut prev = 0u8;
        for preset in JpegQuality::ALL {
            assert!(preset.value() > prev, "presets should increase in quality");
            prev = preset.value();
        }
    }

    #[test]
    fn test_quality_display_names() {
        for preset in JpegQuality::ALL {
            assert!(!preset.display_name().is_empty());
        }
    }
}
