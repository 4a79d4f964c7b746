// SPDX-License-Identifier: GPL-3.0-only

//! Photo encoding and disk I/O
//!
//! Captured photos are stored as JPEG. Encoding runs in blocking tasks;
//! the in-place overwrite used after filtering goes through a temporary
//! file and rename so a failed re-encode never corrupts the original.

use super::processing::ProcessedImage;
use crate::constants::JpegQuality;
use image::RgbImage;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Encoded image data ready for saving
pub struct EncodedImage {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Photo encoder
pub struct PhotoEncoder {
    quality: JpegQuality,
}

impl PhotoEncoder {
    /// Create a new encoder at maximum quality
    pub fn new() -> Self {
        Self {
            quality: JpegQuality::Maximum,
        }
    }

    /// Create an encoder with an explicit quality preset
    pub fn with_quality(quality: JpegQuality) -> Self {
        Self { quality }
    }

    /// Set encoding quality
    pub fn set_quality(&mut self, quality: JpegQuality) {
        self.quality = quality;
    }

    /// Encode a processed image asynchronously
    pub async fn encode(&self, processed: ProcessedImage) -> Result<EncodedImage, String> {
        debug!(
            width = processed.width,
            height = processed.height,
            quality = self.quality.value(),
            "Encoding photo"
        );

        let quality = self.quality;
        tokio::task::spawn_blocking(move || {
            let data = encode_jpeg(&processed.image, quality)?;
            Ok(EncodedImage {
                data,
                width: processed.width,
                height: processed.height,
            })
        })
        .await
        .map_err(|e| format!("Encoding task error: {}", e))?
    }

    /// Save encoded image bytes to the destination path asynchronously
    ///
    /// On a write failure any partial file at the destination is removed,
    /// so the gallery never sees a half-written photo.
    pub async fn save(&self, encoded: EncodedImage, dest: PathBuf) -> Result<PathBuf, String> {
        info!(path = %dest.display(), "Saving photo");

        let path = dest.clone();
        tokio::task::spawn_blocking(move || {
            std::fs::write(&path, &encoded.data).map_err(|e| {
                let _ = std::fs::remove_file(&path);
                format!("Failed to save photo: {}", e)
            })
        })
        .await
        .map_err(|e| format!("Save task error: {}", e))??;

        Ok(dest)
    }

    /// Replace the file at `dest` with the encoded image
    ///
    /// Writes to a sibling temporary file and renames over the original, so
    /// the existing file survives any failure.
    pub async fn overwrite(&self, encoded: EncodedImage, dest: PathBuf) -> Result<PathBuf, String> {
        info!(path = %dest.display(), "Overwriting photo in place");

        let path = dest.clone();
        tokio::task::spawn_blocking(move || {
            let tmp = path.with_extension("tmp");
            std::fs::write(&tmp, &encoded.data).map_err(|e| {
                let _ = std::fs::remove_file(&tmp);
                format!("Failed to write temporary file: {}", e)
            })?;
            std::fs::rename(&tmp, &path).map_err(|e| {
                let _ = std::fs::remove_file(&tmp);
                format!("Failed to replace photo: {}", e)
            })
        })
        .await
        .map_err(|e| format!("Overwrite task error: {}", e))??;

        Ok(dest)
    }
}

impl Default for PhotoEncoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode a photo file into a tightly packed RGB image
pub fn decode_file(path: &Path) -> Result<RgbImage, String> {
    let image = image::open(path).map_err(|e| format!("Failed to decode {}: {}", path.display(), e))?;
    Ok(image.to_rgb8())
}

/// Encode an RGB image as JPEG at the given quality
fn encode_jpeg(image: &RgbImage, quality: JpegQuality) -> Result<Vec<u8>, String> {
    let mut buffer = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut buffer);

    let mut encoder =
        image::codecs::jpeg::JpegEncoder::new_with_quality(&mut cursor, quality.value());

    encoder
        .encode(
            image.as_raw(),
            image.width(),
            image.height(),
            image::ExtendedColorType::Rgb8,
        )
        .map_err(|e| format!("JPEG encoding failed: {}", e))?;

    Ok(buffer)
}
