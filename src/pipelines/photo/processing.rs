// SPDX-License-Identifier: GPL-3.0-only

//! Post-processing for captured photos
//!
//! The single cosmetic filter boosts saturation by a fixed factor. Each
//! pixel is interpolated between its luma-weighted gray value and its
//! original color: `out = gray + (orig - gray) * factor`, clamped to the
//! valid channel range. Luminance and hue are left intact; the transform is
//! pure and total on well-formed input.

use crate::backends::camera::types::{CameraFrame, PixelFormat};
use crate::constants::SATURATION_BOOST;
use image::RgbImage;
use std::sync::Arc;
use tracing::{debug, info};

/// Saturation-scaling color filter
#[derive(Debug, Clone, Copy)]
pub struct SaturationFilter {
    factor: f32,
}

impl SaturationFilter {
    /// Create a filter with an explicit saturation factor
    pub fn new(factor: f32) -> Self {
        Self { factor }
    }

    /// The fixed capture filter (1.2x saturation)
    pub fn boost() -> Self {
        Self::new(SATURATION_BOOST)
    }

    /// Saturate one pixel in place
    fn saturate(&self, r: &mut u8, g: &mut u8, b: &mut u8) {
        let rf = *r as f32;
        let gf = *g as f32;
        let bf = *b as f32;
        let gray = 0.299 * rf + 0.587 * gf + 0.114 * bf;

        *r = (gray + (rf - gray) * self.factor).clamp(0.0, 255.0) as u8;
        *g = (gray + (gf - gray) * self.factor).clamp(0.0, 255.0) as u8;
        *b = (gray + (bf - gray) * self.factor).clamp(0.0, 255.0) as u8;
    }

    /// Apply the filter to an RGB image, producing a new image of identical
    /// dimensions
    pub fn apply_rgb(&self, image: &RgbImage) -> RgbImage {
        let mut output = image.clone();
        for pixel in output.pixels_mut() {
            let [mut r, mut g, mut b] = pixel.0;
            self.saturate(&mut r, &mut g, &mut b);
            pixel.0 = [r, g, b];
        }
        output
    }

    /// Apply the filter to a raw RGBA buffer, leaving alpha untouched
    ///
    /// The only rejectable input is a buffer shorter than `width * height`
    /// pixels.
    pub fn apply_rgba(&self, data: &[u8], width: u32, height: u32) -> Result<Vec<u8>, String> {
        let expected = (width as usize) * (height as usize) * 4;
        if data.len() < expected {
            return Err(format!(
                "RGBA buffer too small: expected {}, got {}",
                expected,
                data.len()
            ));
        }

        let mut output = data[..expected].to_vec();
        for pixel in output.chunks_exact_mut(4) {
            let (mut r, mut g, mut b) = (pixel[0], pixel[1], pixel[2]);
            self.saturate(&mut r, &mut g, &mut b);
            pixel[0] = r;
            pixel[1] = g;
            pixel[2] = b;
        }
        Ok(output)
    }
}

impl Default for SaturationFilter {
    fn default() -> Self {
        Self::boost()
    }
}

/// Processed image data ready for encoding
pub struct ProcessedImage {
    pub image: RgbImage,
    pub width: u32,
    pub height: u32,
}

/// Post-processor for captured frames
///
/// Converts a raw camera frame to RGB and applies the saturation filter in
/// a blocking task so the caller's event loop is never stalled.
pub struct PostProcessor {
    filter: SaturationFilter,
}

impl PostProcessor {
    pub fn new(filter: SaturationFilter) -> Self {
        Self { filter }
    }

    /// Apply the saturation filter to an already decoded RGB image
    pub async fn process_decoded(&self, image: RgbImage) -> Result<RgbImage, String> {
        info!(
            width = image.width(),
            height = image.height(),
            "Starting post-processing"
        );

        let filter = self.filter;
        let processed = tokio::task::spawn_blocking(move || filter.apply_rgb(&image))
            .await
            .map_err(|e| format!("Post-processing task error: {}", e))?;

        debug!("Post-processing complete");
        Ok(processed)
    }

    /// Convert a frame to RGB without filtering (the persisted original;
    /// filtering happens on the decoded file afterwards)
    pub async fn to_rgb(&self, frame: Arc<CameraFrame>) -> Result<ProcessedImage, String> {
        let rgb = tokio::task::spawn_blocking(move || frame_to_rgb(&frame))
            .await
            .map_err(|e| format!("Conversion task error: {}", e))??;

        Ok(ProcessedImage {
            width: rgb.width(),
            height: rgb.height(),
            image: rgb,
        })
    }
}

impl Default for PostProcessor {
    fn default() -> Self {
        Self::new(SaturationFilter::boost())
    }
}

/// Convert a camera frame to a tightly packed RGB image
fn frame_to_rgb(frame: &CameraFrame) -> Result<RgbImage, String> {
    let expected = frame.expected_len();
    if frame.data.len() < expected {
        return Err(format!(
            "Frame data too small: expected {}, got {}",
            expected,
            frame.data.len()
        ));
    }

    let pixels = (frame.width * frame.height) as usize;
    let rgb_data: Vec<u8> = match frame.format {
        PixelFormat::RGBA => frame
            .data
            .chunks(4)
            .take(pixels)
            .flat_map(|rgba| [rgba[0], rgba[1], rgba[2]])
            .collect(),
        PixelFormat::RGB24 => frame.data[..expected].to_vec(),
    };

    RgbImage::from_raw(frame.width, frame.height, rgb_data)
        .ok_or_else(|| "Failed to create RGB image from frame data".to_string())
}
