// SPDX-License-Identifier: GPL-3.0-only

//! Async photo capture pipeline
//!
//! ```text
//! Camera Backend → Capture → Persist original → Filter → Overwrite in place
//! ```
//!
//! The camera stack delivers encoded bytes at the destination path first;
//! the saturation filter then decodes, transforms, and overwrites that file.
//! A filter failure is fatal only to the filtering step: the unfiltered
//! original stays on disk and is reported as the capture result alongside
//! the error. A capture or save failure leaves no file behind.

pub mod encoding;
pub mod processing;

pub use encoding::{EncodedImage, PhotoEncoder};
pub use processing::{PostProcessor, ProcessedImage, SaturationFilter};

use crate::backends::camera::types::CameraFrame;
use crate::constants::JpegQuality;
use crate::errors::PhotoError;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Complete photo capture pipeline
///
/// Orchestrates the persist → filter → overwrite workflow.
pub struct PhotoPipeline {
    post_processor: PostProcessor,
    encoder: PhotoEncoder,
}

impl PhotoPipeline {
    /// Create a new photo pipeline with default settings
    pub fn new() -> Self {
        Self {
            post_processor: PostProcessor::default(),
            encoder: PhotoEncoder::new(),
        }
    }

    /// Create a pipeline with an explicit JPEG quality preset
    pub fn with_quality(quality: JpegQuality) -> Self {
        Self {
            post_processor: PostProcessor::default(),
            encoder: PhotoEncoder::with_quality(quality),
        }
    }

    /// Persist a captured frame to `dest` and apply the capture filter
    ///
    /// Steps:
    /// 1. Encode the raw frame and write it to `dest` (the unfiltered
    ///    original). Failure here removes any partial file and aborts.
    /// 2. Decode `dest`, apply the saturation filter, re-encode, and
    ///    replace the file in place.
    ///
    /// # Returns
    /// * `Ok(PathBuf)` - Path to the saved, filtered photo
    /// * `Err(PhotoError::FilterFailed)` - Filter step failed; the
    ///   unfiltered original remains at `dest`
    /// * `Err(PhotoError)` - Capture could not be persisted; no file remains
    pub async fn capture_to(
        &self,
        frame: Arc<CameraFrame>,
        dest: PathBuf,
    ) -> Result<PathBuf, PhotoError> {
        // Stage 1: persist the unfiltered capture
        let original = self
            .post_processor
            .to_rgb(Arc::clone(&frame))
            .await
            .map_err(PhotoError::CaptureFailed)?;

        let encoded = self
            .encoder
            .encode(original)
            .await
            .map_err(PhotoError::EncodingFailed)?;

        let dest = self
            .encoder
            .save(encoded, dest)
            .await
            .map_err(PhotoError::SaveFailed)?;

        // Stage 2: filter in place; the original survives any failure here
        match self.filter_in_place(&dest).await {
            Ok(()) => {
                info!(path = %dest.display(), "Photo saved");
                Ok(dest)
            }
            Err(e) => {
                warn!(path = %dest.display(), error = %e, "Filter failed, keeping unfiltered photo");
                Err(e)
            }
        }
    }

    /// Decode the photo at `path`, apply the saturation filter, and replace
    /// the file with the filtered re-encode
    pub async fn filter_in_place(&self, path: &Path) -> Result<(), PhotoError> {
        let source = path.to_path_buf();
        let decoded = tokio::task::spawn_blocking(move || encoding::decode_file(&source))
            .await
            .map_err(|e| PhotoError::FilterFailed(format!("Decode task error: {}", e)))?
            .map_err(PhotoError::FilterFailed)?;

        let (width, height) = decoded.dimensions();
        let filtered = self
            .post_processor
            .process_decoded(decoded)
            .await
            .map_err(PhotoError::FilterFailed)?;

        let encoded = self
            .encoder
            .encode(ProcessedImage {
                image: filtered,
                width,
                height,
            })
            .await
            .map_err(PhotoError::FilterFailed)?;

        self.encoder
            .overwrite(encoded, path.to_path_buf())
            .await
            .map_err(PhotoError::FilterFailed)?;

        Ok(())
    }
}

impl Default for PhotoPipeline {
    fn default() -> Self {
        Self::new()
    }
}
