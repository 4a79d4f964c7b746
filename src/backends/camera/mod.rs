// SPDX-License-Identifier: GPL-3.0-only

//! Camera backend abstraction
//!
//! This module provides a trait-based abstraction over the platform camera
//! stack. The controller talks only to [`CameraBackend`]; device
//! enumeration, frame capture, and video encoding live behind the trait.
//!
//! ```text
//! ┌─────────────────────┐
//! │  CaptureSession     │
//! └──────────┬──────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │   CameraManager     │  ← Lifecycle management, thread safety
//! └──────────┬──────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │ CameraBackend Trait │  ← Common interface
//! └──────────┬──────────┘
//!            │
//!            ▼
//!       ┌─────────┐
//!       │Synthetic│  ← Hardware-free implementation
//!       └─────────┘
//! ```

pub mod manager;
pub mod synthetic;
pub mod types;

pub use manager::CameraManager;
pub use types::*;

use std::path::PathBuf;

/// Camera backend trait
///
/// All camera backends must implement this trait to provide:
/// - Device binding and teardown
/// - Capture operations (photo, video)
/// - Lens capability queries (flash unit, zoom range)
pub trait CameraBackend: Send + Sync {
    // ===== Lifecycle =====

    /// Check if this backend is available on the current system
    fn is_available(&self) -> bool;

    /// Bind the camera device with the given configuration
    ///
    /// The device is held exclusively until [`CameraBackend::unbind`] is
    /// called. Lens and flash cannot be changed on a bound device; callers
    /// must unbind fully and bind again with the new configuration.
    ///
    /// # Returns
    /// * `Ok(())` - Device bound, preview running
    /// * `Err(BackendError)` - Device unavailable, busy, or access denied
    fn bind(&mut self, config: &CaptureConfig) -> BackendResult<()>;

    /// Release the camera device and all associated resources
    ///
    /// Stops any active recording. Safe to call when not bound.
    fn unbind(&mut self) -> BackendResult<()>;

    /// Check if a camera device is currently bound
    fn is_bound(&self) -> bool;

    /// Get the configuration the device was bound with (if bound)
    fn current_config(&self) -> Option<&CaptureConfig>;

    // ===== Capabilities =====

    /// Check whether the given lens carries a flash unit
    fn has_flash_unit(&self, lens: LensFacing) -> bool;

    /// Zoom range reported by the bound device
    ///
    /// Backends without zoom reporting return the default bounds.
    fn zoom_bounds(&self) -> ZoomBounds;

    /// Apply a zoom ratio to the bound device
    ///
    /// Zoom does not require a rebind. The ratio must already be within
    /// [`CameraBackend::zoom_bounds`]; clamping is the caller's job.
    fn set_zoom(&mut self, ratio: f32) -> BackendResult<()>;

    // ===== Capture: Photo =====

    /// Capture a single photo frame
    ///
    /// The frame data is copied immediately so the preview is not blocked.
    /// The frame is in RGBA format, ready for the photo pipeline.
    fn capture_photo(&self) -> BackendResult<CameraFrame>;

    // ===== Capture: Video =====

    /// Start video recording to a file
    ///
    /// Recording proceeds asynchronously; the backend emits
    /// [`RecordingEvent::Started`] once writing begins and
    /// [`RecordingEvent::Finalized`] when the file is complete or the
    /// recording failed. Only one recording can be active at a time.
    fn start_recording(
        &mut self,
        output_path: PathBuf,
        events: RecordingEventSender,
    ) -> BackendResult<()>;

    /// Stop video recording and finalize the file
    ///
    /// # Returns
    /// * `Ok(PathBuf)` - Path to the saved video file
    /// * `Err(BackendError::NoRecordingInProgress)` - Nothing to stop
    /// * `Err(BackendError)` - Finalize failed; a partial file may remain
    fn stop_recording(&mut self) -> BackendResult<PathBuf>;

    /// Check if currently recording
    fn is_recording(&self) -> bool;
}

/// Get the default backend instance
pub fn get_backend() -> Box<dyn CameraBackend> {
    Box::new(synthetic::SyntheticBackend::new())
}
