// SPDX-License-Identifier: GPL-3.0-only

//! Camera backend lifecycle manager
//!
//! The manager provides:
//! - Backend lifecycle management (bind, rebind, unbind)
//! - Thread-safe backend access

use super::CameraBackend;
use super::types::*;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::info;

/// Camera backend manager
///
/// Wraps a [`CameraBackend`] behind a mutex so it can be shared between the
/// session controller and async pipeline tasks. The physical device is
/// exclusively owned: a rebind always tears the previous binding down fully
/// before establishing the new one.
#[derive(Clone)]
pub struct CameraManager {
    backend: Arc<Mutex<Box<dyn CameraBackend>>>,
}

impl CameraManager {
    /// Create a manager around the given backend
    pub fn new(backend: Box<dyn CameraBackend>) -> Self {
        Self {
            backend: Arc::new(Mutex::new(backend)),
        }
    }

    /// Create a manager around the default backend
    pub fn with_default_backend() -> Self {
        Self::new(super::get_backend())
    }

    /// Check if the backend is available on this system
    pub fn is_available(&self) -> bool {
        self.backend.lock().unwrap().is_available()
    }

    /// Bind the camera device
    pub fn bind(&self, config: &CaptureConfig) -> BackendResult<()> {
        info!(config = %config, "Binding camera");
        self.backend.lock().unwrap().bind(config)
    }

    /// Rebind with a new configuration
    ///
    /// Tears down the current binding fully before binding again; binding a
    /// still-held device reports device-busy.
    pub fn rebind(&self, config: &CaptureConfig) -> BackendResult<()> {
        info!(config = %config, "Rebinding camera");
        let mut backend = self.backend.lock().unwrap();
        backend.unbind()?;
        backend.bind(config)
    }

    /// Release the camera device
    pub fn unbind(&self) -> BackendResult<()> {
        info!("Unbinding camera");
        self.backend.lock().unwrap().unbind()
    }

    /// Check if a device is bound
    pub fn is_bound(&self) -> bool {
        self.backend.lock().unwrap().is_bound()
    }

    /// Get the configuration the device was bound with
    pub fn current_config(&self) -> Option<CaptureConfig> {
        self.backend.lock().unwrap().current_config().copied()
    }

    /// Check whether the given lens carries a flash unit
    pub fn has_flash_unit(&self, lens: LensFacing) -> bool {
        self.backend.lock().unwrap().has_flash_unit(lens)
    }

    /// Zoom range reported by the device
    pub fn zoom_bounds(&self) -> ZoomBounds {
        self.backend.lock().unwrap().zoom_bounds()
    }

    /// Apply a zoom ratio (no rebind required)
    pub fn set_zoom(&self, ratio: f32) -> BackendResult<()> {
        self.backend.lock().unwrap().set_zoom(ratio)
    }

    /// Capture a photo frame
    pub fn capture_photo(&self) -> BackendResult<CameraFrame> {
        self.backend.lock().unwrap().capture_photo()
    }

    /// Start video recording
    pub fn start_recording(
        &self,
        output_path: PathBuf,
        events: RecordingEventSender,
    ) -> BackendResult<()> {
        self.backend
            .lock()
            .unwrap()
            .start_recording(output_path, events)
    }

    /// Stop video recording
    pub fn stop_recording(&self) -> BackendResult<PathBuf> {
        self.backend.lock().unwrap().stop_recording()
    }

    /// Check if currently recording
    pub fn is_recording(&self) -> bool {
        self.backend.lock().unwrap().is_recording()
    }
}

impl std::fmt::Debug for CameraManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let backend = self.backend.lock().unwrap();
        f.debug_struct("CameraManager")
            .field("bound", &backend.is_bound())
            .field("recording", &backend.is_recording())
            .finish()
    }
}
