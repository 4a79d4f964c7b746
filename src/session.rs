// SPDX-License-Identifier: GPL-3.0-only

//! Capture session controller
//!
//! Owns the active [`CaptureConfig`] and the at-most-one recording handle,
//! and coordinates photo capture, video recording, and camera
//! reconfiguration against the backend.
//!
//! State transitions:
//! ```text
//! Idle ⇄ Previewing → Capturing → Previewing
//!            ↓
//!        Recording → Previewing
//! ```
//!
//! Only one photo capture or recording may be in flight at any time; a
//! request that arrives while one is pending is rejected busy rather than
//! queued, because the underlying camera driver cannot serve two capture
//! requests concurrently.

use crate::backends::camera::CameraManager;
use crate::backends::camera::types::{
    CaptureConfig, FlashMode, LensFacing, RecordingEventReceiver,
};
use crate::constants::JpegQuality;
use crate::errors::{AppError, CameraError, PhotoError, RecordingError};
use crate::pipelines::photo::PhotoPipeline;
use crate::pipelines::video::{RecordingHandle, VideoRecorder};
use crate::storage;
use chrono::Local;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// Session controller state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No camera bound
    Idle,
    /// Camera bound, preview running
    Previewing,
    /// Photo capture in flight
    Capturing,
    /// Video recording in flight
    Recording,
}

impl SessionState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_previewing(&self) -> bool {
        matches!(self, Self::Previewing)
    }

    pub fn is_capturing(&self) -> bool {
        matches!(self, Self::Capturing)
    }

    pub fn is_recording(&self) -> bool {
        matches!(self, Self::Recording)
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionState::Idle => write!(f, "idle"),
            SessionState::Previewing => write!(f, "previewing"),
            SessionState::Capturing => write!(f, "capturing"),
            SessionState::Recording => write!(f, "recording"),
        }
    }
}

struct SessionInner {
    config: CaptureConfig,
    state: SessionState,
    recording: Option<RecordingHandle>,
}

/// Capture session controller
///
/// Cloneable; clones share the same session state, mirroring the single
/// logical owner that issues commands while async pipeline completions
/// report back.
#[derive(Clone)]
pub struct CaptureSession {
    manager: CameraManager,
    pipeline: Arc<PhotoPipeline>,
    output_dir: PathBuf,
    inner: Arc<Mutex<SessionInner>>,
}

impl CaptureSession {
    /// Create a session in `Idle` with the given starting configuration
    pub fn new(manager: CameraManager, config: CaptureConfig, output_dir: PathBuf) -> Self {
        Self {
            manager,
            pipeline: Arc::new(PhotoPipeline::new()),
            output_dir,
            inner: Arc::new(Mutex::new(SessionInner {
                config,
                state: SessionState::Idle,
                recording: None,
            })),
        }
    }

    /// Create a session with an explicit JPEG quality preset
    pub fn with_quality(
        manager: CameraManager,
        config: CaptureConfig,
        output_dir: PathBuf,
        quality: JpegQuality,
    ) -> Self {
        let mut session = Self::new(manager, config, output_dir);
        session.pipeline = Arc::new(PhotoPipeline::with_quality(quality));
        session
    }

    /// Current controller state
    pub fn state(&self) -> SessionState {
        self.inner.lock().unwrap().state
    }

    /// Current capture configuration
    pub fn config(&self) -> CaptureConfig {
        self.inner.lock().unwrap().config
    }

    /// Directory captures are written to
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Bind the camera device: `Idle → Previewing`
    ///
    /// On failure the session stays `Idle` and the configuration is
    /// preserved, so the user can retry the same bind.
    pub fn bind(&self) -> Result<(), CameraError> {
        let mut inner = self.inner.lock().unwrap();
        match inner.state {
            SessionState::Idle => {}
            _ => return Err(CameraError::Busy),
        }

        self.manager
            .bind(&inner.config)
            .map_err(|e| CameraError::BindFailed(e.to_string()))?;

        // Clamp the configured zoom into the bounds the device reports
        let clamped = self.manager.zoom_bounds().clamp(inner.config.zoom_ratio);
        if let Err(e) = self.manager.set_zoom(clamped) {
            let _ = self.manager.unbind();
            return Err(CameraError::BindFailed(e.to_string()));
        }
        inner.config.zoom_ratio = clamped;
        inner.state = SessionState::Previewing;
        info!(config = %inner.config, "Session previewing");
        Ok(())
    }

    /// Release the camera device: `Previewing → Idle`
    ///
    /// Stops an active recording first. A no-op when already `Idle`.
    pub fn unbind(&self) -> Result<(), CameraError> {
        {
            let inner = self.inner.lock().unwrap();
            match inner.state {
                SessionState::Capturing => return Err(CameraError::Busy),
                SessionState::Idle => return Ok(()),
                _ => {}
            }
        }

        if let Err(e) = self.stop_recording() {
            warn!(error = %e, "Recording finalize failed during unbind");
        }

        let mut inner = self.inner.lock().unwrap();
        self.manager
            .unbind()
            .map_err(|_| CameraError::Disconnected)?;
        inner.state = SessionState::Idle;
        Ok(())
    }

    /// Select the lens; requires a full unbind and rebind when previewing
    pub fn set_lens(&self, lens: LensFacing) -> Result<(), CameraError> {
        self.reconfigure(|config| config.lens = lens)
    }

    /// Switch between the front and back lens
    pub fn toggle_lens(&self) -> Result<(), CameraError> {
        let lens = self.config().lens.toggled();
        self.set_lens(lens)
    }

    /// Set the flash mode; requires a full unbind and rebind when previewing
    ///
    /// Turning the flash on is rejected when the current lens carries no
    /// flash unit.
    pub fn set_flash(&self, flash: FlashMode) -> Result<(), CameraError> {
        if flash == FlashMode::On && !self.manager.has_flash_unit(self.config().lens) {
            return Err(CameraError::FlashUnavailable);
        }
        self.reconfigure(|config| config.flash = flash)
    }

    /// Toggle the flash mode
    pub fn toggle_flash(&self) -> Result<(), CameraError> {
        let flash = self.config().flash.toggled();
        self.set_flash(flash)
    }

    /// Apply a configuration change, rebinding the device if previewing.
    ///
    /// The camera stack cannot reconfigure lens or flash in place, so the
    /// preview is briefly interrupted by a full teardown and rebind. If the
    /// rebind fails the session drops to `Idle` and keeps the previous
    /// configuration for retry.
    fn reconfigure(&self, apply: impl FnOnce(&mut CaptureConfig)) -> Result<(), CameraError> {
        let mut inner = self.inner.lock().unwrap();
        match inner.state {
            SessionState::Idle => {
                // Not bound yet; the change simply applies to the next bind
                apply(&mut inner.config);
                return Ok(());
            }
            SessionState::Previewing => {}
            SessionState::Capturing | SessionState::Recording => return Err(CameraError::Busy),
        }

        let mut next = inner.config;
        apply(&mut next);
        if next == inner.config {
            return Ok(());
        }

        match self.manager.rebind(&next) {
            Ok(()) => {
                let clamped = self.manager.zoom_bounds().clamp(next.zoom_ratio);
                if let Err(e) = self.manager.set_zoom(clamped) {
                    let _ = self.manager.unbind();
                    inner.state = SessionState::Idle;
                    return Err(CameraError::BindFailed(e.to_string()));
                }
                next.zoom_ratio = clamped;
                inner.config = next;
                info!(config = %inner.config, "Session reconfigured");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Rebind failed, dropping to idle");
                inner.state = SessionState::Idle;
                Err(CameraError::BindFailed(e.to_string()))
            }
        }
    }

    /// Adjust zoom; valid while previewing or recording, no rebind needed
    ///
    /// The requested ratio is clamped into the device-reported bounds; the
    /// applied ratio is returned.
    pub fn set_zoom(&self, ratio: f32) -> Result<f32, CameraError> {
        let mut inner = self.inner.lock().unwrap();
        match inner.state {
            SessionState::Previewing | SessionState::Recording => {}
            SessionState::Idle => return Err(CameraError::NotBound),
            SessionState::Capturing => return Err(CameraError::Busy),
        }

        let clamped = self.manager.zoom_bounds().clamp(ratio);
        self.manager
            .set_zoom(clamped)
            .map_err(|e| CameraError::ControlFailed(e.to_string()))?;
        inner.config.zoom_ratio = clamped;
        debug!(zoom = %clamped, "Zoom applied");
        Ok(clamped)
    }

    /// Take a photo: `Previewing → Capturing → Previewing`
    ///
    /// A request while a capture or recording is pending is rejected busy.
    /// On success the filtered photo's path is returned. If only the filter
    /// step fails, the unfiltered original stays at the destination and the
    /// error is reported.
    pub async fn take_photo(&self) -> Result<PathBuf, AppError> {
        let dest = {
            let mut inner = self.inner.lock().unwrap();
            match inner.state {
                SessionState::Previewing => {}
                SessionState::Idle => return Err(CameraError::NotBound.into()),
                SessionState::Capturing | SessionState::Recording => {
                    return Err(CameraError::Busy.into());
                }
            }
            inner.state = SessionState::Capturing;
            storage::photo_path(&self.output_dir, Local::now())
        };

        let result = self.capture_photo_to(dest).await;

        // Capture failure does not unbind the camera
        self.inner.lock().unwrap().state = SessionState::Previewing;
        result
    }

    async fn capture_photo_to(&self, dest: PathBuf) -> Result<PathBuf, AppError> {
        let frame = self
            .manager
            .capture_photo()
            .map_err(|e| PhotoError::CaptureFailed(e.to_string()))?;

        let path = self.pipeline.capture_to(Arc::new(frame), dest).await?;
        Ok(path)
    }

    /// Start video recording: `Previewing → Recording`
    ///
    /// Returns the receiver for this recording's lifecycle events;
    /// `Started` is delivered before `Finalized`.
    pub fn start_recording(&self) -> Result<RecordingEventReceiver, AppError> {
        let mut inner = self.inner.lock().unwrap();
        match inner.state {
            SessionState::Previewing => {}
            SessionState::Idle => return Err(CameraError::NotBound.into()),
            SessionState::Capturing => return Err(CameraError::Busy.into()),
            SessionState::Recording => return Err(RecordingError::AlreadyRecording.into()),
        }

        let (handle, receiver) = VideoRecorder::start(&self.manager, &self.output_dir)?;
        inner.recording = Some(handle);
        inner.state = SessionState::Recording;
        Ok(receiver)
    }

    /// Stop the active recording: `Recording → Previewing`
    ///
    /// Idempotent: stopping when nothing is recording is a no-op and
    /// returns `Ok(None)`. A finalize error is reported, but the partial
    /// file is left on disk for the user rather than silently deleted.
    pub fn stop_recording(&self) -> Result<Option<PathBuf>, RecordingError> {
        let mut inner = self.inner.lock().unwrap();
        let Some(handle) = inner.recording.take() else {
            debug!("Stop requested with no active recording");
            return Ok(None);
        };

        inner.state = SessionState::Previewing;
        let path = VideoRecorder::stop(&self.manager, handle)?;
        Ok(Some(path))
    }

    /// Time elapsed on the active recording, if one is running
    pub fn recording_elapsed(&self) -> Option<std::time::Duration> {
        self.inner
            .lock()
            .unwrap()
            .recording
            .as_ref()
            .map(|handle| handle.elapsed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_helpers() {
        assert!(SessionState::Idle.is_idle());
        assert!(SessionState::Previewing.is_previewing());
        assert!(SessionState::Capturing.is_capturing());
        assert!(SessionState::Recording.is_recording());
    }

    #[test]
    fn test_state_display() {
        assert_eq!(SessionState::Recording.to_string(), "recording");
    }
}
