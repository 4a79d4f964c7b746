// SPDX-License-Identifier: GPL-3.0-only

//! Synthetic camera backend
//!
//! A hardware-free [`CameraBackend`] implementation that generates frames in
//! software and simulates the recording lifecycle. Used by the CLI when no
//! platform backend is compiled in, and by the test suite.

use super::CameraBackend;
use super::types::*;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Default frame size produced by the synthetic sensor
const DEFAULT_FRAME_WIDTH: u32 = 640;
const DEFAULT_FRAME_HEIGHT: u32 = 480;

struct ActiveRecording {
    path: PathBuf,
    events: RecordingEventSender,
    started_at: Instant,
}

/// Synthetic camera backend
///
/// Frames are deterministic gradients unless a source frame is injected.
/// The rear lens reports a flash unit; the front lens does not.
pub struct SyntheticBackend {
    bound: Option<CaptureConfig>,
    recording: Option<ActiveRecording>,
    zoom_bounds: ZoomBounds,
    frame_size: (u32, u32),
    source_frame: Option<CameraFrame>,
    fail_next_bind: bool,
    fail_next_finalize: bool,
}

impl SyntheticBackend {
    pub fn new() -> Self {
        Self {
            bound: None,
            recording: None,
            zoom_bounds: ZoomBounds::default(),
            frame_size: (DEFAULT_FRAME_WIDTH, DEFAULT_FRAME_HEIGHT),
            source_frame: None,
            fail_next_bind: false,
            fail_next_finalize: false,
        }
    }

    /// Create a backend producing frames of the given size
    pub fn with_frame_size(width: u32, height: u32) -> Self {
        let mut backend = Self::new();
        backend.frame_size = (width.max(1), height.max(1));
        backend
    }

    /// Inject a fixed frame returned by every subsequent photo capture
    pub fn set_source_frame(&mut self, frame: CameraFrame) {
        self.frame_size = (frame.width, frame.height);
        self.source_frame = Some(frame);
    }

    /// Simulate a device-busy failure on the next bind attempt
    pub fn fail_next_bind(&mut self) {
        self.fail_next_bind = true;
    }

    /// Simulate a muxing failure when the next recording is stopped
    pub fn fail_next_finalize(&mut self) {
        self.fail_next_finalize = true;
    }

    /// Generate a deterministic RGBA gradient frame
    fn generate_frame(&self) -> CameraFrame {
        let (width, height) = self.frame_size;
        let mut data = Vec::with_capacity((width * height * 4) as usize);
        let x_span = width.saturating_sub(1).max(1);
        let y_span = height.saturating_sub(1).max(1);

        for y in 0..height {
            for x in 0..width {
                data.push((x * 255 / x_span) as u8);
                data.push((y * 255 / y_span) as u8);
                data.push(96);
                data.push(255);
            }
        }

        CameraFrame {
            width,
            height,
            data: Arc::from(data),
            format: PixelFormat::RGBA,
            captured_at: Instant::now(),
        }
    }
}

impl Default for SyntheticBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraBackend for SyntheticBackend {
    fn is_available(&self) -> bool {
        true
    }

    fn bind(&mut self, config: &CaptureConfig) -> BackendResult<()> {
        if self.fail_next_bind {
            self.fail_next_bind = false;
            return Err(BackendError::DeviceBusy);
        }
        if self.bound.is_some() {
            // The device must be torn down fully before a new binding
            return Err(BackendError::DeviceBusy);
        }
        if config.flash == FlashMode::On && !self.has_flash_unit(config.lens) {
            return Err(BackendError::FlashUnavailable);
        }

        info!(config = %config, "Binding synthetic camera");
        self.bound = Some(*config);
        Ok(())
    }

    fn unbind(&mut self) -> BackendResult<()> {
        if self.recording.is_some() {
            let _ = self.stop_recording();
        }
        if self.bound.take().is_some() {
            debug!("Synthetic camera unbound");
        }
        Ok(())
    }

    fn is_bound(&self) -> bool {
        self.bound.is_some()
    }

    fn current_config(&self) -> Option<&CaptureConfig> {
        self.bound.as_ref()
    }

    fn has_flash_unit(&self, lens: LensFacing) -> bool {
        // Mirrors common hardware: rear lens has a flash, front lens does not
        matches!(lens, LensFacing::Back)
    }

    fn zoom_bounds(&self) -> ZoomBounds {
        self.zoom_bounds
    }

    fn set_zoom(&mut self, ratio: f32) -> BackendResult<()> {
        let config = self.bound.as_mut().ok_or(BackendError::NotBound)?;
        config.zoom_ratio = ratio;
        Ok(())
    }

    fn capture_photo(&self) -> BackendResult<CameraFrame> {
        if self.bound.is_none() {
            return Err(BackendError::NotBound);
        }
        let frame = match &self.source_frame {
            Some(frame) => frame.clone(),
            None => self.generate_frame(),
        };
        debug!(
            width = frame.width,
            height = frame.height,
            "Synthetic frame captured"
        );
        Ok(frame)
    }

    fn start_recording(
        &mut self,
        output_path: PathBuf,
        events: RecordingEventSender,
    ) -> BackendResult<()> {
        if self.bound.is_none() {
            return Err(BackendError::NotBound);
        }
        if self.recording.is_some() {
            return Err(BackendError::RecordingInProgress);
        }

        File::create(&output_path).map_err(|e| BackendError::IoError(e.to_string()))?;

        info!(path = %output_path.display(), "Recording started");
        let _ = events.send(RecordingEvent::Started);
        self.recording = Some(ActiveRecording {
            path: output_path,
            events,
            started_at: Instant::now(),
        });
        Ok(())
    }

    fn stop_recording(&mut self) -> BackendResult<PathBuf> {
        let recording = self
            .recording
            .take()
            .ok_or(BackendError::NoRecordingInProgress)?;

        if self.fail_next_finalize {
            self.fail_next_finalize = false;
            let err = BackendError::FinalizeFailed("simulated muxer failure".to_string());
            let _ = recording
                .events
                .send(RecordingEvent::Finalized(Err(err.clone())));
            return Err(err);
        }

        info!(
            path = %recording.path.display(),
            duration_ms = recording.started_at.elapsed().as_millis() as u64,
            "Recording finalized"
        );
        let _ = recording
            .events
            .send(RecordingEvent::Finalized(Ok(recording.path.clone())));
        Ok(recording.path)
    }

    fn is_recording(&self) -> bool {
        self.recording.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_frame_dimensions() {
        let backend = SyntheticBackend::with_frame_size(8, 4);
        let frame = backend.generate_frame();
        assert_eq!(frame.width, 8);
        assert_eq!(frame.height, 4);
        assert_eq!(frame.data.len(), frame.expected_len());
    }

    #[test]
    fn test_bind_while_bound_is_device_busy() {
        let mut backend = SyntheticBackend::new();
        let config = CaptureConfig::default();
        backend.bind(&config).unwrap();
        assert!(matches!(
            backend.bind(&config),
            Err(BackendError::DeviceBusy)
        ));
    }

    #[test]
    fn test_capture_requires_bind() {
        let backend = SyntheticBackend::new();
        assert!(matches!(
            backend.capture_photo(),
            Err(BackendError::NotBound)
        ));
    }

    #[test]
    fn test_front_lens_has_no_flash() {
        let backend = SyntheticBackend::new();
        assert!(backend.has_flash_unit(LensFacing::Back));
        assert!(!backend.has_flash_unit(LensFacing::Front));
    }
}
