// SPDX-License-Identifier: GPL-3.0-only

//! Video recording handle and lifecycle plumbing
//!
//! Encoding and muxing are performed asynchronously by the camera backend;
//! this module owns the destination path policy and the event channel that
//! surfaces `Started`/`Finalized` to the caller. At most one recording
//! exists at a time, so event ordering is only guaranteed per handle.

use crate::backends::camera::CameraManager;
use crate::backends::camera::types::{BackendError, RecordingEventReceiver};
use crate::errors::RecordingError;
use crate::storage;
use chrono::Local;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

/// Handle for an in-progress video recording
///
/// Exists from start-of-recording until stop-or-error; owned by the
/// session controller.
#[derive(Debug)]
pub struct RecordingHandle {
    path: PathBuf,
    started_at: Instant,
}

impl RecordingHandle {
    /// Destination path the recording writes to
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Time elapsed since the recording started
    pub fn elapsed(&self) -> std::time::Duration {
        self.started_at.elapsed()
    }
}

/// Starts and stops recordings against a camera manager
pub struct VideoRecorder;

impl VideoRecorder {
    /// Start a recording into a timestamped file under `output_dir`
    ///
    /// Returns the handle and the receiver for this recording's lifecycle
    /// events (`Started`, then exactly one `Finalized`).
    pub fn start(
        manager: &CameraManager,
        output_dir: &Path,
    ) -> Result<(RecordingHandle, RecordingEventReceiver), RecordingError> {
        let path = storage::video_path(output_dir, Local::now());
        let (events, receiver) = tokio::sync::mpsc::unbounded_channel();

        manager
            .start_recording(path.clone(), events)
            .map_err(|e| match e {
                BackendError::RecordingInProgress => RecordingError::AlreadyRecording,
                other => RecordingError::StartFailed(other.to_string()),
            })?;

        info!(path = %path.display(), "Recording handle allocated");
        Ok((
            RecordingHandle {
                path,
                started_at: Instant::now(),
            },
            receiver,
        ))
    }

    /// Stop the recording behind `handle` and finalize its file
    ///
    /// A finalize error is reported to the caller; the partial file is left
    /// on disk for the user rather than silently deleted.
    pub fn stop(
        manager: &CameraManager,
        handle: RecordingHandle,
    ) -> Result<PathBuf, RecordingError> {
        match manager.stop_recording() {
            Ok(path) => {
                info!(
                    path = %path.display(),
                    duration_ms = handle.elapsed().as_millis() as u64,
                    "Recording stopped"
                );
                Ok(path)
            }
            Err(e) => {
                warn!(path = %handle.path().display(), error = %e, "Recording finalize failed");
                Err(RecordingError::FinalizeFailed(e.to_string()))
            }
        }
    }
}
