// SPDX-License-Identifier: GPL-3.0-only

//! Shared types for camera backends

use crate::constants::{DEFAULT_MAX_ZOOM, DEFAULT_MIN_ZOOM};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

/// Physical camera selection, front- or rear-facing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum LensFacing {
    /// Rear-facing camera (default)
    #[default]
    Back,
    /// Front-facing camera (selfie)
    Front,
}

impl LensFacing {
    /// Get the opposite lens
    pub fn toggled(&self) -> Self {
        match self {
            LensFacing::Back => LensFacing::Front,
            LensFacing::Front => LensFacing::Back,
        }
    }
}

impl std::fmt::Display for LensFacing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LensFacing::Back => write!(f, "back"),
            LensFacing::Front => write!(f, "front"),
        }
    }
}

/// Whether the capture flash fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum FlashMode {
    /// Flash disabled (default)
    #[default]
    Off,
    /// Flash fires on capture
    On,
}

impl FlashMode {
    /// Get the opposite flash mode
    pub fn toggled(&self) -> Self {
        match self {
            FlashMode::Off => FlashMode::On,
            FlashMode::On => FlashMode::Off,
        }
    }
}

impl std::fmt::Display for FlashMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FlashMode::Off => write!(f, "off"),
            FlashMode::On => write!(f, "on"),
        }
    }
}

/// Active camera configuration
///
/// Lens and flash changes require a full unbind and rebind of the camera
/// device; zoom can be applied in place.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptureConfig {
    pub lens: LensFacing,
    pub flash: FlashMode,
    pub zoom_ratio: f32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            lens: LensFacing::default(),
            flash: FlashMode::default(),
            zoom_ratio: DEFAULT_MIN_ZOOM,
        }
    }
}

impl std::fmt::Display for CaptureConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} lens, flash {}, zoom {:.1}x",
            self.lens, self.flash, self.zoom_ratio
        )
    }
}

/// Zoom range reported by the camera device
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomBounds {
    pub min: f32,
    pub max: f32,
}

impl ZoomBounds {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Clamp a requested zoom ratio into this range
    pub fn clamp(&self, ratio: f32) -> f32 {
        ratio.clamp(self.min, self.max)
    }
}

impl Default for ZoomBounds {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN_ZOOM,
            max: DEFAULT_MAX_ZOOM,
        }
    }
}

/// Pixel format for camera frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// RGBA - 32-bit with alpha (4 bytes per pixel)
    /// Canonical format delivered by backends
    RGBA,
    /// RGB24 - 24-bit RGB (3 bytes per pixel, no alpha)
    RGB24,
}

impl PixelFormat {
    /// Bytes per pixel for this format
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            PixelFormat::RGBA => 4,
            PixelFormat::RGB24 => 3,
        }
    }
}

/// A single decoded frame from the camera
#[derive(Debug, Clone)]
pub struct CameraFrame {
    pub width: u32,
    pub height: u32,
    /// Tightly packed pixel data in `format` layout
    pub data: Arc<[u8]>,
    /// Pixel format of the data
    pub format: PixelFormat,
    /// Timestamp when the frame was captured (for latency diagnostics)
    pub captured_at: Instant,
}

impl CameraFrame {
    /// Expected byte length for the frame dimensions and format
    pub fn expected_len(&self) -> usize {
        self.width as usize * self.height as usize * self.format.bytes_per_pixel()
    }
}

/// Lifecycle events emitted for a single recording.
///
/// For any one recording, `Started` is always delivered before `Finalized`.
#[derive(Debug, Clone)]
pub enum RecordingEvent {
    /// Recording has started writing to its destination path
    Started,
    /// Recording finished; carries the final path or the finalize error
    Finalized(Result<PathBuf, BackendError>),
}

/// Sender half for recording lifecycle events
pub type RecordingEventSender = tokio::sync::mpsc::UnboundedSender<RecordingEvent>;

/// Receiver half for recording lifecycle events
pub type RecordingEventReceiver = tokio::sync::mpsc::UnboundedReceiver<RecordingEvent>;

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Error types for backend operations
#[derive(Debug, Clone)]
pub enum BackendError {
    /// Backend is not available on this system
    NotAvailable(String),
    /// Binding the camera device failed
    BindFailed(String),
    /// Camera device is busy or held by another owner
    DeviceBusy,
    /// Operation requires a bound camera
    NotBound,
    /// Frame capture failed
    CaptureFailed(String),
    /// Recording already in progress
    RecordingInProgress,
    /// No recording in progress
    NoRecordingInProgress,
    /// Recording could not be finalized
    FinalizeFailed(String),
    /// The selected lens has no flash unit
    FlashUnavailable,
    /// General I/O error
    IoError(String),
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendError::NotAvailable(msg) => write!(f, "Backend not available: {}", msg),
            BackendError::BindFailed(msg) => write!(f, "Bind failed: {}", msg),
            BackendError::DeviceBusy => write!(f, "Camera device is busy"),
            BackendError::NotBound => write!(f, "Camera is not bound"),
            BackendError::CaptureFailed(msg) => write!(f, "Capture failed: {}", msg),
            BackendError::RecordingInProgress => write!(f, "Recording already in progress"),
            BackendError::NoRecordingInProgress => write!(f, "No recording in progress"),
            BackendError::FinalizeFailed(msg) => write!(f, "Finalize failed: {}", msg),
            BackendError::FlashUnavailable => write!(f, "Flash unit not present"),
            BackendError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for BackendError {}
