// SPDX-License-Identifier: GPL-3.0-only

//! Error types for the capture application

use std::fmt;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Main application error type
#[derive(Debug, Clone)]
pub enum AppError {
    /// Camera-related errors
    Camera(CameraError),
    /// Recording-related errors
    Recording(RecordingError),
    /// Photo capture errors
    Photo(PhotoError),
    /// Configuration errors
    Config(String),
    /// Storage/filesystem errors
    Storage(String),
    /// Generic error with message
    Other(String),
}

/// Camera-specific errors
#[derive(Debug, Clone)]
pub enum CameraError {
    /// Binding the camera device failed (unavailable, busy, or denied)
    BindFailed(String),
    /// No camera device is available on this system
    NoCameraAvailable,
    /// Camera is not bound; the operation requires an active preview
    NotBound,
    /// Another capture or recording operation is already in flight
    Busy,
    /// The selected lens has no flash unit
    FlashUnavailable,
    /// A camera control (zoom) was rejected by the device
    ControlFailed(String),
    /// Camera disconnected during operation
    Disconnected,
}

/// Recording-specific errors
#[derive(Debug, Clone)]
pub enum RecordingError {
    /// Failed to start recording
    StartFailed(String),
    /// Finalizing the recording failed; a partial file may remain on disk
    FinalizeFailed(String),
    /// Recording already in progress
    AlreadyRecording,
}

/// Photo capture errors
#[derive(Debug, Clone)]
pub enum PhotoError {
    /// Capture was rejected by the camera stack
    CaptureFailed(String),
    /// Decoding the captured image failed
    DecodeFailed(String),
    /// Encoding failed
    EncodingFailed(String),
    /// Save failed
    SaveFailed(String),
    /// Applying the color filter failed; the unfiltered original is kept
    FilterFailed(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Camera(e) => write!(f, "Camera error: {}", e),
            AppError::Recording(e) => write!(f, "Recording error: {}", e),
            AppError::Photo(e) => write!(f, "Photo error: {}", e),
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
            AppError::Storage(msg) => write!(f, "Storage error: {}", msg),
            AppError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl fmt::Display for CameraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraError::BindFailed(msg) => write!(f, "Failed to bind camera: {}", msg),
            CameraError::NoCameraAvailable => write!(f, "No camera available"),
            CameraError::NotBound => write!(f, "Camera is not bound"),
            CameraError::Busy => write!(f, "Camera is busy"),
            CameraError::FlashUnavailable => write!(f, "Flash is not available on this lens"),
            CameraError::ControlFailed(msg) => write!(f, "Camera control rejected: {}", msg),
            CameraError::Disconnected => write!(f, "Camera disconnected"),
        }
    }
}

impl fmt::Display for RecordingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordingError::StartFailed(msg) => write!(f, "Failed to start recording: {}", msg),
            RecordingError::FinalizeFailed(msg) => {
                write!(f, "Failed to finalize recording: {}", msg)
            }
            RecordingError::AlreadyRecording => write!(f, "Recording already in progress"),
        }
    }
}

impl fmt::Display for PhotoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhotoError::CaptureFailed(msg) => write!(f, "Capture failed: {}", msg),
            PhotoError::DecodeFailed(msg) => write!(f, "Decoding failed: {}", msg),
            PhotoError::EncodingFailed(msg) => write!(f, "Encoding failed: {}", msg),
            PhotoError::SaveFailed(msg) => write!(f, "Save failed: {}", msg),
            PhotoError::FilterFailed(msg) => write!(f, "Filter failed: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}
impl std::error::Error for CameraError {}
impl std::error::Error for RecordingError {}
impl std::error::Error for PhotoError {}

// Conversions from sub-errors to AppError
impl From<CameraError> for AppError {
    fn from(err: CameraError) -> Self {
        AppError::Camera(err)
    }
}

impl From<RecordingError> for AppError {
    fn from(err: RecordingError) -> Self {
        AppError::Recording(err)
    }
}

impl From<PhotoError> for AppError {
    fn from(err: PhotoError) -> Self {
        AppError::Photo(err)
    }
}

impl From<String> for AppError {
    fn from(msg: String) -> Self {
        AppError::Other(msg)
    }
}

impl From<&str> for AppError {
    fn from(msg: &str) -> Self {
        AppError::Other(msg.to_string())
    }
}

// Conversions for I/O errors
impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<std::io::Error> for PhotoError {
    fn from(err: std::io::Error) -> Self {
        PhotoError::SaveFailed(err.to_string())
    }
}
