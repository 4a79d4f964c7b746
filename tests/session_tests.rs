// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for the capture session controller

use ecocam::backends::camera::CameraManager;
use ecocam::backends::camera::synthetic::SyntheticBackend;
use ecocam::backends::camera::types::{
    CameraFrame, CaptureConfig, FlashMode, LensFacing, PixelFormat, RecordingEvent,
};
use ecocam::errors::{AppError, CameraError, RecordingError};
use ecocam::session::{CaptureSession, SessionState};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

fn temp_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("ecocam-session-{}-{}", tag, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn session_with(backend: SyntheticBackend, dir: PathBuf) -> CaptureSession {
    CaptureSession::new(
        CameraManager::new(Box::new(backend)),
        CaptureConfig::default(),
        dir,
    )
}

/// Uniform low-saturation frame: muted color close to gray
fn muted_frame() -> CameraFrame {
    let pixel = [160u8, 128, 96, 255];
    let data: Vec<u8> = pixel.iter().copied().cycle().take(2 * 2 * 4).collect();
    CameraFrame {
        width: 2,
        height: 2,
        data: Arc::from(data),
        format: PixelFormat::RGBA,
        captured_at: Instant::now(),
    }
}

#[tokio::test]
async fn test_end_to_end_photo_capture() {
    let dir = temp_dir("e2e");
    let mut backend = SyntheticBackend::new();
    backend.set_source_frame(muted_frame());
    let session = session_with(backend, dir.clone());

    assert_eq!(session.state(), SessionState::Idle);
    assert_eq!(session.config().lens, LensFacing::Back);
    assert_eq!(session.config().flash, FlashMode::Off);

    session.bind().unwrap();
    assert_eq!(session.state(), SessionState::Previewing);

    let path = session.take_photo().await.unwrap();
    assert_eq!(session.state(), SessionState::Previewing);
    assert!(path.exists());

    // Dimensions match, and the low-saturation pixel moved away from its
    // gray value: the channel spread widens from 64 to roughly 77
    let decoded = image::open(&path).unwrap().to_rgb8();
    assert_eq!(decoded.dimensions(), (2, 2));
    let [r, g, b] = decoded.get_pixel(0, 0).0;
    assert_ne!([r, g, b], [160, 128, 96]);
    let spread = r.max(g).max(b) as i16 - r.min(g).min(b) as i16;
    assert!(spread > 68, "saturation boost should widen channel spread");

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn test_capture_while_capturing_is_rejected_busy() {
    let dir = temp_dir("busy");
    let session = session_with(SyntheticBackend::new(), dir.clone());
    session.bind().unwrap();

    // The first capture enters `Capturing` on its first poll; the second
    // request must be rejected, not queued
    let first = session.take_photo();
    let second = session.take_photo();
    let (first, second) = tokio::join!(first, second);

    assert!(first.is_ok());
    assert!(matches!(
        second,
        Err(AppError::Camera(CameraError::Busy))
    ));
    assert_eq!(session.state(), SessionState::Previewing);

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn test_capture_while_recording_is_rejected_busy() {
    let dir = temp_dir("busy-recording");
    let session = session_with(SyntheticBackend::new(), dir.clone());
    session.bind().unwrap();

    let _events = session.start_recording().unwrap();
    assert_eq!(session.state(), SessionState::Recording);

    assert!(matches!(
        session.take_photo().await,
        Err(AppError::Camera(CameraError::Busy))
    ));
    assert!(matches!(
        session.start_recording(),
        Err(AppError::Recording(RecordingError::AlreadyRecording))
    ));

    session.stop_recording().unwrap();
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_stop_recording_when_idle_is_noop() {
    let dir = temp_dir("stop-idle");
    let session = session_with(SyntheticBackend::new(), dir.clone());

    assert_eq!(session.state(), SessionState::Idle);
    assert_eq!(session.stop_recording().unwrap(), None);
    assert_eq!(session.state(), SessionState::Idle);

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn test_recording_lifecycle_events_in_order() {
    let dir = temp_dir("lifecycle");
    let session = session_with(SyntheticBackend::new(), dir.clone());
    session.bind().unwrap();

    let mut events = session.start_recording().unwrap();
    assert!(matches!(events.recv().await, Some(RecordingEvent::Started)));

    let stopped = session.stop_recording().unwrap().expect("active recording");
    assert_eq!(session.state(), SessionState::Previewing);
    assert!(stopped.exists());
    assert_eq!(stopped.extension().unwrap(), "mp4");

    match events.recv().await {
        Some(RecordingEvent::Finalized(Ok(path))) => assert_eq!(path, stopped),
        other => panic!("expected successful finalize, got {:?}", other),
    }
    assert!(events.recv().await.is_none());

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn test_finalize_error_reported_and_partial_file_kept() {
    let dir = temp_dir("finalize-error");
    let mut backend = SyntheticBackend::new();
    backend.fail_next_finalize();
    let session = session_with(backend, dir.clone());
    session.bind().unwrap();

    let mut events = session.start_recording().unwrap();
    assert!(matches!(events.recv().await, Some(RecordingEvent::Started)));

    let result = session.stop_recording();
    assert!(matches!(result, Err(RecordingError::FinalizeFailed(_))));
    // The partial file is left for the user rather than silently deleted
    let leftover: Vec<_> = std::fs::read_dir(&dir)
        .unwrap()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "mp4"))
        .collect();
    assert_eq!(leftover.len(), 1);
    // The handle is released; the session is previewing again
    assert_eq!(session.state(), SessionState::Previewing);
    assert_eq!(session.stop_recording().unwrap(), None);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_bind_failure_stays_idle_and_preserves_config() {
    let dir = temp_dir("bind-failure");
    let mut backend = SyntheticBackend::new();
    backend.fail_next_bind();
    let session = session_with(backend, dir.clone());

    let config_before = session.config();
    assert!(matches!(
        session.bind(),
        Err(CameraError::BindFailed(_))
    ));
    assert_eq!(session.state(), SessionState::Idle);
    assert_eq!(session.config(), config_before);

    // Retry with the preserved configuration succeeds
    session.bind().unwrap();
    assert_eq!(session.state(), SessionState::Previewing);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_flash_toggle_rebinds_immediately() {
    let dir = temp_dir("flash");
    let session = session_with(SyntheticBackend::new(), dir.clone());
    session.bind().unwrap();

    session.toggle_flash().unwrap();
    // The preview must not be left torn down after the toggle
    assert_eq!(session.state(), SessionState::Previewing);
    assert_eq!(session.config().flash, FlashMode::On);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_flash_unavailable_on_front_lens() {
    let dir = temp_dir("no-flash");
    let session = session_with(SyntheticBackend::new(), dir.clone());
    session.bind().unwrap();
    session.set_lens(LensFacing::Front).unwrap();

    assert!(matches!(
        session.set_flash(FlashMode::On),
        Err(CameraError::FlashUnavailable)
    ));
    // A rejected toggle leaves the preview running
    assert_eq!(session.state(), SessionState::Previewing);
    assert_eq!(session.config().flash, FlashMode::Off);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_zoom_is_clamped_to_device_bounds() {
    let dir = temp_dir("zoom");
    let session = session_with(SyntheticBackend::new(), dir.clone());

    assert!(matches!(
        session.set_zoom(2.0),
        Err(CameraError::NotBound)
    ));

    session.bind().unwrap();
    assert_eq!(session.set_zoom(50.0).unwrap(), 10.0);
    assert_eq!(session.set_zoom(0.1).unwrap(), 1.0);
    assert_eq!(session.set_zoom(2.5).unwrap(), 2.5);
    assert_eq!(session.config().zoom_ratio, 2.5);

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn test_zoom_allowed_while_recording() {
    let dir = temp_dir("zoom-recording");
    let session = session_with(SyntheticBackend::new(), dir.clone());
    session.bind().unwrap();

    let _events = session.start_recording().unwrap();
    assert_eq!(session.set_zoom(3.0).unwrap(), 3.0);

    session.stop_recording().unwrap();
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_lens_switch_keeps_previewing() {
    let dir = temp_dir("lens");
    let session = session_with(SyntheticBackend::new(), dir.clone());
    session.bind().unwrap();

    session.toggle_lens().unwrap();
    assert_eq!(session.config().lens, LensFacing::Front);
    assert_eq!(session.state(), SessionState::Previewing);

    session.toggle_lens().unwrap();
    assert_eq!(session.config().lens, LensFacing::Back);

    let _ = std::fs::remove_dir_all(&dir);
}
