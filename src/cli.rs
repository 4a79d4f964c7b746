// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands for capture operations
//!
//! This module provides command-line functionality for:
//! - Listing available lenses
//! - Taking photos
//! - Recording videos
//! - Listing captured media

use ecocam::backends::camera::CameraManager;
use ecocam::backends::camera::types::{FlashMode, LensFacing, RecordingEvent};
use ecocam::config::Config;
use ecocam::errors::{AppError, PhotoError};
use ecocam::session::CaptureSession;
use ecocam::{gallery, storage};
use std::path::PathBuf;
use std::time::Duration;

/// List lenses and capabilities of the active backend
pub fn list_lenses() -> Result<(), Box<dyn std::error::Error>> {
    let manager = CameraManager::with_default_backend();

    if !manager.is_available() {
        println!("No camera backend available.");
        return Ok(());
    }

    println!("Available lenses:");
    for lens in [LensFacing::Back, LensFacing::Front] {
        let flash = if manager.has_flash_unit(lens) {
            "flash"
        } else {
            "no flash"
        };
        println!("  {} ({})", lens, flash);
    }

    let bounds = manager.zoom_bounds();
    println!("Zoom range: {:.1}x - {:.1}x", bounds.min, bounds.max);
    Ok(())
}

/// Take a single photo
pub async fn take_photo(
    front: bool,
    flash: bool,
    zoom: Option<f32>,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load();
    let output_dir = storage::resolve_output_dir_with_override(
        output.as_deref().or(config.output_dir.as_deref()),
    )?;

    let mut capture_config = config.capture_config();
    if front {
        capture_config.lens = LensFacing::Front;
    }
    if flash {
        capture_config.flash = FlashMode::On;
    }

    let session = CaptureSession::with_quality(
        CameraManager::with_default_backend(),
        capture_config,
        output_dir,
        config.jpeg_quality,
    );

    session.bind()?;
    if let Some(ratio) = zoom {
        let applied = session.set_zoom(ratio)?;
        println!("Zoom set to {:.1}x", applied);
    }

    match session.take_photo().await {
        Ok(path) => println!("Photo saved: {}", path.display()),
        Err(AppError::Photo(PhotoError::FilterFailed(e))) => {
            // The unfiltered original was kept at the destination
            println!("Photo saved without filter ({})", e);
        }
        Err(e) => return Err(e.into()),
    }

    session.unbind()?;
    Ok(())
}

/// Record a video for the given duration
pub async fn record_video(
    duration_secs: u64,
    front: bool,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load();
    let output_dir = storage::resolve_output_dir_with_override(
        output.as_deref().or(config.output_dir.as_deref()),
    )?;

    let mut capture_config = config.capture_config();
    if front {
        capture_config.lens = LensFacing::Front;
    }

    let session = CaptureSession::new(
        CameraManager::with_default_backend(),
        capture_config,
        output_dir,
    );

    session.bind()?;
    let mut events = session.start_recording()?;

    if let Some(RecordingEvent::Started) = events.recv().await {
        println!("Recording for {} seconds...", duration_secs);
    }
    tokio::time::sleep(Duration::from_secs(duration_secs)).await;

    let _ = session.stop_recording()?;

    while let Some(event) = events.recv().await {
        match event {
            RecordingEvent::Started => {}
            RecordingEvent::Finalized(Ok(path)) => {
                println!("Video saved: {}", path.display());
            }
            RecordingEvent::Finalized(Err(e)) => {
                println!("Recording failed: {}", e);
            }
        }
    }

    session.unbind()?;
    Ok(())
}

/// List captured media, newest first
pub fn show_gallery(dir: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load();
    let dir = match dir {
        Some(dir) => dir,
        None => storage::resolve_output_dir_with_override(config.output_dir.as_deref())?,
    };

    let entries = gallery::list_media(&dir)?;
    if entries.is_empty() {
        println!("No media in {}", dir.display());
        return Ok(());
    }

    println!("Media in {}:", dir.display());
    for entry in &entries {
        let name = entry
            .path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("?");
        println!("  [{}] {}", entry.kind, name);
    }
    Ok(())
}
