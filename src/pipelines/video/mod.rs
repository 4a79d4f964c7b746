// SPDX-License-Identifier: GPL-3.0-only

//! Video recording pipeline

pub mod recorder;

pub use recorder::{RecordingHandle, VideoRecorder};
