// SPDX-License-Identifier: GPL-3.0-only

//! User configuration handling
//!
//! Stored as JSON under the platform config directory. Unknown or corrupt
//! files fall back to defaults rather than failing startup.

use crate::backends::camera::types::{CaptureConfig, FlashMode, LensFacing};
use crate::constants::{DEFAULT_MIN_ZOOM, JpegQuality, MEDIA_DIR_NAME};
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Lens selected when a session starts
    pub default_lens: LensFacing,
    /// Flash mode selected when a session starts
    pub default_flash: FlashMode,
    /// JPEG quality used when re-encoding filtered photos
    pub jpeg_quality: JpegQuality,
    /// Explicit media directory; `None` resolves the platform default
    pub output_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_lens: LensFacing::default(),
            default_flash: FlashMode::default(),
            jpeg_quality: JpegQuality::default(),
            output_dir: None,
        }
    }
}

impl Config {
    /// Load the configuration, falling back to defaults on any error
    pub fn load() -> Self {
        let Some(path) = Self::path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => config,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Invalid config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Unreadable config, using defaults");
                Self::default()
            }
        }
    }

    /// Persist the configuration
    pub fn save(&self) -> AppResult<()> {
        let path = Self::path()
            .ok_or_else(|| AppError::Config("No config directory available".to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| AppError::Config(e.to_string()))?;
        std::fs::write(&path, contents)?;
        Ok(())
    }

    /// Build the starting capture configuration for a session
    pub fn capture_config(&self) -> CaptureConfig {
        CaptureConfig {
            lens: self.default_lens,
            flash: self.default_flash,
            zoom_ratio: DEFAULT_MIN_ZOOM,
        }
    }

    fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(MEDIA_DIR_NAME).join("config.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.default_lens, LensFacing::Back);
        assert_eq!(config.default_flash, FlashMode::Off);
        assert_eq!(config.jpeg_quality, JpegQuality::Maximum);
        assert!(config.output_dir.is_none());
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config {
            default_lens: LensFacing::Front,
            default_flash: FlashMode::On,
            jpeg_quality: JpegQuality::High,
            output_dir: Some(PathBuf::from("/tmp/media")),
        };
        let json = serde_json::to_string(&config).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let parsed: Config = serde_json::from_str(r#"{"default_lens":"Front"}"#).unwrap();
        assert_eq!(parsed.default_lens, LensFacing::Front);
        assert_eq!(parsed.default_flash, FlashMode::Off);
    }
}
