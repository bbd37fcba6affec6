// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scan configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Persistent scan settings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Paper contour detection tuning.
    pub detection: DetectionConfig,
    /// Outline drawn over the preview.
    pub highlight: HighlightConfig,
    /// Canvas size used when rasterizing captured photos.
    pub preview: PreviewConfig,
}

/// Tuning for the contour detection pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Standard deviation of the 5x5 Gaussian blur applied before
    /// thresholding. `0` disables the blur.
    pub blur_sigma: f32,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self { blur_sigma: 1.1 }
    }
}

/// Stroke used to outline the detected paper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    /// CSS-style colour name or `#rrggbb` hex string.
    pub color: String,
    /// Line thickness in pixels.
    pub thickness: f32,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            color: "orange".into(),
            thickness: 10.0,
        }
    }
}

/// Target box for letterboxed rasterization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 960,
        }
    }
}

impl ScanConfig {
    /// Read a JSON configuration file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Write the configuration as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), text)?;
        Ok(())
    }
}
