// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Paper scanner facade — ties contour detection, corner extraction,
// perspective correction and highlighting to one working image.

use image::{DynamicImage, RgbaImage};
use paperscan_core::error::{PaperscanError, Result};
use paperscan_core::{CornerSet, DetectionConfig};
use tracing::{info, instrument, warn};

use crate::buffer::{RawBuffer, normalize_to_rgba, serialize};
use crate::render::{StrokeStyle, highlight};

use super::contour::{Contour, find_paper_contour_with};
use super::corners::find_corners;
use super::rectify::rectify;

/// Detects and extracts a sheet of paper from a photo.
///
/// ```ignore
/// let scanner = PaperScanner::open("desk.jpg")?;
/// let corners = scanner.detect_corners()?;
/// let page = scanner.extract_paper(&corners)?;
/// ```
#[derive(Debug, Clone)]
pub struct PaperScanner {
    /// The capture, normalised to 8-bit RGBA.
    image: RgbaImage,
    detection: DetectionConfig,
}

impl PaperScanner {
    // -- Construction ---------------------------------------------------------

    /// Create a scanner from encoded image bytes (JPEG, PNG, ...).
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let image = image::load_from_memory(data).map_err(|err| {
            PaperscanError::ImageError(format!("failed to decode capture: {}", err))
        })?;
        info!(
            width = image.width(),
            height = image.height(),
            "Capture loaded"
        );
        Ok(Self::from_dynamic(image))
    }

    /// Create a scanner from a file path.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let image = image::open(path.as_ref()).map_err(|err| {
            PaperscanError::ImageError(format!(
                "failed to open capture {}: {}",
                path.as_ref().display(),
                err
            ))
        })?;
        Ok(Self::from_dynamic(image))
    }

    /// Wrap a decoded image of any colour type.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self::from_rgba(image.to_rgba8())
    }

    pub fn from_rgba(image: RgbaImage) -> Self {
        Self {
            image,
            detection: DetectionConfig::default(),
        }
    }

    /// Normalise a raw capture buffer (1, 3 or 4 channels, any sample depth).
    pub fn from_raw(buffer: &RawBuffer) -> Result<Self> {
        Ok(Self::from_rgba(normalize_to_rgba(buffer)?))
    }

    /// Replace the detection tuning.
    pub fn with_detection(mut self, detection: DetectionConfig) -> Self {
        self.detection = detection;
        self
    }

    // -- Accessors ------------------------------------------------------------

    pub fn as_rgba(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_rgba(self) -> RgbaImage {
        self.image
    }

    pub fn detection(&self) -> &DetectionConfig {
        &self.detection
    }

    // -- Detection ------------------------------------------------------------

    /// Largest bright contour, or `None` when the capture has no candidate.
    pub fn detect_contour(&self) -> Option<Contour> {
        find_paper_contour_with(&self.image, &self.detection)
    }

    /// Four corners of the paper.
    ///
    /// Unlike [`crate::scan::corners::get_corners`], an empty quadrant is an
    /// error here rather than a `(0, 0)` placeholder.
    #[instrument(skip(self))]
    pub fn detect_corners(&self) -> Result<CornerSet> {
        let contour = self.detect_contour().ok_or(PaperscanError::NoContourFound)?;
        let corners = find_corners(&contour).into_corner_set()?;
        info!(?corners, "Paper corners detected");
        Ok(corners)
    }

    // -- Extraction -----------------------------------------------------------

    /// Rectify the region bounded by `corners` (detected or user-adjusted).
    pub fn extract_paper(&self, corners: &CornerSet) -> Result<RgbaImage> {
        rectify(&self.image, corners)
    }

    /// Detect the paper and rectify it in one call.
    #[instrument(skip(self))]
    pub fn extract_detected(&self) -> Result<RgbaImage> {
        let corners = self.detect_corners().inspect_err(|err| {
            warn!(error = %err, "Paper detection failed");
        })?;
        self.extract_paper(&corners)
    }

    // -- Preview --------------------------------------------------------------

    /// Copy of the capture with `corners` outlined.
    pub fn highlight(&self, corners: &CornerSet, style: &StrokeStyle) -> RgbaImage {
        highlight(&self.image, corners, style)
    }

    /// Encode the capture as PNG bytes.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>> {
        Ok(serialize(&self.image)?.into_bytes())
    }
}
