// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Paperscan.

use thiserror::Error;

use crate::types::Corner;

/// Top-level error type for all Paperscan operations.
#[derive(Debug, Error)]
pub enum PaperscanError {
    // -- Pixel buffer errors --
    #[error("unsupported channel count {0} (source image must have 1, 3 or 4 channels)")]
    UnsupportedChannelCount(u8),

    #[error("pixel buffer holds {actual} samples, expected {expected}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    #[error("invalid target dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("invalid data URL: {0}")]
    InvalidDataUrl(String),

    // -- Detection errors --
    #[error("no paper contour found")]
    NoContourFound,

    #[error("no contour points for corner(s): {}", format_corners(.missing))]
    DegenerateCorners { missing: Vec<Corner> },

    // -- Rectification errors --
    #[error("corner points do not define a projective transform")]
    SingularHomography,

    #[error("rectified output size {width:.1}x{height:.1} is out of range")]
    DegenerateOutput { width: f64, height: f64 },

    // -- Rendering --
    #[error("invalid colour: {0}")]
    InvalidColor(String),

    // -- Runtime / persistence --
    #[error("background task failed: {0}")]
    TaskFailed(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

fn format_corners(corners: &[Corner]) -> String {
    corners
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PaperscanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degenerate_corners_lists_every_missing_corner() {
        let err = PaperscanError::DegenerateCorners {
            missing: vec![Corner::TopLeft, Corner::BottomRight],
        };
        assert_eq!(
            err.to_string(),
            "no contour points for corner(s): top-left, bottom-right"
        );
    }

    #[test]
    fn channel_count_is_reported() {
        let err = PaperscanError::UnsupportedChannelCount(2);
        assert!(err.to_string().contains("channel count 2"));
    }
}
