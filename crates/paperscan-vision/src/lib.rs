// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// paperscan-vision — Paper detection and extraction for document capture.
//
// Normalises camera buffers to RGBA, finds the largest bright contour (the
// sheet of paper), extracts its four corners, rectifies the quadrilateral
// into an upright image, and draws preview outlines.

pub mod buffer;
pub mod render;
pub mod scan;

// Re-export the primary entry points so callers can use `paperscan_vision::PaperScanner` etc.
pub use buffer::{EncodedImage, RawBuffer, Samples, SampleDepth, normalize_to_rgba, rasterize, serialize};
pub use render::{DrawingSurface, ImageSurface, StrokeStyle, draw_outline, highlight};
pub use scan::{
    Contour, PaperScanner, QuadrantCorners, find_corners, find_paper_contour, get_corners, rectify,
};
