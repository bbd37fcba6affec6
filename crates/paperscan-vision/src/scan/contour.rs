// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Paper contour detection — grayscale, blur, Otsu binarization, contour
// extraction, and largest-area selection.

use image::{GrayImage, RgbaImage, imageops};
use imageproc::contours::{BorderType, find_contours};
use imageproc::contrast::{ThresholdType, otsu_level, threshold};
use imageproc::filter::separable_filter_equal;
use imageproc::point::Point as PixelPoint;
use paperscan_core::DetectionConfig;
use tracing::{debug, info, instrument, warn};

/// Width of the Gaussian blur kernel (5x5, applied separably).
const BLUR_TAPS: usize = 5;

/// Closed boundary of a region in a binarized image, reduced to the vertices
/// where the boundary changes direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contour {
    points: Vec<PixelPoint<i32>>,
    hole: bool,
}

impl Contour {
    pub fn new(points: Vec<PixelPoint<i32>>) -> Self {
        Self {
            points,
            hole: false,
        }
    }

    pub fn points(&self) -> &[PixelPoint<i32>] {
        &self.points
    }

    /// Whether this contour bounds a hole inside a foreground region.
    pub fn is_hole(&self) -> bool {
        self.hole
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Enclosed area (shoelace formula), independent of winding direction.
    pub fn area(&self) -> f64 {
        let n = self.points.len();
        if n < 3 {
            return 0.0;
        }
        let mut twice_area = 0.0f64;
        for i in 0..n {
            let a = self.points[i];
            let b = self.points[(i + 1) % n];
            twice_area += a.x as f64 * b.y as f64 - b.x as f64 * a.y as f64;
        }
        twice_area.abs() / 2.0
    }
}

/// Find the boundary of the largest bright region, taken to be the paper.
pub fn find_paper_contour(image: &RgbaImage) -> Option<Contour> {
    find_paper_contour_with(image, &DetectionConfig::default())
}

/// [`find_paper_contour`] with explicit tuning.
///
/// ## Pipeline
///
/// 1. Convert to grayscale (luma)
/// 2. 5x5 Gaussian blur to suppress sensor noise and paper texture
/// 3. Otsu binarization (no manual threshold)
/// 4. Border following for outer and hole contours, compressed to corner
///    vertices
/// 5. Keep the contour with the largest enclosed area
///
/// Returns `None` when no contour encloses a positive area.
#[instrument(skip_all, fields(width = image.width(), height = image.height()))]
pub fn find_paper_contour_with(image: &RgbaImage, config: &DetectionConfig) -> Option<Contour> {
    let gray = imageops::grayscale(image);

    let blurred = if config.blur_sigma > 0.0 {
        separable_filter_equal(&gray, &gaussian_kernel(config.blur_sigma))
    } else {
        gray
    };

    let (level, binary) = binarize_otsu(&blurred);
    debug!(level, "Otsu threshold computed");

    let contours = extract_contours(&binary);
    debug!(contour_count = contours.len(), "Contours extracted");

    match largest_contour(contours) {
        Some(contour) => {
            info!(
                vertices = contour.len(),
                area = contour.area(),
                "Paper contour found"
            );
            Some(contour)
        }
        None => {
            warn!("No contour with positive area found");
            None
        }
    }
}

/// Extract outer and hole contours from a binary image (non-zero is
/// foreground), keeping only direction-change vertices.
pub fn extract_contours(binary: &GrayImage) -> Vec<Contour> {
    find_contours::<i32>(binary)
        .into_iter()
        .map(|contour| Contour {
            points: compress_chain(&contour.points),
            hole: matches!(contour.border_type, BorderType::Hole),
        })
        .collect()
}

/// Pick the contour with the largest area. Contours enclosing no area never
/// win.
pub fn largest_contour(contours: Vec<Contour>) -> Option<Contour> {
    let mut max_area = 0.0;
    let mut best = None;
    for contour in contours {
        let area = contour.area();
        if area > max_area {
            max_area = area;
            best = Some(contour);
        }
    }
    best
}

/// Drop every point whose incoming and outgoing steps point the same way,
/// leaving only the ends of horizontal, vertical and diagonal runs.
fn compress_chain(points: &[PixelPoint<i32>]) -> Vec<PixelPoint<i32>> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }

    let step = |from: PixelPoint<i32>, to: PixelPoint<i32>| {
        ((to.x - from.x).signum(), (to.y - from.y).signum())
    };

    let compressed: Vec<PixelPoint<i32>> = (0..n)
        .filter(|&i| {
            let prev = points[(i + n - 1) % n];
            let next = points[(i + 1) % n];
            step(prev, points[i]) != step(points[i], next)
        })
        .map(|i| points[i])
        .collect();

    if compressed.is_empty() {
        vec![points[0]]
    } else {
        compressed
    }
}

/// Normalised 1-D Gaussian weights for a [`BLUR_TAPS`]-wide kernel.
fn gaussian_kernel(sigma: f32) -> [f32; BLUR_TAPS] {
    let centre = (BLUR_TAPS / 2) as f32;
    let mut kernel = [0.0f32; BLUR_TAPS];
    for (i, weight) in kernel.iter_mut().enumerate() {
        let x = i as f32 - centre;
        *weight = (-(x * x) / (2.0 * sigma * sigma)).exp();
    }
    let sum: f32 = kernel.iter().sum();
    kernel.map(|w| w / sum)
}

/// Otsu level of `gray`, and the image with pixels strictly above it set to
/// 255 and the rest to 0.
fn binarize_otsu(gray: &GrayImage) -> (u8, GrayImage) {
    let level = otsu_level(gray);
    (level, threshold(gray, level, ThresholdType::Binary))
}
