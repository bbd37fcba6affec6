// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Perspective correction — warp the paper quadrilateral onto an upright
// rectangle.

use image::{Rgba, RgbaImage};
use imageproc::geometric_transformations::{Interpolation, Projection, warp_into};
use paperscan_core::error::{PaperscanError, Result};
use paperscan_core::{CornerSet, Point};
use tracing::{debug, info, instrument, warn};

use super::homography::Homography;

/// Largest rectified side, in pixels.
pub const MAX_OUTPUT_SIDE: f64 = 16_384.0;

/// Unrounded output extents for `corners`: the longer of each pair of
/// opposite edges, minus one.
pub fn output_size(corners: &CornerSet) -> (f64, f64) {
    (corners.max_width() - 1.0, corners.max_height() - 1.0)
}

/// Warp the region bounded by `corners` in `image` into an upright rectangle.
///
/// The output is `round(max_width - 1)` x `round(max_height - 1)` pixels,
/// where the extents are the longer of each pair of opposite edges. The
/// top-left corner lands on `(0, 0)`, top-right on `(w - 1, 0)`,
/// bottom-right on `(w - 1, h - 1)` and bottom-left on `(0, h - 1)`.
/// Sampling is bilinear; destination pixels whose pre-image falls outside
/// the source are transparent black.
///
/// ## Errors
///
/// - [`PaperscanError::DegenerateOutput`] when either output side would be
///   smaller than one pixel or larger than [`MAX_OUTPUT_SIDE`]
/// - [`PaperscanError::SingularHomography`] when the corners admit no
///   projective mapping (collinear or repeated points)
#[instrument(skip(image), fields(width = image.width(), height = image.height()))]
pub fn rectify(image: &RgbaImage, corners: &CornerSet) -> Result<RgbaImage> {
    let (width, height) = output_size(corners);
    let (out_w, out_h) = (width.round(), height.round());
    let in_range = |side: f64| (1.0..=MAX_OUTPUT_SIDE).contains(&side);
    if !in_range(out_w) || !in_range(out_h) {
        warn!(width, height, "Rectified size out of range");
        return Err(PaperscanError::DegenerateOutput { width, height });
    }
    debug!(out_w, out_h, "Output size computed");

    let src = corners.outline();
    let dst = [
        Point::new(0.0, 0.0),
        Point::new(width, 0.0),
        Point::new(width, height),
        Point::new(0.0, height),
    ];

    let homography = Homography::from_correspondences(&src, &dst)?;
    debug!(matrix = ?homography.to_row_major_f32(), "Homography solved");
    let projection = Projection::from_matrix(homography.to_row_major_f32())
        .ok_or(PaperscanError::SingularHomography)?;

    let mut output = RgbaImage::new(out_w as u32, out_h as u32);
    warp_into(
        image,
        &projection,
        Interpolation::Bilinear,
        Rgba([0, 0, 0, 0]),
        &mut output,
    );

    info!(
        out_w = output.width(),
        out_h = output.height(),
        "Perspective correction applied"
    );
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use imageproc::drawing::draw_polygon_mut;
    use imageproc::point::Point as PixelPoint;

    /// Red channel encodes x, green encodes y.
    fn gradient(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| Rgba([x as u8, y as u8, 0, 255]))
    }

    #[test]
    fn axis_aligned_rectangle_is_a_crop() {
        let img = gradient(200, 120);
        let corners = CornerSet::from_rect(20.0, 10.0, 100.0, 60.0);
        let out = rectify(&img, &corners).unwrap();
        assert_eq!(out.dimensions(), (99, 59));

        for (x, y) in [(0, 0), (50, 30), (90, 50), (10, 45)] {
            let p = out.get_pixel(x, y);
            assert!(
                (p.0[0] as i32 - (20 + x as i32)).abs() <= 2,
                "red at ({x},{y}) = {}",
                p.0[0]
            );
            assert!(
                (p.0[1] as i32 - (10 + y as i32)).abs() <= 2,
                "green at ({x},{y}) = {}",
                p.0[1]
            );
        }
    }

    #[test]
    fn skewed_quad_becomes_filled_rectangle() {
        let mut img = RgbaImage::from_pixel(320, 240, Rgba([20, 20, 20, 255]));
        let quad = [
            PixelPoint::new(60, 40),
            PixelPoint::new(250, 60),
            PixelPoint::new(270, 200),
            PixelPoint::new(40, 180),
        ];
        draw_polygon_mut(&mut img, &quad, Rgba([250, 250, 250, 255]));

        let corners = CornerSet::new(
            Point::new(60.0, 40.0),
            Point::new(250.0, 60.0),
            Point::new(270.0, 200.0),
            Point::new(40.0, 180.0),
        );
        let out = rectify(&img, &corners).unwrap();
        let (w, h) = out.dimensions();
        assert!(w > 100 && h > 100);

        for y in 3..h - 3 {
            for x in 3..w - 3 {
                let p = out.get_pixel(x, y);
                assert!(p.0[0] > 200, "dark pixel at ({x},{y}): {p:?}");
            }
        }
    }

    #[test]
    fn coincident_corners_are_degenerate() {
        let p = Point::new(5.0, 5.0);
        let corners = CornerSet::new(p, p, p, p);
        let err = rectify(&gradient(10, 10), &corners).unwrap_err();
        assert!(matches!(err, PaperscanError::DegenerateOutput { .. }));
    }

    #[test]
    fn oversized_corners_are_rejected_before_allocating() {
        let corners = CornerSet::from_rect(0.0, 0.0, 1.0e6, 1.0e6);
        let err = rectify(&gradient(10, 10), &corners).unwrap_err();
        assert!(matches!(err, PaperscanError::DegenerateOutput { .. }));
    }

    #[test]
    fn non_finite_corner_is_singular() {
        let mut corners = CornerSet::from_rect(0.0, 0.0, 100.0, 100.0);
        corners.bottom_right = Point::new(f64::NAN, 100.0);
        let err = rectify(&gradient(10, 10), &corners).unwrap_err();
        assert!(matches!(err, PaperscanError::SingularHomography));
    }

    #[test]
    fn largest_allowed_side_is_accepted() {
        // A thin strip at the cap: 16385 px long edges give 16384 px.
        let corners = CornerSet::from_rect(0.0, 0.0, MAX_OUTPUT_SIDE + 1.0, 2.0);
        let out = rectify(&gradient(10, 10), &corners).unwrap();
        assert_eq!(out.dimensions(), (MAX_OUTPUT_SIDE as u32, 1));
    }

    #[test]
    fn collinear_corners_are_singular() {
        let corners = CornerSet::new(
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(200.0, 0.0),
            Point::new(300.0, 0.0),
        );
        let err = rectify(&gradient(320, 10), &corners).unwrap_err();
        assert!(matches!(err, PaperscanError::SingularHomography));
    }
}
