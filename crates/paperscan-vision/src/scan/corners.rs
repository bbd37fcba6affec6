// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Corner extraction — quadrant partition around the minimum-area bounding
// rectangle's centre, farthest point per quadrant.

use imageproc::geometry::convex_hull;
use imageproc::point::Point as PixelPoint;
use paperscan_core::error::{PaperscanError, Result};
use paperscan_core::{Corner, CornerSet, Point};
use tracing::{debug, instrument, warn};

use super::contour::Contour;

/// Per-quadrant corner candidates. `None` marks a quadrant that held no
/// contour point strictly inside it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct QuadrantCorners {
    pub top_left: Option<Point>,
    pub top_right: Option<Point>,
    pub bottom_right: Option<Point>,
    pub bottom_left: Option<Point>,
}

impl QuadrantCorners {
    pub fn get(&self, corner: Corner) -> Option<Point> {
        match corner {
            Corner::TopLeft => self.top_left,
            Corner::TopRight => self.top_right,
            Corner::BottomRight => self.bottom_right,
            Corner::BottomLeft => self.bottom_left,
        }
    }

    /// Corners whose quadrant was empty, in outline order.
    pub fn missing(&self) -> Vec<Corner> {
        Corner::OUTLINE
            .into_iter()
            .filter(|&c| self.get(c).is_none())
            .collect()
    }

    /// Fill empty quadrants with the origin.
    ///
    /// `(0, 0)` is indistinguishable from a real corner at the origin; prefer
    /// [`QuadrantCorners::into_corner_set`] when the distinction matters.
    pub fn or_origin(&self) -> CornerSet {
        let pick = |c| self.get(c).unwrap_or(Point::ORIGIN);
        CornerSet::new(
            pick(Corner::TopLeft),
            pick(Corner::TopRight),
            pick(Corner::BottomRight),
            pick(Corner::BottomLeft),
        )
    }

    /// Require all four quadrants to be populated.
    pub fn into_corner_set(self) -> Result<CornerSet> {
        let missing = self.missing();
        if !missing.is_empty() {
            return Err(PaperscanError::DegenerateCorners { missing });
        }
        Ok(self.or_origin())
    }
}

/// Corners of `contour`, with `(0, 0)` standing in for any quadrant that
/// holds no contour point.
pub fn get_corners(contour: &Contour) -> CornerSet {
    find_corners(contour).or_origin()
}

/// Locate the four paper corners on a contour.
///
/// The contour's vertices are split into quadrants around the centre of its
/// minimum-area bounding rectangle using strict comparisons, so a vertex
/// lying exactly on the horizontal or vertical line through the centre
/// belongs to no quadrant. Each quadrant's corner is its vertex farthest from
/// the centre.
#[instrument(skip_all, fields(vertices = contour.len()))]
pub fn find_corners(contour: &Contour) -> QuadrantCorners {
    let Some(center) = rect_center(contour.points()) else {
        warn!("Empty contour; no corners");
        return QuadrantCorners::default();
    };
    debug!(cx = center.x, cy = center.y, "Bounding rectangle centre");

    let mut corners = QuadrantCorners::default();
    let mut best = [0.0f64; 4];

    for p in contour.points() {
        let point = Point::new(p.x as f64, p.y as f64);
        let quadrant = if point.x < center.x && point.y < center.y {
            Corner::TopLeft
        } else if point.x > center.x && point.y < center.y {
            Corner::TopRight
        } else if point.x > center.x && point.y > center.y {
            Corner::BottomRight
        } else if point.x < center.x && point.y > center.y {
            Corner::BottomLeft
        } else {
            continue;
        };

        let dist = point.distance(&center);
        let slot = quadrant as usize;
        if dist > best[slot] {
            best[slot] = dist;
            match quadrant {
                Corner::TopLeft => corners.top_left = Some(point),
                Corner::TopRight => corners.top_right = Some(point),
                Corner::BottomRight => corners.bottom_right = Some(point),
                Corner::BottomLeft => corners.bottom_left = Some(point),
            }
        }
    }

    let missing = corners.missing();
    if missing.is_empty() {
        debug!(?corners, "Corners located");
    } else {
        warn!(?missing, "Some quadrants hold no contour points");
    }
    corners
}

/// Centre of the minimum-area rectangle enclosing `points`.
fn rect_center(points: &[PixelPoint<i32>]) -> Option<Point> {
    let rect = min_area_rect(points)?;
    let (sx, sy) = rect
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Some(Point::new(sx / 4.0, sy / 4.0))
}

/// Minimum-area enclosing rectangle, via rotating calipers over the convex
/// hull. One side of the optimal rectangle is always collinear with a hull
/// edge, so trying every edge direction is exhaustive.
///
/// Corners are returned in rectangle order (not image order).
pub fn min_area_rect(points: &[PixelPoint<i32>]) -> Option<[Point; 4]> {
    if points.is_empty() {
        return None;
    }
    let hull: Vec<Point> = convex_hull(points)
        .iter()
        .map(|p| Point::new(p.x as f64, p.y as f64))
        .collect();
    if hull.len() < 2 {
        let only = hull
            .first()
            .copied()
            .unwrap_or(Point::new(points[0].x as f64, points[0].y as f64));
        return Some([only; 4]);
    }

    let mut best: Option<(f64, [Point; 4])> = None;
    for i in 0..hull.len() {
        let a = hull[i];
        let b = hull[(i + 1) % hull.len()];
        let len = a.distance(&b);
        if len == 0.0 {
            continue;
        }
        let u = ((b.x - a.x) / len, (b.y - a.y) / len);
        let v = (-u.1, u.0);

        let (mut min_u, mut max_u) = (f64::INFINITY, f64::NEG_INFINITY);
        let (mut min_v, mut max_v) = (f64::INFINITY, f64::NEG_INFINITY);
        for p in &hull {
            let pu = p.x * u.0 + p.y * u.1;
            let pv = p.x * v.0 + p.y * v.1;
            min_u = min_u.min(pu);
            max_u = max_u.max(pu);
            min_v = min_v.min(pv);
            max_v = max_v.max(pv);
        }

        let area = (max_u - min_u) * (max_v - min_v);
        if best.as_ref().is_none_or(|(best_area, _)| area < *best_area) {
            let at = |s: f64, t: f64| Point::new(s * u.0 + t * v.0, s * u.1 + t * v.1);
            best = Some((
                area,
                [
                    at(min_u, min_v),
                    at(max_u, min_v),
                    at(max_u, max_v),
                    at(min_u, max_v),
                ],
            ));
        }
    }

    best.map(|(_, rect)| rect).or(Some([hull[0]; 4]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::contour::find_paper_contour;
    use image::{Rgba, RgbaImage};

    fn contour_of(points: &[(i32, i32)]) -> Contour {
        Contour::new(points.iter().map(|&(x, y)| PixelPoint::new(x, y)).collect())
    }

    fn assert_near(actual: Point, expected: (f64, f64), tol: f64) {
        assert!(
            (actual.x - expected.0).abs() <= tol && (actual.y - expected.1).abs() <= tol,
            "expected ~{expected:?}, got {actual:?}"
        );
    }

    #[test]
    fn rectangle_vertices_become_corners() {
        let contour = contour_of(&[(10, 20), (110, 20), (110, 80), (10, 80)]);
        let corners = get_corners(&contour);
        assert_eq!(corners.top_left, Point::new(10.0, 20.0));
        assert_eq!(corners.top_right, Point::new(110.0, 20.0));
        assert_eq!(corners.bottom_right, Point::new(110.0, 80.0));
        assert_eq!(corners.bottom_left, Point::new(10.0, 80.0));
    }

    #[test]
    fn farthest_point_in_quadrant_wins() {
        // Midpoints of each side lie on the centre axes and are ignored;
        // the near-centre points lose to the true corners.
        let contour = contour_of(&[
            (0, 0),
            (50, 0),
            (100, 0),
            (100, 50),
            (100, 100),
            (50, 100),
            (0, 100),
            (0, 50),
            (40, 40),
            (60, 60),
        ]);
        let corners = get_corners(&contour);
        assert_eq!(corners.top_left, Point::new(0.0, 0.0));
        assert_eq!(corners.bottom_right, Point::new(100.0, 100.0));
    }

    #[test]
    fn empty_quadrant_falls_back_to_origin() {
        // Bottom-left corner is cut off: (0, 5) and (5, 10) sit on the centre
        // axes of the 10x10 bounding box, so that quadrant is empty.
        let contour = contour_of(&[(0, 0), (10, 0), (10, 10), (5, 10), (0, 5)]);
        let corners = get_corners(&contour);
        assert_eq!(corners.bottom_left, Point::ORIGIN);
        assert_eq!(corners.top_right, Point::new(10.0, 0.0));
        assert_eq!(corners.bottom_right, Point::new(10.0, 10.0));

        let found = find_corners(&contour);
        assert_eq!(found.missing(), vec![Corner::BottomLeft]);
        assert!(matches!(
            found.into_corner_set(),
            Err(PaperscanError::DegenerateCorners { missing }) if missing == vec![Corner::BottomLeft]
        ));
    }

    #[test]
    fn empty_contour_yields_sentinels() {
        let corners = get_corners(&Contour::new(Vec::new()));
        assert_eq!(corners, CornerSet::default());
        assert_eq!(
            find_corners(&Contour::new(Vec::new())).missing().len(),
            4
        );
    }

    #[test]
    fn rotated_square_has_tight_bounding_rect() {
        let rect = min_area_rect(&[
            PixelPoint::new(50, 0),
            PixelPoint::new(100, 50),
            PixelPoint::new(50, 100),
            PixelPoint::new(0, 50),
        ])
        .unwrap();
        let side = rect[0].distance(&rect[1]);
        assert!((side - 50.0 * 2f64.sqrt()).abs() < 1e-6);
        let center = rect_center(&[
            PixelPoint::new(50, 0),
            PixelPoint::new(100, 50),
            PixelPoint::new(50, 100),
            PixelPoint::new(0, 50),
        ])
        .unwrap();
        assert_near(center, (50.0, 50.0), 1e-6);
    }

    #[test]
    fn detected_rectangle_corners_match_drawn_rectangle() {
        let mut img = RgbaImage::from_pixel(320, 240, Rgba([25, 25, 25, 255]));
        for y in 40..200 {
            for x in 60..260 {
                img.put_pixel(x, y, Rgba([240, 240, 240, 255]));
            }
        }
        let contour = find_paper_contour(&img).unwrap();
        let corners = find_corners(&contour).into_corner_set().unwrap();
        assert_near(corners.top_left, (60.0, 40.0), 3.0);
        assert_near(corners.top_right, (259.0, 40.0), 3.0);
        assert_near(corners.bottom_right, (259.0, 199.0), 3.0);
        assert_near(corners.bottom_left, (60.0, 199.0), 3.0);
    }
}
