// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Four-point homography estimation (direct linear transform).

use nalgebra::{Matrix3, SMatrix, SVector, Vector3};
use paperscan_core::Point;
use paperscan_core::error::{PaperscanError, Result};

/// Largest tolerated distance, in pixels, between a mapped source point and
/// its destination before the solve is treated as singular.
const RESIDUAL_TOLERANCE: f64 = 1e-3;

/// A 3x3 planar projective transform, normalised so `h[2][2] == 1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Homography {
    matrix: Matrix3<f64>,
}

impl Homography {
    /// Solve for the homography mapping each `src[i]` onto `dst[i]`.
    ///
    /// Fails with [`PaperscanError::SingularHomography`] when the points are
    /// degenerate (three or more collinear, repeated points).
    pub fn from_correspondences(src: &[Point; 4], dst: &[Point; 4]) -> Result<Self> {
        let mut a = SMatrix::<f64, 8, 8>::zeros();
        let mut b = SVector::<f64, 8>::zeros();

        for (i, (s, d)) in src.iter().zip(dst.iter()).enumerate() {
            let r = i * 2;
            a.row_mut(r)
                .copy_from_slice(&[s.x, s.y, 1.0, 0.0, 0.0, 0.0, -d.x * s.x, -d.x * s.y]);
            a.row_mut(r + 1)
                .copy_from_slice(&[0.0, 0.0, 0.0, s.x, s.y, 1.0, -d.y * s.x, -d.y * s.y]);
            b[r] = d.x;
            b[r + 1] = d.y;
        }

        let h = a.lu().solve(&b).ok_or(PaperscanError::SingularHomography)?;
        if h.iter().any(|v| !v.is_finite()) {
            return Err(PaperscanError::SingularHomography);
        }

        let homography = Self {
            matrix: Matrix3::new(h[0], h[1], h[2], h[3], h[4], h[5], h[6], h[7], 1.0),
        };

        // LU on a near-singular system can return garbage instead of failing.
        for (s, d) in src.iter().zip(dst.iter()) {
            match homography.map_point(*s) {
                Some(mapped) if mapped.distance(d) <= RESIDUAL_TOLERANCE => {}
                _ => return Err(PaperscanError::SingularHomography),
            }
        }

        Ok(homography)
    }

    /// Apply the transform. `None` when the point maps to infinity.
    pub fn map_point(&self, p: Point) -> Option<Point> {
        let v = self.matrix * Vector3::new(p.x, p.y, 1.0);
        if v.z.abs() < f64::EPSILON {
            return None;
        }
        Some(Point::new(v.x / v.z, v.y / v.z))
    }

    pub fn inverse(&self) -> Option<Self> {
        let inv = self.matrix.try_inverse()?;
        let scale = inv[(2, 2)];
        if scale.abs() < f64::EPSILON {
            return None;
        }
        Some(Self {
            matrix: inv / scale,
        })
    }

    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.matrix
    }

    /// Row-major `f32` coefficients, as `imageproc` projections expect.
    pub fn to_row_major_f32(&self) -> [f32; 9] {
        let m = &self.matrix;
        [
            m[(0, 0)] as f32,
            m[(0, 1)] as f32,
            m[(0, 2)] as f32,
            m[(1, 0)] as f32,
            m[(1, 1)] as f32,
            m[(1, 2)] as f32,
            m[(2, 0)] as f32,
            m[(2, 1)] as f32,
            m[(2, 2)] as f32,
        ]
    }
}
