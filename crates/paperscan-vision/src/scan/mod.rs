// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scanning pipeline — paper contour detection, corner extraction, and
// perspective correction.

pub mod contour;
pub mod corners;
pub mod homography;
pub mod rectify;
pub mod scanner;

pub use contour::{Contour, find_paper_contour, find_paper_contour_with};
pub use corners::{QuadrantCorners, find_corners, get_corners};
pub use homography::Homography;
pub use rectify::rectify;
pub use scanner::PaperScanner;
