// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the paperscan-vision crate: paper detection and
// perspective correction on a synthetic capture.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_polygon_mut;
use imageproc::point::Point as PixelPoint;

use paperscan_vision::PaperScanner;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// 640x480 dark desk with a slightly rotated white sheet.
fn synthetic_capture() -> RgbaImage {
    let mut img = RgbaImage::from_pixel(640, 480, Rgba([35, 30, 30, 255]));
    draw_polygon_mut(
        &mut img,
        &[
            PixelPoint::new(140, 70),
            PixelPoint::new(520, 100),
            PixelPoint::new(500, 420),
            PixelPoint::new(110, 390),
        ],
        Rgba([240, 240, 235, 255]),
    );
    img
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_detect_corners(c: &mut Criterion) {
    let scanner = PaperScanner::from_rgba(synthetic_capture());

    c.bench_function("detect_corners (640x480)", |b| {
        b.iter(|| black_box(black_box(&scanner).detect_corners()));
    });
}

/// Rectification alone, with corners detected once up front.
fn bench_extract_paper(c: &mut Criterion) {
    let scanner = PaperScanner::from_rgba(synthetic_capture());
    let Ok(corners) = scanner.detect_corners() else {
        return;
    };

    c.bench_function("extract_paper (640x480)", |b| {
        b.iter(|| black_box(scanner.extract_paper(black_box(&corners))));
    });
}

criterion_group!(benches, bench_detect_corners, bench_extract_paper);
criterion_main!(benches);
