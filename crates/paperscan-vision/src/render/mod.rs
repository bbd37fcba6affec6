// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Rendering module — preview overlays for detected paper.

pub mod highlight;

pub use highlight::{DrawingSurface, ImageSurface, StrokeStyle, draw_outline, highlight, parse_color};
