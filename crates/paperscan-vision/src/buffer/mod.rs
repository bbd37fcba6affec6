// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pixel buffer module — raw buffer normalisation, encoding, and letterboxed
// rasterization.

pub mod adapter;
pub mod codec;

pub use adapter::{RawBuffer, SampleDepth, Samples, normalize_to_rgba};
pub use codec::{EncodedImage, fit_letterboxed, fitted_size, rasterize, serialize};
