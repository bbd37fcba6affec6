// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Raw pixel buffer adapter — rescales samples of any supported depth to
// 8 bits and expands gray/RGB layouts to canonical RGBA.

use image::{DynamicImage, RgbaImage};
use paperscan_core::error::{PaperscanError, Result};
use tracing::{debug, instrument};

/// Numeric type of the samples in a raw buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleDepth {
    U8,
    I8,
    U16,
    I16,
    I32,
    F32,
    F64,
}

impl SampleDepth {
    /// Scale and shift that bring a sample of this depth into `0..=255`.
    ///
    /// 8-bit depths keep their values, 16/32-bit integers drop their low byte,
    /// floats are taken as `0.0..=1.0`. Signed 8/16-bit values are re-centred
    /// by 128 so that zero lands mid-range.
    pub fn scale_shift(self) -> (f64, f64) {
        let scale = match self {
            Self::U8 | Self::I8 => 1.0,
            Self::U16 | Self::I16 | Self::I32 => 1.0 / 256.0,
            Self::F32 | Self::F64 => 255.0,
        };
        let shift = match self {
            Self::I8 | Self::I16 => 128.0,
            _ => 0.0,
        };
        (scale, shift)
    }
}

/// Typed, interleaved sample storage.
#[derive(Debug, Clone, PartialEq)]
pub enum Samples {
    U8(Vec<u8>),
    I8(Vec<i8>),
    U16(Vec<u16>),
    I16(Vec<i16>),
    I32(Vec<i32>),
    F32(Vec<f32>),
    F64(Vec<f64>),
}

impl Samples {
    pub fn depth(&self) -> SampleDepth {
        match self {
            Self::U8(_) => SampleDepth::U8,
            Self::I8(_) => SampleDepth::I8,
            Self::U16(_) => SampleDepth::U16,
            Self::I16(_) => SampleDepth::I16,
            Self::I32(_) => SampleDepth::I32,
            Self::F32(_) => SampleDepth::F32,
            Self::F64(_) => SampleDepth::F64,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::U8(v) => v.len(),
            Self::I8(v) => v.len(),
            Self::U16(v) => v.len(),
            Self::I16(v) => v.len(),
            Self::I32(v) => v.len(),
            Self::F32(v) => v.len(),
            Self::F64(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Convert every sample to `u8` with the depth's scale and shift,
    /// rounding half to even and saturating.
    fn to_u8(&self) -> Vec<u8> {
        let (scale, shift) = self.depth().scale_shift();
        let convert = |v: f64| saturate_u8(v * scale + shift);
        match self {
            Self::U8(v) => v.clone(),
            Self::I8(v) => v.iter().map(|&s| convert(s as f64)).collect(),
            Self::U16(v) => v.iter().map(|&s| convert(s as f64)).collect(),
            Self::I16(v) => v.iter().map(|&s| convert(s as f64)).collect(),
            Self::I32(v) => v.iter().map(|&s| convert(s as f64)).collect(),
            Self::F32(v) => v.iter().map(|&s| convert(s as f64)).collect(),
            Self::F64(v) => v.iter().map(|&s| convert(s)).collect(),
        }
    }
}

fn saturate_u8(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round_ties_even().clamp(0.0, 255.0) as u8
}

/// A pixel buffer as handed over by a capture source: interleaved samples of
/// arbitrary depth with 1..=4 channels per pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct RawBuffer {
    width: u32,
    height: u32,
    channels: u8,
    samples: Samples,
}

impl RawBuffer {
    /// Wrap interleaved samples. Layout is checked by [`normalize_to_rgba`].
    pub fn new(width: u32, height: u32, channels: u8, samples: Samples) -> Self {
        Self {
            width,
            height,
            channels,
            samples,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn depth(&self) -> SampleDepth {
        self.samples.depth()
    }

    pub fn samples(&self) -> &Samples {
        &self.samples
    }
}

impl From<DynamicImage> for RawBuffer {
    fn from(image: DynamicImage) -> Self {
        let (width, height) = (image.width(), image.height());
        let (channels, samples) = match image {
            DynamicImage::ImageLuma8(buf) => (1, Samples::U8(buf.into_raw())),
            DynamicImage::ImageLumaA8(buf) => (2, Samples::U8(buf.into_raw())),
            DynamicImage::ImageRgb8(buf) => (3, Samples::U8(buf.into_raw())),
            DynamicImage::ImageRgba8(buf) => (4, Samples::U8(buf.into_raw())),
            DynamicImage::ImageLuma16(buf) => (1, Samples::U16(buf.into_raw())),
            DynamicImage::ImageLumaA16(buf) => (2, Samples::U16(buf.into_raw())),
            DynamicImage::ImageRgb16(buf) => (3, Samples::U16(buf.into_raw())),
            DynamicImage::ImageRgba16(buf) => (4, Samples::U16(buf.into_raw())),
            DynamicImage::ImageRgb32F(buf) => (3, Samples::F32(buf.into_raw())),
            DynamicImage::ImageRgba32F(buf) => (4, Samples::F32(buf.into_raw())),
            other => (4, Samples::U8(other.to_rgba8().into_raw())),
        };
        Self {
            width,
            height,
            channels,
            samples,
        }
    }
}

/// Normalise a raw buffer to 8-bit RGBA.
///
/// Gray pixels are replicated into R, G and B; RGB pixels gain an opaque
/// alpha; RGBA passes through. Output dimensions always equal the input's.
#[instrument(skip_all, fields(
    width = buffer.width,
    height = buffer.height,
    channels = buffer.channels,
    depth = ?buffer.depth(),
))]
pub fn normalize_to_rgba(buffer: &RawBuffer) -> Result<RgbaImage> {
    let channels = buffer.channels;
    if !matches!(channels, 1 | 3 | 4) {
        return Err(PaperscanError::UnsupportedChannelCount(channels));
    }

    let expected = buffer.width as usize * buffer.height as usize * channels as usize;
    let actual = buffer.samples.len();
    if actual != expected {
        return Err(PaperscanError::BufferSizeMismatch { expected, actual });
    }

    let bytes = buffer.samples.to_u8();
    let rgba: Vec<u8> = match channels {
        1 => bytes.iter().flat_map(|&g| [g, g, g, u8::MAX]).collect(),
        3 => bytes
            .chunks_exact(3)
            .flat_map(|p| [p[0], p[1], p[2], u8::MAX])
            .collect(),
        _ => bytes,
    };

    debug!("Raw buffer normalised to RGBA");
    let rgba_len = rgba.len();
    RgbaImage::from_raw(buffer.width, buffer.height, rgba).ok_or(
        PaperscanError::BufferSizeMismatch {
            expected: expected / channels as usize * 4,
            actual: rgba_len,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgba};

    #[test]
    fn every_supported_layout_becomes_four_channels() {
        let (w, h) = (5u32, 3u32);
        let n = (w * h) as usize;
        for (channels, samples) in [
            (1u8, Samples::U8(vec![7; n])),
            (3, Samples::U16(vec![1024; n * 3])),
            (4, Samples::F32(vec![0.5; n * 4])),
        ] {
            let out = normalize_to_rgba(&RawBuffer::new(w, h, channels, samples)).unwrap();
            assert_eq!(out.dimensions(), (w, h));
            assert_eq!(out.as_raw().len(), n * 4);
        }
    }

    #[test]
    fn rgba8_is_passed_through_unchanged() {
        let data: Vec<u8> = (0..4 * 4 * 4).map(|i| (i * 7 % 256) as u8).collect();
        let raw = RawBuffer::new(4, 4, 4, Samples::U8(data.clone()));
        let out = normalize_to_rgba(&raw).unwrap();
        assert_eq!(out.into_raw(), data);
    }

    #[test]
    fn two_channels_are_rejected() {
        let raw = RawBuffer::new(2, 2, 2, Samples::U8(vec![0; 8]));
        assert!(matches!(
            normalize_to_rgba(&raw),
            Err(PaperscanError::UnsupportedChannelCount(2))
        ));
    }

    #[test]
    fn short_buffer_is_rejected() {
        let raw = RawBuffer::new(3, 3, 3, Samples::U8(vec![0; 20]));
        assert!(matches!(
            normalize_to_rgba(&raw),
            Err(PaperscanError::BufferSizeMismatch {
                expected: 27,
                actual: 20
            })
        ));
    }

    #[test]
    fn gray_is_replicated_with_opaque_alpha() {
        let raw = RawBuffer::new(1, 1, 1, Samples::U8(vec![42]));
        let out = normalize_to_rgba(&raw).unwrap();
        assert_eq!(*out.get_pixel(0, 0), Rgba([42, 42, 42, 255]));
    }

    #[test]
    fn rgb_keeps_channel_order() {
        let raw = RawBuffer::new(1, 1, 3, Samples::U8(vec![10, 20, 30]));
        let out = normalize_to_rgba(&raw).unwrap();
        assert_eq!(*out.get_pixel(0, 0), Rgba([10, 20, 30, 255]));
    }

    #[test]
    fn signed_depths_are_recentred() {
        let raw = RawBuffer::new(3, 1, 1, Samples::I8(vec![-128, 0, 127]));
        let out = normalize_to_rgba(&raw).unwrap();
        assert_eq!(out.get_pixel(0, 0).0[0], 0);
        assert_eq!(out.get_pixel(1, 0).0[0], 128);
        assert_eq!(out.get_pixel(2, 0).0[0], 255);

        let raw = RawBuffer::new(2, 1, 1, Samples::I16(vec![i16::MIN, 0]));
        let out = normalize_to_rgba(&raw).unwrap();
        assert_eq!(out.get_pixel(0, 0).0[0], 0);
        assert_eq!(out.get_pixel(1, 0).0[0], 128);
    }

    #[test]
    fn wide_integer_depths_drop_low_byte() {
        let raw = RawBuffer::new(3, 1, 1, Samples::U16(vec![0, 0x8000, u16::MAX]));
        let out = normalize_to_rgba(&raw).unwrap();
        assert_eq!(out.get_pixel(0, 0).0[0], 0);
        assert_eq!(out.get_pixel(1, 0).0[0], 128);
        assert_eq!(out.get_pixel(2, 0).0[0], 255);

        let raw = RawBuffer::new(2, 1, 1, Samples::I32(vec![-5, 1 << 20]));
        let out = normalize_to_rgba(&raw).unwrap();
        assert_eq!(out.get_pixel(0, 0).0[0], 0);
        assert_eq!(out.get_pixel(1, 0).0[0], 255);
    }

    #[test]
    fn halfway_samples_round_to_even() {
        // 640 / 256 = 2.5 and 896 / 256 = 3.5.
        let raw = RawBuffer::new(2, 1, 1, Samples::U16(vec![640, 896]));
        let out = normalize_to_rgba(&raw).unwrap();
        assert_eq!(out.get_pixel(0, 0).0[0], 2);
        assert_eq!(out.get_pixel(1, 0).0[0], 4);
    }

    #[test]
    fn float_depths_scale_unit_range() {
        let raw = RawBuffer::new(3, 1, 1, Samples::F64(vec![0.0, 0.5, 2.0]));
        let out = normalize_to_rgba(&raw).unwrap();
        assert_eq!(out.get_pixel(0, 0).0[0], 0);
        assert_eq!(out.get_pixel(1, 0).0[0], 128);
        assert_eq!(out.get_pixel(2, 0).0[0], 255);
    }

    #[test]
    fn dynamic_images_map_to_matching_layouts() {
        let gray = DynamicImage::ImageLuma8(GrayImage::from_pixel(4, 2, Luma([9u8])));
        let raw = RawBuffer::from(gray);
        assert_eq!((raw.width(), raw.height(), raw.channels()), (4, 2, 1));
        assert_eq!(raw.depth(), SampleDepth::U8);

        let la = DynamicImage::new_luma_a8(2, 2);
        assert_eq!(RawBuffer::from(la).channels(), 2);

        let rgb16 = DynamicImage::new_rgb16(2, 2);
        let raw = RawBuffer::from(rgb16);
        assert_eq!((raw.channels(), raw.depth()), (3, SampleDepth::U16));
    }
}
