// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Encoded image handling — data URLs, PNG serialization, and letterboxed
// rasterization of captured photos into a fixed-size canvas.

use base64::Engine;
use base64::engine::general_purpose;
use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat, RgbaImage};
use paperscan_core::error::{PaperscanError, Result};
use tracing::{debug, info, instrument};

/// An image in a portable encoding (PNG, JPEG, ...), as produced by a camera
/// or a browser canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedImage {
    bytes: Vec<u8>,
    format: Option<ImageFormat>,
}

impl EncodedImage {
    /// Wrap encoded bytes; the format is sniffed from the magic number.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        let format = image::guess_format(&bytes).ok();
        Self { bytes, format }
    }

    /// Parse a `data:<mime>;base64,<payload>` URL.
    pub fn from_data_url(url: &str) -> Result<Self> {
        let rest = url
            .trim()
            .strip_prefix("data:")
            .ok_or_else(|| PaperscanError::InvalidDataUrl("missing `data:` scheme".into()))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| PaperscanError::InvalidDataUrl("missing `,` separator".into()))?;
        if !header.ends_with(";base64") {
            return Err(PaperscanError::InvalidDataUrl(
                "only base64 payloads are supported".into(),
            ));
        }
        let bytes = general_purpose::STANDARD
            .decode(payload)
            .map_err(|err| PaperscanError::InvalidDataUrl(format!("bad base64 payload: {err}")))?;
        Ok(Self::from_bytes(bytes))
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn format(&self) -> Option<ImageFormat> {
        self.format
    }

    /// MIME type of the sniffed format.
    pub fn mime_type(&self) -> &'static str {
        self.format
            .map(|f| f.to_mime_type())
            .unwrap_or("application/octet-stream")
    }

    /// Render as a base64 data URL.
    pub fn to_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime_type(),
            general_purpose::STANDARD.encode(&self.bytes)
        )
    }

    /// Decode into pixels.
    pub fn decode(&self) -> Result<DynamicImage> {
        image::load_from_memory(&self.bytes)
            .map_err(|err| PaperscanError::ImageError(format!("failed to decode image: {err}")))
    }
}

/// Encode an RGBA buffer as PNG.
#[instrument(skip_all, fields(width = image.width(), height = image.height()))]
pub fn serialize(image: &RgbaImage) -> Result<EncodedImage> {
    let mut buffer = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut buffer);
    image.write_to(&mut cursor, ImageFormat::Png).map_err(|err| {
        PaperscanError::ImageError(format!("PNG encoding failed: {err}"))
    })?;
    debug!(bytes = buffer.len(), "Image serialised");
    Ok(EncodedImage {
        bytes: buffer,
        format: Some(ImageFormat::Png),
    })
}

/// Largest size with the source aspect ratio that fits inside the target box.
pub fn fitted_size(source: (u32, u32), target: (u32, u32)) -> (u32, u32) {
    let (sw, sh) = (source.0.max(1) as f64, source.1.max(1) as f64);
    let scale = (target.0 as f64 / sw).min(target.1 as f64 / sh);
    let width = ((sw * scale).round() as u32).clamp(1, target.0.max(1));
    let height = ((sh * scale).round() as u32).clamp(1, target.1.max(1));
    (width, height)
}

/// Scale `image` to fit a `target_width` x `target_height` canvas, centred,
/// leaving the margins fully transparent.
pub fn fit_letterboxed(image: &DynamicImage, target_width: u32, target_height: u32) -> Result<RgbaImage> {
    if target_width == 0 || target_height == 0 {
        return Err(PaperscanError::InvalidDimensions {
            width: target_width,
            height: target_height,
        });
    }

    let mut canvas = RgbaImage::new(target_width, target_height);
    if image.width() == 0 || image.height() == 0 {
        return Ok(canvas);
    }

    let (fit_w, fit_h) = fitted_size(
        (image.width(), image.height()),
        (target_width, target_height),
    );
    let scaled = imageops::resize(&image.to_rgba8(), fit_w, fit_h, FilterType::Triangle);
    let offset_x = (target_width - fit_w) / 2;
    let offset_y = (target_height - fit_h) / 2;
    imageops::replace(&mut canvas, &scaled, offset_x as i64, offset_y as i64);

    debug!(fit_w, fit_h, offset_x, offset_y, "Image letterboxed");
    Ok(canvas)
}

/// Decode `source` and letterbox it into a `target_width` x `target_height`
/// RGBA buffer.
///
/// Decoding runs on the blocking thread pool so the calling executor thread
/// stays responsive. There is no timeout; wrap the call in
/// `tokio::time::timeout` if latency must be bounded. Dropping the future
/// discards the result without side effects.
#[instrument(skip(source), fields(bytes = source.bytes().len()))]
pub async fn rasterize(
    source: EncodedImage,
    target_width: u32,
    target_height: u32,
) -> Result<RgbaImage> {
    if target_width == 0 || target_height == 0 {
        return Err(PaperscanError::InvalidDimensions {
            width: target_width,
            height: target_height,
        });
    }

    let fitted = tokio::task::spawn_blocking(move || {
        let decoded = source.decode()?;
        fit_letterboxed(&decoded, target_width, target_height)
    })
    .await
    .map_err(|err| PaperscanError::TaskFailed(err.to_string()))??;

    info!(target_width, target_height, "Image rasterized");
    Ok(fitted)
}
