// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Subcommand handlers.

use std::path::Path;

use image::{DynamicImage, ImageFormat, RgbaImage};
use paperscan_core::error::{PaperscanError, Result};
use paperscan_core::{CornerSet, ScanConfig};
use paperscan_vision::render::parse_color;
use paperscan_vision::{EncodedImage, PaperScanner, StrokeStyle, rasterize};
use tracing::{info, instrument};

/// Detect corners and return them as pretty JSON, optionally saving a copy.
#[instrument(skip(config))]
pub fn detect(image: &Path, config: &ScanConfig, out: Option<&Path>) -> Result<String> {
    let scanner = PaperScanner::open(image)?.with_detection(config.detection);
    let corners = scanner.detect_corners()?;
    let json = serde_json::to_string_pretty(&corners)?;
    if let Some(out) = out {
        std::fs::write(out, &json)?;
        info!(path = %out.display(), "Corners written");
    }
    Ok(json)
}

#[instrument(skip(config))]
pub fn crop(image: &Path, output: &Path, corners: Option<&Path>, config: &ScanConfig) -> Result<()> {
    let scanner = PaperScanner::open(image)?.with_detection(config.detection);
    let corners = resolve_corners(&scanner, corners)?;
    let page = scanner.extract_paper(&corners)?;
    save_image(&page, output)
}

#[instrument(skip(config))]
pub fn highlight(
    image: &Path,
    output: &Path,
    corners: Option<&Path>,
    color: Option<&str>,
    thickness: Option<f32>,
    config: &ScanConfig,
) -> Result<()> {
    let mut style = StrokeStyle::from_config(&config.highlight)?;
    if let Some(color) = color {
        style.color = parse_color(color)?;
    }
    if let Some(thickness) = thickness {
        style.thickness = thickness;
    }

    let scanner = PaperScanner::open(image)?.with_detection(config.detection);
    let corners = resolve_corners(&scanner, corners)?;
    save_image(&scanner.highlight(&corners, &style), output)
}

#[instrument]
pub async fn fit(image: &Path, output: &Path, width: u32, height: u32) -> Result<()> {
    let bytes = tokio::fs::read(image).await?;
    let fitted = rasterize(EncodedImage::from_bytes(bytes), width, height).await?;
    save_image(&fitted, output)
}

/// Corners from a JSON file when given, otherwise detected.
fn resolve_corners(scanner: &PaperScanner, corners: Option<&Path>) -> Result<CornerSet> {
    match corners {
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            Ok(serde_json::from_str(&text)?)
        }
        None => scanner.detect_corners(),
    }
}

/// Save in the format implied by the extension. JPEG drops the alpha channel.
fn save_image(image: &RgbaImage, path: &Path) -> Result<()> {
    let result = match ImageFormat::from_path(path) {
        Ok(ImageFormat::Jpeg) => DynamicImage::ImageRgba8(image.clone()).to_rgb8().save(path),
        _ => image.save(path),
    };
    result.map_err(|err| {
        PaperscanError::ImageError(format!("failed to save {}: {}", path.display(), err))
    })?;
    info!(
        path = %path.display(),
        width = image.width(),
        height = image.height(),
        "Image saved"
    );
    Ok(())
}
