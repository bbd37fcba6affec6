// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Paper outline overlay — strokes the detected quadrilateral onto a
// drawing surface.

use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_line_segment_mut, draw_polygon_mut};
use imageproc::point::Point as PixelPoint;
use paperscan_core::error::{PaperscanError, Result};
use paperscan_core::{CornerSet, HighlightConfig, Point};
use tracing::{debug, instrument};

/// Colour and width of an outline stroke.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub color: Rgba<u8>,
    /// Line width in pixels.
    pub thickness: f32,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: Rgba([255, 165, 0, 255]),
            thickness: 10.0,
        }
    }
}

impl StrokeStyle {
    pub fn new(color: Rgba<u8>, thickness: f32) -> Self {
        Self { color, thickness }
    }

    pub fn from_config(config: &HighlightConfig) -> Result<Self> {
        Ok(Self {
            color: parse_color(&config.color)?,
            thickness: config.thickness,
        })
    }
}

/// Parse a colour name (`orange`, `red`, ...) or a `#rgb`, `#rrggbb` or
/// `#rrggbbaa` hex string.
pub fn parse_color(input: &str) -> Result<Rgba<u8>> {
    let value = input.trim().to_ascii_lowercase();
    if let Some(hex) = value.strip_prefix('#') {
        return parse_hex(hex).ok_or_else(|| PaperscanError::InvalidColor(input.to_string()));
    }

    let rgb = match value.as_str() {
        "orange" => [255, 165, 0],
        "red" => [255, 0, 0],
        "green" => [0, 128, 0],
        "lime" => [0, 255, 0],
        "blue" => [0, 0, 255],
        "yellow" => [255, 255, 0],
        "cyan" | "aqua" => [0, 255, 255],
        "magenta" | "fuchsia" => [255, 0, 255],
        "purple" => [128, 0, 128],
        "white" => [255, 255, 255],
        "black" => [0, 0, 0],
        "gray" | "grey" => [128, 128, 128],
        _ => return Err(PaperscanError::InvalidColor(input.to_string())),
    };
    Ok(Rgba([rgb[0], rgb[1], rgb[2], 255]))
}

fn parse_hex(hex: &str) -> Option<Rgba<u8>> {
    if !hex.is_ascii() {
        return None;
    }
    let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    let nibble = |i: usize| {
        u8::from_str_radix(hex.get(i..i + 1)?, 16)
            .ok()
            .map(|n| n * 17)
    };
    match hex.len() {
        3 => Some(Rgba([nibble(0)?, nibble(1)?, nibble(2)?, 255])),
        6 => Some(Rgba([byte(0)?, byte(2)?, byte(4)?, 255])),
        8 => Some(Rgba([byte(0)?, byte(2)?, byte(4)?, byte(6)?])),
        _ => None,
    }
}

/// A canvas-like target that accepts stroked paths.
///
/// Host UIs implement this over their own canvas; [`ImageSurface`] draws
/// into an [`RgbaImage`].
pub trait DrawingSurface {
    fn set_stroke_style(&mut self, style: &StrokeStyle);
    fn begin_path(&mut self);
    fn move_to(&mut self, point: Point);
    fn line_to(&mut self, point: Point);
    fn stroke(&mut self);
}

/// Stroke the closed outline `TL -> TR -> BR -> BL -> TL` onto `surface`.
pub fn draw_outline<S: DrawingSurface + ?Sized>(
    surface: &mut S,
    corners: &CornerSet,
    style: &StrokeStyle,
) {
    surface.set_stroke_style(style);
    surface.begin_path();
    surface.move_to(corners.top_left);
    surface.line_to(corners.top_right);
    surface.line_to(corners.bottom_right);
    surface.line_to(corners.bottom_left);
    surface.line_to(corners.top_left);
    surface.stroke();
}

/// [`DrawingSurface`] backed by an RGBA image.
pub struct ImageSurface<'a> {
    image: &'a mut RgbaImage,
    style: StrokeStyle,
    subpaths: Vec<Vec<Point>>,
}

impl<'a> ImageSurface<'a> {
    pub fn new(image: &'a mut RgbaImage) -> Self {
        Self {
            image,
            style: StrokeStyle::default(),
            subpaths: Vec::new(),
        }
    }

    fn stroke_segment(&mut self, a: Point, b: Point) {
        let half = self.style.thickness / 2.0;
        if half <= 0.75 {
            draw_line_segment_mut(
                &mut *self.image,
                (a.x as f32, a.y as f32),
                (b.x as f32, b.y as f32),
                self.style.color,
            );
            return;
        }

        let len = a.distance(&b);
        if len > 0.0 {
            let nx = -(b.y - a.y) / len * half as f64;
            let ny = (b.x - a.x) / len * half as f64;
            let corner = |p: Point, sign: f64| {
                PixelPoint::new(
                    (p.x + sign * nx).round() as i32,
                    (p.y + sign * ny).round() as i32,
                )
            };
            let quad = [corner(a, 1.0), corner(b, 1.0), corner(b, -1.0), corner(a, -1.0)];
            if quad[0] != quad[3] {
                draw_polygon_mut(&mut *self.image, &quad, self.style.color);
            }
        }
    }

    fn stroke_join(&mut self, p: Point) {
        let half = self.style.thickness / 2.0;
        if half > 0.75 {
            draw_filled_circle_mut(
                &mut *self.image,
                (p.x.round() as i32, p.y.round() as i32),
                half.round() as i32,
                self.style.color,
            );
        }
    }
}

impl DrawingSurface for ImageSurface<'_> {
    fn set_stroke_style(&mut self, style: &StrokeStyle) {
        self.style = *style;
    }

    fn begin_path(&mut self) {
        self.subpaths.clear();
    }

    fn move_to(&mut self, point: Point) {
        self.subpaths.push(vec![point]);
    }

    fn line_to(&mut self, point: Point) {
        match self.subpaths.last_mut() {
            Some(subpath) => subpath.push(point),
            None => self.subpaths.push(vec![point]),
        }
    }

    fn stroke(&mut self) {
        if self.style.thickness <= 0.0 {
            return;
        }
        let subpaths = std::mem::take(&mut self.subpaths);
        for subpath in &subpaths {
            for pair in subpath.windows(2) {
                self.stroke_segment(pair[0], pair[1]);
            }
            if subpath.len() > 1 {
                for &p in subpath {
                    self.stroke_join(p);
                }
            }
        }
        self.subpaths = subpaths;
    }
}

/// Copy of `image` with the quadrilateral `corners` outlined.
#[instrument(skip(image), fields(width = image.width(), height = image.height()))]
pub fn highlight(image: &RgbaImage, corners: &CornerSet, style: &StrokeStyle) -> RgbaImage {
    let mut canvas = image.clone();
    draw_outline(&mut ImageSurface::new(&mut canvas), corners, style);
    debug!("Paper outline drawn");
    canvas
}
