//! # Rasterizer
//!
//! Paints pages into an RGBA bitmap. The page geometry is in points, so
//! every coordinate is multiplied by `dpi / 72` on the way in. Text uses a
//! small built-in bitmap face but advances by the same font widths the
//! layout measured with, so line breaks and column alignment match the PDF.

pub mod encode;
mod glyphs;

pub use encode::{JpegOutput, PngOutput, RasterEncoder, WebpOutput};

use image::{Rgba, RgbaImage};

use crate::render::Canvas;
use crate::style::{Color, Rect, Size};
use crate::text::StandardMetrics;

const POINTS_PER_INCH: f64 = 72.0;

/// Height of one glyph row as a fraction of the font size. Seven rows come
/// to roughly the cap height of the standard fonts.
const ROW_EM: f64 = 0.1;

pub struct RasterCanvas {
    image: RgbaImage,
    scale: f64,
}

impl RasterCanvas {
    /// A blank (transparent) bitmap for a page of `size` points at `dpi`.
    pub fn new(size: Size, dpi: u32) -> Self {
        let scale = f64::from(dpi.max(1)) / POINTS_PER_INCH;
        let width = ((size.width * scale).round() as u32).max(1);
        let height = ((size.height * scale).round() as u32).max(1);
        Self {
            image: RgbaImage::new(width, height),
            scale,
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Fill a box given in device pixels, clipped to the bitmap.
    fn fill_pixels(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, color: Color) {
        let (w, h) = (self.image.width() as f64, self.image.height() as f64);
        let x0 = x0.round().clamp(0.0, w) as u32;
        let y0 = y0.round().clamp(0.0, h) as u32;
        let x1 = x1.round().clamp(0.0, w) as u32;
        let y1 = y1.round().clamp(0.0, h) as u32;
        let [r, g, b] = color.to_rgb8();
        let pixel = Rgba([r, g, b, 255]);
        for y in y0..y1 {
            for x in x0..x1 {
                self.image.put_pixel(x, y, pixel);
            }
        }
    }

    /// Fill a box given in points, at least one pixel in each direction.
    fn fill_points(&mut self, x: f64, y: f64, width: f64, height: f64, color: Color) {
        let s = self.scale;
        let x0 = x * s;
        let y0 = y * s;
        let x1 = (x0 + width * s).max(x0.round() + 1.0);
        let y1 = (y0 + height * s).max(y0.round() + 1.0);
        self.fill_pixels(x0, y0, x1, y1, color);
    }
}

impl Canvas for RasterCanvas {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let s = self.scale;
        self.fill_pixels(rect.x * s, rect.y * s, rect.right() * s, rect.bottom() * s, color);
    }

    fn stroke_rect(&mut self, rect: Rect, width: f64, color: Color) {
        let half = width / 2.0;
        let (x, y) = (rect.x - half, rect.y - half);
        self.fill_points(x, y, rect.width + width, width, color);
        self.fill_points(x, rect.bottom() - half, rect.width + width, width, color);
        self.fill_points(x, y, width, rect.height + width, color);
        self.fill_points(rect.right() - half, y, width, rect.height + width, color);
    }

    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, width: f64, color: Color) {
        let half = width / 2.0;
        if y1 == y2 {
            self.fill_points(x1.min(x2), y1 - half, (x2 - x1).abs(), width, color);
        } else if x1 == x2 {
            self.fill_points(x1 - half, y1.min(y2), width, (y2 - y1).abs(), color);
        } else {
            let s = self.scale;
            let steps = ((x2 - x1).abs().max((y2 - y1).abs()) * s).ceil().max(1.0) as usize;
            for i in 0..=steps {
                let t = i as f64 / steps as f64;
                let x = x1 + (x2 - x1) * t;
                let y = y1 + (y2 - y1) * t;
                self.fill_points(x - half, y - half, width, width, color);
            }
        }
    }

    fn text(
        &mut self,
        x: f64,
        baseline: f64,
        text: &str,
        font_size: f64,
        bold: bool,
        color: Color,
    ) {
        let unit = font_size * ROW_EM;
        let top = baseline - glyphs::ROWS as f64 * unit;
        // Bold is a second pass shifted right by half a glyph column.
        let dot_width = if bold { unit * 1.5 } else { unit };
        let mut pen = x;
        for ch in text.chars() {
            let advance = f64::from(StandardMetrics::char_units(ch, bold)) * font_size / 1000.0;
            // Centre the cell within the advance so narrow glyphs stay put.
            let left = pen + ((advance - glyphs::COLS as f64 * unit) / 2.0).max(0.0);
            for col in 0..glyphs::COLS {
                for row in 0..glyphs::ROWS {
                    if glyphs::is_set(ch, col, row) {
                        self.fill_points(
                            left + col as f64 * unit,
                            top + row as f64 * unit,
                            dot_width,
                            unit,
                            color,
                        );
                    }
                }
            }
            pen += advance;
        }
    }
}
