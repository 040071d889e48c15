//! # Drawing Surface
//!
//! Pages draw themselves through the [`Canvas`] trait so the same page tree
//! feeds both the PDF writer and the rasterizer. Coordinates are in points
//! with a top-left origin.

pub mod theme;

pub use theme::{LiveTheme, Palette, ThemeMode, ThemeOverride, ThemeService};

use crate::style::{Color, Rect};

pub trait Canvas {
    fn fill_rect(&mut self, rect: Rect, color: Color);

    fn stroke_rect(&mut self, rect: Rect, width: f64, color: Color);

    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, width: f64, color: Color);

    /// Draw a single line of text with its baseline at `baseline`.
    fn text(
        &mut self,
        x: f64,
        baseline: f64,
        text: &str,
        font_size: f64,
        bold: bool,
        color: Color,
    );
}

/// One recorded canvas operation.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    FillRect(Rect, Color),
    StrokeRect(Rect, f64, Color),
    Line {
        from: (f64, f64),
        to: (f64, f64),
        width: f64,
        color: Color,
    },
    Text {
        x: f64,
        baseline: f64,
        text: String,
        font_size: f64,
        bold: bool,
        color: Color,
    },
}

/// A canvas that only remembers what was drawn. Useful for inspecting page
/// output without encoding it.
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    pub ops: Vec<DrawOp>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// All text drawn so far, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Canvas for RecordingCanvas {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.ops.push(DrawOp::FillRect(rect, color));
    }

    fn stroke_rect(&mut self, rect: Rect, width: f64, color: Color) {
        self.ops.push(DrawOp::StrokeRect(rect, width, color));
    }

    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, width: f64, color: Color) {
        self.ops.push(DrawOp::Line {
            from: (x1, y1),
            to: (x2, y2),
            width,
            color,
        });
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
        self.ops.push(DrawOp::Text {
            x,
            baseline,
            text: text.to_string(),
            font_size,
            bold,
            color,
        });
    }
}
