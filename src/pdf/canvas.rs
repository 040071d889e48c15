//! A [`Canvas`] that records PDF content-stream operators.

use std::fmt::Write as FmtWrite;

use crate::render::Canvas;
use crate::style::{Color, Rect};

/// Resource names of the two standard fonts every page references.
pub(super) const REGULAR_FONT: &str = "F1";
pub(super) const BOLD_FONT: &str = "F2";

pub struct PdfCanvas {
    page_height: f64,
    stream: String,
}

impl PdfCanvas {
    pub fn new(page_height: f64) -> Self {
        Self {
            page_height,
            stream: String::new(),
        }
    }

    /// The content stream written so far.
    pub fn into_content(self) -> String {
        self.stream
    }

    fn flip(&self, y: f64) -> f64 {
        self.page_height - y
    }
}

impl Canvas for PdfCanvas {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let y = self.flip(rect.bottom());
        let _ = write!(
            self.stream,
            "q\n{:.3} {:.3} {:.3} rg\n{:.2} {:.2} {:.2} {:.2} re\nf\nQ\n",
            color.r, color.g, color.b, rect.x, y, rect.width, rect.height
        );
    }

    fn stroke_rect(&mut self, rect: Rect, width: f64, color: Color) {
        let y = self.flip(rect.bottom());
        let _ = write!(
            self.stream,
            "q\n{:.3} {:.3} {:.3} RG\n{:.2} w\n{:.2} {:.2} {:.2} {:.2} re\nS\nQ\n",
            color.r, color.g, color.b, width, rect.x, y, rect.width, rect.height
        );
    }

    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, width: f64, color: Color) {
        let (y1, y2) = (self.flip(y1), self.flip(y2));
        let _ = write!(
            self.stream,
            "q\n{:.3} {:.3} {:.3} RG\n{:.2} w\n{:.2} {:.2} m\n{:.2} {:.2} l\nS\nQ\n",
            color.r, color.g, color.b, width, x1, y1, x2, y2
        );
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
        if text.is_empty() {
            return;
        }
        let font = if bold { BOLD_FONT } else { REGULAR_FONT };
        let y = self.flip(baseline);
        let _ = write!(
            self.stream,
            "BT\n{:.3} {:.3} {:.3} rg\n/{} {:.2} Tf\n{:.2} {:.2} Td\n({}) Tj\nET\n",
            color.r,
            color.g,
            color.b,
            font,
            font_size,
            x,
            y,
            encode_text(text)
        );
    }
}

/// Encode text as an escaped WinAnsi literal string body.
pub(super) fn encode_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '(' => out.push_str("\\("),
            ')' => out.push_str("\\)"),
            _ => match unicode_to_winansi(ch) {
                Some(b) if b.is_ascii() => out.push(b as char),
                Some(b) => {
                    let _ = write!(out, "\\{:03o}", b);
                }
                None => out.push('?'),
            },
        }
    }
    out
}

/// Map a Unicode codepoint to a WinAnsiEncoding byte value.
fn unicode_to_winansi(ch: char) -> Option<u8> {
    let cp = ch as u32;
    if (0x20..=0x7E).contains(&cp) || (0xA0..=0xFF).contains(&cp) {
        return Some(cp as u8);
    }
    match cp {
        0x20AC => Some(0x80), // Euro sign
        0x201A => Some(0x82),
        0x0192 => Some(0x83),
        0x201E => Some(0x84),
        0x2026 => Some(0x85), // Ellipsis
        0x2020 => Some(0x86),
        0x2021 => Some(0x87),
        0x02C6 => Some(0x88),
        0x2030 => Some(0x89),
        0x0160 => Some(0x8A),
        0x2039 => Some(0x8B),
        0x0152 => Some(0x8C),
        0x017D => Some(0x8E),
        0x2018 => Some(0x91), // Smart quotes
        0x2019 => Some(0x92),
        0x201C => Some(0x93),
        0x201D => Some(0x94),
        0x2022 => Some(0x95), // Bullet
        0x2013 => Some(0x96), // En dash
        0x2014 => Some(0x97), // Em dash
        0x02DC => Some(0x98),
        0x2122 => Some(0x99),
        0x0161 => Some(0x9A),
        0x203A => Some(0x9B),
        0x0153 => Some(0x9C),
        0x017E => Some(0x9E),
        0x0178 => Some(0x9F),
        _ => None,
    }
}
