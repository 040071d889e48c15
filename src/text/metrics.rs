//! Advance widths for the standard PDF Helvetica faces, in 1/1000 em.
//!
//! Only printable ASCII is tabulated; anything else measures as the face's
//! average lowercase width, which matches how the PDF writer substitutes
//! characters outside WinAnsi.

use super::TextMeasure;

const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
    278, 278, 584, 584, 584, 556, 1015, // ':'..'@'
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // 'A'..'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N'..'Z'
    278, 278, 278, 469, 556, 333, // '['..'`'
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // 'a'..'m'
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // 'n'..'z'
    334, 260, 334, 584, // '{'..'~'
];

const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    333, 333, 584, 584, 584, 611, 975,
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    333, 278, 333, 584, 556, 333,
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
    389, 280, 389, 584,
];

const FALLBACK_WIDTH: u16 = 556;

/// Helvetica ascender and descender, in 1/1000 em.
const ASCENT: f64 = 718.0;
const DESCENT: f64 = 207.0;

/// Measures text with the standard Helvetica / Helvetica-Bold metrics.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardMetrics;

impl StandardMetrics {
    pub fn new() -> Self {
        Self
    }

    /// Advance width of a single character in 1/1000 em.
    pub fn char_units(ch: char, bold: bool) -> u16 {
        let table = if bold { &HELVETICA_BOLD } else { &HELVETICA };
        let code = ch as u32;
        if (32..=126).contains(&code) {
            table[(code - 32) as usize]
        } else {
            FALLBACK_WIDTH
        }
    }
}

impl TextMeasure for StandardMetrics {
    fn text_width(&self, text: &str, font_size: f64, bold: bool) -> f64 {
        let units: u32 = text
            .chars()
            .map(|ch| Self::char_units(ch, bold) as u32)
            .sum();
        units as f64 * font_size / 1000.0
    }

    fn line_height(&self, font_size: f64) -> f64 {
        ((ASCENT + DESCENT) / 1000.0 * font_size).ceil()
    }

    fn ascent(&self, font_size: f64) -> f64 {
        ASCENT / 1000.0 * font_size
    }
}
