//! # Text Measurement
//!
//! Sections cannot know their row heights until cell text has been wrapped
//! at the width a column actually receives. This module is the measurement
//! collaborator: it reports advance widths and line heights, and breaks text
//! into lines at UAX#14 opportunities.

pub mod metrics;

pub use metrics::StandardMetrics;

use unicode_linebreak::{linebreaks, BreakOpportunity};

/// Font measurement used by layout. Implementations must be deterministic:
/// measuring the same text twice must give the same answer.
pub trait TextMeasure {
    /// Advance width of `text` in points.
    fn text_width(&self, text: &str, font_size: f64, bold: bool) -> f64;

    /// Distance between consecutive baselines.
    fn line_height(&self, font_size: f64) -> f64;

    /// Distance from the top of a line box to its baseline.
    fn ascent(&self, font_size: f64) -> f64;
}

/// Break `text` into lines no wider than `max_width`.
///
/// Mandatory breaks (newlines) always split. A single word wider than
/// `max_width` is kept whole on its own line. Empty text yields one empty
/// line so that a blank cell still occupies a line of height.
pub fn wrap_text(
    measure: &dyn TextMeasure,
    text: &str,
    font_size: f64,
    bold: bool,
    max_width: f64,
) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut last = 0;

    for (offset, opportunity) in linebreaks(text) {
        let segment = &text[last..offset];
        last = offset;

        let candidate = format!("{}{}", current, segment);
        let fits = measure.text_width(candidate.trim_end(), font_size, bold) <= max_width;
        if fits || current.is_empty() {
            current = candidate;
        } else {
            lines.push(current.trim_end().to_string());
            current = segment.to_string();
        }

        if opportunity == BreakOpportunity::Mandatory && offset < text.len() {
            lines.push(current.trim_end().to_string());
            current.clear();
        }
    }

    let tail = current.trim_end();
    if !tail.is_empty() || lines.is_empty() {
        lines.push(tail.to_string());
    }
    lines
}
