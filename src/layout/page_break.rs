//! # Page Break Decisions
//!
//! When a row group overflows its page, each member section is examined on
//! its own: how much space does it need at minimum, and how many of its
//! remaining rows fit in the space that is left?

use crate::section::Section;

/// Snapshot of one section taken while deciding where to break.
#[derive(Debug, Clone, PartialEq)]
pub struct PageState {
    pub key: String,
    pub overhead: f64,
    pub heights: Vec<f64>,
    /// First row of the current draw range.
    pub start: usize,
    /// Header plus the next row, or just the header if no row is left.
    pub minimum: f64,
}

/// Outcome of fitting a section into the space left on a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fit {
    /// Every remaining row fits.
    All,
    /// Only rows before `end_before` fit. At least one row is always taken,
    /// even when it alone is too tall for the space.
    Cut { end_before: usize },
}

impl PageState {
    pub fn new(section: &dyn Section) -> Self {
        let overhead = section.overhead_height();
        let heights = section.row_heights().to_vec();
        let start = section.draw_range().start;
        let minimum = match heights.get(start) {
            Some(first) => overhead + first,
            None => overhead,
        };
        Self {
            key: section.key().to_string(),
            overhead,
            heights,
            start,
            minimum,
        }
    }

    /// Walk the rows from `start` and find where `remaining` runs out.
    pub fn fit(&self, remaining: f64) -> Fit {
        let mut allowed = remaining - self.overhead;
        for (i, h) in self.heights.iter().enumerate().skip(self.start) {
            allowed -= h;
            if allowed < 0.0 {
                return Fit::Cut {
                    end_before: i.max(self.start + 1),
                };
            }
        }
        Fit::All
    }
}
