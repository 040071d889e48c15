//! # Sections
//!
//! A section is one keyed content list (melee weapons, skills, notes, ...)
//! that can be measured at a given width and told to show only a slice of
//! its rows. The paginator never looks inside a section beyond this
//! contract, so any content kind placed in a column set has to implement
//! [`Section`].

pub mod registry;
pub mod table;

pub use registry::{SectionFactory, SectionRegistry};
pub use table::TableSection;

use std::ops::Range;

use crate::layout::LayoutContext;
use crate::render::{Canvas, Palette};
use crate::style::Rect;

pub trait Section {
    /// Stable key identifying the content kind within a column set.
    fn key(&self) -> &str;

    /// Number of data rows, known without measuring.
    fn row_count(&self) -> usize;

    /// Measurement pass at the given column width. Must run before
    /// [`Section::overhead_height`] and [`Section::row_heights`] are read.
    fn layout(&mut self, width: f64, ctx: &LayoutContext);

    /// Fixed chrome (title, column header, borders), independent of the
    /// draw range.
    fn overhead_height(&self) -> f64;

    /// Height of every row, including its separator. Empty until laid out.
    fn row_heights(&self) -> &[f64];

    /// Half-open range of rows currently shown.
    fn draw_range(&self) -> Range<usize>;

    fn set_draw_range(&mut self, range: Range<usize>);

    /// Height of the currently shown slice.
    fn preferred_height(&self) -> f64 {
        let heights = self.row_heights();
        let range = self.draw_range();
        let end = range.end.min(heights.len());
        let start = range.start.min(end);
        self.overhead_height() + heights[start..end].iter().sum::<f64>()
    }

    fn draw(&self, canvas: &mut dyn Canvas, rect: Rect, ctx: &LayoutContext, palette: &Palette);
}
