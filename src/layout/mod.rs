//! # Page Layout
//!
//! Pages are fixed-size frames holding an optional top block followed by
//! row groups, each row group a horizontal band of sections. Heights are
//! only known after a measurement pass, so pages cache their geometry and
//! re-measure when marked dirty or forced.
//!
//! ```text
//! ┌──────────── frame ────────────┐
//! │ margins                       │
//! │ ┌ top block (first page) ───┐ │
//! │ ├ row group ─┬─ row group ──┤ │
//! │ │ section    │ section      │ │
//! │ ├ row group ────────────────┤ │
//! │ └───────────────────────────┘ │
//! │ footer        Page 1 of 3     │
//! └───────────────────────────────┘
//! ```

pub mod group;
pub mod page;
pub mod page_break;
pub mod paginator;
pub mod top;

pub use group::RowGroup;
pub use page::{Footer, Page, PageTemplate};
pub use page_break::PageState;
pub use paginator::Paginator;
pub use top::TopPanel;

use std::rc::Rc;

use crate::config::ExportSettings;
use crate::text::{StandardMetrics, TextMeasure};

/// Vertical gap between the blocks stacked on a page.
pub const BLOCK_SPACING: f64 = 1.0;

/// What every measurement and draw call needs to know about text.
#[derive(Clone)]
pub struct LayoutContext {
    pub measure: Rc<dyn TextMeasure>,
    pub font_size: f64,
    pub header_font_size: f64,
}

impl LayoutContext {
    pub fn new(settings: &ExportSettings) -> Self {
        Self::with_measure(settings, Rc::new(StandardMetrics::new()))
    }

    pub fn with_measure(settings: &ExportSettings, measure: Rc<dyn TextMeasure>) -> Self {
        Self {
            measure,
            font_size: settings.font_size,
            header_font_size: settings.header_font_size,
        }
    }
}

impl std::fmt::Debug for LayoutContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutContext")
            .field("font_size", &self.font_size)
            .field("header_font_size", &self.header_font_size)
            .finish_non_exhaustive()
    }
}
