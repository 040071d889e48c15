//! # Page Provider
//!
//! The surface renderers consume: ask whether a page exists, how big pages
//! are, and have a page draw itself onto a canvas. Page numbers are
//! 1-based.

use crate::error::Error;
use crate::layout::{LayoutContext, Page};
use crate::render::{Canvas, Palette, ThemeMode};
use crate::style::Size;

pub trait PageProvider {
    /// True iff `1 <= page_number <= page count`.
    fn has_page(&self, page_number: usize) -> bool;

    /// Physical page size in points, the same for every page.
    fn page_size(&self) -> Size;

    /// Draw page `page_number`. Out-of-range numbers are an error and leave
    /// the canvas untouched.
    fn draw_page(&self, canvas: &mut dyn Canvas, page_number: usize) -> Result<(), Error>;
}

/// Paginated pages plus everything needed to draw them.
pub struct PagedDocument {
    pages: Vec<Page>,
    size: Size,
    ctx: LayoutContext,
    palette: Palette,
}

impl PagedDocument {
    pub fn new(pages: Vec<Page>, size: Size, ctx: LayoutContext) -> Self {
        Self {
            pages,
            size,
            ctx,
            palette: Palette::for_mode(ThemeMode::Light),
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Colours used by subsequent draws.
    pub fn set_palette(&mut self, palette: Palette) {
        self.palette = palette;
    }

    pub fn palette(&self) -> Palette {
        self.palette
    }
}

impl PageProvider for PagedDocument {
    fn has_page(&self, page_number: usize) -> bool {
        page_number > 0 && page_number <= self.pages.len()
    }

    fn page_size(&self) -> Size {
        self.size
    }

    fn draw_page(&self, canvas: &mut dyn Canvas, page_number: usize) -> Result<(), Error> {
        if !self.has_page(page_number) {
            return Err(Error::InvalidPage {
                page: page_number,
                count: self.pages.len(),
            });
        }
        let page = &self.pages[page_number - 1];
        page.draw(canvas, page_number, self.pages.len(), &self.ctx, &self.palette);
        Ok(())
    }
}
