//! A horizontal band of sections sharing the width equally.

use super::LayoutContext;
use crate::render::{Canvas, Palette};
use crate::section::Section;
use crate::style::Rect;

/// Horizontal gap between neighbouring sections.
const COLUMN_SPACING: f64 = 1.0;

pub struct RowGroup {
    members: Vec<Box<dyn Section>>,
    height: f64,
}

impl RowGroup {
    pub fn new(members: Vec<Box<dyn Section>>) -> Self {
        Self {
            members,
            height: 0.0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn members(&self) -> &[Box<dyn Section>] {
        &self.members
    }

    pub fn members_mut(&mut self) -> &mut [Box<dyn Section>] {
        &mut self.members
    }

    /// Measured height: the tallest member.
    pub fn height(&self) -> f64 {
        self.height
    }

    fn column_width(&self, width: f64) -> f64 {
        let n = self.members.len().max(1) as f64;
        ((width - COLUMN_SPACING * (n - 1.0)) / n).max(0.0)
    }

    /// Measure every member at its column width.
    pub fn layout(&mut self, width: f64, ctx: &LayoutContext) -> f64 {
        let column = self.column_width(width);
        self.height = self
            .members
            .iter_mut()
            .map(|m| {
                m.layout(column, ctx);
                m.preferred_height()
            })
            .fold(0.0, f64::max);
        self.height
    }

    pub fn draw(
        &self,
        canvas: &mut dyn Canvas,
        rect: Rect,
        ctx: &LayoutContext,
        palette: &Palette,
    ) {
        let column = self.column_width(rect.width);
        let mut x = rect.x;
        for member in &self.members {
            let h = member.preferred_height();
            member.draw(canvas, Rect::new(x, rect.y, column, h), ctx, palette);
            x += column + COLUMN_SPACING;
        }
    }
}
