//! A single fixed-size page.

use super::{LayoutContext, RowGroup, TopPanel, BLOCK_SPACING};
use crate::render::{Canvas, Palette};
use crate::style::{Edges, Rect, Size};

const FOOTER_GAP: f64 = 2.0;

/// What every page of one export shares.
#[derive(Debug, Clone)]
pub struct PageTemplate {
    pub frame: Size,
    /// Space reserved around the content, footer band included.
    pub insets: Edges,
    pub footer: Option<Footer>,
}

impl PageTemplate {
    pub fn new(frame: Size, insets: Edges) -> Self {
        Self {
            frame,
            insets,
            footer: None,
        }
    }

    /// Attach a footer, growing the bottom inset to make room for it.
    pub fn with_footer(mut self, footer: Footer, ctx: &LayoutContext) -> Self {
        self.insets.bottom += Footer::band_height(ctx);
        self.footer = Some(footer);
        self
    }
}

/// Footer text drawn on every page; the page number goes on the right.
#[derive(Debug, Clone, Default)]
pub struct Footer {
    pub left: String,
    pub center: Option<String>,
}

impl Footer {
    pub fn band_height(ctx: &LayoutContext) -> f64 {
        ctx.measure.line_height(ctx.font_size) + FOOTER_GAP
    }
}

pub struct Page {
    template: PageTemplate,
    top: Option<TopPanel>,
    groups: Vec<RowGroup>,
    /// Ignore cached geometry on every layout pass.
    pub force: bool,
    dirty: bool,
    top_height: f64,
    group_ys: Vec<f64>,
    preferred_height: f64,
}

impl Page {
    pub fn new(template: &PageTemplate, top: Option<TopPanel>) -> Self {
        Self {
            template: template.clone(),
            top,
            groups: Vec::new(),
            force: false,
            dirty: true,
            top_height: 0.0,
            group_ys: Vec::new(),
            preferred_height: 0.0,
        }
    }

    pub fn frame(&self) -> Size {
        self.template.frame
    }

    /// Lowest y content may reach.
    pub fn content_bottom(&self) -> f64 {
        self.template.frame.height - self.template.insets.bottom
    }

    fn content_width(&self) -> f64 {
        (self.template.frame.width - self.template.insets.horizontal()).max(0.0)
    }

    pub fn groups(&self) -> &[RowGroup] {
        &self.groups
    }

    pub fn last_group_mut(&mut self) -> Option<&mut RowGroup> {
        self.groups.last_mut()
    }

    pub fn add_group(&mut self, group: RowGroup) {
        self.groups.push(group);
        self.dirty = true;
    }

    pub fn remove_last_group(&mut self) -> Option<RowGroup> {
        self.dirty = true;
        self.groups.pop()
    }

    /// Whether anything besides the most recent row group occupies space.
    pub fn has_content_above_last_group(&self) -> bool {
        self.top_height > 0.0 || self.groups.len() > 1
    }

    pub fn mark_for_layout(&mut self) {
        self.dirty = true;
    }

    /// Measure everything on the page, unless the cached geometry is still
    /// valid and the page is not forced.
    pub fn validate_layout(&mut self, ctx: &LayoutContext) {
        if !self.dirty && !self.force {
            return;
        }
        let width = self.content_width();
        let insets = self.template.insets;
        let mut y = insets.top;
        let mut blocks = 0;

        self.top_height = match self.top.as_mut() {
            Some(top) => top.layout(width, ctx),
            None => 0.0,
        };
        if self.top_height > 0.0 {
            y += self.top_height;
            blocks += 1;
        }

        self.group_ys.clear();
        for group in &mut self.groups {
            if blocks > 0 {
                y += BLOCK_SPACING;
            }
            self.group_ys.push(y);
            y += group.layout(width, ctx);
            blocks += 1;
        }

        self.preferred_height = y + insets.bottom;
        self.dirty = false;
    }

    /// Total height the page would like, insets included.
    pub fn preferred_height(&self) -> f64 {
        self.preferred_height
    }

    pub fn fits(&self) -> bool {
        self.preferred_height <= self.template.frame.height
    }

    /// Top edge of the group at `index`, as of the last layout pass.
    pub fn group_y(&self, index: usize) -> Option<f64> {
        self.group_ys.get(index).copied()
    }

    /// Vertical space from the top of the last group to the content bottom.
    pub fn remaining_for_last_group(&self) -> f64 {
        let y = self
            .group_ys
            .last()
            .copied()
            .unwrap_or(self.template.insets.top);
        self.content_bottom() - y
    }

    pub fn draw(
        &self,
        canvas: &mut dyn Canvas,
        number: usize,
        count: usize,
        ctx: &LayoutContext,
        palette: &Palette,
    ) {
        let frame = self.template.frame;
        let insets = self.template.insets;
        let width = self.content_width();
        canvas.fill_rect(Rect::new(0.0, 0.0, frame.width, frame.height), palette.page);

        if let Some(top) = &self.top {
            top.draw(
                canvas,
                Rect::new(insets.left, insets.top, width, self.top_height),
                ctx,
                palette,
            );
        }
        for (group, y) in self.groups.iter().zip(&self.group_ys) {
            group.draw(canvas, Rect::new(insets.left, *y, width, group.height()), ctx, palette);
        }

        if let Some(footer) = &self.template.footer {
            self.draw_footer(canvas, footer, number, count, ctx, palette);
        }
    }

    fn draw_footer(
        &self,
        canvas: &mut dyn Canvas,
        footer: &Footer,
        number: usize,
        count: usize,
        ctx: &LayoutContext,
        palette: &Palette,
    ) {
        let measure = ctx.measure.as_ref();
        let insets = self.template.insets;
        let width = self.content_width();
        let baseline = self.content_bottom() + FOOTER_GAP + measure.ascent(ctx.font_size);

        canvas.text(insets.left, baseline, &footer.left, ctx.font_size, false, palette.text);
        if let Some(center) = &footer.center {
            let w = measure.text_width(center, ctx.font_size, false);
            canvas.text(
                insets.left + (width - w).max(0.0) / 2.0,
                baseline,
                center,
                ctx.font_size,
                false,
                palette.text,
            );
        }
        let label = format!("Page {} of {}", number, count);
        let w = measure.text_width(&label, ctx.font_size, false);
        canvas.text(insets.left + width - w, baseline, &label, ctx.font_size, false, palette.text);
    }
}
