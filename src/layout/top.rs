//! The fixed block at the top of the first page: a titled grid of
//! label/value fields.

use super::LayoutContext;
use crate::model::TopBlock;
use crate::render::{Canvas, Palette};
use crate::style::Rect;
use crate::text::wrap_text;

const BORDER: f64 = 1.0;
const PAD: f64 = 2.0;
const LABEL_GAP: f64 = 4.0;

pub struct TopPanel {
    block: TopBlock,
    title_height: f64,
    /// Per grid line: height, and per field the wrapped value lines.
    lines: Vec<(f64, Vec<Vec<String>>)>,
    height: f64,
}

impl TopPanel {
    pub fn new(block: TopBlock) -> Self {
        Self {
            block,
            title_height: 0.0,
            lines: Vec::new(),
            height: 0.0,
        }
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    fn columns(&self) -> usize {
        self.block.columns.max(1)
    }

    fn label_text(label: &str) -> String {
        format!("{}:", label)
    }

    pub fn layout(&mut self, width: f64, ctx: &LayoutContext) -> f64 {
        let measure = ctx.measure.as_ref();
        let columns = self.columns();
        let cell_w = ((width - 2.0 * BORDER) / columns as f64).max(0.0);
        let lh = measure.line_height(ctx.font_size);

        self.title_height = if self.block.title.is_empty() {
            0.0
        } else {
            measure.line_height(ctx.header_font_size) + 2.0 * PAD
        };

        self.lines = self
            .block
            .fields
            .chunks(columns)
            .map(|chunk| {
                let values: Vec<Vec<String>> = chunk
                    .iter()
                    .map(|field| {
                        let label = Self::label_text(&field.label);
                        let label_w = measure.text_width(&label, ctx.font_size, true);
                        let avail = (cell_w - 2.0 * PAD - label_w - LABEL_GAP).max(1.0);
                        wrap_text(measure, &field.value, ctx.font_size, false, avail)
                    })
                    .collect();
                let count = values.iter().map(Vec::len).max().unwrap_or(1);
                (count as f64 * lh + 2.0 * PAD, values)
            })
            .collect();

        let body: f64 = self.lines.iter().map(|(h, _)| *h).sum();
        self.height = if self.title_height == 0.0 && self.lines.is_empty() {
            0.0
        } else {
            2.0 * BORDER + self.title_height + body
        };
        self.height
    }

    pub fn draw(
        &self,
        canvas: &mut dyn Canvas,
        rect: Rect,
        ctx: &LayoutContext,
        palette: &Palette,
    ) {
        if self.height == 0.0 {
            return;
        }
        let measure = ctx.measure.as_ref();
        let columns = self.columns();
        let inner_x = rect.x + BORDER;
        let inner_w = (rect.width - 2.0 * BORDER).max(0.0);
        let cell_w = inner_w / columns as f64;
        let lh = measure.line_height(ctx.font_size);
        let mut y = rect.y + BORDER;

        if self.title_height > 0.0 {
            canvas.fill_rect(Rect::new(inner_x, y, inner_w, self.title_height), palette.header);
            canvas.text(
                inner_x + PAD,
                y + PAD + measure.ascent(ctx.header_font_size),
                &self.block.title,
                ctx.header_font_size,
                true,
                palette.on_header,
            );
            y += self.title_height;
        }

        for (row, (height, values)) in self.lines.iter().enumerate() {
            let fields = &self.block.fields[row * columns..];
            for (col, lines) in values.iter().enumerate() {
                let field = &fields[col];
                let x = inner_x + col as f64 * cell_w + PAD;
                let baseline = y + PAD + measure.ascent(ctx.font_size);
                let label = Self::label_text(&field.label);
                canvas.text(x, baseline, &label, ctx.font_size, true, palette.label);
                let value_x = x + measure.text_width(&label, ctx.font_size, true) + LABEL_GAP;
                for (i, line) in lines.iter().enumerate() {
                    canvas.text(
                        value_x,
                        baseline + i as f64 * lh,
                        line,
                        ctx.font_size,
                        false,
                        palette.text,
                    );
                }
            }
            y += height;
        }

        canvas.stroke_rect(
            Rect::new(
                rect.x + BORDER / 2.0,
                rect.y + BORDER / 2.0,
                rect.width - BORDER,
                self.height - BORDER,
            ),
            BORDER,
            palette.border,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExportSettings;
    use crate::model::Field;
    use crate::render::{RecordingCanvas, ThemeMode};

    fn loot_block() -> TopBlock {
        TopBlock {
            title: "Loot".into(),
            columns: 2,
            fields: vec![
                Field::new("Name", "Dragon hoard"),
                Field::new("Location", "Cave"),
                Field::new("Session", "12"),
            ],
        }
    }

    #[test]
    fn empty_block_takes_no_space() {
        let ctx = LayoutContext::new(&ExportSettings::default());
        let mut panel = TopPanel::new(TopBlock::default());
        assert_eq!(panel.layout(500.0, &ctx), 0.0);
    }

    #[test]
    fn fields_are_gridded_by_columns() {
        let ctx = LayoutContext::new(&ExportSettings::default());
        let mut panel = TopPanel::new(loot_block());
        let h = panel.layout(500.0, &ctx);
        assert_eq!(panel.lines.len(), 2);
        assert!(h > panel.title_height);

        let mut canvas = RecordingCanvas::new();
        let palette = Palette::for_mode(ThemeMode::Light);
        panel.draw(&mut canvas, Rect::new(0.0, 0.0, 500.0, h), &ctx, &palette);
        let texts = canvas.texts();
        assert_eq!(texts[0], "Loot");
        assert!(texts.contains(&"Session:"));
        assert!(texts.contains(&"Dragon hoard"));
    }
}
