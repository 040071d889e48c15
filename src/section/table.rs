//! Bordered, titled tables: the section kind used for every built-in list.

use std::ops::Range;

use super::Section;
use crate::layout::LayoutContext;
use crate::model::{Column, ListData};
use crate::render::{Canvas, Palette};
use crate::style::{Align, Rect};
use crate::text::wrap_text;

const BORDER: f64 = 1.0;
const PAD_H: f64 = 2.0;
const PAD_V: f64 = 1.0;
const SEPARATOR: f64 = 1.0;
const INDENT: f64 = 8.0;

pub struct TableSection {
    key: String,
    title: String,
    columns: Vec<Column>,
    data: ListData,
    range: Range<usize>,

    // Filled by `layout`.
    column_widths: Vec<f64>,
    title_height: f64,
    column_header_height: f64,
    header_lines: Vec<Vec<String>>,
    cell_lines: Vec<Vec<Vec<String>>>,
    row_heights: Vec<f64>,
}

impl TableSection {
    pub fn new(key: impl Into<String>, data: ListData) -> Self {
        let key = key.into();
        let title = if data.title.is_empty() {
            default_title(&key)
        } else {
            data.title.clone()
        };
        let columns = if data.columns.is_empty() {
            vec![Column::new("", 1.0)]
        } else {
            data.columns.clone()
        };
        let range = 0..data.rows.len();
        Self {
            key,
            title,
            columns,
            data,
            range,
            column_widths: Vec::new(),
            title_height: 0.0,
            column_header_height: 0.0,
            header_lines: Vec::new(),
            cell_lines: Vec::new(),
            row_heights: Vec::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    fn has_column_titles(&self) -> bool {
        self.columns.iter().any(|c| !c.title.is_empty())
    }

    fn cell_width(&self, col: usize, depth: usize) -> f64 {
        let indent = if col == 0 { depth as f64 * INDENT } else { 0.0 };
        (self.column_widths[col] - 2.0 * PAD_H - indent).max(1.0)
    }
}

/// Title shown when a list does not carry its own.
pub fn default_title(key: &str) -> String {
    match key {
        "reactions" => "Reactions",
        "conditional_modifiers" => "Conditional Modifiers",
        "melee" => "Melee Weapons",
        "ranged" => "Ranged Weapons",
        "traits" => "Traits",
        "skills" => "Skills",
        "spells" => "Spells",
        "equipment" => "Carried Equipment",
        "other_equipment" => "Other Equipment",
        "notes" => "Notes",
        other => other,
    }
    .to_string()
}

impl Section for TableSection {
    fn key(&self) -> &str {
        &self.key
    }

    fn row_count(&self) -> usize {
        self.data.rows.len()
    }

    fn layout(&mut self, width: f64, ctx: &LayoutContext) {
        let measure = ctx.measure.as_ref();
        let inner = (width - 2.0 * BORDER).max(0.0);
        let total_weight: f64 = self.columns.iter().map(|c| c.weight.max(0.0)).sum();
        let count = self.columns.len() as f64;
        self.column_widths = self
            .columns
            .iter()
            .map(|c| {
                if total_weight > 0.0 {
                    inner * c.weight.max(0.0) / total_weight
                } else {
                    inner / count
                }
            })
            .collect();

        let header_lh = measure.line_height(ctx.header_font_size);
        let body_lh = measure.line_height(ctx.font_size);
        self.title_height = header_lh + 2.0 * PAD_V;

        self.header_lines = (0..self.columns.len())
            .map(|col| {
                wrap_text(
                    measure,
                    &self.columns[col].title,
                    ctx.header_font_size,
                    true,
                    self.cell_width(col, 0),
                )
            })
            .collect();
        self.column_header_height = if self.has_column_titles() {
            let lines = self.header_lines.iter().map(Vec::len).max().unwrap_or(1);
            lines as f64 * header_lh + 2.0 * PAD_V + SEPARATOR
        } else {
            0.0
        };

        let mut cell_lines = Vec::with_capacity(self.data.rows.len());
        let mut row_heights = Vec::with_capacity(self.data.rows.len());
        for row in &self.data.rows {
            let cells: Vec<Vec<String>> = (0..self.columns.len())
                .map(|col| {
                    let text = row.cells.get(col).map(String::as_str).unwrap_or("");
                    wrap_text(measure, text, ctx.font_size, false, self.cell_width(col, row.depth))
                })
                .collect();
            let lines = cells.iter().map(Vec::len).max().unwrap_or(1);
            row_heights.push(lines as f64 * body_lh + 2.0 * PAD_V + SEPARATOR);
            cell_lines.push(cells);
        }
        self.cell_lines = cell_lines;
        self.row_heights = row_heights;
    }

    fn overhead_height(&self) -> f64 {
        2.0 * BORDER + self.title_height + self.column_header_height
    }

    fn row_heights(&self) -> &[f64] {
        &self.row_heights
    }

    fn draw_range(&self) -> Range<usize> {
        self.range.clone()
    }

    fn set_draw_range(&mut self, range: Range<usize>) {
        let end = range.end.min(self.data.rows.len());
        self.range = range.start.min(end)..end;
    }

    fn draw(&self, canvas: &mut dyn Canvas, rect: Rect, ctx: &LayoutContext, palette: &Palette) {
        let measure = ctx.measure.as_ref();
        let header_lh = measure.line_height(ctx.header_font_size);
        let body_lh = measure.line_height(ctx.font_size);
        let inner_x = rect.x + BORDER;
        let inner_w = (rect.width - 2.0 * BORDER).max(0.0);
        let mut y = rect.y + BORDER;

        // Title bar
        canvas.fill_rect(Rect::new(inner_x, y, inner_w, self.title_height), palette.header);
        let title_w = measure.text_width(&self.title, ctx.header_font_size, true);
        canvas.text(
            inner_x + (inner_w - title_w).max(0.0) / 2.0,
            y + PAD_V + measure.ascent(ctx.header_font_size),
            &self.title,
            ctx.header_font_size,
            true,
            palette.on_header,
        );
        y += self.title_height;

        // Column headers
        if self.column_header_height > 0.0 {
            let mut x = inner_x;
            for (col, lines) in self.header_lines.iter().enumerate() {
                let w = self.column_widths[col];
                for (i, line) in lines.iter().enumerate() {
                    let lw = measure.text_width(line, ctx.header_font_size, true);
                    canvas.text(
                        aligned_x(x + PAD_H, w - 2.0 * PAD_H, lw, self.columns[col].align),
                        y + PAD_V + i as f64 * header_lh + measure.ascent(ctx.header_font_size),
                        line,
                        ctx.header_font_size,
                        true,
                        palette.label,
                    );
                }
                x += w;
            }
            y += self.column_header_height;
            let sep_y = y - SEPARATOR / 2.0;
            canvas.line(inner_x, sep_y, inner_x + inner_w, sep_y, SEPARATOR, palette.divider);
        }

        // Rows
        let end = self.range.end.min(self.row_heights.len());
        let start = self.range.start.min(end);
        for index in start..end {
            let h = self.row_heights[index];
            if index % 2 == 1 {
                canvas.fill_rect(Rect::new(inner_x, y, inner_w, h - SEPARATOR), palette.banding);
            }
            let depth = self.data.rows[index].depth;
            let mut x = inner_x;
            for (col, lines) in self.cell_lines[index].iter().enumerate() {
                let w = self.column_widths[col];
                let indent = if col == 0 { depth as f64 * INDENT } else { 0.0 };
                for (i, line) in lines.iter().enumerate() {
                    let lw = measure.text_width(line, ctx.font_size, false);
                    canvas.text(
                        aligned_x(
                            x + PAD_H + indent,
                            w - 2.0 * PAD_H - indent,
                            lw,
                            self.columns[col].align,
                        ),
                        y + PAD_V + i as f64 * body_lh + measure.ascent(ctx.font_size),
                        line,
                        ctx.font_size,
                        false,
                        palette.text,
                    );
                }
                x += w;
            }
            y += h;
            if index + 1 < end {
                let sep_y = y - SEPARATOR / 2.0;
                canvas.line(inner_x, sep_y, inner_x + inner_w, sep_y, SEPARATOR, palette.divider);
            }
        }

        canvas.stroke_rect(
            Rect::new(
                rect.x + BORDER / 2.0,
                rect.y + BORDER / 2.0,
                rect.width - BORDER,
                rect.height - BORDER,
            ),
            BORDER,
            palette.border,
        );
    }
}

fn aligned_x(x: f64, available: f64, text_width: f64, align: Align) -> f64 {
    match align {
        Align::Start => x,
        Align::Middle => x + (available - text_width).max(0.0) / 2.0,
        Align::End => x + (available - text_width).max(0.0),
    }
}
