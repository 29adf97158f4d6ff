//! Painting.
//!
//! Only the rows and columns intersecting the dirty rect are visited, and
//! cell panels are built only for those cells. Composite panels paint their
//! own children.

use trellis_core::{PerfSpan, call_guarded_or, logging::span_names};
use trellis_render::{Color, Point, Rect, Renderer};

use super::{HitRect, Table};
use crate::model::TableRow;

impl<T: TableRow> Table<T> {
    /// Paint the part of the table inside `dirty`, in local coordinates.
    ///
    /// Runs any debounced work that is due first. Rebuilds the disclosure
    /// hit areas for the rows it paints and clears the dirty flag.
    pub fn paint(&mut self, renderer: &mut dyn Renderer, dirty: Rect) {
        self.process_deferred();
        let _span = PerfSpan::new(span_names::PAINT);

        renderer.save();
        renderer.clip_rect(dirty);
        renderer.fill_rect(dirty, self.theme.background);

        let column_divider = self.theme.divider_width(self.theme.show_column_dividers);
        let row_divider = self.theme.divider_width(self.theme.show_row_dividers);

        let mut first_column = 0;
        let mut x = self.border.left;
        for column in &self.columns {
            let next = x + column.current + column_divider;
            if next >= dirty.x() {
                break;
            }
            x = next;
            first_column += 1;
        }

        let (mut first_row, end_row) = self.current_draw_row_range();
        let mut y = self.border.top;
        for entry in &self.cache[first_row..end_row] {
            let next = y + entry.height + row_divider;
            if next >= dirty.y() {
                break;
            }
            y = next;
            first_row += 1;
        }

        self.paint_row_backgrounds(renderer, dirty, first_row..end_row, y);
        if self.theme.show_column_dividers {
            let mut rect = Rect::new(x, dirty.y(), 1.0, dirty.height());
            for column in self.columns.iter().skip(first_column).take(self.columns.len().saturating_sub(first_column + 1)) {
                rect.origin.x += column.current;
                renderer.fill_rect(rect, self.theme.interior_divider);
                rect.origin.x += 1.0;
            }
        }

        self.hit_rects.clear();
        let mut row_y = y;
        for row in first_row..end_row {
            if row_y >= dirty.bottom() {
                break;
            }
            let height = self.cache[row].height;
            let mut cell_x = x;
            for column in first_column..self.columns.len() {
                if cell_x >= dirty.right() {
                    break;
                }
                let width = self.columns[column].current;
                self.paint_cell(renderer, Rect::new(cell_x, row_y, width, height), row, column);
                cell_x += width + column_divider;
            }
            row_y += height + row_divider;
        }

        renderer.restore();
        self.dirty = false;
    }

    /// Selection, indirect selection and banding fills, plus row dividers.
    fn paint_row_backgrounds(&self, renderer: &mut dyn Renderer, dirty: Rect, rows: std::ops::Range<usize>, top: f32) {
        let selection = if self.focused {
            self.theme.selection
        } else {
            self.theme.inactive_selection
        };
        let last = rows.end.saturating_sub(1);
        let mut rect = Rect::new(dirty.x(), top, dirty.width(), 0.0);
        for row in rows {
            if rect.y() >= dirty.bottom() {
                break;
            }
            rect.size.height = self.cache[row].height;
            let fill: Option<Color> = if self.is_row_selected(row) {
                Some(selection)
            } else if self.is_row_or_any_parent_selected(row) {
                Some(self.theme.indirect_selection)
            } else if row % 2 == 1 {
                Some(self.theme.banding)
            } else {
                None
            };
            if let Some(color) = fill {
                renderer.fill_rect(rect, color);
            }
            rect.origin.y += rect.height();
            if self.theme.show_row_dividers && row != last {
                renderer.fill_rect(Rect::new(rect.x(), rect.y(), rect.width(), 1.0), self.theme.interior_divider);
                rect.origin.y += 1.0;
            }
        }
    }

    /// Disclosure triangle (hierarchy column only) and cell content.
    fn paint_cell(&mut self, renderer: &mut dyn Renderer, rect: Rect, row: usize, column: usize) {
        let padded = rect.inset(self.theme.padding);
        if self.is_hierarchy_column(column)
            && let Some(disclosure) = self.disclosure_rect(padded, row)
        {
            let params = self.cell_params_in(&self.cache, row, column);
            let entry = &self.cache[row];
            renderer.fill_polygon(&disclosure_triangle(disclosure, entry.row.is_open()), params.foreground);
            self.hit_rects.push(HitRect {
                rect: disclosure,
                row: entry.row.id(),
            });
        }

        let frame = self.content_frame(rect, column, self.cache[row].depth);
        let Some(cell) = self.cell(row, column) else {
            return;
        };
        let bounds = Rect::new(0.0, 0.0, frame.width(), frame.height());
        renderer.save();
        renderer.translate(frame.x(), frame.y());
        renderer.clip_rect(bounds);
        call_guarded_or("table cell paint", (), || cell.paint(renderer, bounds));
        renderer.restore();
    }
}

/// Points of a disclosure triangle filling `rect`: pointing right when
/// closed, down when open.
fn disclosure_triangle(rect: Rect, open: bool) -> [Point; 3] {
    let (left, top, right, bottom) = (rect.x(), rect.y(), rect.right(), rect.bottom());
    if open {
        [
            Point::new(left, top),
            Point::new(right, top),
            Point::new(rect.center().x, bottom),
        ]
    } else {
        [
            Point::new(left, top),
            Point::new(right, rect.center().y),
            Point::new(left, bottom),
        ]
    }
}
