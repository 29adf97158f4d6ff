//! Mapping between local coordinates and rows, columns and cells.
//!
//! Row lookups walk the cache accumulating heights, so they are O(rows) per
//! query. Rows have variable heights and there is no prefix-sum index.

use trellis_render::Rect;

use super::Table;
use crate::model::TableRow;

/// Inset of a disclosure triangle from its indentation slot.
const DISCLOSURE_INDENT: f32 = 2.0;

impl<T: TableRow> Table<T> {
    fn row_divider(&self) -> f32 {
        self.theme.divider_width(self.theme.show_row_dividers)
    }

    fn column_divider(&self) -> f32 {
        self.theme.divider_width(self.theme.show_column_dividers)
    }

    /// Top edge of the row at `index`, including dividers above it.
    fn row_top(&self, index: usize) -> f32 {
        let divider = self.row_divider();
        self.border.top + self.cache[..index].iter().map(|e| e.height + divider).sum::<f32>()
    }

    /// Left edge of the column at `index`, including dividers before it.
    fn column_left(&self, index: usize) -> f32 {
        let divider = self.column_divider();
        self.border.left + self.columns[..index].iter().map(|c| c.current + divider).sum::<f32>()
    }

    /// The row under `y`. A row owns the divider below it.
    pub fn over_row(&self, y: f32) -> Option<usize> {
        let divider = self.row_divider();
        let mut end = self.border.top;
        for (index, entry) in self.cache.iter().enumerate() {
            let start = end;
            end += entry.height + divider;
            if y >= start && y < end {
                return Some(index);
            }
        }
        None
    }

    /// The column under `x`. A column owns the divider to its right.
    pub fn over_column(&self, x: f32) -> Option<usize> {
        let divider = self.column_divider();
        let mut end = self.border.left;
        for (index, column) in self.columns.iter().enumerate() {
            let start = end;
            end += column.current + divider;
            if x >= start && x < end {
                return Some(index);
            }
        }
        None
    }

    /// The column whose right-hand divider is within the resize slop of `x`.
    ///
    /// The last column has no divider.
    pub fn over_column_divider(&self, x: f32) -> Option<usize> {
        if self.columns.len() < 2 {
            return None;
        }
        let divider = self.column_divider();
        let mut pos = self.border.left;
        for (index, column) in self.columns[..self.columns.len() - 1].iter().enumerate() {
            pos += column.current + divider;
            if (pos - x).abs() < self.theme.column_resize_slop {
                return Some(index);
            }
        }
        None
    }

    /// Width available to the content of a cell.
    pub fn cell_width(&self, row: usize, column: usize) -> f32 {
        let (Some(entry), Some(info)) = (self.cache.get(row), self.columns.get(column)) else {
            return 0.0;
        };
        let pad = self.theme.padding;
        let mut width = info.current - (pad.left + pad.right);
        if self.is_hierarchy_column(column) {
            width -= self.theme.hierarchy_inset(entry.depth);
        }
        width
    }

    /// Left and right content edges of a column, ignoring per-row
    /// indentation beyond the first level.
    pub fn column_edges(&self, column: usize) -> Option<(f32, f32)> {
        let info = self.columns.get(column)?;
        let pad = self.theme.padding;
        let mut left = self.column_left(column);
        let right = left + info.current - pad.right;
        left += pad.left;
        if self.is_hierarchy_column(column) {
            left += self.theme.indent_width + pad.left;
        }
        Some((left, right.max(left)))
    }

    /// Content frame of a cell: padded, and indented in the hierarchy column.
    pub fn cell_frame(&self, row: usize, column: usize) -> Option<Rect> {
        let entry = self.cache.get(row)?;
        let info = self.columns.get(column)?;
        let rect = Rect::new(self.column_left(column), self.row_top(row), info.current, entry.height);
        Some(self.content_frame(rect, column, entry.depth))
    }

    /// Turn an outer cell rect into the frame its content is laid out in.
    pub(super) fn content_frame(&self, cell_rect: Rect, column: usize, depth: usize) -> Rect {
        let mut rect = cell_rect.inset(self.theme.padding);
        if self.is_hierarchy_column(column) {
            let indent = self.theme.hierarchy_inset(depth);
            rect.origin.x += indent;
            rect.size.width = (rect.size.width - indent).max(1.0);
        }
        rect
    }

    /// Full-width frame of a row within the content area.
    pub fn row_frame(&self, row: usize) -> Option<Rect> {
        let entry = self.cache.get(row)?;
        let content = self.content_rect();
        Some(Rect::new(content.x(), self.row_top(row), content.width(), entry.height))
    }

    /// Disclosure triangle area for a row whose hierarchy cell has the padded
    /// rect `cell_rect`. `None` for rows that cannot have children.
    pub(super) fn disclosure_rect(&self, cell_rect: Rect, row: usize) -> Option<Rect> {
        let entry = self.cache.get(row)?;
        if !entry.row.can_have_children() {
            return None;
        }
        let theme = &self.theme;
        let size = theme.indent_width.min(theme.minimum_row_height) - DISCLOSURE_INDENT * 2.0;
        let left = cell_rect.x() + theme.indent_width * entry.depth as f32 + DISCLOSURE_INDENT;
        let top = cell_rect.y() + (theme.minimum_row_height - size) / 2.0;
        Some(Rect::new(left, top, size, size))
    }

    /// Ask the host to scroll the row at `row` into view.
    pub fn scroll_row_into_view(&self, row: usize) {
        if let Some(frame) = self.row_frame(row).filter(|frame| !frame.is_empty()) {
            self.scroll_requested.emit(frame);
        }
    }

    /// Ask the host to scroll one cell into view.
    pub fn scroll_row_cell_into_view(&self, row: usize, column: usize) {
        if let Some(frame) = self.cell_frame(row, column).filter(|frame| !frame.is_empty()) {
            self.scroll_requested.emit(frame);
        }
    }
}
