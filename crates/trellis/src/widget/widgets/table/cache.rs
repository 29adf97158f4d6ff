//! The row cache: displayed rows flattened into one indexable sequence.
//!
//! Rebuilt wholesale by [`Table::sync_to_model`]; entries are never patched in
//! place except for their heights, which follow column width changes.

use trellis_core::{PerfSpan, call_guarded, call_guarded_or, logging::span_names};
use trellis_render::Size;

use super::Table;
use crate::model::TableRow;
use crate::widget::cell::{CellPanel, CellParams};

/// One displayed row.
#[derive(Debug, Clone)]
pub(super) struct RowCacheEntry<T> {
    pub(super) row: T,
    /// Index of the parent's entry; `None` for roots and for filtered rows.
    pub(super) parent: Option<usize>,
    pub(super) depth: usize,
    pub(super) height: f32,
}

impl<T: TableRow> Table<T> {
    // =========================================================================
    // Rebuild
    // =========================================================================

    /// Rebuild the row cache from the model (or the filtered list).
    ///
    /// Flags the selection for pruning, resizes the frame to the preferred
    /// size and marks the table for layout and repaint.
    #[tracing::instrument(skip(self), target = "trellis::table", level = "trace")]
    pub fn sync_to_model(&mut self) {
        let _span = PerfSpan::new(span_names::ROW_CACHE);
        let roots = self.root_rows();
        let mut entries = if self.filtered_rows.is_some() {
            Vec::with_capacity(roots.len())
        } else {
            Vec::with_capacity(roots.iter().map(count_open_rows).sum())
        };
        for row in roots {
            self.push_entries(row, None, 0, &mut entries);
        }
        let heights: Vec<f32> = (0..entries.len()).map(|i| self.height_for_row(&entries, i)).collect();
        for (entry, height) in entries.iter_mut().zip(heights) {
            entry.height = height;
        }
        self.cache = entries;
        self.selection.mark_needs_prune();
        self.frame.size = self.preferred_size();
        self.dirty = true;
        self.needs_layout = true;
        tracing::debug!(
            target: "trellis::table",
            table = %self.id,
            rows = self.cache.len(),
            filtered = self.filtered_rows.is_some(),
            "row cache rebuilt"
        );
    }

    fn push_entries(&self, row: T, parent: Option<usize>, depth: usize, entries: &mut Vec<RowCacheEntry<T>>) {
        let index = entries.len();
        let disclose = self.filtered_rows.is_none() && row.can_have_children() && row.is_open();
        let children = if disclose { row.children() } else { Vec::new() };
        entries.push(RowCacheEntry {
            row,
            parent,
            depth,
            height: 0.0,
        });
        for child in children {
            self.push_entries(child, Some(index), depth + 1, entries);
        }
    }

    /// Recompute every entry's height for the current column widths.
    pub(super) fn recompute_row_heights(&mut self) {
        let heights: Vec<f32> = (0..self.cache.len())
            .map(|i| self.height_for_row(&self.cache, i))
            .collect();
        for (entry, height) in self.cache.iter_mut().zip(heights) {
            entry.height = height;
        }
    }

    /// Tallest padded cell of the row across columns with a positive width,
    /// rounded up and floored at the minimum row height.
    fn height_for_row(&self, entries: &[RowCacheEntry<T>], index: usize) -> f32 {
        let pad = self.theme.padding;
        let depth = entries[index].depth;
        let mut height: f32 = 0.0;
        for (column_index, column) in self.columns.iter().enumerate() {
            if column.current <= 0.0 {
                continue;
            }
            let mut width = column.current - (pad.left + pad.right);
            if self.is_hierarchy_column(column_index) {
                width -= self.theme.hierarchy_inset(depth);
            }
            let size = self.cell_preferred_size(entries, index, column_index, width);
            height = height.max(size.height + pad.top + pad.bottom);
        }
        height.ceil().max(self.theme.minimum_row_height)
    }

    // =========================================================================
    // Cells
    // =========================================================================

    /// Visual state for the cell at (`index`, `column`) of `entries`.
    pub(super) fn cell_params_in(
        &self,
        entries: &[RowCacheEntry<T>],
        index: usize,
        column: usize,
    ) -> CellParams {
        let entry = &entries[index];
        let selected = self.selection.contains(entry.row.id());
        let indirectly_selected = !selected && self.any_selected_in_chain(entries, entry.parent);
        let focused = self.focused;
        let theme = &self.theme;
        let (foreground, background) = if selected && focused {
            (theme.on_selection, theme.selection)
        } else if selected {
            (theme.on_inactive_selection, theme.inactive_selection)
        } else if indirectly_selected {
            (theme.on_indirect_selection, theme.indirect_selection)
        } else if index % 2 == 1 {
            (theme.on_banding, theme.banding)
        } else {
            (theme.on_background, theme.background)
        };
        CellParams {
            row_index: index,
            column_id: self.columns.get(column).map_or(0, |c| c.id),
            foreground,
            background,
            selected,
            indirectly_selected,
            focused,
        }
    }

    /// Whether the entry at `start` or any of its ancestors is selected.
    pub(super) fn any_selected_in_chain(&self, entries: &[RowCacheEntry<T>], start: Option<usize>) -> bool {
        let mut current = start;
        while let Some(index) = current {
            let entry = &entries[index];
            if self.selection.contains(entry.row.id()) {
                return true;
            }
            current = entry.parent;
        }
        false
    }

    /// Build the cell for (`row`, `column`) of the live cache.
    ///
    /// `None` when the indices are out of range or the row's cell factory
    /// panicked.
    pub(super) fn cell(&self, row: usize, column: usize) -> Option<Box<dyn CellPanel>> {
        if row >= self.cache.len() || column >= self.columns.len() {
            return None;
        }
        let params = self.cell_params_in(&self.cache, row, column);
        let entry = &self.cache[row];
        call_guarded("table cell factory", || entry.row.column_cell(column, &params)).ok()
    }

    pub(super) fn cell_preferred_size(
        &self,
        entries: &[RowCacheEntry<T>],
        index: usize,
        column: usize,
        width: f32,
    ) -> Size {
        let params = self.cell_params_in(entries, index, column);
        let row = &entries[index].row;
        call_guarded_or("table cell size", Size::ZERO, || {
            row.column_cell(column, &params).preferred_size(width)
        })
    }

    // =========================================================================
    // Roots and filtering
    // =========================================================================

    /// Top-level rows, or the filtered list while a filter is applied.
    pub fn root_rows(&self) -> Vec<T> {
        match &self.filtered_rows {
            Some(rows) => rows.clone(),
            None => self.model.root_rows(),
        }
    }

    pub fn root_row_count(&self) -> usize {
        match &self.filtered_rows {
            Some(rows) => rows.len(),
            None => self.model.root_row_count(),
        }
    }

    /// Replace the model's root rows.
    ///
    /// Drops any filter and clears the selection (without notifying), then
    /// resyncs.
    pub fn set_root_rows(&mut self, rows: Vec<T>) {
        self.filtered_rows = None;
        self.model.set_root_rows(rows);
        self.selection.clear();
        self.last_selected = None;
        self.sync_to_model();
    }

    pub fn is_filtered(&self) -> bool {
        self.filtered_rows.is_some()
    }

    /// Apply or remove a filter.
    ///
    /// With a filter, every row of the model (open or not) for which it
    /// returns `false` is displayed as a flat list; hierarchy is not shown.
    /// `None` removes the current filter and is a no-op when there is none.
    pub fn apply_filter(&mut self, filter: Option<&dyn Fn(&T) -> bool>) {
        match filter {
            None => {
                if self.filtered_rows.take().is_none() {
                    return;
                }
            }
            Some(filter) => {
                let mut kept = Vec::new();
                for row in self.model.root_rows() {
                    collect_unfiltered(row, filter, &mut kept);
                }
                tracing::debug!(target: "trellis::table", table = %self.id, kept = kept.len(), "filter applied");
                self.filtered_rows = Some(kept);
            }
        }
        self.sync_to_model();
    }

    /// Open every closed ancestor of `row`.
    ///
    /// Returns whether anything was opened; if so the cache is resynced, now
    /// or after the debounce delay when `delay_sync` is set.
    pub fn disclose_row(&mut self, row: &T, delay_sync: bool) -> bool {
        let mut modified = false;
        let mut current = row.parent();
        while let Some(parent) = current {
            if !parent.is_open() {
                parent.set_open(true);
                modified = true;
            }
            current = parent.parent();
        }
        if modified {
            if delay_sync {
                self.eventually_sync_to_model();
            } else {
                self.sync_to_model();
            }
        }
        modified
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Number of displayed rows.
    pub fn row_count(&self) -> usize {
        self.cache.len()
    }

    /// The row displayed at `index`.
    pub fn row_from_index(&self, index: usize) -> Option<&T> {
        self.cache.get(index).map(|entry| &entry.row)
    }

    /// Display index of `row`, if it is currently displayed.
    pub fn row_to_index(&self, row: &T) -> Option<usize> {
        let id = row.id();
        self.cache.iter().position(|entry| entry.row.id() == id)
    }

    pub fn last_row_index(&self) -> Option<usize> {
        self.cache.len().checked_sub(1)
    }

    /// Height of every displayed row, in display order.
    pub fn row_heights(&self) -> Vec<f32> {
        self.cache.iter().map(|entry| entry.height).collect()
    }

    /// Nesting depth of the row at `index`; roots are at depth zero.
    pub fn depth_of(&self, index: usize) -> Option<usize> {
        self.cache.get(index).map(|entry| entry.depth)
    }

    /// Display index of the parent of the row at `index`.
    pub fn parent_index_of(&self, index: usize) -> Option<usize> {
        self.cache.get(index).and_then(|entry| entry.parent)
    }

    /// Deepest nesting level currently displayed.
    pub(super) fn max_depth(&self) -> usize {
        self.cache.iter().map(|entry| entry.depth).max().unwrap_or(0)
    }

    // =========================================================================
    // Draw range
    // =========================================================================

    /// Restrict painting and the preferred height to rows
    /// `start..end_before`. Used when paginating for print.
    pub fn set_draw_row_range(&mut self, start: usize, end_before: usize) {
        self.draw_range = Some((start, end_before));
        self.mark_dirty();
    }

    pub fn clear_draw_row_range(&mut self) {
        self.draw_range = None;
        self.mark_dirty();
    }

    /// The effective draw range; every row when the stored range is unset or
    /// no longer valid.
    pub fn current_draw_row_range(&self) -> (usize, usize) {
        match self.draw_range {
            Some((start, end)) if start < end && end <= self.cache.len() => (start, end),
            _ => (0, self.cache.len()),
        }
    }
}

/// `row` plus its open descendants.
fn count_open_rows<T: TableRow>(row: &T) -> usize {
    if row.can_have_children() && row.is_open() {
        1 + row.children().iter().map(count_open_rows).sum::<usize>()
    } else {
        1
    }
}

/// Pre-order walk of `row`'s whole subtree, keeping rows the filter rejects
/// (returns `false` for). A panicking filter keeps the row.
fn collect_unfiltered<T: TableRow>(row: T, filter: &dyn Fn(&T) -> bool, kept: &mut Vec<T>) {
    let children = if row.can_have_children() {
        row.children()
    } else {
        Vec::new()
    };
    if !call_guarded_or("table filter", false, || filter(&row)) {
        kept.push(row);
    }
    for child in children {
        collect_unfiltered(child, filter, kept);
    }
}

#[cfg(test)]
mod tests {
    use trellis_core::Dispatcher;

    use super::super::ColumnInfo;
    use super::*;
    use crate::model::{SimpleRow, SimpleTableModel, TableRow};

    fn ids(table: &Table<SimpleRow>) -> Vec<String> {
        (0..table.row_count())
            .map(|i| table.row_from_index(i).map(|r| r.text(0)).unwrap_or_default())
            .collect()
    }

    fn tree() -> (Table<SimpleRow>, SimpleRow) {
        let b = SimpleRow::container(["B"]);
        b.add_child(SimpleRow::new(["B1"]));
        b.add_child(SimpleRow::new(["B2"]));
        let rows = vec![SimpleRow::new(["A"]), b.clone(), SimpleRow::new(["C"])];
        let mut table = Table::with_dispatcher(SimpleTableModel::new(rows), Dispatcher::new())
            .with_columns(vec![ColumnInfo::new(0).with_current(100.0)]);
        table.sync_to_model();
        (table, b)
    }

    #[test]
    fn test_closed_rows_hide_children() {
        let (table, _) = tree();
        assert_eq!(ids(&table), ["A", "B", "C"]);
    }

    #[test]
    fn test_open_rows_flatten_in_preorder() {
        let (mut table, b) = tree();
        b.set_open(true);
        table.sync_to_model();
        assert_eq!(ids(&table), ["A", "B", "B1", "B2", "C"]);
        assert_eq!(table.depth_of(2), Some(1));
        assert_eq!(table.parent_index_of(3), Some(1));
        assert_eq!(table.parent_index_of(4), None);
    }

    #[test]
    fn test_filter_flattens_everything() {
        let (mut table, _) = tree();
        let hide_c: &dyn Fn(&SimpleRow) -> bool = &|row| row.text(0) == "C";
        table.apply_filter(Some(hide_c));
        assert!(table.is_filtered());
        // Closed children are still visited; hierarchy is not shown.
        assert_eq!(ids(&table), ["A", "B", "B1", "B2"]);
        assert_eq!(table.depth_of(2), Some(0));
        assert_eq!(table.root_row_count(), 4);

        table.apply_filter(None);
        assert_eq!(ids(&table), ["A", "B", "C"]);
    }

    #[test]
    fn test_panicking_filter_keeps_rows() {
        let (mut table, _) = tree();
        let explode: &dyn Fn(&SimpleRow) -> bool = &|_| panic!("filter failed");
        table.apply_filter(Some(explode));
        assert_eq!(table.row_count(), 5);
    }

    #[test]
    fn test_disclose_row_opens_ancestors() {
        let (mut table, b) = tree();
        let b1 = b.children()[0].clone();
        assert!(table.disclose_row(&b1, false));
        assert_eq!(table.row_to_index(&b1), Some(2));
        assert!(!table.disclose_row(&b1, false));
    }

    #[test]
    fn test_draw_range_falls_back_when_invalid() {
        let (mut table, _) = tree();
        table.set_draw_row_range(1, 3);
        assert_eq!(table.current_draw_row_range(), (1, 3));
        table.set_draw_row_range(2, 9);
        assert_eq!(table.current_draw_row_range(), (0, 3));
        table.clear_draw_row_range();
        assert_eq!(table.current_draw_row_range(), (0, 3));
    }

    #[test]
    fn test_heights_respect_minimum() {
        let (table, _) = tree();
        // Default padding (4 + 4) plus one 14px line.
        assert!(table.row_heights().iter().all(|h| *h == 22.0));
    }
}
