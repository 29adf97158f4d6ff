//! Selection operations expressed in display indices.
//!
//! Every mutator emits `selection_changed` at most once, and only when the
//! set of selected rows actually changed.

use std::collections::HashSet;

use super::Table;
use crate::model::{RowId, SelectionSnapshot, TableRow};

impl<T: TableRow> Table<T> {
    pub(super) fn notify_selection_changed(&mut self) {
        self.dirty = true;
        tracing::trace!(
            target: "trellis::table",
            table = %self.id,
            selected = self.selection.len(),
            "selection changed"
        );
        self.selection_changed.emit(());
    }

    fn notify_if(&mut self, changed: bool) {
        if changed {
            self.notify_selection_changed();
        }
    }

    /// Drop selected identities that are no longer displayed.
    ///
    /// Only does work after the cache was rebuilt or the selection replaced;
    /// notifies only if something was removed.
    pub fn prune_selection_of_undisclosed_rows(&mut self) {
        if !self.selection.needs_prune() {
            return;
        }
        let present: HashSet<RowId> = self.cache.iter().map(|entry| entry.row.id()).collect();
        let removed = self.selection.prune(|id| present.contains(&id));
        self.notify_if(removed);
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn has_selection(&mut self) -> bool {
        self.prune_selection_of_undisclosed_rows();
        !self.selection.is_empty()
    }

    /// Number of explicitly selected rows.
    pub fn selection_count(&mut self) -> usize {
        self.prune_selection_of_undisclosed_rows();
        self.selection.len()
    }

    /// Selected rows in display order.
    ///
    /// With `minimal`, rows that have a selected ancestor are left out, so
    /// only the topmost selected row of each subtree is returned.
    pub fn selected_rows(&mut self, minimal: bool) -> Vec<T> {
        self.prune_selection_of_undisclosed_rows();
        if self.selection.is_empty() {
            return Vec::new();
        }
        self.cache
            .iter()
            .filter(|entry| {
                self.selection.contains(entry.row.id())
                    && (!minimal || !self.any_selected_in_chain(&self.cache, entry.parent))
            })
            .map(|entry| entry.row.clone())
            .collect()
    }

    /// Copy of the current selection, for restoring later.
    pub fn selection_snapshot(&mut self) -> SelectionSnapshot {
        self.prune_selection_of_undisclosed_rows();
        self.selection.snapshot()
    }

    /// Replace the selection wholesale. Identities that are not displayed are
    /// pruned on the next query.
    pub fn set_selection(&mut self, snapshot: SelectionSnapshot) {
        let changed = self.selection.replace(snapshot);
        self.mark_dirty();
        self.notify_if(changed);
    }

    pub fn first_selected_index(&self) -> Option<usize> {
        if self.selection.is_empty() {
            return None;
        }
        self.cache.iter().position(|entry| self.selection.contains(entry.row.id()))
    }

    pub fn last_selected_index(&self) -> Option<usize> {
        if self.selection.is_empty() {
            return None;
        }
        self.cache.iter().rposition(|entry| self.selection.contains(entry.row.id()))
    }

    pub fn is_row_selected(&self, index: usize) -> bool {
        self.cache
            .get(index)
            .is_some_and(|entry| self.selection.contains(entry.row.id()))
    }

    /// Whether the row at `index` or any of its ancestors is selected.
    pub fn is_row_or_any_parent_selected(&self, index: usize) -> bool {
        index < self.cache.len() && self.any_selected_in_chain(&self.cache, Some(index))
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    pub fn clear_selection(&mut self) {
        let changed = self.selection.clear();
        self.notify_if(changed);
    }

    /// Select every displayed row; the first becomes the anchor.
    pub fn select_all(&mut self) {
        let ids: Vec<RowId> = self.cache.iter().map(|entry| entry.row.id()).collect();
        let changed = self.selection.select_exactly(ids);
        self.mark_dirty();
        self.notify_if(changed);
    }

    /// Add the rows at `indexes`. The first becomes the anchor when there is
    /// none. Out-of-range indexes are ignored.
    pub fn select_by_index(&mut self, indexes: &[usize]) {
        let mut changed = false;
        for &index in indexes {
            if let Some(entry) = self.cache.get(index) {
                changed |= self.selection.insert(entry.row.id());
                self.selection.mark_needs_prune();
            }
        }
        self.mark_dirty();
        self.notify_if(changed);
    }

    /// Add rows `start..=end`, clamped to the displayed rows.
    pub fn select_range(&mut self, start: usize, end: usize) {
        let Some(last) = self.last_row_index() else {
            return;
        };
        let end = end.min(last);
        if start > end {
            return;
        }
        let indexes: Vec<usize> = (start..=end).collect();
        self.select_by_index(&indexes);
    }

    /// Remove the rows at `indexes`.
    pub fn deselect_by_index(&mut self, indexes: &[usize]) {
        let mut changed = false;
        for &index in indexes {
            if let Some(entry) = self.cache.get(index) {
                changed |= self.selection.remove(entry.row.id());
            }
        }
        self.mark_dirty();
        self.notify_if(changed);
    }

    /// Remove rows `start..=end`, clamped to the displayed rows.
    pub fn deselect_range(&mut self, start: usize, end: usize) {
        let Some(last) = self.last_row_index() else {
            return;
        };
        let end = end.min(last);
        if start > end {
            return;
        }
        let indexes: Vec<usize> = (start..=end).collect();
        self.deselect_by_index(&indexes);
    }

    /// Replace the selection with rows `lo..=hi`, keeping `anchor`.
    pub(super) fn select_exact_range(&mut self, lo: usize, hi: usize, anchor: RowId) -> bool {
        let ids: Vec<RowId> = self.cache[lo..=hi].iter().map(|entry| entry.row.id()).collect();
        let changed = self.selection.select_exactly(ids);
        self.selection.set_anchor(Some(anchor));
        changed
    }
}
