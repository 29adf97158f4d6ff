//! Selection state for hierarchical tables.
//!
//! [`RowSelection`] stores which row identities are selected together with
//! the anchor used for shift-click range extension. It knows nothing about
//! row order; the table translates cache indices into identities before
//! calling in here.
//!
//! Identities whose rows have disappeared from the table are not removed
//! eagerly. Instead a prune flag is raised whenever the table rebuilds its
//! row cache (or the selection is replaced wholesale), and the next query
//! calls [`RowSelection::prune`] to drop them.
//!
//! # Example
//!
//! ```
//! use trellis::model::{RowId, RowSelection};
//!
//! let a = RowId::new();
//! let b = RowId::new();
//!
//! let mut selection = RowSelection::new();
//! selection.select_only(a);
//! selection.insert(b);
//! assert_eq!(selection.len(), 2);
//! assert_eq!(selection.anchor(), Some(a));
//!
//! // `b` vanished from the table.
//! selection.mark_needs_prune();
//! assert!(selection.prune(|id| id == a));
//! assert!(!selection.contains(b));
//! ```

use std::collections::HashSet;

use super::row::RowId;

/// A copy of the selected identities.
pub type SelectionSnapshot = HashSet<RowId>;

/// Selected row identities plus the range-extension anchor.
#[derive(Debug, Clone, Default)]
pub struct RowSelection {
    /// Selected identities.
    selected: HashSet<RowId>,

    /// Fixed end for shift-click range extension.
    anchor: Option<RowId>,

    /// Set when some identities may no longer be present in the table.
    needs_prune: bool,
}

impl RowSelection {
    /// Creates an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Whether `id` is selected.
    pub fn contains(&self, id: RowId) -> bool {
        self.selected.contains(&id)
    }

    /// Number of selected identities.
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Iterate over the selected identities in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = RowId> + '_ {
        self.selected.iter().copied()
    }

    /// The anchor, if any.
    pub fn anchor(&self) -> Option<RowId> {
        self.anchor
    }

    /// Set or clear the anchor.
    pub fn set_anchor(&mut self, anchor: Option<RowId>) {
        self.anchor = anchor;
    }

    /// Whether a prune is pending.
    pub fn needs_prune(&self) -> bool {
        self.needs_prune
    }

    /// Copy of the selected identities.
    pub fn snapshot(&self) -> SelectionSnapshot {
        self.selected.clone()
    }

    // =========================================================================
    // Mutation
    //
    // Every mutator reports whether membership actually changed so the owner
    // can batch a single notification per call.
    // =========================================================================

    /// Add `id`. Becomes the anchor when there is none.
    pub fn insert(&mut self, id: RowId) -> bool {
        if self.anchor.is_none() {
            self.anchor = Some(id);
        }
        self.selected.insert(id)
    }

    /// Remove `id`. The anchor is left alone.
    pub fn remove(&mut self, id: RowId) -> bool {
        self.selected.remove(&id)
    }

    /// Flip membership of `id`. The anchor is left alone.
    pub fn toggle(&mut self, id: RowId) -> bool {
        if !self.selected.remove(&id) {
            self.selected.insert(id);
        }
        true
    }

    /// Replace the selection with just `id` and make it the anchor.
    pub fn select_only(&mut self, id: RowId) -> bool {
        let changed = self.selected.len() != 1 || !self.selected.contains(&id);
        self.selected.clear();
        self.selected.insert(id);
        self.anchor = Some(id);
        self.needs_prune = false;
        changed
    }

    /// Replace the selection with `ids`; the first becomes the anchor.
    pub fn select_exactly<I>(&mut self, ids: I) -> bool
    where
        I: IntoIterator<Item = RowId>,
    {
        let mut next = HashSet::new();
        let mut first = None;
        for id in ids {
            first.get_or_insert(id);
            next.insert(id);
        }
        let changed = next != self.selected;
        self.selected = next;
        self.anchor = first;
        self.needs_prune = false;
        changed
    }

    /// Empty the selection and drop the anchor.
    pub fn clear(&mut self) -> bool {
        if self.selected.is_empty() {
            return false;
        }
        self.selected.clear();
        self.anchor = None;
        self.needs_prune = false;
        true
    }

    /// Replace the selection wholesale, e.g. when restoring a saved one.
    ///
    /// Raises the prune flag since the identities may not all be present.
    pub fn replace(&mut self, snapshot: SelectionSnapshot) -> bool {
        let changed = snapshot != self.selected;
        self.selected = snapshot;
        self.needs_prune = true;
        changed
    }

    /// Flag that some identities may no longer be displayed.
    pub fn mark_needs_prune(&mut self) {
        self.needs_prune = true;
    }

    /// Drop every identity for which `is_present` is false.
    ///
    /// Does nothing unless a prune is pending. Returns `true` only when an
    /// identity was actually removed.
    pub fn prune(&mut self, is_present: impl Fn(RowId) -> bool) -> bool {
        if !self.needs_prune {
            return false;
        }
        self.needs_prune = false;
        if self.selected.is_empty() {
            return false;
        }
        let before = self.selected.len();
        self.selected.retain(|id| is_present(*id));
        let removed = self.selected.len() != before;
        if removed {
            tracing::trace!(
                target: "trellis::table",
                removed = before - self.selected.len(),
                "pruned selection"
            );
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_sets_anchor_once() {
        let mut selection = RowSelection::new();
        let a = RowId::new();
        let b = RowId::new();
        assert!(selection.insert(a));
        assert!(selection.insert(b));
        assert!(!selection.insert(b));
        assert_eq!(selection.anchor(), Some(a));
    }

    #[test]
    fn test_select_only_reports_change() {
        let mut selection = RowSelection::new();
        let a = RowId::new();
        assert!(selection.select_only(a));
        assert!(!selection.select_only(a));
        assert_eq!(selection.anchor(), Some(a));
    }

    #[test]
    fn test_toggle_keeps_anchor() {
        let mut selection = RowSelection::new();
        let a = RowId::new();
        let b = RowId::new();
        selection.select_only(a);
        selection.toggle(b);
        assert!(selection.contains(b));
        selection.toggle(a);
        assert!(!selection.contains(a));
        assert_eq!(selection.anchor(), Some(a));
    }

    #[test]
    fn test_clear() {
        let mut selection = RowSelection::new();
        assert!(!selection.clear());
        selection.insert(RowId::new());
        assert!(selection.clear());
        assert!(selection.is_empty());
        assert!(selection.anchor().is_none());
    }

    #[test]
    fn test_prune_is_lazy() {
        let mut selection = RowSelection::new();
        let keep = RowId::new();
        let gone = RowId::new();
        selection.insert(keep);
        selection.insert(gone);

        // Without the flag nothing is pruned.
        assert!(!selection.prune(|id| id == keep));
        assert_eq!(selection.len(), 2);

        selection.mark_needs_prune();
        assert!(selection.prune(|id| id == keep));
        assert_eq!(selection.len(), 1);
        assert!(!selection.needs_prune());
    }

    #[test]
    fn test_prune_without_removal_reports_false() {
        let mut selection = RowSelection::new();
        selection.insert(RowId::new());
        selection.mark_needs_prune();
        assert!(!selection.prune(|_| true));
    }

    #[test]
    fn test_replace_flags_prune() {
        let mut selection = RowSelection::new();
        let a = RowId::new();
        let snapshot: SelectionSnapshot = [a].into_iter().collect();
        assert!(selection.replace(snapshot.clone()));
        assert!(selection.needs_prune());
        assert!(!selection.replace(snapshot));
    }

    #[test]
    fn test_select_exactly() {
        let mut selection = RowSelection::new();
        let ids = [RowId::new(), RowId::new(), RowId::new()];
        assert!(selection.select_exactly(ids));
        assert_eq!(selection.len(), 3);
        assert_eq!(selection.anchor(), Some(ids[0]));
        assert!(!selection.select_exactly(ids));
    }
}
