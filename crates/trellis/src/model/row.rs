//! The row capability contract consumed by the table.
//!
//! Rows are owned by the caller's model. The table only holds cheap clones of
//! row handles (typically an `Arc` around interior-mutable data) and never
//! allocates rows of its own accord, except through
//! [`TableRow::clone_for_target`] when a drop copies rows between tables.

use std::fmt;

use uuid::Uuid;

use crate::widget::cell::{CellPanel, CellParams};

/// Stable 128-bit identity of a row.
///
/// Selection state is keyed by this identity, so it must stay the same for
/// the lifetime of the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowId(Uuid);

impl RowId {
    /// Create a fresh random identity.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// The underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RowId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<Uuid> for RowId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// A row that can be displayed by a [`Table`](crate::widget::widgets::Table).
///
/// Implementors are shared handles: `clone` must be cheap and every clone must
/// observe the same underlying row. Mutating methods therefore take `&self`.
///
/// # Caller contract
///
/// `children` must return the same list between the counting and filling
/// passes of a cache rebuild, and `parent` must be consistent with the child
/// lists. These are not checked at runtime.
pub trait TableRow: Clone + Send + Sync + 'static {
    /// The row's stable identity.
    fn id(&self) -> RowId;

    /// Whether this row is a container. Only containers are disclosed.
    fn can_have_children(&self) -> bool;

    /// Whether the row is currently disclosed.
    fn is_open(&self) -> bool;

    /// Disclose or collapse the row.
    fn set_open(&self, open: bool);

    /// The row's children, in display order.
    fn children(&self) -> Vec<Self>;

    /// Replace the row's children. Used by drops.
    fn set_children(&self, children: Vec<Self>);

    /// The row's parent, or `None` for a root row.
    fn parent(&self) -> Option<Self>;

    /// Re-parent the row. Used by drops.
    fn set_parent(&self, parent: Option<&Self>);

    /// Deep copy with fresh identities, parented to `new_parent`.
    ///
    /// Called when a drop copies rows rather than moving them.
    fn clone_for_target(&self, new_parent: Option<&Self>) -> Self;

    /// Produce the renderable content for one column of this row.
    fn column_cell(&self, column: usize, params: &CellParams) -> Box<dyn CellPanel>;
}

/// Count `rows` and every descendant, open or not.
pub fn count_table_rows<T: TableRow>(rows: &[T]) -> usize {
    rows.iter()
        .map(|row| {
            if row.can_have_children() {
                1 + count_table_rows(&row.children())
            } else {
                1
            }
        })
        .sum()
}

/// Whether `descendant` is `ancestor` or lies somewhere beneath it.
pub fn row_contains_row<T: TableRow>(ancestor: &T, descendant: &T) -> bool {
    let target = ancestor.id();
    let mut current = Some(descendant.clone());
    while let Some(row) = current {
        if row.id() == target {
            return true;
        }
        current = row.parent();
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SimpleRow;

    #[test]
    fn test_row_id_is_unique() {
        assert_ne!(RowId::new(), RowId::new());
        let uuid = Uuid::new_v4();
        assert_eq!(RowId::from(uuid).as_uuid(), &uuid);
    }

    #[test]
    fn test_count_includes_closed_descendants() {
        let parent = SimpleRow::container(["parent"]);
        let child = SimpleRow::container(["child"]);
        child.add_child(SimpleRow::new(["grandchild"]));
        parent.add_child(child);
        parent.add_child(SimpleRow::new(["second child"]));
        assert!(!parent.is_open());

        let rows = vec![parent, SimpleRow::new(["sibling"])];
        assert_eq!(count_table_rows(&rows), 5);
    }

    #[test]
    fn test_row_contains_row() {
        let root = SimpleRow::container(["root"]);
        let mid = SimpleRow::container(["mid"]);
        let leaf = SimpleRow::new(["leaf"]);
        mid.add_child(leaf.clone());
        root.add_child(mid.clone());

        assert!(row_contains_row(&root, &leaf));
        assert!(row_contains_row(&mid, &leaf));
        assert!(row_contains_row(&leaf, &leaf));
        assert!(!row_contains_row(&leaf, &root));
    }
}
