//! Root row containers.
//!
//! A [`TableModel`] owns the list of top-level rows a table displays. Child
//! rows hang off their parents through [`TableRow`].

use super::row::TableRow;

/// The container of a table's root rows.
pub trait TableModel<T: TableRow>: Send {
    /// The top-level rows, in display order.
    fn root_rows(&self) -> Vec<T>;

    /// Number of top-level rows.
    fn root_row_count(&self) -> usize {
        self.root_rows().len()
    }

    /// Replace the top-level rows.
    fn set_root_rows(&mut self, rows: Vec<T>);
}

/// An in-memory [`TableModel`] backed by a `Vec`.
#[derive(Debug, Clone)]
pub struct SimpleTableModel<T> {
    rows: Vec<T>,
}

impl<T> Default for SimpleTableModel<T> {
    fn default() -> Self {
        Self { rows: Vec::new() }
    }
}

impl<T: TableRow> SimpleTableModel<T> {
    /// Create a model holding `rows`.
    pub fn new(rows: Vec<T>) -> Self {
        Self { rows }
    }
}

impl<T: TableRow> TableModel<T> for SimpleTableModel<T> {
    fn root_rows(&self) -> Vec<T> {
        self.rows.clone()
    }

    fn root_row_count(&self) -> usize {
        self.rows.len()
    }

    fn set_root_rows(&mut self, rows: Vec<T>) {
        self.rows = rows;
    }
}
