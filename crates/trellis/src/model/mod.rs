//! Row model contracts for the table widget.
//!
//! The table never owns its data. Callers supply:
//!
//! - rows implementing [`TableRow`] (identity, disclosure state, children,
//!   parent link, and a cell factory), and
//! - a root container implementing [`TableModel`].
//!
//! [`SimpleRow`] and [`SimpleTableModel`] are ready-made implementations for
//! text tables and tests.
//!
//! # Example
//!
//! ```
//! use trellis::model::{SimpleRow, SimpleTableModel, TableModel, count_table_rows};
//!
//! let parent = SimpleRow::container(["Fruit"]);
//! parent.add_child(SimpleRow::new(["Apple"]));
//! parent.add_child(SimpleRow::new(["Pear"]));
//!
//! let model = SimpleTableModel::new(vec![parent, SimpleRow::new(["Bread"])]);
//! assert_eq!(model.root_row_count(), 2);
//! assert_eq!(count_table_rows(&model.root_rows()), 4);
//! ```

mod row;
pub mod selection;
mod simple_row;
mod table_model;

pub use row::{RowId, TableRow, count_table_rows, row_contains_row};
pub use selection::{RowSelection, SelectionSnapshot};
pub use simple_row::SimpleRow;
pub use table_model::{SimpleTableModel, TableModel};
