//! Trellis - a virtualized hierarchical table widget.
//!
//! This is the main crate. It re-exports the core plumbing (signals, the
//! dispatcher, panic recovery) and the drawing types, and provides the row
//! model contracts and the [`Table`](widget::widgets::Table) widget.
//!
//! # Example
//!
//! ```
//! use trellis::prelude::*;
//!
//! let folder = SimpleRow::container(["Fruit", "2 items"]).opened();
//! folder.add_child(SimpleRow::new(["Apple", "red"]));
//! folder.add_child(SimpleRow::new(["Pear", "green"]));
//!
//! let mut table = Table::with_dispatcher(SimpleTableModel::new(vec![folder]), Dispatcher::new())
//!     .with_columns(vec![ColumnInfo::new(0), ColumnInfo::new(1)]);
//! table.sync_to_model();
//! table.size_columns_to_fit(true);
//!
//! let mut renderer = RecordingRenderer::new();
//! let size = table.preferred_size();
//! table.paint(&mut renderer, Rect::new(0.0, 0.0, size.width, size.height));
//! assert!(renderer.texts().contains(&"Pear"));
//! ```

pub use trellis_core::*;

/// Graphics rendering module.
pub mod render {
    pub use trellis_render::*;
}

pub mod error;
pub mod model;
pub mod prelude;
pub mod widget;

pub use error::TableError;

static_assertions::assert_impl_all!(model::SimpleRow: Send, Sync, Clone);
static_assertions::assert_impl_all!(model::RowSelection: Send, Sync);
static_assertions::assert_impl_all!(widget::DragData: Send, Sync);
static_assertions::assert_impl_all!(TableError: Send, Sync);
