//! Standard widgets for Trellis.
//!
//! - [`Table`]: virtualized hierarchical multi-column table

mod table;

pub use table::{
    ColumnInfo, DEFAULT_DEBOUNCE_DELAY, DropTarget, Table, TableDragData, TableDrop, TableId,
    TableTheme,
};
