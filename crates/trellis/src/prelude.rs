//! Prelude module for Trellis.
//!
//! Re-exports the types most programs building a table need:
//!
//! ```ignore
//! use trellis::prelude::*;
//! ```

// ============================================================================
// Core
// ============================================================================

pub use crate::{Dispatcher, Signal};

// ============================================================================
// Geometry and Drawing
// ============================================================================

pub use crate::render::{Color, Insets, Point, RecordingRenderer, Rect, Renderer, Size};

// ============================================================================
// Row Model
// ============================================================================

pub use crate::model::{RowId, SimpleRow, SimpleTableModel, TableModel, TableRow};

// ============================================================================
// Cells and Input
// ============================================================================

pub use crate::widget::{
    CellInterest, CellPanel, CellParams, Key, KeyPressEvent, KeyboardModifiers, LabelCell,
    MouseButton, MouseMoveEvent, MousePressEvent, MouseReleaseEvent,
};

// ============================================================================
// Table
// ============================================================================

pub use crate::widget::widgets::{ColumnInfo, DropTarget, Table, TableDragData, TableDrop, TableTheme};
pub use crate::widget::{DragData, DropAction};
pub use crate::TableError;
