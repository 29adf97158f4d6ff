//! Widget layer for Trellis.
//!
//! - [`events`]: plain input event structs the host forwards to widgets
//! - [`cell`]: the [`CellPanel`] contract for cell content, and [`LabelCell`]
//! - [`drag_drop`]: drag payloads and gesture tracking
//! - [`widgets`]: the [`Table`](widgets::Table) widget
//!
//! Widgets here are not tied to a window system. The host owns the event
//! loop: it translates platform input into [`events`], calls the widget's
//! handlers, asks it to paint into a [`Renderer`](trellis_render::Renderer),
//! and drains the [`Dispatcher`](trellis_core::Dispatcher) the widget
//! schedules debounced work on.

pub mod cell;
pub mod drag_drop;
pub mod events;
pub mod widgets;

pub use cell::{CellInterest, CellMouseEvent, CellPanel, CellParams, LabelCell, PanelPath, TextMetrics};
pub use drag_drop::{DragData, DragGesture, DropAction};
pub use events::{
    Key, KeyPressEvent, KeyboardModifiers, MouseButton, MouseMoveEvent, MousePressEvent,
    MouseReleaseEvent,
};
