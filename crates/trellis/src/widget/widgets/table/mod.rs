//! Virtualized hierarchical table widget.
//!
//! [`Table`] displays rows supplied by a [`TableModel`] in a grid of columns.
//! Open rows have their children flattened in beneath them; the flattened
//! sequence (the row cache) is what every geometry, selection and paint
//! operation indexes into.
//!
//! The table is driven by its host: the host forwards pointer and keyboard
//! events, asks it to paint, and drains the [`Dispatcher`] it was given. Work
//! that would be wasteful to repeat on every pixel of a resize drag is
//! debounced through that dispatcher; after draining, the host calls
//! [`Table::process_deferred`] (event handlers and [`Table::paint`] do so
//! too).
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use trellis::model::{SimpleRow, SimpleTableModel};
//! use trellis::widget::widgets::{ColumnInfo, Table};
//!
//! let folder = SimpleRow::container(["Fruit"]).opened();
//! folder.add_child(SimpleRow::new(["Apple"]));
//!
//! let mut table = Table::new(SimpleTableModel::new(vec![folder, SimpleRow::new(["Bread"])]));
//! table.set_columns(vec![ColumnInfo::new(0).with_current(120.0)]);
//! table.sync_to_model();
//! assert_eq!(table.row_count(), 3);
//!
//! let changes = Arc::new(AtomicUsize::new(0));
//! let counter = changes.clone();
//! table.selection_changed.connect(move |_| {
//!     counter.fetch_add(1, Ordering::SeqCst);
//! });
//! table.select_all();
//! assert_eq!(table.selection_count(), 3);
//! assert_eq!(changes.load(Ordering::SeqCst), 1);
//! ```

mod cache;
mod column;
mod drag;
mod geometry;
mod interaction;
mod paint;
mod selection;
mod theme;

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use trellis_core::{Dispatcher, Signal};
use trellis_render::{Insets, Rect, Size};

use crate::model::{RowId, RowSelection, TableModel, TableRow};
use crate::widget::drag_drop::{DragData, DragGesture};

pub use column::ColumnInfo;
pub use drag::{DropTarget, TableDragData, TableDrop};
pub use theme::TableTheme;

use cache::RowCacheEntry;
use interaction::InteractionState;

/// Default delay used by the `eventually_*` operations.
pub const DEFAULT_DEBOUNCE_DELAY: Duration = Duration::from_millis(20);

/// Process-unique identity of a table, carried in drag payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TableId(u64);

impl TableId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw identifier.
    pub fn as_raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "table#{}", self.0)
    }
}

/// Work requested by a debounce timer, picked up by `process_deferred`.
#[derive(Debug, Default)]
struct DeferredOps {
    sync_due: bool,
    /// `Some(adjust)` when a column fit is due.
    fit_due: Option<bool>,
}

/// Configuration installed by [`Table::install_drag_support`].
#[derive(Debug, Clone)]
struct DragSupport {
    key: String,
    singular: String,
    plural: String,
}

/// A disclosure triangle's clickable area, rebuilt on every paint.
#[derive(Debug, Clone, Copy)]
struct HitRect {
    rect: Rect,
    row: RowId,
}

/// A virtualized, hierarchical, multi-column table.
///
/// # Signals
///
/// - `selection_changed`: the set of selected rows changed
/// - `double_clicked`: a row was double-clicked, or Enter was pressed, with
///   a selection
/// - `drag_removed_rows`: rows were moved out of this table by a drop
///   elsewhere
/// - `drop_occurred`: rows were dropped into this table
/// - `scroll_requested(Rect)`: the host should scroll the rect into view
/// - `drag_started(DragData)`: a row drag began; the host should run the
///   drag session with this payload
pub struct Table<T: TableRow> {
    id: TableId,
    model: Box<dyn TableModel<T>>,
    /// Flat list of rows passing the filter, while one is applied.
    filtered_rows: Option<Vec<T>>,
    theme: TableTheme,
    columns: Vec<ColumnInfo>,
    cache: Vec<RowCacheEntry<T>>,
    selection: RowSelection,
    /// Row whose plain click was deferred to mouse up.
    last_selected: Option<RowId>,
    hit_rects: Vec<HitRect>,
    frame: Rect,
    border: Insets,
    focused: bool,
    dirty: bool,
    needs_layout: bool,
    draw_range: Option<(usize, usize)>,
    prevent_user_column_resize: bool,
    interaction: InteractionState,

    // Debounce
    dispatcher: Dispatcher,
    debounce_delay: Duration,
    deferred: Arc<Mutex<DeferredOps>>,
    awaiting_sync: bool,
    awaiting_fit: bool,

    // Drag source
    drag_support: Option<DragSupport>,
    drag: DragGesture,

    /// Emitted when the selection changes.
    pub selection_changed: Signal<()>,
    /// Emitted on double-click or Enter with a selection.
    pub double_clicked: Signal<()>,
    /// Emitted when a drop elsewhere moved rows out of this table.
    pub drag_removed_rows: Signal<()>,
    /// Emitted after rows were dropped into this table.
    pub drop_occurred: Signal<()>,
    /// Emitted with a rect the host should scroll into view.
    pub scroll_requested: Signal<Rect>,
    /// Emitted when a row drag starts.
    ///
    /// The drag lasts until this table's `mouse_up`, a `TableDrop::drop_at`
    /// naming this table, or a call to [`end_drag`](Self::end_drag).
    pub drag_started: Signal<Arc<DragData>>,
}

impl<T: TableRow> fmt::Debug for Table<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Table")
            .field("id", &self.id)
            .field("rows", &self.cache.len())
            .field("columns", &self.columns)
            .field("selected", &self.selection.len())
            .field("filtered", &self.filtered_rows.is_some())
            .field("frame", &self.frame)
            .finish()
    }
}

impl<T: TableRow> Table<T> {
    /// Create a table over `model` using the process-wide dispatcher.
    ///
    /// The row cache starts empty; call [`sync_to_model`](Self::sync_to_model)
    /// once the columns are set.
    pub fn new(model: impl TableModel<T> + 'static) -> Self {
        Self::with_dispatcher(model, Dispatcher::global().clone())
    }

    /// Create a table that schedules its debounced work on `dispatcher`.
    pub fn with_dispatcher(model: impl TableModel<T> + 'static, dispatcher: Dispatcher) -> Self {
        let id = TableId::next();
        tracing::debug!(target: "trellis::table", table = %id, "created table");
        Self {
            id,
            model: Box::new(model),
            filtered_rows: None,
            theme: TableTheme::default(),
            columns: Vec::new(),
            cache: Vec::new(),
            selection: RowSelection::new(),
            last_selected: None,
            hit_rects: Vec::new(),
            frame: Rect::ZERO,
            border: Insets::ZERO,
            focused: false,
            dirty: true,
            needs_layout: true,
            draw_range: None,
            prevent_user_column_resize: false,
            interaction: InteractionState::default(),
            dispatcher,
            debounce_delay: DEFAULT_DEBOUNCE_DELAY,
            deferred: Arc::new(Mutex::new(DeferredOps::default())),
            awaiting_sync: false,
            awaiting_fit: false,
            drag_support: None,
            drag: DragGesture::new(),
            selection_changed: Signal::new(),
            double_clicked: Signal::new(),
            drag_removed_rows: Signal::new(),
            drop_occurred: Signal::new(),
            scroll_requested: Signal::new(),
            drag_started: Signal::new(),
        }
    }

    /// Builder form of [`set_theme`](Self::set_theme).
    pub fn with_theme(mut self, theme: TableTheme) -> Self {
        self.theme = theme;
        self
    }

    /// Builder form of [`set_columns`](Self::set_columns).
    pub fn with_columns(mut self, columns: Vec<ColumnInfo>) -> Self {
        self.columns = columns;
        self
    }

    // =========================================================================
    // Properties
    // =========================================================================

    /// This table's identity.
    pub fn id(&self) -> TableId {
        self.id
    }

    pub fn theme(&self) -> &TableTheme {
        &self.theme
    }

    /// Replace the theme. Row heights are recomputed.
    pub fn set_theme(&mut self, theme: TableTheme) {
        self.theme = theme;
        self.recompute_row_heights();
        self.mark_dirty();
    }

    /// The table's frame in its parent's coordinates.
    pub fn frame(&self) -> Rect {
        self.frame
    }

    pub fn set_frame(&mut self, frame: Rect) {
        if self.frame != frame {
            self.frame = frame;
            self.mark_dirty();
        }
    }

    /// Insets of the border drawn around the rows.
    pub fn border_insets(&self) -> Insets {
        self.border
    }

    pub fn set_border_insets(&mut self, insets: Insets) {
        self.border = insets;
        self.mark_dirty();
    }

    /// The area inside the border, in local coordinates.
    pub fn content_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.frame.width(), self.frame.height()).inset(self.border)
    }

    pub fn has_focus(&self) -> bool {
        self.focused
    }

    pub fn prevent_user_column_resize(&self) -> bool {
        self.prevent_user_column_resize
    }

    /// Forbid or allow column resizing by dragging dividers.
    pub fn set_prevent_user_column_resize(&mut self, prevent: bool) {
        self.prevent_user_column_resize = prevent;
    }

    pub fn debounce_delay(&self) -> Duration {
        self.debounce_delay
    }

    /// Delay used by the `eventually_*` operations.
    pub fn set_debounce_delay(&mut self, delay: Duration) {
        self.debounce_delay = delay;
    }

    /// Whether the table needs repainting.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Whether the table's preferred size may have changed since the host
    /// last laid it out.
    pub fn needs_layout(&self) -> bool {
        self.needs_layout
    }

    /// Acknowledge a layout pass.
    pub fn clear_needs_layout(&mut self) {
        self.needs_layout = false;
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Preferred size: every column and every row in the draw range, with one
    /// pixel per interior divider, plus the border, rounded up.
    pub fn preferred_size(&self) -> Size {
        let mut size = Size::ZERO;
        size.width = self.columns.iter().map(|c| c.current).sum();
        if self.theme.show_column_dividers {
            size.width += self.columns.len().saturating_sub(1) as f32;
        }
        let (start, end) = self.current_draw_row_range();
        size.height = self.cache[start..end].iter().map(|e| e.height).sum();
        if self.theme.show_row_dividers {
            size.height += (end - start).saturating_sub(1) as f32;
        }
        size.add_insets(self.border).grow_to_integer()
    }

    // =========================================================================
    // Debounced work
    // =========================================================================

    /// Resync to the model after the debounce delay.
    ///
    /// Calls made while a resync is already pending are coalesced into it.
    pub fn eventually_sync_to_model(&mut self) {
        if self.awaiting_sync {
            tracing::trace!(target: "trellis::table", table = %self.id, "sync already pending");
            return;
        }
        self.awaiting_sync = true;
        let deferred = self.deferred.clone();
        self.dispatcher.invoke_after(self.debounce_delay, move || {
            deferred.lock().sync_due = true;
        });
    }

    /// Size columns to fit after the debounce delay.
    ///
    /// Calls made while a fit is already pending are coalesced into it; the
    /// first call's `adjust` wins.
    pub fn eventually_size_columns_to_fit(&mut self, adjust: bool) {
        if self.awaiting_fit {
            tracing::trace!(target: "trellis::table", table = %self.id, "fit already pending");
            return;
        }
        self.awaiting_fit = true;
        let deferred = self.deferred.clone();
        self.dispatcher.invoke_after(self.debounce_delay, move || {
            deferred.lock().fit_due = Some(adjust);
        });
    }

    /// Whether a debounced resync is pending.
    pub fn is_sync_pending(&self) -> bool {
        self.awaiting_sync
    }

    /// Whether a debounced column fit is pending.
    pub fn is_fit_pending(&self) -> bool {
        self.awaiting_fit
    }

    /// Run debounced work whose timer has fired. Returns whether anything ran.
    pub fn process_deferred(&mut self) -> bool {
        let (sync, fit) = {
            let mut deferred = self.deferred.lock();
            (std::mem::take(&mut deferred.sync_due), deferred.fit_due.take())
        };
        if sync {
            tracing::debug!(target: "trellis::table", table = %self.id, "running debounced sync");
            self.awaiting_sync = false;
            self.sync_to_model();
        }
        if let Some(adjust) = fit {
            tracing::debug!(target: "trellis::table", table = %self.id, "running debounced fit");
            self.awaiting_fit = false;
            self.size_columns_to_fit(adjust);
        }
        sync || fit.is_some()
    }
}
