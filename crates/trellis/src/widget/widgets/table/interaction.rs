//! Pointer and keyboard handling.
//!
//! A press is resolved, in order, as: a column divider (starts a resize, or
//! fits the column on double click), a disclosure triangle (toggled on
//! release), a cell panel that wants the press (receives the drag and
//! release too), and finally a selection click on the row.
//!
//! Cell panels are rebuilt for every event, so the panel a gesture or hover
//! is attached to is remembered as a [`CellTarget`] and resolved again each
//! time.

use cursor_icon::CursorIcon;
use trellis_core::call_guarded_or;
use trellis_render::Point;

use super::Table;
use crate::model::{RowId, TableRow};
use crate::widget::cell::{self, CellInterest, CellMouseEvent, CellPanel, PanelPath};
use crate::widget::events::{
    Key, KeyPressEvent, KeyboardModifiers, MouseButton, MouseMoveEvent, MousePressEvent,
    MouseReleaseEvent,
};

/// A panel inside one cell, identified by its path from the cell root.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct CellTarget {
    row: usize,
    /// Guards against the cache having changed underneath the target.
    row_id: RowId,
    column: usize,
    path: PanelPath,
}

/// An in-progress column divider drag.
#[derive(Debug, Clone, Copy)]
struct ColumnResize {
    column: usize,
    start_x: f32,
    base_width: f32,
    /// Padding and indentation the column needs beyond its content.
    overhead: f32,
}

/// Transient state, reset at the start of each press.
#[derive(Debug, Default)]
pub(super) struct InteractionState {
    /// Row of the cell handling the current press.
    row: Option<usize>,
    /// Column of the cell handling the current press, or being resized.
    column: Option<usize>,
    /// Cell panel the current press was forwarded to.
    pressed: Option<CellTarget>,
    resize: Option<ColumnResize>,
    /// Cell last under the pointer.
    last_motion: Option<(usize, usize)>,
    /// Panel that last received a mouse enter.
    entered: Option<CellTarget>,
    was_dragged: bool,
    divider_dragged: bool,
}

impl<T: TableRow> Table<T> {
    // =========================================================================
    // Cell routing
    // =========================================================================

    /// The deepest panel interested in `interest` under `pos`, in the cell at
    /// (`row`, `column`).
    fn cell_target_at(&self, row: usize, column: usize, pos: Point, interest: CellInterest) -> Option<CellTarget> {
        let frame = self.cell_frame(row, column)?;
        let cell = self.cell(row, column)?;
        let (path, _) = cell::hit_test(cell.as_ref(), frame.size, pos - frame.origin, interest)?;
        Some(CellTarget {
            row,
            row_id: self.cache[row].row.id(),
            column,
            path,
        })
    }

    /// Rebuild the cell behind `target` and run `f` with its panel and the
    /// panel's origin in table coordinates.
    fn with_target<R>(&self, target: &CellTarget, f: impl FnOnce(&dyn CellPanel, Point) -> R) -> Option<R> {
        if self.cache.get(target.row)?.row.id() != target.row_id {
            return None;
        }
        let frame = self.cell_frame(target.row, target.column)?;
        let cell = self.cell(target.row, target.column)?;
        let (panel, origin) = cell::resolve(cell.as_ref(), frame.size, &target.path)?;
        Some(f(panel, frame.origin + origin))
    }

    fn cell_wants(&self, row: usize, column: usize, interest: CellInterest) -> bool {
        match (self.cell_frame(row, column), self.cell(row, column)) {
            (Some(frame), Some(cell)) => cell::has_interest_in_tree(cell.as_ref(), frame.size, interest),
            _ => false,
        }
    }

    // =========================================================================
    // Mouse
    // =========================================================================

    /// Handle a mouse press. Returns whether it was consumed.
    #[tracing::instrument(skip(self), target = "trellis::table", level = "trace")]
    pub fn mouse_down(&mut self, event: &MousePressEvent) -> bool {
        self.process_deferred();
        // A press means any drag session that never released here is over.
        self.end_drag();
        let pos = event.local_pos;
        self.interaction.was_dragged = false;
        self.interaction.divider_dragged = false;
        self.interaction.row = None;
        self.interaction.column = None;
        self.interaction.pressed = None;
        self.interaction.resize = None;
        self.last_selected = None;

        if event.button == MouseButton::Left {
            if self.press_column_divider(pos, event.is_double_click()) {
                return true;
            }
            if self.hit_rects.iter().any(|hit| hit.rect.contains(pos)) {
                return true;
            }
        }

        let Some(row) = self.over_row(pos.y) else {
            return true;
        };

        if let Some(column) = self.over_column(pos.x)
            && self.cell_wants(row, column, CellInterest::MOUSE_DOWN)
        {
            self.interaction.row = Some(row);
            self.interaction.column = Some(column);
            if let Some(target) = self.cell_target_at(row, column, pos, CellInterest::MOUSE_DOWN) {
                let stop = self
                    .with_target(&target, |panel, origin| {
                        let cell_event = CellMouseEvent {
                            pos: pos - origin,
                            button: event.button,
                            click_count: event.click_count,
                            modifiers: event.modifiers,
                        };
                        call_guarded_or("cell mouse down", false, || panel.mouse_down(&cell_event))
                    })
                    .unwrap_or(false);
                self.interaction.pressed = Some(target);
                if stop {
                    return true;
                }
            }
        }

        self.select_on_click(row, event.modifiers);
        if event.button == MouseButton::Left && event.is_double_click() && !self.selection.is_empty() {
            self.double_clicked.emit(());
        }
        if event.button == MouseButton::Left && self.drag_support.is_some() {
            self.drag.arm(pos);
        }
        true
    }

    /// Start a divider drag, or fit the column on double click.
    fn press_column_divider(&mut self, pos: Point, double_click: bool) -> bool {
        if self.prevent_user_column_resize {
            return false;
        }
        let Some(column) = self.over_column_divider(pos.x) else {
            return false;
        };
        if !self.columns[column].is_user_resizable() {
            return false;
        }
        if double_click {
            self.size_column_to_fit(column, true);
            return true;
        }
        let pad = self.theme.padding;
        let mut overhead = pad.left + pad.right;
        if self.is_hierarchy_column(column) {
            overhead += self.theme.hierarchy_inset(self.max_depth());
        }
        self.interaction.column = Some(column);
        self.interaction.resize = Some(ColumnResize {
            column,
            start_x: pos.x,
            base_width: self.columns[column].current,
            overhead,
        });
        true
    }

    /// Apply click-to-select semantics for a press on `row`.
    fn select_on_click(&mut self, row: usize, modifiers: KeyboardModifiers) {
        let id = self.cache[row].row.id();
        let changed = if modifiers.shift {
            let anchor = self.selection.anchor().and_then(|anchor| {
                self.cache
                    .iter()
                    .position(|entry| entry.row.id() == anchor)
                    .map(|index| (anchor, index))
            });
            match anchor {
                Some((anchor, index)) => self.select_exact_range(index.min(row), index.max(row), anchor),
                None if !self.selection.contains(id) => self.selection.select_only(id),
                None => false,
            }
        } else if modifiers.discontiguous_selection() {
            self.selection.toggle(id)
        } else if self.selection.contains(id) {
            // Resolved on release so a drag can start from a multi-selection.
            self.last_selected = Some(id);
            false
        } else {
            self.selection.select_only(id)
        };
        self.mark_dirty();
        if changed {
            self.notify_selection_changed();
        }
    }

    /// Handle pointer movement with a button held. Returns whether it was
    /// consumed.
    pub fn mouse_drag(&mut self, event: &MouseMoveEvent) -> bool {
        self.process_deferred();
        self.interaction.was_dragged = true;
        let pos = event.local_pos;
        let left = event.is_button_pressed(MouseButton::Left);
        let button = [MouseButton::Left, MouseButton::Right, MouseButton::Middle]
            .into_iter()
            .find(|b| event.is_button_pressed(*b))
            .unwrap_or(MouseButton::Left);

        let mut stop = false;
        if let Some(resize) = self.interaction.resize {
            if left && !self.prevent_user_column_resize {
                self.drag_column_divider(resize, pos.x);
                stop = true;
            }
        } else if let Some(target) = self.interaction.pressed.clone() {
            stop = self
                .with_target(&target, |panel, origin| {
                    if !panel.interests().contains(CellInterest::MOUSE_DRAG) {
                        return false;
                    }
                    let cell_event = CellMouseEvent {
                        pos: pos - origin,
                        button,
                        click_count: 0,
                        modifiers: event.modifiers,
                    };
                    call_guarded_or("cell mouse drag", false, || panel.mouse_drag(&cell_event))
                })
                .unwrap_or(false);
        }
        if !stop && left {
            self.maybe_start_row_drag(pos);
        }
        stop
    }

    fn drag_column_divider(&mut self, resize: ColumnResize, x: f32) {
        let column = &self.columns[resize.column];
        let mut width = (resize.base_width + x - resize.start_x).max(resize.overhead);
        if column.minimum > 0.0 && width < column.minimum + resize.overhead {
            width = column.minimum + resize.overhead;
        } else if column.maximum > 0.0 && width > column.maximum + resize.overhead {
            width = column.maximum + resize.overhead;
        }
        if column.current != width {
            self.columns[resize.column].current = width;
            self.eventually_sync_to_model();
            self.mark_dirty();
            self.interaction.divider_dragged = true;
        }
    }

    /// Handle a mouse release. Returns whether it was consumed.
    pub fn mouse_up(&mut self, event: &MouseReleaseEvent) -> bool {
        self.process_deferred();
        let pos = event.local_pos;
        let mut stop = false;
        if !self.interaction.divider_dragged && event.button == MouseButton::Left {
            let hit = self.hit_rects.iter().find(|hit| hit.rect.contains(pos)).map(|hit| hit.row);
            if let Some(row_id) = hit {
                self.toggle_disclosure(row_id);
                stop = true;
            }
        }

        if !self.interaction.was_dragged
            && let Some(id) = self.last_selected.take()
        {
            if self.selection.select_only(id) {
                self.notify_selection_changed();
            }
            self.mark_dirty();
        }

        if let Some(target) = self.interaction.pressed.take()
            && !stop
        {
            stop = self
                .with_target(&target, |panel, origin| {
                    if !panel.interests().contains(CellInterest::MOUSE_UP) {
                        return false;
                    }
                    let cell_event = CellMouseEvent {
                        pos: pos - origin,
                        button: event.button,
                        click_count: 0,
                        modifiers: event.modifiers,
                    };
                    call_guarded_or("cell mouse up", false, || panel.mouse_up(&cell_event))
                })
                .unwrap_or(false);
        }
        self.interaction.resize = None;
        self.drag.finish();
        stop
    }

    /// Flip a row's open flag and resync. Collapsing prunes the selection of
    /// the rows it hid.
    fn toggle_disclosure(&mut self, row_id: RowId) {
        let Some(row) = self.cache.iter().find(|e| e.row.id() == row_id).map(|e| e.row.clone()) else {
            return;
        };
        let open = !row.is_open();
        row.set_open(open);
        tracing::trace!(target: "trellis::table", table = %self.id, row = %row_id, open, "disclosure toggled");
        self.sync_to_model();
        if !open {
            self.prune_selection_of_undisclosed_rows();
        }
    }

    // =========================================================================
    // Hover
    // =========================================================================

    /// The pointer entered the table, or moved within it.
    pub fn mouse_enter(&mut self, pos: Point, modifiers: KeyboardModifiers) -> bool {
        let over = self.over_row(pos.y).zip(self.over_column(pos.x));
        if self.interaction.last_motion != over {
            self.mouse_exit();
            self.interaction.last_motion = over;
        }
        let Some((row, column)) = over else {
            return true;
        };
        let target = self.cell_target_at(row, column, pos, CellInterest::HOVER);
        if target == self.interaction.entered {
            return true;
        }
        if self.interaction.entered.is_some() {
            self.mouse_exit();
            self.interaction.last_motion = over;
        }
        if let Some(target) = &target {
            self.with_target(target, |panel, origin| {
                if panel.interests().contains(CellInterest::MOUSE_ENTER) {
                    call_guarded_or("cell mouse enter", (), || panel.mouse_enter(pos - origin, modifiers));
                }
            });
        }
        self.interaction.entered = target;
        true
    }

    /// The pointer moved with no button held.
    pub fn mouse_move(&mut self, event: &MouseMoveEvent) -> bool {
        let pos = event.local_pos;
        self.mouse_enter(pos, event.modifiers);
        if let Some(target) = &self.interaction.entered {
            self.with_target(target, |panel, origin| {
                if panel.interests().contains(CellInterest::MOUSE_MOVE) {
                    call_guarded_or("cell mouse move", (), || panel.mouse_move(pos - origin, event.modifiers));
                }
            });
        }
        true
    }

    /// The pointer left the table, or the cell it was over.
    pub fn mouse_exit(&mut self) -> bool {
        if let Some(target) = self.interaction.entered.take() {
            self.with_target(&target, |panel, _| {
                if panel.interests().contains(CellInterest::MOUSE_EXIT) {
                    call_guarded_or("cell mouse exit", (), || panel.mouse_exit());
                }
            });
        }
        self.interaction.last_motion = None;
        true
    }

    /// Cursor for `pos`: a resize cursor over a resizable divider, otherwise
    /// whatever the cell panel under the pointer asks for.
    pub fn cursor(&self, pos: Point) -> Option<CursorIcon> {
        if !self.prevent_user_column_resize
            && let Some(column) = self.over_column_divider(pos.x)
            && self.columns[column].is_user_resizable()
        {
            return Some(CursorIcon::ColResize);
        }
        let row = self.over_row(pos.y)?;
        let column = self.over_column(pos.x)?;
        let target = self.cell_target_at(row, column, pos, CellInterest::CURSOR)?;
        self.with_target(&target, |panel, origin| {
            call_guarded_or("cell cursor", None, || panel.cursor(pos - origin))
        })
        .flatten()
    }

    /// Tooltip for `pos`, from the deepest cell panel offering one.
    pub fn tooltip(&self, pos: Point) -> Option<String> {
        let row = self.over_row(pos.y)?;
        let column = self.over_column(pos.x)?;
        let target = self.cell_target_at(row, column, pos, CellInterest::TOOLTIP)?;
        self.with_target(&target, |panel, origin| {
            call_guarded_or("cell tooltip", None, || panel.tooltip(pos - origin))
        })
        .flatten()
    }

    // =========================================================================
    // Focus
    // =========================================================================

    /// The table gained keyboard focus. Scrolls the row last interacted with
    /// (or hovered) into view.
    pub fn focus_gained(&mut self) {
        self.focused = true;
        let row = self
            .interaction
            .row
            .or_else(|| self.interaction.last_motion.map(|(row, _)| row));
        if let Some(row) = row {
            self.scroll_row_into_view(row);
        }
        self.mark_dirty();
    }

    pub fn focus_lost(&mut self) {
        self.focused = false;
        self.mark_dirty();
    }

    // =========================================================================
    // Keyboard
    // =========================================================================

    /// Handle a key press. Returns whether the key was used.
    pub fn key_press(&mut self, event: &KeyPressEvent) -> bool {
        self.process_deferred();
        if event.key.is_control_action() {
            if !self.selection.is_empty() {
                self.double_clicked.emit(());
            }
            return true;
        }
        let shift = event.modifiers.shift;
        match event.key {
            Key::ArrowLeft => self.set_selected_open(false),
            Key::ArrowRight => self.set_selected_open(true),
            Key::ArrowUp => {
                let index = if self.has_selection() {
                    self.first_selected_index().map_or(0, |i| i.saturating_sub(1))
                } else {
                    self.cache.len().saturating_sub(1)
                };
                self.keyboard_select(index, shift);
            }
            Key::ArrowDown => {
                let index = self.last_selected_index().map_or(0, |i| i + 1);
                self.keyboard_select(index.min(self.cache.len().saturating_sub(1)), shift);
            }
            Key::Home => {
                if shift && self.has_selection() {
                    let first = self.first_selected_index().unwrap_or(0);
                    self.select_range(0, first);
                } else {
                    self.keyboard_select(0, false);
                }
                self.scroll_row_cell_into_view(0, 0);
            }
            Key::End => {
                let Some(last) = self.last_row_index() else {
                    return true;
                };
                if shift && self.has_selection() {
                    let from = self.last_selected_index().unwrap_or(last);
                    self.select_range(from, last);
                } else {
                    self.keyboard_select(last, false);
                }
                self.scroll_row_cell_into_view(last, 0);
            }
            _ => return false,
        }
        true
    }

    /// Move (or with `extend`, grow) the selection to `index` and reveal it.
    fn keyboard_select(&mut self, index: usize, extend: bool) {
        let Some(entry) = self.cache.get(index) else {
            return;
        };
        let id = entry.row.id();
        let changed = if extend {
            let inserted = self.selection.insert(id);
            self.selection.mark_needs_prune();
            inserted
        } else {
            self.selection.select_only(id)
        };
        self.mark_dirty();
        if changed {
            self.notify_selection_changed();
        }
        self.scroll_row_cell_into_view(index, 0);
    }

    /// Open or close every selected row that is not already in that state.
    fn set_selected_open(&mut self, open: bool) {
        if self.is_filtered() || !self.has_selection() {
            return;
        }
        let mut altered = false;
        for row in self.selected_rows(false) {
            if row.can_have_children() && row.is_open() != open {
                row.set_open(open);
                altered = true;
            }
        }
        if altered {
            self.sync_to_model();
            if !open {
                self.prune_selection_of_undisclosed_rows();
            }
        }
    }
}
