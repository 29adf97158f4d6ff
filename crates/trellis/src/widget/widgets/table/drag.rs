//! Row drag source and drop target.
//!
//! A table with drag support packages its minimal selection into a
//! [`TableDragData`] once a left-button drag passes the threshold. A
//! [`TableDrop`] attached to the receiving table works out where the rows
//! would land while the drag hovers, and performs the move or copy on drop.

use std::fmt;

use trellis_core::call_guarded_or;
use trellis_render::{Color, Point, Rect, Renderer};

use super::{DragSupport, Table, TableId};
use crate::error::{Result, TableError};
use crate::model::{RowId, TableRow, row_contains_row};
use crate::widget::drag_drop::{DragData, DropAction};

/// Payload of a row drag: the dragged rows and the table they came from.
#[derive(Debug, Clone)]
pub struct TableDragData<T: TableRow> {
    /// The source table.
    pub table: TableId,
    /// Topmost selected rows, in display order.
    pub rows: Vec<T>,
}

/// Where dragged rows would be inserted.
#[derive(Debug, Clone)]
pub struct DropTarget<T: TableRow> {
    /// The row receiving the drop, or `None` for the model's root list.
    pub parent: Option<T>,
    /// Insertion index among `parent`'s children.
    pub index: usize,
    /// Area to highlight: a thin line between rows, or the whole row when
    /// dropping onto a container.
    pub indicator: Rect,
    /// Whether the drop lands inside the row under the pointer.
    pub onto_row: bool,
}

impl<T: TableRow> Table<T> {
    /// Let rows be dragged out of this table.
    ///
    /// The payload is stored in the drag data under `key`, with a text
    /// preview naming the row count using `singular` or `plural`.
    pub fn install_drag_support(
        &mut self,
        key: impl Into<String>,
        singular: impl Into<String>,
        plural: impl Into<String>,
    ) {
        self.drag_support = Some(DragSupport {
            key: key.into(),
            singular: singular.into(),
            plural: plural.into(),
        });
    }

    /// Whether rows can be dragged out of this table.
    pub fn has_drag_support(&self) -> bool {
        self.drag_support.is_some()
    }

    /// Start a row drag if a pending gesture has passed the threshold.
    pub(super) fn maybe_start_row_drag(&mut self, pos: Point) {
        let Some(support) = self.drag_support.clone() else {
            return;
        };
        if !self.drag.passed_threshold(pos) || !self.has_selection() {
            return;
        }
        let rows = self.selected_rows(true);
        let noun = if rows.len() == 1 { &support.singular } else { &support.plural };
        let mut data = DragData::new();
        data.set_text(format!("{} {}", rows.len(), noun));
        tracing::debug!(target: "trellis::drag_drop", table = %self.id, rows = rows.len(), "row drag started");
        data.set_payload(support.key, TableDragData { table: self.id, rows });
        let data = self.drag.begin(data);
        self.drag_started.emit(data);
    }

    /// Forget the row drag in progress. Returns whether one was active.
    ///
    /// Hosts call this when the drag session ends somewhere other than this
    /// table's [`mouse_up`](Self::mouse_up), e.g. on a release over another
    /// table or a cancelled session.
    pub fn end_drag(&mut self) -> bool {
        let ended = self.drag.finish().is_some();
        if ended {
            tracing::trace!(target: "trellis::drag_drop", table = %self.id, "row drag ended");
        }
        ended
    }

    /// Insertion point for rows dropped at `pos`.
    ///
    /// The middle half of a container row drops into it; otherwise the drop
    /// goes before or after the row under the pointer. Below the last row
    /// appends to the root list.
    pub fn drop_target_at(&self, pos: Point) -> DropTarget<T> {
        let content = self.content_rect();
        let line = |y: f32, depth: usize| {
            let indent = if self.theme.hierarchy_column_id.is_some() {
                self.theme.indent_width * depth as f32
            } else {
                0.0
            };
            Rect::new(content.x() + indent, y - 1.0, (content.width() - indent).max(0.0), 2.0)
        };
        let between = |parent: Option<T>, index: usize, indicator: Rect| DropTarget {
            parent,
            index,
            indicator,
            onto_row: false,
        };

        let Some(row) = self.over_row(pos.y) else {
            if pos.y < self.border.top || self.cache.is_empty() {
                return between(None, 0, line(self.border.top, 0));
            }
            let bottom = self.last_row_index().and_then(|last| self.row_frame(last)).map_or(self.border.top, |f| f.bottom());
            return between(None, self.model.root_row_count(), line(bottom, 0));
        };
        let Some(frame) = self.row_frame(row) else {
            return between(None, self.model.root_row_count(), line(self.border.top, 0));
        };
        let entry = &self.cache[row];
        let quarter = frame.height() / 4.0;
        let container = entry.row.can_have_children() && !self.is_filtered();

        if container && pos.y >= frame.y() + quarter && pos.y < frame.bottom() - quarter {
            let index = if entry.row.is_open() { 0 } else { entry.row.children().len() };
            return DropTarget {
                parent: Some(entry.row.clone()),
                index,
                indicator: frame,
                onto_row: true,
            };
        }

        let before = pos.y < frame.center().y;
        if !before && container && entry.row.is_open() && !entry.row.children().is_empty() {
            return between(Some(entry.row.clone()), 0, line(frame.bottom(), entry.depth + 1));
        }
        let parent = entry.parent.map(|p| self.cache[p].row.clone());
        let position = self.sibling_position(parent.as_ref(), entry.row.id());
        if before {
            between(parent, position, line(frame.y(), entry.depth))
        } else {
            between(parent, position + 1, line(frame.bottom(), entry.depth))
        }
    }

    fn sibling_position(&self, parent: Option<&T>, id: RowId) -> usize {
        let siblings = match parent {
            Some(parent) => parent.children(),
            None => self.model.root_rows(),
        };
        siblings.iter().position(|row| row.id() == id).unwrap_or(siblings.len())
    }

    /// Remove a root row from the model. Returns its former index.
    fn detach_root(&mut self, id: RowId) -> Option<usize> {
        let mut roots = self.model.root_rows();
        let index = roots.iter().position(|row| row.id() == id)?;
        roots.remove(index);
        self.model.set_root_rows(roots);
        if let Some(filtered) = self.filtered_rows.as_mut() {
            filtered.retain(|row| row.id() != id);
        }
        Some(index)
    }
}

/// Remove `id` from `parent`'s children. Returns its former index.
fn detach_child<T: TableRow>(parent: &T, id: RowId) -> Option<usize> {
    let mut children = parent.children();
    let index = children.iter().position(|row| row.id() == id)?;
    children.remove(index);
    parent.set_children(children);
    Some(index)
}

type ShouldMove<T> = Box<dyn Fn(&Table<T>, &Table<T>) -> bool + Send + Sync>;
type WillDrop<T, U> = Box<dyn Fn(&Table<T>, &Table<T>, bool) -> Option<U> + Send + Sync>;
type DidDrop<T, U> = Box<dyn Fn(Option<U>, &Table<T>, &Table<T>, bool) + Send + Sync>;

/// Drop handling for a table accepting rows dragged under `key`.
///
/// `U` is whatever the host records around a drop (typically an undo
/// entry): `will_drop` produces it before any row is touched and `did_drop`
/// receives it afterwards.
pub struct TableDrop<T: TableRow, U = ()> {
    key: String,
    should_move: ShouldMove<T>,
    will_drop: WillDrop<T, U>,
    did_drop: DidDrop<T, U>,
    target: Option<DropTarget<T>>,
}

impl<T: TableRow, U> fmt::Debug for TableDrop<T, U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableDrop")
            .field("key", &self.key)
            .field("has_target", &self.target.is_some())
            .finish()
    }
}

impl<T: TableRow, U> TableDrop<T, U> {
    /// Create drop handling for rows dragged under `key`.
    ///
    /// `should_move(from, to)` decides between moving and copying.
    pub fn new(
        key: impl Into<String>,
        should_move: impl Fn(&Table<T>, &Table<T>) -> bool + Send + Sync + 'static,
        will_drop: impl Fn(&Table<T>, &Table<T>, bool) -> Option<U> + Send + Sync + 'static,
        did_drop: impl Fn(Option<U>, &Table<T>, &Table<T>, bool) + Send + Sync + 'static,
    ) -> Self {
        Self {
            key: key.into(),
            should_move: Box::new(should_move),
            will_drop: Box::new(will_drop),
            did_drop: Box::new(did_drop),
            target: None,
        }
    }

    /// The payload key this drop accepts.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The target computed by the last [`drag_over`](Self::drag_over).
    pub fn current_target(&self) -> Option<&DropTarget<T>> {
        self.target.as_ref()
    }

    fn payload<'a>(&self, data: &'a DragData) -> Result<&'a TableDragData<T>> {
        data.payload::<TableDragData<T>>(&self.key).ok_or_else(|| {
            if data.has_payload(&self.key) {
                TableError::row_type_mismatch(&self.key)
            } else {
                TableError::missing_payload(&self.key)
            }
        })
    }

    fn validate(&self, table: &Table<T>, pos: Point, data: &DragData) -> Result<(DropTarget<T>, Vec<T>, TableId)> {
        let payload = self.payload(data)?;
        if table.is_filtered() {
            return Err(TableError::FilteredTarget(table.id()));
        }
        let target = table.drop_target_at(pos);
        if let Some(parent) = &target.parent
            && payload.rows.iter().any(|row| row_contains_row(row, parent))
        {
            return Err(TableError::DropIntoOwnSubtree);
        }
        Ok((target, payload.rows.clone(), payload.table))
    }

    /// The drag moved over `table`. Returns where the rows would land, or
    /// `None` when this drop would be refused.
    pub fn drag_over(&mut self, table: &Table<T>, pos: Point, data: &DragData) -> Option<DropTarget<T>> {
        self.target = self.validate(table, pos, data).ok().map(|(target, _, _)| target);
        self.target.clone()
    }

    /// The drag left the table.
    pub fn drag_exit(&mut self) {
        self.target = None;
    }

    /// Paint the current insertion indicator, if any.
    pub fn draw_indicator(&self, renderer: &mut dyn Renderer, color: Color) {
        let Some(target) = &self.target else {
            return;
        };
        let rect = target.indicator;
        if target.onto_row {
            let edge = 2.0_f32.min(rect.height() / 2.0);
            renderer.fill_rect(Rect::new(rect.x(), rect.y(), rect.width(), edge), color);
            renderer.fill_rect(Rect::new(rect.x(), rect.bottom() - edge, rect.width(), edge), color);
            renderer.fill_rect(Rect::new(rect.x(), rect.y(), edge, rect.height()), color);
            renderer.fill_rect(Rect::new(rect.right() - edge, rect.y(), edge, rect.height()), color);
        } else {
            renderer.fill_rect(rect, color);
        }
    }

    /// Drop the dragged rows into `target` at `pos`.
    ///
    /// `source` is the table the drag came from when it is not `target`.
    /// Rows are moved when `should_move` agrees, and copied with fresh
    /// identities otherwise. The dropped rows become the target's selection.
    pub fn drop_at(
        &mut self,
        target: &mut Table<T>,
        mut source: Option<&mut Table<T>>,
        pos: Point,
        data: &DragData,
    ) -> Result<DropAction> {
        self.target = None;
        target.end_drag();
        if let Some(source) = source.as_deref_mut() {
            source.end_drag();
        }
        let (drop_target, rows, origin) = self.validate(target, pos, data)?;
        let same_table = origin == target.id();
        if !same_table && source.as_deref().is_none_or(|s| s.id() != origin) {
            return Err(TableError::UnknownSource(origin));
        }

        let (move_rows, undo) = {
            let to: &Table<T> = target;
            let from = if same_table { to } else { source.as_deref().unwrap_or(to) };
            let move_rows = call_guarded_or("table drop should_move", false, || (self.should_move)(from, to));
            let undo = call_guarded_or("table drop will_drop", None, || (self.will_drop)(from, to, move_rows));
            (move_rows, undo)
        };

        let parent = drop_target.parent;
        let mut index = drop_target.index;
        let inserted: Vec<T> = if move_rows {
            for row in &rows {
                let old_parent = row.parent();
                let same_container = match (&old_parent, &parent) {
                    (Some(old), Some(new)) => old.id() == new.id(),
                    (None, None) => same_table,
                    _ => false,
                };
                let removed_at = match &old_parent {
                    Some(old) => detach_child(old, row.id()),
                    None if same_table => target.detach_root(row.id()),
                    None => source.as_deref_mut().and_then(|s| s.detach_root(row.id())),
                };
                if same_container && removed_at.is_some_and(|at| at < index) {
                    index -= 1;
                }
                row.set_parent(parent.as_ref());
            }
            rows
        } else {
            rows.iter().map(|row| row.clone_for_target(parent.as_ref())).collect()
        };

        match &parent {
            Some(parent) => {
                let mut children = parent.children();
                let at = index.min(children.len());
                children.splice(at..at, inserted.iter().cloned());
                parent.set_children(children);
                if !parent.is_open() {
                    parent.set_open(true);
                }
            }
            None => {
                let mut roots = target.model.root_rows();
                let at = index.min(roots.len());
                roots.splice(at..at, inserted.iter().cloned());
                target.model.set_root_rows(roots);
            }
        }

        tracing::debug!(
            target: "trellis::drag_drop",
            table = %target.id(),
            rows = inserted.len(),
            moved = move_rows,
            index,
            "rows dropped"
        );

        target.sync_to_model();
        if target.selection.select_exactly(inserted.iter().map(|row| row.id())) {
            target.notify_selection_changed();
        }
        if move_rows
            && !same_table
            && let Some(source) = source.as_deref_mut()
        {
            source.sync_to_model();
            source.prune_selection_of_undisclosed_rows();
            source.drag_removed_rows.emit(());
        }
        target.drop_occurred.emit(());

        let to: &Table<T> = target;
        let from = if same_table { to } else { source.as_deref().unwrap_or(to) };
        call_guarded_or("table drop did_drop", (), || (self.did_drop)(undo, from, to, move_rows));

        Ok(if move_rows { DropAction::MOVE } else { DropAction::COPY })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use parking_lot::Mutex;
    use trellis_core::Dispatcher;
    use trellis_render::RecordingRenderer;

    use super::super::{ColumnInfo, TableTheme};
    use super::*;
    use crate::model::{SimpleRow, SimpleTableModel};
    use crate::widget::events::{KeyboardModifiers, MouseButton, MouseMoveEvent, MousePressEvent};

    fn table(rows: Vec<SimpleRow>) -> Table<SimpleRow> {
        let mut table = Table::with_dispatcher(SimpleTableModel::new(rows), Dispatcher::new())
            .with_theme(
                TableTheme::default()
                    .with_padding(trellis_render::Insets::ZERO)
                    .with_row_dividers(false)
                    .with_minimum_row_height(20.0),
            )
            .with_columns(vec![ColumnInfo::new(0).with_current(100.0)]);
        table.sync_to_model();
        table
    }

    fn texts(table: &Table<SimpleRow>) -> Vec<String> {
        (0..table.row_count())
            .filter_map(|i| table.row_from_index(i).map(|r| r.text(0)))
            .collect()
    }

    fn payload(table: &Table<SimpleRow>, rows: Vec<SimpleRow>) -> DragData {
        let mut data = DragData::new();
        data.set_payload("rows", TableDragData { table: table.id(), rows });
        data
    }

    fn always_move() -> TableDrop<SimpleRow> {
        TableDrop::new("rows", |_, _| true, |_, _, _| Some(()), |_, _, _, _| {})
    }

    #[test]
    fn test_drag_starts_past_threshold() {
        let rows: Vec<SimpleRow> = ["a", "b", "c"].into_iter().map(|t| SimpleRow::new([t])).collect();
        let mut table = table(rows);
        table.install_drag_support("rows", "row", "rows");
        let started = Arc::new(Mutex::new(None));
        let slot = started.clone();
        table.drag_started.connect(move |data: &Arc<DragData>| {
            *slot.lock() = data.text();
        });

        table.select_range(0, 1);
        table.mouse_down(&MousePressEvent::new(MouseButton::Left, Point::new(10.0, 5.0), 1, KeyboardModifiers::NONE));
        table.mouse_drag(&MouseMoveEvent::drag(Point::new(11.0, 6.0), MouseButton::Left, KeyboardModifiers::NONE));
        assert!(started.lock().is_none());
        table.mouse_drag(&MouseMoveEvent::drag(Point::new(10.0, 15.0), MouseButton::Left, KeyboardModifiers::NONE));
        assert_eq!(started.lock().as_deref(), Some("2 rows"));
        // Pressing on a selected row kept the multi-selection.
        assert_eq!(table.selection_count(), 2);
    }

    #[test]
    fn test_press_after_unreleased_drag_is_handled() {
        let rows: Vec<SimpleRow> = ["a", "b", "c"].into_iter().map(|t| SimpleRow::new([t])).collect();
        let mut table = table(rows);
        table.install_drag_support("rows", "row", "rows");
        table.select_by_index(&[0]);
        table.mouse_down(&MousePressEvent::new(MouseButton::Left, Point::new(10.0, 5.0), 1, KeyboardModifiers::NONE));
        table.mouse_drag(&MouseMoveEvent::drag(Point::new(10.0, 25.0), MouseButton::Left, KeyboardModifiers::NONE));

        // The release went to another table, so this one never saw it.
        let consumed =
            table.mouse_down(&MousePressEvent::new(MouseButton::Left, Point::new(10.0, 45.0), 1, KeyboardModifiers::NONE));
        assert!(consumed);
        assert_eq!(table.first_selected_index(), Some(2));
        assert_eq!(table.selection_count(), 1);
    }

    #[test]
    fn test_end_drag_resets_gesture() {
        let rows: Vec<SimpleRow> = ["a", "b"].into_iter().map(|t| SimpleRow::new([t])).collect();
        let mut table = table(rows);
        table.install_drag_support("rows", "row", "rows");
        assert!(!table.end_drag());

        table.select_by_index(&[0]);
        table.mouse_down(&MousePressEvent::new(MouseButton::Left, Point::new(10.0, 5.0), 1, KeyboardModifiers::NONE));
        table.mouse_drag(&MouseMoveEvent::drag(Point::new(10.0, 25.0), MouseButton::Left, KeyboardModifiers::NONE));
        assert!(table.end_drag());
        assert!(!table.end_drag());
    }

    #[test]
    fn test_drop_target_regions() {
        let folder = SimpleRow::container(["folder"]);
        folder.add_child(SimpleRow::new(["inner"]));
        let table = table(vec![SimpleRow::new(["a"]), folder.clone()]);

        let before = table.drop_target_at(Point::new(5.0, 2.0));
        assert!(before.parent.is_none());
        assert_eq!(before.index, 0);

        let after = table.drop_target_at(Point::new(5.0, 18.0));
        assert_eq!(after.index, 1);
        assert_eq!(after.indicator, Rect::new(0.0, 19.0, 100.0, 2.0));

        let onto = table.drop_target_at(Point::new(5.0, 30.0));
        assert!(onto.onto_row);
        assert_eq!(onto.parent.map(|p| p.id()), Some(folder.id()));
        // Closed folder: appended after its existing child.
        assert_eq!(onto.index, 1);

        let end = table.drop_target_at(Point::new(5.0, 300.0));
        assert_eq!((end.parent.is_none(), end.index), (true, 2));
    }

    #[test]
    fn test_reorder_within_table() {
        let rows: Vec<SimpleRow> = ["a", "b", "c", "d"].into_iter().map(|t| SimpleRow::new([t])).collect();
        let mut table = table(rows.clone());
        let data = payload(&table, vec![rows[0].clone()]);
        let mut drop = always_move();

        // Below "c": index 3 before adjustment, 2 after removing "a".
        let action = drop.drop_at(&mut table, None, Point::new(5.0, 55.0), &data);
        assert_eq!(action, Ok(DropAction::MOVE));
        assert_eq!(texts(&table), ["b", "c", "a", "d"]);
        assert!(table.is_row_selected(2));
    }

    #[test]
    fn test_copy_into_container_opens_it() {
        let folder = SimpleRow::container(["folder"]);
        let leaf = SimpleRow::new(["leaf"]);
        let mut table = table(vec![folder.clone(), leaf.clone()]);
        let data = payload(&table, vec![leaf.clone()]);
        let mut drop: TableDrop<SimpleRow> = TableDrop::new("rows", |_, _| false, |_, _, _| None, |_, _, _, _| {});

        assert_eq!(drop.drop_at(&mut table, None, Point::new(5.0, 10.0), &data), Ok(DropAction::COPY));
        assert!(folder.is_open());
        assert_eq!(texts(&table), ["folder", "leaf", "leaf"]);
        let copy = &folder.children()[0];
        assert_ne!(copy.id(), leaf.id());
        assert_eq!(copy.parent().map(|p| p.id()), Some(folder.id()));
    }

    #[test]
    fn test_refused_drops() {
        let folder = SimpleRow::container(["folder"]).opened();
        folder.add_child(SimpleRow::new(["child"]));
        let mut table = table(vec![folder.clone()]);
        let mut drop = always_move();

        let empty = DragData::new();
        assert_eq!(
            drop.drop_at(&mut table, None, Point::ZERO, &empty),
            Err(TableError::missing_payload("rows"))
        );

        let mut wrong = DragData::new();
        wrong.set_payload("rows", 7_u32);
        assert_eq!(
            drop.drop_at(&mut table, None, Point::ZERO, &wrong),
            Err(TableError::row_type_mismatch("rows"))
        );

        // Onto the folder's own row.
        let data = payload(&table, vec![folder.clone()]);
        assert_eq!(
            drop.drop_at(&mut table, None, Point::new(5.0, 10.0), &data),
            Err(TableError::DropIntoOwnSubtree)
        );
        assert!(drop.drag_over(&table, Point::new(5.0, 10.0), &data).is_none());

        let other = self::table(vec![SimpleRow::new(["x"])]);
        let foreign = payload(&other, other.root_rows());
        assert_eq!(
            drop.drop_at(&mut table, None, Point::new(5.0, 30.0), &foreign),
            Err(TableError::UnknownSource(other.id()))
        );

        table.apply_filter(Some(&|_: &SimpleRow| false));
        assert_eq!(
            drop.drop_at(&mut table, None, Point::new(5.0, 30.0), &data),
            Err(TableError::FilteredTarget(table.id()))
        );
    }

    #[test]
    fn test_hooks_run_around_drop() {
        let rows: Vec<SimpleRow> = ["a", "b"].into_iter().map(|t| SimpleRow::new([t])).collect();
        let mut table = table(rows.clone());
        let calls = Arc::new(AtomicUsize::new(0));
        let (will, did) = (calls.clone(), calls.clone());
        let mut drop: TableDrop<SimpleRow, usize> = TableDrop::new(
            "rows",
            |_, _| panic!("predicate failure"),
            move |_, _, moving| {
                assert!(!moving);
                Some(will.fetch_add(1, Ordering::SeqCst))
            },
            move |undo, _, to, _| {
                assert_eq!(undo, Some(0));
                assert_eq!(to.row_count(), 3);
                did.fetch_add(1, Ordering::SeqCst);
            },
        );
        let data = payload(&table, vec![rows[1].clone()]);

        // A panicking predicate falls back to copying.
        assert_eq!(drop.drop_at(&mut table, None, Point::new(5.0, 300.0), &data), Ok(DropAction::COPY));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_draw_indicator() {
        let table = table(vec![SimpleRow::new(["a"])]);
        let data = payload(&table, Vec::new());
        let mut drop = always_move();
        let mut renderer = RecordingRenderer::new();

        drop.draw_indicator(&mut renderer, Color::BLACK);
        assert!(renderer.commands().is_empty());

        assert!(drop.drag_over(&table, Point::new(5.0, 2.0), &data).is_some());
        drop.draw_indicator(&mut renderer, Color::BLACK);
        assert_eq!(renderer.rects_with_color(Color::BLACK), [Rect::new(0.0, -1.0, 100.0, 2.0)]);

        drop.drag_exit();
        assert!(drop.current_target().is_none());
    }
}
