//! End-to-end scenarios driving a table the way a host event loop would.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use cursor_icon::CursorIcon;
use parking_lot::Mutex;
use trellis::model::{RowId, SimpleRow, SimpleTableModel, TableRow};
use trellis::render::{Color, Insets, Point, RecordingRenderer, Rect, Renderer, Size};
use trellis::widget::cell::{CellInterest, CellMouseEvent, CellPanel, CellParams, LabelCell, TextMetrics};
use trellis::widget::drag_drop::{DragData, DropAction};
use trellis::widget::events::{
    Key, KeyPressEvent, KeyboardModifiers, MouseButton, MouseMoveEvent, MousePressEvent,
    MouseReleaseEvent,
};
use trellis::widget::widgets::{ColumnInfo, Table, TableDrop, TableTheme};
use trellis::{Dispatcher, Signal};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("trellis=trace")
        .with_test_writer()
        .try_init();
}

fn count_emissions<A: 'static>(signal: &Signal<A>) -> Arc<AtomicUsize> {
    let count = Arc::new(AtomicUsize::new(0));
    let counter = count.clone();
    signal.connect(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    count
}

fn ids<T: TableRow>(table: &Table<T>) -> Vec<RowId> {
    (0..table.row_count())
        .filter_map(|i| table.row_from_index(i).map(TableRow::id))
        .collect()
}

fn texts(table: &Table<SimpleRow>) -> Vec<String> {
    (0..table.row_count())
        .filter_map(|i| table.row_from_index(i).map(|row| row.text(0)))
        .collect()
}

fn paint_all<T: TableRow>(table: &mut Table<T>) -> RecordingRenderer {
    let size = table.preferred_size();
    let mut renderer = RecordingRenderer::new();
    table.paint(&mut renderer, Rect::new(0.0, 0.0, size.width, size.height));
    renderer
}

fn click<T: TableRow>(table: &mut Table<T>, pos: Point, modifiers: KeyboardModifiers) {
    table.mouse_down(&MousePressEvent::new(MouseButton::Left, pos, 1, modifiers));
    table.mouse_up(&MouseReleaseEvent::new(MouseButton::Left, pos, modifiers));
}

/// A, B (closed, with B1 and B2), C, in a single 200px column using the
/// default theme: 22px rows with a 1px divider, so row `i` starts at `23 * i`.
fn abc_table() -> (Table<SimpleRow>, [SimpleRow; 5]) {
    let a = SimpleRow::new(["A"]);
    let b = SimpleRow::container(["B"]);
    let b1 = SimpleRow::new(["B1"]);
    let b2 = SimpleRow::new(["B2"]);
    b.add_child(b1.clone());
    b.add_child(b2.clone());
    let c = SimpleRow::new(["C"]);
    let mut table = Table::with_dispatcher(
        SimpleTableModel::new(vec![a.clone(), b.clone(), c.clone()]),
        Dispatcher::new(),
    )
    .with_columns(vec![ColumnInfo::new(0).with_current(200.0)]);
    table.sync_to_model();
    (table, [a, b, b1, b2, c])
}

fn row_point(index: usize) -> Point {
    Point::new(100.0, index as f32 * 23.0 + 10.0)
}

/// Centre of the disclosure triangle of root-level row `index`.
fn disclosure_point(index: usize) -> Point {
    Point::new(12.0, index as f32 * 23.0 + 4.0 + 2.0 + 6.0)
}

#[test]
fn expand_select_collapse_scenario() {
    init_tracing();
    let (mut table, [a, b, b1, b2, c]) = abc_table();
    assert_eq!(ids(&table), [a.id(), b.id(), c.id()]);

    paint_all(&mut table);
    click(&mut table, disclosure_point(1), KeyboardModifiers::NONE);
    assert!(b.is_open());
    assert_eq!(ids(&table), [a.id(), b.id(), b1.id(), b2.id(), c.id()]);
    assert_eq!(table.depth_of(2), Some(1));
    assert_eq!(table.depth_of(3), Some(1));
    assert_eq!(table.parent_index_of(3), Some(1));
    // The disclosure click did not touch the selection.
    assert!(!table.has_selection());

    click(&mut table, row_point(0), KeyboardModifiers::NONE);
    click(&mut table, row_point(3), KeyboardModifiers::SHIFT);
    let selected: Vec<RowId> = table.selected_rows(false).iter().map(TableRow::id).collect();
    assert_eq!(selected, [a.id(), b.id(), b1.id(), b2.id()]);

    paint_all(&mut table);
    click(&mut table, disclosure_point(1), KeyboardModifiers::NONE);
    assert_eq!(ids(&table), [a.id(), b.id(), c.id()]);
    let selected: Vec<RowId> = table.selected_rows(false).iter().map(TableRow::id).collect();
    assert_eq!(selected, [a.id(), b.id()]);
}

#[test]
fn collapse_and_expand_preserve_sibling_order() {
    let (mut table, [a, b, b1, b2, c]) = abc_table();
    let nested = SimpleRow::container(["B1a"]).opened();
    let deep = SimpleRow::new(["deep"]);
    nested.add_child(deep.clone());
    b.set_children(vec![b1.clone(), nested.clone(), b2.clone()]);
    nested.set_parent(Some(&b));
    b.set_open(true);
    table.sync_to_model();
    let expanded = ids(&table);
    assert_eq!(expanded, [a.id(), b.id(), b1.id(), nested.id(), deep.id(), b2.id(), c.id()]);
    assert_eq!(table.depth_of(4), Some(2));
    assert_eq!(table.parent_index_of(4), Some(3));

    b.set_open(false);
    table.sync_to_model();
    assert_eq!(ids(&table), [a.id(), b.id(), c.id()]);

    // The nested row kept its open state while hidden.
    b.set_open(true);
    table.sync_to_model();
    assert_eq!(ids(&table), expanded);
}

#[test]
fn toggling_twice_restores_the_cache() {
    let (mut table, [_, b, ..]) = abc_table();
    let before = ids(&table);
    paint_all(&mut table);
    click(&mut table, disclosure_point(1), KeyboardModifiers::NONE);
    assert!(b.is_open());
    paint_all(&mut table);
    click(&mut table, disclosure_point(1), KeyboardModifiers::NONE);
    assert!(!b.is_open());
    assert_eq!(ids(&table), before);
}

#[test]
fn shift_click_selects_exactly_the_range() {
    let rows: Vec<SimpleRow> = (0..6).map(|i| SimpleRow::new([format!("row {i}")])).collect();
    let mut table = Table::with_dispatcher(SimpleTableModel::new(rows), Dispatcher::new())
        .with_columns(vec![ColumnInfo::new(0).with_current(200.0)]);
    table.sync_to_model();
    let changes = count_emissions(&table.selection_changed);
    let toggle = if cfg!(target_os = "macos") {
        KeyboardModifiers::META
    } else {
        KeyboardModifiers::CTRL
    };

    click(&mut table, row_point(1), KeyboardModifiers::NONE);
    click(&mut table, row_point(5), toggle);
    assert_eq!(table.selection_count(), 2);

    click(&mut table, row_point(3), KeyboardModifiers::SHIFT);
    assert_eq!(table.selection_count(), 3);
    assert_eq!((table.first_selected_index(), table.last_selected_index()), (Some(1), Some(3)));
    assert!(!table.is_row_selected(5));

    // The anchor stays on row 1, so extending upwards flips the range.
    click(&mut table, row_point(0), KeyboardModifiers::SHIFT);
    assert_eq!((table.first_selected_index(), table.last_selected_index()), (Some(0), Some(1)));
    assert_eq!(changes.load(Ordering::SeqCst), 4);
}

#[test]
fn removed_rows_are_pruned_from_the_selection() {
    let parent = SimpleRow::container(["parent"]).opened();
    let keep = SimpleRow::new(["keep"]);
    let doomed = SimpleRow::new(["doomed"]);
    parent.add_child(keep.clone());
    parent.add_child(doomed.clone());
    let mut table = Table::with_dispatcher(SimpleTableModel::new(vec![parent.clone()]), Dispatcher::new())
        .with_columns(vec![ColumnInfo::new(0).with_current(200.0)]);
    table.sync_to_model();
    table.select_by_index(&[2]);
    let changes = count_emissions(&table.selection_changed);

    parent.set_children(vec![keep]);
    table.sync_to_model();
    assert!(!table.has_selection());
    assert_eq!(table.selection_count(), 0);
    assert!(table.selected_rows(false).is_empty());
    // Pruning notified exactly once.
    assert_eq!(changes.load(Ordering::SeqCst), 1);
    assert_eq!(table.row_to_index(&doomed), None);
}

#[test]
fn widening_a_column_never_grows_rows() {
    let rows: Vec<SimpleRow> = [
        "short",
        "a considerably longer line of text that wraps",
        "",
        "medium length words here",
    ]
    .into_iter()
    .map(|text| SimpleRow::new([text]))
    .collect();
    let mut table = Table::with_dispatcher(SimpleTableModel::new(rows), Dispatcher::new())
        .with_theme(TableTheme::default().with_padding(Insets::ZERO).with_hierarchy_column(None))
        .with_columns(vec![ColumnInfo::new(0).with_current(40.0)]);
    table.sync_to_model();

    let mut previous = table.row_heights();
    for width in [60.0, 100.0, 250.0, 600.0] {
        table.set_column_width(0, width);
        table.sync_to_model();
        let heights = table.row_heights();
        for (now, before) in heights.iter().zip(&previous) {
            assert!(now <= before, "row grew from {before} to {now} at width {width}");
        }
        previous = heights;
    }
    assert!(previous.iter().all(|h| *h == 16.0));
}

#[test]
fn size_columns_to_fit_uses_widest_content() {
    let metrics = TextMetrics::new(1.0, 10.0);
    let rows: Vec<SimpleRow> = [(10, 50), (30, 5), (20, 0)]
        .into_iter()
        .map(|(first, second)| SimpleRow::new(["x".repeat(first), "y".repeat(second)]).with_metrics(metrics))
        .collect();
    let mut table = Table::with_dispatcher(SimpleTableModel::new(rows), Dispatcher::new())
        .with_theme(
            TableTheme::default()
                .with_padding(Insets::ZERO)
                .with_hierarchy_column(None)
                .with_row_dividers(false)
                .with_column_dividers(false),
        )
        .with_columns(vec![ColumnInfo::new(0), ColumnInfo::new(1)]);
    table.sync_to_model();
    table.size_columns_to_fit(true);

    let widths: Vec<f32> = table.columns().iter().map(|c| c.current).collect();
    assert_eq!(widths, [30.0, 50.0]);
    assert_eq!(table.frame().size, Size::new(80.0, 48.0));
}

#[test]
fn divider_drag_debounces_the_resync() {
    init_tracing();
    let dispatcher = Dispatcher::new();
    let long = "twenty characters ok";
    let mut table = Table::with_dispatcher(
        SimpleTableModel::new(vec![SimpleRow::new([long, "b"])]),
        dispatcher.clone(),
    )
    .with_theme(TableTheme::default().with_hierarchy_column(None))
    .with_columns(vec![
        ColumnInfo::new(0).with_current(50.0),
        ColumnInfo::new(1).with_current(50.0),
    ]);
    table.set_debounce_delay(Duration::ZERO);
    table.sync_to_model();
    // 42px of content fits six 7px characters per line: four lines.
    assert_eq!(table.row_heights(), [64.0]);

    assert_eq!(table.cursor(Point::new(51.0, 5.0)), Some(CursorIcon::ColResize));
    table.mouse_down(&MousePressEvent::new(MouseButton::Left, Point::new(51.0, 5.0), 1, KeyboardModifiers::NONE));
    for x in (61..=201).step_by(10) {
        let event = MouseMoveEvent::drag(Point::new(x as f32, 5.0), MouseButton::Left, KeyboardModifiers::NONE);
        assert!(table.mouse_drag(&event));
    }
    table.mouse_up(&MouseReleaseEvent::new(MouseButton::Left, Point::new(201.0, 5.0), KeyboardModifiers::NONE));

    assert_eq!(table.columns()[0].current, 200.0);
    assert_eq!(dispatcher.scheduled_count(), 1);
    assert!(table.is_sync_pending());
    // The width followed the pointer but the heights wait for the resync.
    assert_eq!(table.row_heights(), [64.0]);

    dispatcher.run_pending();
    assert!(table.process_deferred());
    assert_eq!(table.row_heights(), [22.0]);
    assert!(!table.has_selection());
}

#[test]
fn debounced_fit_runs_once() {
    let dispatcher = Dispatcher::new();
    let mut table = Table::with_dispatcher(
        SimpleTableModel::new(vec![SimpleRow::new(["abc"])]),
        dispatcher.clone(),
    )
    .with_theme(TableTheme::default().with_hierarchy_column(None))
    .with_columns(vec![ColumnInfo::new(0).with_current(500.0)]);
    table.set_debounce_delay(Duration::ZERO);
    table.sync_to_model();

    for _ in 0..5 {
        table.eventually_size_columns_to_fit(false);
    }
    assert_eq!(dispatcher.scheduled_count(), 1);
    assert!(table.is_fit_pending());

    dispatcher.run_pending();
    // Painting picks up the due work.
    paint_all(&mut table);
    assert!(!table.is_fit_pending());
    assert_eq!(table.columns()[0].current, 3.0 * 7.0 + 8.0);
}

#[test]
fn filter_flattens_and_clears() {
    let fruit = SimpleRow::container(["Fruit"]);
    fruit.add_child(SimpleRow::new(["Apple"]));
    fruit.add_child(SimpleRow::new(["Banana"]));
    let mut table = Table::with_dispatcher(
        SimpleTableModel::new(vec![fruit, SimpleRow::new(["Bread"])]),
        Dispatcher::new(),
    )
    .with_columns(vec![ColumnInfo::new(0).with_current(200.0)]);
    table.sync_to_model();
    assert_eq!(texts(&table), ["Fruit", "Bread"]);

    // Rows the predicate rejects are the ones shown.
    table.apply_filter(Some(&|row: &SimpleRow| !row.text(0).starts_with('B')));
    assert!(table.is_filtered());
    assert_eq!(texts(&table), ["Banana", "Bread"]);
    assert_eq!(table.depth_of(0), Some(0));
    assert_eq!(table.root_row_count(), 2);

    table.apply_filter(None);
    assert!(!table.is_filtered());
    assert_eq!(texts(&table), ["Fruit", "Bread"]);
}

#[test]
fn keyboard_disclosure_and_activation() {
    let (mut table, [_, b, b1, ..]) = abc_table();
    let activations = count_emissions(&table.double_clicked);

    table.select_by_index(&[1]);
    assert!(table.key_press(&KeyPressEvent::new(Key::ArrowRight, KeyboardModifiers::NONE)));
    assert!(b.is_open());
    assert_eq!(table.row_count(), 5);

    table.select_by_index(&[2]);
    assert_eq!(table.row_to_index(&b1), Some(2));
    table.key_press(&KeyPressEvent::new(Key::ArrowLeft, KeyboardModifiers::NONE));
    assert!(!b.is_open());
    assert_eq!(table.selection_count(), 1);
    assert!(table.is_row_selected(1));

    table.key_press(&KeyPressEvent::new(Key::NumpadEnter, KeyboardModifiers::NONE));
    assert_eq!(activations.load(Ordering::SeqCst), 1);
    table.clear_selection();
    table.key_press(&KeyPressEvent::new(Key::Enter, KeyboardModifiers::NONE));
    assert_eq!(activations.load(Ordering::SeqCst), 1);
}

// ============================================================================
// Drag and drop across tables
// ============================================================================

fn drag_rows_out(source: &mut Table<SimpleRow>, from: Point, to: Point) -> Arc<DragData> {
    let captured: Arc<Mutex<Option<Arc<DragData>>>> = Arc::new(Mutex::new(None));
    let slot = captured.clone();
    source.drag_started.connect(move |data: &Arc<DragData>| {
        *slot.lock() = Some(data.clone());
    });
    source.mouse_down(&MousePressEvent::new(MouseButton::Left, from, 1, KeyboardModifiers::NONE));
    source.mouse_drag(&MouseMoveEvent::drag(to, MouseButton::Left, KeyboardModifiers::NONE));
    source.mouse_up(&MouseReleaseEvent::new(MouseButton::Left, to, KeyboardModifiers::NONE));
    let data = captured.lock().clone();
    data.expect("drag should have started")
}

fn flat_table(names: &[&str]) -> Table<SimpleRow> {
    let rows = names.iter().map(|name| SimpleRow::new([*name])).collect();
    let mut table = Table::with_dispatcher(SimpleTableModel::new(rows), Dispatcher::new())
        .with_columns(vec![ColumnInfo::new(0).with_current(200.0)]);
    table.sync_to_model();
    table
}

#[test]
fn cross_table_move() {
    init_tracing();
    let mut source = flat_table(&["a", "b", "c"]);
    let mut target = flat_table(&["x"]);
    source.install_drag_support("rows", "row", "rows");
    let removed = count_emissions(&source.drag_removed_rows);
    let dropped = count_emissions(&target.drop_occurred);
    let undo_log: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let log = undo_log.clone();

    let data = drag_rows_out(&mut source, row_point(1), Point::new(100.0, 60.0));
    assert_eq!(data.text().as_deref(), Some("1 row"));

    let mut handler: TableDrop<SimpleRow, String> = TableDrop::new(
        "rows",
        |from, to| from.id() != to.id(),
        |_, _, moving| Some(format!("move={moving}")),
        move |undo, _, _, _| log.lock().extend(undo),
    );
    let below_x = Point::new(100.0, 18.0);
    let hover = handler.drag_over(&target, below_x, &data).expect("drop accepted");
    assert_eq!(hover.index, 1);

    let action = handler.drop_at(&mut target, Some(&mut source), below_x, &data);
    assert_eq!(action, Ok(DropAction::MOVE));
    assert_eq!(texts(&source), ["a", "c"]);
    assert_eq!(texts(&target), ["x", "b"]);
    assert!(!source.has_selection());
    assert!(target.is_row_selected(1));
    assert_eq!(removed.load(Ordering::SeqCst), 1);
    assert_eq!(dropped.load(Ordering::SeqCst), 1);
    assert_eq!(*undo_log.lock(), ["move=true"]);
}

#[test]
fn cross_table_copy_leaves_source_alone() {
    let mut source = flat_table(&["a", "b"]);
    let mut target = flat_table(&[]);
    source.install_drag_support("rows", "row", "rows");
    source.select_all();
    let removed = count_emissions(&source.drag_removed_rows);

    let data = drag_rows_out(&mut source, row_point(0), Point::new(100.0, 40.0));
    assert_eq!(data.text().as_deref(), Some("2 rows"));

    let mut handler: TableDrop<SimpleRow> = TableDrop::new("rows", |_, _| false, |_, _, _| None, |_, _, _, _| {});
    let action = handler.drop_at(&mut target, Some(&mut source), Point::ZERO, &data);
    assert_eq!(action, Ok(DropAction::COPY));
    assert_eq!(texts(&source), ["a", "b"]);
    assert_eq!(texts(&target), ["a", "b"]);
    assert_ne!(ids(&source), ids(&target));
    assert_eq!(removed.load(Ordering::SeqCst), 0);
    assert_eq!(source.selection_count(), 2);
}

// ============================================================================
// Interactive and failing cells
// ============================================================================

#[derive(Clone, Copy, PartialEq)]
enum Probe {
    Button,
    Panics,
    Plain,
}

#[derive(Clone)]
struct ProbeRow {
    id: RowId,
    probe: Probe,
    log: Arc<Mutex<Vec<String>>>,
}

impl ProbeRow {
    fn new(probe: Probe, log: &Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            id: RowId::new(),
            probe,
            log: log.clone(),
        }
    }
}

impl TableRow for ProbeRow {
    fn id(&self) -> RowId {
        self.id
    }

    fn can_have_children(&self) -> bool {
        false
    }

    fn is_open(&self) -> bool {
        false
    }

    fn set_open(&self, _open: bool) {}

    fn children(&self) -> Vec<Self> {
        Vec::new()
    }

    fn set_children(&self, _children: Vec<Self>) {}

    fn parent(&self) -> Option<Self> {
        None
    }

    fn set_parent(&self, _parent: Option<&Self>) {}

    fn clone_for_target(&self, _new_parent: Option<&Self>) -> Self {
        Self {
            id: RowId::new(),
            ..self.clone()
        }
    }

    fn column_cell(&self, _column: usize, params: &CellParams) -> Box<dyn CellPanel> {
        match self.probe {
            Probe::Button => Box::new(ButtonCell {
                button: Button { log: self.log.clone() },
            }),
            Probe::Panics => panic!("cell factory failure"),
            Probe::Plain => Box::new(LabelCell::new("plain", params.foreground)),
        }
    }
}

/// A 100x20 cell with a 20x10 button in its top-left corner.
struct ButtonCell {
    button: Button,
}

impl CellPanel for ButtonCell {
    fn preferred_size(&self, _width_constraint: f32) -> Size {
        Size::new(100.0, 20.0)
    }

    fn paint(&self, renderer: &mut dyn Renderer, bounds: Rect) {
        renderer.fill_rect(Rect::new(bounds.x(), bounds.y(), 20.0, 10.0), Color::GRAY);
    }

    fn children(&self, _size: Size) -> Vec<(Rect, &dyn CellPanel)> {
        vec![(Rect::new(0.0, 0.0, 20.0, 10.0), &self.button as &dyn CellPanel)]
    }
}

struct Button {
    log: Arc<Mutex<Vec<String>>>,
}

impl Button {
    fn record(&self, entry: impl Into<String>) {
        self.log.lock().push(entry.into());
    }
}

impl CellPanel for Button {
    fn preferred_size(&self, _width_constraint: f32) -> Size {
        Size::new(20.0, 10.0)
    }

    fn paint(&self, _renderer: &mut dyn Renderer, _bounds: Rect) {}

    fn interests(&self) -> CellInterest {
        CellInterest::MOUSE_DOWN
            | CellInterest::MOUSE_DRAG
            | CellInterest::MOUSE_UP
            | CellInterest::HOVER
            | CellInterest::CURSOR
            | CellInterest::TOOLTIP
    }

    fn mouse_down(&self, event: &CellMouseEvent) -> bool {
        self.record(format!("down {} {}", event.pos.x, event.pos.y));
        true
    }

    fn mouse_drag(&self, _event: &CellMouseEvent) -> bool {
        self.record("drag");
        true
    }

    fn mouse_up(&self, _event: &CellMouseEvent) -> bool {
        self.record("up");
        true
    }

    fn mouse_enter(&self, _pos: Point, _modifiers: KeyboardModifiers) {
        self.record("enter");
    }

    fn mouse_move(&self, _pos: Point, _modifiers: KeyboardModifiers) {
        self.record("move");
    }

    fn mouse_exit(&self) {
        self.record("exit");
    }

    fn cursor(&self, _pos: Point) -> Option<CursorIcon> {
        Some(CursorIcon::Pointer)
    }

    fn tooltip(&self, _pos: Point) -> Option<String> {
        Some("press me".to_string())
    }
}

fn probe_table(probes: &[Probe], log: &Arc<Mutex<Vec<String>>>) -> Table<ProbeRow> {
    let rows = probes.iter().map(|probe| ProbeRow::new(*probe, log)).collect();
    let mut table = Table::with_dispatcher(SimpleTableModel::new(rows), Dispatcher::new())
        .with_theme(
            TableTheme::default()
                .with_padding(Insets::ZERO)
                .with_hierarchy_column(None)
                .with_row_dividers(false)
                .with_minimum_row_height(20.0),
        )
        .with_columns(vec![ColumnInfo::new(0).with_current(100.0)]);
    table.sync_to_model();
    table
}

#[test]
fn nested_panel_receives_the_gesture() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut table = probe_table(&[Probe::Button, Probe::Plain], &log);

    assert!(table.mouse_down(&MousePressEvent::new(MouseButton::Left, Point::new(5.0, 5.0), 1, KeyboardModifiers::NONE)));
    table.mouse_drag(&MouseMoveEvent::drag(Point::new(8.0, 8.0), MouseButton::Left, KeyboardModifiers::NONE));
    table.mouse_up(&MouseReleaseEvent::new(MouseButton::Left, Point::new(8.0, 8.0), KeyboardModifiers::NONE));
    // The button consumed the press, so nothing was selected.
    assert!(!table.has_selection());

    table.mouse_move(&MouseMoveEvent::hover(Point::new(5.0, 5.0), KeyboardModifiers::NONE));
    table.mouse_move(&MouseMoveEvent::hover(Point::new(50.0, 5.0), KeyboardModifiers::NONE));
    assert_eq!(*log.lock(), ["down 5 5", "drag", "up", "enter", "move", "exit"]);

    assert_eq!(table.cursor(Point::new(5.0, 5.0)), Some(CursorIcon::Pointer));
    assert_eq!(table.cursor(Point::new(50.0, 5.0)), None);
    assert_eq!(table.tooltip(Point::new(5.0, 5.0)).as_deref(), Some("press me"));
    assert_eq!(table.tooltip(Point::new(5.0, 25.0)), None);

    // Outside the button the press falls through to selection.
    click(&mut table, Point::new(50.0, 5.0), KeyboardModifiers::NONE);
    assert!(table.is_row_selected(0));
}

#[test]
fn failing_cell_is_contained() {
    init_tracing();
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut table = probe_table(&[Probe::Plain, Probe::Panics, Probe::Plain], &log);
    assert_eq!(table.row_heights(), [20.0, 20.0, 20.0]);

    let renderer = paint_all(&mut table);
    assert_eq!(renderer.texts(), ["plain", "plain"]);

    click(&mut table, Point::new(50.0, 25.0), KeyboardModifiers::NONE);
    assert!(table.is_row_selected(1));
    assert_eq!(table.cursor(Point::new(50.0, 25.0)), None);
    assert!(log.lock().is_empty());
}
