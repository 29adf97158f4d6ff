//! A ready-made row type holding one string per column.

use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use super::row::{RowId, TableRow};
use crate::widget::cell::{CellPanel, CellParams, LabelCell, TextMetrics};

struct SimpleRowData {
    id: RowId,
    cells: Vec<String>,
    container: bool,
    open: bool,
    metrics: TextMetrics,
    children: Vec<SimpleRow>,
    parent: Weak<RwLock<SimpleRowData>>,
}

/// A text-only row backed by shared, lock-protected data.
///
/// Parents are held weakly so a tree of rows never forms a reference cycle.
///
/// ```
/// use trellis::model::{SimpleRow, TableRow};
///
/// let folder = SimpleRow::container(["Documents", "3 items"]);
/// folder.add_child(SimpleRow::new(["notes.txt", "2 KB"]));
/// assert_eq!(folder.children().len(), 1);
/// assert!(folder.children()[0].parent().is_some());
/// ```
#[derive(Clone)]
pub struct SimpleRow {
    inner: Arc<RwLock<SimpleRowData>>,
}

impl std::fmt::Debug for SimpleRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let data = self.inner.read();
        f.debug_struct("SimpleRow")
            .field("id", &data.id)
            .field("cells", &data.cells)
            .field("container", &data.container)
            .field("open", &data.open)
            .field("children", &data.children.len())
            .finish()
    }
}

impl SimpleRow {
    fn build<I, S>(cells: I, container: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            inner: Arc::new(RwLock::new(SimpleRowData {
                id: RowId::new(),
                cells: cells.into_iter().map(Into::into).collect(),
                container,
                open: false,
                metrics: TextMetrics::default(),
                children: Vec::new(),
                parent: Weak::new(),
            })),
        }
    }

    /// A leaf row.
    pub fn new<I, S>(cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::build(cells, false)
    }

    /// A row that can have children. Starts closed.
    pub fn container<I, S>(cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::build(cells, true)
    }

    /// Set the text metrics used by this row's cells.
    pub fn with_metrics(self, metrics: TextMetrics) -> Self {
        self.inner.write().metrics = metrics;
        self
    }

    /// Set the open flag, builder style.
    pub fn opened(self) -> Self {
        self.inner.write().open = true;
        self
    }

    /// Append a child and point its parent link at this row.
    pub fn add_child(&self, child: SimpleRow) {
        child.inner.write().parent = Arc::downgrade(&self.inner);
        self.inner.write().children.push(child);
    }

    /// Text of column `column`, empty when the row has fewer cells.
    pub fn text(&self, column: usize) -> String {
        self.inner.read().cells.get(column).cloned().unwrap_or_default()
    }

    /// Replace the text of column `column`, growing the cell list as needed.
    pub fn set_text(&self, column: usize, text: impl Into<String>) {
        let mut data = self.inner.write();
        if data.cells.len() <= column {
            data.cells.resize(column + 1, String::new());
        }
        data.cells[column] = text.into();
    }

    fn from_data(inner: Arc<RwLock<SimpleRowData>>) -> Self {
        Self { inner }
    }
}

impl TableRow for SimpleRow {
    fn id(&self) -> RowId {
        self.inner.read().id
    }

    fn can_have_children(&self) -> bool {
        self.inner.read().container
    }

    fn is_open(&self) -> bool {
        self.inner.read().open
    }

    fn set_open(&self, open: bool) {
        self.inner.write().open = open;
    }

    fn children(&self) -> Vec<Self> {
        self.inner.read().children.clone()
    }

    fn set_children(&self, children: Vec<Self>) {
        self.inner.write().children = children;
    }

    fn parent(&self) -> Option<Self> {
        self.inner.read().parent.upgrade().map(Self::from_data)
    }

    fn set_parent(&self, parent: Option<&Self>) {
        self.inner.write().parent = parent.map_or_else(Weak::new, |p| Arc::downgrade(&p.inner));
    }

    fn clone_for_target(&self, new_parent: Option<&Self>) -> Self {
        let (cells, container, open, metrics, children) = {
            let data = self.inner.read();
            (
                data.cells.clone(),
                data.container,
                data.open,
                data.metrics,
                data.children.clone(),
            )
        };
        let copy = Self::build(cells, container).with_metrics(metrics);
        copy.inner.write().open = open;
        copy.set_parent(new_parent);
        let copied_children = children
            .iter()
            .map(|child| child.clone_for_target(Some(&copy)))
            .collect();
        copy.set_children(copied_children);
        copy
    }

    fn column_cell(&self, column: usize, params: &CellParams) -> Box<dyn CellPanel> {
        let data = self.inner.read();
        let text = data.cells.get(column).cloned().unwrap_or_default();
        Box::new(LabelCell::new(text, params.foreground).with_metrics(data.metrics))
    }
}
