//! Cell content produced by rows.
//!
//! Each visible cell is a small tree of [`CellPanel`]s built on demand by
//! [`TableRow::column_cell`](crate::model::TableRow::column_cell). The table
//! creates a fresh panel tree whenever it needs one (painting, measuring, or
//! routing an event), so panels hold no state across calls; anything that
//! must persist belongs to the row.
//!
//! Pointer events are routed to the deepest panel under the pointer that
//! declares interest in that event kind through [`CellPanel::interests`].
//! Panels remember nothing, so the table identifies a panel between events by
//! its child-index path from the cell root.

use std::ops::{BitOr, BitOrAssign};

use cursor_icon::CursorIcon;
use trellis_render::{Color, Point, Rect, Renderer, Size};

use super::events::{KeyboardModifiers, MouseButton};

/// Visual state handed to a row when it builds a cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellParams {
    /// Index of the row in the table's row cache.
    pub row_index: usize,
    /// ID of the column the cell belongs to.
    pub column_id: u32,
    /// Ink for the cell's content.
    pub foreground: Color,
    /// Ink behind the cell's content.
    pub background: Color,
    /// The row itself is selected.
    pub selected: bool,
    /// An ancestor of the row is selected.
    pub indirectly_selected: bool,
    /// The table has keyboard focus.
    pub focused: bool,
}

/// Event kinds a panel wants to receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CellInterest(u8);

impl CellInterest {
    /// No events.
    pub const NONE: Self = Self(0);
    /// [`CellPanel::mouse_down`].
    pub const MOUSE_DOWN: Self = Self(1 << 0);
    /// [`CellPanel::mouse_drag`].
    pub const MOUSE_DRAG: Self = Self(1 << 1);
    /// [`CellPanel::mouse_up`].
    pub const MOUSE_UP: Self = Self(1 << 2);
    /// [`CellPanel::mouse_enter`].
    pub const MOUSE_ENTER: Self = Self(1 << 3);
    /// [`CellPanel::mouse_move`].
    pub const MOUSE_MOVE: Self = Self(1 << 4);
    /// [`CellPanel::mouse_exit`].
    pub const MOUSE_EXIT: Self = Self(1 << 5);
    /// [`CellPanel::cursor`].
    pub const CURSOR: Self = Self(1 << 6);
    /// [`CellPanel::tooltip`].
    pub const TOOLTIP: Self = Self(1 << 7);

    /// Any hover event.
    pub const HOVER: Self = Self(Self::MOUSE_ENTER.0 | Self::MOUSE_MOVE.0 | Self::MOUSE_EXIT.0);

    /// Whether every kind in `other` is present.
    pub fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Whether any kind in `other` is present.
    pub fn intersects(self, other: Self) -> bool {
        (self.0 & other.0) != 0
    }
}

impl BitOr for CellInterest {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for CellInterest {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// A mouse button event forwarded into a cell panel.
#[derive(Debug, Clone, Copy)]
pub struct CellMouseEvent {
    /// Position in the receiving panel's coordinates.
    pub pos: Point,
    pub button: MouseButton,
    /// Only meaningful for mouse down.
    pub click_count: u32,
    pub modifiers: KeyboardModifiers,
}

/// Renderable, optionally interactive cell content.
///
/// All handlers default to doing nothing. Handlers returning `bool` report
/// whether they consumed the event; a consumed mouse down suppresses the
/// table's own selection handling.
pub trait CellPanel {
    /// Preferred size for the given width. A constraint of zero or less
    /// means "unconstrained".
    ///
    /// Height should not increase as the width constraint grows.
    fn preferred_size(&self, width_constraint: f32) -> Size;

    /// Paint into `bounds`, given in the renderer's current coordinates.
    fn paint(&self, renderer: &mut dyn Renderer, bounds: Rect);

    /// Child panels with their frames relative to this panel, laid out for a
    /// panel of `size`.
    fn children(&self, _size: Size) -> Vec<(Rect, &dyn CellPanel)> {
        Vec::new()
    }

    /// Event kinds this panel handles.
    fn interests(&self) -> CellInterest {
        CellInterest::NONE
    }

    fn mouse_down(&self, _event: &CellMouseEvent) -> bool {
        false
    }

    fn mouse_drag(&self, _event: &CellMouseEvent) -> bool {
        false
    }

    fn mouse_up(&self, _event: &CellMouseEvent) -> bool {
        false
    }

    fn mouse_enter(&self, _pos: Point, _modifiers: KeyboardModifiers) {}

    fn mouse_move(&self, _pos: Point, _modifiers: KeyboardModifiers) {}

    fn mouse_exit(&self) {}

    /// Cursor to show at `pos`, if this panel has an opinion.
    fn cursor(&self, _pos: Point) -> Option<CursorIcon> {
        None
    }

    /// Tooltip text for `pos`.
    fn tooltip(&self, _pos: Point) -> Option<String> {
        None
    }
}

/// Location of a panel inside a cell's panel tree.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PanelPath(Vec<usize>);

impl PanelPath {
    /// The cell's root panel.
    pub fn root() -> Self {
        Self::default()
    }

    /// Child indices from the root.
    pub fn indices(&self) -> &[usize] {
        &self.0
    }
}

/// Whether `panel` or any descendant declares any of `interest`.
pub(crate) fn has_interest_in_tree(panel: &dyn CellPanel, size: Size, interest: CellInterest) -> bool {
    if panel.interests().intersects(interest) {
        return true;
    }
    panel
        .children(size)
        .into_iter()
        .any(|(frame, child)| has_interest_in_tree(child, frame.size, interest))
}

/// Find the deepest panel under `point` that declares any of `interest`.
///
/// Descends through the child containing `point` at each level, then keeps
/// the deepest panel on that chain with the interest. Returns the panel's
/// path and its origin in cell coordinates.
pub(crate) fn hit_test(
    root: &dyn CellPanel,
    size: Size,
    point: Point,
    interest: CellInterest,
) -> Option<(PanelPath, Point)> {
    let mut path = Vec::new();
    let mut origin = Point::ZERO;
    let mut best = root
        .interests()
        .intersects(interest)
        .then(|| (PanelPath(Vec::new()), Point::ZERO));

    let mut current: &dyn CellPanel = root;
    let mut current_size = size;
    loop {
        let local = point - origin;
        let next = current
            .children(current_size)
            .into_iter()
            .enumerate()
            .rev()
            .find(|(_, (frame, _))| frame.contains(local));
        let Some((index, (frame, child))) = next else {
            break;
        };
        path.push(index);
        origin = origin + frame.origin;
        if child.interests().intersects(interest) {
            best = Some((PanelPath(path.clone()), origin));
        }
        current = child;
        current_size = frame.size;
    }
    best
}

/// Follow `path` from `root`, returning the panel and its origin in cell
/// coordinates. `None` when the tree no longer has that shape.
pub(crate) fn resolve<'a>(
    root: &'a dyn CellPanel,
    size: Size,
    path: &PanelPath,
) -> Option<(&'a dyn CellPanel, Point)> {
    let mut current = root;
    let mut current_size = size;
    let mut origin = Point::ZERO;
    for &index in path.indices() {
        let (frame, child) = current.children(current_size).into_iter().nth(index)?;
        origin = origin + frame.origin;
        current = child;
        current_size = frame.size;
    }
    Some((current, origin))
}

/// Fixed-pitch text measurement used by [`LabelCell`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextMetrics {
    /// Advance of every character.
    pub char_width: f32,
    /// Height of one line.
    pub line_height: f32,
}

impl TextMetrics {
    /// Create new metrics.
    pub const fn new(char_width: f32, line_height: f32) -> Self {
        Self {
            char_width,
            line_height,
        }
    }

    /// Characters that fit on one line of `width`, at least one.
    fn chars_per_line(&self, width: f32) -> usize {
        if self.char_width <= 0.0 {
            return usize::MAX;
        }
        ((width / self.char_width).floor() as usize).max(1)
    }
}

impl Default for TextMetrics {
    fn default() -> Self {
        Self::new(7.0, 14.0)
    }
}

/// A wrapping, non-interactive text cell.
#[derive(Debug, Clone)]
pub struct LabelCell {
    text: String,
    color: Color,
    metrics: TextMetrics,
    tooltip: Option<String>,
}

impl LabelCell {
    /// Create a label drawing `text` in `color`.
    pub fn new(text: impl Into<String>, color: Color) -> Self {
        Self {
            text: text.into(),
            color,
            metrics: TextMetrics::default(),
            tooltip: None,
        }
    }

    /// Use different text metrics.
    pub fn with_metrics(mut self, metrics: TextMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    /// Attach a tooltip.
    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }

    /// The label's text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Split the text into lines no wider than `width`.
    fn lines(&self, width: f32) -> Vec<String> {
        let chars: Vec<char> = self.text.chars().collect();
        if chars.is_empty() {
            return Vec::new();
        }
        let per_line = if width > 0.0 {
            self.metrics.chars_per_line(width)
        } else {
            chars.len()
        };
        chars.chunks(per_line).map(|chunk| chunk.iter().collect()).collect()
    }
}

impl CellPanel for LabelCell {
    fn preferred_size(&self, width_constraint: f32) -> Size {
        let lines = self.lines(width_constraint);
        let widest = lines.iter().map(|line| line.chars().count()).max().unwrap_or(0);
        Size::new(
            widest as f32 * self.metrics.char_width,
            lines.len().max(1) as f32 * self.metrics.line_height,
        )
    }

    fn paint(&self, renderer: &mut dyn Renderer, bounds: Rect) {
        let mut y = bounds.y();
        for line in self.lines(bounds.width()) {
            if y >= bounds.bottom() {
                break;
            }
            renderer.draw_text(&line, Point::new(bounds.x(), y), self.color);
            y += self.metrics.line_height;
        }
    }

    fn interests(&self) -> CellInterest {
        if self.tooltip.is_some() {
            CellInterest::TOOLTIP
        } else {
            CellInterest::NONE
        }
    }

    fn tooltip(&self, _pos: Point) -> Option<String> {
        self.tooltip.clone()
    }
}
