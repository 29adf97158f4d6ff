//! Column descriptors and content-driven column sizing.

use trellis_core::{PerfSpan, logging::span_names};

use super::Table;
use crate::model::TableRow;

/// Width bookkeeping for one table column.
///
/// `minimum` and `maximum` bound user resizing; `auto_minimum` and
/// `auto_maximum` bound the content width measured when fitting. A bound of
/// zero or less means "no bound".
///
/// ```
/// use trellis::widget::widgets::ColumnInfo;
///
/// let column = ColumnInfo::new(3).with_current(120.0).with_minimum(40.0).with_maximum(400.0);
/// assert_eq!(column.id, 3);
/// assert!(column.is_user_resizable());
/// assert!(!ColumnInfo::new(1).with_minimum(40.0).is_user_resizable());
/// assert!(!ColumnInfo::new(0).with_minimum(50.0).with_maximum(50.0).is_user_resizable());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnInfo {
    /// Stable identity, unaffected by column reordering.
    pub id: u32,
    pub current: f32,
    pub minimum: f32,
    pub maximum: f32,
    pub auto_minimum: f32,
    pub auto_maximum: f32,
}

impl ColumnInfo {
    /// A zero-width column with no bounds.
    pub fn new(id: u32) -> Self {
        Self {
            id,
            current: 0.0,
            minimum: 0.0,
            maximum: 0.0,
            auto_minimum: 0.0,
            auto_maximum: 0.0,
        }
    }

    pub fn with_current(mut self, width: f32) -> Self {
        self.current = width.max(0.0);
        self
    }

    pub fn with_minimum(mut self, width: f32) -> Self {
        self.minimum = width;
        self
    }

    pub fn with_maximum(mut self, width: f32) -> Self {
        self.maximum = width;
        self
    }

    pub fn with_auto_minimum(mut self, width: f32) -> Self {
        self.auto_minimum = width;
        self
    }

    pub fn with_auto_maximum(mut self, width: f32) -> Self {
        self.auto_maximum = width;
        self
    }

    /// Whether the user may drag this column's divider.
    pub fn is_user_resizable(&self) -> bool {
        self.minimum <= 0.0 || self.minimum < self.maximum
    }

    /// Clamp a measured content width to the auto-fit bounds.
    fn clamp_auto(&self, width: f32) -> f32 {
        if self.auto_minimum > 0.0 && width < self.auto_minimum {
            self.auto_minimum
        } else if self.auto_maximum > 0.0 && width > self.auto_maximum {
            self.auto_maximum
        } else {
            width
        }
    }
}

impl<T: TableRow> Table<T> {
    /// The table's columns, in display order.
    pub fn columns(&self) -> &[ColumnInfo] {
        &self.columns
    }

    /// Replace the columns. Row heights are recomputed.
    pub fn set_columns(&mut self, columns: Vec<ColumnInfo>) {
        self.columns = columns;
        self.recompute_row_heights();
        self.mark_dirty();
    }

    /// Set the current width of the column at `index`.
    ///
    /// Row heights are left alone; call [`sync_to_model`](Self::sync_to_model)
    /// or an `eventually_*` variant to bring them up to date.
    pub fn set_column_width(&mut self, index: usize, width: f32) {
        if let Some(column) = self.columns.get_mut(index) {
            column.current = width.max(0.0);
            self.dirty = true;
        }
    }

    /// Index of the column with `id`.
    pub fn column_index_for_id(&self, id: u32) -> Option<usize> {
        self.columns.iter().position(|column| column.id == id)
    }

    pub(super) fn is_hierarchy_column(&self, index: usize) -> bool {
        self.theme.hierarchy_column_id.is_some()
            && self.columns.get(index).map(|c| c.id) == self.theme.hierarchy_column_id
    }

    /// Widest padded content of column `index` across the row cache.
    ///
    /// Starts from the column's minimum so the result never undercuts it.
    fn fitted_width(&self, index: usize) -> f32 {
        let Some(column) = self.columns.get(index) else {
            return 0.0;
        };
        let pad = self.theme.padding;
        let hierarchy = self.is_hierarchy_column(index);
        let mut width = column.minimum.max(0.0);
        for row_index in 0..self.cache.len() {
            let content = self.cell_preferred_size(&self.cache, row_index, index, 0.0).width;
            let mut preferred = column.clamp_auto(content) + pad.left + pad.right;
            if hierarchy {
                preferred += self.theme.hierarchy_inset(self.cache[row_index].depth);
            }
            width = width.max(preferred);
        }
        width
    }

    /// Size every column to its content.
    ///
    /// With `adjust`, the frame is resized to the new preferred size too.
    #[tracing::instrument(skip(self), target = "trellis::table", level = "trace")]
    pub fn size_columns_to_fit(&mut self, adjust: bool) {
        let _span = PerfSpan::new(span_names::COLUMN_FIT);
        for column in &mut self.columns {
            column.current = 0.0;
        }
        let widths: Vec<f32> = (0..self.columns.len()).map(|i| self.fitted_width(i)).collect();
        for (column, width) in self.columns.iter_mut().zip(widths) {
            column.current = width;
        }
        self.finish_fit(adjust);
    }

    /// Size every column to its content except the one with `column_id`, which
    /// takes whatever width of the content area remains (floored at its
    /// minimum). Falls back to the first column when no column has that ID.
    #[tracing::instrument(skip(self), target = "trellis::table", level = "trace")]
    pub fn size_columns_to_fit_with_excess_in(&mut self, column_id: u32) {
        if self.columns.is_empty() {
            return;
        }
        let _span = PerfSpan::new(span_names::COLUMN_FIT);
        let excess = self.column_index_for_id(column_id).unwrap_or(0);
        for column in &mut self.columns {
            column.current = 0.0;
        }
        let widths: Vec<f32> = (0..self.columns.len())
            .map(|i| if i == excess { 0.0 } else { self.fitted_width(i) })
            .collect();

        let mut remaining = self.content_rect().width();
        if self.theme.show_column_dividers {
            remaining -= (self.columns.len() - 1) as f32;
        }
        for (index, (column, width)) in self.columns.iter_mut().zip(widths).enumerate() {
            if index != excess {
                column.current = width;
                remaining -= width;
            }
        }
        let column = &mut self.columns[excess];
        column.current = remaining.max(column.minimum).max(0.0);
        self.finish_fit(false);
    }

    /// Size the column at `index` to its content.
    pub fn size_column_to_fit(&mut self, index: usize, adjust: bool) {
        if index >= self.columns.len() {
            return;
        }
        let _span = PerfSpan::new(span_names::COLUMN_FIT);
        self.columns[index].current = 0.0;
        let width = self.fitted_width(index);
        self.columns[index].current = width;
        self.finish_fit(adjust);
    }

    fn finish_fit(&mut self, adjust: bool) {
        self.recompute_row_heights();
        if adjust {
            self.frame.size = self.preferred_size();
        }
        self.mark_dirty();
        tracing::debug!(
            target: "trellis::table",
            table = %self.id,
            widths = ?self.columns.iter().map(|c| c.current).collect::<Vec<_>>(),
            "columns fitted"
        );
    }
}
