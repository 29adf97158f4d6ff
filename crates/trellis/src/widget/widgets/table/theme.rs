//! Visual configuration for [`Table`](super::Table).

use trellis_render::{Color, Insets};

/// Inks, spacing and divider options used by a table.
///
/// Every background ink is paired with the foreground ink used for content
/// drawn on top of it.
///
/// ```
/// use trellis::widget::widgets::TableTheme;
/// use trellis::render::Insets;
///
/// let theme = TableTheme::default()
///     .with_padding(Insets::ZERO)
///     .with_hierarchy_column(None)
///     .with_row_dividers(false);
/// assert_eq!(theme.indent_width, 16.0);
/// assert!(theme.hierarchy_column_id.is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TableTheme {
    pub background: Color,
    pub on_background: Color,
    /// Fill for odd rows.
    pub banding: Color,
    pub on_banding: Color,
    /// Ink for the 1px row and column dividers.
    pub interior_divider: Color,
    /// Selected rows while the table has focus.
    pub selection: Color,
    pub on_selection: Color,
    /// Selected rows while the table is unfocused.
    pub inactive_selection: Color,
    pub on_inactive_selection: Color,
    /// Rows with a selected ancestor.
    pub indirect_selection: Color,
    pub on_indirect_selection: Color,
    /// Space between a cell's edge and its content.
    pub padding: Insets,
    /// Horizontal indentation per hierarchy level.
    pub indent_width: f32,
    pub minimum_row_height: f32,
    /// Pointer distance from a column divider that still counts as on it.
    pub column_resize_slop: f32,
    pub show_row_dividers: bool,
    pub show_column_dividers: bool,
    /// ID of the column that draws disclosure triangles and indentation.
    pub hierarchy_column_id: Option<u32>,
}

impl Default for TableTheme {
    fn default() -> Self {
        Self {
            background: Color::WHITE,
            on_background: Color::BLACK,
            banding: Color::from_rgb8(0xF3, 0xF5, 0xF8),
            on_banding: Color::BLACK,
            interior_divider: Color::from_rgb8(0xD9, 0xDC, 0xE1),
            selection: Color::from_rgb8(0x25, 0x63, 0xEB),
            on_selection: Color::WHITE,
            inactive_selection: Color::from_rgb8(0xC7, 0xD2, 0xE4),
            on_inactive_selection: Color::BLACK,
            indirect_selection: Color::from_rgb8(0xE2, 0xE9, 0xF6),
            on_indirect_selection: Color::BLACK,
            padding: Insets::uniform(4.0),
            indent_width: 16.0,
            minimum_row_height: 16.0,
            column_resize_slop: 4.0,
            show_row_dividers: true,
            show_column_dividers: true,
            hierarchy_column_id: Some(0),
        }
    }
}

impl TableTheme {
    /// Set the cell padding.
    pub fn with_padding(mut self, padding: Insets) -> Self {
        self.padding = padding;
        self
    }

    /// Set the indentation per hierarchy level.
    pub fn with_indent_width(mut self, indent: f32) -> Self {
        self.indent_width = indent;
        self
    }

    /// Set the minimum row height.
    pub fn with_minimum_row_height(mut self, height: f32) -> Self {
        self.minimum_row_height = height;
        self
    }

    /// Set the column divider hit tolerance.
    pub fn with_column_resize_slop(mut self, slop: f32) -> Self {
        self.column_resize_slop = slop;
        self
    }

    /// Show or hide the dividers between rows.
    pub fn with_row_dividers(mut self, show: bool) -> Self {
        self.show_row_dividers = show;
        self
    }

    /// Show or hide the dividers between columns.
    pub fn with_column_dividers(mut self, show: bool) -> Self {
        self.show_column_dividers = show;
        self
    }

    /// Choose the hierarchy column, or `None` for a flat table.
    pub fn with_hierarchy_column(mut self, id: Option<u32>) -> Self {
        self.hierarchy_column_id = id;
        self
    }

    /// Set the background ink pair.
    pub fn with_background(mut self, background: Color, on_background: Color) -> Self {
        self.background = background;
        self.on_background = on_background;
        self
    }

    /// Set the banding ink pair.
    pub fn with_banding(mut self, banding: Color, on_banding: Color) -> Self {
        self.banding = banding;
        self.on_banding = on_banding;
        self
    }

    /// Set the focused selection ink pair.
    pub fn with_selection(mut self, selection: Color, on_selection: Color) -> Self {
        self.selection = selection;
        self.on_selection = on_selection;
        self
    }

    /// Set the unfocused selection ink pair.
    pub fn with_inactive_selection(mut self, selection: Color, on_selection: Color) -> Self {
        self.inactive_selection = selection;
        self.on_inactive_selection = on_selection;
        self
    }

    /// Set the indirect selection ink pair.
    pub fn with_indirect_selection(mut self, selection: Color, on_selection: Color) -> Self {
        self.indirect_selection = selection;
        self.on_indirect_selection = on_selection;
        self
    }

    /// Set the divider ink.
    pub fn with_interior_divider(mut self, color: Color) -> Self {
        self.interior_divider = color;
        self
    }

    /// Space in front of the content of a hierarchy cell at `depth`.
    pub(crate) fn hierarchy_inset(&self, depth: usize) -> f32 {
        self.padding.left + self.indent_width * (depth + 1) as f32
    }

    pub(crate) fn divider_width(&self, show: bool) -> f32 {
        if show { 1.0 } else { 0.0 }
    }
}
