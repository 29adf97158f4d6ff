//! Error types for table drop negotiation.

use crate::widget::widgets::TableId;

/// Result type alias for table operations.
pub type Result<T> = std::result::Result<T, TableError>;

/// Reasons a drop into a table can be refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    /// The drag carries nothing under the drop's key.
    #[error("drag data has no payload under key '{0}'")]
    MissingPayload(String),

    /// The payload under the key holds rows of another type.
    #[error("payload under key '{0}' does not hold rows of this table's type")]
    RowTypeMismatch(String),

    /// Filtered tables display a flat list and accept no drops.
    #[error("cannot drop into {0} while it is filtered")]
    FilteredTarget(TableId),

    /// A dragged row would become its own descendant.
    #[error("cannot drop a row into its own subtree")]
    DropIntoOwnSubtree,

    /// The payload came from a table that was not supplied as the source.
    #[error("drag originated from {0}, which was not supplied as the drop source")]
    UnknownSource(TableId),
}

impl TableError {
    /// Create a missing payload error.
    pub fn missing_payload(key: impl Into<String>) -> Self {
        Self::MissingPayload(key.into())
    }

    /// Create a row type mismatch error.
    pub fn row_type_mismatch(key: impl Into<String>) -> Self {
        Self::RowTypeMismatch(key.into())
    }
}
