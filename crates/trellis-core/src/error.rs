//! Error types for Trellis core.

use std::fmt;

/// The main error type for Trellis core operations.
#[derive(Debug)]
pub enum TrellisError {
    /// Scheduler-related error.
    Scheduler(SchedulerError),
    /// A caller-supplied callback panicked and was contained.
    CallbackPanicked {
        /// What was being invoked when the panic happened.
        context: &'static str,
        /// The panic payload, if it was a string.
        message: String,
    },
}

impl fmt::Display for TrellisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scheduler(err) => write!(f, "Scheduler error: {err}"),
            Self::CallbackPanicked { context, message } => {
                write!(f, "Callback panicked in {context}: {message}")
            }
        }
    }
}

impl std::error::Error for TrellisError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Scheduler(err) => Some(err),
            _ => None,
        }
    }
}

/// Scheduler-specific errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    /// The task ID is invalid or the task already ran.
    InvalidTaskId,
}

impl fmt::Display for SchedulerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTaskId => write!(f, "Invalid or expired scheduled task ID"),
        }
    }
}

impl std::error::Error for SchedulerError {}

impl From<SchedulerError> for TrellisError {
    fn from(err: SchedulerError) -> Self {
        Self::Scheduler(err)
    }
}

/// A specialized Result type for Trellis core operations.
pub type Result<T> = std::result::Result<T, TrellisError>;
