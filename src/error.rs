//! Error types used by the sortvisor engine and its run controller.
//!
//! This module defines two main error enums:
//!
//! - [`SortError`]: errors raised by the array model or inside a running sort.
//! - [`ControlError`]: errors raised by the run controller API.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for logging/metrics.
//! [`SortError::Aborted`] is the expected cancellation signal of a run and never
//! leaves the controller.

use thiserror::Error;

use crate::core::RunState;

/// # Errors produced by the array model and the algorithms.
///
/// `InvalidSize` is rejected before any mutation, `IndexOutOfRange` is a defect
/// in an algorithm, and `Aborted` unwinds a run after a stop request.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SortError {
    /// Array length is zero or exceeds the configured maximum.
    #[error("invalid array size {len} (expected 1..={max})")]
    InvalidSize {
        /// Supplied length.
        len: usize,
        /// Configured maximum length.
        max: usize,
    },

    /// An index outside of the array was accessed.
    #[error("index {index} out of range for array of length {len}")]
    IndexOutOfRange {
        /// Offending index.
        index: usize,
        /// Array length at the time of access.
        len: usize,
    },

    /// The run was stopped at a suspension point.
    #[error("sort aborted")]
    Aborted,
}

impl SortError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use sortvisor::SortError;
    ///
    /// let err = SortError::InvalidSize { len: 0, max: 200 };
    /// assert_eq!(err.as_label(), "sort_invalid_size");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            SortError::InvalidSize { .. } => "sort_invalid_size",
            SortError::IndexOutOfRange { .. } => "sort_index_out_of_range",
            SortError::Aborted => "sort_aborted",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            SortError::InvalidSize { len, max } => format!("size {len} not in 1..={max}"),
            SortError::IndexOutOfRange { index, len } => format!("index {index} >= len {len}"),
            SortError::Aborted => "stopped at suspension point".to_string(),
        }
    }

    /// True for the cancellation signal produced by a stop request.
    pub fn is_abort(&self) -> bool {
        matches!(self, SortError::Aborted)
    }
}

/// # Errors produced by the run controller.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ControlError {
    /// Requested action is not allowed from the current state.
    #[error("cannot {action} while {from}")]
    InvalidTransition {
        /// State the controller was in.
        from: RunState,
        /// Rejected action name.
        action: &'static str,
    },

    /// Input was rejected before touching the current array.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] SortError),

    /// A run ended with an error other than a stop request.
    #[error("run failed: {0}")]
    RunFailed(SortError),
}

impl ControlError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use sortvisor::{ControlError, RunState};
    ///
    /// let err = ControlError::InvalidTransition { from: RunState::Idle, action: "pause" };
    /// assert_eq!(err.as_label(), "control_invalid_transition");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ControlError::InvalidTransition { .. } => "control_invalid_transition",
            ControlError::InvalidInput(_) => "control_invalid_input",
            ControlError::RunFailed(_) => "control_run_failed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ControlError::InvalidTransition { from, action } => {
                format!("{action} rejected in state {from}")
            }
            ControlError::InvalidInput(e) => format!("input: {}", e.as_message()),
            ControlError::RunFailed(e) => format!("run: {}", e.as_message()),
        }
    }
}
