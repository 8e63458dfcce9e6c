use thiserror::Error;

use crate::model::{Status, TaskId};

/// Failures the board recovers from locally. None of them end the process:
/// validation failures block a single action, the others are logged and
/// skipped.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("{0}")]
    Validation(String),
    #[error("task {0} not found")]
    NotFound(TaskId),
    #[error("column '{0}' is missing from the view")]
    RenderTargetMissing(Status),
}

/// Returns the `BoardError` carried by `err`, if any.
pub fn board_error(err: &anyhow::Error) -> Option<&BoardError> {
    err.downcast_ref::<BoardError>()
}
