use thiserror::Error;

/// Recoverable failures from task store operations
///
/// The store is left untouched whenever one of these is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Task #{0} not found")]
    NotFound(usize),

    #[error("No actions to undo")]
    NothingToUndo,
}

/// Result type alias
pub type Result<T> = std::result::Result<T, StoreError>;
