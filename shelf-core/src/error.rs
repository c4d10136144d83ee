//! Error types for Shelf Core

use thiserror::Error;

/// Result type alias using ShelfError
pub type Result<T> = std::result::Result<T, ShelfError>;

/// Top-level error type for all Shelf operations
#[derive(Debug, Error)]
pub enum ShelfError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Library is locked. Please unlock to {0}.")]
    Locked(LockedAction),

    #[error("Format error: {0}")]
    Format(String),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Book not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// The mutation that a locked library refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockedAction {
    AddBooks,
    EditBooks,
    DeleteBooks,
    ImportBooks,
    ChangeImage,
}

impl std::fmt::Display for LockedAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            LockedAction::AddBooks => "add books",
            LockedAction::EditBooks => "edit books",
            LockedAction::DeleteBooks => "delete books",
            LockedAction::ImportBooks => "import books",
            LockedAction::ChangeImage => "change the library image",
        };
        f.write_str(text)
    }
}

/// Errors that occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Backend error: {0}")]
    BackendError(String),
}
