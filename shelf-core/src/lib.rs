//! Shelf Core Library
//!
//! This crate provides the catalog model for the Shelf personal book collection
//! manager: the book records, the pure catalog transitions, the search/tag/sort
//! view pipeline, JSON backup import and export, and key-value persistence.
//! Storage is kept apart from the transitions so the core can be exercised
//! without any backend.

pub mod catalog;
pub mod error;
pub mod query;
pub mod state;
pub mod storage;
pub mod transfer;
pub mod types;

pub use catalog::Catalog;
pub use error::{LockedAction, Result, ShelfError, StorageError};
pub use query::{SortOrder, TagMatch, ViewQuery};
pub use state::Library;
pub use transfer::{export_file_name, export_json, import_json, ExportShape, ImportedLibrary};
pub use types::{Book, BookDraft};
