//! Core record types for the Shelf catalog

mod book;
pub mod image;

pub use book::{Book, BookDraft};
pub(crate) use book::new_id;
