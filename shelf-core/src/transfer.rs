//! JSON export and import of the catalog
//!
//! Two document shapes are understood:
//!
//! - **Wrapped** (current): `{ "books": [...], "uploadedImage": ..., "exportDate": ... }`
//! - **Legacy**: a bare array of books
//!
//! Import accepts either. Export writes the wrapped shape unless asked for
//! the legacy one.

use crate::catalog::Catalog;
use crate::error::{Result, ShelfError};
use crate::types::Book;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Prefix of generated backup file names
pub const EXPORT_FILE_PREFIX: &str = "my-library-backup-";

/// Which document shape to write or which one was read
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportShape {
    /// Object with `books`, `uploadedImage` and `exportDate`
    #[default]
    Wrapped,

    /// Bare array of books
    Legacy,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportDocument<'a> {
    books: &'a [Book],
    uploaded_image: Option<&'a str>,
    export_date: String,
}

/// Serialize the catalog as a pretty-printed JSON document.
///
/// The legacy shape has nowhere to put the image or the date, so both are
/// dropped.
pub fn export_json(
    catalog: &Catalog,
    uploaded_image: Option<&str>,
    shape: ExportShape,
    exported_at: DateTime<Utc>,
) -> Result<String> {
    let json = match shape {
        ExportShape::Wrapped => serde_json::to_string_pretty(&ExportDocument {
            books: catalog.books(),
            uploaded_image,
            export_date: exported_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        })?,
        ExportShape::Legacy => serde_json::to_string_pretty(catalog.books())?,
    };
    tracing::debug!("Exported {} books as {:?}", catalog.len(), shape);
    Ok(json)
}

/// File name for a backup made on the given date
pub fn export_file_name(date: DateTime<Utc>) -> String {
    format!("{}{}.json", EXPORT_FILE_PREFIX, date.format("%Y-%m-%d"))
}

/// A successfully parsed import document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedLibrary {
    /// The books to install, already checked for duplicate ids
    pub catalog: Catalog,

    /// Library image carried by the document, if any
    pub uploaded_image: Option<String>,

    /// Export date recorded in the document, if any
    pub export_date: Option<String>,

    /// Shape the document was written in
    pub shape: ExportShape,
}

impl ImportedLibrary {
    /// Question to ask before replacing the current library
    pub fn confirmation_prompt(&self) -> String {
        format!(
            "This will replace your current library with {} books. Continue?",
            self.catalog.len()
        )
    }
}

/// Parse an import document in either shape.
///
/// Malformed JSON yields [`ShelfError::Parse`]. Well-formed JSON that is
/// neither shape yields [`ShelfError::Format`].
pub fn import_json(text: &str) -> Result<ImportedLibrary> {
    let document: Value = serde_json::from_str(text)?;

    let (books, uploaded_image, export_date, shape) = match document {
        Value::Array(books) => (Value::Array(books), None, None, ExportShape::Legacy),
        Value::Object(mut map) => match map.remove("books") {
            Some(books @ Value::Array(_)) => {
                let uploaded_image = string_field(map.remove("uploadedImage"));
                let export_date = string_field(map.remove("exportDate"));
                (books, uploaded_image, export_date, ExportShape::Wrapped)
            }
            _ => return Err(invalid_format()),
        },
        _ => return Err(invalid_format()),
    };

    let books: Vec<Book> = serde_json::from_value(books)
        .map_err(|e| ShelfError::Format(format!("Invalid book entry: {}", e)))?;
    let catalog = Catalog::from_books(books)?;

    tracing::debug!("Imported {} books from {:?} document", catalog.len(), shape);
    Ok(ImportedLibrary {
        catalog,
        uploaded_image,
        export_date,
        shape,
    })
}

fn string_field(value: Option<Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) => Some(s),
        _ => None,
    }
}

fn invalid_format() -> ShelfError {
    ShelfError::Format("Invalid JSON format".to_string())
}
