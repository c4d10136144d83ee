//! The Book record and the editable draft it is built from

use crate::error::{Result, ShelfError};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// One catalog entry
///
/// Field names are serialized in camelCase so that exported documents match
/// the layout existing backups use.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Unique identifier, immutable once assigned
    #[serde(default = "new_id")]
    pub id: String,

    /// Book title
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,

    /// Book author
    #[serde(default, deserialize_with = "null_as_default")]
    pub author: String,

    /// Embedded cover image (usually a data URI), empty when absent
    #[serde(default, deserialize_with = "null_as_default")]
    pub cover_image: String,

    /// External link to the book file, empty when absent
    #[serde(default, deserialize_with = "null_as_default")]
    pub drive_link: String,

    /// Free-text labels
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,

    /// Insertion time in milliseconds since the Unix epoch
    #[serde(default, deserialize_with = "null_as_default")]
    pub created_at: i64,
}

impl Book {
    /// Build a book from a validated draft
    pub(crate) fn from_draft(draft: BookDraft, id: String, created_at: i64) -> Self {
        Self {
            id,
            title: draft.title,
            author: draft.author,
            cover_image: draft.cover_image,
            drive_link: draft.drive_link,
            tags: draft.tags,
            created_at,
        }
    }

    /// Whether the book carries the given tag
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn has_cover(&self) -> bool {
        !self.cover_image.is_empty()
    }
}

pub(crate) fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// The user-editable fields of a book, as entered before validation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookDraft {
    pub title: String,
    pub author: String,
    pub cover_image: String,
    pub drive_link: String,
    pub tags: Vec<String>,
}

impl BookDraft {
    /// Create a draft with the required fields
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            ..Self::default()
        }
    }

    /// Prefill a draft from an existing book, for editing
    pub fn from_book(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author.clone(),
            cover_image: book.cover_image.clone(),
            drive_link: book.drive_link.clone(),
            tags: book.tags.clone(),
        }
    }

    /// Set the cover image
    pub fn with_cover_image(mut self, cover_image: impl Into<String>) -> Self {
        self.cover_image = cover_image.into();
        self
    }

    /// Set the external link
    pub fn with_drive_link(mut self, drive_link: impl Into<String>) -> Self {
        self.drive_link = drive_link.into();
        self
    }

    /// Add a tag
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Check required fields and normalize the draft.
    ///
    /// Title, author and link are trimmed. Tags are trimmed, blank tags are
    /// dropped and repeats are removed, keeping the first occurrence.
    pub fn validate(self) -> Result<Self> {
        let title = self.title.trim().to_string();
        let author = self.author.trim().to_string();
        if title.is_empty() || author.is_empty() {
            return Err(ShelfError::Validation(
                "Please fill in both title and author fields".to_string(),
            ));
        }

        let mut tags: Vec<String> = Vec::with_capacity(self.tags.len());
        for tag in self.tags {
            let tag = tag.trim();
            if !tag.is_empty() && !tags.iter().any(|t| t == tag) {
                tags.push(tag.to_string());
            }
        }

        Ok(Self {
            title,
            author,
            cover_image: self.cover_image,
            drive_link: self.drive_link.trim().to_string(),
            tags,
        })
    }
}
