//! Application state: the catalog, the library image and the lock
//!
//! Mutations are refused while the library is locked. Each mutation swaps in
//! a whole new catalog only after the transition succeeded.

use crate::catalog::Catalog;
use crate::error::{LockedAction, Result, ShelfError};
use crate::query::{self, ViewQuery};
use crate::transfer::ImportedLibrary;
use crate::types::{Book, BookDraft};
use chrono::Utc;

/// Everything the catalog manager keeps between sessions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Library {
    catalog: Catalog,
    uploaded_image: Option<String>,
    locked: bool,
}

impl Library {
    /// Create an empty, unlocked library
    pub fn new() -> Self {
        Self::default()
    }

    /// Assemble a library from persisted parts
    pub fn from_parts(catalog: Catalog, uploaded_image: Option<String>, locked: bool) -> Self {
        Self {
            catalog,
            uploaded_image,
            locked,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn uploaded_image(&self) -> Option<&str> {
        self.uploaded_image.as_deref()
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Lock the library. Always allowed.
    pub fn lock(&mut self) {
        self.locked = true;
    }

    /// Unlock the library. Always allowed.
    pub fn unlock(&mut self) {
        self.locked = false;
    }

    /// The filtered and sorted view of the catalog
    pub fn view(&self, query: &ViewQuery) -> Vec<&Book> {
        query::apply(&self.catalog, query)
    }

    /// Add a book stamped with the current time
    pub fn add_book(&mut self, draft: BookDraft) -> Result<Book> {
        self.add_book_at(draft, Utc::now().timestamp_millis())
    }

    /// Add a book stamped no earlier than `now_ms`
    pub fn add_book_at(&mut self, draft: BookDraft, now_ms: i64) -> Result<Book> {
        self.ensure_unlocked(LockedAction::AddBooks)?;
        let (catalog, book) = self.catalog.add(draft, now_ms)?;
        self.catalog = catalog;
        Ok(book)
    }

    /// Prefill an edit form for the book with `id`
    pub fn edit_draft(&self, id: &str) -> Result<BookDraft> {
        self.ensure_unlocked(LockedAction::EditBooks)?;
        self.catalog
            .get(id)
            .map(BookDraft::from_book)
            .ok_or_else(|| ShelfError::NotFound(id.to_string()))
    }

    /// Replace the editable fields of the book with `id`
    pub fn update_book(&mut self, id: &str, draft: BookDraft) -> Result<Book> {
        self.ensure_unlocked(LockedAction::EditBooks)?;
        let (catalog, book) = self.catalog.update(id, draft)?;
        self.catalog = catalog;
        Ok(book)
    }

    /// Delete the book with `id`
    pub fn delete_book(&mut self, id: &str) -> Result<Book> {
        self.ensure_unlocked(LockedAction::DeleteBooks)?;
        let (catalog, removed) = self.catalog.remove(id)?;
        self.catalog = catalog;
        Ok(removed)
    }

    /// Replace the whole catalog with an imported one.
    ///
    /// The library image is replaced only when the import carries one.
    /// Callers are expected to have confirmed the replacement with the user.
    pub fn replace(&mut self, imported: ImportedLibrary) -> Result<()> {
        self.ensure_unlocked(LockedAction::ImportBooks)?;
        tracing::debug!(
            "Replacing {} books with {} imported books",
            self.catalog.len(),
            imported.catalog.len()
        );
        self.catalog = imported.catalog;
        if let Some(image) = imported.uploaded_image {
            self.uploaded_image = Some(image);
        }
        Ok(())
    }

    /// Set or clear the library image
    pub fn set_uploaded_image(&mut self, image: Option<String>) -> Result<()> {
        self.ensure_unlocked(LockedAction::ChangeImage)?;
        self.uploaded_image = image;
        Ok(())
    }

    /// Fail with [`ShelfError::Locked`] if the library is locked.
    ///
    /// Front ends call this before gathering input for `action`, so a locked
    /// library is reported before any prompt or file read.
    pub fn ensure_unlocked(&self, action: LockedAction) -> Result<()> {
        if self.locked {
            tracing::debug!("Refused to {} while locked", action);
            Err(ShelfError::Locked(action))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transfer::import_json;

    fn library_with_dune() -> (Library, Book) {
        let mut library = Library::new();
        let book = library
            .add_book_at(BookDraft::new("Dune", "Herbert").with_tag("sci-fi"), 1_000)
            .unwrap();
        (library, book)
    }

    #[test]
    fn test_add_book_appends() {
        let (mut library, dune) = library_with_dune();
        let emma = library.add_book(BookDraft::new("Emma", "Austen")).unwrap();

        let books = library.catalog().books();
        assert_eq!(books.len(), 2);
        assert_eq!(books[0].id, dune.id);
        assert_eq!(books[1].id, emma.id);
        assert_ne!(dune.id, emma.id);
        assert!(emma.created_at > dune.created_at);
    }

    #[test]
    fn test_locked_library_refuses_mutations() {
        let (mut library, dune) = library_with_dune();
        library.lock();
        let before = library.clone();

        let err = library.add_book(BookDraft::new("Emma", "Austen")).unwrap_err();
        assert!(matches!(err, ShelfError::Locked(LockedAction::AddBooks)));

        let err = library
            .update_book(&dune.id, BookDraft::new("Dune Messiah", "Herbert"))
            .unwrap_err();
        assert!(matches!(err, ShelfError::Locked(LockedAction::EditBooks)));

        let err = library.edit_draft(&dune.id).unwrap_err();
        assert!(matches!(err, ShelfError::Locked(LockedAction::EditBooks)));

        let err = library.delete_book(&dune.id).unwrap_err();
        assert!(matches!(err, ShelfError::Locked(LockedAction::DeleteBooks)));

        let imported = import_json("[]").unwrap();
        let err = library.replace(imported).unwrap_err();
        assert!(matches!(err, ShelfError::Locked(LockedAction::ImportBooks)));

        let err = library
            .set_uploaded_image(Some("data:image/png;base64,AA==".to_string()))
            .unwrap_err();
        assert!(matches!(err, ShelfError::Locked(LockedAction::ChangeImage)));

        assert_eq!(library, before);
    }

    #[test]
    fn test_lock_and_unlock() {
        let mut library = Library::new();
        assert!(!library.is_locked());
        assert!(library.ensure_unlocked(LockedAction::ImportBooks).is_ok());

        library.lock();
        assert!(library.is_locked());
        assert!(matches!(
            library.ensure_unlocked(LockedAction::ImportBooks).unwrap_err(),
            ShelfError::Locked(LockedAction::ImportBooks)
        ));

        library.unlock();
        assert!(!library.is_locked());
    }

    #[test]
    fn test_edit_round_trip() {
        let (mut library, dune) = library_with_dune();
        let draft = library.edit_draft(&dune.id).unwrap().with_tag("classic");
        let updated = library.update_book(&dune.id, draft).unwrap();

        assert_eq!(updated.id, dune.id);
        assert_eq!(updated.created_at, dune.created_at);
        assert_eq!(updated.tags, vec!["sci-fi", "classic"]);
    }

    #[test]
    fn test_delete_book() {
        let (mut library, dune) = library_with_dune();
        library.delete_book(&dune.id).unwrap();
        assert!(library.catalog().is_empty());
        assert!(matches!(
            library.delete_book(&dune.id).unwrap_err(),
            ShelfError::NotFound(_)
        ));
    }

    #[test]
    fn test_replace_keeps_image_when_import_has_none() {
        let (mut library, _) = library_with_dune();
        library
            .set_uploaded_image(Some("data:image/png;base64,AA==".to_string()))
            .unwrap();

        let imported = import_json(r#"[{"id": "x", "title": "Emma", "author": "Austen"}]"#).unwrap();
        library.replace(imported).unwrap();

        assert_eq!(library.catalog().len(), 1);
        assert_eq!(library.catalog().books()[0].id, "x");
        assert_eq!(library.uploaded_image(), Some("data:image/png;base64,AA=="));

        let imported =
            import_json(r#"{"books": [], "uploadedImage": "data:image/gif;base64,R0lG"}"#).unwrap();
        library.replace(imported).unwrap();
        assert!(library.catalog().is_empty());
        assert_eq!(library.uploaded_image(), Some("data:image/gif;base64,R0lG"));
    }

    #[test]
    fn test_view_uses_query() {
        let (mut library, _) = library_with_dune();
        library.add_book(BookDraft::new("Emma", "Austen")).unwrap();

        let titles: Vec<_> = library
            .view(&ViewQuery::new().with_tag("sci-fi"))
            .iter()
            .map(|b| b.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Dune"]);
    }
}
