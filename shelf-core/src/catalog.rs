//! The ordered book catalog and its pure transitions
//!
//! Every transition borrows the current catalog and returns a new one, so a
//! failed transition can never leave a half-applied change behind.

use crate::error::{Result, ShelfError};
use crate::types::{new_id, Book, BookDraft};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Ordered sequence of books, insertion order first
///
/// Book ids are unique within a catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Book>", into = "Vec<Book>")]
pub struct Catalog {
    books: Vec<Book>,
}

impl Catalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from existing books, rejecting duplicate ids
    pub fn from_books(books: Vec<Book>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(books.len());
        for book in &books {
            if !seen.insert(book.id.as_str()) {
                return Err(ShelfError::Format(format!(
                    "Duplicate book id: {}",
                    book.id
                )));
            }
        }
        Ok(Self { books })
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn iter(&self) -> impl Iterator<Item = &Book> {
        self.books.iter()
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Look up a book by id
    pub fn get(&self, id: &str) -> Option<&Book> {
        self.books.iter().find(|b| b.id == id)
    }

    pub fn into_books(self) -> Vec<Book> {
        self.books
    }

    /// Creation timestamp for a new book.
    ///
    /// Never earlier than `now_ms` and always after the newest book, so
    /// insertion order and `created_at` order agree.
    pub fn next_created_at(&self, now_ms: i64) -> i64 {
        match self.books.iter().map(|b| b.created_at).max() {
            Some(newest) if newest >= now_ms => newest.saturating_add(1),
            _ => now_ms,
        }
    }

    /// Append a new book built from `draft`.
    ///
    /// Returns the new catalog and the created book.
    pub fn add(&self, draft: BookDraft, now_ms: i64) -> Result<(Self, Book)> {
        let draft = draft.validate()?;

        let mut id = new_id();
        while self.get(&id).is_some() {
            id = new_id();
        }

        let book = Book::from_draft(draft, id, self.next_created_at(now_ms));
        let mut books = self.books.clone();
        books.push(book.clone());

        tracing::debug!("Added book {} '{}'", book.id, book.title);
        Ok((Self { books }, book))
    }

    /// Replace every editable field of the book with `id`.
    ///
    /// The id and creation time are kept.
    pub fn update(&self, id: &str, draft: BookDraft) -> Result<(Self, Book)> {
        let draft = draft.validate()?;
        let position = self.position(id)?;

        let existing = &self.books[position];
        let book = Book::from_draft(draft, existing.id.clone(), existing.created_at);
        let mut books = self.books.clone();
        books[position] = book.clone();

        tracing::debug!("Updated book {} '{}'", book.id, book.title);
        Ok((Self { books }, book))
    }

    /// Remove the book with `id`, returning the new catalog and the removed book
    pub fn remove(&self, id: &str) -> Result<(Self, Book)> {
        let position = self.position(id)?;

        let mut books = self.books.clone();
        let removed = books.remove(position);

        tracing::debug!("Removed book {} '{}'", removed.id, removed.title);
        Ok((Self { books }, removed))
    }

    fn position(&self, id: &str) -> Result<usize> {
        self.books
            .iter()
            .position(|b| b.id == id)
            .ok_or_else(|| ShelfError::NotFound(id.to_string()))
    }
}

impl TryFrom<Vec<Book>> for Catalog {
    type Error = ShelfError;

    fn try_from(books: Vec<Book>) -> Result<Self> {
        Self::from_books(books)
    }
}

impl From<Catalog> for Vec<Book> {
    fn from(catalog: Catalog) -> Self {
        catalog.books
    }
}
