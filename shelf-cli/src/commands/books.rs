//! Add, edit and delete commands

use anyhow::{Context, Result};
use shelf_core::storage::LibraryStore;
use shelf_core::types::image::load_data_uri;
use shelf_core::{BookDraft, LockedAction};
use std::path::PathBuf;

/// Book fields given on the command line. Unset fields leave the draft alone.
#[derive(Debug, Default)]
pub struct BookFields {
    pub title: Option<String>,
    pub author: Option<String>,
    pub cover: Option<PathBuf>,
    pub clear_cover: bool,
    pub link: Option<String>,
    pub tags: Vec<String>,
    pub clear_tags: bool,
}

impl BookFields {
    async fn apply(self, mut draft: BookDraft) -> Result<BookDraft> {
        if let Some(title) = self.title {
            draft.title = title;
        }
        if let Some(author) = self.author {
            draft.author = author;
        }
        if self.clear_cover {
            draft.cover_image.clear();
        }
        if let Some(cover) = self.cover {
            draft.cover_image = load_data_uri(&cover)
                .await
                .with_context(|| format!("Failed to read cover image: {}", cover.display()))?;
        }
        if let Some(link) = self.link {
            draft.drive_link = link;
        }
        if self.clear_tags || !self.tags.is_empty() {
            draft.tags = self.tags;
        }
        Ok(draft)
    }
}

/// Add a book to the library
pub async fn add(store: &LibraryStore, fields: BookFields) -> Result<()> {
    let mut library = store.load().await.context("Failed to load library")?;
    library.ensure_unlocked(LockedAction::AddBooks)?;

    let draft = fields.apply(BookDraft::default()).await?;
    let book = library.add_book(draft)?;
    store.save(&library).await.context("Failed to save library")?;

    tracing::info!("Added '{}' by {}", book.title, book.author);
    println!("{}", book.id);
    Ok(())
}

/// Edit an existing book
pub async fn edit(store: &LibraryStore, id: &str, fields: BookFields) -> Result<()> {
    let mut library = store.load().await.context("Failed to load library")?;

    let draft = fields.apply(library.edit_draft(id)?).await?;
    let book = library.update_book(id, draft)?;
    store.save(&library).await.context("Failed to save library")?;

    tracing::info!("Updated '{}' ({})", book.title, book.id);
    Ok(())
}

/// Delete a book
pub async fn delete(store: &LibraryStore, id: &str) -> Result<()> {
    let mut library = store.load().await.context("Failed to load library")?;

    let book = library.delete_book(id)?;
    store.save(&library).await.context("Failed to save library")?;

    tracing::info!("Deleted '{}' ({})", book.title, book.id);
    Ok(())
}
