//! List and tags command implementations

use anyhow::{Context, Result};
use shelf_core::query::all_tags;
use shelf_core::storage::LibraryStore;
use shelf_core::{SortOrder, TagMatch, ViewQuery};

/// View options for the list command
pub struct ListQuery {
    pub search: Option<String>,
    pub tags: Vec<String>,
    pub tag_match: TagMatch,
    pub sort: SortOrder,
}

impl From<ListQuery> for ViewQuery {
    fn from(query: ListQuery) -> Self {
        ViewQuery {
            search: query.search.unwrap_or_default(),
            tags: query.tags,
            tag_match: query.tag_match,
            sort: query.sort,
        }
    }
}

/// List books in the library
pub async fn list(store: &LibraryStore, query: ListQuery, json: bool) -> Result<()> {
    let library = store.load().await.context("Failed to load library")?;
    let query = ViewQuery::from(query);
    let books = library.view(&query);

    if json {
        println!("{}", serde_json::to_string_pretty(&books)?);
        return Ok(());
    }

    if library.catalog().is_empty() {
        println!("Your library is empty. Add a book with `shelf add`.");
        return Ok(());
    }

    if books.is_empty() {
        println!("No books match your current search criteria.");
        return Ok(());
    }

    for book in &books {
        print!("{}  {} by {}", book.id, book.title, book.author);
        if !book.tags.is_empty() {
            print!("  [{}]", book.tags.join(", "));
        }
        println!();
    }

    if query.is_filtered() {
        println!("\n{} of {} books", books.len(), library.catalog().len());
    } else {
        println!("\n{} books", books.len());
    }

    Ok(())
}

/// List every tag in the library
pub async fn tags(store: &LibraryStore) -> Result<()> {
    let library = store.load().await.context("Failed to load library")?;

    for tag in all_tags(library.catalog()) {
        println!("{}", tag);
    }

    Ok(())
}
