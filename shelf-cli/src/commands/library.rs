//! Lock, status and library image commands

use anyhow::{Context, Result};
use serde::Serialize;
use shelf_core::query::all_tags;
use shelf_core::storage::LibraryStore;
use shelf_core::types::image::load_data_uri;
use shelf_core::LockedAction;
use std::path::Path;

/// Library summary output
#[derive(Serialize)]
struct LibraryStatus {
    books: usize,
    tags: usize,
    locked: bool,
    has_image: bool,
}

/// Lock or unlock the library
pub async fn set_lock(store: &LibraryStore, locked: bool) -> Result<()> {
    let mut library = store.load().await.context("Failed to load library")?;

    if locked {
        library.lock();
    } else {
        library.unlock();
    }
    store.save(&library).await.context("Failed to save library")?;

    println!("Library {}", if locked { "locked" } else { "unlocked" });
    Ok(())
}

/// Display a summary of the library
pub async fn status(store: &LibraryStore, json: bool) -> Result<()> {
    let library = store.load().await.context("Failed to load library")?;

    let status = LibraryStatus {
        books: library.catalog().len(),
        tags: all_tags(library.catalog()).len(),
        locked: library.is_locked(),
        has_image: library.uploaded_image().is_some(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("Books:  {}", status.books);
        println!("Tags:   {}", status.tags);
        println!("Locked: {}", if status.locked { "yes" } else { "no" });
        println!("Image:  {}", if status.has_image { "yes" } else { "no" });
    }

    Ok(())
}

/// Set the library image from a file, or clear it
pub async fn set_image(store: &LibraryStore, file: Option<&Path>) -> Result<()> {
    let mut library = store.load().await.context("Failed to load library")?;
    library.ensure_unlocked(LockedAction::ChangeImage)?;

    let image = match file {
        Some(path) => Some(
            load_data_uri(path)
                .await
                .with_context(|| format!("Failed to read image: {}", path.display()))?,
        ),
        None => None,
    };
    let cleared = image.is_none();

    library.set_uploaded_image(image)?;
    store.save(&library).await.context("Failed to save library")?;

    tracing::info!("Library image {}", if cleared { "cleared" } else { "updated" });
    Ok(())
}
