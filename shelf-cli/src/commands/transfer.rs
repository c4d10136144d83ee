//! Export and import command implementations

use anyhow::{bail, Context, Result};
use chrono::Utc;
use shelf_core::storage::LibraryStore;
use shelf_core::{export_file_name, export_json, import_json, ExportShape, LockedAction};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

/// Export the library to a JSON backup.
///
/// An explicit `output` is overwritten. The dated default name never replaces
/// an existing backup.
pub async fn export(store: &LibraryStore, output: Option<PathBuf>, shape: ExportShape) -> Result<()> {
    let library = store.load().await.context("Failed to load library")?;

    let now = Utc::now();
    let json = export_json(library.catalog(), library.uploaded_image(), shape, now)?;

    let output = match output {
        Some(output) => {
            tokio::fs::write(&output, json)
                .await
                .with_context(|| format!("Failed to write backup: {}", output.display()))?;
            output
        }
        None => {
            let output = PathBuf::from(export_file_name(now));
            write_new(&output, json.as_bytes()).await?;
            output
        }
    };

    tracing::info!(
        "Exported {} books to {}",
        library.catalog().len(),
        output.display()
    );
    println!("{}", output.display());
    Ok(())
}

async fn write_new(path: &Path, data: &[u8]) -> Result<()> {
    let mut file = match tokio::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await
    {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => bail!(
            "Backup {} already exists; pass --output to choose another file",
            path.display()
        ),
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to create backup: {}", path.display()))
        }
    };

    file.write_all(data)
        .await
        .with_context(|| format!("Failed to write backup: {}", path.display()))?;
    file.flush().await?;
    Ok(())
}

/// Replace the library with the contents of a JSON backup
pub async fn import(store: &LibraryStore, input: &Path, yes: bool) -> Result<()> {
    let mut library = store.load().await.context("Failed to load library")?;
    library.ensure_unlocked(LockedAction::ImportBooks)?;

    let text = tokio::fs::read_to_string(input)
        .await
        .with_context(|| format!("Failed to read backup: {}", input.display()))?;
    let imported = import_json(&text).context("Error importing books. Please check the file format")?;

    if !yes && !confirm(&imported.confirmation_prompt())? {
        println!("Import cancelled");
        return Ok(());
    }

    let count = imported.catalog.len();
    let summary = match &imported.export_date {
        Some(date) => format!("Imported {} books from backup dated {}", count, date),
        None => format!("Imported {} books", count),
    };
    library.replace(imported)?;
    store.save(&library).await.context("Failed to save library")?;

    tracing::info!("Imported {} books from {}", count, input.display());
    println!("{}", summary);
    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    if !std::io::stdin().is_terminal() {
        bail!("Refusing to replace the library without confirmation; pass --yes to proceed");
    }

    let answer = dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()?;
    Ok(answer)
}
