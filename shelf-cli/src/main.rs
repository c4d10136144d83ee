//! Shelf CLI - Command-line interface for a personal book catalog

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use shelf_core::storage::LibraryStore;
use shelf_core::{ExportShape, SortOrder, TagMatch};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "shelf")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Directory holding the library data
    #[arg(long, global = true, env = "SHELF_DATA_DIR", default_value = "./shelf_data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List books, optionally filtered and sorted
    List {
        /// Only books whose title or author contains this text
        #[arg(short, long)]
        search: Option<String>,

        /// Only books with this tag (repeatable)
        #[arg(short, long = "tag")]
        tags: Vec<String>,

        /// Whether books need all selected tags or any of them
        #[arg(long = "match", value_enum, default_value = "all")]
        tag_match: TagMatchArg,

        /// Sort order
        #[arg(long, value_enum, default_value = "title")]
        sort: SortArg,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add a book to the library
    Add {
        /// Book title
        #[arg(long)]
        title: String,

        /// Book author
        #[arg(long)]
        author: String,

        /// Cover image file to embed
        #[arg(long)]
        cover: Option<PathBuf>,

        /// Link to the book file
        #[arg(long)]
        link: Option<String>,

        /// Tag to attach (repeatable)
        #[arg(short, long = "tag")]
        tags: Vec<String>,
    },

    /// Edit an existing book
    Edit {
        /// Book id
        id: String,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New author
        #[arg(long)]
        author: Option<String>,

        /// New cover image file to embed
        #[arg(long, conflicts_with = "clear_cover")]
        cover: Option<PathBuf>,

        /// Remove the cover image
        #[arg(long)]
        clear_cover: bool,

        /// New link to the book file
        #[arg(long)]
        link: Option<String>,

        /// Replace the tags with these (repeatable)
        #[arg(short, long = "tag", conflicts_with = "clear_tags")]
        tags: Vec<String>,

        /// Remove all tags
        #[arg(long)]
        clear_tags: bool,
    },

    /// Delete a book
    Delete {
        /// Book id
        id: String,
    },

    /// List every tag used in the library
    Tags,

    /// Export the library to a JSON backup
    Export {
        /// Output file (defaults to a dated backup name)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write a bare array of books
        #[arg(long)]
        legacy: bool,
    },

    /// Replace the library with a JSON backup
    Import {
        /// Backup file to import
        input: PathBuf,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Lock the library against changes
    Lock,

    /// Unlock the library
    Unlock,

    /// Show a summary of the library
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage the library image
    Image {
        #[command(subcommand)]
        command: ImageCommand,
    },
}

#[derive(Subcommand)]
enum ImageCommand {
    /// Embed an image file as the library image
    Set {
        /// Image file
        file: PathBuf,
    },

    /// Remove the library image
    Clear,
}

#[derive(Clone, Copy, ValueEnum)]
enum TagMatchArg {
    All,
    Any,
}

impl From<TagMatchArg> for TagMatch {
    fn from(arg: TagMatchArg) -> Self {
        match arg {
            TagMatchArg::All => TagMatch::All,
            TagMatchArg::Any => TagMatch::Any,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    Title,
    Recent,
}

impl From<SortArg> for SortOrder {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Title => SortOrder::Title,
            SortArg::Recent => SortOrder::Recent,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        "shelf_cli=debug,shelf_core=debug"
    } else {
        "shelf_cli=info"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::debug!("Using data directory {:?}", cli.data_dir);
    let store = LibraryStore::local(&cli.data_dir);

    match cli.command {
        Commands::List {
            search,
            tags,
            tag_match,
            sort,
            json,
        } => {
            let query = commands::ListQuery {
                search,
                tags,
                tag_match: tag_match.into(),
                sort: sort.into(),
            };
            commands::list(&store, query, json).await
        }

        Commands::Add {
            title,
            author,
            cover,
            link,
            tags,
        } => {
            let fields = commands::BookFields {
                title: Some(title),
                author: Some(author),
                cover,
                link,
                tags,
                ..Default::default()
            };
            commands::add(&store, fields).await
        }

        Commands::Edit {
            id,
            title,
            author,
            cover,
            clear_cover,
            link,
            tags,
            clear_tags,
        } => {
            let fields = commands::BookFields {
                title,
                author,
                cover,
                clear_cover,
                link,
                tags,
                clear_tags,
            };
            commands::edit(&store, &id, fields).await
        }

        Commands::Delete { id } => commands::delete(&store, &id).await,

        Commands::Tags => commands::tags(&store).await,

        Commands::Export { output, legacy } => {
            let shape = if legacy {
                ExportShape::Legacy
            } else {
                ExportShape::Wrapped
            };
            commands::export(&store, output, shape).await
        }

        Commands::Import { input, yes } => commands::import(&store, &input, yes).await,

        Commands::Lock => commands::set_lock(&store, true).await,

        Commands::Unlock => commands::set_lock(&store, false).await,

        Commands::Status { json } => commands::status(&store, json).await,

        Commands::Image { command } => match command {
            ImageCommand::Set { file } => commands::set_image(&store, Some(file.as_path())).await,
            ImageCommand::Clear => commands::set_image(&store, None).await,
        },
    }
}
