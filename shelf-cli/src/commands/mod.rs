//! CLI command implementations

mod books;
mod library;
mod list;
mod transfer;

pub use books::{add, delete, edit, BookFields};
pub use library::{set_image, set_lock, status};
pub use list::{list, tags, ListQuery};
pub use transfer::{export, import};
