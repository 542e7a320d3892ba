//! Persistence gateway: the storage contract and its JSON file backend.

pub mod json_backend;

use std::path::Path;

use crate::{core::errors::Result, domain::book::Book};

/// Abstraction over persistence backends capable of storing books.
///
/// The core never mutates storage directly; it re-derives views from whatever
/// snapshot the backend last produced.
pub trait StorageBackend: Send + Sync {
    fn save(&self, name: &str, book: &Book) -> Result<()>;
    fn load(&self, name: &str) -> Result<Book>;
    fn list_books(&self) -> Result<Vec<String>>;
    fn delete(&self, name: &str) -> Result<()>;

    /// Ad-hoc file operations backing export/import. Default implementations
    /// forward to the JSON document helpers.
    fn save_to_path(&self, book: &Book, path: &Path) -> Result<()> {
        json_backend::export_book(book, path)
    }

    fn load_from_path(&self, path: &Path) -> Result<Book> {
        json_backend::import_book(path)
    }
}

pub use json_backend::JsonStorage;
