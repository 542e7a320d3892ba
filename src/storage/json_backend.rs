//! Filesystem-backed JSON persistence for books and bulk interchange.

use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::Utc;
use tracing::{info, warn};

use crate::{
    config::Config,
    core::errors::{FinanceError, Result},
    domain::book::Book,
    storage::StorageBackend,
    utils::{ensure_dir, tmp_path, write_atomic},
};

const BOOK_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M";
const DEFAULT_RETENTION: usize = 5;

/// Stores each book as `<slug>.json` under the books directory and keeps
/// timestamped copies of replaced files under the backups directory.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    books_dir: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
}

impl JsonStorage {
    pub fn new(books_dir: PathBuf, backups_dir: PathBuf) -> Result<Self> {
        Self::with_retention(books_dir, backups_dir, DEFAULT_RETENTION)
    }

    pub fn with_retention(
        books_dir: PathBuf,
        backups_dir: PathBuf,
        retention: usize,
    ) -> Result<Self> {
        ensure_dir(&books_dir)?;
        ensure_dir(&backups_dir)?;
        Ok(Self {
            books_dir,
            backups_dir,
            retention: retention.max(1),
        })
    }

    /// Builds a backend rooted at the configured data directory.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::with_retention(
            config.books_dir(),
            config.backups_dir(),
            config.backup_retention,
        )
    }

    pub fn book_path(&self, name: &str) -> PathBuf {
        self.books_dir
            .join(format!("{}.{}", canonical_name(name), BOOK_EXTENSION))
    }

    /// Backup file names for `name`, newest first.
    pub fn list_backups(&self, name: &str) -> Result<Vec<String>> {
        let dir = self.backup_dir(name);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(BOOK_EXTENSION) {
                continue;
            }
            if let Some(file_name) = path.file_name().and_then(|n| n.to_str()) {
                entries.push(file_name.to_string());
            }
        }
        // Timestamps embed lexicographically, so a reverse sort is newest first.
        entries.sort_by(|a, b| b.cmp(a));
        Ok(entries)
    }

    fn backup_dir(&self, name: &str) -> PathBuf {
        self.backups_dir.join(canonical_name(name))
    }

    fn backup_existing_file(&self, name: &str, path: &Path) -> Result<()> {
        if !path.exists() {
            return Ok(());
        }
        let dir = self.backup_dir(name);
        ensure_dir(&dir)?;
        let timestamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let file_name = format!(
            "{}_{}.{}",
            canonical_name(name),
            timestamp,
            BOOK_EXTENSION
        );
        fs::copy(path, dir.join(&file_name))?;
        self.prune_backups(name)?;
        Ok(())
    }

    fn prune_backups(&self, name: &str) -> Result<()> {
        let entries = self.list_backups(name)?;
        for stale in entries.into_iter().skip(self.retention) {
            let path = self.backup_dir(name).join(&stale);
            if let Err(err) = fs::remove_file(&path) {
                warn!("failed to prune backup `{}`: {}", stale, err);
            }
        }
        Ok(())
    }
}

impl StorageBackend for JsonStorage {
    fn save(&self, name: &str, book: &Book) -> Result<()> {
        let path = self.book_path(name);
        if let Some(parent) = path.parent() {
            ensure_dir(parent)?;
        }
        if path.exists() {
            self.backup_existing_file(name, &path)?;
        }
        let tmp = tmp_path(&path);
        write_atomic(&tmp, &to_document_string(book)?)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn load(&self, name: &str) -> Result<Book> {
        let path = self.book_path(name);
        let data = fs::read_to_string(&path).map_err(|err| {
            FinanceError::Storage(format!("cannot read book `{}`: {}", name, err))
        })?;
        Ok(serde_json::from_str(&data)?)
    }

    fn list_books(&self) -> Result<Vec<String>> {
        if !self.books_dir.exists() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.books_dir)? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if path.extension().and_then(|ext| ext.to_str()) != Some(BOOK_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    fn delete(&self, name: &str) -> Result<()> {
        let path = self.book_path(name);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

/// Serializes the bulk-interchange document for `book`.
pub fn to_document_string(book: &Book) -> Result<String> {
    Ok(serde_json::to_string_pretty(book)?)
}

/// Parses `{ "transactions": [...], "investments": [...] }`, validating the
/// whole payload before anything is returned. Missing top-level keys and
/// unparseable dates surface as one descriptive import error.
pub fn from_document_str(data: &str) -> Result<Book> {
    serde_json::from_str(data)
        .map_err(|err| FinanceError::Import(format!("invalid finance document: {}", err)))
}

/// Writes the interchange document for `book` to an arbitrary path.
pub fn export_book(book: &Book, path: &Path) -> Result<()> {
    let tmp = tmp_path(path);
    write_atomic(&tmp, &to_document_string(book)?)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Reads an interchange document from `path`. Import is all-or-nothing: on
/// any error the caller's current book stays untouched.
pub fn import_book(path: &Path) -> Result<Book> {
    let data = fs::read_to_string(path)
        .map_err(|err| FinanceError::Import(format!("cannot read `{}`: {}", path.display(), err)))?;
    let book = from_document_str(&data)?;
    info!(
        transactions = book.transactions.len(),
        investments = book.investments.len(),
        "imported finance document"
    );
    Ok(book)
}

fn canonical_name(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "book".into()
    } else {
        sanitized
    }
}
