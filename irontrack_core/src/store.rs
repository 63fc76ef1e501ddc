//! Per-user document persistence with file locking.
//!
//! The whole document is one JSON file per user key, overwritten in full
//! after every mutation. Writes are atomic (temp file + rename) and
//! serialized with an exclusive lock; a missing or corrupted file degrades
//! to the new-user document rather than failing, since a lost workout flow
//! is the worst outcome to avoid.

use crate::types::Document;
use crate::{Error, Result};
use fs2::FileExt;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Persistence gateway for user documents
pub struct Store {
    data_dir: PathBuf,
}

impl Store {
    /// Create a store rooted at the given data directory
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// The document file backing one user key
    pub fn user_path(&self, user_key: &str) -> PathBuf {
        self.data_dir.join("users").join(format!("{user_key}.json"))
    }

    /// Load a user's document with shared locking
    ///
    /// Returns the new-user document if no file exists yet. A file that
    /// cannot be read or parsed also degrades to the new-user document
    /// with a warning.
    pub fn load(&self, user_key: &str) -> Result<Document> {
        let path = self.user_path(user_key);
        if !path.exists() {
            tracing::info!("no document for user {}, starting fresh", user_key);
            return Ok(Document::new_user());
        }

        let file = match File::open(&path) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!("unable to open document {:?}: {}. Starting fresh.", path, e);
                return Ok(Document::new_user());
            }
        };

        if let Err(e) = file.lock_shared() {
            tracing::warn!("unable to lock document {:?}: {}. Starting fresh.", path, e);
            return Ok(Document::new_user());
        }

        let mut contents = String::new();
        let mut reader = std::io::BufReader::new(&file);
        if let Err(e) = reader.read_to_string(&mut contents) {
            let _ = file.unlock();
            tracing::warn!("failed to read document {:?}: {}. Starting fresh.", path, e);
            return Ok(Document::new_user());
        }

        file.unlock()?;

        match serde_json::from_str::<Document>(&contents) {
            Ok(document) => {
                tracing::debug!("loaded document for user {} from {:?}", user_key, path);
                Ok(document)
            }
            Err(e) => {
                tracing::warn!("failed to parse document {:?}: {}. Starting fresh.", path, e);
                Ok(Document::new_user())
            }
        }
    }

    /// Save a user's document with exclusive locking
    ///
    /// Atomically writes by:
    /// 1. Writing to a temp file in the same directory
    /// 2. Syncing to disk
    /// 3. Renaming over the original
    pub fn save(&self, user_key: &str, document: &Document) -> Result<()> {
        let path = self.user_path(user_key);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let temp = NamedTempFile::new_in(path.parent().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::Other, "document path missing parent")
        })?)?;

        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string(document)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        temp.persist(&path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("saved document for user {} to {:?}", user_key, path);
        Ok(())
    }

    /// Load a document, transform it, and save the new snapshot
    ///
    /// The closure receives the current document and returns the next one
    /// (copy-on-write); validation failures propagate without saving.
    pub fn update<F>(&self, user_key: &str, f: F) -> Result<Document>
    where
        F: FnOnce(&Document) -> Result<Document>,
    {
        let current = self.load(user_key)?;
        let next = f(&current)?;
        self.save(user_key, &next)?;
        Ok(next)
    }
}

/// List the user keys with a persisted document under a data directory
pub fn list_users(data_dir: &Path) -> Result<Vec<String>> {
    let users_dir = data_dir.join("users");
    if !users_dir.exists() {
        return Ok(Vec::new());
    }

    let mut users = Vec::new();
    for entry in std::fs::read_dir(users_dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if let Some(stem) = name.strip_suffix(".json") {
            users.push(stem.to_string());
        }
    }
    users.sort();
    Ok(users)
}
