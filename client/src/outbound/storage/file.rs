//! File-backed key/value store.
//!
//! All keys live in one JSON object inside a directory opened through
//! `cap_std`, so the store can never touch paths outside that directory.
//! Writes go to a staging file that is renamed over the document.

use std::collections::BTreeMap;
use std::io;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use cap_std::{ambient_authority, fs::Dir};
use tracing::debug;

use crate::domain::ports::{KeyValueStore, StorageError};

const DOCUMENT_NAME: &str = "console-state.json";
const STAGING_NAME: &str = ".console-state.json.tmp";

type Document = BTreeMap<String, String>;

/// Store persisting values to `console-state.json` in one directory.
#[derive(Debug)]
pub struct FileStore {
    dir: Dir,
    guard: Mutex<()>,
}

impl FileStore {
    /// Open (creating when missing) the store directory at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] when the directory cannot be created or
    /// opened.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        Dir::create_ambient_dir_all(path, ambient_authority())
            .map_err(|error| io_error(path, &error))?;
        let dir = Dir::open_ambient_dir(path, ambient_authority())
            .map_err(|error| io_error(path, &error))?;
        debug!(path = %path.display(), "opened console state directory");
        Ok(Self {
            dir,
            guard: Mutex::new(()),
        })
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.guard
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn read_document(&self) -> Result<Document, StorageError> {
        match self.dir.read_to_string(DOCUMENT_NAME) {
            Ok(text) if text.trim().is_empty() => Ok(Document::new()),
            Ok(text) => serde_json::from_str(&text).map_err(|error| {
                StorageError::serialization(format!(
                    "{DOCUMENT_NAME} is not a JSON object: {error}"
                ))
            }),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(Document::new()),
            Err(error) => Err(io_error(Path::new(DOCUMENT_NAME), &error)),
        }
    }

    fn write_document(&self, document: &Document) -> Result<(), StorageError> {
        let text = serde_json::to_string_pretty(document)
            .map_err(|error| StorageError::serialization(error.to_string()))?;
        self.dir
            .write(STAGING_NAME, text.as_bytes())
            .map_err(|error| io_error(Path::new(STAGING_NAME), &error))?;
        self.dir
            .rename(STAGING_NAME, &self.dir, DOCUMENT_NAME)
            .map_err(|error| io_error(Path::new(DOCUMENT_NAME), &error))
    }

    fn update(&self, apply: impl FnOnce(&mut Document) -> bool) -> Result<(), StorageError> {
        let _guard = self.lock();
        let mut document = self.read_document()?;
        if apply(&mut document) {
            self.write_document(&document)?;
        }
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.lock();
        Ok(self.read_document()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.update(|document| {
            document.insert(key.to_owned(), value.to_owned()).as_deref() != Some(value)
        })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.update(|document| document.remove(key).is_some())
    }
}

fn io_error(path: &Path, error: &io::Error) -> StorageError {
    StorageError::io(format!("{}: {error}", path.display()))
}
