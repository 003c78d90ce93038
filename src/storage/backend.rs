//! Key-value blob stores the item store persists into
//!
//! A [`Backend`] stores one string per key and always overwrites the whole
//! value. [`FileBackend`] keeps each key in its own file; [`MemoryBackend`]
//! keeps everything in memory.

use std::{cell::RefCell, collections::HashMap, io, path::PathBuf, rc::Rc};

/// A string store addressed by key.
pub trait Backend {
    /// Reads the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is invalid or the store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, BackendError>;

    /// Replaces the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is invalid or the store cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), BackendError>;
}

impl<B: Backend + ?Sized> Backend for &B {
    fn get(&self, key: &str) -> Result<Option<String>, BackendError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), BackendError> {
        (**self).set(key, value)
    }
}

/// Errors raised by a [`Backend`].
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The key cannot be used to address a value.
    #[error("invalid storage key '{0}'")]
    InvalidKey(String),
    /// The underlying storage failed.
    #[error("storage I/O failed for {}", .path.display())]
    Io {
        /// The file that was being accessed.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: io::Error,
    },
}

/// Stores each key as `<root>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileBackend {
    root: PathBuf,
}

impl FileBackend {
    /// Creates a backend rooted at `root`.
    ///
    /// The directory is created on the first write.
    #[must_use]
    pub const fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, BackendError> {
        let valid = !key.is_empty()
            && key != "."
            && key != ".."
            && !key.contains(['/', '\\', '\0']);
        if !valid {
            return Err(BackendError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(format!("{key}.json")))
    }
}

impl Backend for FileBackend {
    fn get(&self, key: &str) -> Result<Option<String>, BackendError> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(BackendError::Io { path, source }),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), BackendError> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.root).map_err(|source| BackendError::Io {
            path: self.root.clone(),
            source,
        })?;

        // Stage next to the target, then rename over it.
        let staging = path.with_extension("json.tmp");
        std::fs::write(&staging, value).map_err(|source| BackendError::Io {
            path: staging.clone(),
            source,
        })?;
        std::fs::rename(&staging, &path).map_err(|source| BackendError::Io { path, source })
    }
}

/// An in-memory backend.
///
/// Clones share the same storage, so a test can hand one clone to a store
/// and inspect what was written through another.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    values: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryBackend {
    /// Creates an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys that hold a value.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.borrow().len()
    }

    /// Whether no key holds a value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.borrow().is_empty()
    }
}

impl Backend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<String>, BackendError> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), BackendError> {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
