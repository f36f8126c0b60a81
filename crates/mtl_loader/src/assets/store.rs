//! Byte-level asset stores
//!
//! An [`AssetStore`] answers "does this path exist" and "give me its bytes".
//! Paths handed to a store always use the host separator; see
//! [`normalize_separators`].

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf, MAIN_SEPARATOR};

use super::AssetError;

/// Replace both `\` and `/` with the host path separator
///
/// MTL files written on one platform routinely use the other's separator.
pub fn normalize_separators(path: &str) -> PathBuf {
    let normalized: String = path
        .chars()
        .map(|c| if c == '\\' || c == '/' { MAIN_SEPARATOR } else { c })
        .collect();
    PathBuf::from(normalized)
}

/// Read-only byte storage addressed by relative paths
pub trait AssetStore {
    /// Whether an asset exists at `path`
    fn exists(&self, path: &Path) -> bool;

    /// Read the full contents of the asset at `path`
    fn read(&self, path: &Path) -> Result<Vec<u8>, AssetError>;
}

/// Store backed by the local filesystem, rooted at a base directory
///
/// Relative paths are joined onto the root; absolute paths are used as-is.
#[derive(Debug, Clone)]
pub struct FileSystemStore {
    root: PathBuf,
}

impl FileSystemStore {
    /// Create a store rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The base directory relative paths resolve against
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a store path to a filesystem path
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

impl Default for FileSystemStore {
    fn default() -> Self {
        Self::new(".")
    }
}

impl AssetStore for FileSystemStore {
    fn exists(&self, path: &Path) -> bool {
        self.resolve(path).is_file()
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>, AssetError> {
        let full_path = self.resolve(path);
        fs::read(&full_path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => AssetError::NotFound(full_path.display().to_string()),
            _ => AssetError::IoError(e),
        })
    }
}

/// In-memory content store
///
/// Keys are normalized on insert and lookup, so `a\b.png` and `a/b.png`
/// address the same entry.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<PathBuf, Vec<u8>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an entry
    pub fn insert(&mut self, path: &str, bytes: impl Into<Vec<u8>>) {
        self.entries.insert(normalize_separators(path), bytes.into());
    }

    /// Builder-style [`MemoryStore::insert`]
    pub fn with_entry(mut self, path: &str, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(path, bytes);
        self
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn key(path: &Path) -> PathBuf {
        normalize_separators(&path.to_string_lossy())
    }
}

impl AssetStore for MemoryStore {
    fn exists(&self, path: &Path) -> bool {
        self.entries.contains_key(&Self::key(path))
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>, AssetError> {
        self.entries
            .get(&Self::key(path))
            .cloned()
            .ok_or_else(|| AssetError::NotFound(path.display().to_string()))
    }
}
