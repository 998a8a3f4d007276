//! Corpus scanning.
//!
//! This module defines the [`PageStore`] trait, the seam between the query
//! engine and wherever page records live, and [`DirectoryStore`], the
//! implementation for a flat directory of record files.
//!
//! ## Eligibility
//!
//! A directory entry is part of the corpus when:
//!
//! 1. Its name does not start with `.`
//! 2. Its name is valid UTF-8
//! 3. It resolves (following symlinks) to a regular file
//!
//! Subdirectories are never descended into.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Abstract source of page records.
///
/// ## Thread Safety
///
/// Implementations must be `Send + Sync`; the engine shares one store across
/// every concurrent query and never mutates it.
pub trait PageStore: Send + Sync {
    /// Location shown to users when the store is unavailable.
    fn root(&self) -> &Path;

    /// Whether the store exists right now.
    fn is_available(&self) -> bool;

    /// Enumerate eligible record filenames in store order.
    ///
    /// The sequence is lazy. Calling `scan` again starts a fresh
    /// enumeration. An unavailable store yields nothing.
    fn scan(&self) -> Box<dyn Iterator<Item = String> + '_>;

    /// Whether `filename` names an eligible record.
    fn contains(&self, filename: &str) -> bool;

    /// Read the raw bytes of a record.
    fn read(&self, filename: &str) -> io::Result<Vec<u8>>;

    /// Get the store name (e.g., "directory")
    fn name(&self) -> &'static str;

    /// Enumerate eligible record filenames in ascending order.
    fn scan_sorted(&self) -> Vec<String> {
        let mut names: Vec<String> = self.scan().collect();
        names.sort();
        names
    }
}

/// Returns true if `name` can address a record: non-empty, not hidden, and
/// free of path separators.
pub fn is_record_name(name: &str) -> bool {
    !name.is_empty() && !name.starts_with('.') && !name.contains(|c: char| c == '/' || c == '\\')
}

/// A flat directory of page record files.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    /// Create a store rooted at `root`. The directory need not exist yet.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DirectoryStore { root: root.into() }
    }

    fn record_path(&self, filename: &str) -> PathBuf {
        self.root.join(filename)
    }
}

impl PageStore for DirectoryStore {
    fn root(&self) -> &Path {
        &self.root
    }

    fn is_available(&self) -> bool {
        self.root.is_dir()
    }

    fn scan(&self) -> Box<dyn Iterator<Item = String> + '_> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => Some(entries),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(root = %self.root.display(), "Store root does not exist");
                None
            }
            Err(e) => {
                warn!(root = %self.root.display(), error = %e, "Failed to read store root");
                None
            }
        };

        Box::new(Scan { entries })
    }

    fn contains(&self, filename: &str) -> bool {
        is_record_name(filename) && self.record_path(filename).is_file()
    }

    fn read(&self, filename: &str) -> io::Result<Vec<u8>> {
        if !is_record_name(filename) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("not a record name: {}", filename),
            ));
        }
        fs::read(self.record_path(filename))
    }

    fn name(&self) -> &'static str {
        "directory"
    }
}

/// Lazy enumeration over one `read_dir` pass.
struct Scan {
    entries: Option<fs::ReadDir>,
}

impl Iterator for Scan {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let entries = self.entries.as_mut()?;

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    debug!(error = %e, "Failed to read directory entry");
                    continue;
                }
            };

            let name = match entry.file_name().into_string() {
                Ok(name) => name,
                Err(raw) => {
                    debug!(name = ?raw, "Skipping non UTF-8 entry");
                    continue;
                }
            };

            if name.starts_with('.') {
                continue;
            }

            // `fs::metadata` follows symlinks, so a link to a directory is
            // rejected and a link to a file is kept.
            match fs::metadata(entry.path()) {
                Ok(meta) if meta.is_file() => return Some(name),
                Ok(_) => continue,
                Err(e) => {
                    debug!(name = %name, error = %e, "Failed to stat entry");
                    continue;
                }
            }
        }

        None
    }
}

/// In-memory store for engine tests.
#[cfg(test)]
pub(crate) mod memory {
    use super::*;

    /// Records in insertion order; `None` content simulates an unreadable file.
    pub(crate) struct MemoryStore {
        root: PathBuf,
        available: bool,
        records: Vec<(String, Option<Vec<u8>>)>,
    }

    impl MemoryStore {
        pub(crate) fn new() -> Self {
            MemoryStore {
                root: PathBuf::from("memory"),
                available: true,
                records: Vec::new(),
            }
        }

        pub(crate) fn unavailable() -> Self {
            MemoryStore {
                available: false,
                ..Self::new()
            }
        }

        pub(crate) fn with(mut self, filename: &str, content: &str) -> Self {
            self.records
                .push((filename.to_string(), Some(content.as_bytes().to_vec())));
            self
        }

        pub(crate) fn with_unreadable(mut self, filename: &str) -> Self {
            self.records.push((filename.to_string(), None));
            self
        }
    }

    impl PageStore for MemoryStore {
        fn root(&self) -> &Path {
            &self.root
        }

        fn is_available(&self) -> bool {
            self.available
        }

        fn scan(&self) -> Box<dyn Iterator<Item = String> + '_> {
            if !self.available {
                return Box::new(std::iter::empty());
            }
            Box::new(self.records.iter().map(|(name, _)| name.clone()))
        }

        fn contains(&self, filename: &str) -> bool {
            self.available && self.records.iter().any(|(name, _)| name == filename)
        }

        fn read(&self, filename: &str) -> io::Result<Vec<u8>> {
            match self.records.iter().find(|(name, _)| name == filename) {
                Some((_, Some(bytes))) => Ok(bytes.clone()),
                Some((_, None)) => Err(io::Error::new(
                    io::ErrorKind::PermissionDenied,
                    "permission denied",
                )),
                None => Err(io::Error::new(io::ErrorKind::NotFound, "not found")),
            }
        }

        fn name(&self) -> &'static str {
            "memory"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn make_store() -> (TempDir, DirectoryStore) {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("Main.HomePage"), "text=Hello").unwrap();
        fs::write(root.join("Docs.Intro"), "text=Intro").unwrap();
        fs::write(root.join(".flock"), "").unwrap();
        fs::create_dir(root.join("uploads")).unwrap();
        fs::write(root.join("uploads").join("Nested.Page"), "text=x").unwrap();
        let store = DirectoryStore::new(root);
        (temp_dir, store)
    }

    #[test]
    fn test_scan_filters_hidden_and_dirs() {
        let (_temp_dir, store) = make_store();
        let mut names: Vec<String> = store.scan().collect();
        names.sort();
        assert_eq!(names, vec!["Docs.Intro", "Main.HomePage"]);
    }

    #[test]
    fn test_scan_is_restartable() {
        let (_temp_dir, store) = make_store();
        assert_eq!(store.scan().count(), 2);
        assert_eq!(store.scan().count(), 2);
    }

    #[test]
    fn test_scan_sorted() {
        let (_temp_dir, store) = make_store();
        assert_eq!(store.scan_sorted(), vec!["Docs.Intro", "Main.HomePage"]);
    }

    #[test]
    fn test_missing_root_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = DirectoryStore::new(temp_dir.path().join("nope"));
        assert!(!store.is_available());
        assert_eq!(store.scan().count(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks() {
        let (temp_dir, store) = make_store();
        let root = temp_dir.path();
        std::os::unix::fs::symlink(root.join("uploads"), root.join("Link.ToDir")).unwrap();
        std::os::unix::fs::symlink(root.join("Docs.Intro"), root.join("Link.ToFile")).unwrap();

        let names = store.scan_sorted();
        assert!(names.contains(&"Link.ToFile".to_string()));
        assert!(!names.contains(&"Link.ToDir".to_string()));
    }

    #[test]
    fn test_contains_and_read() {
        let (_temp_dir, store) = make_store();
        assert!(store.contains("Main.HomePage"));
        assert!(!store.contains("Main.Missing"));
        assert!(!store.contains("uploads"));
        assert!(!store.contains(".flock"));
        assert!(!store.contains("uploads/Nested.Page"));
        assert_eq!(store.read("Main.HomePage").unwrap(), b"text=Hello");
        assert!(store.read("../Main.HomePage").is_err());
    }

    #[test]
    fn test_is_record_name() {
        assert!(is_record_name("Main.HomePage"));
        assert!(!is_record_name(""));
        assert!(!is_record_name(".htaccess"));
        assert!(!is_record_name("a/b"));
        assert!(!is_record_name("a\\b"));
    }
}
