//! File-backed `RecordStore` and the data file layout.

use boxoffice_core::codec::Record;
use boxoffice_core::error::PersistenceError;
use boxoffice_core::gateway::{self, Loaded, RecordStore};
use boxoffice_core::{BoxOfficeStores, Event, Ticket, User};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// One collection stored in one text file.
pub struct FlatFileStore<T> {
    path: PathBuf,
    _record: PhantomData<fn() -> T>,
}

impl<T> FlatFileStore<T> {
    /// Store backed by the file at `path`. Nothing is touched until the
    /// first load or save.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _record: PhantomData,
        }
    }

    /// Path of the backing file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> PersistenceError {
        PersistenceError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn write_atomically(&self, contents: &str) -> Result<(), PersistenceError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(|e| self.io_error(e))?;

        let mut temp = NamedTempFile::new_in(dir).map_err(|e| self.io_error(e))?;
        temp.write_all(contents.as_bytes())
            .map_err(|e| self.io_error(e))?;
        temp.as_file().sync_all().map_err(|e| self.io_error(e))?;
        temp.persist(&self.path)
            .map_err(|e| self.io_error(e.error))?;
        Ok(())
    }
}

impl<T> Clone for FlatFileStore<T> {
    fn clone(&self) -> Self {
        Self::new(self.path.clone())
    }
}

impl<T> fmt::Debug for FlatFileStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlatFileStore")
            .field("path", &self.path)
            .finish()
    }
}

impl<T: Record> RecordStore<T> for FlatFileStore<T> {
    fn load(&self) -> Result<Loaded<T>, PersistenceError> {
        match fs::read_to_string(&self.path) {
            Ok(text) => {
                let loaded = gateway::decode_lines(&text);
                debug!(
                    collection = %T::COLLECTION,
                    path = %self.path.display(),
                    records = loaded.records.len(),
                    skipped = loaded.skipped,
                    "Read data file"
                );
                Ok(loaded)
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!(
                    collection = %T::COLLECTION,
                    path = %self.path.display(),
                    "Data file not found, starting empty"
                );
                Ok(Loaded::empty())
            },
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn save(&self, records: &[T]) -> Result<(), PersistenceError> {
        self.write_atomically(&gateway::encode_lines(records))?;
        debug!(
            collection = %T::COLLECTION,
            path = %self.path.display(),
            records = records.len(),
            "Wrote data file"
        );
        Ok(())
    }
}

/// Locations of the three data files.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataFiles {
    /// Users file
    pub users: PathBuf,
    /// Events file
    pub events: PathBuf,
    /// Tickets file
    pub tickets: PathBuf,
}

impl DataFiles {
    /// Default users file name
    pub const USERS_FILE: &'static str = "users.csv";
    /// Default events file name
    pub const EVENTS_FILE: &'static str = "events.csv";
    /// Default tickets file name
    pub const TICKETS_FILE: &'static str = "tickets.csv";

    /// The default file names inside `dir`
    #[must_use]
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            users: dir.join(Self::USERS_FILE),
            events: dir.join(Self::EVENTS_FILE),
            tickets: dir.join(Self::TICKETS_FILE),
        }
    }

    /// A store for each file
    #[must_use]
    pub fn stores(&self) -> BoxOfficeStores {
        BoxOfficeStores {
            users: Arc::new(FlatFileStore::<User>::new(&self.users)),
            events: Arc::new(FlatFileStore::<Event>::new(&self.events)),
            tickets: Arc::new(FlatFileStore::<Ticket>::new(&self.tickets)),
        }
    }
}

impl Default for DataFiles {
    fn default() -> Self {
        Self::in_dir(".")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_in_dir_uses_default_names() {
        let files = DataFiles::in_dir("/srv/boxoffice");
        assert_eq!(files.users, Path::new("/srv/boxoffice/users.csv"));
        assert_eq!(files.events, Path::new("/srv/boxoffice/events.csv"));
        assert_eq!(files.tickets, Path::new("/srv/boxoffice/tickets.csv"));
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let store = FlatFileStore::<User>::new(dir.path().join("users.csv"));
        let loaded = store.load().unwrap();
        assert!(loaded.records.is_empty());
        assert_eq!(loaded.skipped, 0);
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("users.csv");
        let store = FlatFileStore::<User>::new(&path);
        store.save(&[User::new("alice", "pw123", "a@b.com")]).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "alice,pw123,a@b.com\n");
    }

    #[test]
    fn test_unreadable_path_is_io_error() {
        let dir = TempDir::new().unwrap();
        let store = FlatFileStore::<User>::new(dir.path());
        let error = store.load().unwrap_err();
        assert!(matches!(error, PersistenceError::Io { ref path, .. } if path == dir.path()));
    }
}
