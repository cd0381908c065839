//! Persistence gateway abstraction.
//!
//! A [`RecordStore`] holds the full contents of one collection. Repositories
//! load from it once when opened and hand it the whole collection after every
//! mutation (write-through, never incremental).
//!
//! # Implementations
//!
//! - `FlatFileStore` (in `boxoffice-flatfile`): one delimited text file per
//!   collection, replaced atomically on save
//! - `InMemoryRecordStore` (in `boxoffice-testing`): in-memory text buffer with
//!   failure injection for tests

use crate::codec::{self, Record};
use crate::error::PersistenceError;
use crate::types::Collection;
use tracing::warn;

/// Records read from a store, plus the number of lines that were dropped.
#[derive(Clone, Debug, PartialEq)]
pub struct Loaded<T> {
    /// Records in stored order
    pub records: Vec<T>,
    /// Lines that could not be decoded
    pub skipped: usize,
}

impl<T> Loaded<T> {
    /// An empty collection with nothing skipped
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            records: Vec::new(),
            skipped: 0,
        }
    }
}

impl<T> Default for Loaded<T> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Outcome of opening a repository.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadReport {
    /// Collection that was loaded
    pub collection: Collection,
    /// Records kept
    pub loaded: usize,
    /// Lines dropped: malformed, or a duplicate of an identity already loaded
    pub skipped: usize,
}

/// Backing store for one collection.
///
/// # Thread Safety
///
/// The store is used from a single thread, but implementations are
/// `Send + Sync` so a repository can later move behind a lock unchanged.
pub trait RecordStore<T: Record>: Send + Sync {
    /// Read every record.
    ///
    /// A store that has never been written loads as empty. Malformed lines are
    /// skipped and counted, never fatal.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] when the backing medium cannot be read.
    fn load(&self) -> Result<Loaded<T>, PersistenceError>;

    /// Replace the stored contents with `records`.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] when the write fails. Implementations must
    /// leave the previous contents intact in that case.
    fn save(&self, records: &[T]) -> Result<(), PersistenceError>;
}

/// Decodes stored text, one record per line.
///
/// Blank lines are ignored. Every other line that fails to decode is logged
/// and counted in [`Loaded::skipped`].
#[must_use]
pub fn decode_lines<T: Record>(text: &str) -> Loaded<T> {
    let mut loaded = Loaded::empty();

    for (index, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match codec::decode::<T>(line) {
            Ok(record) => loaded.records.push(record),
            Err(error) => {
                loaded.skipped += 1;
                warn!(
                    collection = %T::COLLECTION,
                    line = index + 1,
                    %error,
                    "Skipping malformed line"
                );
            },
        }
    }

    loaded
}

/// Encodes records as stored text, each line terminated by `\n`.
#[must_use]
pub fn encode_lines<T: Record>(records: &[T]) -> String {
    let mut text = String::new();
    for record in records {
        text.push_str(&codec::encode(record));
        text.push('\n');
    }
    text
}
