//! In-memory record store
//!
//! [`InMemoryRecordStore`] keeps a collection as the same line-oriented text
//! the flat-file store writes, so tests can seed raw lines (including
//! malformed ones) and assert on exactly what was saved.

#![allow(clippy::unwrap_used)] // Test infrastructure uses unwrap for simplicity
#![allow(clippy::missing_panics_doc)] // Lock poisoning only follows a panicking test

use boxoffice_core::codec::Record;
use boxoffice_core::error::PersistenceError;
use boxoffice_core::gateway::{self, Loaded, RecordStore};
use std::fmt;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

/// In-memory store for one collection.
///
/// Clones share the same buffer, so a test can keep a handle after passing
/// the store to a repository.
///
/// # Example
///
/// ```
/// use boxoffice_testing::InMemoryRecordStore;
/// use boxoffice_core::{RecordStore, User};
///
/// let store = InMemoryRecordStore::<User>::with_lines("alice,pw123,a@b.com\nbroken\n");
/// let loaded = store.load().unwrap();
/// assert_eq!(loaded.records.len(), 1);
/// assert_eq!(loaded.skipped, 1);
/// ```
pub struct InMemoryRecordStore<T> {
    text: Arc<RwLock<String>>,
    saves: Arc<AtomicUsize>,
    fail_saves: Arc<AtomicBool>,
    fail_loads: Arc<AtomicBool>,
    _record: PhantomData<fn() -> T>,
}

impl<T> InMemoryRecordStore<T> {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::with_lines("")
    }

    /// Create a store holding `text` as its stored contents
    #[must_use]
    pub fn with_lines(text: &str) -> Self {
        Self {
            text: Arc::new(RwLock::new(text.to_string())),
            saves: Arc::new(AtomicUsize::new(0)),
            fail_saves: Arc::new(AtomicBool::new(false)),
            fail_loads: Arc::new(AtomicBool::new(false)),
            _record: PhantomData,
        }
    }

    /// Stored text, exactly as last saved
    #[must_use]
    pub fn contents(&self) -> String {
        self.text.read().unwrap().clone()
    }

    /// Stored lines
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.text.read().unwrap().lines().map(str::to_string).collect()
    }

    /// Number of successful saves
    #[must_use]
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Make subsequent saves fail (or succeed again)
    pub fn fail_saves(&self, failing: bool) {
        self.fail_saves.store(failing, Ordering::SeqCst);
    }

    /// Make subsequent loads fail (or succeed again)
    pub fn fail_loads(&self, failing: bool) {
        self.fail_loads.store(failing, Ordering::SeqCst);
    }
}

impl<T> Clone for InMemoryRecordStore<T> {
    fn clone(&self) -> Self {
        Self {
            text: Arc::clone(&self.text),
            saves: Arc::clone(&self.saves),
            fail_saves: Arc::clone(&self.fail_saves),
            fail_loads: Arc::clone(&self.fail_loads),
            _record: PhantomData,
        }
    }
}

impl<T> Default for InMemoryRecordStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for InMemoryRecordStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryRecordStore")
            .field("lines", &self.text.read().unwrap().lines().count())
            .field("saves", &self.save_count())
            .finish_non_exhaustive()
    }
}

impl<T: Record> RecordStore<T> for InMemoryRecordStore<T> {
    fn load(&self) -> Result<Loaded<T>, PersistenceError> {
        if self.fail_loads.load(Ordering::SeqCst) {
            return Err(PersistenceError::Backend(format!(
                "{} load refused",
                T::COLLECTION
            )));
        }
        Ok(gateway::decode_lines(&self.text.read().unwrap()))
    }

    fn save(&self, records: &[T]) -> Result<(), PersistenceError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(PersistenceError::Backend(format!(
                "{} save refused",
                T::COLLECTION
            )));
        }
        *self.text.write().unwrap() = gateway::encode_lines(records);
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boxoffice_core::User;

    #[test]
    fn test_failed_save_keeps_previous_contents() {
        let store = InMemoryRecordStore::<User>::with_lines("alice,pw123,a@b.com\n");
        store.fail_saves(true);
        assert!(store.save(&[]).is_err());
        assert_eq!(store.lines(), ["alice,pw123,a@b.com"]);
        assert_eq!(store.save_count(), 0);
    }

    #[test]
    fn test_clones_share_contents() {
        let store = InMemoryRecordStore::<User>::new();
        let handle = store.clone();
        store.save(&[User::new("bob", "pass", "b@c.org")]).unwrap();
        assert_eq!(handle.contents(), "bob,pass,b@c.org\n");
        assert_eq!(handle.save_count(), 1);
    }

    #[test]
    fn test_failed_load() {
        let store = InMemoryRecordStore::<User>::new();
        store.fail_loads(true);
        assert!(store.load().is_err());
    }
}
