//! Repositories: the owning collections for each record kind.
//!
//! [`Repository`] holds the ordered records of one kind and talks to the
//! [`RecordStore`] behind it. The per-kind repositories wrap it and add the
//! rules of their record kind:
//!
//! - [`UserRepository`]: unique usernames, email shape, signup rules
//! - [`EventRepository`]: stable event IDs, seat levels, search
//! - [`TicketRepository`]: booking through the seat ledger, reporting queries
//!
//! Every mutating operation saves the whole collection before returning. If
//! that save fails the in-memory change is kept and the error is returned as
//! [`StoreError::Persistence`]; [`Repository::flush`] retries it.

mod events;
mod tickets;
mod users;

pub use events::EventRepository;
pub use tickets::{Booking, TicketRepository};
pub use users::{MIN_PASSWORD_LEN, UserRepository};

use crate::codec::Record;
use crate::error::{Result, StoreError};
use crate::gateway::{LoadReport, Loaded, RecordStore};
use crate::metrics;
use crate::types::Identified;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Ordered collection of one record kind, bound to its backing store.
pub struct Repository<T: Record + Identified> {
    records: Vec<T>,
    max_records: usize,
    store: Arc<dyn RecordStore<T>>,
    load_report: LoadReport,
}

impl<T: Record + Identified> Repository<T> {
    /// Load the collection from `store`.
    ///
    /// Records that break a collection rule (see [`Identified::load_fault`])
    /// or whose identity repeats an earlier one are dropped and counted as
    /// skipped, alongside the lines the store could not decode.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Persistence`] if the store cannot be read.
    pub fn open(store: Arc<dyn RecordStore<T>>, max_records: usize) -> Result<Self> {
        let Loaded {
            records: stored,
            skipped,
        } = store.load()?;

        let mut seen = HashSet::with_capacity(stored.len());
        let mut records = Vec::with_capacity(stored.len());
        let mut rejected = 0;
        for record in stored {
            let key = record.identity();
            if let Some(fault) = record.load_fault() {
                rejected += 1;
                warn!(collection = %T::COLLECTION, identity = ?key, %fault, "Skipping invalid record");
                continue;
            }
            if seen.contains(&key) {
                rejected += 1;
                warn!(collection = %T::COLLECTION, identity = ?key, "Skipping duplicate record");
                continue;
            }
            seen.insert(key);
            records.push(record);
        }

        let load_report = LoadReport {
            collection: T::COLLECTION,
            loaded: records.len(),
            skipped: skipped + rejected,
        };
        metrics::record_skipped(T::COLLECTION, load_report.skipped);
        info!(
            collection = %T::COLLECTION,
            loaded = load_report.loaded,
            skipped = load_report.skipped,
            "Collection loaded"
        );
        if records.len() > max_records {
            warn!(
                collection = %T::COLLECTION,
                records = records.len(),
                max_records,
                "Collection holds more records than its configured maximum"
            );
        }

        Ok(Self {
            records,
            max_records,
            store,
            load_report,
        })
    }

    /// All records in collection order
    #[must_use]
    pub fn list(&self) -> &[T] {
        &self.records
    }

    /// Iterate over the records in collection order
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.records.iter()
    }

    /// Record at `index`
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.records.get(index)
    }

    /// Number of records
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the collection is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// What happened when the collection was loaded
    #[must_use]
    pub const fn load_report(&self) -> LoadReport {
        self.load_report
    }

    /// Write the current contents to the backing store.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Persistence`] if the store rejects the write.
    pub fn flush(&self) -> Result<()> {
        let saved = self.store.save(&self.records);
        metrics::record_save(T::COLLECTION, saved.is_ok());
        match saved {
            Ok(()) => {
                debug!(collection = %T::COLLECTION, records = self.records.len(), "Collection saved");
                Ok(())
            },
            Err(source) => {
                error!(collection = %T::COLLECTION, error = %source, "Failed to save collection");
                Err(StoreError::Persistence(source))
            },
        }
    }

    pub(crate) fn ensure_room(&self) -> Result<()> {
        if self.records.len() >= self.max_records {
            return Err(StoreError::CapacityExceeded {
                collection: T::COLLECTION,
                max: self.max_records,
            });
        }
        Ok(())
    }

    pub(crate) fn push(&mut self, record: T) {
        self.records.push(record);
    }

    pub(crate) fn remove(&mut self, index: usize) -> Result<T> {
        self.check_index(index)?;
        Ok(self.records.remove(index))
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Result<&mut T> {
        let len = self.records.len();
        self.records
            .get_mut(index)
            .ok_or(StoreError::IndexOutOfRange { index, len })
    }

    pub(crate) fn find_mut(&mut self, predicate: impl Fn(&T) -> bool) -> Option<&mut T> {
        self.records.iter_mut().find(|record| predicate(record))
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.records.len() {
            return Err(StoreError::IndexOutOfRange {
                index,
                len: self.records.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    #![allow(clippy::unwrap_used)]

    use crate::codec::Record;
    use crate::error::PersistenceError;
    use crate::gateway::{self, Loaded, RecordStore};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    /// Minimal text-buffer store for unit tests inside this crate.
    #[derive(Default)]
    pub(crate) struct MemoryStore {
        pub(crate) text: Mutex<String>,
        pub(crate) saves: AtomicUsize,
        pub(crate) failing: AtomicBool,
    }

    impl MemoryStore {
        pub(crate) fn with_text(text: &str) -> Arc<Self> {
            let store = Self::default();
            *store.text.lock().unwrap() = text.to_string();
            Arc::new(store)
        }

        pub(crate) fn text(&self) -> String {
            self.text.lock().unwrap().clone()
        }

        pub(crate) fn saves(&self) -> usize {
            self.saves.load(Ordering::SeqCst)
        }

        pub(crate) fn fail_saves(&self, failing: bool) {
            self.failing.store(failing, Ordering::SeqCst);
        }
    }

    impl<T: Record> RecordStore<T> for MemoryStore {
        fn load(&self) -> Result<Loaded<T>, PersistenceError> {
            Ok(gateway::decode_lines(&self.text.lock().unwrap()))
        }

        fn save(&self, records: &[T]) -> Result<(), PersistenceError> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(PersistenceError::Backend("save refused".to_string()));
            }
            *self.text.lock().unwrap() = gateway::encode_lines(records);
            self.saves.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }
}
