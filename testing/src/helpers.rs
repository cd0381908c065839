//! Test helpers and sample data.

#![allow(clippy::unwrap_used)] // Test infrastructure uses unwrap for simplicity
#![allow(clippy::missing_panics_doc)]

use crate::mocks::test_clock;
use crate::store::InMemoryRecordStore;
use boxoffice_core::{
    AdminCredentials, BoxOffice, BoxOfficeStores, Event, EventDraft, Limits, Result, Ticket, User,
};
use std::sync::Arc;
use std::sync::Once;

/// A [`BoxOffice`] over in-memory stores, with handles to those stores.
pub struct TestOffice {
    /// The office under test
    pub office: BoxOffice,
    /// User store handle
    pub users: InMemoryRecordStore<User>,
    /// Event store handle
    pub events: InMemoryRecordStore<Event>,
    /// Ticket store handle
    pub tickets: InMemoryRecordStore<Ticket>,
}

impl TestOffice {
    /// Open an office over empty stores with default limits.
    #[must_use]
    pub fn empty() -> Self {
        Self::open(
            InMemoryRecordStore::new(),
            InMemoryRecordStore::new(),
            InMemoryRecordStore::new(),
            &Limits::default(),
        )
        .unwrap()
    }

    /// Open an office over stores seeded with raw lines.
    #[must_use]
    pub fn with_lines(users: &str, events: &str, tickets: &str) -> Self {
        Self::open(
            InMemoryRecordStore::with_lines(users),
            InMemoryRecordStore::with_lines(events),
            InMemoryRecordStore::with_lines(tickets),
            &Limits::default(),
        )
        .unwrap()
    }

    /// Open an office over the given stores, dated by [`test_clock`].
    ///
    /// # Errors
    ///
    /// Returns whatever [`BoxOffice::open`] returns, e.g. when a store has
    /// been told to fail loads.
    pub fn open(
        users: InMemoryRecordStore<User>,
        events: InMemoryRecordStore<Event>,
        tickets: InMemoryRecordStore<Ticket>,
        limits: &Limits,
    ) -> Result<Self> {
        let office = BoxOffice::open(
            BoxOfficeStores {
                users: Arc::new(users.clone()),
                events: Arc::new(events.clone()),
                tickets: Arc::new(tickets.clone()),
            },
            limits,
            AdminCredentials::default(),
            Arc::new(test_clock()),
        )?;
        Ok(Self {
            office,
            users,
            events,
            tickets,
        })
    }

    /// Reopen a fresh office over the same stores, as a restart would.
    #[must_use]
    pub fn reopen(&self) -> Self {
        Self::open(
            self.users.clone(),
            self.events.clone(),
            self.tickets.clone(),
            &Limits::default(),
        )
        .unwrap()
    }
}

/// A 50-seat concert at 20.00 a seat.
#[must_use]
pub fn concert_draft() -> EventDraft {
    EventDraft {
        name: "Summer Concert".to_string(),
        date: "15-07-2025".to_string(),
        venue: "Riverside Park".to_string(),
        category: "Music".to_string(),
        price: 20.0,
        capacity: 50,
    }
}

/// A 200-seat conference at 150.00 a seat.
#[must_use]
pub fn conference_draft() -> EventDraft {
    EventDraft {
        name: "Systems Conference".to_string(),
        date: "03-10-2025".to_string(),
        venue: "Convention Centre".to_string(),
        category: "Conference".to_string(),
        price: 150.0,
        capacity: 200,
    }
}

/// Two registered customers: `alice` and `bob`.
#[must_use]
pub fn sample_users() -> Vec<User> {
    vec![
        User::new("alice", "pw123", "a@b.com"),
        User::new("bob", "hunter22", "bob@example.org"),
    ]
}

/// Install a test-friendly tracing subscriber once per process.
///
/// Output goes through the test harness writer, so it only shows for
/// failing tests. Filter with `RUST_LOG`.
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reopen_sees_saved_records() {
        let mut test = TestOffice::empty();
        for user in sample_users() {
            test.office
                .users_mut()
                .add(&user.username, &user.password, &user.email)
                .unwrap();
        }
        let reopened = test.reopen();
        assert_eq!(reopened.office.users().list(), sample_users().as_slice());
    }
}
