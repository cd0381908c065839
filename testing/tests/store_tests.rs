//! Tests for the in-memory store and fixtures

#![allow(clippy::unwrap_used)] // Tests can unwrap

use boxoffice_core::{Event, EventRepository, RecordStore, User, UserRepository};
use boxoffice_testing::InMemoryRecordStore;
use boxoffice_testing::helpers::{concert_draft, sample_users};
use boxoffice_testing::properties::arb_event;
use proptest::prelude::*;
use std::sync::Arc;

#[test]
fn repository_writes_through_to_store() {
    let store = InMemoryRecordStore::<User>::new();
    let mut users = UserRepository::open(Arc::new(store.clone()), 10).unwrap();
    for user in sample_users() {
        users.add(&user.username, &user.password, &user.email).unwrap();
    }

    assert_eq!(store.save_count(), 2);
    assert_eq!(
        store.lines(),
        ["alice,pw123,a@b.com", "bob,hunter22,bob@example.org"]
    );
}

#[test]
fn failed_save_leaves_previous_contents() {
    let store = InMemoryRecordStore::<Event>::new();
    let mut events = EventRepository::open(Arc::new(store.clone()), 10).unwrap();
    events.add(concert_draft()).unwrap();
    let saved = store.contents();

    store.fail_saves(true);
    assert!(events.delete(0).is_err());
    assert!(events.is_empty());
    assert_eq!(store.contents(), saved);
}

proptest! {
    #[test]
    fn prop_generated_events_keep_seat_invariant(event in arb_event()) {
        prop_assert!(event.available <= event.capacity);
        prop_assert!(event.capacity > 0);
    }

    #[test]
    fn prop_store_reloads_saved_events(events in prop::collection::vec(arb_event(), 0..6)) {
        let store = InMemoryRecordStore::new();
        store.save(&events).unwrap();
        prop_assert_eq!(store.load().unwrap().records, events);
    }
}
