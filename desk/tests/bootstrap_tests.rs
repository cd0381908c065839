//! Bootstrap tests against a temporary data directory

#![allow(clippy::unwrap_used)] // Tests can unwrap

use boxoffice_core::{Collection, ErrorKind};
use boxoffice_desk::{Config, open_box_office};
use boxoffice_testing::helpers::concert_draft;
use boxoffice_testing::test_clock;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

fn config_for(dir: &TempDir, max_users: &str) -> Config {
    let dir = dir.path().to_string_lossy().into_owned();
    let max_users = max_users.to_string();
    Config::from_lookup(move |key| match key {
        "BOXOFFICE_DATA_DIR" => Some(dir.clone()),
        "BOXOFFICE_MAX_USERS" => Some(max_users.clone()),
        _ => None,
    })
}

#[test]
fn opens_configured_directory_and_reports_loads() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("users.csv"),
        "alice,pw123,a@b.com\nmalformed\n",
    )
    .unwrap();

    let office = open_box_office(&config_for(&dir, "10"), Arc::new(test_clock())).unwrap();
    let [users, events, tickets] = office.load_reports();
    assert_eq!(users.collection, Collection::Users);
    assert_eq!((users.loaded, users.skipped), (1, 1));
    assert_eq!((events.loaded, tickets.loaded), (0, 0));
}

#[test]
fn configured_limits_apply() {
    let dir = TempDir::new().unwrap();
    let mut office = open_box_office(&config_for(&dir, "1"), Arc::new(test_clock())).unwrap();

    office.users_mut().add("alice", "pw123", "a@b.com").unwrap();
    let error = office.users_mut().add("bob", "pw123", "b@c.org").unwrap_err();
    assert_eq!(error.kind(), ErrorKind::CapacityExceeded);
}

#[test]
fn bookings_reach_the_configured_files() {
    let dir = TempDir::new().unwrap();
    let config = config_for(&dir, "10");
    let mut office = open_box_office(&config, Arc::new(test_clock())).unwrap();
    office.users_mut().add("alice", "pw123", "a@b.com").unwrap();
    let event = office.events_mut().add(concert_draft()).unwrap();
    office.book("alice", event.id, 2).unwrap();

    let reopened = open_box_office(&config, Arc::new(test_clock())).unwrap();
    let report = reopened.sales_report();
    assert_eq!(report.total_bookings, 1);
    assert!((report.total_revenue - 40.0).abs() < 1e-9);
    assert!(report.to_string().contains("Summer Concert: 1 bookings, 2 seats, $40.00"));
}
