//! # Box Office Testing
//!
//! Testing utilities and helpers for the box office store.
//!
//! This crate provides:
//! - [`InMemoryRecordStore`]: a `RecordStore` over a text buffer, with
//!   failure injection
//! - [`FixedClock`]: deterministic time for booking dates
//! - [`helpers`]: sample records and a ready-made [`TestOffice`]
//! - [`properties`]: proptest strategies for the record types
//!
//! ## Example
//!
//! ```
//! use boxoffice_testing::{TestOffice, helpers::concert_draft};
//!
//! let mut test = TestOffice::empty();
//! test.office.users_mut().add("alice", "pw123", "a@b.com").unwrap();
//! let event = test.office.events_mut().add(concert_draft()).unwrap();
//!
//! let ticket = test.office.book("alice", event.id, 10).unwrap();
//! assert_eq!(ticket.booking_date, "01-01-2025");
//! assert!(test.tickets.contents().starts_with("1001,alice,"));
//! ```

use boxoffice_core::environment::Clock;
use chrono::{DateTime, Utc};

pub mod helpers;
pub mod properties;
pub mod store;

/// Mock implementations of injected dependencies.
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making booking dates reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use boxoffice_testing::mocks::FixedClock;
    /// use boxoffice_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

// Re-export commonly used items
pub use helpers::TestOffice;
pub use mocks::{FixedClock, test_clock};
pub use store::InMemoryRecordStore;
