//! Injected dependencies.
//!
//! The store reads the current time through [`Clock`] so tests can pin the
//! booking date.

use chrono::{DateTime, Utc};

/// Format of booking dates written on tickets.
pub const BOOKING_DATE_FORMAT: &str = "%d-%m-%Y";

/// Clock trait - abstracts time operations for testability
///
/// # Examples
///
/// ```
/// use boxoffice_core::environment::{Clock, SystemClock};
///
/// let clock = SystemClock;
/// let date = clock.booking_date();
/// assert_eq!(date.len(), "01-01-2025".len());
/// ```
pub trait Clock: Send + Sync {
    /// Get the current time
    fn now(&self) -> DateTime<Utc>;

    /// Today's date as written on a ticket (`DD-MM-YYYY`)
    fn booking_date(&self) -> String {
        self.now().format(BOOKING_DATE_FORMAT).to_string()
    }
}

/// Production clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    struct Pinned(DateTime<Utc>);

    impl Clock for Pinned {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    #[test]
    fn test_booking_date_format() {
        let Some(time) = Utc.with_ymd_and_hms(2025, 3, 7, 18, 30, 0).single() else {
            return;
        };
        assert_eq!(Pinned(time).booking_date(), "07-03-2025");
    }
}
