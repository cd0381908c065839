//! Store metrics.
//!
//! Counters are recorded through the `metrics` facade; nothing is exported
//! unless the host process installs a recorder.
//!
//! # Exported Metrics
//!
//! ## Counters
//! - `boxoffice_store_saves_total{collection,outcome}` - Full-collection saves
//! - `boxoffice_store_skipped_lines_total{collection}` - Lines dropped on load
//! - `boxoffice_bookings_total{outcome}` - Booking attempts
//! - `boxoffice_tickets_sold_total` - Seats sold

use crate::types::Collection;
use metrics::describe_counter;

/// Register metric descriptions. Call once at startup.
pub fn register_store_metrics() {
    describe_counter!(
        "boxoffice_store_saves_total",
        "Full-collection saves by collection and outcome (ok, failed)"
    );
    describe_counter!(
        "boxoffice_store_skipped_lines_total",
        "Persisted lines skipped on load because they were malformed or duplicated"
    );
    describe_counter!(
        "boxoffice_bookings_total",
        "Booking attempts by outcome (booked, rejected)"
    );
    describe_counter!("boxoffice_tickets_sold_total", "Seats sold through bookings");
}

/// Record one save of a collection.
pub fn record_save(collection: Collection, succeeded: bool) {
    let outcome = if succeeded { "ok" } else { "failed" };
    metrics::counter!(
        "boxoffice_store_saves_total",
        "collection" => collection.as_str(),
        "outcome" => outcome
    )
    .increment(1);
}

/// Record lines skipped while loading a collection.
pub fn record_skipped(collection: Collection, skipped: usize) {
    if skipped > 0 {
        metrics::counter!(
            "boxoffice_store_skipped_lines_total",
            "collection" => collection.as_str()
        )
        .increment(skipped as u64);
    }
}

/// Record a successful booking.
pub fn record_booking(quantity: u32) {
    metrics::counter!("boxoffice_bookings_total", "outcome" => "booked").increment(1);
    metrics::counter!("boxoffice_tickets_sold_total").increment(u64::from(quantity));
}

/// Record a rejected booking.
pub fn record_booking_rejected() {
    metrics::counter!("boxoffice_bookings_total", "outcome" => "rejected").increment(1);
}
