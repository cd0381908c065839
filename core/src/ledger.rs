//! Inventory ledger: the seat-accounting rules.
//!
//! ```text
//! booking:      available >= quantity > 0, then available -= quantity
//! admin update: 0 <= available <= capacity, capacity > 0, price >= 0
//! ```
//!
//! `available` is the only seat counter. It is decremented incrementally by
//! bookings and overwritten directly by administrative updates; it is never
//! recomputed from ticket history.

use crate::error::{Result, StoreError};
use crate::types::{Event, TicketId};

/// Checks that `quantity` seats can be booked on `event`.
///
/// # Errors
///
/// - [`StoreError::InvalidQuantity`] when `quantity` is zero
/// - [`StoreError::InsufficientSeats`] when fewer than `quantity` seats remain
pub fn check_booking(event: &Event, quantity: u32) -> Result<()> {
    if quantity == 0 {
        return Err(StoreError::InvalidQuantity(quantity));
    }
    if event.available < quantity {
        return Err(StoreError::InsufficientSeats {
            requested: quantity,
            available: event.available,
        });
    }
    Ok(())
}

/// Takes `quantity` seats from `event`, returning the seats left.
///
/// # Errors
///
/// Same as [`check_booking`]; `event` is unchanged on error.
pub fn take_seats(event: &mut Event, quantity: u32) -> Result<u32> {
    check_booking(event, quantity)?;
    event.available -= quantity;
    Ok(event.available)
}

/// The ID for the next ticket: one above the highest issued, and never below
/// `TicketId::BASE + 1`.
///
/// # Errors
///
/// Returns [`StoreError::InvalidArgument`] if the ID space is exhausted.
pub fn next_ticket_id(issued: impl IntoIterator<Item = TicketId>) -> Result<TicketId> {
    let highest = issued.into_iter().fold(TicketId::BASE, Ord::max);
    highest
        .value()
        .checked_add(1)
        .map(TicketId::new)
        .ok_or_else(|| StoreError::InvalidArgument("ticket ID space exhausted".to_string()))
}

/// Cost of `quantity` seats at `price`.
#[must_use]
pub fn total_cost(price: f64, quantity: u32) -> f64 {
    price * f64::from(quantity)
}

/// Validates the price and capacity of a new or updated event.
///
/// # Errors
///
/// Returns [`StoreError::InvalidArgument`] for a zero capacity or a negative
/// or non-finite price.
pub fn check_event_terms(price: f64, capacity: u32) -> Result<()> {
    if capacity == 0 {
        return Err(StoreError::InvalidArgument(
            "capacity must be greater than zero".to_string(),
        ));
    }
    if !price.is_finite() || price < 0.0 {
        return Err(StoreError::InvalidArgument(format!(
            "price must be a non-negative amount, got {price}"
        )));
    }
    Ok(())
}

/// Validates seat levels written by an administrative update.
///
/// No cross-check against issued tickets is made: the administrator may set
/// any `available` within `0..=capacity`.
///
/// # Errors
///
/// Returns [`StoreError::InvalidArgument`] when `available > capacity`.
pub fn check_seat_levels(capacity: u32, available: u32) -> Result<()> {
    if available > capacity {
        return Err(StoreError::InvalidArgument(format!(
            "available seats ({available}) exceed capacity ({capacity})"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::EventId;
    use proptest::prelude::*;

    fn event_with(capacity: u32, available: u32) -> Event {
        Event {
            id: EventId::new(0),
            name: "Tech Summit".to_string(),
            date: "20-09-2025".to_string(),
            venue: "Expo Centre".to_string(),
            category: "Conference".to_string(),
            price: 12.5,
            capacity,
            available,
        }
    }

    #[test]
    fn test_take_seats() {
        let mut event = event_with(50, 50);
        assert_eq!(take_seats(&mut event, 10).unwrap(), 40);
        assert_eq!(event.available, 40);
    }

    #[test]
    fn test_overbooking_leaves_event_unchanged() {
        let mut event = event_with(50, 40);
        let error = take_seats(&mut event, 41).unwrap_err();
        assert!(matches!(
            error,
            StoreError::InsufficientSeats {
                requested: 41,
                available: 40
            }
        ));
        assert_eq!(event.available, 40);
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let mut event = event_with(5, 5);
        assert!(matches!(
            take_seats(&mut event, 0),
            Err(StoreError::InvalidQuantity(0))
        ));
    }

    #[test]
    fn test_last_seat() {
        let mut event = event_with(1, 1);
        assert_eq!(take_seats(&mut event, 1).unwrap(), 0);
        assert!(event.is_sold_out());
        assert!(take_seats(&mut event, 1).is_err());
    }

    #[test]
    fn test_next_ticket_id() {
        assert_eq!(next_ticket_id(std::iter::empty()).unwrap(), TicketId::new(1001));
        assert_eq!(
            next_ticket_id([TicketId::new(1001), TicketId::new(1007), TicketId::new(1003)]).unwrap(),
            TicketId::new(1008)
        );
        assert_eq!(next_ticket_id([TicketId::new(12)]).unwrap(), TicketId::new(1001));
        assert!(next_ticket_id([TicketId::new(u32::MAX)]).is_err());
    }

    #[test]
    fn test_event_terms() {
        assert!(check_event_terms(0.0, 1).is_ok());
        assert!(check_event_terms(10.0, 0).is_err());
        assert!(check_event_terms(-1.0, 10).is_err());
        assert!(check_event_terms(f64::NAN, 10).is_err());
        assert!(check_seat_levels(100, 40).is_ok());
        assert!(check_seat_levels(100, 101).is_err());
    }

    proptest! {
        #[test]
        fn prop_available_tracks_booked_quantities(
            capacity in 1u32..500,
            requests in prop::collection::vec(0u32..60, 0..40)
        ) {
            let mut event = event_with(capacity, capacity);
            let mut booked = 0u32;
            for quantity in requests {
                let before = event.available;
                match take_seats(&mut event, quantity) {
                    Ok(left) => {
                        booked += quantity;
                        prop_assert_eq!(left, event.available);
                    }
                    Err(_) => prop_assert_eq!(event.available, before),
                }
                prop_assert_eq!(event.available, capacity - booked);
            }
        }
    }
}
