//! Proptest strategies for the record types
//!
//! Free-text generators deliberately mix in the delimiter, the escape
//! character and line breaks so codec properties exercise escaping.

use boxoffice_core::{Event, EventId, Ticket, TicketId, User};
use proptest::prelude::*;

/// Free text weighted toward letters, with `,` `\` `\n` `\r` and spaces mixed in
pub fn arb_text() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            6 => prop::char::range('a', 'z'),
            2 => prop::char::range('A', 'Z'),
            1 => Just(' '),
            1 => Just(','),
            1 => Just('\\'),
            1 => Just('\n'),
            1 => Just('\r'),
        ],
        0..24,
    )
    .prop_map(|chars| chars.into_iter().collect())
}

/// Prices: zero, whole amounts, and amounts with cents
pub fn arb_price() -> impl Strategy<Value = f64> {
    prop_oneof![
        1 => Just(0.0),
        2 => (1u32..500).prop_map(f64::from),
        3 => (0u32..100_000).prop_map(|cents| f64::from(cents) / 100.0),
    ]
}

/// Any user, including ones whose fields need escaping
pub fn arb_user() -> impl Strategy<Value = User> {
    (arb_text(), arb_text(), arb_text())
        .prop_map(|(username, password, email)| User::new(username, password, email))
}

/// Any event with `available <= capacity`
pub fn arb_event() -> impl Strategy<Value = Event> {
    (
        any::<u32>(),
        (arb_text(), arb_text(), arb_text(), arb_text()),
        arb_price(),
        1u32..10_000,
    )
        .prop_flat_map(|(id, (name, date, venue, category), price, capacity)| {
            (0..=capacity).prop_map(move |available| Event {
                id: EventId::new(id),
                name: name.clone(),
                date: date.clone(),
                venue: venue.clone(),
                category: category.clone(),
                price,
                capacity,
                available,
            })
        })
}

/// Any ticket
pub fn arb_ticket() -> impl Strategy<Value = Ticket> {
    (
        1001u32..100_000,
        (arb_text(), arb_text()),
        any::<u32>(),
        1u32..50,
        arb_price(),
        arb_text(),
    )
        .prop_map(
            |(id, (owner_username, owner_email), event_id, quantity, price, booking_date)| Ticket {
                id: TicketId::new(id),
                owner_username,
                owner_email,
                event_id: EventId::new(event_id),
                quantity,
                total_cost: price * f64::from(quantity),
                booking_date,
            },
        )
}
