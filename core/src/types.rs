//! Domain types for the box office store.
//!
//! Three record kinds live in the store: [`User`], [`Event`] and [`Ticket`].
//! Events carry a stable [`EventId`] that tickets use to refer back to them,
//! so removing an event never re-targets tickets booked against a different one.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Identifiers
// ============================================================================

/// Stable identifier for an event.
///
/// Assigned from a sequence counter when the event is added and never reused
/// for another event while the original is still stored. Independent of the
/// event's position in its collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EventId(u32);

impl EventId {
    /// The identifier given to the first event of an empty collection.
    pub const FIRST: Self = Self(0);

    /// Create an `EventId` from its raw value
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw value
    #[must_use]
    pub const fn value(&self) -> u32 {
        self.0
    }

    /// The identifier following this one, or `None` when the space is exhausted
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(id) => Some(Self(id)),
            None => None,
        }
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier printed on a ticket.
///
/// Ticket IDs start above [`TicketId::BASE`] and strictly increase in the
/// order tickets are issued.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TicketId(u32);

impl TicketId {
    /// Every issued ticket ID is greater than this value.
    pub const BASE: Self = Self(1000);

    /// Create a `TicketId` from its raw value
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw value
    #[must_use]
    pub const fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TKT-{}", self.0)
    }
}

// ============================================================================
// Collections
// ============================================================================

/// The three record collections held by the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Collection {
    /// Registered customers
    Users,
    /// Events open for booking
    Events,
    /// Issued tickets
    Tickets,
}

impl Collection {
    /// Lower-case name, used in logs and metric labels
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Events => "events",
            Self::Tickets => "tickets",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A record with an identity that must stay unique within its collection.
pub trait Identified {
    /// The identity type
    type Key: Eq + std::hash::Hash + fmt::Debug;

    /// The record's identity
    fn identity(&self) -> Self::Key;

    /// Why a stored record cannot be taken into the collection, if it breaks
    /// a rule decoding alone does not check.
    fn load_fault(&self) -> Option<String> {
        None
    }
}

// ============================================================================
// Records
// ============================================================================

/// A registered customer.
///
/// The password is kept in clear text, as the legacy files store it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique, case-sensitive login name
    pub username: String,
    /// Login password (clear text)
    pub password: String,
    /// Contact address, shaped `local@domain.tld`
    pub email: String,
}

impl User {
    /// Creates a new user record
    #[must_use]
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            email: email.into(),
        }
    }
}

impl Identified for User {
    type Key = String;

    fn identity(&self) -> String {
        self.username.clone()
    }
}

/// An event with a fixed number of seats.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Stable identifier
    pub id: EventId,
    /// Display name
    pub name: String,
    /// Free-form date, conventionally `DD-MM-YYYY`
    pub date: String,
    /// Venue name
    pub venue: String,
    /// Category (Music, Conference, Sports, ...)
    pub category: String,
    /// Price of one seat
    pub price: f64,
    /// Total number of seats
    pub capacity: u32,
    /// Seats not yet booked
    pub available: u32,
}

impl Event {
    /// Builds a fresh event from a draft; every seat starts available.
    #[must_use]
    pub fn from_draft(id: EventId, draft: EventDraft) -> Self {
        Self {
            id,
            name: draft.name,
            date: draft.date,
            venue: draft.venue,
            category: draft.category,
            price: draft.price,
            capacity: draft.capacity,
            available: draft.capacity,
        }
    }

    /// Whether any seat is left
    #[must_use]
    pub const fn is_sold_out(&self) -> bool {
        self.available == 0
    }
}

impl Identified for Event {
    type Key = EventId;

    fn identity(&self) -> EventId {
        self.id
    }

    fn load_fault(&self) -> Option<String> {
        if self.capacity == 0 {
            return Some("capacity is zero".to_string());
        }
        (self.available > self.capacity).then(|| {
            format!(
                "{} seats available exceeds capacity {}",
                self.available, self.capacity
            )
        })
    }
}

/// Fields supplied when adding an event.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EventDraft {
    /// Display name
    pub name: String,
    /// Free-form date
    pub date: String,
    /// Venue name
    pub venue: String,
    /// Category
    pub category: String,
    /// Price of one seat
    pub price: f64,
    /// Total number of seats
    pub capacity: u32,
}

/// Fields supplied by an administrative event update.
///
/// Every field is overwritten, including `available`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EventUpdate {
    /// Display name
    pub name: String,
    /// Free-form date
    pub date: String,
    /// Venue name
    pub venue: String,
    /// Category
    pub category: String,
    /// Price of one seat
    pub price: f64,
    /// Total number of seats
    pub capacity: u32,
    /// Seats left, written as given
    pub available: u32,
}

impl EventUpdate {
    /// Starts an update from the event's current values.
    #[must_use]
    pub fn from_event(event: &Event) -> Self {
        Self {
            name: event.name.clone(),
            date: event.date.clone(),
            venue: event.venue.clone(),
            category: event.category.clone(),
            price: event.price,
            capacity: event.capacity,
            available: event.available,
        }
    }
}

/// A booking of one or more seats for one event.
///
/// Tickets are never modified once issued. `total_cost` is frozen at the
/// event price in force when the ticket was booked.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    /// Ticket identifier
    pub id: TicketId,
    /// Username of the customer who booked
    pub owner_username: String,
    /// Email of the customer at booking time
    pub owner_email: String,
    /// Event the seats belong to
    pub event_id: EventId,
    /// Number of seats
    pub quantity: u32,
    /// `price * quantity` at booking time
    pub total_cost: f64,
    /// Booking date, `DD-MM-YYYY`
    pub booking_date: String,
}

impl Identified for Ticket {
    type Key = TicketId;

    fn identity(&self) -> TicketId {
        self.id
    }

    fn load_fault(&self) -> Option<String> {
        (self.id.value() == u32::MAX).then(|| format!("{} leaves no ID for the next ticket", self.id))
    }
}

/// Checks the `local@domain.tld` shape required of user emails.
///
/// The last `@` must not be the first character, and a `.` must follow it
/// with at least one character in between and at least one after.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    let Some(at) = email.rfind('@') else {
        return false;
    };
    let Some(dot) = email.rfind('.') else {
        return false;
    };
    at > 0 && dot > at + 1 && dot + 1 < email.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_shapes() {
        assert!(is_valid_email("a@b.com"));
        assert!(is_valid_email("first.last@mail.example.org"));
        assert!(!is_valid_email("@b.com"));
        assert!(!is_valid_email("a@.com"));
        assert!(!is_valid_email("a@b."));
        assert!(!is_valid_email("a@bcom"));
        assert!(!is_valid_email("a.b@c"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_ticket_id_display() {
        assert_eq!(TicketId::new(1001).to_string(), "TKT-1001");
    }

    #[test]
    fn test_event_id_next() {
        assert_eq!(EventId::FIRST.next(), Some(EventId::new(1)));
        assert_eq!(EventId::new(u32::MAX).next(), None);
    }

    #[test]
    fn test_event_from_draft_opens_every_seat() {
        let draft = EventDraft {
            name: "Jazz Night".to_string(),
            date: "12-06-2025".to_string(),
            venue: "Blue Hall".to_string(),
            category: "Music".to_string(),
            price: 25.0,
            capacity: 80,
        };
        let event = Event::from_draft(EventId::new(3), draft);
        assert_eq!(event.available, 80);
        assert!(!event.is_sold_out());
        assert_eq!(event.load_fault(), None);
    }

    #[test]
    fn test_event_load_faults() {
        let mut event = Event::from_draft(
            EventId::FIRST,
            EventDraft {
                name: "Expo".to_string(),
                date: "01-02-2025".to_string(),
                venue: "Hall".to_string(),
                category: "Other".to_string(),
                price: 5.0,
                capacity: 10,
            },
        );
        event.available = 99;
        assert!(event.load_fault().is_some());
        event.capacity = 0;
        event.available = 0;
        assert_eq!(event.load_fault().as_deref(), Some("capacity is zero"));
    }
}
