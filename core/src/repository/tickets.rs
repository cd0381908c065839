//! Ticket repository: booking and sales queries.

use super::{EventRepository, Repository};
use crate::error::{Result, StoreError};
use crate::gateway::{LoadReport, RecordStore};
use crate::ledger;
use crate::metrics;
use crate::types::{EventId, Ticket, TicketId};
use std::sync::Arc;
use tracing::{info, warn};

/// A request to book seats.
///
/// The owner is not checked against the user collection here; callers that
/// hold one (see `BoxOffice::book`) resolve the email before booking.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Booking<'a> {
    /// Username of the customer
    pub owner_username: &'a str,
    /// Email recorded on the ticket
    pub owner_email: &'a str,
    /// Event to book
    pub event_id: EventId,
    /// Seats to book, at least one
    pub quantity: u32,
    /// Booking date, `DD-MM-YYYY`
    pub booking_date: &'a str,
}

/// Issued tickets, in booking order.
pub struct TicketRepository {
    inner: Repository<Ticket>,
}

impl TicketRepository {
    /// Load tickets from `store`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Persistence`] if the store cannot be read.
    pub fn open(store: Arc<dyn RecordStore<Ticket>>, max_tickets: usize) -> Result<Self> {
        Ok(Self {
            inner: Repository::open(store, max_tickets)?,
        })
    }

    /// Book seats and issue a ticket.
    ///
    /// Every check runs before anything changes, so a rejected booking leaves
    /// both collections untouched. On success the event loses `quantity`
    /// seats, the ticket is appended, and both collections are saved (events
    /// first).
    ///
    /// # Errors
    ///
    /// - [`StoreError::CapacityExceeded`] when the ticket limit is reached
    /// - [`StoreError::UnknownEvent`] when no event has the requested ID
    /// - [`StoreError::InvalidQuantity`] for a zero quantity
    /// - [`StoreError::InsufficientSeats`] when too few seats remain
    /// - [`StoreError::Persistence`] if either save fails; the booking stands
    ///   and the first failure is returned
    pub fn book(&mut self, events: &mut EventRepository, booking: Booking<'_>) -> Result<Ticket> {
        let ticket = match self.issue(events, booking) {
            Ok(ticket) => ticket,
            Err(error) => {
                metrics::record_booking_rejected();
                warn!(
                    username = booking.owner_username,
                    event_id = %booking.event_id,
                    quantity = booking.quantity,
                    %error,
                    "Booking rejected"
                );
                return Err(error);
            },
        };

        metrics::record_booking(ticket.quantity);
        info!(
            ticket_id = %ticket.id,
            username = %ticket.owner_username,
            event_id = %ticket.event_id,
            quantity = ticket.quantity,
            total_cost = ticket.total_cost,
            "Ticket booked"
        );

        let events_saved = events.flush();
        let tickets_saved = self.inner.flush();
        events_saved.and(tickets_saved)?;
        Ok(ticket)
    }

    fn issue(&mut self, events: &mut EventRepository, booking: Booking<'_>) -> Result<Ticket> {
        self.inner.ensure_room()?;
        let event = events
            .find(booking.event_id)
            .ok_or(StoreError::UnknownEvent(booking.event_id))?;
        ledger::check_booking(event, booking.quantity)?;

        let id = ledger::next_ticket_id(self.inner.iter().map(|ticket| ticket.id))?;
        let total_cost = ledger::total_cost(event.price, booking.quantity);

        let event = events
            .find_mut(booking.event_id)
            .ok_or(StoreError::UnknownEvent(booking.event_id))?;
        ledger::take_seats(event, booking.quantity)?;

        let ticket = Ticket {
            id,
            owner_username: booking.owner_username.to_string(),
            owner_email: booking.owner_email.to_string(),
            event_id: booking.event_id,
            quantity: booking.quantity,
            total_cost,
            booking_date: booking.booking_date.to_string(),
        };
        self.inner.push(ticket.clone());
        Ok(ticket)
    }

    /// Ticket with the given ID
    #[must_use]
    pub fn find_by_id(&self, id: TicketId) -> Option<&Ticket> {
        self.inner.iter().find(|ticket| ticket.id == id)
    }

    /// Tickets booked by `username`, in booking order.
    pub fn list_by_owner<'a>(&'a self, username: &'a str) -> impl Iterator<Item = &'a Ticket> + 'a {
        self.inner
            .iter()
            .filter(move |ticket| ticket.owner_username == username)
    }

    /// All tickets in booking order
    #[must_use]
    pub fn list(&self) -> &[Ticket] {
        self.inner.list()
    }

    /// Number of tickets
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether no ticket has been issued
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Sum of `total_cost` over every ticket
    #[must_use]
    pub fn total_revenue(&self) -> f64 {
        self.inner
            .iter()
            .fold(0.0, |total, ticket| total + ticket.total_cost)
    }

    /// Number of tickets issued
    #[must_use]
    pub fn total_bookings(&self) -> usize {
        self.inner.len()
    }

    /// Tickets referencing `event_id`
    #[must_use]
    pub fn bookings_for_event(&self, event_id: EventId) -> usize {
        self.for_event(event_id).count()
    }

    /// Sum of `total_cost` over tickets referencing `event_id`
    #[must_use]
    pub fn revenue_for_event(&self, event_id: EventId) -> f64 {
        self.for_event(event_id)
            .fold(0.0, |total, ticket| total + ticket.total_cost)
    }

    /// Seats sold on tickets referencing `event_id`
    #[must_use]
    pub fn tickets_sold_for_event(&self, event_id: EventId) -> u64 {
        self.for_event(event_id)
            .map(|ticket| u64::from(ticket.quantity))
            .sum()
    }

    /// Highest event ID referenced by any ticket
    #[must_use]
    pub fn max_event_ref(&self) -> Option<EventId> {
        self.inner.iter().map(|ticket| ticket.event_id).max()
    }

    /// Retry saving the current tickets.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Persistence`] if the save fails again.
    pub fn flush(&self) -> Result<()> {
        self.inner.flush()
    }

    /// What happened when tickets were loaded
    #[must_use]
    pub const fn load_report(&self) -> LoadReport {
        self.inner.load_report()
    }

    fn for_event(&self, event_id: EventId) -> impl Iterator<Item = &Ticket> {
        self.inner
            .iter()
            .filter(move |ticket| ticket.event_id == event_id)
    }
}
