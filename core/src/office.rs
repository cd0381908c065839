//! The box office: all three repositories behind one explicit context.
//!
//! `BoxOffice` owns the user, event and ticket repositories and implements
//! the operations that span more than one of them (booking on behalf of a
//! user, login, registration views, reports). It is built once by the entry
//! point and passed by reference; there is no global state.

use crate::environment::Clock;
use crate::error::{Result, StoreError};
use crate::gateway::{LoadReport, RecordStore};
use crate::report::SalesReport;
use crate::repository::{Booking, EventRepository, TicketRepository, UserRepository};
use crate::types::{Event, EventId, Ticket, TicketId, User};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

/// Backing stores for the three collections.
pub struct BoxOfficeStores {
    /// User store
    pub users: Arc<dyn RecordStore<User>>,
    /// Event store
    pub events: Arc<dyn RecordStore<Event>>,
    /// Ticket store
    pub tickets: Arc<dyn RecordStore<Ticket>>,
}

/// Maximum number of records per collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limits {
    /// Maximum users
    pub max_users: usize,
    /// Maximum events
    pub max_events: usize,
    /// Maximum tickets
    pub max_tickets: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_users: 100,
            max_events: 100,
            max_tickets: 500,
        }
    }
}

/// Administrator login.
///
/// Compared in clear text. The password is redacted from `Debug` output and
/// left out when serializing.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminCredentials {
    /// Admin username
    pub username: String,
    /// Admin password
    #[serde(skip_serializing)]
    pub password: String,
}

impl AdminCredentials {
    /// Create credentials
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Whether the given login matches
    #[must_use]
    pub fn matches(&self, username: &str, password: &str) -> bool {
        self.username == username && self.password == password
    }
}

impl Default for AdminCredentials {
    fn default() -> Self {
        Self::new("admin", "admin123")
    }
}

impl fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Role granted by a successful login.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Session {
    /// Full administrative access
    Admin,
    /// A registered customer
    Customer(String),
}

impl Session {
    /// Whether this session has administrative access
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Username for a customer session
    #[must_use]
    pub fn username(&self) -> Option<&str> {
        match self {
            Self::Admin => None,
            Self::Customer(username) => Some(username.as_str()),
        }
    }
}

/// A ticket with the name of its event, if the event still exists.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Registration<'a> {
    /// The ticket
    pub ticket: &'a Ticket,
    /// Name of the booked event; `None` once the event is deleted
    pub event_name: Option<&'a str>,
}

/// The store: users, events and tickets with the clock and admin login.
pub struct BoxOffice {
    users: UserRepository,
    events: EventRepository,
    tickets: TicketRepository,
    admin: AdminCredentials,
    clock: Arc<dyn Clock>,
}

impl BoxOffice {
    /// Load all three collections.
    ///
    /// Event IDs referenced by stored tickets are reserved so a new event
    /// never takes the ID of a deleted one that tickets still point to.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Persistence`] if any store cannot be read.
    pub fn open(
        stores: BoxOfficeStores,
        limits: &Limits,
        admin: AdminCredentials,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let users = UserRepository::open(stores.users, limits.max_users)?;
        let mut events = EventRepository::open(stores.events, limits.max_events)?;
        let tickets = TicketRepository::open(stores.tickets, limits.max_tickets)?;

        if let Some(highest) = tickets.max_event_ref() {
            events.reserve_ids_through(highest);
        }
        let orphaned = tickets
            .list()
            .iter()
            .filter(|ticket| events.find(ticket.event_id).is_none())
            .count();
        if orphaned > 0 {
            warn!(orphaned, "Tickets reference events that are no longer stored");
        }

        info!(
            users = users.len(),
            events = events.len(),
            tickets = tickets.len(),
            "Box office opened"
        );

        Ok(Self {
            users,
            events,
            tickets,
            admin,
            clock,
        })
    }

    /// Users
    #[must_use]
    pub const fn users(&self) -> &UserRepository {
        &self.users
    }

    /// Users, for administrative changes
    pub const fn users_mut(&mut self) -> &mut UserRepository {
        &mut self.users
    }

    /// Events
    #[must_use]
    pub const fn events(&self) -> &EventRepository {
        &self.events
    }

    /// Events, for administrative changes
    pub const fn events_mut(&mut self) -> &mut EventRepository {
        &mut self.events
    }

    /// Tickets. Tickets are only created through [`book`](Self::book).
    #[must_use]
    pub const fn tickets(&self) -> &TicketRepository {
        &self.tickets
    }

    /// Log in as the administrator or a registered user.
    ///
    /// The admin credentials are checked first.
    #[must_use]
    pub fn login(&self, username: &str, password: &str) -> Option<Session> {
        if self.admin.matches(username, password) {
            info!(username, "Admin logged in");
            return Some(Session::Admin);
        }
        match self.users.authenticate(username, password) {
            Some(user) => {
                info!(username, "User logged in");
                Some(Session::Customer(user.username.clone()))
            },
            None => {
                warn!(username, "Login failed");
                None
            },
        }
    }

    /// Book seats for a registered user, dated by the clock.
    ///
    /// # Errors
    ///
    /// - [`StoreError::UserNotFound`] for an unknown username
    /// - everything [`TicketRepository::book`] returns
    pub fn book(&mut self, username: &str, event_id: EventId, quantity: u32) -> Result<Ticket> {
        let email = self
            .users
            .email_of(username)
            .ok_or_else(|| StoreError::UserNotFound(username.to_string()))?;
        let booking_date = self.clock.booking_date();

        self.tickets.book(
            &mut self.events,
            Booking {
                owner_username: username,
                owner_email: email,
                event_id,
                quantity,
                booking_date: &booking_date,
            },
        )
    }

    /// A ticket with its event name.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TicketNotFound`] for an unknown ID.
    pub fn ticket(&self, id: TicketId) -> Result<Registration<'_>> {
        let ticket = self
            .tickets
            .find_by_id(id)
            .ok_or(StoreError::TicketNotFound(id))?;
        Ok(self.registration(ticket))
    }

    /// Every ticket with its event name, in booking order.
    pub fn registrations(&self) -> impl Iterator<Item = Registration<'_>> {
        self.tickets
            .list()
            .iter()
            .map(move |ticket| self.registration(ticket))
    }

    /// Tickets of one user with their event names, in booking order.
    pub fn tickets_of<'a>(&'a self, username: &'a str) -> impl Iterator<Item = Registration<'a>> {
        self.tickets
            .list_by_owner(username)
            .map(move |ticket| self.registration(ticket))
    }

    /// Sales across all events
    #[must_use]
    pub fn sales_report(&self) -> SalesReport {
        SalesReport::build(&self.events, &self.tickets)
    }

    /// Load outcome of each collection (users, events, tickets)
    #[must_use]
    pub const fn load_reports(&self) -> [LoadReport; 3] {
        [
            self.users.load_report(),
            self.events.load_report(),
            self.tickets.load_report(),
        ]
    }

    /// Save every collection, attempting all three.
    ///
    /// # Errors
    ///
    /// Returns the first [`StoreError::Persistence`] encountered.
    pub fn flush_all(&self) -> Result<()> {
        let users = self.users.flush();
        let events = self.events.flush();
        let tickets = self.tickets.flush();
        users.and(events).and(tickets)
    }

    fn registration<'a>(&'a self, ticket: &'a Ticket) -> Registration<'a> {
        Registration {
            ticket,
            event_name: self
                .events
                .find(ticket.event_id)
                .map(|event| event.name.as_str()),
        }
    }
}

impl fmt::Debug for BoxOffice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoxOffice")
            .field("users", &self.users.len())
            .field("events", &self.events.len())
            .field("tickets", &self.tickets.len())
            .field("admin", &self.admin)
            .finish_non_exhaustive()
    }
}
