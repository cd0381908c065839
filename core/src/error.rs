//! Error types for store operations.

use crate::types::{Collection, EventId, TicketId};
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Broad failure categories, for callers that only need to know what kind of
/// thing went wrong.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A username, event or ticket lookup missed
    NotFound,
    /// The username is already taken
    Duplicate,
    /// A collection reached its configured maximum
    CapacityExceeded,
    /// An argument failed validation
    InvalidArgument,
    /// A booking asked for more seats than remain
    InsufficientSeats,
    /// Reading or writing the backing store failed
    PersistenceFailure,
}

/// Errors returned by repository and box office operations.
///
/// All of them are recoverable: the store never terminates the process.
#[derive(Debug, Error)]
pub enum StoreError {
    // ═══════════════════════════════════════════════════════════
    // Lookups
    // ═══════════════════════════════════════════════════════════

    /// No user with this username.
    #[error("User not found: {0}")]
    UserNotFound(String),

    /// No event with this identifier.
    #[error("Event not found: {0}")]
    UnknownEvent(EventId),

    /// No ticket with this identifier.
    #[error("Ticket not found: {0}")]
    TicketNotFound(TicketId),

    // ═══════════════════════════════════════════════════════════
    // Validation
    // ═══════════════════════════════════════════════════════════

    /// The username is already registered.
    #[error("Username already exists: {0}")]
    UsernameTaken(String),

    /// The collection holds its configured maximum number of records.
    #[error("{collection} limit reached ({max} records)")]
    CapacityExceeded {
        /// Collection that is full
        collection: Collection,
        /// Configured maximum
        max: usize,
    },

    /// A field value was rejected.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Bookings need at least one seat.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(u32),

    /// A positional index does not address a record.
    #[error("Index {index} out of range for {len} records")]
    IndexOutOfRange {
        /// Index that was requested
        index: usize,
        /// Number of records in the collection
        len: usize,
    },

    // ═══════════════════════════════════════════════════════════
    // Inventory
    // ═══════════════════════════════════════════════════════════

    /// The event does not have enough seats left.
    #[error("Not enough seats available! Requested: {requested}, available: {available}")]
    InsufficientSeats {
        /// Seats asked for
        requested: u32,
        /// Seats left on the event
        available: u32,
    },

    // ═══════════════════════════════════════════════════════════
    // Persistence
    // ═══════════════════════════════════════════════════════════

    /// The backing store could not be read or written.
    ///
    /// When returned from a mutating call, the in-memory change has already
    /// been applied and is kept.
    #[error("Persistence failure: {0}")]
    Persistence(#[from] PersistenceError),
}

impl StoreError {
    /// The category of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::UserNotFound(_) | Self::UnknownEvent(_) | Self::TicketNotFound(_) => {
                ErrorKind::NotFound
            },
            Self::UsernameTaken(_) => ErrorKind::Duplicate,
            Self::CapacityExceeded { .. } => ErrorKind::CapacityExceeded,
            Self::InvalidArgument(_) | Self::InvalidQuantity(_) | Self::IndexOutOfRange { .. } => {
                ErrorKind::InvalidArgument
            },
            Self::InsufficientSeats { .. } => ErrorKind::InsufficientSeats,
            Self::Persistence(_) => ErrorKind::PersistenceFailure,
        }
    }
}

/// Errors raised by a [`RecordStore`](crate::gateway::RecordStore).
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Filesystem I/O failed.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        /// File being read or written
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Any other backend failure.
    #[error("Backend error: {0}")]
    Backend(String),
}
