//! # Box Office Core
//!
//! Record store for a small ticketing desk: users, events and tickets, kept in
//! memory and written through to a backing store after every change.
//!
//! ## Building Blocks
//!
//! - **Codec** ([`codec`]): one record per line, fields separated by `,` with
//!   backslash escaping
//! - **Repositories** ([`repository`]): ordered collections with add, update,
//!   delete and search, bounded by a configured maximum
//! - **Inventory Ledger** ([`ledger`]): seat accounting for bookings
//! - **Persistence Gateway** ([`gateway`]): the [`RecordStore`] seam that
//!   loads a collection once and saves it whole after each mutation
//! - **Reports** ([`report`]): revenue and bookings, overall and per event
//! - **Box Office** ([`office`]): the explicit context owning all three
//!   collections
//!
//! ## Example
//!
//! ```no_run
//! use boxoffice_core::{AdminCredentials, BoxOffice, BoxOfficeStores, EventDraft, Limits, SystemClock};
//! use std::sync::Arc;
//!
//! # fn example(stores: BoxOfficeStores) -> boxoffice_core::Result<()> {
//! let mut office = BoxOffice::open(
//!     stores,
//!     &Limits::default(),
//!     AdminCredentials::default(),
//!     Arc::new(SystemClock),
//! )?;
//! let event = office.events_mut().add(EventDraft {
//!     name: "Summer Concert".to_string(),
//!     date: "15-07-2025".to_string(),
//!     venue: "City Park".to_string(),
//!     category: "Music".to_string(),
//!     price: 20.0,
//!     capacity: 50,
//! })?;
//! office.users_mut().signup("alice", "pw123", "a@b.com")?;
//! let ticket = office.book("alice", event.id, 2)?;
//! println!("{ticket:?}");
//! println!("{}", office.sales_report());
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod environment;
pub mod error;
pub mod gateway;
pub mod ledger;
pub mod metrics;
pub mod office;
pub mod report;
pub mod repository;
pub mod types;

pub use environment::{Clock, SystemClock};
pub use error::{ErrorKind, PersistenceError, Result, StoreError};
pub use gateway::{LoadReport, Loaded, RecordStore};
pub use office::{AdminCredentials, BoxOffice, BoxOfficeStores, Limits, Registration, Session};
pub use report::{EventSales, SalesReport};
pub use repository::{Booking, EventRepository, TicketRepository, UserRepository};
pub use types::{Collection, Event, EventDraft, EventId, EventUpdate, Ticket, TicketId, User};
