//! Event repository.

use super::Repository;
use crate::error::{Result, StoreError};
use crate::gateway::{LoadReport, RecordStore};
use crate::ledger;
use crate::types::{Event, EventDraft, EventId, EventUpdate};
use std::sync::Arc;
use tracing::debug;

/// Events in the order they were added.
///
/// Administrative operations address events by position (as listed); tickets
/// address them by [`EventId`]. IDs come from a counter that only moves
/// forward, so deleting an event never hands its ID to a later one within a
/// session.
pub struct EventRepository {
    inner: Repository<Event>,
    /// `None` once the ID space is used up
    next_id: Option<EventId>,
}

impl EventRepository {
    /// Load events from `store`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Persistence`] if the store cannot be read.
    pub fn open(store: Arc<dyn RecordStore<Event>>, max_events: usize) -> Result<Self> {
        let inner = Repository::open(store, max_events)?;
        let next_id = inner
            .iter()
            .map(|event| event.id)
            .max()
            .map_or(Some(EventId::FIRST), EventId::next);
        Ok(Self { inner, next_id })
    }

    /// Keep IDs up to and including `id` out of future assignment.
    ///
    /// Used at startup with the highest event ID referenced by a ticket, so
    /// an event deleted in an earlier session cannot have its ID reissued.
    pub fn reserve_ids_through(&mut self, id: EventId) {
        self.next_id = self.next_id.zip(id.next()).map(|(next, after)| next.max(after));
    }

    /// Add an event; every seat starts available.
    ///
    /// # Errors
    ///
    /// - [`StoreError::CapacityExceeded`] when the event limit is reached
    /// - [`StoreError::InvalidArgument`] for a zero capacity or negative price
    /// - [`StoreError::Persistence`] if the save fails (the event stays added)
    pub fn add(&mut self, draft: EventDraft) -> Result<Event> {
        self.inner.ensure_room()?;
        ledger::check_event_terms(draft.price, draft.capacity)?;
        let id = self
            .next_id
            .ok_or_else(|| StoreError::InvalidArgument("event ID space exhausted".to_string()))?;

        let event = Event::from_draft(id, draft);
        self.next_id = id.next();
        self.inner.push(event.clone());
        debug!(event_id = %event.id, name = %event.name, capacity = event.capacity, "Event added");
        self.inner.flush()?;
        Ok(event)
    }

    /// Overwrite every field of the event at `index`, including `available`.
    ///
    /// This is an administrative override: `available` is written as given
    /// and not reconciled with issued tickets. The event keeps its ID.
    ///
    /// # Errors
    ///
    /// - [`StoreError::IndexOutOfRange`] for an invalid index
    /// - [`StoreError::InvalidArgument`] when the new values break
    ///   `capacity > 0`, `price >= 0` or `available <= capacity`
    /// - [`StoreError::Persistence`] if the save fails (the update stays)
    pub fn update(&mut self, index: usize, update: EventUpdate) -> Result<Event> {
        let event = self.inner.get_mut(index)?;
        ledger::check_event_terms(update.price, update.capacity)?;
        ledger::check_seat_levels(update.capacity, update.available)?;

        event.name = update.name;
        event.date = update.date;
        event.venue = update.venue;
        event.category = update.category;
        event.price = update.price;
        event.capacity = update.capacity;
        event.available = update.available;

        let event = event.clone();
        debug!(event_id = %event.id, index, available = event.available, "Event updated");
        self.inner.flush()?;
        Ok(event)
    }

    /// Remove the event at `index`; later events shift down one place.
    ///
    /// Tickets booked against it keep their [`EventId`] and simply no longer
    /// resolve.
    ///
    /// # Errors
    ///
    /// - [`StoreError::IndexOutOfRange`] for an invalid index
    /// - [`StoreError::Persistence`] if the save fails (the event stays removed)
    pub fn delete(&mut self, index: usize) -> Result<Event> {
        let event = self.inner.remove(index)?;
        debug!(event_id = %event.id, index, "Event deleted");
        self.inner.flush()?;
        Ok(event)
    }

    /// Event with the given ID
    #[must_use]
    pub fn find(&self, id: EventId) -> Option<&Event> {
        self.inner.iter().find(|event| event.id == id)
    }

    /// Current position of the event with the given ID
    #[must_use]
    pub fn position_of(&self, id: EventId) -> Option<usize> {
        self.inner.iter().position(|event| event.id == id)
    }

    /// Events whose name contains `text` (case-sensitive), in order.
    pub fn search_by_name<'a>(&'a self, text: &'a str) -> impl Iterator<Item = &'a Event> + 'a {
        self.inner.iter().filter(move |event| event.name.contains(text))
    }

    /// Events whose category contains `text` (case-sensitive), in order.
    pub fn search_by_category<'a>(
        &'a self,
        text: &'a str,
    ) -> impl Iterator<Item = &'a Event> + 'a {
        self.inner
            .iter()
            .filter(move |event| event.category.contains(text))
    }

    /// All events in order
    #[must_use]
    pub fn list(&self) -> &[Event] {
        self.inner.list()
    }

    /// Event at `index`
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Event> {
        self.inner.get(index)
    }

    /// Number of events
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether no event is stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Retry saving the current events.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Persistence`] if the save fails again.
    pub fn flush(&self) -> Result<()> {
        self.inner.flush()
    }

    /// What happened when events were loaded
    #[must_use]
    pub const fn load_report(&self) -> LoadReport {
        self.inner.load_report()
    }

    pub(crate) fn find_mut(&mut self, id: EventId) -> Option<&mut Event> {
        self.inner.find_mut(|event| event.id == id)
    }
}
