//! Sales report across all events.
//!
//! Built in one pass over the tickets. Per-event rows follow event order;
//! tickets whose event has been deleted are totalled separately as orphaned.

use crate::repository::{EventRepository, TicketRepository};
use crate::types::EventId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Sales figures for one stored event.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EventSales {
    /// Event ID
    pub event_id: EventId,
    /// Event name
    pub name: String,
    /// Tickets issued for the event
    pub bookings: usize,
    /// Seats sold across those tickets
    pub tickets_sold: u64,
    /// Revenue from those tickets
    pub revenue: f64,
}

/// Store-wide sales summary.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SalesReport {
    /// Sum of every ticket's cost
    pub total_revenue: f64,
    /// Number of tickets issued
    pub total_bookings: usize,
    /// Number of stored events
    pub total_events: usize,
    /// One row per stored event, in event order
    pub events: Vec<EventSales>,
    /// Tickets whose event no longer exists
    pub orphaned_bookings: usize,
    /// Revenue from orphaned tickets
    pub orphaned_revenue: f64,
}

#[derive(Default)]
struct Tally {
    bookings: usize,
    tickets_sold: u64,
    revenue: f64,
}

impl SalesReport {
    /// Build the report from the current collections.
    #[must_use]
    pub fn build(events: &EventRepository, tickets: &TicketRepository) -> Self {
        let mut tallies: HashMap<EventId, Tally> = HashMap::new();
        for ticket in tickets.list() {
            let tally = tallies.entry(ticket.event_id).or_default();
            tally.bookings += 1;
            tally.tickets_sold += u64::from(ticket.quantity);
            tally.revenue += ticket.total_cost;
        }

        let rows: Vec<EventSales> = events
            .list()
            .iter()
            .map(|event| {
                let tally = tallies.remove(&event.id).unwrap_or_default();
                EventSales {
                    event_id: event.id,
                    name: event.name.clone(),
                    bookings: tally.bookings,
                    tickets_sold: tally.tickets_sold,
                    revenue: tally.revenue,
                }
            })
            .collect();

        Self {
            total_revenue: tickets.total_revenue(),
            total_bookings: tickets.total_bookings(),
            total_events: events.len(),
            events: rows,
            orphaned_bookings: tallies.values().map(|tally| tally.bookings).sum(),
            orphaned_revenue: tallies
                .values()
                .fold(0.0, |total, tally| total + tally.revenue),
        }
    }

    /// Row for `event_id`, if the event is stored
    #[must_use]
    pub fn event(&self, event_id: EventId) -> Option<&EventSales> {
        self.events.iter().find(|row| row.event_id == event_id)
    }
}

impl fmt::Display for SalesReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total revenue:  ${:.2}", self.total_revenue)?;
        writeln!(f, "Total bookings: {}", self.total_bookings)?;
        writeln!(f, "Total events:   {}", self.total_events)?;
        for row in &self.events {
            writeln!(
                f,
                "  [{}] {}: {} bookings, {} seats, ${:.2}",
                row.event_id, row.name, row.bookings, row.tickets_sold, row.revenue
            )?;
        }
        if self.orphaned_bookings > 0 {
            writeln!(
                f,
                "  (deleted events): {} bookings, ${:.2}",
                self.orphaned_bookings, self.orphaned_revenue
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::repository::test_support::MemoryStore;

    fn repos(events: &str, tickets: &str) -> (EventRepository, TicketRepository) {
        (
            EventRepository::open(MemoryStore::with_text(events), 10).unwrap(),
            TicketRepository::open(MemoryStore::with_text(tickets), 10).unwrap(),
        )
    }

    #[test]
    fn test_empty_report() {
        let (events, tickets) = repos("", "");
        let report = SalesReport::build(&events, &tickets);
        assert_eq!(report, SalesReport::default());
        assert!(!report.total_revenue.is_sign_negative());
        assert!(!report.orphaned_revenue.is_sign_negative());
        assert!(report.to_string().starts_with("Total revenue:  $0.00\n"));
    }

    #[test]
    fn test_rows_follow_event_order_and_orphans_are_separate() {
        let (events, tickets) = repos(
            "3,Gala,01-05-2025,Hall,Other,50,100,97\n1,Derby,02-05-2025,Track,Sports,10,20,20\n",
            "1001,alice,a@b.com,3,2,100,01-01-2025\n\
             1002,bob,b@c.org,0,1,15,01-01-2025\n\
             1003,alice,a@b.com,3,1,50,01-01-2025\n",
        );
        let report = SalesReport::build(&events, &tickets);

        assert_eq!(report.total_bookings, 3);
        assert!((report.total_revenue - 165.0).abs() < 1e-9);
        assert_eq!(report.total_events, 2);

        let gala = report.event(EventId::new(3)).unwrap();
        assert_eq!((gala.bookings, gala.tickets_sold), (2, 3));
        assert!((gala.revenue - 150.0).abs() < 1e-9);
        assert_eq!(report.events[1].bookings, 0);

        assert_eq!(report.orphaned_bookings, 1);
        assert!((report.orphaned_revenue - 15.0).abs() < 1e-9);
        assert!(report.to_string().contains("(deleted events): 1 bookings, $15.00"));
    }
}
