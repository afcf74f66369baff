//! The event catalog: an immutable, process-wide list of purchasable events.
//!
//! The catalog is seeded once at startup and never mutated, so it can be
//! shared freely across concurrent handlers without locking.

use serde::{Deserialize, Serialize};

use crate::ticket::{CartItem, Ticket};

/// A purchasable event.
///
/// `price` is in minor currency units. `available` is advisory capacity
/// only; no operation ever decrements it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub name: String,
    pub date: String,
    pub time: String,
    pub venue: String,
    pub price: u32,
    pub available: u32,
}

/// Immutable store of events, in declaration order.
#[derive(Debug, Clone)]
pub struct Catalog {
    events: Vec<Event>,
}

/// Maximum number of events returned by a free-text search.
pub const SEARCH_RESULT_LIMIT: usize = 5;

impl Catalog {
    pub fn new(events: Vec<Event>) -> Self {
        Self { events }
    }

    /// The built-in demo catalog.
    pub fn sample() -> Self {
        fn event(
            id: &str,
            name: &str,
            date: &str,
            time: &str,
            venue: &str,
            price: u32,
            available: u32,
        ) -> Event {
            Event {
                id: id.to_string(),
                name: name.to_string(),
                date: date.to_string(),
                time: time.to_string(),
                venue: venue.to_string(),
                price,
                available,
            }
        }

        Self::new(vec![
            event(
                "1",
                "🎭 Концерт рок-группы",
                "15.12.2024",
                "19:00",
                "Концертный зал",
                1500,
                50,
            ),
            event(
                "2",
                "🎬 Премьера фильма",
                "20.12.2024",
                "18:30",
                "Кинотеатр 'Звезда'",
                500,
                100,
            ),
            event(
                "3",
                "⚽ Футбольный матч",
                "25.12.2024",
                "16:00",
                "Стадион 'Арена'",
                2000,
                30,
            ),
            event(
                "4",
                "🎪 Цирковое представление",
                "28.12.2024",
                "15:00",
                "Цирк",
                1200,
                80,
            ),
            event(
                "5",
                "🎼 Симфонический оркестр",
                "30.12.2024",
                "19:30",
                "Филармония",
                1800,
                40,
            ),
            event(
                "6",
                "🎤 Стендап-шоу",
                "05.01.2025",
                "20:00",
                "Комеди-клуб",
                800,
                60,
            ),
        ])
    }

    /// All events, in declaration order.
    pub fn list(&self) -> &[Event] {
        &self.events
    }

    /// Look up an event by id.
    ///
    /// `None` is always a user-facing "event does not exist" condition,
    /// never a fatal error.
    pub fn find(&self, id: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.id == id)
    }

    /// Case-insensitive substring search over event name and venue,
    /// capped at [`SEARCH_RESULT_LIMIT`] results in first-match order.
    pub fn search(&self, query: &str) -> Vec<&Event> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }
        self.events
            .iter()
            .filter(|e| {
                e.name.to_lowercase().contains(&query) || e.venue.to_lowercase().contains(&query)
            })
            .take(SEARCH_RESULT_LIMIT)
            .collect()
    }

    /// Resolve a cart against the catalog, skipping items whose event no
    /// longer exists, and compute the total price of the resolved items.
    pub fn resolve_cart<'a>(&'a self, cart: &[CartItem]) -> (Vec<&'a Event>, u32) {
        let events: Vec<&Event> = cart
            .iter()
            .filter_map(|item| self.find(&item.event_id))
            .collect();
        let total = events.iter().map(|e| e.price).sum();
        (events, total)
    }

    /// Resolve tickets against the catalog, skipping any whose event no
    /// longer exists.
    pub fn resolve_tickets<'a, 'b>(&'a self, tickets: &'b [Ticket]) -> Vec<(&'b Ticket, &'a Event)> {
        tickets
            .iter()
            .filter_map(|ticket| self.find(&ticket.event_id).map(|event| (ticket, event)))
            .collect()
    }
}
