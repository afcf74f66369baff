//! Cart items and issued tickets.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Timestamp format shown to users for ticket purchase dates.
pub const PURCHASE_DATE_FORMAT: &str = "%d.%m.%Y %H:%M";

/// A pending selection in a user's cart.
///
/// Invariant (enforced by the session store): at most one cart item per
/// event id for a given user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub event_id: String,
    pub added_at: DateTime<Utc>,
}

impl CartItem {
    pub fn new(event_id: impl Into<String>, added_at: DateTime<Utc>) -> Self {
        Self {
            event_id: event_id.into(),
            added_at,
        }
    }
}

/// Ticket lifecycle status. Only `Active` is ever produced; there is no
/// cancellation or refund transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TicketStatus {
    Active,
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TicketStatus::Active => write!(f, "Активен"),
        }
    }
}

/// An issued, immutable proof of purchase for one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    /// Globally unique ticket number. A random uuid rather than a
    /// user/event/timestamp concatenation, so uniqueness does not depend
    /// on timestamp resolution.
    pub id: Uuid,
    pub event_id: String,
    pub purchase_date: String,
    pub status: TicketStatus,
}

/// Issue a ticket for an event at the given instant.
pub fn issue(event_id: &str, now: DateTime<Utc>) -> Ticket {
    Ticket {
        id: Uuid::new_v4(),
        event_id: event_id.to_string(),
        purchase_date: now.format(PURCHASE_DATE_FORMAT).to_string(),
        status: TicketStatus::Active,
    }
}
