//! Per-user session state: the cart and the purchased-ticket list.
//!
//! The store is an explicit service object injected into the router, not
//! ambient global state. Sessions live for the process lifetime with no
//! eviction, and every mutating operation holds the user's session lock
//! for its full duration, so concurrent add/remove/checkout for a single
//! user serialize while different users proceed independently. Catalog
//! reads take no lock since the catalog never changes after startup.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{Mutex, RwLock};

use kassa_core::ticket::issue;
use kassa_core::{CartItem, Catalog, KassaError, Ticket};

/// Telegram user identity.
pub type UserId = i64;

/// One user's pending selections and purchases.
#[derive(Debug, Default, Clone)]
pub struct UserSession {
    pub cart: Vec<CartItem>,
    pub tickets: Vec<Ticket>,
}

/// Result of an add-to-cart attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    /// The event is already in the cart; the cart is unchanged.
    AlreadyInCart,
    EventNotFound,
}

/// Thread-safe store of per-user sessions.
pub struct SessionStore {
    catalog: Arc<Catalog>,
    sessions: RwLock<HashMap<UserId, Arc<Mutex<UserSession>>>>,
}

impl SessionStore {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Get the session for a user, creating an empty one on first access.
    async fn session(&self, user: UserId) -> Arc<Mutex<UserSession>> {
        {
            let sessions = self.sessions.read().await;
            if let Some(session) = sessions.get(&user) {
                return session.clone();
            }
        }
        let mut sessions = self.sessions.write().await;
        sessions.entry(user).or_default().clone()
    }

    /// Ensure a session exists for the user (used by `/start`).
    pub async fn touch(&self, user: UserId) {
        self.session(user).await;
    }

    /// The user's cart, in insertion order. Empty for an unseen user.
    pub async fn cart(&self, user: UserId) -> Vec<CartItem> {
        let session = self.session(user).await;
        let session = session.lock().await;
        session.cart.clone()
    }

    /// The user's purchased tickets, in purchase order. Empty for an
    /// unseen user.
    pub async fn tickets(&self, user: UserId) -> Vec<Ticket> {
        let session = self.session(user).await;
        let session = session.lock().await;
        session.tickets.clone()
    }

    /// Add an event to the user's cart. A duplicate add is a no-op,
    /// reported as [`AddOutcome::AlreadyInCart`] so the caller can notify
    /// the user.
    pub async fn add_to_cart(&self, user: UserId, event_id: &str) -> AddOutcome {
        if self.catalog.find(event_id).is_none() {
            return AddOutcome::EventNotFound;
        }
        let session = self.session(user).await;
        let mut session = session.lock().await;
        if session.cart.iter().any(|item| item.event_id == event_id) {
            return AddOutcome::AlreadyInCart;
        }
        session.cart.push(CartItem::new(event_id, Utc::now()));
        AddOutcome::Added
    }

    /// Remove an event from the user's cart. A no-op, not an error, if it
    /// is absent.
    pub async fn remove_from_cart(&self, user: UserId, event_id: &str) {
        let session = self.session(user).await;
        let mut session = session.lock().await;
        session.cart.retain(|item| item.event_id != event_id);
    }

    /// Empty the user's cart.
    pub async fn clear_cart(&self, user: UserId) {
        let session = self.session(user).await;
        let mut session = session.lock().await;
        session.cart.clear();
    }

    /// Convert the cart into tickets.
    ///
    /// Issues one ticket per cart item whose event still resolves, appends
    /// them to the ticket list, and empties the cart, all under the user's
    /// session lock so a concurrent add cannot interleave. An empty cart
    /// is reported as [`KassaError::EmptyCart`] with no state change.
    pub async fn checkout(&self, user: UserId) -> Result<Vec<Ticket>, KassaError> {
        let session = self.session(user).await;
        let mut session = session.lock().await;
        if session.cart.is_empty() {
            return Err(KassaError::EmptyCart);
        }

        let now = Utc::now();
        let issued: Vec<Ticket> = session
            .cart
            .iter()
            .filter(|item| self.catalog.find(&item.event_id).is_some())
            .map(|item| issue(&item.event_id, now))
            .collect();

        session.tickets.extend(issued.iter().cloned());
        session.cart.clear();
        Ok(issued)
    }

    /// Issue a single ticket immediately, without touching the cart.
    /// No state changes on an unknown event.
    pub async fn buy_now(&self, user: UserId, event_id: &str) -> Result<Ticket, KassaError> {
        if self.catalog.find(event_id).is_none() {
            return Err(KassaError::EventNotFound {
                id: event_id.to_string(),
            });
        }
        let ticket = issue(event_id, Utc::now());
        let session = self.session(user).await;
        let mut session = session.lock().await;
        session.tickets.push(ticket.clone());
        Ok(ticket)
    }
}
