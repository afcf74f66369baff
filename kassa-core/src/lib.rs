//! Domain logic for the kassa ticket bot.
//!
//! This crate is transport-agnostic: it knows nothing about Telegram or HTTP.
//! It provides the event catalog, cart/ticket records, the inbound
//! command/callback model, and pure screen renderers that produce
//! `(text, keyboard)` replies. The `kassa-server` crate wires these into the
//! actual bot.

pub mod action;
pub mod catalog;
pub mod error;
pub mod menu;
pub mod reply;
pub mod ticket;

pub use action::{CallbackAction, CallbackParse, Command};
pub use catalog::{Catalog, Event};
pub use error::KassaError;
pub use reply::{Button, Notice, Reply};
pub use ticket::{CartItem, Ticket, TicketStatus};
