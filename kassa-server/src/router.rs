//! Stateless dispatch from inbound events to handlers.
//!
//! One inbound event maps to exactly one handler. Handlers read/write the
//! session store, read the catalog, and return an [`Outcome`] describing
//! the reply; they never call each other or send anything themselves.
//! "Refresh the cart screen after removing an item" is expressed by the
//! remove handler returning the re-rendered cart screen in its outcome,
//! so the router stays the sole dispatcher.

use std::sync::Arc;

use tracing::warn;

use kassa_core::action::{parse_callback, CallbackAction, CallbackParse, Command};
use kassa_core::{menu, Catalog, KassaError, Notice, Reply};

use crate::session::{AddOutcome, SessionStore, UserId};

/// An inbound event, as normalized by the transports.
#[derive(Debug, Clone)]
pub enum Inbound {
    /// A recognized slash command.
    Command(Command),
    /// Free text; treated as a search query.
    Text(String),
    /// A button press, carrying its raw callback tag.
    Callback(String),
}

/// What a handler wants sent back: a screen to show and/or a short notice.
#[derive(Debug, Clone, Default)]
pub struct Outcome {
    pub screen: Option<Reply>,
    pub notice: Option<Notice>,
}

impl Outcome {
    fn screen(reply: Reply) -> Self {
        Self {
            screen: Some(reply),
            notice: None,
        }
    }

    fn notice(notice: Notice) -> Self {
        Self {
            screen: None,
            notice: Some(notice),
        }
    }

    fn with_notice(mut self, notice: Notice) -> Self {
        self.notice = Some(notice);
        self
    }
}

pub struct Router {
    catalog: Arc<Catalog>,
    sessions: SessionStore,
}

const EVENT_NOT_FOUND: &str = "Событие не найдено";

impl Router {
    pub fn new(catalog: Arc<Catalog>, sessions: SessionStore) -> Self {
        Self { catalog, sessions }
    }

    /// Dispatch one inbound event for a user. `first_name` is the
    /// platform-supplied display name, used only for the greeting.
    pub async fn handle(&self, user: UserId, first_name: &str, inbound: Inbound) -> Outcome {
        match inbound {
            Inbound::Command(command) => self.handle_command(user, first_name, command).await,
            Inbound::Text(query) => self.handle_search(&query),
            Inbound::Callback(tag) => self.handle_callback(user, &tag).await,
        }
    }

    async fn handle_command(&self, user: UserId, first_name: &str, command: Command) -> Outcome {
        match command {
            Command::Start => {
                self.sessions.touch(user).await;
                Outcome::screen(menu::greeting(first_name))
            }
            Command::Help => Outcome::screen(menu::help_screen()),
            Command::Events => Outcome::screen(menu::event_catalog(self.catalog.list())),
            Command::Cart => Outcome::screen(self.cart_screen(user).await),
            Command::Tickets => Outcome::screen(self.tickets_screen(user).await),
        }
    }

    fn handle_search(&self, query: &str) -> Outcome {
        let found = self.catalog.search(query);
        if found.is_empty() {
            Outcome::screen(menu::search_no_results())
        } else {
            Outcome::screen(menu::search_results(&found))
        }
    }

    async fn handle_callback(&self, user: UserId, tag: &str) -> Outcome {
        let action = match parse_callback(tag) {
            CallbackParse::Action(action) => action,
            CallbackParse::Unknown { tag } => {
                // Explicit fallback: an unroutable button press is logged
                // and answered, never silently dropped.
                warn!(user, tag = %tag, "Unrecognized callback tag");
                return Outcome::notice(Notice::alert(
                    "Неизвестное действие. Используй /start для главного меню.",
                ));
            }
        };

        match action {
            CallbackAction::MainMenu => Outcome::screen(menu::main_menu()),
            CallbackAction::Events => Outcome::screen(menu::event_catalog(self.catalog.list())),
            CallbackAction::Event(id) => match self.catalog.find(&id) {
                Some(event) => Outcome::screen(menu::event_detail(event)),
                None => Outcome::notice(Notice::alert(EVENT_NOT_FOUND)),
            },
            CallbackAction::AddToCart(id) => match self.sessions.add_to_cart(user, &id).await {
                AddOutcome::Added => {
                    // `find` must succeed here: add_to_cart validated the id
                    // against the same immutable catalog.
                    let name = self
                        .catalog
                        .find(&id)
                        .map(|e| e.name.clone())
                        .unwrap_or_default();
                    Outcome::notice(Notice::toast(format!("✅ {name} добавлено в корзину!")))
                }
                AddOutcome::AlreadyInCart => {
                    Outcome::notice(Notice::alert("Это событие уже в корзине!"))
                }
                AddOutcome::EventNotFound => Outcome::notice(Notice::alert(EVENT_NOT_FOUND)),
            },
            CallbackAction::BuyNow(id) => match self.sessions.buy_now(user, &id).await {
                Ok(ticket) => match self.catalog.find(&id) {
                    Some(event) => Outcome::screen(menu::purchase_confirmation(event, &ticket)),
                    None => Outcome::notice(Notice::alert(EVENT_NOT_FOUND)),
                },
                Err(_) => Outcome::notice(Notice::alert(EVENT_NOT_FOUND)),
            },
            CallbackAction::Cart => Outcome::screen(self.cart_screen(user).await),
            CallbackAction::RemoveFromCart(id) => {
                self.sessions.remove_from_cart(user, &id).await;
                let notice = match self.catalog.find(&id) {
                    Some(event) => Notice::toast(format!("❌ {} удалено из корзины", event.name)),
                    None => Notice::toast("Удалено из корзины"),
                };
                Outcome::screen(self.cart_screen(user).await).with_notice(notice)
            }
            CallbackAction::ClearCart => {
                self.sessions.clear_cart(user).await;
                Outcome::screen(self.cart_screen(user).await)
                    .with_notice(Notice::toast("✅ Корзина очищена!"))
            }
            CallbackAction::Checkout => match self.sessions.checkout(user).await {
                Ok(tickets) => {
                    let items: Vec<_> = tickets
                        .iter()
                        .filter_map(|t| self.catalog.find(&t.event_id))
                        .collect();
                    let total = items.iter().map(|e| e.price).sum();
                    Outcome::screen(menu::checkout_confirmation(&items, total))
                }
                Err(KassaError::EmptyCart) => Outcome::notice(Notice::alert("Корзина пуста!")),
                Err(KassaError::EventNotFound { .. }) => {
                    Outcome::notice(Notice::alert(EVENT_NOT_FOUND))
                }
            },
            CallbackAction::MyTickets => Outcome::screen(self.tickets_screen(user).await),
            CallbackAction::Search => Outcome::screen(menu::search_prompt()),
            CallbackAction::Links => Outcome::screen(menu::links()),
            CallbackAction::About => Outcome::screen(menu::about()),
        }
    }

    async fn cart_screen(&self, user: UserId) -> Reply {
        let cart = self.sessions.cart(user).await;
        menu::cart_screen(&self.catalog, &cart)
    }

    async fn tickets_screen(&self, user: UserId) -> Reply {
        let tickets = self.sessions.tickets(user).await;
        if tickets.is_empty() {
            return menu::tickets_empty();
        }
        let entries = self.catalog.resolve_tickets(&tickets);
        menu::ticket_list(&entries)
    }
}
