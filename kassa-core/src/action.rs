//! Parsing of inbound slash commands and callback tags.
//!
//! A callback tag is the opaque string attached to an inline button. Tags
//! are matched exactly (`cart`, `checkout`, ...) or by prefix
//! (`event_<id>`, `add_cart_<id>`, ...). Anything else parses to
//! [`CallbackParse::Unknown`], which the router answers with an explicit
//! user-visible fallback rather than dropping silently.

use std::fmt;

/// A recognized slash command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `/start` - greet the user and show the main menu.
    Start,
    /// `/help` - list the available commands.
    Help,
    /// `/events` - show the event catalog.
    Events,
    /// `/cart` - show the user's cart.
    Cart,
    /// `/tickets` - show the user's purchased tickets.
    Tickets,
}

impl Command {
    /// Parse a message text as a slash command.
    ///
    /// Only the first whitespace-separated token is considered, and a
    /// `@botname` suffix is ignored (`/start@kassa_bot` works in group
    /// chats). Returns `None` for ordinary text and for unrecognized
    /// commands; both are treated as search queries downstream.
    pub fn parse(text: &str) -> Option<Command> {
        let first = text.trim().split_whitespace().next()?;
        let name = first.strip_prefix('/')?;
        let name = match name.split_once('@') {
            Some((name, _bot)) => name,
            None => name,
        };
        match name {
            "start" => Some(Command::Start),
            "help" => Some(Command::Help),
            "events" => Some(Command::Events),
            "cart" => Some(Command::Cart),
            "tickets" => Some(Command::Tickets),
            _ => None,
        }
    }
}

/// An action a button press maps to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackAction {
    MainMenu,
    Events,
    Event(String),
    AddToCart(String),
    BuyNow(String),
    Cart,
    RemoveFromCart(String),
    ClearCart,
    Checkout,
    MyTickets,
    Search,
    Links,
    About,
}

impl CallbackAction {
    /// The wire tag for this action, as attached to inline buttons.
    /// `parse_callback` is the inverse.
    pub fn tag(&self) -> String {
        match self {
            CallbackAction::MainMenu => "main_menu".to_string(),
            CallbackAction::Events => "events".to_string(),
            CallbackAction::Event(id) => format!("event_{id}"),
            CallbackAction::AddToCart(id) => format!("add_cart_{id}"),
            CallbackAction::BuyNow(id) => format!("buy_{id}"),
            CallbackAction::Cart => "cart".to_string(),
            CallbackAction::RemoveFromCart(id) => format!("remove_cart_{id}"),
            CallbackAction::ClearCart => "clear_cart".to_string(),
            CallbackAction::Checkout => "checkout".to_string(),
            CallbackAction::MyTickets => "my_tickets".to_string(),
            CallbackAction::Search => "search".to_string(),
            CallbackAction::Links => "links".to_string(),
            CallbackAction::About => "about".to_string(),
        }
    }
}

impl fmt::Display for CallbackAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// Result of parsing an inbound callback tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackParse {
    /// The tag matched a known action.
    Action(CallbackAction),
    /// The tag matched no known pattern or prefix.
    Unknown { tag: String },
}

/// Parse an inbound callback tag.
///
/// Exact matches are tried first, then the `event_` / `add_cart_` / `buy_`
/// / `remove_cart_` prefixes. Prefix matches keep whatever follows the
/// prefix as the event id; resolution against the catalog happens in the
/// handler, so a dangling id becomes a user-facing "event does not exist"
/// notice rather than a parse failure.
pub fn parse_callback(tag: &str) -> CallbackParse {
    let action = match tag {
        "main_menu" => CallbackAction::MainMenu,
        "events" => CallbackAction::Events,
        "cart" => CallbackAction::Cart,
        "clear_cart" => CallbackAction::ClearCart,
        "checkout" => CallbackAction::Checkout,
        "my_tickets" => CallbackAction::MyTickets,
        "search" => CallbackAction::Search,
        "links" => CallbackAction::Links,
        "about" => CallbackAction::About,
        _ => {
            // Prefix patterns. `add_cart_` must be checked before the
            // bare id prefixes so the longer pattern wins.
            if let Some(id) = tag.strip_prefix("add_cart_") {
                CallbackAction::AddToCart(id.to_string())
            } else if let Some(id) = tag.strip_prefix("remove_cart_") {
                CallbackAction::RemoveFromCart(id.to_string())
            } else if let Some(id) = tag.strip_prefix("event_") {
                CallbackAction::Event(id.to_string())
            } else if let Some(id) = tag.strip_prefix("buy_") {
                CallbackAction::BuyNow(id.to_string())
            } else {
                return CallbackParse::Unknown {
                    tag: tag.to_string(),
                };
            }
        }
    };
    CallbackParse::Action(action)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn action(a: CallbackAction) -> CallbackParse {
        CallbackParse::Action(a)
    }

    #[test]
    fn test_parse_exact_tags() {
        assert_eq!(parse_callback("main_menu"), action(CallbackAction::MainMenu));
        assert_eq!(parse_callback("events"), action(CallbackAction::Events));
        assert_eq!(parse_callback("cart"), action(CallbackAction::Cart));
        assert_eq!(parse_callback("clear_cart"), action(CallbackAction::ClearCart));
        assert_eq!(parse_callback("checkout"), action(CallbackAction::Checkout));
        assert_eq!(parse_callback("my_tickets"), action(CallbackAction::MyTickets));
        assert_eq!(parse_callback("search"), action(CallbackAction::Search));
        assert_eq!(parse_callback("links"), action(CallbackAction::Links));
        assert_eq!(parse_callback("about"), action(CallbackAction::About));
    }

    #[test]
    fn test_parse_prefix_tags() {
        assert_eq!(
            parse_callback("event_3"),
            action(CallbackAction::Event("3".to_string()))
        );
        assert_eq!(
            parse_callback("add_cart_12"),
            action(CallbackAction::AddToCart("12".to_string()))
        );
        assert_eq!(
            parse_callback("buy_5"),
            action(CallbackAction::BuyNow("5".to_string()))
        );
        assert_eq!(
            parse_callback("remove_cart_1"),
            action(CallbackAction::RemoveFromCart("1".to_string()))
        );
    }

    #[test]
    fn test_prefix_tags_keep_dangling_ids() {
        // An id the catalog does not know still parses; the handler turns
        // it into a user-facing notice.
        assert_eq!(
            parse_callback("event_nope"),
            action(CallbackAction::Event("nope".to_string()))
        );
        assert_eq!(
            parse_callback("event_"),
            action(CallbackAction::Event(String::new()))
        );
    }

    #[test]
    fn test_add_cart_prefix_wins_over_cart() {
        // "add_cart_2" must not be mistaken for the exact "cart" tag.
        assert_eq!(
            parse_callback("add_cart_2"),
            action(CallbackAction::AddToCart("2".to_string()))
        );
        // "remove_cart_2" likewise.
        assert_eq!(
            parse_callback("remove_cart_2"),
            action(CallbackAction::RemoveFromCart("2".to_string()))
        );
    }

    #[test]
    fn test_unknown_tags() {
        assert_eq!(
            parse_callback("refund_3"),
            CallbackParse::Unknown {
                tag: "refund_3".to_string()
            }
        );
        assert_eq!(
            parse_callback(""),
            CallbackParse::Unknown {
                tag: String::new()
            }
        );
        // Tags are case-sensitive; buttons always carry exact tags.
        assert_eq!(
            parse_callback("Checkout"),
            CallbackParse::Unknown {
                tag: "Checkout".to_string()
            }
        );
    }

    #[test]
    fn test_tag_round_trips_through_parse() {
        let actions = [
            CallbackAction::MainMenu,
            CallbackAction::Events,
            CallbackAction::Event("4".to_string()),
            CallbackAction::AddToCart("4".to_string()),
            CallbackAction::BuyNow("4".to_string()),
            CallbackAction::Cart,
            CallbackAction::RemoveFromCart("4".to_string()),
            CallbackAction::ClearCart,
            CallbackAction::Checkout,
            CallbackAction::MyTickets,
            CallbackAction::Search,
            CallbackAction::Links,
            CallbackAction::About,
        ];
        for a in actions {
            assert_eq!(
                parse_callback(&a.tag()),
                CallbackParse::Action(a.clone()),
                "tag {} should parse back to its action",
                a
            );
        }
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("/start"), Some(Command::Start));
        assert_eq!(Command::parse("/help"), Some(Command::Help));
        assert_eq!(Command::parse("/events"), Some(Command::Events));
        assert_eq!(Command::parse("/cart"), Some(Command::Cart));
        assert_eq!(Command::parse("/tickets"), Some(Command::Tickets));
        assert_eq!(Command::parse("  /start  "), Some(Command::Start));
    }

    #[test]
    fn test_parse_command_with_bot_suffix() {
        assert_eq!(Command::parse("/start@kassa_bot"), Some(Command::Start));
        assert_eq!(Command::parse("/help@kassa_bot"), Some(Command::Help));
    }

    #[test]
    fn test_parse_command_ignores_trailing_arguments() {
        assert_eq!(Command::parse("/start now please"), Some(Command::Start));
    }

    #[test]
    fn test_non_commands_fall_through_to_search() {
        // Ordinary text and unknown commands both return None; the router
        // treats them as search queries.
        assert_eq!(Command::parse("концерт"), None);
        assert_eq!(Command::parse("/refund"), None);
        assert_eq!(Command::parse(""), None);
        assert_eq!(Command::parse("start"), None); // missing slash
    }
}
