//! Screen renderers.
//!
//! Pure functions, one per screen: each takes only the data it needs and
//! returns a [`Reply`] (display text plus button rows). No side effects,
//! no global state. Callers resolve cart items and tickets against the
//! catalog first (see [`Catalog::resolve_cart`] and
//! [`Catalog::resolve_tickets`]); anything that no longer resolves is
//! simply absent from the screen.
//!
//! Texts use Telegram HTML markup (`<b>` for bold).

use crate::action::CallbackAction;
use crate::catalog::{Catalog, Event};
use crate::reply::{Button, Reply};
use crate::ticket::Ticket;

fn cb(label: &str, action: CallbackAction) -> Button {
    Button::callback(label, action.tag())
}

fn back_to_main_menu() -> Vec<Vec<Button>> {
    vec![vec![cb("⬅️ Назад", CallbackAction::MainMenu)]]
}

fn tickets_and_main_menu() -> Vec<Vec<Button>> {
    vec![vec![
        cb("🎟️ Мои билеты", CallbackAction::MyTickets),
        cb("⬅️ Главное меню", CallbackAction::MainMenu),
    ]]
}

fn main_menu_keyboard() -> Vec<Vec<Button>> {
    vec![
        vec![
            cb("🎫 Каталог событий", CallbackAction::Events),
            cb("🛒 Моя корзина", CallbackAction::Cart),
        ],
        vec![
            cb("🎟️ Мои билеты", CallbackAction::MyTickets),
            cb("🔍 Поиск событий", CallbackAction::Search),
        ],
        vec![cb("📚 Полезные ссылки", CallbackAction::Links)],
        vec![cb("ℹ️ О боте", CallbackAction::About)],
    ]
}

/// Greeting shown in response to `/start`.
pub fn greeting(first_name: &str) -> Reply {
    Reply::new(
        format!(
            "🎫 Привет, {first_name}!\n\n\
             Добро пожаловать в бота для покупки билетов! 🎭\n\n\
             Я помогу тебе:\n\
             • 🎫 Найти интересные события\n\
             • 🛒 Добавить билеты в корзину\n\
             • 🎟️ Управлять своими билетами\n\
             • 🔍 Искать события по названию\n\n\
             Выбери действие:"
        ),
        main_menu_keyboard(),
    )
}

/// Command reference shown in response to `/help`.
pub fn help_screen() -> Reply {
    Reply::text_only(
        "🎫 <b>Команды бота:</b>\n\n\
         /start - Главное меню\n\
         /help - Помощь\n\
         /events - Каталог событий\n\
         /cart - Моя корзина\n\
         /tickets - Мои билеты\n\n\
         Используй кнопки для навигации! 🎭",
    )
}

pub fn main_menu() -> Reply {
    Reply::new(
        "🎫 <b>Главное меню</b>\n\nВыбери действие:",
        main_menu_keyboard(),
    )
}

/// The full catalog: one summary block per event, one button per event.
pub fn event_catalog(events: &[Event]) -> Reply {
    let listing = events
        .iter()
        .map(|e| {
            format!(
                "🎫 {}\n   📅 {} в {}\n   📍 {}\n   💰 {}₽ | 🎟️ Осталось: {}\n",
                e.name, e.date, e.time, e.venue, e.price, e.available
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let mut keyboard: Vec<Vec<Button>> = events
        .iter()
        .map(|e| {
            vec![cb(
                &format!("{} - {}₽", e.name, e.price),
                CallbackAction::Event(e.id.clone()),
            )]
        })
        .collect();
    keyboard.push(vec![cb("⬅️ Назад", CallbackAction::MainMenu)]);

    Reply::new(
        format!("🎫 <b>Каталог событий</b>\n\n{listing}\n\nВыбери событие:"),
        keyboard,
    )
}

/// One event, with add-to-cart and buy-now actions.
pub fn event_detail(event: &Event) -> Reply {
    Reply::new(
        format!(
            "🎫 <b>{}</b>\n\n\
             📅 <b>Дата:</b> {}\n\
             🕐 <b>Время:</b> {}\n\
             📍 <b>Место:</b> {}\n\
             💰 <b>Цена:</b> {}₽\n\
             🎟️ <b>Осталось билетов:</b> {}\n\n\
             Выбери действие:",
            event.name, event.date, event.time, event.venue, event.price, event.available
        ),
        vec![
            vec![cb(
                "🛒 Добавить в корзину",
                CallbackAction::AddToCart(event.id.clone()),
            )],
            vec![cb("💰 Купить сейчас", CallbackAction::BuyNow(event.id.clone()))],
            vec![cb("⬅️ Назад к каталогу", CallbackAction::Events)],
        ],
    )
}

pub fn cart_empty() -> Reply {
    Reply::new(
        "🛒 <b>Моя корзина</b>\n\nКорзина пуста. Добавь билеты из каталога!",
        back_to_main_menu(),
    )
}

/// The cart screen. `items` are the cart's events that still resolve
/// against the catalog; `total` is their price sum.
pub fn cart(items: &[&Event], total: u32) -> Reply {
    let listing: String = items
        .iter()
        .map(|e| format!("🎫 {}\n   💰 {}₽\n\n", e.name, e.price))
        .collect();

    let mut keyboard: Vec<Vec<Button>> = items
        .iter()
        .map(|e| {
            vec![cb(
                &format!("❌ {}", e.name),
                CallbackAction::RemoveFromCart(e.id.clone()),
            )]
        })
        .collect();
    keyboard.push(vec![cb("💳 Оформить заказ", CallbackAction::Checkout)]);
    keyboard.push(vec![cb("🗑️ Очистить корзину", CallbackAction::ClearCart)]);
    keyboard.push(vec![cb("⬅️ Назад", CallbackAction::MainMenu)]);

    Reply::new(
        format!(
            "🛒 <b>Моя корзина</b>\n\n{listing}💰 <b>Итого:</b> {total}₽\n\nВыбери действие:"
        ),
        keyboard,
    )
}

/// Confirmation after a single buy-now purchase.
pub fn purchase_confirmation(event: &Event, ticket: &Ticket) -> Reply {
    Reply::new(
        format!(
            "✅ <b>Билет куплен!</b>\n\n\
             🎫 <b>Событие:</b> {}\n\
             📅 <b>Дата:</b> {} в {}\n\
             📍 <b>Место:</b> {}\n\
             💰 <b>Цена:</b> {}₽\n\
             🎟️ <b>Номер билета:</b> {}\n\n\
             Билет сохранен в разделе 'Мои билеты'",
            event.name, event.date, event.time, event.venue, event.price, ticket.id
        ),
        tickets_and_main_menu(),
    )
}

/// Confirmation after a cart checkout. `items` are the purchased events
/// (already resolved), `total` their price sum.
pub fn checkout_confirmation(items: &[&Event], total: u32) -> Reply {
    let listing: String = items
        .iter()
        .map(|e| format!("🎫 {}\n   💰 {}₽\n", e.name, e.price))
        .collect();

    Reply::new(
        format!(
            "✅ <b>Заказ оформлен!</b>\n\n{listing}\n\
             💰 <b>Итого:</b> {total}₽\n\n\
             Все билеты сохранены в разделе 'Мои билеты'"
        ),
        tickets_and_main_menu(),
    )
}

pub fn tickets_empty() -> Reply {
    Reply::new(
        "🎟️ <b>Мои билеты</b>\n\nУ тебя пока нет билетов. Купи билеты из каталога!",
        back_to_main_menu(),
    )
}

/// The purchased-tickets screen, in purchase order.
pub fn ticket_list(entries: &[(&Ticket, &Event)]) -> Reply {
    let listing: String = entries
        .iter()
        .enumerate()
        .map(|(i, (ticket, event))| {
            format!(
                "{}. 🎫 <b>{}</b>\n   📅 {} в {}\n   📍 {}\n   🎟️ Номер: {}\n   ✅ Статус: {}\n   📅 Куплен: {}\n\n",
                i + 1,
                event.name,
                event.date,
                event.time,
                event.venue,
                ticket.id,
                ticket.status,
                ticket.purchase_date
            )
        })
        .collect();

    Reply::new(
        format!("🎟️ <b>Мои билеты</b>\n\n{listing}"),
        back_to_main_menu(),
    )
}

pub fn search_prompt() -> Reply {
    Reply::new(
        "🔍 <b>Поиск событий</b>\n\nВведи название события для поиска:",
        back_to_main_menu(),
    )
}

/// Search hits, one line and one button per event.
pub fn search_results(events: &[&Event]) -> Reply {
    let listing = events
        .iter()
        .map(|e| format!("• {} - {}₽ ({})", e.name, e.price, e.date))
        .collect::<Vec<_>>()
        .join("\n");

    let mut keyboard: Vec<Vec<Button>> = events
        .iter()
        .map(|e| {
            vec![cb(
                &format!("🎫 {} - {}₽", e.name, e.price),
                CallbackAction::Event(e.id.clone()),
            )]
        })
        .collect();
    keyboard.push(vec![cb("⬅️ Главное меню", CallbackAction::MainMenu)]);

    Reply::new(
        format!("🔍 <b>Результаты поиска:</b>\n\n{listing}\n\nВыбери событие:"),
        keyboard,
    )
}

pub fn search_no_results() -> Reply {
    Reply::new(
        "❌ События не найдены. Попробуй другой запрос.\n\n\
         Или используй кнопки меню:",
        main_menu_keyboard(),
    )
}

pub fn links() -> Reply {
    Reply::new(
        "📚 <b>Полезные ссылки</b>\n\nБыстрый доступ к важным ресурсам:",
        vec![
            vec![
                Button::url("🌐 Сайт колледжа", "https://example-college.ru"),
                Button::url("📱 Соцсети", "https://vk.com/college"),
            ],
            vec![
                Button::url("📚 Библиотека", "https://library.college.ru"),
                Button::url("💬 Чат студентов", "https://t.me/college_chat"),
            ],
            vec![Button::url("🎮 FunPay", "https://funpay.com")],
            vec![cb("⬅️ Назад", CallbackAction::MainMenu)],
        ],
    )
}

pub fn about() -> Reply {
    Reply::new(
        "ℹ️ <b>О боте</b>\n\n\
         🎫 Бот для покупки билетов на события\n\n\
         <b>Возможности:</b>\n\
         • 🎫 Просмотр каталога событий\n\
         • 🛒 Корзина для билетов\n\
         • 🎟️ Управление своими билетами\n\
         • 🔍 Поиск событий\n\
         • 📚 Полезные ссылки\n\n\
         <b>Версия:</b> 1.0\n\
         <b>Разработчик:</b> Для колледжа\n\n\
         Используй /help для списка команд",
        back_to_main_menu(),
    )
}

/// Convenience: the cart screen for a raw cart, resolving against the
/// catalog and falling back to the empty variant.
pub fn cart_screen(catalog: &Catalog, cart_items: &[crate::ticket::CartItem]) -> Reply {
    if cart_items.is_empty() {
        return cart_empty();
    }
    let (items, total) = catalog.resolve_cart(cart_items);
    cart(&items, total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ticket::issue;
    use chrono::Utc;

    #[test]
    fn test_event_detail_embeds_name_price_available_for_every_event() {
        let catalog = Catalog::sample();
        for event in catalog.list() {
            let reply = event_detail(event);
            assert!(
                reply.text.contains(&event.name),
                "detail for {} should embed the name",
                event.id
            );
            assert!(
                reply.text.contains(&format!("{}₽", event.price)),
                "detail for {} should embed the price",
                event.id
            );
            assert!(
                reply.text.contains(&event.available.to_string()),
                "detail for {} should embed the availability",
                event.id
            );
        }
    }

    #[test]
    fn test_event_detail_buttons_target_the_event() {
        let catalog = Catalog::sample();
        let event = catalog.find("2").unwrap();
        let reply = event_detail(event);
        let tags: Vec<&str> = reply
            .keyboard
            .iter()
            .flatten()
            .filter_map(|b| match b {
                Button::Callback { data, .. } => Some(data.as_str()),
                Button::Url { .. } => None,
            })
            .collect();
        assert_eq!(tags, ["add_cart_2", "buy_2", "events"]);
    }

    #[test]
    fn test_main_menu_rows_are_grouped() {
        let reply = main_menu();
        let shape: Vec<usize> = reply.keyboard.iter().map(Vec::len).collect();
        assert_eq!(shape, [2, 2, 1, 1]);
    }

    #[test]
    fn test_event_catalog_has_one_button_per_event_plus_back() {
        let catalog = Catalog::sample();
        let reply = event_catalog(catalog.list());
        assert_eq!(reply.keyboard.len(), catalog.list().len() + 1);
        assert!(reply.text.contains("Каталог событий"));
        for event in catalog.list() {
            assert!(reply.text.contains(&event.venue));
        }
    }

    #[test]
    fn test_cart_shows_total_and_remove_buttons() {
        let catalog = Catalog::sample();
        let items = vec![catalog.find("1").unwrap(), catalog.find("2").unwrap()];
        let reply = cart(&items, 2000);
        assert!(
            reply.text.contains("<b>Итого:</b> 2000₽"),
            "cart text should show the total: {}",
            reply.text
        );
        // Two remove buttons, then checkout / clear / back.
        assert_eq!(reply.keyboard.len(), 5);
        let first = &reply.keyboard[0][0];
        match first {
            Button::Callback { data, .. } => assert_eq!(data, "remove_cart_1"),
            Button::Url { .. } => panic!("expected a callback button"),
        }
    }

    #[test]
    fn test_cart_screen_skips_dangling_items() {
        let catalog = Catalog::sample();
        let now = Utc::now();
        let items = vec![
            crate::ticket::CartItem::new("1", now),
            crate::ticket::CartItem::new("gone", now),
        ];
        let reply = cart_screen(&catalog, &items);
        assert!(reply.text.contains("Концерт рок-группы"));
        assert!(
            reply.text.contains("<b>Итого:</b> 1500₽"),
            "dangling item should not contribute to the total"
        );
    }

    #[test]
    fn test_cart_screen_empty_variant() {
        let catalog = Catalog::sample();
        let reply = cart_screen(&catalog, &[]);
        assert!(reply.text.contains("Корзина пуста"));
    }

    #[test]
    fn test_ticket_list_shows_numbering_and_status() {
        let catalog = Catalog::sample();
        let now = Utc::now();
        let t1 = issue("1", now);
        let t2 = issue("3", now);
        let entries = vec![
            (&t1, catalog.find("1").unwrap()),
            (&t2, catalog.find("3").unwrap()),
        ];
        let reply = ticket_list(&entries);
        assert!(reply.text.contains("1. 🎫"));
        assert!(reply.text.contains("2. 🎫"));
        assert!(reply.text.contains("Статус: Активен"));
        assert!(reply.text.contains(&t1.id.to_string()));
    }

    #[test]
    fn test_links_are_url_buttons() {
        let reply = links();
        let urls: Vec<&Button> = reply
            .keyboard
            .iter()
            .flatten()
            .filter(|b| matches!(b, Button::Url { .. }))
            .collect();
        assert_eq!(urls.len(), 5);
        // Last row navigates back via callback.
        assert!(matches!(
            reply.keyboard.last().unwrap()[0],
            Button::Callback { .. }
        ));
    }

    #[test]
    fn test_search_results_lists_hits() {
        let catalog = Catalog::sample();
        let hits = catalog.search("концерт");
        let reply = search_results(&hits);
        assert!(reply.text.contains("Результаты поиска"));
        assert!(reply.text.contains("Концерт рок-группы"));
        assert_eq!(reply.keyboard.len(), hits.len() + 1);
    }

    #[test]
    fn test_checkout_confirmation_totals() {
        let catalog = Catalog::sample();
        let items = vec![catalog.find("1").unwrap(), catalog.find("2").unwrap()];
        let reply = checkout_confirmation(&items, 2000);
        assert!(reply.text.contains("Заказ оформлен"));
        assert!(reply.text.contains("<b>Итого:</b> 2000₽"));
    }
}
