use super::{Inbound, MessageSink, OrderBot, Reply, selection};
use crate::catalog::{CatalogDocument, CatalogStore};
use crate::error::SendError;
use crate::order::MemoryOrderSink;
use crate::resolver::{InMemorySessionStore, Mode, SessionStore};
use crate::settings::Settings;
use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use parking_lot::Mutex;
use std::sync::Arc;

const MENU: &str = r#"{
  "menu_categories": {
    "short_order": {"name": "Short Orders", "items": [
      {"name": "Chicken Adobo", "variations": [{"name": "Regular", "price": 150}]},
      {"name": "Pork Adobo", "variations": [{"name": "Regular", "price": 160}]}
    ]},
    "stir_fry": {"name": "Stir Fry", "items": [
      {"name": "Chicken w/ Mushroom", "variations": [{"name": "Small", "price": 180}, {"name": "Double", "price": 320}]}
    ]},
    "yangchow": {"name": "Yangchow", "items": [
      {"name": "Yangchow", "variations": [{"name": "Chicken Fillet", "price": 180}, {"name": "Pork", "price": 170}]}
    ]},
    "noodles": {"name": "Noodles", "items": [
      {"name": "Lomi", "variations": [{"name": "Solo", "price": 120}, {"name": "Large", "price": 200}]}
    ]}
  }
}"#;

const CUSTOMER: &str = "2468013579";

struct Fixture {
    bot: OrderBot,
    sessions: Arc<InMemorySessionStore>,
    orders: Arc<MemoryOrderSink>,
}

fn fixture_with(menu: &str) -> Fixture {
    let store = Arc::new(CatalogStore::from_document(CatalogDocument::from_json(menu).unwrap()));
    let sessions = Arc::new(InMemorySessionStore::new());
    let orders = Arc::new(MemoryOrderSink::new());
    let bot = OrderBot::new(store, sessions.clone(), orders.clone());
    Fixture { bot, sessions, orders }
}

fn fixture() -> Fixture {
    fixture_with(MENU)
}

/// Noon in Manila, store open.
fn noon() -> DateTime<Utc> {
    FixedOffset::east_opt(8 * 3600).unwrap().with_ymd_and_hms(2025, 3, 14, 12, 0, 0).unwrap().with_timezone(&Utc)
}

impl Fixture {
    fn text(&self, text: &str) -> Reply {
        self.bot.handle_at(CUSTOMER, Inbound::Text(text.to_string()), noon())
    }

    fn select(&self, token: &str) -> Reply {
        self.bot.handle_at(CUSTOMER, Inbound::Selection(token.to_string()), noon())
    }

    fn mode(&self) -> Mode {
        self.sessions.load(CUSTOMER).mode
    }
}

#[test]
fn unambiguous_order_is_priced_without_prompt() {
    let f = fixture();
    f.select(selection::START_ORDER);
    assert_eq!(f.mode(), Mode::AwaitingOrder);

    let reply = f.text("2 chicken adobo, 1 rice");
    assert!(reply.text().starts_with("✅ Order Confirmed!"), "{}", reply.text());
    assert!(reply.text().contains("Total: ₱300"));
    assert!(reply.text().contains("We'll prepare your order and contact you when it's ready."));

    let orders = f.orders.orders();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].estimated_total, 300);
    assert_eq!(orders[0].canonical_menu_name, "Chicken Adobo");
    assert!(reply.text().contains(&orders[0].order_number));
    assert!(f.sessions.is_empty());
}

#[test]
fn named_protein_resolves_directly() {
    let f = fixture();
    f.select(selection::START_ORDER);
    let reply = f.text("yangchow with chicken fillet");

    assert!(reply.text().contains("Total: ₱180"), "{}", reply.text());
    assert_eq!(f.orders.orders()[0].line_items[0].name, "Yangchow (Chicken Fillet)");
}

#[test]
fn missing_size_prompts_before_pricing() {
    let f = fixture();
    f.select(selection::START_ORDER);

    let reply = f.text("stir fry chicken mushroom");
    assert!(reply.text().contains("Chicken w/ Mushroom (item 1 of 1)"), "{}", reply.text());
    assert_eq!(reply.options().len(), 2);
    assert_eq!(f.mode(), Mode::AwaitingVariation);
    assert!(f.orders.is_empty());

    let token = reply.options()[1].token.clone();
    let reply = f.select(&token);
    assert!(reply.text().contains("Total: ₱320"), "{}", reply.text());

    let order = &f.orders.orders()[0];
    assert_eq!(order.raw_text, "stir fry chicken mushroom (Double)");
    assert_eq!(order.line_items[0].name, "Chicken w/ Mushroom (Double)");
    assert!(f.sessions.is_empty());
}

#[test]
fn several_ambiguous_items_are_asked_in_turn() {
    let f = fixture();
    f.select(selection::START_ORDER);

    let first = f.text("lomi and chicken w/ mushroom");
    assert!(first.text().contains("item 1 of 2"));
    let second = f.select(&first.options()[0].token);
    assert!(second.text().contains("Lomi (item 2 of 2)"), "{}", second.text());
    let done = f.select(&second.options()[1].token);

    assert!(done.text().contains("Total: ₱380"), "{}", done.text());
}

#[test]
fn question_is_reprompted_not_rejected() {
    let f = fixture();
    f.select(selection::START_ORDER);

    let reply = f.text("what time do you open");
    assert!(reply.text().contains("asking a question"), "{}", reply.text());
    assert_eq!(f.mode(), Mode::AwaitingOrder);

    let reply = f.text("I would like the special of the day that my friend recommended to me yesterday");
    assert!(reply.text().contains("couldn't find any of our menu items"), "{}", reply.text());
    assert_eq!(f.mode(), Mode::AwaitingOrder);
}

#[test]
fn idle_hours_question_gets_hours() {
    let f = fixture();
    let reply = f.text("what time do you open");
    assert_eq!(reply.text(), "We are OPEN today from 10:00 AM to 10:00 PM.");
    assert_eq!(f.mode(), Mode::Idle);
}

#[test]
fn idle_order_text_starts_the_flow() {
    let f = fixture();
    let reply = f.text("hi, 1 pork adobo please");
    assert!(reply.text().contains("Total: ₱160"), "{}", reply.text());
}

#[test]
fn idle_chatter_gets_welcome_options() {
    let f = fixture();
    let reply = f.text("hello");
    assert!(reply.text().starts_with("Hi! Welcome"));
    assert!(reply.options().iter().any(|o| o.token == selection::START_ORDER));
}

#[test]
fn cancel_while_awaiting_variation_creates_no_order() {
    let f = fixture();
    f.select(selection::START_ORDER);
    f.text("lomi");
    assert_eq!(f.mode(), Mode::AwaitingVariation);

    let reply = f.text("cancel");
    assert!(reply.text().contains("cancelled"));
    assert_eq!(f.mode(), Mode::Idle);
    assert!(f.orders.is_empty());
}

#[test]
fn cancel_while_awaiting_order() {
    let f = fixture();
    f.select(selection::START_ORDER);
    f.text("nevermind");
    assert_eq!(f.mode(), Mode::Idle);
}

#[test]
fn free_text_during_variation_repeats_prompt() {
    let f = fixture();
    f.select(selection::START_ORDER);
    f.text("lomi");

    let reply = f.text("the big one");
    assert!(reply.text().contains("Lomi (item 1 of 1)"));
    assert_eq!(f.mode(), Mode::AwaitingVariation);
}

#[test]
fn sink_failure_reports_and_clears_state() {
    let f = fixture();
    f.orders.set_failing(true);
    f.select(selection::START_ORDER);

    let reply = f.text("2 pork adobo");
    assert_eq!(reply.text(), "Sorry, we couldn't process your order. Please try again later.");
    assert!(f.sessions.is_empty());
    assert!(f.orders.is_empty());
}

#[test]
fn empty_catalog_accepts_any_text_unpriced() {
    let f = fixture_with(r#"{"menu_categories": {}}"#);
    f.select(selection::START_ORDER);

    let reply = f.text("two of your best dishes");
    assert!(reply.text().starts_with("✅ Order Confirmed!"));
    assert!(reply.text().contains("Order: two of your best dishes"));
    assert!(!reply.text().contains("Total"));
    assert_eq!(f.orders.orders()[0].estimated_total, 0);
}

#[test]
fn orders_in_the_same_instant_get_distinct_numbers() {
    let f = fixture();
    for _ in 0..2 {
        f.select(selection::START_ORDER);
        f.text("1 pork adobo");
    }
    let orders = f.orders.orders();
    assert_eq!(orders.len(), 2);
    assert_ne!(orders[0].order_number, orders[1].order_number);
}

#[test]
fn separate_priced_catalog_sets_prices() {
    let f = fixture();
    let priced = CatalogDocument::from_json(
        r#"{"menu_categories": {"p": {"name": "P", "items": [
            {"name": "Pork Adobo", "variations": [{"name": "Regular", "price": 175}]}]}}}"#,
    )
    .unwrap();
    let bot = f.bot.with_priced_catalog(Arc::new(CatalogStore::from_document(priced)));

    bot.handle_at(CUSTOMER, Inbound::Selection(selection::START_ORDER.into()), noon());
    let reply = bot.handle_at(CUSTOMER, Inbound::Text("2 pork adobo".into()), noon());
    assert!(reply.text().contains("Total: ₱350"), "{}", reply.text());
}

#[test]
fn menu_and_category_selections() {
    let f = fixture();
    let menu = f.select(selection::MENU);
    let stir_fry = menu.options().iter().find(|o| o.label == "Stir Fry").unwrap().token.clone();

    let listing = f.select(&stir_fry);
    assert!(listing.text().contains("• Chicken w/ Mushroom\n  - Small: ₱180"), "{}", listing.text());

    let missing = f.select("CATEGORY_desserts");
    assert_eq!(missing.text(), "Category not found. Please try again.");
}

#[derive(Default)]
struct RecordingSink {
    sent: Mutex<Vec<(String, Reply)>>,
}

impl MessageSink for RecordingSink {
    fn send(&self, customer: &str, reply: &Reply) -> Result<(), SendError> {
        self.sent.lock().push((customer.to_string(), reply.clone()));
        Ok(())
    }
}

#[test]
fn dispatch_sends_the_reply() {
    let f = fixture();
    let out = RecordingSink::default();
    f.bot.dispatch("psid-7", Inbound::Selection(selection::HOURS.into()), &out).unwrap();

    let sent = out.sent.lock();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "psid-7");
}

const PARTIAL_MENU: &str = r#"{
  "menu_categories": {
    "ribs": {"name": "Ribs", "items": [
      {"name": "Sweet & Spicy Pork Ribs", "variations": [{"name": "Regular", "price": 260}]}
    ]},
    "yangchow": {"name": "Yangchow", "items": [
      {"name": "Yangchow w/ Chicken Fillet", "variations": [{"name": "Solo", "price": 150}, {"name": "Large", "price": 220}]}
    ]}
  }
}"#;

#[test]
fn partial_name_is_priced_not_left_at_zero() {
    let f = fixture_with(PARTIAL_MENU);
    f.select(selection::START_ORDER);

    let reply = f.text("2 spicy pork ribs please");
    assert!(reply.text().contains("Total: ₱520"), "{}", reply.text());

    let order = &f.orders.orders()[0];
    assert_eq!(order.estimated_total, 520);
    assert_eq!(order.line_items[0].name, "Sweet & Spicy Pork Ribs");
    assert_eq!(order.line_items[0].quantity, 2);
}

#[test]
fn partial_name_of_sized_item_still_prompts() {
    let f = fixture_with(PARTIAL_MENU);
    f.select(selection::START_ORDER);

    let reply = f.text("chicken fillet");
    assert!(reply.text().contains("Yangchow w/ Chicken Fillet (item 1 of 1)"), "{}", reply.text());
    assert!(f.orders.is_empty());

    let done = f.select(&reply.options()[1].token);
    assert!(done.text().contains("Total: ₱220"), "{}", done.text());
    assert_eq!(f.orders.orders()[0].raw_text, "chicken fillet (Yangchow w/ Chicken Fillet Large)");
}

fn store_fixture(configure: impl FnOnce(&mut Settings)) -> Fixture {
    let mut settings = Settings::default();
    configure(&mut settings);

    let store = Arc::new(CatalogStore::from_document(CatalogDocument::from_json(MENU).unwrap()));
    let sessions = Arc::new(InMemorySessionStore::new());
    let orders = Arc::new(MemoryOrderSink::new());
    let bot = OrderBot::from_settings(&settings, store, sessions.clone(), orders.clone()).unwrap();
    Fixture { bot, sessions, orders }
}

#[test]
fn location_selection_sends_map_link() {
    let f = store_fixture(|s| s.store.map_url = Some("https://maps.example/pedros".to_string()));

    let reply = f.select(selection::LOCATION);
    assert!(reply.text().contains("https://maps.example/pedros"), "{}", reply.text());
    assert!(reply.options().iter().any(|o| o.token == selection::START_ORDER));

    let unset = fixture().select(selection::LOCATION);
    assert_eq!(unset.text(), "Sorry, our location is not available right now.");
}

#[test]
fn contact_selection_sends_phone() {
    let f = store_fixture(|s| s.store.phone = Some("0917 150 5518".to_string()));

    let reply = f.select(selection::CONTACT);
    assert!(reply.text().starts_with("📞 Contact us: 0917 150 5518"), "{}", reply.text());
    assert_eq!(f.mode(), Mode::Idle);
}

#[test]
fn foodpanda_option_only_when_configured() {
    let plain = fixture().select(selection::HOURS);
    assert!(plain.options().iter().any(|o| o.token == selection::LOCATION));
    assert!(plain.options().iter().any(|o| o.token == selection::CONTACT));
    assert!(!plain.options().iter().any(|o| o.token == selection::FOODPANDA));

    let f = store_fixture(|s| s.store.foodpanda_url = Some("https://foodpanda.example/pedros".to_string()));
    let hours = f.select(selection::HOURS);
    assert!(hours.options().iter().any(|o| o.token == selection::FOODPANDA));

    let reply = f.select(selection::FOODPANDA);
    assert!(reply.text().contains("https://foodpanda.example/pedros"), "{}", reply.text());
}
