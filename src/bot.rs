//! Conversation engine.
//!
//! [`OrderBot`] drives one customer turn at a time:
//!
//! ```text
//! (customer, Inbound) ── SessionStore::load
//!        │
//!        ├─ Idle             text naming a dish  -> order flow
//!        │                   hours question      -> hours message
//!        │                   anything else       -> welcome + options
//!        ├─ AwaitingOrder    cancel | re-prompt (question / no items) | resolve
//!        └─ AwaitingVariation option token -> next prompt | finalize
//!                              cancel       -> Idle
//!
//! finalize: price -> assemble -> OrderSink::persist -> confirmation
//!        │
//!        └─ SessionStore::save (idle states are dropped)
//! ```
//!
//! The bot holds no per-customer state of its own; concurrent customers only
//! meet in the session store.

use crate::api::{Options, Reason};
use crate::catalog::{Catalog, CatalogStore};
use crate::engine::Matcher;
use crate::error::{SendError, SettingsError};
use crate::hours::StoreHours;
use crate::order::{DEFAULT_CUSTOMER_NAME_PREFIX, OrderAssembler, OrderNumbers, OrderRecord, OrderSink};
use crate::resolver::{ConversationState, Mode, SessionStore, Step, VariationResolver, is_cancel};
use crate::settings::Settings;
use chrono::{DateTime, Utc};
use std::fmt::Write as _;
use std::sync::Arc;

pub use crate::resolver::ChoiceOption;

/// Structured selections the transport can send.
pub mod selection {
    pub const START_ORDER: &str = "START_ORDER";
    pub const HOURS: &str = "HOURS";
    pub const MENU: &str = "MENU";
    pub const LOCATION: &str = "LOCATION";
    pub const CONTACT: &str = "CONTACT";
    pub const FOODPANDA: &str = "FOODPANDA";
    /// Prefix of `CATEGORY_<id>` selections.
    pub const CATEGORY_PREFIX: &str = "CATEGORY_";
}

const ORDER_PROMPT: &str =
    "📝 Please type your order, e.g. \"2 pork adobo, 1 yangchow with chicken fillet\".\n\nType cancel to stop.";
const QUESTION_REPROMPT: &str = "It looks like you're asking a question. To order, please type the dishes you \
                                 want, e.g. \"2 pork adobo\". Type cancel to stop.";
const NO_ITEMS_REPROMPT: &str = "Sorry, I couldn't find any of our menu items in your message. Please type the \
                                 dish names as they appear on our menu, or type cancel to stop.";
const CANCELLED: &str = "❌ Order cancelled. Let us know whenever you're ready to order again!";
const PERSIST_FAILED: &str = "Sorry, we couldn't process your order. Please try again later.";

/// One customer turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    Text(String),
    /// An option token or a [`selection`] constant.
    Selection(String),
}

/// What to send back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Options { text: String, options: Vec<ChoiceOption> },
}

impl Reply {
    pub fn text(&self) -> &str {
        match self {
            Reply::Text(text) | Reply::Options { text, .. } => text,
        }
    }

    pub fn options(&self) -> &[ChoiceOption] {
        match self {
            Reply::Text(_) => &[],
            Reply::Options { options, .. } => options,
        }
    }
}

/// Outbound side of the transport.
pub trait MessageSink: Send + Sync {
    fn send(&self, customer: &str, reply: &Reply) -> Result<(), SendError>;
}

pub struct OrderBot {
    menu: Arc<CatalogStore>,
    priced: Option<Arc<CatalogStore>>,
    sessions: Arc<dyn SessionStore>,
    sink: Arc<dyn OrderSink>,
    numbers: OrderNumbers,
    hours: StoreHours,
    options: Options,
    store_name: String,
    phone: Option<String>,
    map_url: Option<String>,
    foodpanda_url: Option<String>,
    customer_name_prefix: String,
}

impl std::fmt::Debug for OrderBot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderBot")
            .field("menu", &self.menu)
            .field("priced", &self.priced)
            .field("sessions", &"<dyn SessionStore>")
            .field("sink", &"<dyn OrderSink>")
            .field("hours", &self.hours)
            .finish()
    }
}

impl OrderBot {
    pub fn new(menu: Arc<CatalogStore>, sessions: Arc<dyn SessionStore>, sink: Arc<dyn OrderSink>) -> Self {
        let hours = StoreHours::default();
        OrderBot {
            menu,
            priced: None,
            sessions,
            sink,
            numbers: OrderNumbers::new("FB", hours.offset),
            hours,
            options: Options::default(),
            store_name: "our restaurant".to_string(),
            phone: None,
            map_url: None,
            foodpanda_url: None,
            customer_name_prefix: DEFAULT_CUSTOMER_NAME_PREFIX.to_string(),
        }
    }

    /// Build a bot configured from `settings`.
    pub fn from_settings(
        settings: &Settings,
        menu: Arc<CatalogStore>,
        sessions: Arc<dyn SessionStore>,
        sink: Arc<dyn OrderSink>,
    ) -> Result<Self, SettingsError> {
        let hours = settings.store_hours()?;
        let mut bot = OrderBot::new(menu, sessions, sink);
        bot.numbers = OrderNumbers::new(settings.orders.number_prefix.clone(), hours.offset);
        bot.hours = hours;
        bot.options = settings.options();
        bot.store_name = settings.store.name.clone();
        bot.phone = settings.store.phone.clone();
        bot.map_url = settings.store.map_url.clone();
        bot.foodpanda_url = settings.store.foodpanda_url.clone();
        bot.customer_name_prefix = settings.orders.customer_name_prefix.clone();
        Ok(bot)
    }

    /// Price against a separate catalog instead of the menu.
    pub fn with_priced_catalog(mut self, priced: Arc<CatalogStore>) -> Self {
        self.priced = Some(priced);
        self
    }

    pub fn with_hours(mut self, hours: StoreHours) -> Self {
        self.numbers = OrderNumbers::new(self.numbers.prefix(), hours.offset);
        self.hours = hours;
        self
    }

    pub fn hours(&self) -> &StoreHours {
        &self.hours
    }

    /// Reload every catalog unconditionally.
    pub fn reload_catalogs(&self) {
        self.menu.force_reload();
        if let Some(priced) = &self.priced {
            priced.force_reload();
        }
    }

    /// Handle one turn and send the reply through `out`.
    pub fn dispatch(&self, customer: &str, inbound: Inbound, out: &dyn MessageSink) -> Result<(), SendError> {
        let reply = self.handle(customer, inbound);
        out.send(customer, &reply)
    }

    pub fn handle(&self, customer: &str, inbound: Inbound) -> Reply {
        self.handle_at(customer, inbound, Utc::now())
    }

    /// [`OrderBot::handle`] at a given instant.
    pub fn handle_at(&self, customer: &str, inbound: Inbound, now: DateTime<Utc>) -> Reply {
        let mut state = self.sessions.load(customer);
        let reply = self.turn(customer, &mut state, inbound, now);
        self.sessions.save(customer, state);
        reply
    }

    fn turn(&self, customer: &str, state: &mut ConversationState, inbound: Inbound, now: DateTime<Utc>) -> Reply {
        match inbound {
            Inbound::Selection(token) => self.on_selection(customer, state, &token, now),
            Inbound::Text(text) => match state.mode {
                Mode::Idle => self.on_idle_text(customer, state, &text, now),
                Mode::AwaitingOrder => self.on_order_text(customer, state, &text, now),
                Mode::AwaitingVariation => {
                    let menu = self.menu.snapshot();
                    let step = VariationResolver::with_options(&menu, &self.options).reply(state, &text);
                    self.on_step(customer, state, step, now)
                }
            },
        }
    }

    fn on_selection(&self, customer: &str, state: &mut ConversationState, token: &str, now: DateTime<Utc>) -> Reply {
        match token {
            selection::START_ORDER => {
                *state = ConversationState::awaiting_order();
                Reply::Text(ORDER_PROMPT.to_string())
            }
            selection::HOURS => self.main_options(format!("{}\n\nBrowse our menu to place your order! 🍽️", self.hours.message(now))),
            selection::MENU => self.menu_options(),
            selection::LOCATION => self.location(),
            selection::CONTACT => self.contact(),
            selection::FOODPANDA => match &self.foodpanda_url {
                Some(url) => self.main_options(format!(
                    "🛵 Tap below to order via Foodpanda:\n{url}\n\nOr browse our menu categories to order directly! 🍽️"
                )),
                None => self.welcome(),
            },
            _ if token.starts_with(selection::CATEGORY_PREFIX) => {
                let id = &token[selection::CATEGORY_PREFIX.len()..];
                match self.menu.snapshot().describe_category(id) {
                    Some(listing) => self.main_options(listing),
                    None => Reply::Text("Category not found. Please try again.".to_string()),
                }
            }
            _ if state.mode == Mode::AwaitingVariation => {
                let menu = self.menu.snapshot();
                let step = VariationResolver::with_options(&menu, &self.options).select(state, token);
                self.on_step(customer, state, step, now)
            }
            _ if state.mode == Mode::AwaitingOrder => Reply::Text(ORDER_PROMPT.to_string()),
            _ => {
                tracing::debug!(customer, token, "unknown selection");
                self.welcome()
            }
        }
    }

    fn on_idle_text(&self, customer: &str, state: &mut ConversationState, text: &str, now: DateTime<Utc>) -> Reply {
        self.menu.refresh();
        let menu = self.menu.snapshot();
        let validation = Matcher::with_options(&menu, &self.options).validate(text);

        if matches!(validation.reason, Reason::Recognized(_)) {
            tracing::debug!(customer, "order text outside the order flow");
            return self.begin_order(customer, state, &menu, text, now);
        }
        if mentions_hours(text) {
            return Reply::Text(self.hours.message(now));
        }
        self.welcome()
    }

    fn on_order_text(&self, customer: &str, state: &mut ConversationState, text: &str, now: DateTime<Utc>) -> Reply {
        if is_cancel(text) {
            state.reset();
            return Reply::Text(CANCELLED.to_string());
        }

        self.menu.refresh();
        let menu = self.menu.snapshot();
        let validation = Matcher::with_options(&menu, &self.options).validate(text);
        if !validation.is_order {
            tracing::debug!(customer, reason = %validation.reason, "order text rejected");
            let prompt = match validation.reason {
                Reason::LooksLikeQuestion => QUESTION_REPROMPT,
                Reason::NoRecognizedItems => NO_ITEMS_REPROMPT,
                _ => ORDER_PROMPT,
            };
            return Reply::Text(prompt.to_string());
        }
        if validation.reason == Reason::CatalogUnavailable {
            tracing::warn!(customer, "menu unavailable, accepting order text unvalidated");
        }

        self.begin_order(customer, state, &menu, text, now)
    }

    fn begin_order(
        &self,
        customer: &str,
        state: &mut ConversationState,
        menu: &Catalog,
        text: &str,
        now: DateTime<Utc>,
    ) -> Reply {
        // A priced total of zero against a real menu is never a valid order.
        if !menu.is_empty() && Matcher::with_options(menu, &self.options).find_candidates(text).is_empty() {
            tracing::debug!(customer, "validated text yielded no candidates");
            *state = ConversationState::awaiting_order();
            return Reply::Text(NO_ITEMS_REPROMPT.to_string());
        }

        let step = VariationResolver::with_options(menu, &self.options).begin(state, text);
        self.on_step(customer, state, step, now)
    }

    fn on_step(&self, customer: &str, state: &mut ConversationState, step: Step, now: DateTime<Utc>) -> Reply {
        match step {
            Step::Ask(prompt) => Reply::Options { text: format!("{}\nType cancel to stop.", prompt.text), options: prompt.options },
            Step::Cancelled => Reply::Text(CANCELLED.to_string()),
            Step::Complete(final_text) => self.finalize(customer, state, &final_text, now),
        }
    }

    fn finalize(&self, customer: &str, state: &mut ConversationState, final_text: &str, now: DateTime<Utc>) -> Reply {
        state.reset();

        self.menu.refresh();
        let menu = self.menu.snapshot();
        let priced = match &self.priced {
            Some(store) => {
                store.refresh();
                store.snapshot()
            }
            None => Arc::clone(&menu),
        };

        let record = OrderAssembler::with_options(&menu, &priced, &self.numbers, &self.options)
            .with_customer_name_prefix(self.customer_name_prefix.clone())
            .assemble_at(customer, final_text, now);

        match self.sink.persist(&record) {
            Ok(()) => {
                tracing::info!(order = %record.order_number, total = record.estimated_total, "order persisted");
                self.main_options(self.confirmation(&record, now))
            }
            Err(err) => {
                tracing::warn!(customer, error = %err, "failed to persist order");
                self.main_options(PERSIST_FAILED.to_string())
            }
        }
    }

    fn confirmation(&self, record: &OrderRecord, now: DateTime<Utc>) -> String {
        let mut text = format!("✅ Order Confirmed!\n\nOrder Number: {}\n\n", record.order_number);
        if record.line_items.is_empty() {
            let _ = write!(text, "Order: {}\n\n", record.raw_text.trim());
        } else {
            for line in &record.line_items {
                let _ = writeln!(text, "• {}× {} - ₱{}", line.quantity, line.name, line.line_total);
            }
            text.push('\n');
        }
        if record.estimated_total > 0 {
            let _ = write!(text, "Total: ₱{}\n\n", record.estimated_total);
        }
        let _ = write!(text, "{}\n\nThank you for ordering with us!", self.hours.pickup_note(now));
        text
    }

    fn welcome(&self) -> Reply {
        let mut text = format!("Hi! Welcome to {}! 🍽️\n\nType your order or choose an option below.", self.store_name);
        if let Some(phone) = &self.phone {
            let _ = write!(text, "\n\nFor quick orders, call us at {phone}.");
        }
        self.main_options(text)
    }

    fn location(&self) -> Reply {
        match &self.map_url {
            Some(url) => self.main_options(format!(
                "📍 Tap below to view our location:\n{url}\n\nVisit us soon! We'd love to serve you! 🍽️"
            )),
            None => self.main_options("Sorry, our location is not available right now.".to_string()),
        }
    }

    fn contact(&self) -> Reply {
        match &self.phone {
            Some(phone) => {
                self.main_options(format!("📞 Contact us: {phone}\n\nCall us for quick orders or browse our menu! 🍽️"))
            }
            None => self.main_options("Message us here anytime, or browse our menu to order! 🍽️".to_string()),
        }
    }

    fn main_options(&self, text: String) -> Reply {
        let mut options = vec![
            ChoiceOption { label: "🛒 Order Now".to_string(), token: selection::START_ORDER.to_string() },
            ChoiceOption { label: "📋 Menu".to_string(), token: selection::MENU.to_string() },
            ChoiceOption { label: "🕐 Hours".to_string(), token: selection::HOURS.to_string() },
            ChoiceOption { label: "📍 Location".to_string(), token: selection::LOCATION.to_string() },
            ChoiceOption { label: "📞 Contact Us".to_string(), token: selection::CONTACT.to_string() },
        ];
        if self.foodpanda_url.is_some() {
            options.push(ChoiceOption { label: "🛵 Foodpanda".to_string(), token: selection::FOODPANDA.to_string() });
        }
        Reply::Options { text, options }
    }

    fn menu_options(&self) -> Reply {
        self.menu.refresh();
        let menu = self.menu.snapshot();
        if menu.categories().is_empty() {
            return Reply::Text("Our menu is not available right now. Please type your order instead.".to_string());
        }
        let options = menu
            .categories()
            .iter()
            .filter(|c| !c.items.is_empty())
            .map(|c| ChoiceOption { label: c.name.clone(), token: format!("{}{}", selection::CATEGORY_PREFIX, c.id) })
            .collect();
        Reply::Options { text: "📋 Our Menu\n\nChoose a category:".to_string(), options }
    }
}

fn mentions_hours(text: &str) -> bool {
    crate::regex!(r"(?i)\b(open|opening|close|closing|closed|hours?)\b").is_match(text)
}

#[cfg(test)]
#[path = "bot/tests.rs"]
mod tests;
