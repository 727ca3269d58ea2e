//! Variation resolution dialog.
//!
//! Items with more than one variation need a choice before they can be priced.
//! The resolver asks for them one at a time:
//!
//! ```text
//!            begin(text)                       select(var:i:j)
//! Idle ───────────────────────> AwaitingVariation ─────────────┐
//!   ^   no ambiguous items:           │    ^                   │ more items:
//!   │   Complete(text)                │    └───────────────────┘ Ask(next)
//!   │                                 │
//!   ├──── cancel keyword ─────────────┤
//!   │     Cancelled                   │ last item chosen:
//!   └─────────────────────────────────┘ Complete(working text)
//! ```
//!
//! Pending items are queued longest name first; an item whose name is part of
//! an already queued name is skipped. A selection writes ` (<label>)` after the
//! item's first mention in the working text, so a later matching pass over the
//! final text sees the variation.
//!
//! Selections arrive as option tokens (`var:<item>:<option>`); free text while
//! a choice is pending just repeats the prompt.

#[path = "resolver/session.rs"]
mod session;
#[path = "resolver/state.rs"]
mod state;

pub use session::{InMemorySessionStore, SessionStore};
pub use state::{ConversationState, Mode, PendingItem};

use crate::api::{MatchCandidate, Options};
use crate::catalog::{Catalog, Variation};
use crate::engine::{Matcher, normalize};
use crate::{MatchStrength, Span};
use std::fmt::Write as _;

/// Words that abandon the order flow.
pub const CANCEL_KEYWORDS: &[&str] = &["cancel", "stop", "quit", "exit", "no", "nevermind", "never mind"];

/// True when the whole message is a cancel keyword (case and surrounding
/// punctuation ignored).
pub fn is_cancel(text: &str) -> bool {
    let cleaned = text.trim().trim_matches(|c: char| c.is_ascii_punctuation() || c.is_whitespace()).to_lowercase();
    CANCEL_KEYWORDS.contains(&cleaned.as_str())
}

/// A selectable option: what the customer sees and the token sent back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceOption {
    pub label: String,
    pub token: String,
}

/// A variation question for one pending item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub item: String,
    /// 1-based position among the pending items.
    pub position: usize,
    pub total: usize,
    pub options: Vec<ChoiceOption>,
    pub text: String,
}

/// Result of feeding one input to the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Every variation is known; the text is ready for pricing.
    Complete(String),
    /// A choice is needed (or the last input did not answer the question).
    Ask(Prompt),
    /// The customer abandoned the order.
    Cancelled,
}

#[derive(Debug)]
pub struct VariationResolver<'a> {
    matcher: Matcher<'a>,
}

impl<'a> VariationResolver<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self::with_options(catalog, &Options::default())
    }

    pub fn with_options(catalog: &'a Catalog, options: &Options) -> Self {
        VariationResolver { matcher: Matcher::with_options(catalog, options) }
    }

    /// Start resolving `text`. Without ambiguous items the text comes back
    /// unchanged and `state` is left idle.
    pub fn begin(&self, state: &mut ConversationState, text: &str) -> Step {
        let candidates = self.matcher.find_candidates(text);
        let pending = self.pending_items(text, &candidates);

        if pending.is_empty() {
            state.reset();
            return Step::Complete(text.to_string());
        }

        tracing::debug!(items = pending.len(), "order needs variation choices");
        *state = ConversationState {
            mode: Mode::AwaitingVariation,
            raw_order_text: text.to_string(),
            pending_variation_items: pending,
            current_variation_index: 0,
            working_order_text: text.to_string(),
        };
        self.ask(state)
    }

    /// Apply an option token to the pending question.
    pub fn select(&self, state: &mut ConversationState, token: &str) -> Step {
        let Some(item) = state.current_item() else {
            return Step::Complete(state.working_order_text.clone());
        };

        let chosen = parse_option_token(token)
            .filter(|&(i, _)| i == state.current_variation_index)
            .and_then(|(_, j)| item.options.get(j));
        let Some(variation) = chosen else {
            tracing::debug!(token, "stale or unknown option token");
            return self.ask(state);
        };

        let insertion = if item.spelled_out {
            format!(" ({})", variation.label)
        } else {
            format!(" ({} {})", item.name, variation.label)
        };
        let at = item.span.end;
        state.working_order_text.insert_str(at, &insertion);
        shift_spans(&mut state.pending_variation_items, at, insertion.len());
        state.current_variation_index += 1;

        if state.current_variation_index < state.pending_variation_items.len() {
            return self.ask(state);
        }

        let final_text = std::mem::take(&mut state.working_order_text);
        state.reset();
        Step::Complete(final_text)
    }

    /// Free text while a choice is pending: cancel or ask again.
    pub fn reply(&self, state: &mut ConversationState, text: &str) -> Step {
        if is_cancel(text) {
            state.reset();
            return Step::Cancelled;
        }
        self.ask(state)
    }

    /// The prompt for the current pending item.
    pub fn ask(&self, state: &ConversationState) -> Step {
        match state.current_item() {
            Some(item) => Step::Ask(prompt_for(
                item,
                state.current_variation_index,
                state.pending_variation_items.len(),
            )),
            None => Step::Complete(state.working_order_text.clone()),
        }
    }

    fn pending_items(&self, text: &str, candidates: &[MatchCandidate]) -> Vec<PendingItem> {
        let mut ambiguous: Vec<&MatchCandidate> = candidates.iter().filter(|c| c.needs_variation()).collect();
        ambiguous.sort_by(|a, b| {
            b.base_item_name.len().cmp(&a.base_item_name.len()).then(a.source_span.start.cmp(&b.source_span.start))
        });

        let mut queued: Vec<PendingItem> = Vec::with_capacity(ambiguous.len());
        for candidate in ambiguous {
            let name = candidate.base_item_name.to_lowercase();
            if queued.iter().any(|q| q.name.to_lowercase().contains(&name)) {
                tracing::debug!(item = %candidate.base_item_name, "already covered by a queued item");
                continue;
            }
            let Some(item) = self.matcher.catalog().find_item(&candidate.base_item_name) else {
                continue;
            };
            queued.push(PendingItem {
                name: item.name.clone(),
                options: item.variations.clone(),
                span: candidate.source_span,
                spelled_out: spells_name(text, candidate.source_span, &item.name, candidate.strength),
            });
        }
        queued
    }
}

/// Token for option `option` of pending item `item`.
pub fn option_token(item: usize, option: usize) -> String {
    format!("var:{item}:{option}")
}

fn parse_option_token(token: &str) -> Option<(usize, usize)> {
    let (item, option) = token.trim().strip_prefix("var:")?.split_once(':')?;
    Some((item.parse().ok()?, option.parse().ok()?))
}

fn spells_name(text: &str, span: Span, name: &str, strength: MatchStrength) -> bool {
    strength != MatchStrength::WordOverlap
        && text.get(span.start..span.end).is_some_and(|mention| normalize(mention) == normalize(name))
}

fn shift_spans(items: &mut [PendingItem], at: usize, by: usize) {
    for item in items {
        if item.span.start >= at {
            item.span.start += by;
            item.span.end += by;
        }
    }
}

fn prompt_for(item: &PendingItem, index: usize, total: usize) -> Prompt {
    let mut text = format!("🍽️ {} (item {} of {})\n\nChoose a variation:\n\n", item.name, index + 1, total);
    for variation in &item.options {
        let _ = writeln!(text, "• {}: ₱{}", variation.label, variation.price);
    }
    Prompt {
        item: item.name.clone(),
        position: index + 1,
        total,
        options: item.options.iter().enumerate().map(|(j, v)| choice(index, j, v)).collect(),
        text,
    }
}

fn choice(item: usize, option: usize, variation: &Variation) -> ChoiceOption {
    ChoiceOption { label: format!("{} - ₱{}", variation.label, variation.price), token: option_token(item, option) }
}
