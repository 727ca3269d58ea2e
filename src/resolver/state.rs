use crate::Span;
use crate::catalog::Variation;

/// Where a customer is in the order flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Idle,
    /// Asked for order text, waiting for it.
    AwaitingOrder,
    /// Asked to pick a variation for `pending_variation_items[current_variation_index]`.
    AwaitingVariation,
}

/// A base item mentioned without a variation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingItem {
    /// Catalog display name.
    pub name: String,
    /// The options offered, in catalog order.
    pub options: Vec<Variation>,
    /// Where the mention sits in `working_order_text`.
    pub span: Span,
    /// The mention spells the item name, so appending the bare label is enough
    /// for a later matching pass to see the variation.
    pub spelled_out: bool,
}

/// Per-customer conversation state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationState {
    pub mode: Mode,
    /// Text as the customer first typed it.
    pub raw_order_text: String,
    pub pending_variation_items: Vec<PendingItem>,
    pub current_variation_index: usize,
    /// `raw_order_text` with the chosen variations written in so far.
    pub working_order_text: String,
}

impl ConversationState {
    pub fn awaiting_order() -> Self {
        ConversationState { mode: Mode::AwaitingOrder, ..Default::default() }
    }

    pub fn is_idle(&self) -> bool {
        self.mode == Mode::Idle
    }

    pub fn current_item(&self) -> Option<&PendingItem> {
        if self.mode != Mode::AwaitingVariation {
            return None;
        }
        self.pending_variation_items.get(self.current_variation_index)
    }

    pub fn reset(&mut self) {
        *self = ConversationState::default();
    }
}
