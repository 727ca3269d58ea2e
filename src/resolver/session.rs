//! Per-customer session storage.
//!
//! The conversation engine never holds state between turns itself; it loads
//! the customer's [`ConversationState`] from a [`SessionStore`] at the start of
//! a turn and saves it back at the end.
//!
//! - `InMemorySessionStore` - sharded concurrent map, the default.
//!
//! Idle states are not stored: saving an idle state removes the entry, so the
//! map only holds customers that are mid-flow.

use super::state::ConversationState;
use dashmap::DashMap;

/// Session store trait for pluggable backends.
pub trait SessionStore: Send + Sync {
    /// The customer's state, `Idle` when none is stored.
    fn load(&self, customer: &str) -> ConversationState;

    /// Store `state`; an idle state removes the entry.
    fn save(&self, customer: &str, state: ConversationState);

    fn clear(&self, customer: &str);
}

/// In-memory session store.
///
/// Per-key operations on different customers do not contend beyond the
/// shard they hash to.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: DashMap<String, ConversationState>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of customers currently mid-flow.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl SessionStore for InMemorySessionStore {
    fn load(&self, customer: &str) -> ConversationState {
        self.sessions.get(customer).map(|s| s.value().clone()).unwrap_or_default()
    }

    fn save(&self, customer: &str, state: ConversationState) {
        if state.is_idle() {
            self.sessions.remove(customer);
        } else {
            self.sessions.insert(customer.to_string(), state);
        }
    }

    fn clear(&self, customer: &str) {
        self.sessions.remove(customer);
    }
}
