//! Theme change notifications.
//!
//! Unrelated page code (charts, embeds) re-themes itself by subscribing here
//! or, in the browser, by listening for the `themeChange` DOM event that the
//! web binding forwards from this bus.

#[cfg(test)]
#[path = "events_test.rs"]
mod events_test;

use serde::{Deserialize, Serialize};

use crate::theme::ThemeState;

/// Payload delivered after every applied theme change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeChange {
    pub is_dark: bool,
}

impl From<ThemeState> for ThemeChange {
    fn from(state: ThemeState) -> Self {
        Self { is_dark: state.is_dark() }
    }
}

/// Handle returned by [`ThemeBus::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(ThemeChange)>;

/// Subscriber registry; delivery follows registration order.
#[derive(Default)]
pub struct ThemeBus {
    next_id: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
}

impl std::fmt::Debug for ThemeBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeBus").field("listeners", &self.listeners.len()).finish()
    }
}

impl ThemeBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. The same closure may be registered more than once.
    pub fn subscribe(&mut self, listener: impl FnMut(ThemeChange) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener; returns whether it was registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn emit(&mut self, change: ThemeChange) {
        for (_, listener) in &mut self.listeners {
            listener(change);
        }
    }
}
