//! Theme precedence.
//!
//! Highest first: explicit override, persisted preference, live system
//! signal, then light. Every input combination maps to exactly one state.

#[cfg(test)]
#[path = "resolve_test.rs"]
mod resolve_test;

use crate::theme::{PersistedPreference, ThemeState};

/// Decide which mode the page should display.
///
/// `system_prefers_dark` is `None` when the environment cannot report a
/// color-scheme preference. `explicit_override` is only ever supplied by a
/// direct programmatic set.
#[must_use]
pub fn resolve(
    persisted: PersistedPreference,
    system_prefers_dark: Option<bool>,
    explicit_override: Option<bool>,
) -> ThemeState {
    if let Some(forced) = explicit_override {
        return ThemeState::from_dark(forced);
    }
    if let Some(stored) = persisted.state() {
        return stored;
    }
    system_prefers_dark.map_or(ThemeState::Light, ThemeState::from_dark)
}
