//! Theme model: the displayed mode and the persisted user choice.
//!
//! `ThemeState` is what the page shows. `PersistedPreference` is what the
//! visitor explicitly asked for on an earlier visit, if anything. The two are
//! kept apart so "nothing stored" can never be confused with "light".

#[cfg(test)]
#[path = "theme_test.rs"]
mod theme_test;

/// The resolved binary display mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ThemeState {
    /// Light palette (fallback when nothing is known).
    #[default]
    Light,
    /// Dark palette.
    Dark,
}

impl ThemeState {
    /// Map a `prefers dark` boolean to a state.
    #[must_use]
    pub fn from_dark(is_dark: bool) -> Self {
        if is_dark { Self::Dark } else { Self::Light }
    }

    #[must_use]
    pub fn is_dark(self) -> bool {
        matches!(self, Self::Dark)
    }

    /// The opposite mode.
    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Storage token for this state (`"light"` / `"dark"`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Parse a storage token. Case-insensitive, surrounding whitespace ignored.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let token = raw.trim();
        if token.eq_ignore_ascii_case("dark") {
            Some(Self::Dark)
        } else if token.eq_ignore_ascii_case("light") {
            Some(Self::Light)
        } else {
            None
        }
    }
}

/// Durable visitor choice as seen through the preference store.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PersistedPreference {
    /// Nothing stored, storage unavailable, or an unrecognized value.
    #[default]
    Unset,
    Light,
    Dark,
}

impl PersistedPreference {
    /// Interpret a raw stored value; anything unrecognized reads as `Unset`.
    #[must_use]
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw.and_then(ThemeState::parse) {
            Some(state) => Self::from(state),
            None => Self::Unset,
        }
    }

    /// The stored state, if the visitor made a choice.
    #[must_use]
    pub fn state(self) -> Option<ThemeState> {
        match self {
            Self::Unset => None,
            Self::Light => Some(ThemeState::Light),
            Self::Dark => Some(ThemeState::Dark),
        }
    }

    #[must_use]
    pub fn is_unset(self) -> bool {
        matches!(self, Self::Unset)
    }
}

impl From<ThemeState> for PersistedPreference {
    fn from(state: ThemeState) -> Self {
        match state {
            ThemeState::Light => Self::Light,
            ThemeState::Dark => Self::Dark,
        }
    }
}
