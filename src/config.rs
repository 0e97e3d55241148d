//! Theme controller configuration.
//!
//! Defaults match the site markup: one `#theme-toggle` button holding a
//! `#theme-icon` Bootstrap icon and a `#theme-text` label, a `dark-mode`
//! class on `<html>`, and the choice stored under `theme`. Pages can override
//! any field with a JSON object; omitted fields keep their defaults.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::Deserialize;

pub const DEFAULT_STORAGE_KEY: &str = "theme";
pub const DEFAULT_MEDIA_QUERY: &str = "(prefers-color-scheme: dark)";
pub const DEFAULT_EVENT_NAME: &str = "themeChange";

/// Error returned by [`ThemeConfig::from_json`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid theme config JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// A field that names a key, id, class or event was blank.
    #[error("theme config field `{0}` must not be empty")]
    EmptyField(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ThemeConfig {
    /// Storage key for the persisted choice.
    pub storage_key: String,
    /// Media query reporting the OS dark preference.
    pub media_query: String,
    /// Element id shared by every toggle control.
    pub toggle_id: String,
    /// Element id shared by every icon indicator.
    pub icon_id: String,
    /// Element id shared by every text label indicator.
    pub label_id: String,
    /// Class set on the document root while dark.
    pub root_class: String,
    /// Icon class list while dark (offers the sun, i.e. "go light").
    pub dark_icon_class: String,
    /// Icon class list while light.
    pub light_icon_class: String,
    /// Label text while dark. Labels announce the action, not the state.
    pub dark_label: String,
    pub light_label: String,
    /// Toggle `aria-label`/`title` while dark.
    pub dark_action: String,
    pub light_action: String,
    /// Name of the DOM event dispatched on `document` after every change.
    pub event_name: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.into(),
            media_query: DEFAULT_MEDIA_QUERY.into(),
            toggle_id: "theme-toggle".into(),
            icon_id: "theme-icon".into(),
            label_id: "theme-text".into(),
            root_class: "dark-mode".into(),
            dark_icon_class: "bi bi-sun".into(),
            light_icon_class: "bi bi-moon".into(),
            dark_label: "Light Mode".into(),
            light_label: "Dark Mode".into(),
            dark_action: "Switch to light mode".into(),
            light_action: "Switch to dark mode".into(),
            event_name: DEFAULT_EVENT_NAME.into(),
        }
    }
}

impl ThemeConfig {
    /// Parse a JSON override object on top of the defaults.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject blank identifiers that would make selectors or storage keys meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("storageKey", &self.storage_key),
            ("mediaQuery", &self.media_query),
            ("toggleId", &self.toggle_id),
            ("iconId", &self.icon_id),
            ("labelId", &self.label_id),
            ("rootClass", &self.root_class),
            ("eventName", &self.event_name),
        ];
        match required.into_iter().find(|(_, value)| value.trim().is_empty()) {
            Some((name, _)) => Err(ConfigError::EmptyField(name)),
            None => Ok(()),
        }
    }

    /// CSS selector matching every element carrying `id`.
    ///
    /// The id is written as a quoted CSS string, so quotes and backslashes in
    /// it are escaped.
    #[must_use]
    pub fn id_selector(id: &str) -> String {
        let mut selector = String::with_capacity(id.len() + 7);
        selector.push_str("[id=\"");
        for ch in id.chars() {
            if matches!(ch, '"' | '\\') {
                selector.push('\\');
            }
            selector.push(ch);
        }
        selector.push_str("\"]");
        selector
    }
}
