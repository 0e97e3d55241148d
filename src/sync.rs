//! Projection of the theme state onto the page.
//!
//! DESIGN
//! ======
//! A `SyncPlan` is computed up front for the whole indicator set and handed to
//! the surface in one call, so synchronous inspection never sees the root flag
//! and the indicators disagree. `apply` hands back the resulting
//! `ThemeChange` instead of announcing it, so the owner can deliver it once
//! nothing is borrowed any more.

#[cfg(test)]
#[path = "sync_test.rs"]
mod sync_test;

use crate::config::ThemeConfig;
use crate::events::ThemeChange;
use crate::theme::ThemeState;

/// Indicator values for one theme state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyncPlan {
    pub state: ThemeState,
    /// Class toggled on the document root; present iff dark.
    pub root_class: String,
    /// Icon classes added for this state.
    pub icon_on: Vec<String>,
    /// Icon classes of the other state removed for this one; classes shared by
    /// both states and unrelated utility classes stay put.
    pub icon_off: Vec<String>,
    /// Text for every label indicator.
    pub label: String,
    /// `aria-pressed` for every toggle control.
    pub aria_pressed: &'static str,
    /// `aria-label` and `title` for every toggle control (the next action).
    pub action_label: String,
}

impl SyncPlan {
    #[must_use]
    pub fn for_state(state: ThemeState, config: &ThemeConfig) -> Self {
        let dark = state.is_dark();
        let pick = |when_dark: &str, when_light: &str| {
            if dark { when_dark.to_owned() } else { when_light.to_owned() }
        };
        let (active, inactive) = if dark {
            (&config.dark_icon_class, &config.light_icon_class)
        } else {
            (&config.light_icon_class, &config.dark_icon_class)
        };
        let icon_on: Vec<String> = active.split_whitespace().map(str::to_owned).collect();
        let icon_off = inactive
            .split_whitespace()
            .filter(|token| !icon_on.iter().any(|on| on == token))
            .map(str::to_owned)
            .collect();
        Self {
            state,
            root_class: config.root_class.clone(),
            icon_on,
            icon_off,
            label: pick(&config.dark_label, &config.light_label),
            aria_pressed: if dark { "true" } else { "false" },
            action_label: pick(&config.dark_action, &config.light_action),
        }
    }

    #[must_use]
    pub fn root_flag(&self) -> bool {
        self.state.is_dark()
    }

    /// Apply the icon switch to a space-separated class list.
    #[must_use]
    pub fn switch_icon_classes(&self, class_list: &str) -> String {
        let mut classes: Vec<&str> = class_list
            .split_whitespace()
            .filter(|class| !self.icon_off.iter().any(|off| off == class))
            .collect();
        for on in &self.icon_on {
            if !classes.contains(&on.as_str()) {
                classes.push(on);
            }
        }
        classes.join(" ")
    }
}

/// Page elements that mirror the theme. Absent elements are skipped silently.
pub trait PageSurface {
    fn apply(&mut self, plan: &SyncPlan);
}

/// Attributes of one toggle control.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ToggleAttrs {
    pub aria_pressed: String,
    pub aria_label: String,
    pub title: String,
}

/// In-memory page: a root flag plus any number of each indicator kind.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemorySurface {
    pub root_dark: bool,
    pub icons: Vec<String>,
    pub labels: Vec<String>,
    pub toggles: Vec<ToggleAttrs>,
    /// Number of plans applied.
    pub writes: usize,
}

impl MemorySurface {
    /// Page with the given number of toggles, icons and labels.
    #[must_use]
    pub fn with_indicators(toggles: usize, icons: usize, labels: usize) -> Self {
        Self {
            toggles: vec![ToggleAttrs::default(); toggles],
            icons: vec![String::new(); icons],
            labels: vec![String::new(); labels],
            ..Self::default()
        }
    }
}

impl PageSurface for MemorySurface {
    fn apply(&mut self, plan: &SyncPlan) {
        self.root_dark = plan.root_flag();
        for icon in &mut self.icons {
            *icon = plan.switch_icon_classes(icon);
        }
        for label in &mut self.labels {
            label.clone_from(&plan.label);
        }
        for toggle in &mut self.toggles {
            toggle.aria_pressed = plan.aria_pressed.to_owned();
            toggle.aria_label.clone_from(&plan.action_label);
            toggle.title.clone_from(&plan.action_label);
        }
        self.writes += 1;
    }
}

/// Applies states to a surface and reports changes.
#[derive(Debug)]
pub struct Synchronizer<S> {
    surface: S,
    config: ThemeConfig,
    current: Option<ThemeState>,
}

impl<S: PageSurface> Synchronizer<S> {
    pub fn new(surface: S, config: ThemeConfig) -> Self {
        Self { surface, config, current: None }
    }

    /// Last applied state; `None` before the first apply.
    #[must_use]
    pub fn current(&self) -> Option<ThemeState> {
        self.current
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Write `state` to every indicator.
    ///
    /// Indicators are rewritten on every call. Returns the change to announce
    /// on the first apply and on actual changes; `None` otherwise.
    pub fn apply(&mut self, state: ThemeState) -> Option<ThemeChange> {
        let plan = SyncPlan::for_state(state, &self.config);
        self.surface.apply(&plan);
        let changed = self.current != Some(state);
        self.current = Some(state);
        log::debug!("theme indicators updated: {}", state.as_str());
        changed.then(|| ThemeChange::from(state))
    }
}
