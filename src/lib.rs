//! Dark/light theme controller for the static site pages.
//!
//! This crate is compiled to WebAssembly and loaded by every page's bootstrap
//! script. It decides whether the page shows the dark or the light palette,
//! reconciling an explicit choice, the choice persisted on an earlier visit and
//! the operating system preference, then mirrors that decision into the root
//! `dark-mode` class, the toggle icon and label, the toggle's ARIA attributes,
//! and a `themeChange` notification for any other script that cares.
//!
//! Everything except `web` is plain Rust and tested without a browser.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`theme`] | `ThemeState` and `PersistedPreference` |
//! | [`resolve`](mod@resolve) | Pure precedence function |
//! | [`store`] | Persisted preference adapter and backends |
//! | [`sync`] | Indicator plan, page surface, synchronizer |
//! | [`events`] | `ThemeChange` payload and subscriber bus |
//! | [`controller`] | Controller, input hub, idempotent initialization |
//! | [`config`] | Storage key, element ids, classes and labels |
//! | `web` | Browser bindings and the exported `DarkMode` class (`hydrate`) |

pub mod config;
pub mod controller;
pub mod events;
pub mod resolve;
pub mod store;
pub mod sync;
pub mod theme;
#[cfg(feature = "hydrate")]
pub mod web;

pub use config::{ConfigError, ThemeConfig};
pub use controller::{InputHub, ManualSignal, SystemPreference, ThemeController, ThemeHandle};
pub use events::{SubscriptionId, ThemeBus, ThemeChange};
pub use resolve::resolve;
pub use store::{MemoryBackend, PreferenceBackend, PreferenceStore, StoreError};
pub use sync::{MemorySurface, PageSurface, SyncPlan, Synchronizer};
pub use theme::{PersistedPreference, ThemeState};
