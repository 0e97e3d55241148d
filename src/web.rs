//! Browser bindings for the theme controller.
//!
//! Backs the portable controller with `localStorage`, `matchMedia` and the
//! live DOM, and exports a `DarkMode` class to the page's bootstrap script:
//!
//! ```js
//! import init, { DarkMode } from "./pkg/site_theme.js";
//! await init();
//! const theme = new DarkMode();
//! theme.initialize();
//! ```
//!
//! TRADE-OFFS
//! ==========
//! Event listeners stay registered for the page lifetime, so their closures
//! are leaked with `Closure::forget`. Toggle clicks are caught by one
//! delegated listener on `document`; toggles inserted later still work and no
//! element can end up with two listeners.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::{JsCast, closure::Closure};
use web_sys::{CustomEvent, CustomEventInit, Document, Element, Event, MediaQueryList, MediaQueryListEvent, Storage};

use crate::config::ThemeConfig;
use crate::controller::{InputHub, SystemPreference, ThemeController, ThemeHandle};
use crate::events::ThemeChange;
use crate::store::{PreferenceBackend, StoreError};
use crate::sync::{PageSurface, SyncPlan};
use crate::theme::ThemeState;

type WebHandle = ThemeHandle<LocalStorageBackend, MediaQuerySignal, DomSurface>;

fn document() -> Option<Document> {
    web_sys::window().and_then(|w| w.document())
}

fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

fn match_media(query: &str) -> Option<MediaQueryList> {
    match web_sys::window()?.match_media(query) {
        Ok(list) => list,
        Err(err) => {
            log::warn!("matchMedia({query}) failed: {}", describe(&err));
            None
        }
    }
}

// =============================================================
// Storage
// =============================================================

/// `window.localStorage`, or nothing when the browser refuses access.
#[derive(Debug)]
pub struct LocalStorageBackend {
    storage: Option<Storage>,
}

impl LocalStorageBackend {
    #[must_use]
    pub fn from_window() -> Self {
        let storage = match web_sys::window().map(|w| w.local_storage()) {
            Some(Ok(storage)) => storage,
            Some(Err(err)) => {
                log::warn!("localStorage unavailable: {}", describe(&err));
                None
            }
            None => None,
        };
        Self { storage }
    }

    fn storage(&self) -> Result<&Storage, StoreError> {
        self.storage.as_ref().ok_or(StoreError::Unavailable)
    }
}

impl PreferenceBackend for LocalStorageBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.storage()?
            .get_item(key)
            .map_err(|err| StoreError::Read { key: key.to_owned(), reason: describe(&err) })
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.storage()?
            .set_item(key, value)
            .map_err(|err| StoreError::Write { key: key.to_owned(), reason: describe(&err) })
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.storage()?
            .remove_item(key)
            .map_err(|err| StoreError::Write { key: key.to_owned(), reason: describe(&err) })
    }
}

// =============================================================
// System preference
// =============================================================

#[derive(Debug)]
pub struct MediaQuerySignal {
    list: Option<MediaQueryList>,
}

impl MediaQuerySignal {
    #[must_use]
    pub fn new(query: &str) -> Self {
        Self { list: match_media(query) }
    }
}

impl SystemPreference for MediaQuerySignal {
    fn prefers_dark(&self) -> Option<bool> {
        self.list.as_ref().map(MediaQueryList::matches)
    }
}

// =============================================================
// DOM surface
// =============================================================

/// Live page indicators, located by id on every apply.
#[derive(Debug)]
pub struct DomSurface {
    document: Option<Document>,
    toggle_selector: String,
    icon_selector: String,
    label_selector: String,
}

impl DomSurface {
    #[must_use]
    pub fn new(config: &ThemeConfig) -> Self {
        Self {
            document: document(),
            toggle_selector: ThemeConfig::id_selector(&config.toggle_id),
            icon_selector: ThemeConfig::id_selector(&config.icon_id),
            label_selector: ThemeConfig::id_selector(&config.label_id),
        }
    }
}

fn select_all(document: &Document, selector: &str) -> Vec<Element> {
    let list = match document.query_selector_all(selector) {
        Ok(list) => list,
        Err(err) => {
            log::warn!("querySelectorAll({selector}) failed: {}", describe(&err));
            return Vec::new();
        }
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_ref::<Element>().cloned())
        .collect()
}

fn set_attr(element: &Element, name: &str, value: &str) {
    if let Err(err) = element.set_attribute(name, value) {
        log::warn!("failed to set {name}: {}", describe(&err));
    }
}

impl PageSurface for DomSurface {
    fn apply(&mut self, plan: &SyncPlan) {
        let Some(document) = &self.document else {
            return;
        };
        if let Some(root) = document.document_element() {
            if let Err(err) = root.class_list().toggle_with_force(&plan.root_class, plan.root_flag()) {
                log::warn!("failed to toggle root class: {}", describe(&err));
            }
        }
        for icon in select_all(document, &self.icon_selector) {
            let classes = icon.class_list();
            let switches = plan.icon_off.iter().map(|class| (class, false));
            for (class, on) in switches.chain(plan.icon_on.iter().map(|class| (class, true))) {
                if let Err(err) = classes.toggle_with_force(class, on) {
                    log::warn!("failed to switch icon class {class}: {}", describe(&err));
                }
            }
        }
        for label in select_all(document, &self.label_selector) {
            label.set_text_content(Some(&plan.label));
        }
        for toggle in select_all(document, &self.toggle_selector) {
            set_attr(&toggle, "aria-pressed", plan.aria_pressed);
            set_attr(&toggle, "aria-label", &plan.action_label);
            set_attr(&toggle, "title", &plan.action_label);
        }
    }
}

// =============================================================
// Inputs
// =============================================================

/// Registers page-lifetime listeners for toggle clicks and OS changes.
#[derive(Debug)]
pub struct DomInputHub {
    document: Option<Document>,
    media: Option<MediaQueryList>,
    toggle_selector: String,
}

impl DomInputHub {
    #[must_use]
    pub fn new(config: &ThemeConfig) -> Self {
        Self {
            document: document(),
            media: match_media(&config.media_query),
            toggle_selector: ThemeConfig::id_selector(&config.toggle_id),
        }
    }
}

/// Whether the click landed on (or inside) a toggle control.
fn targets_toggle(event: &Event, selector: &str) -> bool {
    let Some(target) = event.target() else {
        return false;
    };
    let Some(element) = target.dyn_ref::<Element>() else {
        return false;
    };
    match element.closest(selector) {
        Ok(found) => found.is_some(),
        Err(err) => {
            log::warn!("closest({selector}) failed: {}", describe(&err));
            false
        }
    }
}

impl InputHub for DomInputHub {
    fn on_toggle(&mut self, mut handler: Box<dyn FnMut()>) {
        let Some(document) = &self.document else {
            return;
        };
        let selector = self.toggle_selector.clone();
        let cb = Closure::wrap(Box::new(move |event: Event| {
            if targets_toggle(&event, &selector) {
                event.prevent_default();
                handler();
            }
        }) as Box<dyn FnMut(Event)>);
        match document.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref()) {
            Ok(()) => cb.forget(),
            Err(err) => log::warn!("failed to listen for toggle clicks: {}", describe(&err)),
        }
    }

    fn on_system_change(&mut self, mut handler: Box<dyn FnMut(bool)>) {
        let Some(media) = &self.media else {
            return;
        };
        let cb = Closure::wrap(Box::new(move |event: MediaQueryListEvent| {
            handler(event.matches());
        }) as Box<dyn FnMut(MediaQueryListEvent)>);
        match media.add_event_listener_with_callback("change", cb.as_ref().unchecked_ref()) {
            Ok(()) => cb.forget(),
            Err(err) => log::warn!("failed to listen for color-scheme changes: {}", describe(&err)),
        }
    }
}

// =============================================================
// Notifications
// =============================================================

/// Bus listener re-dispatching each change as a DOM `CustomEvent` on `document`.
fn dispatch_to_document(event_name: String) -> impl FnMut(ThemeChange) {
    move |change| {
        let Some(document) = document() else {
            return;
        };
        let detail = match serde_json::to_string(&change).map(|json| js_sys::JSON::parse(&json)) {
            Ok(Ok(detail)) => detail,
            Ok(Err(err)) => {
                log::warn!("failed to build {event_name} detail: {}", describe(&err));
                return;
            }
            Err(err) => {
                log::warn!("failed to encode {event_name} detail: {err}");
                return;
            }
        };
        let init = CustomEventInit::new();
        init.set_detail(&detail);
        let dispatched = CustomEvent::new_with_event_init_dict(&event_name, &init)
            .and_then(|event| document.dispatch_event(&event));
        if let Err(err) = dispatched {
            log::warn!("failed to dispatch {event_name}: {}", describe(&err));
        }
    }
}

/// Re-confirm indicators on the next animation frame.
fn reapply_next_frame(handle: &WebHandle) {
    let Some(window) = web_sys::window() else {
        handle.reapply();
        return;
    };

    let handle_for_cb = handle.clone();
    let holder: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
    let holder_for_cb = Rc::clone(&holder);
    let cb = Closure::wrap(Box::new(move |_ts: f64| {
        handle_for_cb.reapply();
        holder_for_cb.borrow_mut().take();
    }) as Box<dyn FnMut(f64)>);

    if window.request_animation_frame(cb.as_ref().unchecked_ref()).is_ok() {
        *holder.borrow_mut() = Some(cb);
    } else {
        handle.reapply();
    }
}

fn init_logging() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        log::trace!("logger already installed");
    }
}

// =============================================================
// JS API
// =============================================================

/// Page-level theme controller exported to JavaScript.
#[wasm_bindgen]
#[derive(Debug)]
pub struct DarkMode {
    handle: WebHandle,
    config: ThemeConfig,
}

#[wasm_bindgen]
impl DarkMode {
    /// Controller with the default site configuration.
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new() -> DarkMode {
        Self::build(ThemeConfig::default())
    }

    /// Controller configured from a JSON object string; see `ThemeConfig`.
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(json: &str) -> Result<DarkMode, JsError> {
        Ok(Self::build(ThemeConfig::from_json(json)?))
    }

    /// Apply the resolved theme and start listening. Safe to call repeatedly.
    /// Returns whether the page is now dark.
    pub fn initialize(&self) -> bool {
        let mut hub = DomInputHub::new(&self.config);
        let state = self.handle.initialize(&mut hub);
        reapply_next_frame(&self.handle);
        state.is_some_and(ThemeState::is_dark)
    }

    /// Flip and persist, as if a toggle was clicked.
    pub fn toggle(&self) -> bool {
        self.handle.toggle().is_some_and(ThemeState::is_dark)
    }

    /// Force `"dark"` or `"light"` and persist it.
    #[wasm_bindgen(js_name = setTheme)]
    pub fn set_theme(&self, theme: &str) -> Result<bool, JsError> {
        let Some(state) = ThemeState::parse(theme) else {
            return Err(JsError::new(&format!("unknown theme {theme:?}; expected \"dark\" or \"light\"")));
        };
        Ok(self.handle.set_theme(state).is_some_and(ThemeState::is_dark))
    }

    /// Forget the stored choice and follow the OS preference.
    #[wasm_bindgen(js_name = followSystem)]
    pub fn follow_system(&self) -> bool {
        self.handle.follow_system().is_some_and(ThemeState::is_dark)
    }

    #[wasm_bindgen(js_name = isDark)]
    pub fn is_dark(&self) -> bool {
        self.handle.state().is_some_and(ThemeState::is_dark)
    }
}

impl DarkMode {
    fn build(config: ThemeConfig) -> Self {
        init_logging();
        let controller = ThemeController::new(
            LocalStorageBackend::from_window(),
            MediaQuerySignal::new(&config.media_query),
            DomSurface::new(&config),
            config.clone(),
        );
        let handle = ThemeHandle::new(controller);
        handle.subscribe(dispatch_to_document(config.event_name.clone()));
        Self { handle, config }
    }
}

impl Default for DarkMode {
    fn default() -> Self {
        Self::new()
    }
}
