//! Theme controller and input wiring.
//!
//! SYSTEM CONTEXT
//! ==============
//! `ThemeController` owns the preference store, the system signal and the
//! synchronizer, and implements the reactions to each input. `ThemeHandle`
//! shares one controller between the page's event callbacks and runs the
//! once-per-instance initialization that registers those callbacks.
//!
//! TRADE-OFFS
//! ==========
//! Callbacks hold a weak reference and borrow with `try_borrow_mut`. The
//! controller queues its change notifications; the handle delivers them from
//! its own bus after the controller borrow is released, so listeners can read
//! the state or call back in. Notifications raised by a listener are delivered
//! after the one being handled. Anything still re-entrant (code inside
//! `ThemeHandle::with` reaching the same handle) is logged and dropped rather
//! than allowed to panic the page.

#[cfg(test)]
#[path = "controller_test.rs"]
mod controller_test;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::config::ThemeConfig;
use crate::events::{SubscriptionId, ThemeBus, ThemeChange};
use crate::resolve::resolve;
use crate::store::{PreferenceBackend, PreferenceStore};
use crate::sync::{PageSurface, Synchronizer};
use crate::theme::{PersistedPreference, ThemeState};

/// Live OS color-scheme signal.
pub trait SystemPreference {
    /// `None` when the environment cannot tell.
    fn prefers_dark(&self) -> Option<bool>;
}

/// System signal whose value is set by the host. Clones share the value.
#[derive(Clone, Debug, Default)]
pub struct ManualSignal {
    value: Rc<Cell<Option<bool>>>,
}

impl ManualSignal {
    #[must_use]
    pub fn new(value: Option<bool>) -> Self {
        Self { value: Rc::new(Cell::new(value)) }
    }

    pub fn set(&self, value: Option<bool>) {
        self.value.set(value);
    }
}

impl SystemPreference for ManualSignal {
    fn prefers_dark(&self) -> Option<bool> {
        self.value.get()
    }
}

/// Subscription surface for the two external inputs.
pub trait InputHub {
    /// Call `handler` once per activation of any toggle control.
    fn on_toggle(&mut self, handler: Box<dyn FnMut()>);
    /// Call `handler` with the new value whenever the OS preference changes.
    fn on_system_change(&mut self, handler: Box<dyn FnMut(bool)>);
}

#[derive(Debug)]
pub struct ThemeController<B, P, S> {
    store: PreferenceStore<B>,
    system: P,
    sync: Synchronizer<S>,
    initialized: bool,
    pending: Vec<ThemeChange>,
}

impl<B, P, S> ThemeController<B, P, S>
where
    B: PreferenceBackend,
    P: SystemPreference,
    S: PageSurface,
{
    pub fn new(backend: B, system: P, surface: S, config: ThemeConfig) -> Self {
        let store = PreferenceStore::new(backend, config.storage_key.clone());
        Self {
            store,
            system,
            sync: Synchronizer::new(surface, config),
            initialized: false,
            pending: Vec::new(),
        }
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        self.sync.surface()
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// What the page should show given the stored choice and the system signal.
    #[must_use]
    pub fn resolved(&self) -> ThemeState {
        resolve(self.store.read(), self.system.prefers_dark(), None)
    }

    /// What the page shows; the resolved state until something is applied.
    #[must_use]
    pub fn state(&self) -> ThemeState {
        self.sync.current().unwrap_or_else(|| self.resolved())
    }

    /// Resolve and apply. Returns `true` the first time only; later calls
    /// re-apply but report that subscriptions already exist.
    pub fn initialize(&mut self) -> bool {
        let state = self.resolved();
        log::debug!("theme resolved on load: {}", state.as_str());
        self.commit(state);
        !std::mem::replace(&mut self.initialized, true)
    }

    pub fn apply(&mut self, state: ThemeState) {
        self.commit(state);
    }

    /// Re-apply the current state, e.g. after late markup settled.
    pub fn reapply(&mut self) {
        let state = self.state();
        self.commit(state);
    }

    /// Explicit user toggle: flip, persist, apply.
    pub fn on_toggle_activated(&mut self) -> ThemeState {
        let next = self.state().flipped();
        self.store.write(next);
        log::debug!("theme toggled to {}", next.as_str());
        self.commit(next);
        next
    }

    /// OS preference changed. Applied only while no choice is stored.
    pub fn on_system_preference_changed(&mut self, prefers_dark: bool) -> Option<ThemeState> {
        if !self.store.read().is_unset() {
            return None;
        }
        let state = resolve(PersistedPreference::Unset, Some(prefers_dark), None);
        log::debug!("theme following system: {}", state.as_str());
        self.commit(state);
        Some(state)
    }

    /// Direct programmatic set. Persists like a toggle.
    pub fn set_theme(&mut self, state: ThemeState) -> ThemeState {
        self.store.write(state);
        let applied = resolve(self.store.read(), self.system.prefers_dark(), Some(state.is_dark()));
        self.commit(applied);
        applied
    }

    /// Drop the stored choice and follow the system signal again.
    pub fn follow_system(&mut self) -> ThemeState {
        self.store.clear();
        let state = resolve(PersistedPreference::Unset, self.system.prefers_dark(), None);
        self.commit(state);
        state
    }

    /// Changes applied since the last call, oldest first.
    pub fn take_notifications(&mut self) -> Vec<ThemeChange> {
        std::mem::take(&mut self.pending)
    }

    fn commit(&mut self, state: ThemeState) {
        if let Some(change) = self.sync.apply(state) {
            self.pending.push(change);
        }
    }
}

/// Shared handle to one controller and its subscribers.
#[derive(Debug)]
pub struct ThemeHandle<B, P, S> {
    shared: Rc<Shared<B, P, S>>,
}

#[derive(Debug)]
struct Shared<B, P, S> {
    controller: RefCell<ThemeController<B, P, S>>,
    bus: RefCell<ThemeBus>,
}

impl<B, P, S> Clone for ThemeHandle<B, P, S> {
    fn clone(&self) -> Self {
        Self { shared: Rc::clone(&self.shared) }
    }
}

impl<B, P, S> ThemeHandle<B, P, S>
where
    B: PreferenceBackend + 'static,
    P: SystemPreference + 'static,
    S: PageSurface + 'static,
{
    pub fn new(controller: ThemeController<B, P, S>) -> Self {
        let shared = Shared { controller: RefCell::new(controller), bus: RefCell::new(ThemeBus::new()) };
        Self { shared: Rc::new(shared) }
    }

    /// Run `f` against the controller unless it is already borrowed, then
    /// deliver the notifications it queued.
    pub fn with<R>(&self, f: impl FnOnce(&mut ThemeController<B, P, S>) -> R) -> Option<R> {
        let result = with_controller(&self.shared.controller, f);
        self.flush();
        result
    }

    /// Initialization protocol: resolve, apply, then subscribe to inputs.
    ///
    /// Subscriptions are registered on the first call only, so running this
    /// again on the same page never makes one click flip the theme twice.
    pub fn initialize(&self, hub: &mut impl InputHub) -> Option<ThemeState> {
        let first = self.with(ThemeController::initialize)?;
        if first {
            let weak = Rc::downgrade(&self.shared);
            hub.on_toggle(Box::new(move || {
                if let Some(shared) = weak.upgrade() {
                    ThemeHandle { shared }.toggle();
                }
            }));
            let weak = Rc::downgrade(&self.shared);
            hub.on_system_change(Box::new(move |prefers_dark| {
                if let Some(shared) = weak.upgrade() {
                    ThemeHandle { shared }.with(|controller| controller.on_system_preference_changed(prefers_dark));
                }
            }));
        } else {
            log::debug!("theme controller already initialized; inputs not re-subscribed");
        }
        self.state()
    }

    pub fn toggle(&self) -> Option<ThemeState> {
        self.with(ThemeController::on_toggle_activated)
    }

    pub fn set_theme(&self, state: ThemeState) -> Option<ThemeState> {
        self.with(|controller| controller.set_theme(state))
    }

    pub fn follow_system(&self) -> Option<ThemeState> {
        self.with(ThemeController::follow_system)
    }

    pub fn reapply(&self) {
        self.with(ThemeController::reapply);
    }

    #[must_use]
    pub fn state(&self) -> Option<ThemeState> {
        with_controller(&self.shared.controller, |controller| controller.state())
    }

    /// Register a listener for every change applied through this handle.
    /// Fails only when called from inside a listener.
    pub fn subscribe(&self, listener: impl FnMut(ThemeChange) + 'static) -> Option<SubscriptionId> {
        with_bus(&self.shared.bus, |bus| bus.subscribe(listener))
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> Option<bool> {
        with_bus(&self.shared.bus, |bus| bus.unsubscribe(id))
    }

    /// Deliver queued notifications with no controller borrow held. A flush
    /// already running further up the stack picks up whatever is queued here.
    fn flush(&self) {
        let Ok(mut bus) = self.shared.bus.try_borrow_mut() else {
            return;
        };
        loop {
            let pending = with_controller(&self.shared.controller, ThemeController::take_notifications);
            let Some(pending) = pending.filter(|changes| !changes.is_empty()) else {
                break;
            };
            for change in pending {
                bus.emit(change);
            }
        }
    }
}

fn with_controller<T, R>(cell: &RefCell<T>, f: impl FnOnce(&mut T) -> R) -> Option<R> {
    match cell.try_borrow_mut() {
        Ok(mut controller) => Some(f(&mut controller)),
        Err(_) => {
            log::warn!("theme controller busy; dropping re-entrant call");
            None
        }
    }
}

fn with_bus<R>(cell: &RefCell<ThemeBus>, f: impl FnOnce(&mut ThemeBus) -> R) -> Option<R> {
    match cell.try_borrow_mut() {
        Ok(mut bus) => Some(f(&mut bus)),
        Err(_) => {
            log::warn!("theme listeners are being notified; subscription change dropped");
            None
        }
    }
}
