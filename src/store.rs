//! Persisted preference access.
//!
//! SYSTEM CONTEXT
//! ==============
//! The store holds one string under one key. Backends report failures as
//! `StoreError`; the `PreferenceStore` adapter swallows them so a blocked or
//! full storage area degrades to "no preference" instead of breaking the page.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::theme::{PersistedPreference, ThemeState};

/// Failure reported by a [`PreferenceBackend`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// No storage area exists (private mode, sandboxed frame, non-browser host).
    #[error("preference storage is unavailable")]
    Unavailable,
    /// The storage area refused a read.
    #[error("failed to read `{key}`: {reason}")]
    Read { key: String, reason: String },
    /// The storage area refused a write or removal (quota, permissions).
    #[error("failed to write `{key}`: {reason}")]
    Write { key: String, reason: String },
}

/// Raw key-value access to a durable storage area.
pub trait PreferenceBackend {
    /// Fetch the raw value for `key`; `Ok(None)` when absent.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Infallible adapter over a backend for a single fixed key.
#[derive(Debug)]
pub struct PreferenceStore<B> {
    backend: B,
    key: String,
}

impl<B: PreferenceBackend> PreferenceStore<B> {
    pub fn new(backend: B, key: impl Into<String>) -> Self {
        Self { backend, key: key.into() }
    }

    /// Read the stored choice. Never fails.
    pub fn read(&self) -> PersistedPreference {
        match self.backend.get(&self.key) {
            Ok(raw) => {
                let pref = PersistedPreference::from_raw(raw.as_deref());
                if pref.is_unset() {
                    if let Some(raw) = raw {
                        log::debug!("ignoring unrecognized stored theme {raw:?} under `{}`", self.key);
                    }
                }
                pref
            }
            Err(err) => {
                log::warn!("theme preference read failed: {err}");
                PersistedPreference::Unset
            }
        }
    }

    /// Persist an explicit choice. Best-effort.
    pub fn write(&self, state: ThemeState) {
        if let Err(err) = self.backend.set(&self.key, state.as_str()) {
            log::warn!("theme preference not saved: {err}");
        }
    }

    /// Forget the stored choice so the page follows the system again. Best-effort.
    pub fn clear(&self) {
        if let Err(err) = self.backend.remove(&self.key) {
            log::warn!("theme preference not cleared: {err}");
        }
    }
}

/// In-memory backend for tests and hosts without browser storage.
///
/// Clones share the same map, so a caller can keep a handle and inspect what a
/// controller wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    inner: Rc<RefCell<MemoryInner>>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    values: HashMap<String, String>,
    unavailable: bool,
    read_only: bool,
}

impl MemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend preloaded with one entry.
    #[must_use]
    pub fn with_value(key: &str, value: &str) -> Self {
        let backend = Self::new();
        backend.inner.borrow_mut().values.insert(key.to_owned(), value.to_owned());
        backend
    }

    /// Backend that fails every operation with [`StoreError::Unavailable`].
    #[must_use]
    pub fn unavailable() -> Self {
        let backend = Self::new();
        backend.inner.borrow_mut().unavailable = true;
        backend
    }

    /// Refuse writes and removals from now on; reads keep working.
    pub fn deny_writes(&self) {
        self.inner.borrow_mut().read_only = true;
    }

    /// Current raw value for `key`, bypassing failure simulation.
    #[must_use]
    pub fn peek(&self, key: &str) -> Option<String> {
        self.inner.borrow().values.get(key).cloned()
    }

    fn check_write(&self, key: &str) -> Result<(), StoreError> {
        let inner = self.inner.borrow();
        if inner.unavailable {
            return Err(StoreError::Unavailable);
        }
        if inner.read_only {
            return Err(StoreError::Write { key: key.to_owned(), reason: "storage is read-only".into() });
        }
        Ok(())
    }
}

impl PreferenceBackend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let inner = self.inner.borrow();
        if inner.unavailable {
            return Err(StoreError::Unavailable);
        }
        Ok(inner.values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.check_write(key)?;
        self.inner.borrow_mut().values.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.check_write(key)?;
        self.inner.borrow_mut().values.remove(key);
        Ok(())
    }
}
