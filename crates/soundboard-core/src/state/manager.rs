//! Shared handle to a registry.
//!
//! The [`RegistryHandle`] provides synchronized access to a [`Registry`] so
//! the scripting layer and the host can both reach it. All registry work is
//! still done synchronously inside a single lock; host callbacks queued by
//! that work run after the lock is released.

use std::sync::{Arc, Mutex};

use crate::session::Registry;

/// Thread-safe handle to one registry.
///
/// Cloning yields another handle to the same registry.
#[derive(Clone)]
pub struct RegistryHandle {
    registry: Arc<Mutex<Registry>>,
}

impl RegistryHandle {
    /// Wrap a registry, deferring its host callbacks.
    pub fn new(mut registry: Registry) -> Self {
        registry.defer_notifications(true);
        Self {
            registry: Arc::new(Mutex::new(registry)),
        }
    }

    /// Run a closure with exclusive access to the registry.
    ///
    /// Events and refreshes raised by the closure are delivered after the
    /// lock is dropped, so callbacks may call `with` again.
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Registry) -> R,
    {
        let (result, pending) = {
            let mut registry = self.registry.lock().expect("Registry lock poisoned");
            let result = f(&mut registry);
            (result, registry.take_notifications())
        };
        pending.deliver();
        result
    }

    /// Host identifier of the registry.
    pub fn host_id(&self) -> String {
        self.with(|r| r.host_id().to_string())
    }

    /// Get the state version.
    pub fn version(&self) -> u64 {
        self.with(|r| r.version())
    }

    /// Whether two handles point at the same registry.
    pub fn ptr_eq(&self, other: &RegistryHandle) -> bool {
        Arc::ptr_eq(&self.registry, &other.registry)
    }
}

impl std::fmt::Debug for RegistryHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryHandle")
            .field("host_id", &self.host_id())
            .field("version", &self.version())
            .finish_non_exhaustive()
    }
}
