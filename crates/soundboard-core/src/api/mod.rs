//! Soundboard API for Rhai scripting.
//!
//! This module provides the Rhai bindings for a sound registry. All functions
//! internally use a thread-local [`RegistryHandle`] to reach the registry.
//!
//! # Usage
//!
//! 1. Bind a registry to the current thread with `init_api()`
//! 2. Register all functions with a Rhai engine using `register_api()`
//! 3. Execute scripts that call the registered functions
//!
//! Option arguments are object maps using the same names as the defaults
//! store, e.g. `play_sound("theme", #{ fadeIn: 2.0, volume: 0.5 })`.

pub mod global;
pub mod options;
pub mod sound;

use crate::state::RegistryHandle;
use rhai::Engine;
use std::cell::RefCell;

// Thread-local storage for the registry handle.
// This allows Rhai functions to reach the registry without passing it explicitly.
thread_local! {
    static REGISTRY_HANDLE: RefCell<Option<RegistryHandle>> = const { RefCell::new(None) };
}

/// Bind a registry to the current thread.
///
/// This must be called before executing any scripts that use the API.
pub fn init_api(handle: RegistryHandle) {
    REGISTRY_HANDLE.with(|h| {
        *h.borrow_mut() = Some(handle);
    });
}

/// Get the current RegistryHandle.
///
/// Returns None if `init_api()` hasn't been called on this thread.
pub fn get_handle() -> Option<RegistryHandle> {
    REGISTRY_HANDLE.with(|h| h.borrow().clone())
}

/// Get the current RegistryHandle, panicking if not initialized.
pub fn require_handle() -> RegistryHandle {
    get_handle().expect("Soundboard API not initialized. Call init_api() first.")
}

/// Register all soundboard functions with a Rhai engine.
///
/// This registers:
/// - Sound functions (load, play, pause, resume, stop, unload, queries)
/// - Global functions (defaults, bulk stop and mute, time advance)
pub fn register_api(engine: &mut Engine) {
    sound::register(engine);
    global::register(engine);
}

/// Create a Rhai engine with the soundboard API registered.
pub fn create_engine() -> Engine {
    let mut engine = Engine::new();

    // Route print() through the log system instead of stdout
    engine.on_print(|text| {
        log::info!("[script] {}", text);
    });

    engine.on_debug(|text, source, pos| {
        let loc = match (source, pos) {
            (Some(src), pos) if !pos.is_none() => format!(" ({}:{})", src, pos),
            (Some(src), _) => format!(" ({})", src),
            (None, pos) if !pos.is_none() => format!(" ({})", pos),
            _ => String::new(),
        };
        log::debug!("[script]{} {}", loc, text);
    });

    register_api(&mut engine);

    engine
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::backend::{SimulatedBackend, StartPolicy};
    use crate::defaults::DefaultsStore;
    use crate::host::{HostBindings, PrefixResolver, RecordingNotifier};
    use crate::session::Registry;
    use std::sync::Arc;

    /// A registry on a simulated backend, bound to the current thread.
    pub struct Harness {
        pub handle: RegistryHandle,
        pub backend: SimulatedBackend,
        pub events: RecordingNotifier,
        pub engine: Engine,
    }

    impl Harness {
        pub fn new() -> Self {
            let backend = SimulatedBackend::with_policy(StartPolicy::Confirm);
            let events = RecordingNotifier::new();
            let bindings = HostBindings::new(
                Arc::new(PrefixResolver::new("res")),
                Arc::new(events.clone()),
            );
            let registry = Registry::new("script", Box::new(backend.clone()), bindings)
                .with_defaults(DefaultsStore::new());
            let handle = RegistryHandle::new(registry);
            init_api(handle.clone());
            Self {
                handle,
                backend,
                events,
                engine: create_engine(),
            }
        }

        pub fn run(&self, script: &str) {
            self.engine.run(script).expect("script failed");
        }

        pub fn eval<T: rhai::Variant + Clone>(&self, script: &str) -> T {
            self.engine.eval::<T>(script).expect("script failed")
        }
    }
}
