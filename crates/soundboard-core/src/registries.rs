//! Per-host registry map.
//!
//! Every host gets its own [`Registry`], created on first access and kept
//! until [`Registries::teardown`] is called for it. Nothing is collected
//! implicitly.

use crate::backend::AudioBackend;
use crate::host::HostBindings;
use crate::session::Registry;
use crate::state::RegistryHandle;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Builds the audio backend for a newly created registry.
pub type BackendFactory = Arc<dyn Fn() -> Box<dyn AudioBackend> + Send + Sync>;

/// Registries keyed by host identifier.
#[derive(Clone)]
pub struct Registries {
    hosts: Arc<Mutex<HashMap<String, RegistryHandle>>>,
    backend: BackendFactory,
}

impl Registries {
    /// Create an empty map whose registries get backends from `backend`.
    pub fn new<F>(backend: F) -> Self
    where
        F: Fn() -> Box<dyn AudioBackend> + Send + Sync + 'static,
    {
        Self {
            hosts: Arc::new(Mutex::new(HashMap::new())),
            backend: Arc::new(backend),
        }
    }

    /// Registry of a host, created with `bindings` on first access.
    ///
    /// Later calls return the same registry and never invoke `bindings`.
    pub fn get_or_create<F>(&self, host_id: &str, bindings: F) -> RegistryHandle
    where
        F: FnOnce() -> HostBindings,
    {
        let mut hosts = self.lock();
        if let Some(handle) = hosts.get(host_id) {
            return handle.clone();
        }
        log::debug!("Creating sound registry for host '{}'", host_id);
        let registry = Registry::new(host_id, (self.backend)(), bindings());
        let handle = RegistryHandle::new(registry);
        hosts.insert(host_id.to_string(), handle.clone());
        handle
    }

    /// Registry of a host, if one was created.
    pub fn get(&self, host_id: &str) -> Option<RegistryHandle> {
        self.lock().get(host_id).cloned()
    }

    /// Shut a host's registry down and forget it.
    ///
    /// Returns false if the host had no registry.
    pub fn teardown(&self, host_id: &str) -> bool {
        let Some(handle) = self.lock().remove(host_id) else {
            return false;
        };
        handle.with(|registry| registry.shutdown());
        log::debug!("Tore down sound registry for host '{}'", host_id);
        true
    }

    /// Identifiers of every host with a registry, sorted.
    pub fn host_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.lock().keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, RegistryHandle>> {
        self.hosts.lock().expect("Registries lock poisoned")
    }
}

impl std::fmt::Debug for Registries {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registries")
            .field("hosts", &self.host_ids())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::SimulatedBackend;
    use crate::options::SoundOptions;
    use std::time::Duration;

    #[test]
    fn test_get_or_create_is_idempotent() {
        let registries = Registries::new(|| Box::new(SimulatedBackend::new()));
        let first = registries.get_or_create("doc-a", HostBindings::default);
        let again = registries.get_or_create("doc-a", || panic!("bindings built twice"));
        assert!(first.ptr_eq(&again));
        assert_eq!(registries.len(), 1);
    }

    #[test]
    fn test_hosts_are_isolated() {
        let registries = Registries::new(|| Box::new(SimulatedBackend::new()));
        let a = registries.get_or_create("a", HostBindings::default);
        let b = registries.get_or_create("b", HostBindings::default);
        a.with(|r| r.load_sound("click.mp3", &SoundOptions::new()));

        assert!(!b.with(|r| r.is_sound_loaded("click")));
        assert_eq!(registries.host_ids(), vec!["a", "b"]);
    }

    #[test]
    fn test_teardown_stops_and_forgets() {
        let backend = SimulatedBackend::new();
        let shared = backend.clone();
        let registries = Registries::new(move || Box::new(shared.clone()));
        let handle = registries.get_or_create("doc", HostBindings::default);
        let id = handle.with(|r| {
            r.load_sound("a.mp3", &SoundOptions::new().with_fade_out(5.0));
            let id = r.play_sound("a", &SoundOptions::new());
            r.update(Duration::ZERO);
            id
        });

        assert!(registries.teardown("doc"));
        assert!(!registries.teardown("doc"));
        assert!(registries.get("doc").is_none());

        let voice = backend.voice(id.unwrap()).unwrap();
        assert!(voice.paused);
        assert!(voice.released);
        assert_eq!(handle.with(|r| r.instance_count("a")), 0);

        let fresh = registries.get_or_create("doc", HostBindings::default);
        assert!(!fresh.ptr_eq(&handle));
        assert_eq!(registries.len(), 1);
    }
}
