//! Collaborators provided by the embedding host.
//!
//! The registry calls these; it never implements them:
//!
//! - [`ResourceResolver`] - Turns a bare filename into a source locator
//! - [`EventNotifier`] - Receives lifecycle event names, fire-and-forget
//! - [`RefreshHook`] - Optional callback run after every state mutation
//!
//! Callbacks are queued as [`Notification`]s and delivered outside any lock.

use std::fmt;
use std::sync::{Arc, Mutex};

/// Resolves bare filenames against the host's resource base.
pub trait ResourceResolver: Send + Sync {
    fn resolve(&self, filename: &str) -> String;
}

/// Receives lifecycle events such as `Audio Started click`.
pub trait EventNotifier: Send + Sync {
    fn notify(&self, event: &str);
}

/// Callback for external reactive refresh.
pub type RefreshHook = Arc<dyn Fn() + Send + Sync>;

/// Lifecycle transitions of a playback instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LifecycleEvent {
    Started,
    Ended,
    Failed,
}

impl LifecycleEvent {
    /// Name of the global event, e.g. `Audio Started`.
    pub fn name(&self) -> &'static str {
        match self {
            LifecycleEvent::Started => "Audio Started",
            LifecycleEvent::Ended => "Audio Ended",
            LifecycleEvent::Failed => "Audio Failed",
        }
    }

    /// Name of the alias-specific event, e.g. `Audio Started click`.
    pub fn name_for(&self, alias: &str) -> String {
        format!("{} {}", self.name(), alias)
    }
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything a registry needs from its host, decided once at construction.
#[derive(Clone)]
pub struct HostBindings {
    pub resolver: Arc<dyn ResourceResolver>,
    pub notifier: Arc<dyn EventNotifier>,
    pub refresh: Option<RefreshHook>,
}

impl HostBindings {
    /// Bindings with no refresh hook.
    pub fn new(resolver: Arc<dyn ResourceResolver>, notifier: Arc<dyn EventNotifier>) -> Self {
        Self {
            resolver,
            notifier,
            refresh: None,
        }
    }

    /// Attach a refresh hook.
    pub fn with_refresh<F>(mut self, refresh: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.refresh = Some(Arc::new(refresh));
        self
    }

    /// Hand one queued notification to the host.
    pub(crate) fn deliver(&self, notification: &Notification) {
        match notification {
            Notification::Event(name) => self.notifier.notify(name),
            Notification::Refresh => {
                if let Some(refresh) = &self.refresh {
                    refresh();
                }
            }
        }
    }
}

/// A host callback waiting to run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notification {
    /// A lifecycle event name.
    Event(String),
    /// A state mutation happened.
    Refresh,
}

/// Notifications taken out of a registry, delivered once no lock is held.
///
/// Callbacks may reach back into the registry they came from, so a
/// [`RegistryHandle`](crate::RegistryHandle) delivers these only after
/// releasing its guard.
#[must_use = "notifications are lost unless delivered"]
pub struct PendingNotifications {
    bindings: HostBindings,
    queue: Vec<Notification>,
}

impl PendingNotifications {
    pub(crate) fn new(bindings: HostBindings, queue: Vec<Notification>) -> Self {
        Self { bindings, queue }
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Queued notifications in order.
    pub fn notifications(&self) -> &[Notification] {
        &self.queue
    }

    /// Run every callback in order.
    pub fn deliver(self) {
        for notification in &self.queue {
            self.bindings.deliver(notification);
        }
    }
}

impl Default for HostBindings {
    fn default() -> Self {
        Self::new(Arc::new(PrefixResolver::default()), Arc::new(LogNotifier))
    }
}

impl fmt::Debug for HostBindings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostBindings")
            .field("refresh", &self.refresh.is_some())
            .finish_non_exhaustive()
    }
}

/// Resolves filenames by joining them onto a base path or URL.
#[derive(Clone, Debug, Default)]
pub struct PrefixResolver {
    base: String,
}

impl PrefixResolver {
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }
}

impl ResourceResolver for PrefixResolver {
    fn resolve(&self, filename: &str) -> String {
        if self.base.is_empty() {
            filename.to_string()
        } else {
            format!("{}/{}", self.base.trim_end_matches('/'), filename)
        }
    }
}

/// Writes every event to the log at info level.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNotifier;

impl EventNotifier for LogNotifier {
    fn notify(&self, event: &str) {
        log::info!("[event] {}", event);
    }
}

/// Keeps every event it receives, in order.
#[derive(Clone, Debug, Default)]
pub struct RecordingNotifier {
    events: Arc<Mutex<Vec<String>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events received so far.
    pub fn events(&self) -> Vec<String> {
        self.events.lock().expect("Notifier lock poisoned").clone()
    }

    /// Drain the recorded events.
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.events.lock().expect("Notifier lock poisoned"))
    }
}

impl EventNotifier for RecordingNotifier {
    fn notify(&self, event: &str) {
        self.events
            .lock()
            .expect("Notifier lock poisoned")
            .push(event.to_string());
    }
}
