//! Playback session manager.
//!
//! A [`Registry`] is the per-host heart of the crate. It:
//! - Owns the sound definitions, bucket membership and mute flags
//! - Creates and releases playback instances through the audio backend
//! - Drives volume fades through the [`FadeEngine`]
//! - Emits lifecycle events and refresh notifications to the host
//!
//! All operations run synchronously to completion. The only deferred work
//! is the arrival of backend signals, drained by [`Registry::pump`], and fade
//! progress, driven by [`Registry::advance`].

mod bulk;
mod load;
mod playback;
mod queries;
mod signals;

pub use load::alias_from_filename;

use crate::backend::{AudioBackend, AudioVoice, InstanceId, PlaybackSignal};
use crate::defaults::{self, DefaultsStore};
use crate::error::{Result, SoundError};
use crate::fade::{FadeCompletion, FadeEngine, FadeJob, FadeStep};
use crate::host::{HostBindings, LifecycleEvent, Notification, PendingNotifications};
use crate::state::{RegistryState, SoundDefinition};
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::collections::HashMap;
use std::time::Duration;

/// Where a playback instance is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InstancePhase {
    /// `play()` issued, confirmation outstanding.
    Pending,
    /// Confirmed and playing.
    Active,
    /// Fading out towards a pause.
    Pausing,
    /// Paused and still listed.
    Paused,
    /// Resumed, confirmation outstanding.
    Resuming,
    /// Detached from its definition, fading out towards release.
    Stopping,
}

/// A live playback instance and the voice behind it.
struct PlaybackInstance {
    alias: String,
    bucket: String,
    voice: Box<dyn AudioVoice>,
    phase: InstancePhase,
    /// Whether `Audio Started` has been sent for this instance.
    announced: bool,
    /// Volume the fade-in should reach.
    target_volume: f32,
    fade_in: Duration,
}

/// Sound registry and playback sessions for one host.
pub struct Registry {
    host_id: String,
    state: RegistryState,
    /// Every live instance, listed or detached.
    instances: HashMap<InstanceId, PlaybackInstance>,
    fades: FadeEngine,
    backend: Box<dyn AudioBackend>,
    bindings: HostBindings,
    defaults: DefaultsStore,
    signal_tx: Sender<PlaybackSignal>,
    signal_rx: Receiver<PlaybackSignal>,
    next_instance_id: u64,
    /// Hold host callbacks until [`Registry::take_notifications`].
    deferred: bool,
    outbox: Vec<Notification>,
}

impl Registry {
    /// Create an empty registry reading the process-wide defaults.
    pub fn new(
        host_id: impl Into<String>,
        backend: Box<dyn AudioBackend>,
        bindings: HostBindings,
    ) -> Self {
        let (signal_tx, signal_rx) = unbounded();
        Self {
            host_id: host_id.into(),
            state: RegistryState::new(),
            instances: HashMap::new(),
            fades: FadeEngine::new(),
            backend,
            bindings,
            defaults: defaults::global(),
            signal_tx,
            signal_rx,
            next_instance_id: 1,
            deferred: false,
            outbox: Vec::new(),
        }
    }

    /// Read defaults from a specific store instead of the global one.
    pub fn with_defaults(mut self, defaults: DefaultsStore) -> Self {
        self.defaults = defaults;
        self
    }

    /// Queue host callbacks instead of running them inline.
    ///
    /// A registry shared through a [`RegistryHandle`](crate::RegistryHandle)
    /// is deferred, so callbacks can use the handle again.
    pub fn defer_notifications(&mut self, deferred: bool) {
        self.deferred = deferred;
    }

    /// Take the queued host callbacks.
    pub fn take_notifications(&mut self) -> PendingNotifications {
        PendingNotifications::new(self.bindings.clone(), std::mem::take(&mut self.outbox))
    }

    /// Identifier of the host this registry belongs to.
    pub fn host_id(&self) -> &str {
        &self.host_id
    }

    /// Change counter, bumped by every mutating operation.
    pub fn version(&self) -> u64 {
        self.state.version
    }

    /// Read-only view of the bookkeeping state.
    pub fn state(&self) -> &RegistryState {
        &self.state
    }

    /// The defaults store this registry reads.
    pub fn defaults(&self) -> &DefaultsStore {
        &self.defaults
    }

    /// Phase of a live instance.
    pub fn instance_phase(&self, instance: InstanceId) -> Option<InstancePhase> {
        self.instances.get(&instance).map(|i| i.phase)
    }

    /// Number of active fades.
    pub fn active_fades(&self) -> usize {
        self.fades.len()
    }

    /// Drain pending backend signals and advance fades by `delta`.
    pub fn update(&mut self, delta: Duration) {
        self.pump();
        self.advance(delta);
    }

    /// Advance every fade by `delta`, applying volumes and completions.
    pub fn advance(&mut self, delta: Duration) {
        for step in self.fades.advance(delta) {
            self.apply_fade_step(step);
        }
    }

    /// Stop everything immediately and clear all instance lists.
    ///
    /// Fades are dropped rather than finished; definitions, buckets and mute
    /// flags are kept.
    pub fn shutdown(&mut self) {
        self.fades.clear();
        for definition in self.state.sounds.values_mut() {
            definition.playing_instances.clear();
        }
        for (id, mut instance) in self.instances.drain() {
            instance.voice.pause();
            instance.voice.set_current_time(0.0);
            log::debug!("Released {} ({}) on shutdown", id, instance.alias);
        }
        while self.signal_rx.try_recv().is_ok() {}
        self.changed();
    }

    /// Record a mutation and notify the host.
    fn changed(&mut self) {
        self.state.bump_version();
        self.notify(Notification::Refresh);
    }

    /// Send both the global and the alias-specific event.
    fn emit(&mut self, event: LifecycleEvent, alias: &str) {
        log::debug!("{} ({})", event, alias);
        self.notify(Notification::Event(event.name().to_string()));
        self.notify(Notification::Event(event.name_for(alias)));
    }

    fn notify(&mut self, notification: Notification) {
        if self.deferred {
            self.outbox.push(notification);
        } else {
            self.bindings.deliver(&notification);
        }
    }

    fn definition(&self, alias: &str) -> Result<&SoundDefinition> {
        self.state
            .sounds
            .get(alias)
            .ok_or_else(|| SoundError::NotLoaded(alias.to_string()))
    }

    fn definition_mut(&mut self, alias: &str) -> Result<&mut SoundDefinition> {
        self.state
            .sounds
            .get_mut(alias)
            .ok_or_else(|| SoundError::NotLoaded(alias.to_string()))
    }

    fn allocate_instance_id(&mut self) -> InstanceId {
        let id = InstanceId::new(self.next_instance_id);
        self.next_instance_id += 1;
        id
    }

    /// Fade an instance from its current volume to `target`.
    fn fade_instance(
        &mut self,
        id: InstanceId,
        target: f32,
        duration: Duration,
        completion: FadeCompletion,
    ) {
        let Some(instance) = self.instances.get(&id) else {
            return;
        };
        let job = FadeJob::new(id, instance.voice.volume(), target, duration, completion);
        if let Some(step) = self.fades.start(job) {
            self.apply_fade_step(step);
        }
    }

    fn apply_fade_step(&mut self, step: FadeStep) {
        let Some(instance) = self.instances.get_mut(&step.instance) else {
            return;
        };
        instance.voice.set_volume(step.volume);
        match step.finished {
            None | Some(FadeCompletion::Hold) => {}
            Some(FadeCompletion::Pause) => {
                instance.voice.pause();
                instance.phase = InstancePhase::Paused;
                log::debug!("Paused {} ({})", step.instance, instance.alias);
            }
            Some(FadeCompletion::Stop) => {
                instance.voice.pause();
                instance.voice.set_current_time(0.0);
                log::debug!("Stopped {} ({})", step.instance, instance.alias);
                self.instances.remove(&step.instance);
            }
        }
    }

    /// Forget an instance entirely: its list entry, its fade and its voice.
    fn release_instance(&mut self, id: InstanceId) -> Option<PlaybackInstance> {
        let instance = self.instances.remove(&id)?;
        self.fades.forget(id);
        if let Some(definition) = self.state.sounds.get_mut(&instance.alias) {
            definition.playing_instances.retain(|listed| *listed != id);
        }
        Some(instance)
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("host_id", &self.host_id)
            .field("version", &self.state.version)
            .field("sounds", &self.state.sounds.len())
            .field("instances", &self.instances.len())
            .field("fades", &self.fades.len())
            .finish_non_exhaustive()
    }
}
