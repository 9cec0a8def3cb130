//! In-memory audio backend.
//!
//! Produces no sound. Each voice is a record the backend keeps so callers can
//! inspect it, and start outcomes follow a configurable [`StartPolicy`]. The
//! CLI uses it as a dry-run host; tests use it to script confirmations,
//! rejections and natural ends.

use super::{AudioBackend, AudioVoice, InstanceId, PlaybackSignal, SignalSender};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// How `play()` requests are answered.
#[derive(Clone, Debug, PartialEq)]
pub enum StartPolicy {
    /// Confirm every start immediately.
    Confirm,
    /// Reject every start with the given reason.
    Reject(String),
    /// Leave starts pending until [`SimulatedBackend::confirm`] or
    /// [`SimulatedBackend::reject`] is called.
    Manual,
}

/// Observable state of a simulated voice.
#[derive(Clone, Debug, PartialEq)]
pub struct VoiceSnapshot {
    pub src: String,
    pub paused: bool,
    pub ended: bool,
    pub volume: f32,
    pub muted: bool,
    pub looping: bool,
    pub current_time: f64,
    /// Number of `play()` calls received.
    pub play_count: u32,
    /// Every volume written, in order.
    pub volume_history: Vec<f32>,
    /// Whether the registry dropped its handle.
    pub released: bool,
}

struct SimVoice {
    snapshot: VoiceSnapshot,
    signals: SignalSender,
}

struct SimState {
    policy: StartPolicy,
    voices: HashMap<InstanceId, SimVoice>,
}

/// Cloneable handle to an in-memory backend.
#[derive(Clone)]
pub struct SimulatedBackend {
    state: Arc<Mutex<SimState>>,
}

impl Default for SimulatedBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedBackend {
    /// Create a backend that confirms every start.
    pub fn new() -> Self {
        Self::with_policy(StartPolicy::Confirm)
    }

    /// Create a backend with a specific start policy.
    pub fn with_policy(policy: StartPolicy) -> Self {
        Self {
            state: Arc::new(Mutex::new(SimState {
                policy,
                voices: HashMap::new(),
            })),
        }
    }

    /// Change how future `play()` requests are answered.
    pub fn set_policy(&self, policy: StartPolicy) {
        self.lock().policy = policy;
    }

    /// Inspect a voice.
    pub fn voice(&self, id: InstanceId) -> Option<VoiceSnapshot> {
        self.lock().voices.get(&id).map(|v| v.snapshot.clone())
    }

    /// All voices ever created, in creation order.
    pub fn voice_ids(&self) -> Vec<InstanceId> {
        let mut ids: Vec<_> = self.lock().voices.keys().copied().collect();
        ids.sort();
        ids
    }

    /// Confirm a pending start. Returns false for unknown voices.
    pub fn confirm(&self, id: InstanceId) -> bool {
        self.signal(id, |_| PlaybackSignal::started(id))
    }

    /// Reject a pending start. Returns false for unknown voices.
    pub fn reject(&self, id: InstanceId, reason: &str) -> bool {
        self.signal(id, |voice| {
            voice.paused = true;
            PlaybackSignal::rejected(id, reason)
        })
    }

    /// Let a voice reach its natural end. Returns false for unknown voices.
    pub fn finish(&self, id: InstanceId) -> bool {
        self.signal(id, |voice| {
            voice.paused = true;
            voice.ended = true;
            PlaybackSignal::ended(id)
        })
    }

    fn signal<F>(&self, id: InstanceId, f: F) -> bool
    where
        F: FnOnce(&mut VoiceSnapshot) -> PlaybackSignal,
    {
        let mut state = self.lock();
        match state.voices.get_mut(&id) {
            Some(voice) => {
                let signal = f(&mut voice.snapshot);
                // The registry may already be gone; nothing left to tell.
                let _ = voice.signals.send(signal);
                true
            }
            None => false,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SimState> {
        self.state.lock().expect("Simulated backend lock poisoned")
    }
}

impl std::fmt::Debug for SimulatedBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("SimulatedBackend")
            .field("policy", &state.policy)
            .field("voices", &state.voices.len())
            .finish()
    }
}

impl AudioBackend for SimulatedBackend {
    fn create_voice(
        &mut self,
        instance: InstanceId,
        src: &str,
        signals: SignalSender,
    ) -> Box<dyn AudioVoice> {
        self.lock().voices.insert(
            instance,
            SimVoice {
                snapshot: VoiceSnapshot {
                    src: src.to_string(),
                    paused: true,
                    ended: false,
                    volume: 1.0,
                    muted: false,
                    looping: false,
                    current_time: 0.0,
                    play_count: 0,
                    volume_history: Vec::new(),
                    released: false,
                },
                signals,
            },
        );
        Box::new(SimulatedVoice {
            id: instance,
            state: Arc::clone(&self.state),
        })
    }
}

struct SimulatedVoice {
    id: InstanceId,
    state: Arc<Mutex<SimState>>,
}

impl SimulatedVoice {
    fn with<R>(&self, f: impl FnOnce(&mut SimVoice, &StartPolicy) -> R) -> Option<R> {
        let mut state = self.state.lock().expect("Simulated backend lock poisoned");
        let SimState { policy, voices } = &mut *state;
        voices.get_mut(&self.id).map(|voice| f(voice, policy))
    }
}

impl AudioVoice for SimulatedVoice {
    fn play(&mut self) {
        let id = self.id;
        self.with(|voice, policy| {
            voice.snapshot.play_count += 1;
            voice.snapshot.ended = false;
            match policy {
                StartPolicy::Confirm => {
                    voice.snapshot.paused = false;
                    let _ = voice.signals.send(PlaybackSignal::started(id));
                }
                StartPolicy::Reject(reason) => {
                    voice.snapshot.paused = true;
                    let _ = voice.signals.send(PlaybackSignal::rejected(id, reason.clone()));
                }
                StartPolicy::Manual => voice.snapshot.paused = false,
            }
        });
    }

    fn pause(&mut self) {
        self.with(|voice, _| voice.snapshot.paused = true);
    }

    fn is_paused(&self) -> bool {
        self.with(|voice, _| voice.snapshot.paused).unwrap_or(true)
    }

    fn has_ended(&self) -> bool {
        self.with(|voice, _| voice.snapshot.ended).unwrap_or(false)
    }

    fn volume(&self) -> f32 {
        self.with(|voice, _| voice.snapshot.volume).unwrap_or(0.0)
    }

    fn set_volume(&mut self, volume: f32) {
        self.with(|voice, _| {
            voice.snapshot.volume = volume;
            voice.snapshot.volume_history.push(volume);
        });
    }

    fn set_muted(&mut self, muted: bool) {
        self.with(|voice, _| voice.snapshot.muted = muted);
    }

    fn set_looping(&mut self, looping: bool) {
        self.with(|voice, _| voice.snapshot.looping = looping);
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.with(|voice, _| voice.snapshot.current_time = seconds);
    }
}

impl Drop for SimulatedVoice {
    fn drop(&mut self) {
        self.with(|voice, _| voice.snapshot.released = true);
    }
}
