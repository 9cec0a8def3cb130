//! Audio primitive contract.
//!
//! The registry never produces sound itself. It asks an [`AudioBackend`] for
//! one [`AudioVoice`] per playback instance and drives it through the
//! play/pause/volume/mute/loop/position controls. Outcomes that arrive
//! asynchronously (start confirmed, start rejected, playback ended) come back
//! as [`PlaybackSignal`] messages on the channel handed to the backend.

pub mod simulated;

use crossbeam_channel::Sender;
use std::fmt;

pub use simulated::{SimulatedBackend, StartPolicy, VoiceSnapshot};

/// Identifier of a playback instance, unique within a registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(u64);

impl InstanceId {
    /// Wrap a raw identifier.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// The raw identifier.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What happened to a voice.
#[derive(Clone, Debug, PartialEq)]
pub enum SignalKind {
    /// A `play()` request was confirmed.
    Started,
    /// A `play()` request failed (autoplay policy, missing file, ...).
    Rejected(String),
    /// Playback reached its natural end.
    Ended,
}

/// An asynchronous outcome reported by a voice.
#[derive(Clone, Debug, PartialEq)]
pub struct PlaybackSignal {
    /// The instance the signal refers to.
    pub instance: InstanceId,
    /// What happened.
    pub kind: SignalKind,
}

impl PlaybackSignal {
    pub fn started(instance: InstanceId) -> Self {
        Self {
            instance,
            kind: SignalKind::Started,
        }
    }

    pub fn rejected(instance: InstanceId, reason: impl Into<String>) -> Self {
        Self {
            instance,
            kind: SignalKind::Rejected(reason.into()),
        }
    }

    pub fn ended(instance: InstanceId) -> Self {
        Self {
            instance,
            kind: SignalKind::Ended,
        }
    }
}

/// Channel end a voice reports its signals into.
pub type SignalSender = Sender<PlaybackSignal>;

/// One audio-producing unit bound to a single source.
pub trait AudioVoice: Send {
    /// Request playback. The outcome is reported later as a signal.
    fn play(&mut self);

    /// Pause playback immediately.
    fn pause(&mut self);

    /// Whether the voice is paused (or was never started).
    fn is_paused(&self) -> bool;

    /// Whether playback reached its natural end.
    fn has_ended(&self) -> bool;

    /// Current volume.
    fn volume(&self) -> f32;

    fn set_volume(&mut self, volume: f32);

    fn set_muted(&mut self, muted: bool);

    fn set_looping(&mut self, looping: bool);

    /// Seek to a position in seconds.
    fn set_current_time(&mut self, seconds: f64);
}

/// Factory for voices.
pub trait AudioBackend: Send {
    /// Create a voice for `src`. The voice must report its asynchronous
    /// outcomes for `instance` through `signals`.
    fn create_voice(
        &mut self,
        instance: InstanceId,
        src: &str,
        signals: SignalSender,
    ) -> Box<dyn AudioVoice>;
}
