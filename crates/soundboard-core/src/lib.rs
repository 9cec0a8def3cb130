//! Soundboard Core - Sound registry and playback sessions for embedded hosts.
//!
//! This crate provides the building blocks for a host-scoped sound board:
//!
//! - **Defaults** - Process-wide fallback playback options
//! - **Registries** - One registry per host, created on first access
//! - **Session** - Load, play, pause, resume, stop and unload sounds
//! - **Fade** - Per-instance volume ramps, last fade wins
//! - **Mute** - Global and per-bucket mute flags
//! - **Host** - Resolver, event notifier and refresh hook contracts
//! - **Backend** - The audio primitive contract and a simulated backend
//! - **API** - Rhai scripting API
//!
//! # Architecture
//!
//! A [`Registry`] owns everything for one host and runs every operation
//! synchronously. Audio backends report start confirmations, rejections and
//! natural ends as [`PlaybackSignal`] messages; the host drains them with
//! [`Registry::pump`] and moves fades forward with [`Registry::advance`]
//! (or both via [`Registry::update`]).
//!
//! ```
//! use soundboard_core::{HostBindings, Registry, SimulatedBackend, SoundOptions};
//! use std::time::Duration;
//!
//! let backend = SimulatedBackend::new();
//! let mut registry = Registry::new("doc", Box::new(backend), HostBindings::default());
//! registry.load_sound("click.mp3", &SoundOptions::new().with_bucket("sfx"));
//! registry.play_sound("click", &SoundOptions::new().with_fade_in(0.5));
//! registry.update(Duration::from_millis(500));
//! assert!(registry.is_sound_playing("click"));
//! ```

pub mod api;
pub mod backend;
pub mod defaults;
pub mod error;
pub mod fade;
pub mod host;
pub mod mute;
pub mod options;
pub mod registries;
pub mod session;
pub mod state;

// Re-export main types for convenience
pub use backend::{
    AudioBackend, AudioVoice, InstanceId, PlaybackSignal, SignalKind, SimulatedBackend,
    StartPolicy, VoiceSnapshot,
};
pub use defaults::DefaultsStore;
pub use error::{OptionError, SoundError};
pub use fade::{FadeCompletion, FadeEngine, FadeJob, FadeStep};
pub use host::{
    EventNotifier, HostBindings, LifecycleEvent, LogNotifier, Notification, PendingNotifications,
    PrefixResolver, RecordingNotifier, RefreshHook, ResourceResolver,
};
pub use mute::MuteState;
pub use options::{OptionKey, OptionValue, PlaybackSettings, SoundOptions, DEFAULT_BUCKET};
pub use registries::{BackendFactory, Registries};
pub use session::{alias_from_filename, InstancePhase, Registry};
pub use state::{RegistryHandle, RegistryState, SoundDefinition};
