//! Process-wide fallback playback options.
//!
//! Every load and play call reads the defaults as the bottom layer of option
//! resolution. Definitions snapshot their resolved options at load time, so
//! changing a default only affects sounds loaded afterwards.

use crate::error::OptionError;
use crate::options::{OptionKey, OptionValue, PlaybackSettings, SoundOptions};
use std::sync::{Arc, OnceLock, RwLock};

/// Shared, mutable store of default playback options.
///
/// Cloning yields another handle to the same store.
///
/// The keyed setters are stricter than a plain key/value store: an unknown
/// key or a value of the wrong kind is refused with an [`OptionError`] and
/// leaves the defaults unchanged. Numeric ranges are not checked. Scripts
/// see refusals as warnings in the log.
#[derive(Clone, Debug, Default)]
pub struct DefaultsStore {
    settings: Arc<RwLock<PlaybackSettings>>,
}

static GLOBAL: OnceLock<DefaultsStore> = OnceLock::new();

/// The process-wide defaults store shared by every registry.
pub fn global() -> DefaultsStore {
    GLOBAL.get_or_init(DefaultsStore::new).clone()
}

impl DefaultsStore {
    /// Create a store holding the built-in defaults.
    pub fn new() -> Self {
        Self::with_settings(PlaybackSettings::default())
    }

    /// Create a store with specific initial settings.
    pub fn with_settings(settings: PlaybackSettings) -> Self {
        Self {
            settings: Arc::new(RwLock::new(settings)),
        }
    }

    /// Set a single default. Last write wins.
    pub fn set(&self, key: OptionKey, value: impl Into<OptionValue>) -> Result<(), OptionError> {
        let mut settings = self.settings.write().expect("Defaults lock poisoned");
        settings.set(key, value.into())
    }

    /// Set a default by its string name.
    pub fn set_named(&self, key: &str, value: impl Into<OptionValue>) -> Result<(), OptionError> {
        self.set(key.parse()?, value)
    }

    /// Shallow-merge an overlay into the defaults.
    ///
    /// `alias` is meaningless as a default and is ignored.
    pub fn merge(&self, options: &SoundOptions) {
        let mut settings = self.settings.write().expect("Defaults lock poisoned");
        *settings = settings.overlay(options);
    }

    /// Read a single default.
    pub fn get(&self, key: OptionKey) -> OptionValue {
        self.settings.read().expect("Defaults lock poisoned").get(key)
    }

    /// Snapshot of all current defaults.
    pub fn snapshot(&self) -> PlaybackSettings {
        self.settings.read().expect("Defaults lock poisoned").clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_set_and_get() {
        let store = DefaultsStore::new();
        store.set(OptionKey::Volume, 0.5).unwrap();
        store.set_named("fadeOut", 1.5).unwrap();
        assert_eq!(store.get(OptionKey::Volume), OptionValue::Number(0.5));
        assert!((store.snapshot().fade_out - 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_store_merge_is_shallow() {
        let store = DefaultsStore::new();
        store.merge(&SoundOptions::new().with_bucket("ui").with_loop(true));
        store.merge(&SoundOptions::new().with_loop(false));
        let snapshot = store.snapshot();
        assert_eq!(snapshot.bucket, "ui");
        assert!(!snapshot.looping);
    }

    #[test]
    fn test_store_clones_share_state() {
        let a = DefaultsStore::new();
        let b = a.clone();
        a.set(OptionKey::StopOthers, false).unwrap();
        assert_eq!(b.get(OptionKey::StopOthers), OptionValue::Bool(false));
    }

    #[test]
    fn test_unknown_key() {
        let store = DefaultsStore::new();
        assert!(store.set_named("pan", 0.5).is_err());
        assert_eq!(store.snapshot(), PlaybackSettings::default());
    }

    #[test]
    fn test_wrong_kind_is_refused() {
        let store = DefaultsStore::new();
        assert!(matches!(
            store.set(OptionKey::Volume, "loud"),
            Err(OptionError::WrongKind { .. })
        ));
        assert_eq!(store.snapshot(), PlaybackSettings::default());
        // Out-of-range numbers are accepted as given.
        store.set(OptionKey::Volume, 3.0).unwrap();
        assert_eq!(store.get(OptionKey::Volume), OptionValue::Number(3.0));
    }
}
