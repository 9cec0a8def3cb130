//! State model types for a sound registry.
//!
//! These types hold the bookkeeping of one host: the loaded sound
//! definitions, which bucket each belongs to, and the mute flags.

use crate::backend::InstanceId;
use crate::mute::MuteState;
use crate::options::PlaybackSettings;
use std::collections::HashMap;

/// Bookkeeping snapshot of one registry.
///
/// Invariant: every alias in `sounds` appears exactly once, in the bucket
/// named by its definition.
#[derive(Clone, Debug, Default)]
pub struct RegistryState {
    /// Monotonically increasing version for change detection.
    pub version: u64,
    /// Sound definitions by alias.
    pub sounds: HashMap<String, SoundDefinition>,
    /// Bucket membership in load order.
    pub buckets: HashMap<String, Vec<String>>,
    /// Global and bucket mute flags.
    pub mute: MuteState,
}

impl RegistryState {
    /// Create an empty, unmuted state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment the version counter.
    pub fn bump_version(&mut self) {
        self.version = self.version.wrapping_add(1);
    }

    /// Insert a definition and file it under its bucket.
    ///
    /// Returns false, leaving the state untouched, if the alias exists.
    pub fn insert_sound(&mut self, definition: SoundDefinition) -> bool {
        if self.sounds.contains_key(&definition.alias) {
            return false;
        }
        let members = self
            .buckets
            .entry(definition.settings.bucket.clone())
            .or_default();
        if !members.contains(&definition.alias) {
            members.push(definition.alias.clone());
        }
        self.sounds.insert(definition.alias.clone(), definition);
        true
    }

    /// Remove a definition and its bucket membership.
    pub fn remove_sound(&mut self, alias: &str) -> Option<SoundDefinition> {
        let definition = self.sounds.remove(alias)?;
        if let Some(members) = self.buckets.get_mut(&definition.settings.bucket) {
            members.retain(|member| member != alias);
        }
        Some(definition)
    }

    /// Aliases filed under a bucket, in load order.
    pub fn bucket_members(&self, bucket: &str) -> &[String] {
        self.buckets.get(bucket).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether a loaded sound is effectively muted.
    pub fn is_sound_muted(&self, alias: &str) -> bool {
        self.sounds
            .get(alias)
            .map(|def| self.mute.effective(&def.settings.bucket))
            .unwrap_or(self.mute.global)
    }
}

/// A loaded sound.
#[derive(Clone, Debug, PartialEq)]
pub struct SoundDefinition {
    /// Unique name within the registry.
    pub alias: String,
    /// Resolved source locator.
    pub src: String,
    /// Options resolved at load time.
    pub settings: PlaybackSettings,
    /// Live instances in the order they were created.
    pub playing_instances: Vec<InstanceId>,
}

impl SoundDefinition {
    /// Create a definition with no instances.
    pub fn new(alias: String, src: String, settings: PlaybackSettings) -> Self {
        Self {
            alias,
            src,
            settings,
            playing_instances: Vec::new(),
        }
    }
}
