//! Read-only queries.

use super::Registry;
use crate::backend::InstanceId;
use crate::state::SoundDefinition;

impl Registry {
    /// Whether an alias is loaded.
    pub fn is_sound_loaded(&self, alias: &str) -> bool {
        self.state.sounds.contains_key(alias)
    }

    /// Whether any listed instance of a sound is audibly running.
    ///
    /// Paused and ended instances do not count; unknown aliases are not
    /// playing.
    pub fn is_sound_playing(&self, alias: &str) -> bool {
        let Some(definition) = self.state.sounds.get(alias) else {
            return false;
        };
        definition.playing_instances.iter().any(|id| {
            self.instances
                .get(id)
                .is_some_and(|instance| !instance.voice.is_paused() && !instance.voice.has_ended())
        })
    }

    /// Every loaded alias, sorted.
    pub fn get_loaded_sounds(&self) -> Vec<String> {
        let mut aliases: Vec<String> = self.state.sounds.keys().cloned().collect();
        aliases.sort();
        aliases
    }

    /// Aliases filed under a bucket, in load order.
    pub fn get_sounds_in_bucket(&self, bucket: &str) -> Vec<String> {
        self.state.bucket_members(bucket).to_vec()
    }

    /// Definition of a loaded sound.
    pub fn sound(&self, alias: &str) -> Option<&SoundDefinition> {
        self.state.sounds.get(alias)
    }

    /// Listed instances of a sound, oldest first.
    pub fn instances_of(&self, alias: &str) -> Vec<InstanceId> {
        self.state
            .sounds
            .get(alias)
            .map(|def| def.playing_instances.clone())
            .unwrap_or_default()
    }

    /// Number of listed instances of a sound.
    pub fn instance_count(&self, alias: &str) -> usize {
        self.state
            .sounds
            .get(alias)
            .map_or(0, |def| def.playing_instances.len())
    }

    /// Number of live instances, including detached ones still fading out.
    pub fn live_instances(&self) -> usize {
        self.instances.len()
    }
}
