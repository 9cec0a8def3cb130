//! Operations over all sounds or one bucket.

use super::Registry;
use crate::options::SoundOptions;

impl Registry {
    /// Stop every loaded sound, or only those filed under `bucket`.
    ///
    /// Each sound fades out with its own load-time fade-out.
    pub fn stop_all_sounds(&mut self, bucket: Option<&str>) {
        for alias in self.aliases_in(bucket) {
            self.stop_instances(&alias, &SoundOptions::default());
        }
        self.changed();
    }

    /// Mute globally, or mute one bucket.
    pub fn mute_all_sounds(&mut self, bucket: Option<&str>) {
        self.set_muted(bucket, true);
    }

    /// Clear the global mute flag, or one bucket's flag.
    ///
    /// A sound stays silent while the other flag still applies to it.
    pub fn unmute_all_sounds(&mut self, bucket: Option<&str>) {
        self.set_muted(bucket, false);
    }

    /// Read the global mute flag, or one bucket's flag.
    pub fn is_muted(&self, bucket: Option<&str>) -> bool {
        self.state.mute.is_muted(bucket)
    }

    /// Make `alias` the only sound playing in `bucket`.
    ///
    /// Other playing sounds in the bucket are stopped. The target is started
    /// only if it is not playing already; a running target is left alone.
    pub fn play_only_in_bucket(&mut self, bucket: &str, alias: &str, options: &SoundOptions) {
        for member in self.state.bucket_members(bucket).to_vec() {
            if member == alias {
                if !self.is_sound_playing(&member) {
                    if let Err(err) = self.try_play(&member, options) {
                        log::warn!("{}", err);
                    }
                }
            } else if self.is_sound_playing(&member) {
                self.stop_instances(&member, &SoundOptions::default());
            }
        }
        self.changed();
    }

    fn set_muted(&mut self, bucket: Option<&str>, muted: bool) {
        self.state.mute.set_muted(bucket, muted);
        let mute = &self.state.mute;
        for instance in self.instances.values_mut() {
            if bucket.map_or(true, |bucket| instance.bucket == bucket) {
                instance.voice.set_muted(mute.effective(&instance.bucket));
            }
        }
        log::debug!(
            "{} {}",
            if muted { "Muted" } else { "Unmuted" },
            bucket.unwrap_or("all sounds")
        );
        self.changed();
    }

    /// Loaded aliases, optionally restricted to one bucket.
    fn aliases_in(&self, bucket: Option<&str>) -> Vec<String> {
        match bucket {
            Some(bucket) => self.state.bucket_members(bucket).to_vec(),
            None => self.get_loaded_sounds(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{SimulatedBackend, StartPolicy};
    use crate::defaults::DefaultsStore;
    use crate::host::HostBindings;
    use std::time::Duration;

    fn registry() -> (Registry, SimulatedBackend) {
        let backend = SimulatedBackend::with_policy(StartPolicy::Confirm);
        let mut reg = Registry::new("doc", Box::new(backend.clone()), HostBindings::default())
            .with_defaults(DefaultsStore::new());
        reg.load_sound("intro.mp3", &SoundOptions::new().with_bucket("music"));
        reg.load_sound("theme.mp3", &SoundOptions::new().with_bucket("music"));
        reg.load_sound("click.mp3", &SoundOptions::new().with_bucket("sfx"));
        (reg, backend)
    }

    #[test]
    fn test_stop_all_in_bucket() {
        let (mut reg, _) = registry();
        reg.play_sound("intro", &SoundOptions::new());
        reg.play_sound("click", &SoundOptions::new());
        reg.update(Duration::ZERO);

        reg.stop_all_sounds(Some("music"));
        assert!(!reg.is_sound_playing("intro"));
        assert!(reg.is_sound_playing("click"));

        reg.stop_all_sounds(None);
        assert!(!reg.is_sound_playing("click"));
        assert_eq!(reg.live_instances(), 0);
    }

    #[test]
    fn test_mute_applies_to_live_instances() {
        let (mut reg, backend) = registry();
        let music = reg.play_sound("theme", &SoundOptions::new()).unwrap();
        let sfx = reg.play_sound("click", &SoundOptions::new()).unwrap();

        reg.mute_all_sounds(Some("music"));
        assert!(reg.is_muted(Some("music")));
        assert!(!reg.is_muted(None));
        assert!(backend.voice(music).unwrap().muted);
        assert!(!backend.voice(sfx).unwrap().muted);
    }

    #[test]
    fn test_global_unmute_keeps_bucket_mute() {
        let (mut reg, backend) = registry();
        let music = reg.play_sound("theme", &SoundOptions::new()).unwrap();
        let sfx = reg.play_sound("click", &SoundOptions::new()).unwrap();

        reg.mute_all_sounds(Some("music"));
        reg.mute_all_sounds(None);
        assert!(backend.voice(sfx).unwrap().muted);

        reg.unmute_all_sounds(None);
        assert!(!backend.voice(sfx).unwrap().muted);
        assert!(backend.voice(music).unwrap().muted);
        assert!(reg.is_muted(Some("music")));
    }

    #[test]
    fn test_play_only_in_bucket() {
        let (mut reg, _) = registry();
        reg.play_sound("intro", &SoundOptions::new());
        reg.play_sound("click", &SoundOptions::new());
        reg.update(Duration::ZERO);

        reg.play_only_in_bucket("music", "theme", &SoundOptions::new());
        assert!(!reg.is_sound_playing("intro"));
        assert!(reg.is_sound_playing("theme"));
        assert!(reg.is_sound_playing("click"));

        let running = reg.instances_of("theme");
        reg.play_only_in_bucket("music", "theme", &SoundOptions::new());
        assert_eq!(reg.instances_of("theme"), running);
    }

    #[test]
    fn test_play_only_target_outside_bucket() {
        let (mut reg, _) = registry();
        reg.play_sound("intro", &SoundOptions::new());
        reg.play_only_in_bucket("music", "click", &SoundOptions::new());
        assert!(!reg.is_sound_playing("intro"));
        assert!(!reg.is_sound_playing("click"));
    }
}
