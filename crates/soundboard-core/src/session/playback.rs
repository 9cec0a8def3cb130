//! Play, pause, resume and stop.

use super::{InstancePhase, PlaybackInstance, Registry};
use crate::backend::InstanceId;
use crate::error::Result;
use crate::fade::FadeCompletion;
use crate::options::SoundOptions;

impl Registry {
    /// Start a new instance of a sound.
    ///
    /// Returns the instance id, or `None` if the alias is not loaded. The
    /// start itself is confirmed or rejected later through [`Registry::pump`].
    pub fn play_sound(&mut self, alias: &str, options: &SoundOptions) -> Option<InstanceId> {
        match self.try_play(alias, options) {
            Ok(id) => {
                self.changed();
                Some(id)
            }
            Err(err) => {
                log::warn!("{}", err);
                None
            }
        }
    }

    pub(super) fn try_play(&mut self, alias: &str, options: &SoundOptions) -> Result<InstanceId> {
        let definition = self.definition(alias)?;
        let settings = definition.settings.overlay_playback(options);
        let src = definition.src.clone();

        if settings.stop_others {
            self.stop_instances(alias, options);
        }

        let id = self.allocate_instance_id();
        let mut voice = self.backend.create_voice(id, &src, self.signal_tx.clone());
        voice.set_looping(settings.looping);
        voice.set_muted(self.state.is_sound_muted(alias));
        let fade_in = settings.fade_in_duration();
        voice.set_volume(if fade_in.is_zero() { settings.volume } else { 0.0 });

        // Listed before play() so signals always find the instance.
        self.definition_mut(alias)?.playing_instances.push(id);
        self.instances.insert(
            id,
            PlaybackInstance {
                alias: alias.to_string(),
                bucket: settings.bucket.clone(),
                voice,
                phase: InstancePhase::Pending,
                announced: false,
                target_volume: settings.volume,
                fade_in,
            },
        );
        if let Some(instance) = self.instances.get_mut(&id) {
            instance.voice.play();
        }
        log::debug!("Playing '{}' as {}", alias, id);
        Ok(id)
    }

    /// Fade out and pause every listed instance of a sound.
    ///
    /// Instances stay listed; pausing is not removal.
    pub fn pause_sound(&mut self, alias: &str, options: &SoundOptions) {
        let (ids, settings) = match self.definition(alias) {
            Ok(def) => (def.playing_instances.clone(), def.settings.overlay_playback(options)),
            Err(err) => {
                log::warn!("{}", err);
                return;
            }
        };
        for id in ids {
            if let Some(instance) = self.instances.get_mut(&id) {
                instance.phase = InstancePhase::Pausing;
            }
            self.fade_instance(id, 0.0, settings.fade_out_duration(), FadeCompletion::Pause);
        }
        self.changed();
    }

    /// Resume paused instances of a sound, or play it if none are listed.
    ///
    /// Instances that are not paused are left alone.
    pub fn resume_sound(&mut self, alias: &str, options: &SoundOptions) {
        let (ids, settings) = match self.definition(alias) {
            Ok(def) => (def.playing_instances.clone(), def.settings.overlay_playback(options)),
            Err(err) => {
                log::warn!("{}", err);
                return;
            }
        };
        if ids.is_empty() {
            self.play_sound(alias, options);
            return;
        }

        let fade_in = settings.fade_in_duration();
        for id in ids {
            let Some(instance) = self.instances.get_mut(&id) else {
                continue;
            };
            if !instance.voice.is_paused() {
                continue;
            }
            instance.phase = InstancePhase::Resuming;
            instance.target_volume = settings.volume;
            instance.fade_in = fade_in;
            instance.voice.play();
            log::debug!("Resuming {} ({})", id, alias);
            self.fade_instance(id, settings.volume, fade_in, FadeCompletion::Hold);
        }
        self.changed();
    }

    /// Fade out and release every listed instance of a sound.
    pub fn stop_sound(&mut self, alias: &str, options: &SoundOptions) {
        if let Err(err) = self.definition(alias) {
            log::warn!("{}", err);
            return;
        }
        self.stop_instances(alias, options);
        self.changed();
    }

    /// Take the instance list of a loaded sound and fade each instance out.
    ///
    /// The list is cleared before any fade starts, so a second stop or a
    /// late signal finds nothing to process twice.
    pub(super) fn stop_instances(&mut self, alias: &str, options: &SoundOptions) {
        let Ok(definition) = self.definition_mut(alias) else {
            return;
        };
        let settings = definition.settings.overlay_playback(options);
        let taken = std::mem::take(&mut definition.playing_instances);

        for id in taken {
            if let Some(instance) = self.instances.get_mut(&id) {
                instance.phase = InstancePhase::Stopping;
            }
            self.fade_instance(id, 0.0, settings.fade_out_duration(), FadeCompletion::Stop);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{SimulatedBackend, StartPolicy};
    use crate::defaults::DefaultsStore;
    use crate::host::{HostBindings, PrefixResolver, RecordingNotifier};
    use std::sync::Arc;
    use std::time::Duration;

    struct Fixture {
        reg: Registry,
        backend: SimulatedBackend,
        events: RecordingNotifier,
    }

    fn fixture(policy: StartPolicy) -> Fixture {
        let backend = SimulatedBackend::with_policy(policy);
        let events = RecordingNotifier::new();
        let bindings = HostBindings::new(Arc::new(PrefixResolver::default()), Arc::new(events.clone()));
        let reg = Registry::new("doc", Box::new(backend.clone()), bindings)
            .with_defaults(DefaultsStore::new());
        Fixture { reg, backend, events }
    }

    #[test]
    fn test_play_unknown_alias_is_noop() {
        let mut f = fixture(StartPolicy::Confirm);
        assert_eq!(f.reg.play_sound("ghost", &SoundOptions::new()), None);
        assert_eq!(f.reg.version(), 0);
        assert!(f.backend.voice_ids().is_empty());
    }

    #[test]
    fn test_play_sets_up_voice() {
        let mut f = fixture(StartPolicy::Manual);
        f.reg.load_sound("a.mp3", &SoundOptions::new().with_volume(0.7).with_loop(true));
        let id = f.reg.play_sound("a", &SoundOptions::new()).unwrap();

        let voice = f.backend.voice(id).unwrap();
        assert!(voice.looping);
        assert!(!voice.muted);
        assert!((voice.volume - 0.7).abs() < 1e-6);
        assert_eq!(voice.play_count, 1);
        assert_eq!(f.reg.instances_of("a"), vec![id]);
        assert_eq!(f.reg.instance_phase(id), Some(InstancePhase::Pending));
    }

    #[test]
    fn test_fade_in_starts_silent() {
        let mut f = fixture(StartPolicy::Confirm);
        f.reg.load_sound("a.mp3", &SoundOptions::new());
        let id = f.reg.play_sound("a", &SoundOptions::new().with_fade_in(1.0).with_volume(0.8)).unwrap();
        assert_eq!(f.backend.voice(id).unwrap().volume, 0.0);

        f.reg.update(Duration::from_millis(500));
        let mid = f.backend.voice(id).unwrap().volume;
        assert!((mid - 0.4).abs() < 1e-3);

        f.reg.update(Duration::from_millis(500));
        assert!((f.backend.voice(id).unwrap().volume - 0.8).abs() < 1e-6);
        assert_eq!(f.reg.active_fades(), 0);
    }

    #[test]
    fn test_stop_others_replaces_instances() {
        let mut f = fixture(StartPolicy::Confirm);
        f.reg.load_sound("a.mp3", &SoundOptions::new());
        let first = f.reg.play_sound("a", &SoundOptions::new()).unwrap();
        let second = f.reg.play_sound("a", &SoundOptions::new()).unwrap();
        f.reg.update(Duration::ZERO);

        assert_eq!(f.reg.instances_of("a"), vec![second]);
        let old = f.backend.voice(first).unwrap();
        assert!(old.paused);
        assert!(old.released);
    }

    #[test]
    fn test_without_stop_others_instances_accumulate() {
        let mut f = fixture(StartPolicy::Confirm);
        f.reg.load_sound("a.mp3", &SoundOptions::new().with_stop_others(false));
        f.reg.play_sound("a", &SoundOptions::new());
        f.reg.play_sound("a", &SoundOptions::new());
        f.reg.update(Duration::ZERO);
        assert_eq!(f.reg.instance_count("a"), 2);
    }

    #[test]
    fn test_pause_with_zero_fade_is_immediate() {
        let mut f = fixture(StartPolicy::Confirm);
        f.reg.load_sound("a.mp3", &SoundOptions::new().with_volume(0.6));
        let id = f.reg.play_sound("a", &SoundOptions::new()).unwrap();
        f.reg.update(Duration::ZERO);

        let before = f.backend.voice(id).unwrap().volume_history.len();
        f.reg.pause_sound("a", &SoundOptions::new().with_fade_out(0.0));

        let voice = f.backend.voice(id).unwrap();
        assert!(voice.paused);
        assert_eq!(&voice.volume_history[before..], &[0.0]);
        assert_eq!(f.reg.instance_count("a"), 1);
        assert!(!f.reg.is_sound_playing("a"));
    }

    #[test]
    fn test_pause_fades_then_pauses() {
        let mut f = fixture(StartPolicy::Confirm);
        f.reg.load_sound("a.mp3", &SoundOptions::new().with_fade_out(1.0));
        let id = f.reg.play_sound("a", &SoundOptions::new()).unwrap();
        f.reg.update(Duration::ZERO);

        f.reg.pause_sound("a", &SoundOptions::new());
        assert!(!f.backend.voice(id).unwrap().paused);
        assert_eq!(f.reg.instance_phase(id), Some(InstancePhase::Pausing));

        f.reg.update(Duration::from_secs(1));
        assert!(f.backend.voice(id).unwrap().paused);
        assert_eq!(f.reg.instance_phase(id), Some(InstancePhase::Paused));
    }

    #[test]
    fn test_resume_fades_paused_instances_back_in() {
        let mut f = fixture(StartPolicy::Confirm);
        f.reg.load_sound("a.mp3", &SoundOptions::new().with_volume(0.5));
        let id = f.reg.play_sound("a", &SoundOptions::new()).unwrap();
        f.reg.update(Duration::ZERO);
        f.reg.pause_sound("a", &SoundOptions::new());
        f.events.take();

        f.reg.resume_sound("a", &SoundOptions::new().with_fade_in(2.0));
        assert!(f.reg.is_sound_playing("a"));
        f.reg.update(Duration::from_secs(1));
        assert!((f.backend.voice(id).unwrap().volume - 0.25).abs() < 1e-3);
        f.reg.update(Duration::from_secs(1));
        assert!((f.backend.voice(id).unwrap().volume - 0.5).abs() < 1e-6);

        assert_eq!(f.reg.instance_phase(id), Some(InstancePhase::Active));
        assert_eq!(f.backend.voice(id).unwrap().play_count, 2);
        // A resumed instance is not announced twice.
        assert!(f.events.events().is_empty());
    }

    #[test]
    fn test_resume_leaves_playing_instances_alone() {
        let mut f = fixture(StartPolicy::Confirm);
        f.reg.load_sound("a.mp3", &SoundOptions::new());
        let id = f.reg.play_sound("a", &SoundOptions::new()).unwrap();
        f.reg.update(Duration::ZERO);
        f.reg.resume_sound("a", &SoundOptions::new());
        assert_eq!(f.backend.voice(id).unwrap().play_count, 1);
        assert_eq!(f.reg.instance_count("a"), 1);
    }

    #[test]
    fn test_stop_clears_list_before_fade_finishes() {
        let mut f = fixture(StartPolicy::Confirm);
        f.reg.load_sound("a.mp3", &SoundOptions::new().with_fade_out(1.0));
        let id = f.reg.play_sound("a", &SoundOptions::new()).unwrap();
        f.reg.update(Duration::ZERO);

        f.reg.stop_sound("a", &SoundOptions::new());
        assert_eq!(f.reg.instance_count("a"), 0);
        assert!(!f.reg.is_sound_playing("a"));
        assert_eq!(f.reg.instance_phase(id), Some(InstancePhase::Stopping));

        // A second stop has nothing left to take.
        f.reg.stop_sound("a", &SoundOptions::new());
        f.reg.update(Duration::from_secs(1));
        let voice = f.backend.voice(id).unwrap();
        assert!(voice.paused);
        assert_eq!(voice.current_time, 0.0);
        assert!(voice.released);
        assert_eq!(f.reg.instance_phase(id), None);
    }

    #[test]
    fn test_play_muted_bucket_starts_muted() {
        let mut f = fixture(StartPolicy::Confirm);
        f.reg.load_sound("a.mp3", &SoundOptions::new().with_bucket("music"));
        f.reg.mute_all_sounds(Some("music"));
        let id = f.reg.play_sound("a", &SoundOptions::new()).unwrap();
        assert!(f.backend.voice(id).unwrap().muted);
    }
}
