//! Per-sound API functions.
//!
//! Every function has a plain form and a form taking an option map.

use crate::options::SoundOptions;
use rhai::{Array, Dynamic, Engine, Map};

use super::options::from_map;
use super::require_handle;

/// Register sound functions with the Rhai engine.
pub fn register(engine: &mut Engine) {
    // Definitions
    engine.register_fn("load_sound", load_sound);
    engine.register_fn("load_sound", load_sound_with);
    engine.register_fn("unload_sound", unload_sound);

    // Playback
    engine.register_fn("play_sound", play_sound);
    engine.register_fn("play_sound", play_sound_with);
    engine.register_fn("pause_sound", pause_sound);
    engine.register_fn("pause_sound", pause_sound_with);
    engine.register_fn("resume_sound", resume_sound);
    engine.register_fn("resume_sound", resume_sound_with);
    engine.register_fn("stop_sound", stop_sound);
    engine.register_fn("stop_sound", stop_sound_with);
    engine.register_fn("play_only_in_bucket", play_only_in_bucket);
    engine.register_fn("play_only_in_bucket", play_only_in_bucket_with);

    // Queries
    engine.register_fn("is_sound_loaded", is_sound_loaded);
    engine.register_fn("is_sound_playing", is_sound_playing);
    engine.register_fn("get_loaded_sounds", get_loaded_sounds);
    engine.register_fn("get_sounds_in_bucket", get_sounds_in_bucket);
    engine.register_fn("instance_count", instance_count);
}

/// Load a sound with the current defaults.
///
/// # Example
/// ```rhai
/// load_sound("click.mp3");                       // alias "click"
/// load_sound("theme.ogg", #{ bucket: "music", "loop": true });
/// ```
pub fn load_sound(filename: &str) {
    load_sound_with(filename, Map::new());
}

/// Load a sound with options.
pub fn load_sound_with(filename: &str, options: Map) {
    let options = from_map(&options);
    require_handle().with(|r| r.load_sound(filename, &options));
}

/// Unload a sound, stopping it first.
pub fn unload_sound(alias: &str) {
    require_handle().with(|r| r.unload_sound(alias));
}

/// Play a sound. Returns the instance id, or `()` if the alias is unknown.
pub fn play_sound(alias: &str) -> Dynamic {
    play_sound_with(alias, Map::new())
}

/// Play a sound with per-call options.
pub fn play_sound_with(alias: &str, options: Map) -> Dynamic {
    let options = from_map(&options);
    match require_handle().with(|r| r.play_sound(alias, &options)) {
        Some(id) => Dynamic::from(id.as_u64() as i64),
        None => Dynamic::UNIT,
    }
}

/// Fade out and pause a sound.
pub fn pause_sound(alias: &str) {
    pause_sound_with(alias, Map::new());
}

/// Fade out and pause a sound with per-call options.
pub fn pause_sound_with(alias: &str, options: Map) {
    let options = from_map(&options);
    require_handle().with(|r| r.pause_sound(alias, &options));
}

/// Resume a paused sound, or start it if nothing is playing.
pub fn resume_sound(alias: &str) {
    resume_sound_with(alias, Map::new());
}

/// Resume a sound with per-call options.
pub fn resume_sound_with(alias: &str, options: Map) {
    let options = from_map(&options);
    require_handle().with(|r| r.resume_sound(alias, &options));
}

/// Fade out and stop every instance of a sound.
pub fn stop_sound(alias: &str) {
    stop_sound_with(alias, Map::new());
}

/// Stop a sound with per-call options.
pub fn stop_sound_with(alias: &str, options: Map) {
    let options = from_map(&options);
    require_handle().with(|r| r.stop_sound(alias, &options));
}

/// Play `alias` and stop everything else playing in `bucket`.
///
/// # Example
/// ```rhai
/// play_only_in_bucket("playlist", "song2", #{ fadeIn: 1.0 });
/// ```
pub fn play_only_in_bucket(bucket: &str, alias: &str) {
    require_handle().with(|r| r.play_only_in_bucket(bucket, alias, &SoundOptions::new()));
}

/// Play only `alias` in `bucket`, with per-call options for the target.
pub fn play_only_in_bucket_with(bucket: &str, alias: &str, options: Map) {
    let options = from_map(&options);
    require_handle().with(|r| r.play_only_in_bucket(bucket, alias, &options));
}

pub fn is_sound_loaded(alias: &str) -> bool {
    require_handle().with(|r| r.is_sound_loaded(alias))
}

pub fn is_sound_playing(alias: &str) -> bool {
    require_handle().with(|r| r.is_sound_playing(alias))
}

/// All loaded aliases, sorted.
pub fn get_loaded_sounds() -> Array {
    require_handle().with(|r| r.get_loaded_sounds().into_iter().map(Dynamic::from).collect())
}

/// Aliases in a bucket, in load order.
pub fn get_sounds_in_bucket(bucket: &str) -> Array {
    require_handle().with(|r| {
        r.get_sounds_in_bucket(bucket)
            .into_iter()
            .map(Dynamic::from)
            .collect()
    })
}

/// Number of listed instances of a sound.
pub fn instance_count(alias: &str) -> i64 {
    require_handle().with(|r| r.instance_count(alias) as i64)
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::Harness;

    #[test]
    fn test_load_and_query() {
        let h = Harness::new();
        h.run(
            r#"
            load_sound("click.mp3");
            load_sound("theme.ogg", #{ bucket: "music", "loop": true, volume: 0.4 });
            load_sound("theme.wav", #{ bucket: "sfx" });
            "#,
        );
        assert!(h.eval::<bool>(r#"is_sound_loaded("theme")"#));
        assert_eq!(h.eval::<i64>("get_loaded_sounds().len()"), 2);
        assert_eq!(
            h.eval::<String>(r#"get_sounds_in_bucket("music")[0]"#),
            "theme"
        );
        assert_eq!(h.eval::<i64>(r#"get_sounds_in_bucket("sfx").len()"#), 0);

        h.handle.with(|r| {
            let def = r.sound("theme").unwrap();
            assert_eq!(def.src, "res/theme.ogg");
            assert!(def.settings.looping);
        });
    }

    #[test]
    fn test_play_returns_instance_id() {
        let h = Harness::new();
        h.run(r#"load_sound("click.mp3");"#);
        assert_eq!(h.eval::<i64>(r#"play_sound("click")"#), 1);
        assert_eq!(h.eval::<String>(r#"type_of(play_sound("missing"))"#), "()");
        assert!(h.eval::<bool>(r#"is_sound_playing("click")"#));
    }

    #[test]
    fn test_pause_resume_stop() {
        let h = Harness::new();
        h.run(
            r#"
            load_sound("loop.ogg", #{ "loop": true });
            play_sound("loop");
            pause_sound("loop", #{ fadeOut: 0 });
            "#,
        );
        assert!(!h.eval::<bool>(r#"is_sound_playing("loop")"#));
        assert_eq!(h.eval::<i64>(r#"instance_count("loop")"#), 1);

        h.run(r#"resume_sound("loop");"#);
        assert!(h.eval::<bool>(r#"is_sound_playing("loop")"#));

        h.run(r#"stop_sound("loop"); unload_sound("loop");"#);
        assert!(!h.eval::<bool>(r#"is_sound_loaded("loop")"#));
    }

    #[test]
    fn test_play_only_in_bucket() {
        let h = Harness::new();
        h.run(
            r#"
            load_sound("song1.mp3", #{ bucket: "playlist" });
            load_sound("song2.mp3", #{ bucket: "playlist" });
            play_sound("song1");
            play_only_in_bucket("playlist", "song2", #{ fadeIn: 1.0 });
            advance(1.0);
            "#,
        );
        assert!(!h.eval::<bool>(r#"is_sound_playing("song1")"#));
        assert!(h.eval::<bool>(r#"is_sound_playing("song2")"#));
        assert!(h.events.events().contains(&"Audio Started song2".to_string()));
    }
}
