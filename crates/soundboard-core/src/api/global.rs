//! Global API functions.
//!
//! These functions touch the defaults store and every sound at once, and let
//! scripts drive time forward.

use crate::options::{seconds, OptionKey};
use rhai::{Dynamic, Engine, Map};

use super::options::{from_map, to_dynamic, to_map, to_option_value};
use super::require_handle;

/// Register global functions with the Rhai engine.
pub fn register(engine: &mut Engine) {
    // Defaults
    engine.register_fn("set_default", set_default);
    engine.register_fn("set_default", set_defaults);
    engine.register_fn("get_default", get_default);
    engine.register_fn("get_defaults", get_defaults);

    // Bulk
    engine.register_fn("stop_all_sounds", stop_all_sounds);
    engine.register_fn("stop_all_sounds", stop_all_sounds_in);
    engine.register_fn("mute_all_sounds", mute_all_sounds);
    engine.register_fn("mute_all_sounds", mute_all_sounds_in);
    engine.register_fn("unmute_all_sounds", unmute_all_sounds);
    engine.register_fn("unmute_all_sounds", unmute_all_sounds_in);
    engine.register_fn("is_muted", is_muted);
    engine.register_fn("is_muted", is_muted_in);

    // Time
    engine.register_fn("advance", advance);
    engine.register_fn("advance", advance_int);
}

/// Set a single default option.
///
/// # Example
/// ```rhai
/// set_default("fadeOut", 0.5);
/// ```
pub fn set_default(key: &str, value: Dynamic) {
    let Some(value) = to_option_value(&value) else {
        log::warn!("option '{}' has unsupported type {}", key, value.type_name());
        return;
    };
    let defaults = require_handle().with(|r| r.defaults().clone());
    if let Err(err) = defaults.set_named(key, value) {
        log::warn!("{}", err);
    }
}

/// Merge a map of options into the defaults.
pub fn set_defaults(options: Map) {
    let options = from_map(&options);
    require_handle().with(|r| r.defaults().merge(&options));
}

/// Read one default option. Unknown keys yield `()`.
pub fn get_default(key: &str) -> Dynamic {
    match key.parse::<OptionKey>() {
        Ok(key) => to_dynamic(require_handle().with(|r| r.defaults().get(key))),
        Err(err) => {
            log::warn!("{}", err);
            Dynamic::UNIT
        }
    }
}

/// All current defaults as a map.
pub fn get_defaults() -> Map {
    to_map(&require_handle().with(|r| r.defaults().snapshot()))
}

/// Stop every sound.
pub fn stop_all_sounds() {
    require_handle().with(|r| r.stop_all_sounds(None));
}

/// Stop every sound in a bucket.
pub fn stop_all_sounds_in(bucket: &str) {
    require_handle().with(|r| r.stop_all_sounds(Some(bucket)));
}

pub fn mute_all_sounds() {
    require_handle().with(|r| r.mute_all_sounds(None));
}

pub fn mute_all_sounds_in(bucket: &str) {
    require_handle().with(|r| r.mute_all_sounds(Some(bucket)));
}

pub fn unmute_all_sounds() {
    require_handle().with(|r| r.unmute_all_sounds(None));
}

pub fn unmute_all_sounds_in(bucket: &str) {
    require_handle().with(|r| r.unmute_all_sounds(Some(bucket)));
}

/// Global mute flag.
pub fn is_muted() -> bool {
    require_handle().with(|r| r.is_muted(None))
}

/// Mute flag of one bucket, regardless of the global flag.
pub fn is_muted_in(bucket: &str) -> bool {
    require_handle().with(|r| r.is_muted(Some(bucket)))
}

/// Drain playback signals and move fades forward by `secs` seconds.
///
/// # Example
/// ```rhai
/// play_sound("theme", #{ fadeIn: 2.0 });
/// advance(2.0);   // fade-in complete
/// ```
pub fn advance(secs: f64) {
    require_handle().with(|r| r.update(seconds(secs)));
}

/// Advance by whole seconds (integer overload).
pub fn advance_int(secs: i64) {
    advance(secs as f64);
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::Harness;

    #[test]
    fn test_defaults_roundtrip_through_script() {
        let h = Harness::new();
        h.run(
            r#"
            set_default("fadeOut", 0.5);
            set_default("stop_others", false);
            set_default(#{ bucket: "sfx", volume: 0.8 });
            set_default("pitch", 2.0);
            "#,
        );
        assert_eq!(h.eval::<f64>(r#"get_default("fadeOut")"#), 0.5);
        assert!(!h.eval::<bool>(r#"get_default("stopOthers")"#));
        assert_eq!(h.eval::<String>(r#"get_defaults().bucket"#), "sfx");
        assert_eq!(h.eval::<String>(r#"type_of(get_default("pitch"))"#), "()");

        h.run(r#"load_sound("click.mp3");"#);
        h.handle.with(|r| {
            let settings = &r.sound("click").unwrap().settings;
            assert_eq!(settings.bucket, "sfx");
            assert!(!settings.stop_others);
        });
    }

    #[test]
    fn test_bucket_and_global_mute_flags() {
        let h = Harness::new();
        h.run(
            r#"
            load_sound("theme.ogg", #{ bucket: "music" });
            play_sound("theme");
            mute_all_sounds("music");
            "#,
        );
        assert!(h.eval::<bool>(r#"is_muted("music")"#));
        assert!(!h.eval::<bool>("is_muted()"));

        h.run("mute_all_sounds(); unmute_all_sounds();");
        assert!(h.eval::<bool>(r#"is_muted("music")"#));
        let id = h.handle.with(|r| r.instances_of("theme")[0]);
        assert!(h.backend.voice(id).unwrap().muted);
    }

    #[test]
    fn test_advance_drives_fades() {
        let h = Harness::new();
        h.run(
            r#"
            load_sound("theme.ogg");
            play_sound("theme", #{ fadeIn: 2.0, volume: 0.5 });
            advance(1);
            "#,
        );
        let id = h.handle.with(|r| r.instances_of("theme")[0]);
        assert!((h.backend.voice(id).unwrap().volume - 0.25).abs() < 1e-3);

        h.run("advance(1.0); stop_all_sounds();");
        assert!(!h.eval::<bool>(r#"is_sound_playing("theme")"#));
        assert_eq!(
            h.events.events(),
            vec!["Audio Started", "Audio Started theme"]
        );
    }
}
