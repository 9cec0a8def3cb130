//! Conversion between Rhai values and playback options.
//!
//! Scripts pass options as object maps. Unknown keys and mistyped values are
//! logged and skipped; a script never fails because of an option.

use crate::options::{OptionKey, OptionValue, PlaybackSettings, SoundOptions};
use rhai::{Dynamic, Map};

/// Convert a script value into an option value.
pub fn to_option_value(value: &Dynamic) -> Option<OptionValue> {
    if let Ok(b) = value.as_bool() {
        return Some(OptionValue::Bool(b));
    }
    if let Ok(n) = value.as_float() {
        return Some(OptionValue::Number(n));
    }
    if let Ok(n) = value.as_int() {
        return Some(OptionValue::Number(n as f64));
    }
    if value.is_string() {
        return value.clone().into_string().ok().map(OptionValue::Text);
    }
    None
}

/// Convert an option value into a script value.
pub fn to_dynamic(value: OptionValue) -> Dynamic {
    match value {
        OptionValue::Bool(b) => Dynamic::from(b),
        OptionValue::Number(n) => Dynamic::from(n),
        OptionValue::Text(s) => Dynamic::from(s),
    }
}

/// Build an overlay from a script map.
pub fn from_map(map: &Map) -> SoundOptions {
    let mut options = SoundOptions::new();
    for (name, value) in map {
        if name.as_str() == "alias" {
            match value.clone().into_string() {
                Ok(alias) => options.alias = Some(alias),
                Err(kind) => log::warn!("option 'alias' expects a text value, got {}", kind),
            }
            continue;
        }
        if let Err(err) = set_option(&mut options, name.as_str(), value) {
            log::warn!("{}", err);
        }
    }
    options
}

fn set_option(options: &mut SoundOptions, name: &str, value: &Dynamic) -> Result<(), String> {
    let key: OptionKey = name.parse().map_err(|e| format!("{}", e))?;
    let value = to_option_value(value)
        .ok_or_else(|| format!("option '{}' has unsupported type {}", key, value.type_name()))?;
    options.set(key, value).map_err(|e| e.to_string())
}

/// Render resolved settings as a script map with camelCase keys.
pub fn to_map(settings: &PlaybackSettings) -> Map {
    OptionKey::ALL
        .iter()
        .map(|key| (key.name().into(), to_dynamic(settings.get(*key))))
        .collect()
}
