//! Playback option types.
//!
//! Options resolve in layers: the process-wide defaults, then the options a
//! sound was loaded with, then whatever a play/pause/resume/stop call passes.
//!
//! - [`PlaybackSettings`] - A fully resolved option set
//! - [`SoundOptions`] - A partial overlay where every field is optional
//! - [`OptionKey`] / [`OptionValue`] - Keyed access for the defaults store

use crate::error::OptionError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Bucket used when neither the defaults nor the load call name one.
pub const DEFAULT_BUCKET: &str = "default";

/// A fully resolved set of playback options.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Bucket the sound is filed under.
    pub bucket: String,
    /// Whether instances loop.
    #[serde(rename = "loop")]
    pub looping: bool,
    /// Target volume in `[0, 1]`.
    pub volume: f32,
    /// Stop earlier instances of the same sound before playing.
    pub stop_others: bool,
    /// Fade-in length in seconds.
    pub fade_in: f64,
    /// Fade-out length in seconds.
    pub fade_out: f64,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            bucket: DEFAULT_BUCKET.to_string(),
            looping: false,
            volume: 1.0,
            stop_others: true,
            fade_in: 0.0,
            fade_out: 0.0,
        }
    }
}

impl PlaybackSettings {
    /// Apply an overlay, letting every present field win.
    pub fn overlay(&self, options: &SoundOptions) -> Self {
        Self {
            bucket: options.bucket.clone().unwrap_or_else(|| self.bucket.clone()),
            ..self.overlay_playback(options)
        }
    }

    /// Apply an overlay at play time.
    ///
    /// The bucket is fixed once a sound is loaded, so it is taken from
    /// `self` even when the overlay names one.
    pub fn overlay_playback(&self, options: &SoundOptions) -> Self {
        Self {
            bucket: self.bucket.clone(),
            looping: options.looping.unwrap_or(self.looping),
            volume: options.volume.unwrap_or(self.volume),
            stop_others: options.stop_others.unwrap_or(self.stop_others),
            fade_in: options.fade_in.unwrap_or(self.fade_in),
            fade_out: options.fade_out.unwrap_or(self.fade_out),
        }
    }

    /// Fade-in length as a duration.
    pub fn fade_in_duration(&self) -> Duration {
        seconds(self.fade_in)
    }

    /// Fade-out length as a duration.
    pub fn fade_out_duration(&self) -> Duration {
        seconds(self.fade_out)
    }

    /// Read a single option.
    pub fn get(&self, key: OptionKey) -> OptionValue {
        match key {
            OptionKey::Bucket => OptionValue::Text(self.bucket.clone()),
            OptionKey::Loop => OptionValue::Bool(self.looping),
            OptionKey::Volume => OptionValue::Number(self.volume as f64),
            OptionKey::StopOthers => OptionValue::Bool(self.stop_others),
            OptionKey::FadeIn => OptionValue::Number(self.fade_in),
            OptionKey::FadeOut => OptionValue::Number(self.fade_out),
        }
    }

    /// Write a single option.
    pub fn set(&mut self, key: OptionKey, value: OptionValue) -> Result<(), OptionError> {
        let mut overlay = SoundOptions::default();
        overlay.set(key, value)?;
        *self = self.overlay(&overlay);
        Ok(())
    }
}

/// Convert seconds to a duration, treating negative or non-finite input as zero.
pub fn seconds(secs: f64) -> Duration {
    Duration::try_from_secs_f64(secs.max(0.0)).unwrap_or_default()
}

/// A partial set of options passed to load and playback calls.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoundOptions {
    /// Alias to register the sound under (load only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    /// Bucket to file the sound under (load only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket: Option<String>,
    /// Whether instances loop.
    #[serde(rename = "loop", skip_serializing_if = "Option::is_none")]
    pub looping: Option<bool>,
    /// Target volume.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<f32>,
    /// Stop earlier instances of the same sound before playing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_others: Option<bool>,
    /// Fade-in length in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fade_in: Option<f64>,
    /// Fade-out length in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fade_out: Option<f64>,
}

impl SoundOptions {
    /// Create an empty overlay.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the alias.
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Set the bucket.
    pub fn with_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = Some(bucket.into());
        self
    }

    /// Set looping.
    pub fn with_loop(mut self, looping: bool) -> Self {
        self.looping = Some(looping);
        self
    }

    /// Set the target volume.
    pub fn with_volume(mut self, volume: f32) -> Self {
        self.volume = Some(volume);
        self
    }

    /// Set whether earlier instances are stopped first.
    pub fn with_stop_others(mut self, stop_others: bool) -> Self {
        self.stop_others = Some(stop_others);
        self
    }

    /// Set the fade-in length in seconds.
    pub fn with_fade_in(mut self, seconds: f64) -> Self {
        self.fade_in = Some(seconds);
        self
    }

    /// Set the fade-out length in seconds.
    pub fn with_fade_out(mut self, seconds: f64) -> Self {
        self.fade_out = Some(seconds);
        self
    }

    /// Set one option by key.
    ///
    /// Numbers are accepted for boolean options (non-zero is true) since
    /// scripting hosts often pass `0`/`1`.
    pub fn set(&mut self, key: OptionKey, value: OptionValue) -> Result<(), OptionError> {
        match key {
            OptionKey::Bucket => self.bucket = Some(value.into_text(key)?),
            OptionKey::Loop => self.looping = Some(value.into_bool(key)?),
            OptionKey::Volume => self.volume = Some(value.into_number(key)? as f32),
            OptionKey::StopOthers => self.stop_others = Some(value.into_bool(key)?),
            OptionKey::FadeIn => self.fade_in = Some(value.into_number(key)?),
            OptionKey::FadeOut => self.fade_out = Some(value.into_number(key)?),
        }
        Ok(())
    }
}

/// Names of the options held by the defaults store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OptionKey {
    Bucket,
    Loop,
    Volume,
    StopOthers,
    FadeIn,
    FadeOut,
}

impl OptionKey {
    /// All keys, in the order they are documented.
    pub const ALL: [OptionKey; 6] = [
        OptionKey::Bucket,
        OptionKey::Loop,
        OptionKey::Volume,
        OptionKey::StopOthers,
        OptionKey::FadeIn,
        OptionKey::FadeOut,
    ];

    /// Canonical (camelCase) name of the key.
    pub fn name(&self) -> &'static str {
        match self {
            OptionKey::Bucket => "bucket",
            OptionKey::Loop => "loop",
            OptionKey::Volume => "volume",
            OptionKey::StopOthers => "stopOthers",
            OptionKey::FadeIn => "fadeIn",
            OptionKey::FadeOut => "fadeOut",
        }
    }
}

impl fmt::Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OptionKey {
    type Err = OptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bucket" => Ok(OptionKey::Bucket),
            "loop" => Ok(OptionKey::Loop),
            "volume" => Ok(OptionKey::Volume),
            "stopOthers" | "stop_others" => Ok(OptionKey::StopOthers),
            "fadeIn" | "fade_in" => Ok(OptionKey::FadeIn),
            "fadeOut" | "fade_out" => Ok(OptionKey::FadeOut),
            other => Err(OptionError::UnknownKey(other.to_string())),
        }
    }
}

/// A loosely typed option value.
#[derive(Clone, Debug, PartialEq)]
pub enum OptionValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl OptionValue {
    fn into_bool(self, key: OptionKey) -> Result<bool, OptionError> {
        match self {
            OptionValue::Bool(b) => Ok(b),
            OptionValue::Number(n) => Ok(n != 0.0),
            OptionValue::Text(_) => Err(wrong_kind(key, "boolean")),
        }
    }

    fn into_number(self, key: OptionKey) -> Result<f64, OptionError> {
        match self {
            OptionValue::Number(n) => Ok(n),
            _ => Err(wrong_kind(key, "numeric")),
        }
    }

    fn into_text(self, key: OptionKey) -> Result<String, OptionError> {
        match self {
            OptionValue::Text(s) => Ok(s),
            _ => Err(wrong_kind(key, "text")),
        }
    }
}

fn wrong_kind(key: OptionKey, expected: &'static str) -> OptionError {
    OptionError::WrongKind {
        key: key.name().to_string(),
        expected,
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        OptionValue::Bool(value)
    }
}

impl From<f64> for OptionValue {
    fn from(value: f64) -> Self {
        OptionValue::Number(value)
    }
}

impl From<i64> for OptionValue {
    fn from(value: i64) -> Self {
        OptionValue::Number(value as f64)
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        OptionValue::Text(value.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        OptionValue::Text(value)
    }
}
