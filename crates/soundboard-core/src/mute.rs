//! Global and per-bucket mute flags.
//!
//! The flags are independent: muting globally leaves every bucket flag as it
//! was, and a bucket reports its own flag even while global mute is active.
//! A sound is effectively muted when either the global flag or its bucket's
//! flag is set.

use std::collections::HashMap;

/// Mute flags of one registry.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MuteState {
    /// Global mute flag.
    pub global: bool,
    /// Per-bucket mute flags. Missing buckets are unmuted.
    pub buckets: HashMap<String, bool>,
}

impl MuteState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the global flag, or a bucket flag when a bucket is named.
    pub fn is_muted(&self, bucket: Option<&str>) -> bool {
        match bucket {
            Some(bucket) => self.buckets.get(bucket).copied().unwrap_or(false),
            None => self.global,
        }
    }

    /// Set the global flag, or a bucket flag when a bucket is named.
    pub fn set_muted(&mut self, bucket: Option<&str>, muted: bool) {
        match bucket {
            Some(bucket) => {
                self.buckets.insert(bucket.to_string(), muted);
            }
            None => self.global = muted,
        }
    }

    /// Whether a sound filed under `bucket` should be silent.
    pub fn effective(&self, bucket: &str) -> bool {
        self.global || self.is_muted(Some(bucket))
    }
}
