//! Error types for the sound registry.
//!
//! None of these escape a registry operation as a failure. They exist so
//! that warnings, debug lines and lifecycle events carry one consistent
//! description of what went wrong.

use thiserror::Error;

/// Result type alias for registry internals.
pub type Result<T> = std::result::Result<T, SoundError>;

/// Failures a registry operation can run into.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SoundError {
    /// The operation referenced an alias that was never loaded.
    ///
    /// Reported as a warning; the operation becomes a no-op.
    #[error("sound '{0}' is not loaded")]
    NotLoaded(String),

    /// The audio primitive refused to start an instance.
    ///
    /// Reported through the `Audio Failed` events. The instance is
    /// discarded and never retried automatically.
    #[error("playback of '{alias}' was rejected: {reason}")]
    PlaybackRejected { alias: String, reason: String },

    /// A load call reused an existing alias. The first definition wins.
    #[error("sound '{0}' is already loaded")]
    DuplicateAlias(String),
}

/// Errors raised by the defaults store setters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OptionError {
    /// The option name is not one of the recognized keys.
    #[error("unknown option '{0}'")]
    UnknownKey(String),

    /// The value kind does not fit the option.
    #[error("option '{key}' expects a {expected} value")]
    WrongKind { key: String, expected: &'static str },
}
