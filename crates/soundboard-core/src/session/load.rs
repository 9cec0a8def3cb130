//! Loading and unloading sound definitions.

use super::Registry;
use crate::error::SoundError;
use crate::options::SoundOptions;
use crate::state::SoundDefinition;

/// Alias derived from a filename: the final extension of the last path
/// segment is stripped, directories are kept.
pub fn alias_from_filename(filename: &str) -> &str {
    let segment_start = filename.rfind('/').map_or(0, |pos| pos + 1);
    match filename[segment_start..].rfind('.') {
        Some(dot) if dot > 0 => &filename[..segment_start + dot],
        _ => filename,
    }
}

impl Registry {
    /// Register a sound definition.
    ///
    /// The alias is `options.alias` or the filename without its extension.
    /// Loading an alias that already exists changes nothing; the first
    /// definition wins. Filenames containing `/` are used verbatim as the
    /// source, bare names are resolved against the host's resource base.
    pub fn load_sound(&mut self, filename: &str, options: &SoundOptions) {
        let alias = options
            .alias
            .clone()
            .unwrap_or_else(|| alias_from_filename(filename).to_string());

        if self.state.sounds.contains_key(&alias) {
            log::debug!("{}; keeping the first definition", SoundError::DuplicateAlias(alias));
            return;
        }

        let src = if filename.contains('/') {
            filename.to_string()
        } else {
            self.bindings.resolver.resolve(filename)
        };
        let settings = self.defaults.snapshot().overlay(options);
        log::debug!("Loaded '{}' from {} into bucket '{}'", alias, src, settings.bucket);

        self.state.insert_sound(SoundDefinition::new(alias, src, settings));
        self.changed();
    }

    /// Stop a sound, then forget its definition and bucket membership.
    pub fn unload_sound(&mut self, alias: &str) {
        if !self.state.sounds.contains_key(alias) {
            log::warn!("{}", SoundError::NotLoaded(alias.to_string()));
            return;
        }
        self.stop_instances(alias, &SoundOptions::default());
        self.state.remove_sound(alias);
        log::debug!("Unloaded '{}'", alias);
        self.changed();
    }
}
