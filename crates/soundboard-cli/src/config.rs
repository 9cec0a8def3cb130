//! Configuration file support for soundboard
//!
//! Configuration is stored in TOML format at:
//! - Linux: `~/.config/soundboard/soundboard.toml`
//! - macOS: `~/Library/Application Support/soundboard/soundboard.toml`
//! - Windows: `%APPDATA%\soundboard\soundboard.toml`

use crate::error::{ConfigError, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use soundboard_core::{DefaultsStore, Registry, SoundOptions};
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG: &str = r#"# soundboard configuration file

# Base path or URL that bare filenames are resolved against.
# Filenames containing "/" are used as given.
resource_base = "assets"

[defaults]
# Fallback options for every sound loaded afterwards.
bucket = "default"
loop = false
volume = 1.0
stop_others = true
fade_in = 0.0
fade_out = 0.0

# Sounds loaded before the script runs. Any per-sound option may be given.
# [[preload]]
# file = "click.mp3"
# bucket = "sfx"
#
# [[preload]]
# file = "theme.ogg"
# alias = "theme"
# bucket = "music"
# loop = true
# fade_in = 2.0
"#;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base that bare filenames are resolved against
    pub resource_base: String,
    /// Overlay merged into the process-wide defaults at startup
    pub defaults: SoundOptions,
    /// Sounds to load before the script runs
    pub preload: Vec<PreloadEntry>,
}

/// A sound loaded at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreloadEntry {
    /// Filename or path passed to `load_sound`
    pub file: String,
    /// Per-sound options
    #[serde(flatten)]
    pub options: SoundOptions,
}

impl Config {
    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration from the default config file location
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            Err(ConfigError::Config(format!("Config file not found at {:?}", path)))
        }
    }

    /// Load configuration or return default if not found
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Get the default configuration file path
    pub fn config_path() -> Result<PathBuf> {
        if let Some(proj_dirs) = ProjectDirs::from("", "", "soundboard") {
            Ok(proj_dirs.config_dir().join("soundboard.toml"))
        } else {
            Err(ConfigError::Config("Could not determine config directory".to_string()))
        }
    }

    /// Create a default config file with comments
    pub fn create_default_config_file() -> Result<PathBuf> {
        let path = Self::config_path()?;
        write_default_config(&path)?;
        Ok(path)
    }

    /// Merge the configured defaults into a store.
    pub fn apply_defaults(&self, store: &DefaultsStore) {
        store.merge(&self.defaults);
    }

    /// Load every preload entry into a registry.
    pub fn preload_into(&self, registry: &mut Registry) {
        for entry in &self.preload {
            registry.load_sound(&entry.file, &entry.options);
        }
        if !self.preload.is_empty() {
            log::info!("Preloaded {} sound(s)", self.preload.len());
        }
    }
}

/// Write the commented default configuration, refusing to overwrite.
pub fn write_default_config(path: &Path) -> Result<()> {
    if path.exists() {
        return Err(ConfigError::Config(format!(
            "Config file already exists at {:?}",
            path
        )));
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, DEFAULT_CONFIG)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use soundboard_core::{HostBindings, SimulatedBackend};

    #[test]
    fn test_default_config_file_parses() {
        let config: Config = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.resource_base, "assets");
        assert_eq!(config.defaults.stop_others, Some(true));
        assert_eq!(config.defaults.looping, Some(false));
        assert!(config.preload.is_empty());
    }

    #[test]
    fn test_preload_entries() {
        let config: Config = toml::from_str(
            r#"
            resource_base = "https://cdn.test"

            [defaults]
            fade_out = 0.5

            [[preload]]
            file = "theme.ogg"
            bucket = "music"
            loop = true

            [[preload]]
            file = "sfx/click.mp3"
            "#,
        )
        .unwrap();
        assert_eq!(config.preload.len(), 2);
        assert_eq!(config.preload[0].options.bucket.as_deref(), Some("music"));
        assert_eq!(config.preload[0].options.looping, Some(true));

        let store = DefaultsStore::new();
        config.apply_defaults(&store);
        let mut registry = Registry::new("cli", Box::new(SimulatedBackend::new()), HostBindings::default())
            .with_defaults(store);
        config.preload_into(&mut registry);

        assert_eq!(registry.get_loaded_sounds(), vec!["sfx/click", "theme"]);
        let theme = registry.sound("theme").unwrap();
        assert!(theme.settings.looping);
        assert!((theme.settings.fade_out - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_write_default_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("soundboard.toml");
        write_default_config(&path).unwrap();
        assert!(Config::load_from(&path).is_ok());
        assert!(matches!(
            write_default_config(&path),
            Err(ConfigError::Config(_))
        ));
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = Config {
            resource_base: "assets".to_string(),
            defaults: SoundOptions::new().with_volume(0.5),
            preload: vec![PreloadEntry {
                file: "a.mp3".to_string(),
                options: SoundOptions::new().with_bucket("sfx"),
            }],
        };
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }
}
