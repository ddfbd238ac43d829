//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/treenote/treenote.toml`
//! 3. Environment variables: `TREENOTE_*` prefix
//!
//! The `config` REPL command mutates print options and aliases at runtime;
//! `store()` writes them back to the global file on quit.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("configuration error: {message}")]
    Config { message: String },

    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Unified configuration for treenote.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Render flags applied to every `print` (highlight, ellipsis,
    /// priority, tags, date)
    pub print_options: Vec<String>,
    /// Command aliases: alias word -> command word
    pub aliases: BTreeMap<String, String>,
    /// Directory holding save files; `None` means the current directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

/// Raw settings for intermediate parsing (fields are Option to detect
/// "not specified" during merging).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    print_options: Option<Vec<String>>,
    aliases: Option<BTreeMap<String, String>>,
    data_dir: Option<PathBuf>,
}

/// Get the XDG config directory for treenote.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "treenote").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("treenote.toml"))
}

fn load_raw_settings(path: &Path) -> Result<RawSettings, SettingsError> {
    let content = std::fs::read_to_string(path).map_err(|e| SettingsError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| SettingsError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Directory where save files live.
    pub fn save_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        if let Some(dir) = &self.data_dir {
            let expanded = shellexpand::full(dir.to_string_lossy().as_ref())
                .map(|s| s.into_owned())
                .unwrap_or_else(|_| dir.to_string_lossy().into_owned());
            self.data_dir = Some(PathBuf::from(expanded));
        }
    }

    /// Merge overlay config onto self: overlay wins where specified.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            print_options: overlay
                .print_options
                .clone()
                .unwrap_or_else(|| self.print_options.clone()),
            aliases: overlay
                .aliases
                .clone()
                .unwrap_or_else(|| self.aliases.clone()),
            data_dir: overlay.data_dir.clone().or_else(|| self.data_dir.clone()),
        }
    }

    /// Load settings with layered precedence: compiled defaults, then the
    /// global config file, then `TREENOTE_*` environment variables.
    pub fn load() -> Result<Self, SettingsError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();
        Ok(current)
    }

    /// Load settings from an explicit config file plus env overrides.
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let mut current = Self::default();
        if path.exists() {
            let raw = load_raw_settings(path)?;
            current = current.merge_with(&raw);
        }
        current = Self::apply_env_overrides(current)?;
        current.expand_paths();
        Ok(current)
    }

    /// Apply TREENOTE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, SettingsError> {
        let builder = Config::builder().add_source(
            Environment::with_prefix("TREENOTE")
                .separator("__")
                .list_separator(","),
        );
        let config = builder.build().map_err(config_err)?;

        if let Ok(val) = config.get_string("data_dir") {
            settings.data_dir = Some(PathBuf::from(val));
        }
        if let Ok(val) = config.get::<Vec<String>>("print_options") {
            settings.print_options = val;
        }

        Ok(settings)
    }

    /// Write the current values to the global config file, creating the
    /// config directory when needed.
    pub fn store(&self) -> Result<(), SettingsError> {
        let path = global_config_path().ok_or_else(|| SettingsError::Config {
            message: "cannot determine config directory".to_string(),
        })?;
        self.store_to(&path)
    }

    /// Write the current values to an explicit config file.
    pub fn store_to(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(|source| SettingsError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, SettingsError> {
        toml::to_string_pretty(self).map_err(|e| SettingsError::Config {
            message: format!("serialize config: {e}"),
        })
    }
}

fn config_err(e: ConfigError) -> SettingsError {
    SettingsError::Config {
        message: e.to_string(),
    }
}
