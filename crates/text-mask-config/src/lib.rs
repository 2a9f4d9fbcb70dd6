use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use text_mask_engine::{DEFAULT_PLACEHOLDER_CHAR, MaskOptions, build_placeholder};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Preset {name:?} in {config_path} is not a usable mask: {source}")]
    InvalidPreset {
        config_path: PathBuf,
        name: String,
        source: text_mask_engine::MaskError,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub placeholder_char: char,
    pub guide: bool,
    /// Where the CLI writes its log; shell variables and `~` are expanded.
    pub log_file: Option<PathBuf>,
    /// Preset used when none is named on the command line.
    pub default_preset: Option<String>,
    pub presets: BTreeMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        let presets = [
            ("phone", "(111) 111-1111"),
            ("date", "11/11/1111"),
            ("time", "11:11"),
            ("postcode", "UU11 1UU"),
        ]
        .into_iter()
        .map(|(name, mask)| (name.to_string(), mask.to_string()))
        .collect();

        Self {
            placeholder_char: DEFAULT_PLACEHOLDER_CHAR,
            guide: true,
            log_file: None,
            default_preset: Some("phone".to_string()),
            presets,
        }
    }
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        // Every preset must survive placeholder construction up front
        for (name, mask) in &config.presets {
            build_placeholder(mask, config.placeholder_char).map_err(|source| {
                ConfigError::InvalidPreset {
                    config_path: config_path.to_path_buf(),
                    name: name.clone(),
                    source,
                }
            })?;
        }

        config.log_file = config
            .log_file
            .map(|path| Self::expand_path(&path).unwrap_or(path));

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/text-mask");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Looks up a named mask.
    pub fn preset(&self, name: &str) -> Option<&str> {
        self.presets.get(name).map(String::as_str)
    }

    /// The configured default preset, falling back to the first by name.
    pub fn default_mask(&self) -> Option<(&str, &str)> {
        self.default_preset
            .as_deref()
            .and_then(|name| self.presets.get_key_value(name))
            .or_else(|| self.presets.iter().next())
            .map(|(name, mask)| (name.as_str(), mask.as_str()))
    }

    /// Engine options for a field using this configuration.
    pub fn mask_options(&self) -> MaskOptions {
        MaskOptions {
            guide: self.guide,
            placeholder_char: self.placeholder_char,
            ..MaskOptions::default()
        }
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}
