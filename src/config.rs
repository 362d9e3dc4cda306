use crate::consts;
use crate::settings::{Settings, SettingsStore};
use serde::Deserialize;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Program configuration read from a configuration file
#[derive(Clone, Deserialize, Debug, Eq, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub(crate) struct Config {
    /// Frames per second of the render loop
    pub(crate) frame_rate: u32,

    /// Settings about data files
    pub(crate) files: FileConfig,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            frame_rate: consts::DEFAULT_FRAME_RATE,
            files: FileConfig::default(),
        }
    }
}

impl Config {
    /// Return the default configuration file path
    pub(crate) fn default_path() -> Result<PathBuf, ConfigError> {
        dirs::config_local_dir()
            .map(|p| p.join("snakeshell").join("config.toml"))
            .ok_or(ConfigError::NoPath)
    }

    /// Read configuration from a file on disk.  If the file does not exist and
    /// `allow_missing` is true, a default `Config` value is returned.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the file could not be read, if the file's contents
    /// could not be deserialized, or if the frame rate is zero.
    pub(crate) fn load(path: &Path, allow_missing: bool) -> Result<Config, ConfigError> {
        let content = match fs_err::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && allow_missing => {
                return Ok(Config::default())
            }
            Err(e) => return Err(ConfigError::Read(e)),
        };
        let config = toml::from_str::<Config>(&content)?;
        if config.frame_rate == 0 {
            return Err(ConfigError::FrameRate);
        }
        Ok(config)
    }

    /// Length of a single frame at the configured frame rate
    pub(crate) fn frame_period(&self) -> Duration {
        Duration::from_secs(1) / self.frame_rate.max(1)
    }

    /// Return the filepath at which settings should be stored: the file given
    /// in the configuration or, if that is not set, the default settings file
    /// path.  Return `None` if no path is present in the configuration and
    /// the default path could not be computed.
    fn settings_file(&self) -> Option<Cow<'_, Path>> {
        self.files
            .settings_file
            .as_deref()
            .map(Cow::from)
            .or_else(|| Settings::default_path().map(Cow::from))
    }

    /// Open the settings store described by the configuration.
    ///
    /// If `self.files.save_settings` is `false`, or if no settings path could
    /// be determined, the store lives only in memory.
    pub(crate) fn open_settings(&self) -> SettingsStore {
        if !self.files.save_settings {
            return SettingsStore::in_memory(Settings::default());
        }
        match self.settings_file() {
            Some(p) => SettingsStore::open(p.into_owned()),
            None => {
                tracing::warn!("could not determine settings file path; settings will not be saved");
                SettingsStore::in_memory(Settings::default())
            }
        }
    }
}

#[derive(Clone, Deserialize, Debug, Eq, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub(crate) struct FileConfig {
    /// Path at which settings should be stored
    pub(crate) settings_file: Option<PathBuf>,

    /// Whether to load & save settings in a file
    pub(crate) save_settings: bool,

    /// File to write log messages to
    pub(crate) log_file: Option<PathBuf>,
}

impl Default for FileConfig {
    fn default() -> FileConfig {
        FileConfig {
            settings_file: None,
            save_settings: true,
            log_file: None,
        }
    }
}

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to determine path to local configuration directory")]
    NoPath,
    #[error("failed to read configuration file")]
    Read(#[from] std::io::Error),
    #[error("failed to parse configuration file")]
    Parse(#[from] toml::de::Error),
    #[error("frame-rate must be at least 1")]
    FrameRate,
}
