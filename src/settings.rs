use crate::consts;
use enum_dispatch::enum_dispatch;
use enum_map::Enum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// User-adjustable settings, persisted between runs
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub(crate) struct Settings {
    pub(crate) sound_volume: Volume,
    pub(crate) music_volume: Volume,
    pub(crate) screen_shake: bool,
}

impl Default for Settings {
    fn default() -> Settings {
        Settings {
            sound_volume: Volume(70),
            music_volume: Volume(50),
            screen_shake: true,
        }
    }
}

impl Settings {
    /// Return the default path of the settings file
    pub(crate) fn default_path() -> Option<PathBuf> {
        dirs::data_local_dir().map(|p| p.join("snakeshell").join("settings.json"))
    }

    pub(crate) fn get(&self, key: SettingKey) -> SettingValue {
        match key {
            SettingKey::SoundVolume => self.sound_volume.into(),
            SettingKey::MusicVolume => self.music_volume.into(),
            SettingKey::ScreenShake => self.screen_shake.into(),
        }
    }

    pub(crate) fn set(&mut self, key: SettingKey, value: SettingValue) {
        match key {
            SettingKey::SoundVolume => {
                self.sound_volume = value
                    .try_into()
                    .expect("Settings::set(SoundVolume, value) called with non-Volume value");
            }
            SettingKey::MusicVolume => {
                self.music_volume = value
                    .try_into()
                    .expect("Settings::set(MusicVolume, value) called with non-Volume value");
            }
            SettingKey::ScreenShake => {
                self.screen_shake = value
                    .try_into()
                    .expect("Settings::set(ScreenShake, value) called with non-Bool value");
            }
        }
    }

    /// Read settings from `path`.  Returns `Ok(None)` if the file does not
    /// exist.
    pub(crate) fn load(path: &Path) -> Result<Option<Settings>, LoadError> {
        let src = match fs_err::read(path) {
            Ok(src) => src,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(LoadError::read(e)),
        };
        serde_json::from_slice(&src)
            .map(Some)
            .map_err(LoadError::deserialize)
    }

    pub(crate) fn save(&self, path: &Path) -> Result<(), SaveError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs_err::create_dir_all(parent).map_err(SaveError::mkdir)?;
        }
        let mut src = serde_json::to_string_pretty(self).map_err(SaveError::serialize)?;
        src.push('\n');
        fs_err::write(path, &src).map_err(SaveError::write)?;
        Ok(())
    }
}

/// The settings in effect, plus where to write them whenever they change
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct SettingsStore {
    path: Option<PathBuf>,
    settings: Settings,
}

impl SettingsStore {
    /// Create a store that never touches the disk
    pub(crate) fn in_memory(settings: Settings) -> SettingsStore {
        SettingsStore {
            path: None,
            settings,
        }
    }

    /// Open the settings file at `path`.  A missing, unreadable, or corrupt
    /// file yields the default settings, which are then written back to
    /// `path`.
    pub(crate) fn open(path: PathBuf) -> SettingsStore {
        let settings = match Settings::load(&path) {
            Ok(Some(settings)) => {
                return SettingsStore {
                    path: Some(path),
                    settings,
                };
            }
            Ok(None) => {
                tracing::info!(path = %path.display(), "no settings file; writing defaults");
                Settings::default()
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %DisplayChain(&e),
                    "discarding unusable settings file"
                );
                Settings::default()
            }
        };
        let store = SettingsStore {
            path: Some(path),
            settings,
        };
        store.persist();
        store
    }

    pub(crate) fn settings(&self) -> Settings {
        self.settings
    }

    pub(crate) fn get(&self, key: SettingKey) -> SettingValue {
        self.settings.get(key)
    }

    /// Change a setting and write all settings to disk
    pub(crate) fn set(&mut self, key: SettingKey, value: SettingValue) {
        if self.settings.get(key) == value {
            return;
        }
        self.settings.set(key, value);
        self.persist();
    }

    pub(crate) fn sound_volume(&self) -> Volume {
        self.settings.sound_volume
    }

    pub(crate) fn music_volume(&self) -> Volume {
        self.settings.music_volume
    }

    fn persist(&self) {
        if let Some(ref path) = self.path {
            if let Err(e) = self.settings.save(path) {
                tracing::warn!(
                    path = %path.display(),
                    error = %DisplayChain(&e),
                    "failed to save settings"
                );
            }
        }
    }
}

#[derive(Clone, Copy, Debug, Enum, Eq, PartialEq)]
pub(crate) enum SettingKey {
    SoundVolume,
    MusicVolume,
    ScreenShake,
}

impl SettingKey {
    pub(crate) const DISPLAY_WIDTH: u16 = 12;

    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            SettingKey::SoundVolume => "Sound Volume",
            SettingKey::MusicVolume => "Music Volume",
            SettingKey::ScreenShake => "Screen Shake",
        }
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[enum_dispatch]
pub(crate) trait Adjustable {
    fn increase(&mut self);
    fn decrease(&mut self);
    fn toggle(&mut self);
}

#[enum_dispatch(Adjustable)] // This also gives us From and TryInto
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum SettingValue {
    Bool(bool),
    Volume,
}

impl Adjustable for bool {
    fn increase(&mut self) {
        *self = true;
    }

    fn decrease(&mut self) {
        *self = false;
    }

    fn toggle(&mut self) {
        *self = !*self;
    }
}

/// A volume level from 0 (muted) to 100
#[derive(Clone, Copy, Debug, Deserialize, Eq, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(try_from = "u8", into = "u8")]
pub(crate) struct Volume(u8);

impl Volume {
    pub(crate) const MAX: u8 = 100;

    pub(crate) fn new(level: u8) -> Option<Volume> {
        (level <= Self::MAX).then_some(Volume(level))
    }

    /// Construct a volume, clamping `level` to the valid range
    pub(crate) fn saturating(level: u8) -> Volume {
        Volume(level.min(Self::MAX))
    }

    pub(crate) fn get(self) -> u8 {
        self.0
    }

    pub(crate) fn is_muted(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Volume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&format!("{}%", self.0))
    }
}

impl From<Volume> for u8 {
    fn from(value: Volume) -> u8 {
        value.0
    }
}

impl TryFrom<u8> for Volume {
    type Error = VolumeError;

    fn try_from(value: u8) -> Result<Volume, VolumeError> {
        Volume::new(value).ok_or(VolumeError(value))
    }
}

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
#[error("volume {0} is out of range; must be at most 100")]
pub(crate) struct VolumeError(u8);

impl Adjustable for Volume {
    fn increase(&mut self) {
        *self = Volume::saturating(self.0.saturating_add(consts::VOLUME_STEP));
    }

    fn decrease(&mut self) {
        self.0 = self.0.saturating_sub(consts::VOLUME_STEP);
    }

    fn toggle(&mut self) {}
}

/// Display an error along with all of its sources
struct DisplayChain<'a>(&'a dyn std::error::Error);

impl fmt::Display for DisplayChain<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)?;
        let mut source = self.0.source();
        while let Some(src) = source {
            write!(f, ": {src}")?;
            source = src.source();
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
#[error("Failed to save settings to disk")]
pub(crate) struct SaveError(#[source] SaveErrorSource);

impl SaveError {
    fn mkdir(e: std::io::Error) -> Self {
        SaveError(SaveErrorSource::Mkdir(e))
    }

    fn serialize(e: serde_json::Error) -> Self {
        SaveError(SaveErrorSource::Serialize(e))
    }

    fn write(e: std::io::Error) -> Self {
        SaveError(SaveErrorSource::Write(e))
    }
}

#[derive(Debug, Error)]
enum SaveErrorSource {
    #[error("failed to create parent directories")]
    Mkdir(#[source] std::io::Error),
    #[error("failed to serialize settings")]
    Serialize(#[source] serde_json::Error),
    #[error("failed to write settings to disk")]
    Write(#[source] std::io::Error),
}

#[derive(Debug, Error)]
#[error("Failed to read settings from disk")]
pub(crate) struct LoadError(#[source] LoadErrorSource);

impl LoadError {
    fn read(e: std::io::Error) -> Self {
        LoadError(LoadErrorSource::Read(e))
    }

    fn deserialize(e: serde_json::Error) -> Self {
        LoadError(LoadErrorSource::Deserialize(e))
    }
}

#[derive(Debug, Error)]
enum LoadErrorSource {
    #[error("failed to read settings file")]
    Read(#[source] std::io::Error),
    #[error("failed to deserialize settings")]
    Deserialize(#[source] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::EnumExt;
    use tempfile::tempdir;

    mod setting_key {
        use super::*;

        #[test]
        fn display_width() {
            let actual_width = SettingKey::iter()
                .map(|key| key.as_str().chars().count())
                .max()
                .unwrap();
            assert_eq!(actual_width, usize::from(SettingKey::DISPLAY_WIDTH));
        }
    }

    mod volume {
        use super::*;

        #[test]
        fn adjust_within_range() {
            let mut v = Volume(98);
            v.increase();
            assert_eq!(v, Volume(100));
            v.increase();
            assert_eq!(v, Volume(100));
            let mut v = Volume(3);
            v.decrease();
            assert_eq!(v, Volume(0));
            assert!(v.is_muted());
            v.decrease();
            assert_eq!(v, Volume(0));
        }

        #[test]
        fn rejects_out_of_range() {
            assert_eq!(Volume::new(101), None);
            assert_eq!(Volume::saturating(250), Volume(100));
            assert!(serde_json::from_str::<Volume>("150").is_err());
            assert_eq!(serde_json::from_str::<Volume>("42").unwrap(), Volume(42));
        }

        #[test]
        fn display() {
            assert_eq!(format!("{:>4}", Volume(7)), "  7%");
        }
    }

    mod settings {
        use super::*;

        #[test]
        fn get_set() {
            let mut settings = Settings::default();
            for key in SettingKey::iter() {
                let mut value = settings.get(key);
                value.decrease();
                settings.set(key, value);
                assert_eq!(settings.get(key), value);
            }
            assert_eq!(settings.sound_volume, Volume(65));
            assert!(!settings.screen_shake);
        }

        #[test]
        fn partial_file_fills_defaults() {
            let settings = serde_json::from_str::<Settings>(r#"{"sound_volume": 20}"#).unwrap();
            assert_eq!(
                settings,
                Settings {
                    sound_volume: Volume(20),
                    ..Settings::default()
                }
            );
        }
    }

    mod store {
        use super::*;

        #[test]
        fn missing_file_writes_defaults() {
            let tmp = tempdir().unwrap();
            let path = tmp.path().join("sub").join("settings.json");
            let store = SettingsStore::open(path.clone());
            assert_eq!(store.settings(), Settings::default());
            assert_eq!(Settings::load(&path).unwrap(), Some(Settings::default()));
        }

        #[test]
        fn corrupt_file_replaced_with_defaults() {
            let tmp = tempdir().unwrap();
            let path = tmp.path().join("settings.json");
            fs_err::write(&path, "{not json").unwrap();
            let store = SettingsStore::open(path.clone());
            assert_eq!(store.settings(), Settings::default());
            assert_eq!(Settings::load(&path).unwrap(), Some(Settings::default()));
        }

        #[test]
        fn out_of_range_volume_is_corrupt() {
            let tmp = tempdir().unwrap();
            let path = tmp.path().join("settings.json");
            fs_err::write(&path, r#"{"sound_volume": 300}"#).unwrap();
            let store = SettingsStore::open(path);
            assert_eq!(store.sound_volume(), Settings::default().sound_volume);
        }

        #[test]
        fn set_writes_through() {
            let tmp = tempdir().unwrap();
            let path = tmp.path().join("settings.json");
            let mut store = SettingsStore::open(path.clone());
            store.set(SettingKey::SoundVolume, Volume(15).into());
            assert_eq!(store.get(SettingKey::SoundVolume), SettingValue::Volume(Volume(15)));
            let reopened = SettingsStore::open(path);
            assert_eq!(reopened.sound_volume(), Volume(15));
        }

        #[test]
        fn in_memory_store() {
            let mut store = SettingsStore::in_memory(Settings::default());
            store.set(SettingKey::ScreenShake, false.into());
            assert!(!store.settings().screen_shake);
        }
    }
}
