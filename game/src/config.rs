use crate::{beam::settings::BeamSettings, control_scheme::ControlScheme};
use fyrox::core::log::Log;
use ron::ser::PrettyConfig;
use serde::{Deserialize, Serialize};
use std::{
    fmt::{Display, Formatter},
    fs::File,
    io::{Read, Write},
    ops::{Deref, DerefMut},
    path::Path,
};

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Ron(ron::error::SpannedError),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "config i/o error: {err}"),
            ConfigError::Ron(err) => write!(f, "malformed config: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(err) => Some(err),
            ConfigError::Ron(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<ron::error::SpannedError> for ConfigError {
    fn from(err: ron::error::SpannedError) -> Self {
        Self::Ron(err)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    need_save: bool,
    data: ConfigData,
}

impl Config {
    pub fn load() -> Self {
        let data = match ConfigData::load_from(ConfigData::PATH) {
            Ok(data) => data,
            Err(ConfigError::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {
                Log::info(format!(
                    "No config at {}, using defaults.",
                    ConfigData::PATH
                ));
                Default::default()
            }
            Err(err) => {
                Log::err(format!(
                    "Unable to load config from {}: {err}. Using defaults.",
                    ConfigData::PATH
                ));
                Default::default()
            }
        };

        Self {
            need_save: false,
            data,
        }
    }

    pub fn save_if_needed(&mut self) {
        if self.need_save {
            self.data.save();
            self.need_save = false;
        }
    }
}

impl Deref for Config {
    type Target = ConfigData;

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

impl DerefMut for Config {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.need_save = true;
        &mut self.data
    }
}

#[derive(Deserialize, Serialize, Debug, Default, Clone)]
#[serde(default)]
pub struct ConfigData {
    pub beam: BeamSettings,
    pub controls: ControlScheme,
}

impl ConfigData {
    pub const PATH: &'static str = "data/configs/settings.ron";

    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut text = String::new();
        File::open(path)?.read_to_string(&mut text)?;
        Self::from_ron(&text)
    }

    pub fn from_ron(text: &str) -> Result<Self, ConfigError> {
        Ok(ron::de::from_str(text)?)
    }

    fn save(&self) {
        if let Some(dir) = Path::new(Self::PATH).parent() {
            Log::verify(std::fs::create_dir_all(dir));
        }

        let Ok(mut file) = File::create(Self::PATH) else {
            Log::err("Unable to save config!");
            return;
        };

        match ron::ser::to_string_pretty(self, PrettyConfig::default()) {
            Ok(text) => Log::verify(file.write_all(text.as_bytes())),
            Err(err) => Log::err(format!("Unable to serialize config: {err}")),
        }
    }
}
