use crate::core::config::data::{path_display, Config};
use directories::ProjectDirs;
use std::error::Error as StdError;
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

const CONFIG_FILE_NAME: &str = "config.toml";

/// Failures while reading or writing `config.toml`.
#[derive(Debug)]
pub enum ConfigError {
    Read {
        path: PathBuf,
        source: io::Error,
    },
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    Write {
        path: PathBuf,
        source: io::Error,
    },
    Serialize(toml::ser::Error),
    /// The platform reported no home directory.
    NoConfigDir,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Read { path, source } => {
                write!(f, "Failed to read config at {}: {source}", path_display(path))
            }
            ConfigError::Parse { path, source } => {
                write!(f, "Failed to parse config at {}: {source}", path_display(path))
            }
            ConfigError::Write { path, source } => {
                write!(f, "Failed to save config to {}: {source}", path_display(path))
            }
            ConfigError::Serialize(source) => write!(f, "Failed to encode config: {source}"),
            ConfigError::NoConfigDir => write!(f, "Failed to determine config directory"),
        }
    }
}

impl StdError for ConfigError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            ConfigError::Read { source, .. } | ConfigError::Write { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
            ConfigError::Serialize(source) => Some(source),
            ConfigError::NoConfigDir => None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Config, ConfigError> {
        Self::load_from_path(&Self::config_path()?)
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to_path(&Self::config_path()?)
    }

    /// A missing file is not an error; it yields the defaults.
    pub fn load_from_path(path: &Path) -> Result<Config, ConfigError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Config::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Writes through a temp file in the target directory so a crash never
    /// leaves a half-written config behind.
    pub(crate) fn save_to_path(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |source: io::Error| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        let contents = toml::to_string_pretty(self).map_err(ConfigError::Serialize)?;

        let parent = path.parent().filter(|dir| !dir.as_os_str().is_empty());
        let mut temp_file = match parent {
            Some(dir) => {
                fs::create_dir_all(dir).map_err(write_err)?;
                NamedTempFile::new_in(dir)
            }
            None => NamedTempFile::new(),
        }
        .map_err(write_err)?;

        temp_file
            .write_all(contents.as_bytes())
            .map_err(write_err)?;
        temp_file.as_file_mut().sync_all().map_err(write_err)?;
        temp_file
            .persist(path)
            .map_err(|err| write_err(err.error))?;
        debug!(path = %path.display(), "config saved");
        Ok(())
    }

    pub(crate) fn config_path() -> Result<PathBuf, ConfigError> {
        ProjectDirs::from("org", "tutor", "tutor")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
            .ok_or(ConfigError::NoConfigDir)
    }
}
