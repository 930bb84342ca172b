//! Command-line interface configuration
//!
//! Defaults for `espota` can be stored in an `espota.toml` file, either in
//! the current working directory or in the user's configuration directory.
//! Values passed on the command line always take precedence.
//!
//! ```toml
//! port = 8266
//! password = "hunter2"
//! hosts = ["living-room.local", "192.168.1.20"]
//! ```

use std::{
    fs::read_to_string,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::Error;

const CONFIG_FILE_NAME: &str = "espota.toml";

/// Upload defaults
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// OTA port of the devices
    pub port: Option<u16>,
    /// OTA password of the devices
    pub password: Option<String>,
    /// Hosts to upload to when none are given on the command line
    pub hosts: Vec<String>,
}

impl Config {
    /// Load the configuration file, if there is one
    pub fn load() -> Result<Self, Error> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load the configuration from `path`, a missing file yields the defaults
    pub fn load_from(path: &Path) -> Result<Self, Error> {
        if !path.exists() {
            debug!("No configuration file at {}", path.display());
            return Ok(Self::default());
        }

        let data = read_to_string(path)
            .map_err(|err| Error::FileOpenError(path.display().to_string(), err))?;

        Self::parse(path, &data)
    }

    /// Parse configuration `data` which was read from `path`
    pub fn parse(path: &Path, data: &str) -> Result<Self, Error> {
        let config: Self =
            toml::from_str(data).map_err(|err| Error::ConfigParse(path.to_path_buf(), err))?;
        debug!("Config: {config:#?}");

        Ok(config)
    }

    fn config_path() -> Option<PathBuf> {
        if let Ok(dir) = std::env::current_dir() {
            let local_config = dir.join(CONFIG_FILE_NAME);
            if local_config.exists() {
                return Some(local_config);
            }
        }

        ProjectDirs::from("io", "esphome", "espota")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }
}
