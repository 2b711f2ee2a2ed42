use chrono::Weekday;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{Error, ErrorKind, Result};
use crate::growth::DEFAULT_HORIZONS;

const CONFIG_PATH_ENV_VAR: &str = "HABITUAL_CONFIG_FILE";

pub(crate) fn find_configfile_locations() -> Vec<PathBuf> {
    let mut locations = Vec::new();

    if let Ok(path) = env::var(CONFIG_PATH_ENV_VAR) {
        locations.push(PathBuf::from(path));
    }

    if let Some(dir) = dirs::config_dir() {
        locations.push(dir.join("habitual").join("config.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        locations.push(home.join(".habitual.toml"));
    }

    locations
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub today_char: Option<char>,
    pub completed_char: char,
    pub blank_char: char,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            today_char: Some('*'),
            completed_char: '●',
            blank_char: ' ',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub week_start: Weekday,
    pub horizons: Vec<u32>,
    pub data: Option<PathBuf>,
    pub theme: Theme,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            week_start: Weekday::Mon,
            horizons: DEFAULT_HORIZONS.to_vec(),
            data: None,
            theme: Theme::default(),
        }
    }
}

impl FromStr for Config {
    type Err = Error;
    fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|err| Error::new(ErrorKind::ConfigParse, &err.to_string()))
    }
}

impl Config {
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let mut config = content
            .parse::<Config>()
            .map_err(|err| err.with_msg(&format!("could not load '{}'", path.display())))?;

        // relative data paths are resolved against the config file
        if let (Some(data), Some(dir)) = (config.data.as_ref(), path.parent()) {
            if data.is_relative() {
                config.data = Some(dir.join(data));
            }
        }

        Ok(config)
    }
}

/// Loads the configuration at `path`, or the first one found in the default
/// locations. Falls back to the defaults if no file exists.
pub fn load_suitable_config(path: Option<&Path>) -> Result<Config> {
    if let Some(path) = path {
        return Config::from_path(path);
    }

    match find_configfile_locations()
        .into_iter()
        .find(|candidate| candidate.is_file())
    {
        Some(path) => {
            log::info!("Using configuration '{}'", path.display());
            Config::from_path(&path)
        }
        None => {
            log::debug!("No configuration file found, using defaults");
            Ok(Config::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        assert_eq!("".parse::<Config>().unwrap(), Config::default());
    }

    #[test]
    fn parses_week_start_and_theme() {
        let config = r#"
            week_start = "Sun"
            horizons = [7, 30]

            [theme]
            completed_char = "x"
            "#
        .parse::<Config>()
        .unwrap();

        assert_eq!(config.week_start, Weekday::Sun);
        assert_eq!(config.horizons, vec![7, 30]);
        assert_eq!(config.theme.completed_char, 'x');
        assert_eq!(config.theme.today_char, Some('*'));
    }

    #[test]
    fn invalid_config_reports_kind() {
        let err = "week_start = 3".parse::<Config>().unwrap_err();
        assert!(matches!(err.kind, ErrorKind::ConfigParse));
    }
}
