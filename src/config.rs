//src/config.rs
use crate::aggregate::WindowDays;
use comfy_table::Color;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use strum::IntoEnumIterator;
use strum_macros::EnumIter;
use thiserror::Error;

const CONFIG_FILE_NAME: &str = "config.toml";
const APP_CONFIG_DIR: &str = "fitlog";
const CONFIG_ENV_VAR: &str = "FITLOG_CONFIG_DIR"; // Environment variable name

#[derive(Error, Debug)]
pub enum Error {
    #[error("Could not determine configuration directory.")]
    CannotDetermineConfigDir,
    #[error("I/O error accessing config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file (TOML): {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("Failed to serialize config data (TOML): {0}")]
    TomlSerialize(#[from] toml::ser::Error),
    #[error("Invalid color name: {0}")]
    InvalidColor(String),
    #[error("Invalid chart window: {0} days. Choose {}.", WindowDays::choices())]
    InvalidWindow(u32),
    #[error("Invalid log level: {0}. Use error, warn, info, debug or trace.")]
    InvalidLogLevel(String),
}

// Define standard colors using strum for easy iteration/parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum StandardColor {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    DarkGrey,
    DarkRed,
    DarkGreen,
    DarkYellow,
    DarkBlue,
    DarkMagenta,
    DarkCyan,
    Grey,
}

impl From<StandardColor> for Color {
    fn from(value: StandardColor) -> Self {
        match value {
            StandardColor::Black => Self::Black,
            StandardColor::Red => Self::Red,
            StandardColor::Green => Self::Green,
            StandardColor::Yellow => Self::Yellow,
            StandardColor::Blue => Self::Blue,
            StandardColor::Magenta => Self::Magenta,
            StandardColor::Cyan => Self::Cyan,
            StandardColor::White => Self::White,
            StandardColor::DarkGrey => Self::DarkGrey,
            StandardColor::DarkRed => Self::DarkRed,
            StandardColor::DarkGreen => Self::DarkGreen,
            StandardColor::DarkYellow => Self::DarkYellow,
            StandardColor::DarkBlue => Self::DarkBlue,
            StandardColor::DarkMagenta => Self::DarkMagenta,
            StandardColor::DarkCyan => Self::DarkCyan,
            StandardColor::Grey => Self::Grey,
        }
    }
}

/// Parses a color name case-insensitively ("darkgrey", "Green", ...).
pub fn parse_color(color_str: &str) -> Result<StandardColor, Error> {
    StandardColor::iter()
        .find(|color| format!("{color:?}").eq_ignore_ascii_case(color_str.trim()))
        .ok_or_else(|| Error::InvalidColor(color_str.to_string()))
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Theme {
    pub header_color: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            header_color: "Green".to_string(),
        }
    }
}

impl Theme {
    /// Header color for tables, falling back to green for unknown names.
    #[must_use]
    pub fn header(&self) -> Color {
        parse_color(&self.header_color).map_or(Color::Green, Color::from)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)] // Ensure defaults are used if fields are missing
pub struct Config {
    /// Window used by `chart` when `--days` is not given.
    pub default_window: WindowDays,
    /// Filter directive for logging when `RUST_LOG` is unset.
    pub log_level: String,
    pub theme: Theme,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_window: WindowDays::Week,
            log_level: "warn".to_string(),
            theme: Theme::default(),
        }
    }
}

/// Warning for a `FITLOG_CONFIG_DIR` override that is not an existing directory.
fn override_dir_warning(path: &Path) -> Option<String> {
    (!path.is_dir()).then(|| {
        format!(
            "Warning: {CONFIG_ENV_VAR} points to '{}', which is not a directory. Trying to create it.",
            path.display()
        )
    })
}

/// Determines the path to the configuration file, creating its directory.
///
/// Runs before the log subscriber exists, so warnings go straight to stderr.
pub fn get_config_path() -> Result<PathBuf, Error> {
    let config_dir_path = if let Ok(path_str) = std::env::var(CONFIG_ENV_VAR) {
        let path = PathBuf::from(path_str);
        if let Some(warning) = override_dir_warning(&path) {
            eprintln!("{warning}");
        }
        path
    } else {
        let base_config_dir = dirs::config_dir().ok_or(Error::CannotDetermineConfigDir)?;
        base_config_dir.join(APP_CONFIG_DIR)
    };

    if !config_dir_path.exists() {
        fs::create_dir_all(&config_dir_path)?;
    }

    Ok(config_dir_path.join(CONFIG_FILE_NAME))
}

/// Loads the configuration, writing a default file when none exists yet.
pub fn load(config_path: &Path) -> Result<Config, Error> {
    if config_path.exists() {
        let config_content = fs::read_to_string(config_path)?;
        let config: Config = toml::from_str(&config_content)?;
        Ok(config)
    } else {
        let default_config = Config::default();
        save(config_path, &default_config)?;
        Ok(default_config)
    }
}

pub fn save(config_path: &Path, config: &Config) -> Result<(), Error> {
    if let Some(parent_dir) = config_path.parent() {
        if !parent_dir.exists() {
            fs::create_dir_all(parent_dir)?;
        }
    }
    let config_content = toml::to_string_pretty(config)?;
    fs::write(config_path, config_content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_created_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);

        let config = load(&path).unwrap();

        assert_eq!(config, Config::default());
        assert!(path.exists());
    }

    #[test]
    fn saved_values_survive_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        let config = Config {
            default_window: WindowDays::Quarter,
            log_level: "debug".into(),
            theme: Theme {
                header_color: "Cyan".into(),
            },
        };

        save(&path, &config).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("default_window = 90"));
        assert_eq!(load(&path).unwrap(), config);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "default_window = 30\n").unwrap();

        let config = load(&path).unwrap();

        assert_eq!(config.default_window, WindowDays::Month);
        assert_eq!(config.theme, Theme::default());
    }

    #[test]
    fn unsupported_window_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "default_window = 14\n").unwrap();

        assert!(matches!(load(&path), Err(Error::TomlParse(_))));
    }

    #[test]
    fn missing_override_dir_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("not-yet");

        let warning = override_dir_warning(&missing).unwrap();

        assert!(warning.contains(CONFIG_ENV_VAR));
        assert!(warning.contains("not-yet"));
        assert_eq!(override_dir_warning(dir.path()), None);
    }

    #[test]
    fn colors_parse_case_insensitively() {
        assert_eq!(parse_color("darkgrey").unwrap(), StandardColor::DarkGrey);
        assert!(parse_color("chartreuse").is_err());
        let theme = Theme {
            header_color: "nope".into(),
        };
        assert_eq!(theme.header(), Color::Green);
    }
}
