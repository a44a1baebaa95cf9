//! Optional TOML configuration file and its merge with command-line flags.

use std::{fs, io, path::{Path, PathBuf}};

use serde::Deserialize;
use thiserror::Error;

/// Leaderboard file used when neither the flags nor the config file name one.
pub(crate) const DEFAULT_LEADERBOARD: &str = "raycast-arena-scores.json";
/// Player speed in tiles per second when not configured.
pub(crate) const DEFAULT_PLAYER_SPEED: f32 = 6.0;
/// Look sensitivity when not configured.
pub(crate) const DEFAULT_LOOK_SENSITIVITY: f32 = 1.0;

/// Errors raised while reading the configuration file.
#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Read {
        /// Offending path.
        path: PathBuf,
        /// Underlying I/O failure.
        source: io::Error,
    },
    /// The file is not valid TOML for [`FileConfig`].
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        /// Offending path.
        path: PathBuf,
        /// Underlying parse failure.
        source: toml::de::Error,
    },
    /// A numeric tunable is out of range.
    #[error("{field} must be a positive finite number (received {value})")]
    OutOfRange {
        /// Name of the offending field.
        field: &'static str,
        /// Rejected value.
        value: f32,
    },
}

/// Values that may be supplied by the configuration file.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct FileConfig {
    pub(crate) seed: Option<u64>,
    pub(crate) player_speed: Option<f32>,
    pub(crate) look_sensitivity: Option<f32>,
    pub(crate) map: Option<PathBuf>,
    pub(crate) leaderboard: Option<PathBuf>,
    pub(crate) player_name: Option<String>,
}

impl FileConfig {
    /// Reads and parses the file at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }
}

/// Overrides taken from the command line; `None` defers to the file.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Overrides {
    pub(crate) seed: Option<u64>,
    pub(crate) look_sensitivity: Option<f32>,
    pub(crate) map: Option<PathBuf>,
    pub(crate) leaderboard: Option<PathBuf>,
    pub(crate) player_name: Option<String>,
}

/// Fully resolved settings for one run.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Settings {
    pub(crate) seed: u64,
    pub(crate) player_speed: f32,
    pub(crate) look_sensitivity: f32,
    pub(crate) map: Option<PathBuf>,
    pub(crate) leaderboard: PathBuf,
    pub(crate) player_name: Option<String>,
}

impl Settings {
    /// Layers command-line overrides on top of the file values and defaults.
    pub(crate) fn resolve(file: FileConfig, overrides: Overrides) -> Result<Self, ConfigError> {
        let player_speed = positive(
            "player_speed",
            file.player_speed.unwrap_or(DEFAULT_PLAYER_SPEED),
        )?;
        let look_sensitivity = positive(
            "look_sensitivity",
            overrides
                .look_sensitivity
                .or(file.look_sensitivity)
                .unwrap_or(DEFAULT_LOOK_SENSITIVITY),
        )?;

        Ok(Self {
            seed: overrides.seed.or(file.seed).unwrap_or(0),
            player_speed,
            look_sensitivity,
            map: overrides.map.or(file.map),
            leaderboard: overrides
                .leaderboard
                .or(file.leaderboard)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LEADERBOARD)),
            player_name: overrides.player_name.or(file.player_name),
        })
    }
}

fn positive(field: &'static str, value: f32) -> Result<f32, ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::OutOfRange { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_field() {
        let config = FileConfig::parse(
            r#"
            seed = 42
            player_speed = 4.5
            look_sensitivity = 2.0
            map = "maps/ring.txt"
            leaderboard = "scores.json"
            player_name = "Ada"
            "#,
        )
        .expect("valid config");

        assert_eq!(config.seed, Some(42));
        assert_eq!(config.player_speed, Some(4.5));
        assert_eq!(config.map, Some(PathBuf::from("maps/ring.txt")));
        assert_eq!(config.player_name.as_deref(), Some("Ada"));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(FileConfig::parse("fov = 90").is_err());
    }

    #[test]
    fn flags_override_file_values() {
        let file = FileConfig {
            seed: Some(1),
            look_sensitivity: Some(0.5),
            player_name: Some("File".to_owned()),
            ..FileConfig::default()
        };
        let overrides = Overrides {
            seed: Some(9),
            player_name: Some("Flag".to_owned()),
            ..Overrides::default()
        };

        let settings = Settings::resolve(file, overrides).expect("valid settings");
        assert_eq!(settings.seed, 9);
        assert_eq!(settings.look_sensitivity, 0.5);
        assert_eq!(settings.player_speed, DEFAULT_PLAYER_SPEED);
        assert_eq!(settings.leaderboard, PathBuf::from(DEFAULT_LEADERBOARD));
        assert_eq!(settings.player_name.as_deref(), Some("Flag"));
    }

    #[test]
    fn non_positive_tunables_are_rejected() {
        let file = FileConfig {
            player_speed: Some(0.0),
            ..FileConfig::default()
        };
        let error = Settings::resolve(file, Overrides::default()).expect_err("zero speed");
        assert_eq!(
            error.to_string(),
            "player_speed must be a positive finite number (received 0)"
        );
    }

    #[test]
    fn missing_file_reports_its_path() {
        let path = Path::new("definitely/not/here.toml");
        let error = FileConfig::load(path).expect_err("missing file");
        assert!(error.to_string().contains("definitely/not/here.toml"));
    }
}
