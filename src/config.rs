use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};
use serde::Deserialize;
use thiserror::Error;

use crate::render::RenderStyle;
use crate::scan::{ScanMode, Sensor};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("unknown sensor: {0}")]
    UnknownSensor(String),
    #[error("unknown scan mode: {0}")]
    UnknownMode(String),
    #[error("no scan schedule for {sensor} in {mode} mode")]
    UnsupportedMode { sensor: Sensor, mode: ScanMode },
    #[error("invalid scan schedule: {0}")]
    InvalidSchedule(String),
    #[error("directory not found: {0}")]
    MissingDirectory(PathBuf),
    #[error("file not found: {0}")]
    MissingFile(PathBuf),
    #[error("invalid time '{0}', expected YYYYmmddHHMM")]
    InvalidTime(String),
    #[error("invalid cadence '{0}': {1}")]
    InvalidCadence(String, String),
}

/// Rendering and extent settings, read from an optional YAML file.
///
/// Every field has a default so an empty file (or none at all) is valid.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Satellite composite to request from the scene loader, also part of frame names.
    pub composite: String,
    pub margins: Margins,
    pub style: RenderStyle,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            composite: "true_color".to_string(),
            margins: Margins::default(),
            style: RenderStyle::default(),
        }
    }
}

/// Padding around the flight path.
///
/// Fractions of the trajectory span for full tracks, absolute degrees
/// around the mean position in single-point mode.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct Margins {
    pub lat: f64,
    pub lon: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            lat: 0.2,
            lon: 0.05,
        }
    }
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    pub fn from_str(yaml: &str) -> Result<Self, ConfigError> {
        // an empty document deserializes to unit, not to an empty mapping
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }
}

pub fn require_dir(path: &Path) -> Result<(), ConfigError> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(ConfigError::MissingDirectory(path.to_path_buf()))
    }
}

pub fn require_file(path: &Path) -> Result<(), ConfigError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(ConfigError::MissingFile(path.to_path_buf()))
    }
}

/// Parse a `YYYYmmddHHMM` start/end bound, interpreted as UTC.
pub fn parse_time_bound(s: &str) -> Result<DateTime<Utc>, ConfigError> {
    NaiveDateTime::parse_from_str(s.trim(), "%Y%m%d%H%M")
        .map(|t| t.and_utc())
        .map_err(|_| ConfigError::InvalidTime(s.to_string()))
}

/// Parse a human readable cadence such as `30s` or `1m`.
pub fn parse_cadence(s: &str) -> Result<TimeDelta, ConfigError> {
    humantime::parse_duration(s.trim())
        .map_err(|e| e.to_string())
        .and_then(|d| TimeDelta::from_std(d).map_err(|e| e.to_string()))
        .map_err(|e| ConfigError::InvalidCadence(s.to_string(), e))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use rstest::rstest;

    use super::*;

    #[test]
    fn test_config_defaults() {
        let c = Config::from_str("").unwrap();

        assert_eq!("true_color", c.composite);
        assert_eq!(Margins { lat: 0.2, lon: 0.05 }, c.margins);
        assert_eq!(90, c.style.dpi);
    }

    #[test]
    fn test_config_partial() {
        let yaml = "
composite: colorized_ir_clouds
margins:
  lat: 0.5
style:
  track_colormap: plasma
  altitude_range: [0, 40000]
";
        let c = Config::from_str(yaml).unwrap();

        assert_eq!("colorized_ir_clouds", c.composite);
        assert_eq!(0.5, c.margins.lat);
        assert_eq!(0.05, c.margins.lon);
        assert_eq!((0.0, 40000.0), c.style.altitude_range);
        assert_eq!("red", c.style.position_color);
    }

    #[test]
    fn test_config_single_point_reuses_margins() {
        let yaml = "
margins:
  lat: 1.5
  lon: 2.0
style:
  single_point: true
";
        let c = Config::from_str(yaml).unwrap();
        assert!(c.style.single_point);

        let p = crate::trajectory::TrajectoryPoint::new(
            Utc.with_ymd_and_hms(2019, 5, 26, 5, 36, 0).unwrap(),
            10.0,
            100.0,
            0.0,
        );
        let e = crate::trajectory::point_bounds(&[p], c.margins.lat, c.margins.lon).unwrap();
        assert_eq!(3.0, e.height());
        assert_eq!(4.0, e.width());
    }

    #[test]
    fn test_config_bad_yaml() {
        let r = Config::from_str("margins: [1, 2");
        assert!(matches!(r, Err(ConfigError::Yaml(_))));
    }

    #[test]
    fn test_parse_time_bound() {
        let t = parse_time_bound("201905260536").unwrap();
        assert_eq!(Utc.with_ymd_and_hms(2019, 5, 26, 5, 36, 0).unwrap(), t);

        assert!(matches!(
            parse_time_bound("2019-05-26"),
            Err(ConfigError::InvalidTime(_))
        ));
    }

    #[rstest]
    #[case("30s", 30)]
    #[case("1m", 60)]
    #[case(" 2min 30s ", 150)]
    fn test_parse_cadence(#[case] inp: &str, #[case] secs: i64) {
        assert_eq!(TimeDelta::seconds(secs), parse_cadence(inp).unwrap());
    }

    #[test]
    fn test_parse_cadence_bad() {
        assert!(matches!(
            parse_cadence("soon"),
            Err(ConfigError::InvalidCadence(..))
        ));
    }

    #[test]
    fn test_require_paths() {
        let dir = tempfile::tempdir().unwrap();
        assert!(require_dir(dir.path()).is_ok());
        assert!(matches!(
            require_file(dir.path()),
            Err(ConfigError::MissingFile(_))
        ));
        assert!(matches!(
            require_dir(&dir.path().join("nope")),
            Err(ConfigError::MissingDirectory(_))
        ));
    }
}
