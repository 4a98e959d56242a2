use std::str::FromStr;

use chrono::TimeDelta;
use serde::Serialize;
use strum_macros::{Display, EnumString};

use crate::config::ConfigError;

/// Geostationary imagers the schedule table knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
#[serde(rename_all = "UPPERCASE")]
pub enum Sensor {
    /// Himawari-8/9
    Ahi,
    /// GOES-R series
    Abi,
    /// Meteosat Second Generation, HRIT files
    Sev,
    /// Meteosat Second Generation, native files
    Sevn,
    /// Fengyun-4A
    Agr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
#[serde(rename_all = "UPPERCASE")]
pub enum ScanMode {
    /// Full disk
    Fd,
    /// Himawari target area rapid scan
    Meso,
    /// GOES-East continental US
    Conus,
    /// GOES-West Pacific US
    Pacus,
    /// GOES mesoscale sector 1
    M1,
    /// GOES mesoscale sector 2
    M2,
    /// SEVIRI rapid scan service
    Rss,
}

struct ScanPattern {
    sensor: Sensor,
    mode: ScanMode,
    cadence_minutes: f64,
    /// Number of offsets listed for one hour, starting at minute 0.
    slots: usize,
}

const fn pattern(sensor: Sensor, mode: ScanMode, cadence_minutes: f64, slots: usize) -> ScanPattern {
    ScanPattern {
        sensor,
        mode,
        cadence_minutes,
        slots,
    }
}

/// Every supported sensor/mode pair. Anything missing here is a configuration error.
const SCAN_TABLE: &[ScanPattern] = &[
    pattern(Sensor::Ahi, ScanMode::Fd, 10.0, 6),
    // 25 slots: the 60-minute entry closes the last interval of the hour
    pattern(Sensor::Ahi, ScanMode::Meso, 2.5, 25),
    pattern(Sensor::Abi, ScanMode::Fd, 10.0, 6),
    pattern(Sensor::Abi, ScanMode::Conus, 5.0, 12),
    pattern(Sensor::Abi, ScanMode::Pacus, 5.0, 12),
    pattern(Sensor::Abi, ScanMode::M1, 1.0, 60),
    pattern(Sensor::Abi, ScanMode::M2, 1.0, 60),
    pattern(Sensor::Sev, ScanMode::Fd, 10.0, 6),
    pattern(Sensor::Sev, ScanMode::Rss, 5.0, 12),
    pattern(Sensor::Sevn, ScanMode::Fd, 10.0, 6),
    pattern(Sensor::Sevn, ScanMode::Rss, 5.0, 12),
];

impl Sensor {
    pub fn parse(name: &str) -> Result<Self, ConfigError> {
        Self::from_str(name.trim()).map_err(|_| ConfigError::UnknownSensor(name.to_string()))
    }

    fn pattern(self, mode: ScanMode) -> Result<&'static ScanPattern, ConfigError> {
        SCAN_TABLE
            .iter()
            .find(|p| p.sensor == self && p.mode == mode)
            .ok_or(ConfigError::UnsupportedMode { sensor: self, mode })
    }

    /// Intra-hour scan start offsets, in minutes.
    pub fn schedule(self, mode: ScanMode) -> Result<ScanSchedule, ConfigError> {
        let p = self.pattern(mode)?;
        ScanSchedule::new(
            (0..p.slots)
                .map(|i| i as f64 * p.cadence_minutes)
                .collect(),
        )
    }

    /// Minutes between two consecutive scans.
    pub fn cadence_minutes(self, mode: ScanMode) -> Result<f64, ConfigError> {
        Ok(self.pattern(mode)?.cadence_minutes)
    }
}

impl ScanMode {
    pub fn parse(name: &str) -> Result<Self, ConfigError> {
        Self::from_str(name.trim()).map_err(|_| ConfigError::UnknownMode(name.to_string()))
    }
}

/// Ascending scan start offsets within an hour, in (possibly fractional) minutes.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanSchedule {
    offsets: Vec<f64>,
}

impl ScanSchedule {
    pub fn new(offsets: Vec<f64>) -> Result<Self, ConfigError> {
        if offsets.is_empty() {
            return Err(ConfigError::InvalidSchedule("no scan offsets".into()));
        }
        if offsets.iter().any(|&o| !(0.0..=60.0).contains(&o)) {
            return Err(ConfigError::InvalidSchedule(format!(
                "offsets must lie within the hour: {:?}",
                offsets
            )));
        }
        if offsets.windows(2).any(|w| w[1] <= w[0]) {
            return Err(ConfigError::InvalidSchedule(format!(
                "offsets must be strictly ascending: {:?}",
                offsets
            )));
        }

        Ok(Self { offsets })
    }

    pub fn offsets(&self) -> &[f64] {
        &self.offsets
    }
}

/// Schedule and scan duration of one sensor/mode, resolved once per run.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanTiming {
    pub sensor: Sensor,
    pub mode: ScanMode,
    pub schedule: ScanSchedule,
    pub cadence: TimeDelta,
}

impl ScanTiming {
    pub fn lookup(sensor: Sensor, mode: ScanMode) -> Result<Self, ConfigError> {
        let schedule = sensor.schedule(mode)?;
        let minutes = sensor.cadence_minutes(mode)?;

        Ok(Self {
            sensor,
            mode,
            schedule,
            cadence: TimeDelta::milliseconds((minutes * 60_000.0).round() as i64),
        })
    }
}
