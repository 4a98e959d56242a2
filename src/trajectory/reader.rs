use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDateTime, Utc};
use clap::ValueEnum;
use serde::Deserialize;
use strum_macros::{Display, EnumString};

use super::error::DataError;
use super::types::{Trajectory, TrajectoryPoint};

/// Optional inclusive time range used to cut a trajectory on load.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TimeBounds {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl TimeBounds {
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        self.start.is_none_or(|s| ts >= s) && self.end.is_none_or(|e| ts <= e)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, ValueEnum)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum TrajectoryFormat {
    /// Datetime,Latitude,Longitude,Altitude with `dd/mm/yy HH:MM:SS` timestamps
    Csv,
    /// Flightradar24 CSV export
    Fr24,
}

impl TrajectoryFormat {
    pub fn reader(self) -> Box<dyn TrajectoryReader> {
        match self {
            TrajectoryFormat::Csv => Box::new(CsvReader),
            TrajectoryFormat::Fr24 => Box::new(Fr24Reader),
        }
    }
}

pub trait TrajectoryReader {
    /// Parse every position in `input` that falls within `bounds`.
    fn parse(&self, input: &mut dyn Read, bounds: &TimeBounds) -> Result<Trajectory, DataError>;

    fn read(&self, path: &Path, bounds: &TimeBounds) -> Result<Trajectory, DataError> {
        let mut file = File::open(path)?;
        self.parse(&mut file, bounds)
    }
}

const CSV_TIME_FORMAT: &str = "%d/%m/%y %H:%M:%S";
const FR24_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CsvRecord {
    datetime: String,
    latitude: f64,
    longitude: f64,
    altitude: f64,
}

#[derive(Debug, Deserialize)]
struct Fr24Record {
    #[serde(rename = "UTC")]
    utc: String,
    #[serde(rename = "Position")]
    position: String,
    #[serde(rename = "Altitude")]
    altitude: f64,
}

/// Generic time/lat/lon/alt CSV, e.g. `26/05/19 05:36:24, 51.47, -0.4543, 0`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvReader;

impl TrajectoryReader for CsvReader {
    fn parse(&self, input: &mut dyn Read, bounds: &TimeBounds) -> Result<Trajectory, DataError> {
        let mut rdr = csv_reader(input);
        let mut points = Vec::new();

        for (i, rec) in rdr.deserialize::<CsvRecord>().enumerate() {
            let rec = rec?;
            let timestamp = parse_time(&rec.datetime, CSV_TIME_FORMAT, i + 1)?;
            if bounds.contains(timestamp) {
                points.push(TrajectoryPoint::new(
                    timestamp,
                    rec.latitude,
                    rec.longitude,
                    rec.altitude,
                ));
            }
        }

        log::debug!("Read {} positions from CSV", points.len());
        Trajectory::new(points)
    }
}

/// Flightradar24 export: `UTC` timestamp plus a quoted `"lat,lon"` position column.
#[derive(Debug, Clone, Copy, Default)]
pub struct Fr24Reader;

impl TrajectoryReader for Fr24Reader {
    fn parse(&self, input: &mut dyn Read, bounds: &TimeBounds) -> Result<Trajectory, DataError> {
        let mut rdr = csv_reader(input);
        let mut points = Vec::new();

        for (i, rec) in rdr.deserialize::<Fr24Record>().enumerate() {
            let rec = rec?;
            let row = i + 1;
            let timestamp = parse_time(&rec.utc, FR24_TIME_FORMAT, row)?;
            if !bounds.contains(timestamp) {
                continue;
            }

            let (lat, lon) = rec.position.split_once(',').ok_or_else(|| DataError::Row {
                row,
                message: format!("bad position '{}'", rec.position),
            })?;
            let latitude = parse_coord(lat, row)?;
            let longitude = parse_coord(lon, row)?;

            points.push(TrajectoryPoint::new(
                timestamp,
                latitude,
                longitude,
                rec.altitude,
            ));
        }

        log::debug!("Read {} positions from FR24 export", points.len());
        Trajectory::new(points)
    }
}

fn csv_reader(input: &mut dyn Read) -> csv::Reader<&mut dyn Read> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(input)
}

fn parse_time(s: &str, fmt: &str, row: usize) -> Result<DateTime<Utc>, DataError> {
    NaiveDateTime::parse_from_str(s.trim(), fmt)
        .map(|t| t.and_utc())
        .map_err(|e| DataError::Row {
            row,
            message: format!("bad timestamp '{}': {}", s, e),
        })
}

fn parse_coord(s: &str, row: usize) -> Result<f64, DataError> {
    s.trim().parse().map_err(|e| DataError::Row {
        row,
        message: format!("bad coordinate '{}': {}", s, e),
    })
}
