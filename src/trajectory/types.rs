use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;

use super::error::DataError;

/// A single aircraft position report. Altitude is in feet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrajectoryPoint {
    pub timestamp: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
}

impl TrajectoryPoint {
    pub fn new(timestamp: DateTime<Utc>, latitude: f64, longitude: f64, altitude: f64) -> Self {
        Self {
            timestamp,
            latitude,
            longitude,
            altitude,
        }
    }
}

/// Raw aircraft track as read from the source file.
///
/// Holds at least two points with strictly increasing timestamps. The
/// constructor is the only way in, so every consumer can rely on both.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    points: Vec<TrajectoryPoint>,
}

impl Trajectory {
    pub fn new(points: Vec<TrajectoryPoint>) -> Result<Self, DataError> {
        if points.len() < 2 {
            return Err(DataError::TooFewPoints(points.len()));
        }

        if let Some(i) = points
            .windows(2)
            .position(|w| w[1].timestamp <= w[0].timestamp)
        {
            return Err(DataError::NonIncreasing {
                index: i + 1,
                timestamp: points[i + 1].timestamp,
            });
        }

        Ok(Self { points })
    }

    pub fn points(&self) -> &[TrajectoryPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> &TrajectoryPoint {
        &self.points[0]
    }

    pub fn last(&self) -> &TrajectoryPoint {
        &self.points[self.points.len() - 1]
    }

    pub fn duration(&self) -> TimeDelta {
        self.last().timestamp - self.first().timestamp
    }
}
