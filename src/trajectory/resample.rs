use chrono::{DateTime, TimeDelta, Timelike, Utc};

use super::error::DataError;
use super::types::{Trajectory, TrajectoryPoint};

/// Trajectory sampled on a fixed time grid.
///
/// Unlike [`Trajectory`] it may hold a single point, when the raw track is
/// shorter than one cadence step past its truncated start.
#[derive(Debug, Clone, PartialEq)]
pub struct ResampledTrajectory {
    points: Vec<TrajectoryPoint>,
    cadence: TimeDelta,
}

impl ResampledTrajectory {
    pub fn points(&self) -> &[TrajectoryPoint] {
        &self.points
    }

    pub fn get(&self, index: usize) -> Option<&TrajectoryPoint> {
        self.points.get(index)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn cadence(&self) -> TimeDelta {
        self.cadence
    }
}

/// Zero the seconds and sub-second part of a timestamp.
pub fn truncate_to_minute(ts: DateTime<Utc>) -> DateTime<Utc> {
    ts - TimeDelta::seconds(ts.second() as i64) - TimeDelta::nanoseconds(ts.nanosecond() as i64)
}

/// Resample `trajectory` onto a grid of `cadence` steps.
///
/// The grid starts at the first timestamp truncated to the minute and runs
/// through the last timestamp inclusive. Each axis is interpolated linearly
/// in epoch seconds; grid times before the first sample extend the first
/// segment instead of clamping.
pub fn resample(
    trajectory: &Trajectory,
    cadence: TimeDelta,
) -> Result<ResampledTrajectory, DataError> {
    if cadence <= TimeDelta::zero() {
        return Err(DataError::InvalidCadence(cadence));
    }

    let points = trajectory.points();
    let times: Vec<f64> = points.iter().map(|p| epoch_seconds(p.timestamp)).collect();
    let latitude = Interpolant::new(&times, points.iter().map(|p| p.latitude));
    let longitude = Interpolant::new(&times, points.iter().map(|p| p.longitude));
    let altitude = Interpolant::new(&times, points.iter().map(|p| p.altitude));

    let end = trajectory.last().timestamp;
    let mut cursor = truncate_to_minute(trajectory.first().timestamp);
    let mut out = Vec::new();

    while cursor <= end {
        let t = epoch_seconds(cursor);
        out.push(TrajectoryPoint {
            timestamp: cursor,
            latitude: latitude.eval(t),
            longitude: longitude.eval(t),
            altitude: altitude.eval(t),
        });
        // a cadence stepping past chrono's range ends the grid
        match cursor.checked_add_signed(cadence) {
            Some(next) => cursor = next,
            None => break,
        }
    }

    Ok(ResampledTrajectory {
        points: out,
        cadence,
    })
}

fn epoch_seconds(ts: DateTime<Utc>) -> f64 {
    ts.timestamp() as f64 + ts.timestamp_subsec_nanos() as f64 * 1e-9
}

/// Piecewise-linear function through `(xs[i], ys[i])`, extended linearly past both ends.
/// `xs` is strictly increasing with at least two entries.
struct Interpolant<'a> {
    xs: &'a [f64],
    ys: Vec<f64>,
}

impl<'a> Interpolant<'a> {
    fn new(xs: &'a [f64], ys: impl Iterator<Item = f64>) -> Self {
        Self {
            xs,
            ys: ys.collect(),
        }
    }

    fn eval(&self, x: f64) -> f64 {
        let n = self.xs.len();
        // segment [i - 1, i]; out-of-range x reuses the first or last segment
        let i = self.xs.partition_point(|&v| v <= x).clamp(1, n - 1);
        let (x0, x1) = (self.xs[i - 1], self.xs[i]);
        let (y0, y1) = (self.ys[i - 1], self.ys[i]);
        y0 + (y1 - y0) * (x - x0) / (x1 - x0)
    }
}
