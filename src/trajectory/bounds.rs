use serde::Serialize;

use super::error::DataError;
use super::types::{Trajectory, TrajectoryPoint};

/// Geographic bounding box in degrees, always with a positive width and height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoExtent {
    lon_min: f64,
    lon_max: f64,
    lat_min: f64,
    lat_max: f64,
}

impl GeoExtent {
    pub fn new(lon_min: f64, lon_max: f64, lat_min: f64, lat_max: f64) -> Result<Self, DataError> {
        // written as !(a < b) so NaN is rejected as well
        if !(lon_min < lon_max) {
            return Err(DataError::DegenerateExtent {
                axis: "longitude",
                min: lon_min,
                max: lon_max,
            });
        }
        if !(lat_min < lat_max) {
            return Err(DataError::DegenerateExtent {
                axis: "latitude",
                min: lat_min,
                max: lat_max,
            });
        }

        Ok(Self {
            lon_min,
            lon_max,
            lat_min,
            lat_max,
        })
    }

    pub fn lon_min(&self) -> f64 {
        self.lon_min
    }

    pub fn lon_max(&self) -> f64 {
        self.lon_max
    }

    pub fn lat_min(&self) -> f64 {
        self.lat_min
    }

    pub fn lat_max(&self) -> f64 {
        self.lat_max
    }

    pub fn width(&self) -> f64 {
        self.lon_max - self.lon_min
    }

    pub fn height(&self) -> f64 {
        self.lat_max - self.lat_min
    }
}

/// Extent of the whole trajectory, widened on each side by a fraction of its span.
///
/// With latitudes spanning 10..12 and `lat_margin_frac = 0.1` the result covers
/// 9.8..12.2. Always computed on the raw trajectory so resampling cannot shrink
/// the visible area.
pub fn bounds(
    trajectory: &Trajectory,
    lat_margin_frac: f64,
    lon_margin_frac: f64,
) -> Result<GeoExtent, DataError> {
    let (lat_min, lat_max) = min_max(trajectory.points().iter().map(|p| p.latitude));
    let (lon_min, lon_max) = min_max(trajectory.points().iter().map(|p| p.longitude));

    let lat_pad = (lat_max - lat_min) * lat_margin_frac;
    let lon_pad = (lon_max - lon_min) * lon_margin_frac;

    GeoExtent::new(
        lon_min - lon_pad,
        lon_max + lon_pad,
        lat_min - lat_pad,
        lat_max + lat_pad,
    )
}

/// Extent centred on the mean position of `points`, padded by absolute margins in degrees.
pub fn point_bounds(
    points: &[TrajectoryPoint],
    lat_margin: f64,
    lon_margin: f64,
) -> Result<GeoExtent, DataError> {
    if points.is_empty() {
        return Err(DataError::TooFewPoints(0));
    }

    let n = points.len() as f64;
    let lat = points.iter().map(|p| p.latitude).sum::<f64>() / n;
    let lon = points.iter().map(|p| p.longitude).sum::<f64>() / n;

    GeoExtent::new(
        lon - lon_margin,
        lon + lon_margin,
        lat - lat_margin,
        lat + lat_margin,
    )
}

fn min_max(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}
