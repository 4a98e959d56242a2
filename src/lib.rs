//! Frame renderer for aircraft tracks over time-matched geostationary satellite scans.
//!
//! A trajectory is resampled to a fixed cadence, every position is mapped to
//! the scan window of the chosen sensor, and one frame per position is drawn
//! with the scene of that window behind the track.

pub mod config;
pub mod driver;
pub mod render;
pub mod scan;
pub mod scene;
pub mod trajectory;

#[cfg(test)]
mod test_util;
