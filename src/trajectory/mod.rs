mod bounds;
mod error;
mod reader;
mod resample;
mod types;

pub use bounds::{bounds, point_bounds, GeoExtent};
pub use error::DataError;
pub use reader::{CsvReader, Fr24Reader, TimeBounds, TrajectoryFormat, TrajectoryReader};
pub use resample::{resample, truncate_to_minute, ResampledTrajectory};
pub use types::{Trajectory, TrajectoryPoint};
