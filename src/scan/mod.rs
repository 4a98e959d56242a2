mod sensor;
mod window;

pub use sensor::{ScanMode, ScanSchedule, ScanTiming, Sensor};
pub use window::{scan_span, window_for, ScanSpan, ScanWindow};
