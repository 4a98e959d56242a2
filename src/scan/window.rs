use std::fmt;

use chrono::{DateTime, TimeDelta, Timelike, Utc};

use super::sensor::ScanSchedule;
use crate::trajectory::Trajectory;

/// Acquisition interval of one satellite scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScanWindow {
    pub start: DateTime<Utc>,
    pub duration: TimeDelta,
}

impl ScanWindow {
    pub fn end(&self) -> DateTime<Utc> {
        self.start + self.duration
    }

    /// Half-open containment, `[start, end)`.
    #[cfg(test)]
    pub(crate) fn contains(&self, ts: DateTime<Utc>) -> bool {
        ts >= self.start && ts < self.end()
    }
}

impl fmt::Display for ScanWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (+{}s)",
            self.start.format("%Y-%m-%d %H:%M:%S"),
            self.duration.num_seconds()
        )
    }
}

/// Map `ts` onto the scan window that contains it.
///
/// The start is the latest schedule entry at or before the minute-of-hour of
/// `ts` (seconds included as a fraction). Past the last entry of the hour the
/// window snaps to that last entry rather than passing `ts` through. Before
/// the first entry it falls back to the last entry of the previous hour.
pub fn window_for(ts: DateTime<Utc>, schedule: &ScanSchedule, cadence: TimeDelta) -> ScanWindow {
    let minute_of_hour = ts.minute() as f64 + ts.second() as f64 / 60.0;
    let hour_start = ts
        - TimeDelta::minutes(ts.minute() as i64)
        - TimeDelta::seconds(ts.second() as i64)
        - TimeDelta::nanoseconds(ts.nanosecond() as i64);

    let offsets = schedule.offsets();
    let last = offsets[offsets.len() - 1];
    let start = match offsets.iter().rposition(|&o| o <= minute_of_hour) {
        Some(i) => at_offset(hour_start, offsets[i]),
        None => at_offset(hour_start - TimeDelta::hours(1), last),
    };

    ScanWindow {
        start,
        duration: cadence,
    }
}

fn at_offset(hour_start: DateTime<Utc>, minutes: f64) -> DateTime<Utc> {
    hour_start + TimeDelta::seconds((minutes * 60.0).round() as i64)
}

/// Scan-aligned start and end of a trajectory.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanSpan {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ScanSpan {
    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }
}

pub fn scan_span(trajectory: &Trajectory, schedule: &ScanSchedule, cadence: TimeDelta) -> ScanSpan {
    ScanSpan {
        start: window_for(trajectory.first().timestamp, schedule, cadence).start,
        end: window_for(trajectory.last().timestamp, schedule, cadence).start,
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use rstest::rstest;

    use super::*;
    use crate::scan::{ScanMode, Sensor};
    use crate::trajectory::TrajectoryPoint;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2019, 5, 26, h, m, s).unwrap()
    }

    fn ten_minutes() -> ScanSchedule {
        ScanSchedule::new(vec![0.0, 10.0, 20.0, 30.0, 40.0, 50.0]).unwrap()
    }

    #[rstest]
    #[case(at(12, 20, 0), at(12, 20, 0))]
    #[case(at(12, 25, 30), at(12, 20, 0))]
    #[case(at(12, 0, 0), at(12, 0, 0))]
    #[case(at(12, 9, 59), at(12, 0, 0))]
    #[case(at(12, 10, 0), at(12, 10, 0))]
    #[case(at(12, 49, 59), at(12, 40, 0))]
    fn test_window_for_full_disk(#[case] ts: DateTime<Utc>, #[case] start: DateTime<Utc>) {
        let w = window_for(ts, &ten_minutes(), TimeDelta::minutes(10));

        assert_eq!(start, w.start);
        assert_eq!(start + TimeDelta::minutes(10), w.end());
        assert!(w.contains(ts));
    }

    #[test]
    fn test_window_for_exactly_at_last_entry() {
        let w = window_for(at(12, 50, 0), &ten_minutes(), TimeDelta::minutes(10));
        assert_eq!(at(12, 50, 0), w.start);
    }

    #[rstest]
    #[case(at(12, 50, 1))]
    #[case(at(12, 55, 0))]
    #[case(at(12, 59, 59))]
    fn test_window_for_past_last_entry(#[case] ts: DateTime<Utc>) {
        let w = window_for(ts, &ten_minutes(), TimeDelta::minutes(10));

        assert_eq!(at(12, 50, 0), w.start);
        assert!(w.contains(ts));
    }

    #[test]
    fn test_window_for_drops_subseconds() {
        let ts = at(12, 20, 0) + TimeDelta::milliseconds(400);
        let w = window_for(ts, &ten_minutes(), TimeDelta::minutes(10));
        assert_eq!(at(12, 20, 0), w.start);
    }

    #[test]
    fn test_window_for_is_idempotent() {
        let s = ten_minutes();
        let w = window_for(at(7, 33, 17), &s, TimeDelta::minutes(10));
        assert_eq!(w, window_for(w.start, &s, TimeDelta::minutes(10)));
    }

    #[rstest]
    #[case(at(3, 0, 0), at(3, 0, 0))]
    #[case(at(3, 2, 29), at(3, 0, 0))]
    #[case(at(3, 2, 30), at(3, 2, 30))]
    #[case(at(3, 59, 59), at(3, 57, 30))]
    fn test_window_for_himawari_meso(#[case] ts: DateTime<Utc>, #[case] start: DateTime<Utc>) {
        let s = Sensor::Ahi.schedule(ScanMode::Meso).unwrap();
        let w = window_for(ts, &s, TimeDelta::seconds(150));
        assert_eq!(start, w.start);
    }

    #[test]
    fn test_window_for_goes_mesoscale() {
        let s = Sensor::Abi.schedule(ScanMode::M1).unwrap();
        let w = window_for(at(18, 7, 59), &s, TimeDelta::minutes(1));
        assert_eq!(at(18, 7, 0), w.start);
    }

    #[test]
    fn test_window_for_before_first_entry() {
        let s = ScanSchedule::new(vec![15.0, 45.0]).unwrap();
        let w = window_for(at(12, 5, 0), &s, TimeDelta::minutes(30));

        assert_eq!(at(11, 45, 0), w.start);
        assert!(w.contains(at(12, 5, 0)));
    }

    #[test]
    fn test_window_for_crosses_midnight() {
        let s = ScanSchedule::new(vec![15.0, 45.0]).unwrap();
        let w = window_for(at(0, 1, 0), &s, TimeDelta::minutes(30));
        assert_eq!(Utc.with_ymd_and_hms(2019, 5, 25, 23, 45, 0).unwrap(), w.start);
    }

    #[test]
    fn test_scan_span() {
        let t = Trajectory::new(vec![
            TrajectoryPoint::new(at(5, 36, 24), 0.0, 0.0, 0.0),
            TrajectoryPoint::new(at(6, 14, 2), 1.0, 1.0, 0.0),
        ])
        .unwrap();
        let span = scan_span(&t, &ten_minutes(), TimeDelta::minutes(10));

        assert_eq!(at(5, 30, 0), span.start);
        assert_eq!(at(6, 10, 0), span.end);
        assert_eq!(TimeDelta::minutes(40), span.duration());
    }

    #[test]
    fn test_window_display() {
        let w = window_for(at(12, 25, 30), &ten_minutes(), TimeDelta::minutes(10));
        assert_eq!("2019-05-26 12:20:00 (+600s)", w.to_string());
    }
}
