//! Reservation time windows
//!
//! A [`TimeSlot`] is the half-open interval `[start, end)` a booking
//! occupies. Two windows conflict iff `a.start < b.end && a.end > b.start`,
//! so back-to-back bookings (one ending exactly when the next begins) do not.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeSlot {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeSlot {
    /// Window of `duration` starting at `time` on `date`.
    pub fn starting_at(date: NaiveDate, time: NaiveTime, duration: Duration) -> Self {
        let start = date.and_time(time);
        Self {
            start,
            end: start + duration,
        }
    }

    pub fn from_bounds(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    pub fn overlaps(&self, other: &TimeSlot) -> bool {
        intervals_overlap(self.start, self.end, other.start, other.end)
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

/// Half-open overlap test shared by every conflict query.
pub fn intervals_overlap(
    existing_start: NaiveDateTime,
    existing_end: NaiveDateTime,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> bool {
    existing_start < end && existing_end > start
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(h: u32, m: u32) -> TimeSlot {
        TimeSlot::starting_at(
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            NaiveTime::from_hms_opt(h, m, 0).unwrap(),
            Duration::minutes(60),
        )
    }

    #[test]
    fn end_is_start_plus_duration() {
        let slot = at(12, 0);
        assert_eq!(slot.duration(), Duration::minutes(60));
        assert_eq!(slot.end.time(), NaiveTime::from_hms_opt(13, 0, 0).unwrap());
    }

    #[test]
    fn partial_overlap_conflicts() {
        assert!(at(12, 0).overlaps(&at(12, 30)));
        assert!(at(12, 30).overlaps(&at(12, 0)));
    }

    #[test]
    fn back_to_back_windows_do_not_conflict() {
        assert!(!at(12, 0).overlaps(&at(13, 0)));
        assert!(!at(13, 0).overlaps(&at(12, 0)));
    }

    #[test]
    fn identical_windows_conflict() {
        assert!(at(18, 15).overlaps(&at(18, 15)));
    }

    #[test]
    fn windows_on_other_days_do_not_conflict() {
        let other_day = TimeSlot::starting_at(
            NaiveDate::from_ymd_opt(2024, 6, 2).unwrap(),
            NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
            Duration::minutes(60),
        );
        assert!(!at(12, 0).overlaps(&other_day));
    }
}
