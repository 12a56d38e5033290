//! Shift-aware calendar math.
//!
//! Working-minute accounting and shift-boundary membership over the
//! weekly shift patterns of [`WorkCenter`]s. All arithmetic is in UTC.
//!
//! # Boundary Asymmetry
//!
//! Shift membership is half-open and depends on what the timestamp is
//! used for: a *start* at exactly the shift's first hour is legal while
//! a start at its end hour is not, and symmetrically for *ends*. This
//! makes back-to-back hand-offs at a shift boundary legal without
//! double-counting the boundary minute.

use chrono::{DateTime, NaiveTime, Utc};

use crate::models::{Shift, WorkCenter};

/// Which side of an order interval a timestamp represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftBoundary {
    /// The timestamp is an order start: membership is `[start, end)`.
    Start,
    /// The timestamp is an order end: membership is `(start, end]`.
    End,
}

/// Whether `time` lies inside some shift, under the given boundary rule.
///
/// Shifts of the previous calendar day are consulted as well so that a
/// shift ending at hour 24 legally ends on the next day's midnight.
pub fn is_time_in_shift(time: DateTime<Utc>, shifts: &[Shift], boundary: ShiftBoundary) -> bool {
    let today = time.date_naive();
    let days = match today.pred_opt() {
        Some(yesterday) => vec![yesterday, today],
        None => vec![today],
    };

    for date in days {
        for shift in shifts.iter().filter(|s| s.applies_on(date)) {
            let (start, end) = shift.bounds_on(date);
            let inside = match boundary {
                ShiftBoundary::Start => time >= start && time < end,
                ShiftBoundary::End => time > start && time <= end,
            };
            if inside {
                return true;
            }
        }
    }
    false
}

/// Net on-the-clock minutes between two timestamps on a work center.
///
/// Sums the intersection of `[start, end)` with every shift occurrence
/// in the covered calendar days, minus any overlap with the center's
/// maintenance windows, rounded to the nearest whole minute.
/// Degenerate ranges (`start >= end`) yield 0.
pub fn working_minutes(start: DateTime<Utc>, end: DateTime<Utc>, center: &WorkCenter) -> i64 {
    if start >= end {
        return 0;
    }

    let mut total_seconds: i64 = 0;
    let mut day = start.date_naive();
    let last = end.date_naive();

    while day <= last {
        for shift in center.shifts.iter().filter(|s| s.applies_on(day)) {
            let (shift_start, shift_end) = shift.bounds_on(day);
            let slice_start = shift_start.max(start);
            let slice_end = shift_end.min(end);
            if slice_end <= slice_start {
                continue;
            }

            let mut seconds = (slice_end - slice_start).num_seconds();
            for window in &center.maintenance_windows {
                let blocked_start = window.start.max(slice_start);
                let blocked_end = window.end.min(slice_end);
                if blocked_end > blocked_start {
                    seconds -= (blocked_end - blocked_start).num_seconds();
                }
            }
            total_seconds += seconds.max(0);
        }

        match day.succ_opt() {
            Some(next) => day = next,
            None => break,
        }
    }

    (total_seconds as f64 / 60.0).round() as i64
}

/// Midnight starting the day after `time`'s date.
///
/// Saturates at the calendar limit; the cursor watchdogs in the engine
/// bound any resulting stall.
pub(crate) fn next_midnight(time: DateTime<Utc>) -> DateTime<Utc> {
    match time.date_naive().succ_opt() {
        Some(next) => next.and_time(NaiveTime::MIN).and_utc(),
        None => time,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MaintenanceWindow;
    use chrono::TimeZone;

    fn ts(d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, d, h, min, 0).unwrap()
    }

    // Mon + Tue 08-17
    fn mon_tue() -> Vec<Shift> {
        vec![Shift::new(1, 8, 17), Shift::new(2, 8, 17)]
    }

    #[test]
    fn test_start_boundary_asymmetry() {
        let shifts = mon_tue();
        // Start at shift start is legal, at shift end is not.
        assert!(is_time_in_shift(ts(9, 8, 0), &shifts, ShiftBoundary::Start));
        assert!(!is_time_in_shift(ts(9, 17, 0), &shifts, ShiftBoundary::Start));
        assert!(is_time_in_shift(ts(9, 16, 59), &shifts, ShiftBoundary::Start));
    }

    #[test]
    fn test_end_boundary_asymmetry() {
        let shifts = mon_tue();
        // End at shift end is legal, at shift start is not.
        assert!(is_time_in_shift(ts(9, 17, 0), &shifts, ShiftBoundary::End));
        assert!(!is_time_in_shift(ts(9, 8, 0), &shifts, ShiftBoundary::End));
    }

    #[test]
    fn test_outside_shift_days() {
        let shifts = mon_tue();
        // Sunday 2026-02-08 has no shift at all.
        assert!(!is_time_in_shift(ts(8, 12, 0), &shifts, ShiftBoundary::Start));
        assert!(!is_time_in_shift(ts(8, 12, 0), &shifts, ShiftBoundary::End));
    }

    #[test]
    fn test_hour_24_shift_end_at_midnight() {
        // Mon 16-24: an end at Tue 00:00 is legal.
        let shifts = vec![Shift::new(1, 16, 24)];
        assert!(is_time_in_shift(ts(10, 0, 0), &shifts, ShiftBoundary::End));
        assert!(!is_time_in_shift(ts(10, 0, 0), &shifts, ShiftBoundary::Start));
    }

    #[test]
    fn test_working_minutes_single_day() {
        let wc = WorkCenter::new("wc-1").with_shift(1, 8, 17);
        assert_eq!(working_minutes(ts(9, 8, 0), ts(9, 9, 0), &wc), 60);
        // Clipped to the shift on both sides.
        assert_eq!(working_minutes(ts(9, 6, 0), ts(9, 9, 0), &wc), 60);
        assert_eq!(working_minutes(ts(9, 15, 0), ts(9, 19, 0), &wc), 120);
    }

    #[test]
    fn test_working_minutes_across_days() {
        let wc = WorkCenter::new("wc-1").with_shift(1, 8, 17).with_shift(2, 8, 17);
        // Mon 16:00 .. Tue 09:00 = 60 on Monday + 60 on Tuesday.
        assert_eq!(working_minutes(ts(9, 16, 0), ts(10, 9, 0), &wc), 120);
        // The Sunday-Monday gap contributes nothing.
        assert_eq!(working_minutes(ts(8, 0, 0), ts(9, 9, 0), &wc), 60);
    }

    #[test]
    fn test_working_minutes_subtracts_maintenance() {
        let wc = WorkCenter::new("wc-1")
            .with_shift(1, 8, 17)
            .with_maintenance(MaintenanceWindow::new(ts(9, 10, 0), ts(9, 11, 0)));
        assert_eq!(working_minutes(ts(9, 8, 0), ts(9, 12, 0), &wc), 180);
        // Fully inside the window.
        assert_eq!(working_minutes(ts(9, 10, 0), ts(9, 11, 0), &wc), 0);
    }

    #[test]
    fn test_working_minutes_multiple_shifts_per_day() {
        let wc = WorkCenter::new("wc-1").with_shift(1, 8, 12).with_shift(1, 13, 17);
        assert_eq!(working_minutes(ts(9, 8, 0), ts(9, 17, 0), &wc), 480);
        // Spanning the midday gap counts only shift time.
        assert_eq!(working_minutes(ts(9, 11, 0), ts(9, 14, 0), &wc), 120);
    }

    #[test]
    fn test_working_minutes_degenerate() {
        let wc = WorkCenter::new("wc-1").with_shift(1, 8, 17);
        assert_eq!(working_minutes(ts(9, 9, 0), ts(9, 9, 0), &wc), 0);
        assert_eq!(working_minutes(ts(9, 10, 0), ts(9, 9, 0), &wc), 0);
    }

    #[test]
    fn test_next_midnight() {
        assert_eq!(next_midnight(ts(9, 13, 30)), ts(10, 0, 0));
        assert_eq!(next_midnight(ts(9, 0, 0)), ts(10, 0, 0));
    }
}
