//! Work center model: recurring shifts and maintenance windows.
//!
//! A work center runs at most one work order at a time. Its availability
//! is a weekly pattern of [`Shift`]s (day-of-week + whole hours) minus
//! one-off [`MaintenanceWindow`]s.
//!
//! # Precedence
//! Maintenance windows override shifts: a timestamp inside a window is
//! unavailable to production even when it lies inside a shift.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// A recurring working interval on one weekday.
///
/// `day_of_week` uses 0 = Sunday through 6 = Saturday. Hours are whole
/// UTC hours with `start_hour < end_hour`; `end_hour` may be 24,
/// meaning the shift runs to the following midnight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shift {
    /// Weekday (0 = Sunday .. 6 = Saturday).
    pub day_of_week: u8,
    /// First working hour (0..=23).
    pub start_hour: u8,
    /// End hour, exclusive (1..=24).
    pub end_hour: u8,
}

impl Shift {
    /// Creates a new shift.
    pub fn new(day_of_week: u8, start_hour: u8, end_hour: u8) -> Self {
        Self {
            day_of_week,
            start_hour,
            end_hour,
        }
    }

    /// Whether this shift recurs on the given calendar date.
    #[inline]
    pub fn applies_on(&self, date: NaiveDate) -> bool {
        date.weekday().num_days_from_sunday() == u32::from(self.day_of_week)
    }

    /// Concrete bounds of this shift on the given date.
    ///
    /// An `end_hour` of 24 maps to the following day's midnight.
    pub fn bounds_on(&self, date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
        (
            hour_boundary(date, self.start_hour),
            hour_boundary(date, self.end_hour),
        )
    }
}

/// A whole-hour boundary on a date; hour 24 is the next day's midnight.
fn hour_boundary(date: NaiveDate, hour: u8) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc() + Duration::hours(i64::from(hour))
}

/// A one-off interval during which only maintenance orders may run.
///
/// Half-open: includes `start`, excludes `end`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceWindow {
    /// Window start (UTC, inclusive).
    pub start: DateTime<Utc>,
    /// Window end (UTC, exclusive).
    pub end: DateTime<Utc>,
    /// Optional human-readable reason.
    pub reason: Option<String>,
}

impl MaintenanceWindow {
    /// Creates a new maintenance window.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start,
            end,
            reason: None,
        }
    }

    /// Sets the reason.
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Whether a timestamp falls within this window.
    #[inline]
    pub fn contains(&self, time: DateTime<Utc>) -> bool {
        time >= self.start && time < self.end
    }

    /// Whether an interval `[start, end)` intersects this window.
    pub fn intersects(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start < end && start < self.end
    }
}

/// A production resource with a weekly shift pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkCenter {
    /// Work center identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Recurring shifts. Shifts on the same day must not overlap.
    pub shifts: Vec<Shift>,
    /// One-off maintenance windows (assumed non-overlapping).
    pub maintenance_windows: Vec<MaintenanceWindow>,
}

impl WorkCenter {
    /// Creates a work center with no shifts.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            shifts: Vec::new(),
            maintenance_windows: Vec::new(),
        }
    }

    /// Sets the name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Adds a recurring shift.
    pub fn with_shift(mut self, day_of_week: u8, start_hour: u8, end_hour: u8) -> Self {
        self.shifts.push(Shift::new(day_of_week, start_hour, end_hour));
        self
    }

    /// Adds a maintenance window.
    pub fn with_maintenance(mut self, window: MaintenanceWindow) -> Self {
        self.maintenance_windows.push(window);
        self
    }

    /// Concrete shift intervals on the given date, sorted by start.
    pub fn shift_segments_on(&self, date: NaiveDate) -> Vec<(DateTime<Utc>, DateTime<Utc>)> {
        let mut segments: Vec<_> = self
            .shifts
            .iter()
            .filter(|s| s.applies_on(date))
            .map(|s| s.bounds_on(date))
            .collect();
        segments.sort_by_key(|&(start, _)| start);
        segments
    }
}
