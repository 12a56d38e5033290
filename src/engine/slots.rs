//! Slot search: monotone time cursors over shifts and obstacles.
//!
//! Two cursor walks close the loop with the checker's working-minute
//! accounting: [`find_next_available_start`] yields the earliest legal
//! start at or after a requested time, and [`find_end_date`] consumes a
//! net working duration from such a start. Obstacles are the center's
//! maintenance windows plus its fixed maintenance orders.
//!
//! Both cursors only ever move forward; a watchdog bounds the number of
//! hops against degenerate calendars (e.g. a center with no shifts).

use chrono::{DateTime, Duration, Utc};

use crate::calendar::next_midnight;
use crate::models::{WorkCenter, WorkOrder};

use super::ReflowConfig;

/// Earliest `t >= from` that lies inside a shift and outside every
/// obstacle on this work center.
///
/// Fixed maintenance orders are checked before maintenance windows;
/// the cursor jumps to the end of whichever covers it.
pub fn find_next_available_start(
    from: DateTime<Utc>,
    center: &WorkCenter,
    all_orders: &[WorkOrder],
    config: &ReflowConfig,
) -> DateTime<Utc> {
    let mut current = from;

    for _ in 0..config.max_cursor_hops {
        let segments = center.shift_segments_on(current.date_naive());
        let Some((segment_start, _)) = segments.into_iter().find(|&(_, end)| end > current) else {
            current = next_midnight(current);
            continue;
        };
        if current < segment_start {
            current = segment_start;
        }

        if let Some(fixed) = fixed_orders(center, all_orders).find(|o| o.contains(current)) {
            current = fixed.end;
            continue;
        }
        if let Some(window) = center.maintenance_windows.iter().find(|w| w.contains(current)) {
            current = window.end;
            continue;
        }
        return current;
    }

    tracing::warn!(
        work_center = %center.id,
        from = %from,
        "slot search exhausted its hop budget, returning cursor position"
    );
    current
}

/// End timestamp after consuming `duration_minutes` net working minutes
/// from `start`.
///
/// Consumption runs inside shift segments and halts at the earliest
/// obstacle starting before the segment ends; the cursor resumes after
/// the obstacle (or at the next segment) until the duration is spent.
pub fn find_end_date(
    start: DateTime<Utc>,
    duration_minutes: i64,
    center: &WorkCenter,
    all_orders: &[WorkOrder],
    config: &ReflowConfig,
) -> DateTime<Utc> {
    let mut remaining = Duration::minutes(duration_minutes.max(0));
    let mut current = start;

    for _ in 0..config.max_cursor_hops {
        if remaining <= Duration::zero() {
            return current;
        }

        let segments = center.shift_segments_on(current.date_naive());
        let Some((segment_start, segment_end)) =
            segments.into_iter().find(|&(_, end)| end > current)
        else {
            current = next_midnight(current);
            continue;
        };
        if current < segment_start {
            current = segment_start;
        }

        // An obstacle already covering the cursor consumes no time.
        if let Some(end) = covering_obstacle_end(current, center, all_orders) {
            current = end;
            continue;
        }

        // Earliest obstacle ahead of the cursor in this segment.
        let mut deadline = segment_end;
        let mut obstacle_end = None;
        for order in fixed_orders(center, all_orders) {
            if order.start >= current && order.start < deadline {
                deadline = order.start;
                obstacle_end = Some(order.end);
            }
        }
        for window in &center.maintenance_windows {
            if window.start >= current && window.start < deadline {
                deadline = window.start;
                obstacle_end = Some(window.end);
            }
        }

        let available = deadline - current;
        if available >= remaining {
            return current + remaining;
        }
        remaining = remaining - available;
        current = obstacle_end.unwrap_or(deadline);
    }

    tracing::warn!(
        work_center = %center.id,
        start = %start,
        "end-date search exhausted its hop budget, returning cursor position"
    );
    current + remaining.max(Duration::zero())
}

fn fixed_orders<'a>(
    center: &'a WorkCenter,
    all_orders: &'a [WorkOrder],
) -> impl Iterator<Item = &'a WorkOrder> {
    all_orders
        .iter()
        .filter(move |o| o.is_maintenance && o.work_center_id == center.id)
}

fn covering_obstacle_end(
    time: DateTime<Utc>,
    center: &WorkCenter,
    all_orders: &[WorkOrder],
) -> Option<DateTime<Utc>> {
    if let Some(order) = fixed_orders(center, all_orders).find(|o| o.contains(time)) {
        return Some(order.end);
    }
    center
        .maintenance_windows
        .iter()
        .find(|w| w.contains(time))
        .map(|w| w.end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MaintenanceWindow;
    use chrono::TimeZone;

    fn ts(d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, d, h, min, 0).unwrap()
    }

    // Mon + Tue 08-17, 2026-02-09 is a Monday.
    fn center() -> WorkCenter {
        WorkCenter::new("wc-1").with_shift(1, 8, 17).with_shift(2, 8, 17)
    }

    fn config() -> ReflowConfig {
        ReflowConfig::default()
    }

    #[test]
    fn test_start_inside_shift_is_returned_unchanged() {
        let t = find_next_available_start(ts(9, 10, 0), &center(), &[], &config());
        assert_eq!(t, ts(9, 10, 0));
    }

    #[test]
    fn test_start_before_shift_snaps_to_shift_start() {
        let t = find_next_available_start(ts(9, 6, 0), &center(), &[], &config());
        assert_eq!(t, ts(9, 8, 0));
    }

    #[test]
    fn test_start_after_shift_jumps_to_next_day() {
        let t = find_next_available_start(ts(9, 17, 0), &center(), &[], &config());
        assert_eq!(t, ts(10, 8, 0));
    }

    #[test]
    fn test_start_on_shiftless_day_advances() {
        // Sunday 2026-02-08 → Monday 08:00.
        let t = find_next_available_start(ts(8, 12, 0), &center(), &[], &config());
        assert_eq!(t, ts(9, 8, 0));
    }

    #[test]
    fn test_start_skips_maintenance_window() {
        let wc = center().with_maintenance(MaintenanceWindow::new(ts(9, 8, 0), ts(9, 9, 0)));
        let t = find_next_available_start(ts(9, 8, 0), &wc, &[], &config());
        assert_eq!(t, ts(9, 9, 0));
    }

    #[test]
    fn test_start_skips_window_then_fixed_order() {
        let wc = center().with_maintenance(MaintenanceWindow::new(ts(9, 8, 0), ts(9, 9, 0)));
        let fixed = WorkOrder::new("m-1", "wc-1")
            .with_schedule(ts(9, 9, 0), ts(9, 10, 0))
            .as_maintenance();
        let t = find_next_available_start(ts(9, 8, 0), &wc, &[fixed], &config());
        assert_eq!(t, ts(9, 10, 0));
    }

    #[test]
    fn test_start_ignores_other_centers_fixed_orders() {
        let fixed = WorkOrder::new("m-1", "wc-2")
            .with_schedule(ts(9, 8, 0), ts(9, 10, 0))
            .as_maintenance();
        let t = find_next_available_start(ts(9, 8, 0), &center(), &[fixed], &config());
        assert_eq!(t, ts(9, 8, 0));
    }

    #[test]
    fn test_start_with_multiple_shifts_per_day() {
        let wc = WorkCenter::new("wc-1").with_shift(1, 8, 12).with_shift(1, 13, 17);
        let t = find_next_available_start(ts(9, 12, 30), &wc, &[], &config());
        assert_eq!(t, ts(9, 13, 0));
    }

    #[test]
    fn test_start_without_any_shift_hits_watchdog() {
        let wc = WorkCenter::new("wc-1");
        let cfg = ReflowConfig {
            max_cursor_hops: 50,
            ..ReflowConfig::default()
        };
        let t = find_next_available_start(ts(9, 8, 0), &wc, &[], &cfg);
        assert!(t >= ts(9, 8, 0));
    }

    #[test]
    fn test_end_within_one_shift() {
        let t = find_end_date(ts(9, 8, 0), 60, &center(), &[], &config());
        assert_eq!(t, ts(9, 9, 0));
    }

    #[test]
    fn test_end_exactly_at_shift_end() {
        let t = find_end_date(ts(9, 16, 0), 60, &center(), &[], &config());
        assert_eq!(t, ts(9, 17, 0));
    }

    #[test]
    fn test_end_rolls_over_to_next_day() {
        // 90 minutes from Mon 16:00: 60 on Monday, 30 on Tuesday.
        let t = find_end_date(ts(9, 16, 0), 90, &center(), &[], &config());
        assert_eq!(t, ts(10, 8, 30));
    }

    #[test]
    fn test_end_jumps_maintenance_window() {
        let wc = center().with_maintenance(MaintenanceWindow::new(ts(9, 9, 0), ts(9, 10, 0)));
        // 120 minutes from 08:00: one hour before the window, one after.
        let t = find_end_date(ts(9, 8, 0), 120, &wc, &[], &config());
        assert_eq!(t, ts(9, 11, 0));
    }

    #[test]
    fn test_end_jumps_fixed_order() {
        let fixed = WorkOrder::new("m-1", "wc-1")
            .with_schedule(ts(9, 9, 0), ts(9, 10, 0))
            .as_maintenance();
        let t = find_end_date(ts(9, 8, 0), 120, &center(), &[fixed], &config());
        assert_eq!(t, ts(9, 11, 0));
    }

    #[test]
    fn test_end_stops_before_obstacle_when_duration_fits() {
        let wc = center().with_maintenance(MaintenanceWindow::new(ts(9, 9, 0), ts(9, 10, 0)));
        let t = find_end_date(ts(9, 8, 0), 60, &wc, &[], &config());
        assert_eq!(t, ts(9, 9, 0));
    }

    #[test]
    fn test_end_with_multiple_shifts_per_day() {
        let wc = WorkCenter::new("wc-1").with_shift(1, 8, 12).with_shift(1, 13, 17);
        // 300 minutes from 08:00: 240 in the morning, 60 after lunch.
        let t = find_end_date(ts(9, 8, 0), 300, &wc, &[], &config());
        assert_eq!(t, ts(9, 14, 0));
    }

    #[test]
    fn test_zero_duration_returns_start() {
        let t = find_end_date(ts(9, 8, 0), 0, &center(), &[], &config());
        assert_eq!(t, ts(9, 8, 0));
    }

    #[test]
    fn test_cursors_are_monotone() {
        let wc = center().with_maintenance(MaintenanceWindow::new(ts(9, 8, 0), ts(9, 12, 0)));
        for hour in [0u32, 6, 8, 11, 14, 20] {
            let from = ts(9, hour, 0);
            let start = find_next_available_start(from, &wc, &[], &config());
            assert!(start >= from);
            let end = find_end_date(start, 45, &wc, &[], &config());
            assert!(end >= start);
        }
    }
}
