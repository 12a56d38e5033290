//! Schedule constraint checker.
//!
//! Classifies an arbitrary schedule into zero or more typed
//! [`Violation`]s. Detects:
//! - Production orders intersecting maintenance windows
//! - Displaced fixed maintenance orders (against a baseline)
//! - Overlapping orders on one work center
//! - Shift adherence (span/duration mismatch, invalid start, invalid end)
//! - Orders starting before a dependency completes
//! - Fatal states: overlapping fixed orders, dependency cycles
//!
//! The checker never fails; it reports. Output ordering follows the
//! input iteration order within each pass, so identical inputs yield
//! identical violation lists.
//!
//! # Reference
//! Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.4 (DFS cycle detection)

use std::collections::{HashMap, HashSet};

use crate::calendar::{is_time_in_shift, working_minutes, ShiftBoundary};
use crate::models::{Violation, WorkCenter, WorkOrder};

/// Validates a schedule against all constraints.
///
/// When `originals` is supplied, fixed maintenance orders are also
/// compared against their original starts and any displacement is
/// reported as `FIXED_ORDER_MOVED`.
///
/// Pure and total: invalid references (unknown work centers, unknown
/// dependency ids) impose no constraint and produce no violation.
pub fn verify(
    orders: &[WorkOrder],
    centers: &[WorkCenter],
    originals: Option<&[WorkOrder]>,
) -> Vec<Violation> {
    let mut violations = Vec::new();
    let center_by_id: HashMap<&str, &WorkCenter> =
        centers.iter().map(|c| (c.id.as_str(), c)).collect();
    let order_by_id: HashMap<&str, &WorkOrder> =
        orders.iter().map(|o| (o.id.as_str(), o)).collect();

    check_maintenance_collisions(orders, &center_by_id, &mut violations);
    if let Some(originals) = originals {
        check_fixed_order_displacement(orders, originals, &mut violations);
    }
    check_overlaps(orders, &mut violations);
    check_shift_adherence(orders, &center_by_id, &mut violations);
    check_dependencies(orders, &order_by_id, &mut violations);
    check_fixed_overlaps(orders, &mut violations);
    check_cycles(orders, &mut violations);

    violations
}

/// Pass 1: production orders intersecting maintenance windows.
/// At most one violation per order.
fn check_maintenance_collisions(
    orders: &[WorkOrder],
    center_by_id: &HashMap<&str, &WorkCenter>,
    violations: &mut Vec<Violation>,
) {
    for order in orders.iter().filter(|o| !o.is_maintenance) {
        let Some(center) = center_by_id.get(order.work_center_id.as_str()) else {
            continue;
        };
        if let Some(window) = center
            .maintenance_windows
            .iter()
            .find(|w| w.intersects(order.start, order.end))
        {
            violations.push(Violation::maintenance_collision(
                &order.id,
                format!(
                    "Order {} intersects maintenance window {} - {} on work center {}",
                    order.number, window.start, window.end, center.id
                ),
            ));
        }
    }
}

/// Pass 2: fixed maintenance orders whose start differs from the baseline.
fn check_fixed_order_displacement(
    orders: &[WorkOrder],
    originals: &[WorkOrder],
    violations: &mut Vec<Violation>,
) {
    let original_by_id: HashMap<&str, &WorkOrder> =
        originals.iter().map(|o| (o.id.as_str(), o)).collect();

    for order in orders.iter().filter(|o| o.is_maintenance) {
        if let Some(original) = original_by_id.get(order.id.as_str()) {
            if original.start != order.start {
                violations.push(Violation::fixed_order_moved(
                    &order.id,
                    format!(
                        "Fixed order {} was moved from {} to {}",
                        order.number, original.start, order.start
                    ),
                ));
            }
        }
    }
}

/// Groups order indices by work center id, groups in first-appearance order.
fn group_by_center(orders: &[WorkOrder]) -> Vec<Vec<usize>> {
    let mut group_of: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<Vec<usize>> = Vec::new();
    for (idx, order) in orders.iter().enumerate() {
        let slot = *group_of
            .entry(order.work_center_id.as_str())
            .or_insert_with(|| {
                groups.push(Vec::new());
                groups.len() - 1
            });
        groups[slot].push(idx);
    }
    groups
}

/// Pass 3: overlapping orders on one work center. The violation lands
/// on the later order of each adjacent pair.
fn check_overlaps(orders: &[WorkOrder], violations: &mut Vec<Violation>) {
    for mut group in group_by_center(orders) {
        group.sort_by_key(|&i| (orders[i].start, i));
        for pair in group.windows(2) {
            let current = &orders[pair[0]];
            let next = &orders[pair[1]];
            if next.start < current.end {
                violations.push(Violation::overlap(
                    &next.id,
                    format!(
                        "Order {} starts at {} before order {} ends at {}",
                        next.number, next.start, current.number, current.end
                    ),
                ));
            }
        }
    }
}

/// Pass 4: shift adherence for production orders on resolvable centers.
/// Emits up to three violations per order with distinguishable messages.
fn check_shift_adherence(
    orders: &[WorkOrder],
    center_by_id: &HashMap<&str, &WorkCenter>,
    violations: &mut Vec<Violation>,
) {
    for order in orders.iter().filter(|o| !o.is_maintenance) {
        let Some(center) = center_by_id.get(order.work_center_id.as_str()) else {
            continue;
        };

        let minutes = working_minutes(order.start, order.end, center);
        if (minutes - order.duration_minutes).abs() > 1 {
            violations.push(Violation::outside_shift(
                &order.id,
                format!(
                    "Total work time mismatch: order {} spans {} working minutes but requires {}",
                    order.number, minutes, order.duration_minutes
                ),
            ));
        }
        if !is_time_in_shift(order.start, &center.shifts, ShiftBoundary::Start) {
            violations.push(Violation::outside_shift(
                &order.id,
                format!("Invalid Start: order {} starts outside shifts at {}", order.number, order.start),
            ));
        }
        if !is_time_in_shift(order.end, &center.shifts, ShiftBoundary::End) {
            violations.push(Violation::outside_shift(
                &order.id,
                format!("Invalid End: order {} ends outside shifts at {}", order.number, order.end),
            ));
        }
    }
}

/// Pass 5: orders starting before a resolvable dependency completes.
fn check_dependencies(
    orders: &[WorkOrder],
    order_by_id: &HashMap<&str, &WorkOrder>,
    violations: &mut Vec<Violation>,
) {
    for order in orders {
        for parent_id in &order.depends_on {
            let Some(parent) = order_by_id.get(parent_id.as_str()) else {
                continue;
            };
            if order.start < parent.end {
                violations.push(Violation::dependency_error(
                    &order.id,
                    format!(
                        "Order {} starts at {} before its dependency {} ends at {}",
                        order.number, order.start, parent.number, parent.end
                    ),
                ));
            }
        }
    }
}

/// Pass 6: overlapping fixed maintenance orders. Unrepairable.
fn check_fixed_overlaps(orders: &[WorkOrder], violations: &mut Vec<Violation>) {
    for group in group_by_center(orders) {
        let mut fixed: Vec<usize> = group
            .into_iter()
            .filter(|&i| orders[i].is_maintenance)
            .collect();
        fixed.sort_by_key(|&i| (orders[i].start, i));
        for pair in fixed.windows(2) {
            let current = &orders[pair[0]];
            let next = &orders[pair[1]];
            if next.start < current.end {
                violations.push(
                    Violation::maintenance_collision(
                        &next.id,
                        format!(
                            "Fixed orders {} and {} overlap on work center {}",
                            current.number, next.number, next.work_center_id
                        ),
                    )
                    .fatal(),
                );
            }
        }
    }
}

/// Pass 7: dependency cycles. Unrepairable.
///
/// DFS with an explicit recursion stack; every back edge closes a cycle
/// and emits one fatal violation whose message spells out the cycle
/// path. Roots iterate in input order, each order is rooted at most
/// once, and unknown dependency ids are not traversed.
fn check_cycles(orders: &[WorkOrder], violations: &mut Vec<Violation>) {
    let known: HashSet<&str> = orders.iter().map(|o| o.id.as_str()).collect();
    let mut parents: HashMap<&str, Vec<&str>> = HashMap::new();
    for order in orders {
        let edges: Vec<&str> = order
            .depends_on
            .iter()
            .map(String::as_str)
            .filter(|id| known.contains(id))
            .collect();
        parents.insert(order.id.as_str(), edges);
    }

    let mut visited: HashSet<&str> = HashSet::new();
    let mut on_stack: HashSet<&str> = HashSet::new();
    let mut path: Vec<&str> = Vec::new();

    for order in orders {
        if !visited.contains(order.id.as_str()) {
            cycle_dfs(
                order.id.as_str(),
                &parents,
                &mut visited,
                &mut on_stack,
                &mut path,
                violations,
            );
        }
    }
}

fn cycle_dfs<'a>(
    node: &'a str,
    parents: &HashMap<&'a str, Vec<&'a str>>,
    visited: &mut HashSet<&'a str>,
    on_stack: &mut HashSet<&'a str>,
    path: &mut Vec<&'a str>,
    violations: &mut Vec<Violation>,
) {
    visited.insert(node);
    on_stack.insert(node);
    path.push(node);

    if let Some(edges) = parents.get(node) {
        for &parent in edges {
            if on_stack.contains(parent) {
                // Back edge: the cycle runs from the parent's position
                // on the path back to the current node.
                if let Some(pos) = path.iter().position(|&id| id == parent) {
                    let mut cycle: Vec<&str> = path[pos..].to_vec();
                    cycle.push(parent);
                    violations.push(
                        Violation::dependency_error(
                            parent,
                            format!("Circular dependency detected: {}", cycle.join(" -> ")),
                        )
                        .fatal(),
                    );
                }
            } else if !visited.contains(parent) {
                cycle_dfs(parent, parents, visited, on_stack, path, violations);
            }
        }
    }

    on_stack.remove(node);
    path.pop();
}
