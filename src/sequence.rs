//! Processing-order linearization for one work center.
//!
//! Produces the total order in which the reflow engine visits a
//! center's production orders: dependency clusters are emitted
//! atomically in topological order, interleaved with independent
//! orders at their original chronological positions. This keeps
//! unrelated orders close to where they were while guaranteeing that
//! every parent is processed before its children.
//!
//! Maintenance orders are not sequenced; the engine routes around them
//! as obstacles.

use std::collections::HashMap;

use crate::models::WorkOrder;

/// Returns indices into `orders` in processing order.
///
/// `orders` is one work center's production orders. Dependency ids
/// that do not resolve within the slice are ignored.
///
/// # Algorithm
/// 1. Connected components over the undirected dependency graph.
/// 2. Kahn topological sort within each component, candidates taken in
///    original-chronology order (deterministic output). A cyclic
///    remainder (reported as fatal upstream) is appended chronologically.
/// 3. Stable chronological order over all orders (start, input index).
/// 4. Interleave: at each unvisited chronological position, emit the
///    whole component, or the single independent order.
pub fn processing_order(orders: &[WorkOrder]) -> Vec<usize> {
    let n = orders.len();
    if n <= 1 {
        return (0..n).collect();
    }

    let index_of: HashMap<&str, usize> = orders
        .iter()
        .enumerate()
        .map(|(i, o)| (o.id.as_str(), i))
        .collect();

    // Directed edges toward parents, restricted to this slice.
    let parents: Vec<Vec<usize>> = orders
        .iter()
        .map(|o| {
            o.depends_on
                .iter()
                .filter_map(|id| index_of.get(id.as_str()).copied())
                .collect()
        })
        .collect();

    // Undirected adjacency for clustering.
    let mut adjacent: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (child, ps) in parents.iter().enumerate() {
        for &parent in ps {
            adjacent[child].push(parent);
            adjacent[parent].push(child);
        }
    }

    let mut chronological: Vec<usize> = (0..n).collect();
    chronological.sort_by_key(|&i| (orders[i].start, i));

    // Component labelling, visiting in chronological order.
    let mut component = vec![usize::MAX; n];
    let mut components: Vec<Vec<usize>> = Vec::new();
    for &root in &chronological {
        if component[root] != usize::MAX {
            continue;
        }
        let label = components.len();
        let mut members = Vec::new();
        let mut stack = vec![root];
        component[root] = label;
        while let Some(node) = stack.pop() {
            members.push(node);
            for &next in &adjacent[node] {
                if component[next] == usize::MAX {
                    component[next] = label;
                    stack.push(next);
                }
            }
        }
        // Keep members chronologically ordered for the topological pass.
        members.sort_by_key(|&i| (orders[i].start, i));
        components.push(members);
    }

    let mut result = Vec::with_capacity(n);
    let mut visited = vec![false; n];
    for &idx in &chronological {
        if visited[idx] {
            continue;
        }
        let members = &components[component[idx]];
        if members.len() == 1 && adjacent[idx].is_empty() {
            visited[idx] = true;
            result.push(idx);
        } else {
            for member in topological(members, &parents) {
                visited[member] = true;
                result.push(member);
            }
        }
    }
    result
}

/// Kahn topological sort of one component.
///
/// `members` is chronologically ordered; the earliest parentless
/// member is taken each round. A non-empty remainder with no free
/// member means a cycle; it is appended as-is.
fn topological(members: &[usize], parents: &[Vec<usize>]) -> Vec<usize> {
    let mut remaining: Vec<usize> = members.to_vec();
    let mut result = Vec::with_capacity(members.len());

    while !remaining.is_empty() {
        let free = remaining
            .iter()
            .position(|&m| parents[m].iter().all(|p| !remaining.contains(p)));
        match free {
            Some(pos) => result.push(remaining.remove(pos)),
            None => {
                result.extend(remaining.drain(..));
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn ts(h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 9, h, min, 0).unwrap()
    }

    fn wo(id: &str, start_h: u32) -> WorkOrder {
        WorkOrder::new(id, "wc-1")
            .with_schedule(ts(start_h, 0), ts(start_h + 1, 0))
            .with_duration(60)
    }

    fn ids(orders: &[WorkOrder], sequence: &[usize]) -> Vec<String> {
        sequence.iter().map(|&i| orders[i].id.clone()).collect()
    }

    #[test]
    fn test_independent_orders_stay_chronological() {
        let orders = vec![wo("b", 10), wo("a", 8), wo("c", 12)];
        let sequence = processing_order(&orders);
        assert_eq!(ids(&orders, &sequence), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_chronological_tie_broken_by_input_index() {
        let orders = vec![wo("first", 8), wo("second", 8)];
        let sequence = processing_order(&orders);
        assert_eq!(ids(&orders, &sequence), vec!["first", "second"]);
    }

    #[test]
    fn test_parent_precedes_child() {
        // Child is chronologically first but must follow its parent.
        let orders = vec![wo("child", 8).with_dependency("parent"), wo("parent", 10)];
        let sequence = processing_order(&orders);
        assert_eq!(ids(&orders, &sequence), vec!["parent", "child"]);
    }

    #[test]
    fn test_group_emitted_atomically() {
        // Independent order at 09:00 must not split the 08:00/10:00 cluster.
        let orders = vec![
            wo("child", 8).with_dependency("parent"),
            wo("lone", 9),
            wo("parent", 10),
        ];
        let sequence = processing_order(&orders);
        assert_eq!(ids(&orders, &sequence), vec!["parent", "child", "lone"]);
    }

    #[test]
    fn test_two_clusters_interleaved_chronologically() {
        let orders = vec![
            wo("a1", 8),
            wo("a2", 9).with_dependency("a1"),
            wo("b1", 10),
            wo("b2", 11).with_dependency("b1"),
        ];
        let sequence = processing_order(&orders);
        assert_eq!(ids(&orders, &sequence), vec!["a1", "a2", "b1", "b2"]);
    }

    #[test]
    fn test_multi_parent_convergence() {
        let orders = vec![
            wo("c", 8).with_dependency("a").with_dependency("b"),
            wo("a", 9),
            wo("b", 10),
        ];
        let sequence = processing_order(&orders);
        let order = ids(&orders, &sequence);
        let pos = |id: &str| order.iter().position(|x| x == id).unwrap();
        assert!(pos("a") < pos("c"));
        assert!(pos("b") < pos("c"));
    }

    #[test]
    fn test_unresolvable_dependency_is_independent() {
        let orders = vec![wo("a", 9).with_dependency("elsewhere"), wo("b", 8)];
        let sequence = processing_order(&orders);
        assert_eq!(ids(&orders, &sequence), vec!["b", "a"]);
    }

    #[test]
    fn test_cyclic_group_falls_back_to_chronology() {
        // Fatal upstream; the linearization must still terminate.
        let orders = vec![
            wo("a", 8).with_dependency("b"),
            wo("b", 9).with_dependency("a"),
        ];
        let sequence = processing_order(&orders);
        assert_eq!(sequence.len(), 2);
        assert_eq!(ids(&orders, &sequence), vec!["a", "b"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(processing_order(&[]).is_empty());
    }
}
