//! On-demand guarded reachability over a possibly-cyclic graph.
//!
//! These are the single-pair and single-source primitives behind `Affects`
//! and existence-only `Next*` questions: a depth-first search with three
//! predicates — one admitting the start node, one recognizing end nodes,
//! and one deciding whether the walk may continue *through* a node. Paths
//! have length >= 1; the start node is never subject to the intermediate
//! predicate, and a node that fails it can still be accepted as an end
//! node (the end check happens first).

use ahash::AHashSet;

use crate::relation::ManyToMany;

/// Does any guarded path of length >= 1 lead from `start` to a node
/// satisfying `end_ok`? Exits on the first witness.
pub fn has_guarded_path(
    start: &str,
    adj: &ManyToMany<String, String>,
    start_ok: impl Fn(&str) -> bool,
    end_ok: impl Fn(&str) -> bool,
    mid_ok: impl Fn(&str) -> bool,
) -> bool {
    if !start_ok(start) {
        return false;
    }

    let start_key = start.to_string();
    let mut visited: AHashSet<&String> = AHashSet::new();
    let mut stack: Vec<&String> = adj.values_of(&start_key).collect();

    while let Some(current) = stack.pop() {
        if end_ok(current) {
            return true;
        }
        if !visited.insert(current) || !mid_ok(current) {
            continue;
        }
        stack.extend(adj.values_of(current));
    }

    false
}

/// All nodes satisfying `end_ok` reachable from `start` via a guarded path
/// of length >= 1.
pub fn guarded_reachable_from(
    start: &str,
    adj: &ManyToMany<String, String>,
    start_ok: impl Fn(&str) -> bool,
    end_ok: impl Fn(&str) -> bool,
    mid_ok: impl Fn(&str) -> bool,
) -> AHashSet<String> {
    let mut result = AHashSet::new();
    if !start_ok(start) {
        return result;
    }

    let start_key = start.to_string();
    let mut visited: AHashSet<&String> = AHashSet::new();
    let mut stack: Vec<&String> = adj.values_of(&start_key).collect();

    while let Some(current) = stack.pop() {
        if end_ok(current) {
            result.insert(current.clone());
        }
        if !visited.insert(current) || !mid_ok(current) {
            continue;
        }
        stack.extend(adj.values_of(current));
    }

    result
}
