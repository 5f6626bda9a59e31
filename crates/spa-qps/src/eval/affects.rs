//! The `Affects` dataflow relation, computed on demand.
//!
//! `Affects(a, b)` holds when `a` and `b` are assignments, `a` writes a
//! variable `v` that `b` reads, and some control-flow path of length >= 1
//! from `a` to `b` carries the value through: no statement strictly between
//! them may overwrite `v`. Container statements (`if`, `while`) aggregate
//! the modifications of their bodies, so they never count as overwriting on
//! their own. The control-flow graph is per procedure, which keeps every
//! pair inside one procedure without an explicit check.

use ahash::AHashSet;
use spa_pkb::{reach, Pkb, StatementType};

fn is_assign(pkb: &Pkb, stmt: &str) -> bool {
    pkb.is_statement_of_type(stmt, StatementType::Assign)
}

/// The variable an assignment writes, if `stmt` is an assignment.
fn written_var(pkb: &Pkb, stmt: &str) -> Option<String> {
    if !is_assign(pkb, stmt) {
        return None;
    }
    pkb.first_modified_var(stmt).cloned()
}

/// Intermediate-node predicate: the walk may continue through `n` unless
/// `n` itself overwrites `var`. Containers only carry their bodies'
/// modifications, so they never block.
fn survives<'p>(pkb: &'p Pkb, var: &'p str) -> impl Fn(&str) -> bool + 'p {
    move |n: &str| {
        !pkb.modifies_s().contains(&n.to_string(), &var.to_string())
            || pkb.is_statement_of_type(n, StatementType::If)
            || pkb.is_statement_of_type(n, StatementType::While)
    }
}

pub(crate) fn holds(pkb: &Pkb, a: &str, b: &str) -> bool {
    let Some(var) = written_var(pkb, a) else {
        return false;
    };
    if !is_assign(pkb, b) || !pkb.uses_s().contains(&b.to_string(), &var) {
        return false;
    }
    reach::has_guarded_path(a, pkb.next(), |_| true, |n| n == b, survives(pkb, &var))
}

/// All assignments affected by `a`.
pub(crate) fn affected_by(pkb: &Pkb, a: &str) -> AHashSet<String> {
    let Some(var) = written_var(pkb, a) else {
        return AHashSet::new();
    };
    reach::guarded_reachable_from(
        a,
        pkb.next(),
        |_| true,
        |n| is_assign(pkb, n) && pkb.uses_s().contains(&n.to_string(), &var),
        survives(pkb, &var),
    )
}

/// All assignments affecting `b`.
pub(crate) fn affecting(pkb: &Pkb, b: &str) -> AHashSet<String> {
    if !is_assign(pkb, b) {
        return AHashSet::new();
    }
    pkb.statements_of_type(StatementType::Assign)
        .into_iter()
        .filter(|a| holds(pkb, a, b))
        .collect()
}

/// Does `a` affect anything at all? Exits on the first witness.
pub(crate) fn affects_any(pkb: &Pkb, a: &str) -> bool {
    let Some(var) = written_var(pkb, a) else {
        return false;
    };
    reach::has_guarded_path(
        a,
        pkb.next(),
        |_| true,
        |n| is_assign(pkb, n) && pkb.uses_s().contains(&n.to_string(), &var),
        survives(pkb, &var),
    )
}

pub(crate) fn all_pairs(pkb: &Pkb) -> Vec<(String, String)> {
    let mut out = Vec::new();
    for a in pkb.statements_of_type(StatementType::Assign) {
        for b in affected_by(pkb, &a) {
            out.push((a.clone(), b));
        }
    }
    out
}

pub(crate) fn is_inhabited(pkb: &Pkb) -> bool {
    pkb.statements_of_type(StatementType::Assign)
        .iter()
        .any(|a| affects_any(pkb, a))
}
