//! Batch transitive-closure derivation.
//!
//! Two algorithm families live here:
//!
//! 1. A single-sweep closure for relations that are acyclic by the language's
//!    well-formedness rules (`Follows`, `Parent`, `Calls`). Edges are sorted
//!    so that targets appear in reverse reachability order; one backward
//!    sweep then unions in everything already known reachable from each
//!    target.
//! 2. A cycle-tolerant closure for the control-flow successor relation
//!    (`Next`), which may contain loops: Tarjan SCC condensation, toposort
//!    of the condensation, the DAG sweep over the condensation, and
//!    expansion back to the member statements (including self-pairs inside
//!    a cycle).

use ahash::AHashMap;
use petgraph::algo::{condensation, tarjan_scc, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use std::cmp::Reverse;
use std::hash::Hash;
use thiserror::Error;
use tracing::debug;

use crate::relation::ManyToMany;

/// Raised when a relation that is contractually acyclic turns out to have a
/// cycle. The upstream semantic validator rejects recursive programs before
/// facts reach the store, so hitting this means a populator bug — but the
/// closure must refuse rather than silently derive wrong facts.
#[derive(Debug, Error)]
pub enum FinalizeError {
    #[error("cycle detected while deriving {relation}*")]
    CycleDetected { relation: &'static str },
}

/// One backward sweep over edges sorted by the rank of their target.
///
/// Correct whenever `rank` is consistent with reachability: every edge
/// `(a, b)` must satisfy `rank(a) < rank(b)`. By the time `(a, b)` is
/// processed, the reachable set of `b` is already complete.
fn closure_from_ranked_edges<K>(
    mut edges: Vec<(K, K)>,
    rank: impl Fn(&K) -> usize,
) -> ManyToMany<K, K>
where
    K: Eq + Hash + Clone,
{
    edges.sort_by_key(|(_, target)| Reverse(rank(target)));

    let mut star: ManyToMany<K, K> = ManyToMany::new();
    for (a, b) in edges {
        let reachable: Vec<K> = star.values_of(&b).cloned().collect();
        star.add(a.clone(), b);
        for c in reachable {
            star.add(a.clone(), c);
        }
    }
    star
}

/// Closure of a relation whose reachability order is the numeric statement
/// order (`Follows`, `Parent`: a statement never follows or contains one
/// with a smaller number in the wrong direction).
pub fn numeric_closure(edges: Vec<(String, String)>) -> ManyToMany<String, String> {
    closure_from_ranked_edges(edges, |stmt| stmt.parse::<usize>().unwrap_or(0))
}

/// Closure of the `Calls` relation.
///
/// The rank is a topological order of the call graph, computed here rather
/// than required from the caller; `order_hint` only controls tie-breaking
/// between procedures with no call-path between them (it decides node
/// insertion order, which petgraph's toposort preserves for independent
/// nodes). Returns an error if the call graph is cyclic.
pub fn ordered_closure(
    edges: Vec<(String, String)>,
    order_hint: Option<&[String]>,
) -> Result<ManyToMany<String, String>, FinalizeError> {
    let mut graph: DiGraph<String, ()> = DiGraph::new();
    let mut node_of: AHashMap<String, NodeIndex> = AHashMap::new();

    let mut intern = |graph: &mut DiGraph<String, ()>, name: &String| -> NodeIndex {
        if let Some(&ix) = node_of.get(name) {
            return ix;
        }
        let ix = graph.add_node(name.clone());
        node_of.insert(name.clone(), ix);
        ix
    };

    if let Some(hint) = order_hint {
        for name in hint {
            intern(&mut graph, name);
        }
    }
    for (caller, callee) in &edges {
        let a = intern(&mut graph, caller);
        let b = intern(&mut graph, callee);
        graph.add_edge(a, b, ());
    }

    let order = toposort(&graph, None).map_err(|_| FinalizeError::CycleDetected {
        relation: "Calls",
    })?;
    let rank: AHashMap<String, usize> = order
        .into_iter()
        .enumerate()
        .map(|(i, ix)| (graph[ix].clone(), i))
        .collect();

    Ok(closure_from_ranked_edges(edges, |proc| {
        rank.get(proc).copied().unwrap_or(0)
    }))
}

/// Closure of the possibly-cyclic `Next` relation.
///
/// Every ordered pair inside a strongly connected component is in `Next*`
/// (self-pairs included: a statement on a loop path reaches itself); a pair
/// across components is in `Next*` iff the source component reaches the
/// target component in the condensation's closure.
pub fn cyclic_closure(next: &ManyToMany<String, String>) -> ManyToMany<String, String> {
    let mut graph: DiGraph<String, ()> = DiGraph::new();
    let mut node_of: AHashMap<&String, NodeIndex> = AHashMap::new();

    for (a, b) in next.pairs() {
        let ia = *node_of
            .entry(a)
            .or_insert_with(|| graph.add_node(a.clone()));
        let ib = *node_of
            .entry(b)
            .or_insert_with(|| graph.add_node(b.clone()));
        graph.add_edge(ia, ib, ());
    }

    let scc_count = tarjan_scc(&graph).len();
    debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        components = scc_count,
        "deriving Next* via SCC condensation"
    );

    // Cyclic components are the ones that shrank (>1 member) plus singletons
    // with a self edge; `condensation(_, true)` drops intra-component edges,
    // so record self edges first.
    let has_self_edge: ahash::AHashSet<String> = next
        .pairs()
        .filter(|(a, b)| a == b)
        .map(|(a, _)| a.clone())
        .collect();

    let condensed = condensation(graph, true);
    let order = toposort(&condensed, None)
        .expect("condensation of a directed graph is acyclic by construction");
    let rank: AHashMap<NodeIndex, usize> =
        order.into_iter().enumerate().map(|(i, ix)| (ix, i)).collect();

    let comp_edges: Vec<(NodeIndex, NodeIndex)> = condensed
        .edge_indices()
        .filter_map(|e| condensed.edge_endpoints(e))
        .filter(|(a, b)| a != b)
        .collect();
    let comp_star = closure_from_ranked_edges(comp_edges, |ix| rank[ix]);

    let mut star: ManyToMany<String, String> = ManyToMany::new();

    for ix in condensed.node_indices() {
        let members = &condensed[ix];
        let cyclic =
            members.len() > 1 || members.iter().any(|m| has_self_edge.contains(m));
        if cyclic {
            for a in members {
                for b in members {
                    star.add(a.clone(), b.clone());
                }
            }
        }
    }

    for (src, dst) in comp_star.pairs() {
        for a in &condensed[*src] {
            for b in &condensed[*dst] {
                star.add(a.clone(), b.clone());
            }
        }
    }

    star
}
