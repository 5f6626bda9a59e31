use proptest::prelude::*;
use spa_pkb::closure::{cyclic_closure, numeric_closure};
use spa_pkb::relation::ManyToMany;
use spa_pkb::{PkbBuilder, StatementType};

/// Random edge lists over numeric statement labels, restricted to
/// forward-pointing edges the way `Follows` and `Parent` are.
fn forward_edges() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::vec((1u8..=15, 1u8..=15), 0..40).prop_map(|pairs| {
        pairs
            .into_iter()
            .filter(|(a, b)| a < b)
            .map(|(a, b)| (a.to_string(), b.to_string()))
            .collect()
    })
}

proptest! {
    #[test]
    fn closure_contains_direct_edges_and_is_transitive(edges in forward_edges()) {
        let star = numeric_closure(edges.clone());
        for (a, b) in &edges {
            prop_assert!(star.contains(a, b));
        }
        let pairs: Vec<(String, String)> = star
            .pairs()
            .map(|(a, b)| (a.clone(), b.clone()))
            .collect();
        for (a, b) in &pairs {
            for (c, d) in &pairs {
                if b == c {
                    prop_assert!(star.contains(a, d));
                }
            }
        }
    }

    #[test]
    fn closure_is_idempotent(edges in forward_edges()) {
        let star = numeric_closure(edges);
        let pairs: Vec<(String, String)> = star
            .pairs()
            .map(|(a, b)| (a.clone(), b.clone()))
            .collect();
        let again = numeric_closure(pairs);
        prop_assert_eq!(star.len(), again.len());
        for (a, b) in star.pairs() {
            prop_assert!(again.contains(a, b));
        }
    }

    #[test]
    fn ring_graph_closure_relates_every_ordered_pair(n in 1usize..8) {
        let mut next: ManyToMany<String, String> = ManyToMany::new();
        for i in 0..n {
            next.add((i + 1).to_string(), ((i + 1) % n + 1).to_string());
        }
        let star = cyclic_closure(&next);
        // Every statement on the ring reaches every statement, itself
        // included.
        prop_assert_eq!(star.len(), n * n);
    }

    #[test]
    fn repeating_the_population_pass_changes_nothing(n in 1usize..10) {
        let mut once = PkbBuilder::new();
        let mut twice = PkbBuilder::new();
        for pass in 0..2 {
            for i in 1..=n {
                let stmt = i.to_string();
                twice.add_statement(stmt.clone(), StatementType::Assign);
                twice.add_statement_modifies(stmt.clone(), "x");
                if i < n {
                    twice.add_follows(stmt.clone(), (i + 1).to_string());
                    twice.add_next(stmt.clone(), (i + 1).to_string());
                }
                if pass == 0 {
                    once.add_statement(stmt.clone(), StatementType::Assign);
                    once.add_statement_modifies(stmt.clone(), "x");
                    if i < n {
                        once.add_follows(stmt.clone(), (i + 1).to_string());
                        once.add_next(stmt, (i + 1).to_string());
                    }
                }
            }
        }
        let once = once.finalize().expect("acyclic");
        let twice = twice.finalize().expect("acyclic");
        prop_assert_eq!(once.statements().len(), twice.statements().len());
        prop_assert_eq!(once.follows_star().len(), twice.follows_star().len());
        prop_assert_eq!(once.next_star().len(), twice.next_star().len());
        prop_assert_eq!(once.modifies_s().len(), twice.modifies_s().len());
    }
}

#[test]
fn nested_containers_close_parent_upward() {
    // 1: while { 2: if { 3: assign } }
    let mut b = PkbBuilder::new();
    b.add_statement("1", StatementType::While);
    b.add_statement("2", StatementType::If);
    b.add_statement("3", StatementType::Assign);
    b.add_parent("1", "2");
    b.add_parent("2", "3");
    let pkb = b.finalize().expect("acyclic");

    assert!(pkb.parent_star().contains(&"1".into(), &"3".into()));
    assert!(!pkb.parent().contains(&"1".into(), &"3".into()));
    assert_eq!(pkb.parent_star().len(), 3);
}

#[test]
fn call_chain_closure_crosses_procedures() {
    let mut b = PkbBuilder::new();
    for p in ["a", "b", "c", "d"] {
        b.add_procedure(p);
    }
    b.add_calls("a", "b");
    b.add_calls("b", "c");
    b.add_calls("c", "d");
    let pkb = b.finalize().expect("acyclic");

    assert!(pkb.calls_star().contains(&"a".into(), &"d".into()));
    assert_eq!(pkb.calls_star().len(), 6);
}

#[test]
fn branch_and_loop_next_star() {
    // 1 -> 2 -> 3 -> 2, 2 -> 4: a loop with an exit.
    let mut b = PkbBuilder::new();
    for n in ["1", "2", "3", "4"] {
        b.add_statement(n, StatementType::Assign);
    }
    b.add_next("1", "2");
    b.add_next("2", "3");
    b.add_next("3", "2");
    b.add_next("2", "4");
    let pkb = b.finalize().expect("acyclic call graph");

    let star = pkb.next_star();
    assert!(star.contains(&"2".into(), &"2".into()));
    assert!(star.contains(&"3".into(), &"3".into()));
    assert!(star.contains(&"1".into(), &"4".into()));
    assert!(!star.contains(&"1".into(), &"1".into()));
    assert!(!star.contains(&"4".into(), &"2".into()));
}
