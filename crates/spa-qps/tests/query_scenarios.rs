//! End-to-end queries over one fully populated program.
//!
//! procedure Main {
//! 1:   flag = 0;
//! 2:   call Compute;
//! 3:   print flag; }
//! procedure Compute {
//! 4:   sum = 0;
//! 5:   i = 1;
//! 6:   while (i < n) {
//! 7:     sum = sum + i;
//! 8:     i = i + 1; }
//! 9:   if (sum > 100) then {
//! 10:    flag = 1; }
//!      else {
//! 11:    flag = 0; }
//! 12:  call Log; }
//! procedure Log {
//! 13:  print sum; }

use spa_pkb::{Pkb, PkbBuilder, StatementType};
use spa_qps::model::{
    Attr, AttrRef, Clause, EntArg, ExprSpec, Pattern, Query, Relationship, Selection, StmtArg,
    Synonym, SynonymKind, WithRef,
};
use spa_qps::QueryEvaluator;

fn program() -> Pkb {
    let mut b = PkbBuilder::new();

    for p in ["Main", "Compute", "Log"] {
        b.add_procedure(p);
    }
    for v in ["flag", "sum", "i", "n"] {
        b.add_variable(v);
    }
    for c in ["0", "1", "100"] {
        b.add_constant(c);
    }

    let statements = [
        ("1", StatementType::Assign),
        ("2", StatementType::Call),
        ("3", StatementType::Print),
        ("4", StatementType::Assign),
        ("5", StatementType::Assign),
        ("6", StatementType::While),
        ("7", StatementType::Assign),
        ("8", StatementType::Assign),
        ("9", StatementType::If),
        ("10", StatementType::Assign),
        ("11", StatementType::Assign),
        ("12", StatementType::Call),
        ("13", StatementType::Print),
    ];
    for (n, kind) in statements {
        b.add_statement(n, kind);
    }
    for n in 1..=3 {
        b.add_statement_in_procedure("Main", n.to_string());
    }
    for n in 4..=12 {
        b.add_statement_in_procedure("Compute", n.to_string());
    }
    b.add_statement_in_procedure("Log", "13");

    b.add_follows("1", "2");
    b.add_follows("2", "3");
    b.add_follows("4", "5");
    b.add_follows("5", "6");
    b.add_follows("6", "9");
    b.add_follows("7", "8");
    b.add_follows("9", "12");

    b.add_parent("6", "7");
    b.add_parent("6", "8");
    b.add_parent("9", "10");
    b.add_parent("9", "11");

    b.add_calls("Main", "Compute");
    b.add_calls("Compute", "Log");
    b.add_called_procedure("2", "Compute");
    b.add_called_procedure("12", "Log");

    // Control flow, one graph per procedure.
    for (from, to) in [
        ("1", "2"),
        ("2", "3"),
        ("4", "5"),
        ("5", "6"),
        ("6", "7"),
        ("7", "8"),
        ("8", "6"),
        ("6", "9"),
        ("9", "10"),
        ("9", "11"),
        ("10", "12"),
        ("11", "12"),
    ] {
        b.add_next(from, to);
    }

    // Modifies, with container and call-site aggregation already applied.
    for (s, v) in [
        ("1", "flag"),
        ("2", "sum"),
        ("2", "i"),
        ("2", "flag"),
        ("4", "sum"),
        ("5", "i"),
        ("6", "sum"),
        ("6", "i"),
        ("7", "sum"),
        ("8", "i"),
        ("9", "flag"),
        ("10", "flag"),
        ("11", "flag"),
    ] {
        b.add_statement_modifies(s, v);
    }
    for (p, v) in [
        ("Main", "flag"),
        ("Main", "sum"),
        ("Main", "i"),
        ("Compute", "sum"),
        ("Compute", "i"),
        ("Compute", "flag"),
    ] {
        b.add_procedure_modifies(p, v);
    }

    // Uses, aggregated the same way.
    for (s, v) in [
        ("2", "i"),
        ("2", "n"),
        ("2", "sum"),
        ("3", "flag"),
        ("6", "i"),
        ("6", "n"),
        ("6", "sum"),
        ("7", "sum"),
        ("7", "i"),
        ("8", "i"),
        ("9", "sum"),
        ("12", "sum"),
        ("13", "sum"),
    ] {
        b.add_statement_uses(s, v);
    }
    for (p, v) in [
        ("Main", "i"),
        ("Main", "n"),
        ("Main", "sum"),
        ("Main", "flag"),
        ("Compute", "i"),
        ("Compute", "n"),
        ("Compute", "sum"),
        ("Log", "sum"),
    ] {
        b.add_procedure_uses(p, v);
    }

    b.add_assignment("1", "flag", "0");
    b.add_assignment("4", "sum", "0");
    b.add_assignment("5", "i", "1");
    b.add_assignment("7", "sum", "sum i +");
    b.add_assignment("8", "i", "i 1 +");
    b.add_assignment("10", "flag", "1");
    b.add_assignment("11", "flag", "0");

    b.add_while_var("6", "i");
    b.add_while_var("6", "n");
    b.add_if_var("9", "sum");

    b.finalize().expect("acyclic call graph")
}

fn syn(kind: SynonymKind, name: &str) -> Synonym {
    Synonym::new(kind, name)
}

fn run(pkb: &Pkb, selection: Selection, clauses: Vec<Clause>) -> Vec<String> {
    QueryEvaluator::new(pkb).evaluate(&Query::new(selection, clauses))
}

#[test]
fn transitive_call_graph() {
    let pkb = program();
    let p = syn(SynonymKind::Procedure, "p");
    let results = run(
        &pkb,
        Selection::Single(p.clone()),
        vec![Clause::such_that(Relationship::CallsT(
            EntArg::Name("Main".into()),
            EntArg::Synonym(p),
        ))],
    );
    assert_eq!(results, vec!["Compute", "Log"]);
}

#[test]
fn next_star_loops_back_into_the_while() {
    let pkb = program();
    let s = syn(SynonymKind::Stmt, "s");
    let results = run(
        &pkb,
        Selection::Single(s.clone()),
        vec![Clause::such_that(Relationship::NextT(
            StmtArg::Integer(6),
            StmtArg::Synonym(s),
        ))],
    );
    assert_eq!(results, vec!["10", "11", "12", "6", "7", "8", "9"]);
}

#[test]
fn affects_chains_through_the_loop() {
    let pkb = program();
    let a = syn(SynonymKind::Assign, "a");
    let results = run(
        &pkb,
        Selection::Single(a.clone()),
        vec![Clause::such_that(Relationship::Affects(
            StmtArg::Synonym(a),
            StmtArg::Integer(7),
        ))],
    );
    // sum from 4 and 7 itself, i from 5 and 8.
    assert_eq!(results, vec!["4", "5", "7", "8"]);
}

#[test]
fn affects_does_not_cross_procedures() {
    let pkb = program();
    // Statement 13 prints sum but lives in Log; nothing affects a print,
    // and nothing in Compute reaches Log through control flow.
    let a = syn(SynonymKind::Assign, "a");
    let results = run(
        &pkb,
        Selection::Single(a.clone()),
        vec![Clause::such_that(Relationship::Affects(
            StmtArg::Synonym(a),
            StmtArg::Integer(13),
        ))],
    );
    assert!(results.is_empty());
}

#[test]
fn negated_affects_selects_the_complement() {
    let pkb = program();
    let a = syn(SynonymKind::Assign, "a");
    let results = run(
        &pkb,
        Selection::Single(a.clone()),
        vec![Clause::such_that(Relationship::Affects(
            StmtArg::Synonym(a),
            StmtArg::Integer(7),
        ))
        .negated()],
    );
    assert_eq!(results, vec!["1", "10", "11"]);
}

#[test]
fn pattern_and_relationship_join_on_the_shared_synonym() {
    let pkb = program();
    let a = syn(SynonymKind::Assign, "a");
    // Assignments to flag that sit inside the if.
    let results = run(
        &pkb,
        Selection::Single(a.clone()),
        vec![
            Clause::pattern(Pattern::Assign {
                synonym: a.clone(),
                lhs: EntArg::Name("flag".into()),
                rhs: ExprSpec::Wildcard,
            }),
            Clause::such_that(Relationship::ParentT(
                StmtArg::Integer(9),
                StmtArg::Synonym(a),
            )),
        ],
    );
    assert_eq!(results, vec!["10", "11"]);
}

#[test]
fn partial_expression_match() {
    let pkb = program();
    let a = syn(SynonymKind::Assign, "a");
    let results = run(
        &pkb,
        Selection::Single(a.clone()),
        vec![Clause::pattern(Pattern::Assign {
            synonym: a,
            lhs: EntArg::Wildcard,
            rhs: ExprSpec::Partial("i".into()),
        })],
    );
    assert_eq!(results, vec!["7", "8"]);
}

#[test]
fn with_resolves_call_sites_by_callee_name() {
    let pkb = program();
    let c = syn(SynonymKind::Call, "c");
    let results = run(
        &pkb,
        Selection::Single(c.clone()),
        vec![Clause::with(
            WithRef::Attr(AttrRef {
                synonym: c.clone(),
                attr: Attr::ProcName,
            }),
            WithRef::Literal("Log".into()),
        )],
    );
    assert_eq!(results, vec!["12"]);
}

#[test]
fn with_joins_two_attributes() {
    let pkb = program();
    // print statements printing a variable some read... none here, but
    // print.varName = variable.varName binds the printed variables.
    let p = syn(SynonymKind::Print, "pr");
    let v = syn(SynonymKind::Variable, "v");
    let results = run(
        &pkb,
        Selection::Single(v.clone()),
        vec![Clause::with(
            WithRef::Attr(AttrRef {
                synonym: p,
                attr: Attr::VarName,
            }),
            WithRef::Attr(AttrRef {
                synonym: v,
                attr: Attr::VarName,
            }),
        )],
    );
    assert_eq!(results, vec!["flag", "sum"]);
}

#[test]
fn disjoint_true_clause_leaves_the_selection_untouched() {
    let pkb = program();
    let v = syn(SynonymKind::Variable, "v");
    let results = run(
        &pkb,
        Selection::Single(v.clone()),
        vec![Clause::such_that(Relationship::Calls(
            EntArg::Name("Main".into()),
            EntArg::Name("Compute".into()),
        ))],
    );
    assert_eq!(results, vec!["flag", "i", "n", "sum"]);
}

#[test]
fn disjoint_false_clause_empties_the_result() {
    let pkb = program();
    let v = syn(SynonymKind::Variable, "v");
    let results = run(
        &pkb,
        Selection::Single(v),
        vec![Clause::such_that(Relationship::Calls(
            EntArg::Name("Log".into()),
            EntArg::Name("Main".into()),
        ))],
    );
    assert!(results.is_empty());
}

#[test]
fn pair_selection_over_the_loop_body() {
    let pkb = program();
    let w = syn(SynonymKind::While, "w");
    let a = syn(SynonymKind::Assign, "a");
    let results = run(
        &pkb,
        Selection::Pair(w.clone(), a.clone()),
        vec![Clause::such_that(Relationship::Parent(
            StmtArg::Synonym(w),
            StmtArg::Synonym(a),
        ))],
    );
    assert_eq!(results, vec!["6 7", "6 8"]);
}

#[test]
fn modifies_across_the_call_boundary() {
    let pkb = program();
    // The call at 2 modifies what Compute modifies.
    let v = syn(SynonymKind::Variable, "v");
    let results = run(
        &pkb,
        Selection::Single(v.clone()),
        vec![Clause::such_that(Relationship::ModifiesS(
            StmtArg::Integer(2),
            EntArg::Synonym(v.clone()),
        ))],
    );
    assert_eq!(results, vec!["flag", "i", "sum"]);

    let results = run(
        &pkb,
        Selection::Single(v.clone()),
        vec![Clause::such_that(Relationship::ModifiesP(
            EntArg::Name("Log".into()),
            EntArg::Synonym(v),
        ))],
    );
    assert!(results.is_empty());
}

#[test]
fn clauses_with_disjoint_bindings_empty_the_result_in_either_order() {
    let pkb = program();
    let a = syn(SynonymKind::Assign, "a");
    // The loop body and the if branches never overlap, so any shared
    // assignment synonym has no consistent binding.
    let inside_loop = Clause::such_that(Relationship::Parent(
        StmtArg::Integer(6),
        StmtArg::Synonym(a.clone()),
    ));
    let inside_if = Clause::such_that(Relationship::Parent(
        StmtArg::Integer(9),
        StmtArg::Synonym(a.clone()),
    ));

    let results = run(
        &pkb,
        Selection::Single(a.clone()),
        vec![inside_loop.clone(), inside_if.clone()],
    );
    assert!(results.is_empty());

    let results = run(&pkb, Selection::Single(a), vec![inside_if, inside_loop]);
    assert!(results.is_empty());
}

#[test]
fn multi_clause_query_with_negation_and_pattern() {
    let pkb = program();
    let a = syn(SynonymKind::Assign, "a");
    let v = syn(SynonymKind::Variable, "v");
    // Variables written by loop-body assignments that are not control
    // variables of the enclosing while.
    let results = run(
        &pkb,
        Selection::Single(v.clone()),
        vec![
            Clause::pattern(Pattern::Assign {
                synonym: a.clone(),
                lhs: EntArg::Synonym(v.clone()),
                rhs: ExprSpec::Wildcard,
            }),
            Clause::such_that(Relationship::Parent(
                StmtArg::Integer(6),
                StmtArg::Synonym(a),
            )),
            Clause::pattern(Pattern::While {
                synonym: syn(SynonymKind::While, "w"),
                lhs: EntArg::Synonym(v.clone()),
            })
            .negated(),
        ],
    );
    assert_eq!(results, vec!["sum"]);
}
