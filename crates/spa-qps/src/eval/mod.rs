//! Per-clause evaluation.
//!
//! Each clause family (such-that relationship, pattern, with) has one
//! evaluator module; all of them produce an [`OutputTable`] scoped to the
//! synonyms that actually appear as clause arguments. Negation is handled
//! uniformly here: the positive form is evaluated, then complemented
//! against the cross product of the clause synonyms' domains.

mod affects;
mod patterns;
mod relations;
mod with;

use ahash::AHashSet;
use spa_pkb::Pkb;

use crate::model::{
    Clause, ClauseKind, EntArg, Pattern, Relationship, StmtArg, Synonym, WithRef,
};
use crate::table::{join, OutputTable, Table};

/// The fact-store domain a synonym may bind to, per its declared kind.
pub(crate) fn synonym_domain(pkb: &Pkb, synonym: &Synonym) -> AHashSet<String> {
    use crate::model::SynonymKind::*;
    match synonym.kind {
        Procedure => pkb.procedures().clone(),
        Variable => pkb.variables().clone(),
        Constant => pkb.constants().clone(),
        Stmt => pkb.statements(),
        _ => {
            let kind = synonym
                .kind
                .statement_type()
                .expect("non-entity synonym kinds map to a statement type");
            pkb.statements_of_type(kind)
        }
    }
}

pub(crate) fn domain_table(pkb: &Pkb, synonym: &Synonym) -> OutputTable {
    OutputTable::from_domain(synonym, synonym_domain(pkb, synonym))
}

pub(crate) fn evaluate_clause(pkb: &Pkb, clause: &Clause) -> OutputTable {
    let positive = match &clause.kind {
        ClauseKind::SuchThat(rel) => relations::eval_relationship(pkb, rel),
        ClauseKind::Pattern(pattern) => patterns::eval_pattern(pkb, pattern),
        ClauseKind::With(lhs, rhs) => with::eval_with(pkb, lhs, rhs),
    };
    if clause.negated {
        negate(pkb, positive, clause_synonyms(clause))
    } else {
        positive
    }
}

/// The distinct synonyms appearing as arguments of a clause, in argument
/// order.
fn clause_synonyms(clause: &Clause) -> Vec<Synonym> {
    fn push(out: &mut Vec<Synonym>, s: &Synonym) {
        if !out.iter().any(|known| known.name == s.name) {
            out.push(s.clone());
        }
    }
    fn push_stmt(out: &mut Vec<Synonym>, arg: &StmtArg) {
        if let StmtArg::Synonym(s) = arg {
            push(out, s);
        }
    }
    fn push_ent(out: &mut Vec<Synonym>, arg: &EntArg) {
        if let EntArg::Synonym(s) = arg {
            push(out, s);
        }
    }

    let mut out = Vec::new();
    match &clause.kind {
        ClauseKind::SuchThat(rel) => {
            use Relationship::*;
            match rel {
                Follows(a, b) | FollowsT(a, b) | Parent(a, b) | ParentT(a, b) | Next(a, b)
                | NextT(a, b) | Affects(a, b) => {
                    push_stmt(&mut out, a);
                    push_stmt(&mut out, b);
                }
                ModifiesS(a, b) | UsesS(a, b) => {
                    push_stmt(&mut out, a);
                    push_ent(&mut out, b);
                }
                ModifiesP(a, b) | UsesP(a, b) | Calls(a, b) | CallsT(a, b) => {
                    push_ent(&mut out, a);
                    push_ent(&mut out, b);
                }
            }
        }
        ClauseKind::Pattern(pattern) => match pattern {
            Pattern::Assign { synonym, lhs, .. }
            | Pattern::If { synonym, lhs }
            | Pattern::While { synonym, lhs } => {
                push(&mut out, synonym);
                push_ent(&mut out, lhs);
            }
        },
        ClauseKind::With(lhs, rhs) => {
            if let WithRef::Attr(attr) = lhs {
                push(&mut out, &attr.synonym);
            }
            if let WithRef::Attr(attr) = rhs {
                push(&mut out, &attr.synonym);
            }
        }
    }
    out
}

/// Complement of the positive result against the synonyms' full domains.
/// A ground clause (no synonyms) just flips between `Unit` and `Empty`;
/// synonyms not mentioned by the clause are unaffected.
fn negate(pkb: &Pkb, positive: OutputTable, synonyms: Vec<Synonym>) -> OutputTable {
    if synonyms.is_empty() {
        return match positive {
            OutputTable::Empty => OutputTable::Unit,
            _ => OutputTable::Empty,
        };
    }

    let universe = synonyms
        .iter()
        .fold(OutputTable::Unit, |acc, s| join(acc, domain_table(pkb, s)));
    let OutputTable::Rows(universe) = universe else {
        // Some domain is empty: nothing to bind either way.
        return OutputTable::Empty;
    };

    let bound = match positive {
        OutputTable::Empty => return universe.into_output(),
        OutputTable::Unit => {
            // A positive evaluator never yields Unit when synonyms are
            // present; treat as "holds everywhere".
            return OutputTable::Empty;
        }
        OutputTable::Rows(table) => table,
    };

    // Align the positive rows to the universe's column order.
    let order: Vec<usize> = universe
        .columns()
        .iter()
        .map(|col| {
            bound
                .column_index(col)
                .expect("positive table binds every clause synonym")
        })
        .collect();
    let banned: AHashSet<Vec<String>> = bound
        .rows()
        .map(|row| order.iter().map(|&i| row[i].clone()).collect())
        .collect();

    let mut out = Table::new(universe.columns().to_vec());
    for row in universe.rows() {
        if !banned.contains(row) {
            out.add_row(row.clone());
        }
    }
    out.into_output()
}
