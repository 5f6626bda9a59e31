//! Evaluation of pattern clauses against the syntactic indices.
//!
//! Assignment patterns filter by the stored postfix right-hand side (exact
//! or subexpression match) and then bind the left-hand variable. If and
//! while patterns bind the variables appearing in the condition; a
//! wildcard matches containers with at least one condition variable.

use ahash::AHashSet;
use spa_pkb::relation::ManyToMany;
use spa_pkb::{Pkb, StatementType};

use crate::model::{EntArg, ExprSpec, Pattern, Synonym};
use crate::table::{OutputTable, Table};

pub(crate) fn eval_pattern(pkb: &Pkb, pattern: &Pattern) -> OutputTable {
    match pattern {
        Pattern::Assign { synonym, lhs, rhs } => eval_assign(pkb, synonym, lhs, rhs),
        Pattern::If { synonym, lhs } => eval_condition(synonym, lhs, pkb.if_vars()),
        Pattern::While { synonym, lhs } => eval_condition(synonym, lhs, pkb.while_vars()),
    }
}

fn eval_assign(pkb: &Pkb, synonym: &Synonym, lhs: &EntArg, rhs: &ExprSpec) -> OutputTable {
    let candidates: AHashSet<String> = match rhs {
        ExprSpec::Wildcard => pkb.statements_of_type(StatementType::Assign),
        ExprSpec::Exact(postfix) => pkb.assigns_with_rhs(postfix),
        ExprSpec::Partial(postfix) => pkb.assigns_containing_rhs(postfix),
    };

    match lhs {
        EntArg::Wildcard => OutputTable::from_domain(synonym, candidates),
        EntArg::Name(var) => OutputTable::from_domain(
            synonym,
            candidates
                .into_iter()
                .filter(|s| pkb.assign_lhs().contains(s, var)),
        ),
        EntArg::Synonym(var_syn) => {
            let mut table = Table::new(vec![synonym.clone(), var_syn.clone()]);
            for stmt in candidates {
                if let Some(var) = pkb.assign_lhs().value_of(&stmt) {
                    let var = var.clone();
                    table.add_row(vec![stmt, var]);
                }
            }
            table.into_output()
        }
    }
}

fn eval_condition(
    synonym: &Synonym,
    lhs: &EntArg,
    vars: &ManyToMany<String, String>,
) -> OutputTable {
    match lhs {
        EntArg::Wildcard => OutputTable::from_domain(synonym, vars.keys().cloned()),
        EntArg::Name(var) => OutputTable::from_domain(synonym, vars.keys_of(var).cloned()),
        EntArg::Synonym(var_syn) => {
            let mut table = Table::new(vec![synonym.clone(), var_syn.clone()]);
            for (stmt, var) in vars.pairs() {
                table.add_row(vec![stmt.clone(), var.clone()]);
            }
            table.into_output()
        }
    }
}
