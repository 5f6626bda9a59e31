//! Evaluation of `with` attribute-equality clauses.
//!
//! Each side is either a literal value or a synonym attribute. Attribute
//! resolution maps a domain element to the compared string: identity for
//! `stmt#`, `value`, and name-valued entities, an index lookup for
//! `call.procName`, `read.varName`, and `print.varName`. An attribute that
//! does not apply to the synonym's kind satisfies no binding.

use ahash::AHashMap;
use spa_pkb::Pkb;

use crate::eval::synonym_domain;
use crate::model::{Attr, AttrRef, SynonymKind, WithRef};
use crate::table::{OutputTable, Table};

enum Side<'a> {
    Value(String),
    Attr(&'a AttrRef),
}

fn side(r: &WithRef) -> Side<'_> {
    match r {
        WithRef::Literal(s) => Side::Value(s.clone()),
        WithRef::Integer(n) => Side::Value(n.to_string()),
        WithRef::Attr(attr) => Side::Attr(attr),
    }
}

/// Resolve an attribute for one domain element.
fn attr_value(pkb: &Pkb, r: &AttrRef, binding: &str) -> Option<String> {
    match (r.attr, r.synonym.kind) {
        (Attr::StmtNo, kind) if kind == SynonymKind::Stmt || kind.statement_type().is_some() => {
            Some(binding.to_string())
        }
        (Attr::Value, SynonymKind::Constant) => Some(binding.to_string()),
        (Attr::ProcName, SynonymKind::Procedure) => Some(binding.to_string()),
        (Attr::ProcName, SynonymKind::Call) => pkb
            .called_procedure()
            .value_of(&binding.to_string())
            .cloned(),
        (Attr::VarName, SynonymKind::Variable) => Some(binding.to_string()),
        (Attr::VarName, SynonymKind::Read) => pkb.first_modified_var(binding).cloned(),
        (Attr::VarName, SynonymKind::Print) => pkb.first_used_var(binding).cloned(),
        _ => None,
    }
}

pub(crate) fn eval_with(pkb: &Pkb, lhs: &WithRef, rhs: &WithRef) -> OutputTable {
    match (side(lhs), side(rhs)) {
        (Side::Value(l), Side::Value(r)) => {
            if l == r {
                OutputTable::Unit
            } else {
                OutputTable::Empty
            }
        }
        (Side::Attr(a), Side::Value(v)) | (Side::Value(v), Side::Attr(a)) => {
            OutputTable::from_domain(
                &a.synonym,
                synonym_domain(pkb, &a.synonym)
                    .into_iter()
                    .filter(|x| attr_value(pkb, a, x).as_deref() == Some(v.as_str())),
            )
        }
        (Side::Attr(a), Side::Attr(b)) if a.synonym.name == b.synonym.name => {
            let mut table = Table::new(vec![a.synonym.clone()]);
            for x in synonym_domain(pkb, &a.synonym) {
                let same = match (attr_value(pkb, a, &x), attr_value(pkb, b, &x)) {
                    (Some(l), Some(r)) => l == r,
                    _ => false,
                };
                if same {
                    table.add_row(vec![x]);
                }
            }
            table.into_output()
        }
        (Side::Attr(a), Side::Attr(b)) => {
            // Group the right domain by attribute value, then probe with the
            // left domain.
            let mut by_value: AHashMap<String, Vec<String>> = AHashMap::new();
            for y in synonym_domain(pkb, &b.synonym) {
                if let Some(v) = attr_value(pkb, b, &y) {
                    by_value.entry(v).or_default().push(y);
                }
            }
            let mut table = Table::new(vec![a.synonym.clone(), b.synonym.clone()]);
            for x in synonym_domain(pkb, &a.synonym) {
                let Some(v) = attr_value(pkb, a, &x) else {
                    continue;
                };
                if let Some(ys) = by_value.get(&v) {
                    for y in ys {
                        table.add_row(vec![x.clone(), y.clone()]);
                    }
                }
            }
            table.into_output()
        }
    }
}
