//! Evaluation of "such that" relationship clauses.
//!
//! Every relationship boils down to the same question asked in one of nine
//! argument shapes (synonym / literal / wildcard on each side). Rather than
//! one evaluator per relationship, the relationship is first resolved to a
//! [`RelHandle`] over the backing index, and a single shape dispatch does
//! the rest. `Affects` has no stored index and answers through the guarded
//! reachability primitives instead.

use ahash::AHashSet;
use spa_pkb::relation::{ManyToMany, OneToMany, OneToOne};
use spa_pkb::Pkb;

use crate::eval::{affects, synonym_domain};
use crate::model::{EntArg, Relationship, StmtArg, Synonym};
use crate::table::{OutputTable, Table};

enum ArgShape<'a> {
    Syn(&'a Synonym),
    Lit(String),
    Wild,
}

fn stmt_shape(arg: &StmtArg) -> ArgShape<'_> {
    match arg {
        StmtArg::Synonym(s) => ArgShape::Syn(s),
        StmtArg::Integer(n) => ArgShape::Lit(n.to_string()),
        StmtArg::Wildcard => ArgShape::Wild,
    }
}

fn ent_shape(arg: &EntArg) -> ArgShape<'_> {
    match arg {
        EntArg::Synonym(s) => ArgShape::Syn(s),
        EntArg::Name(name) => ArgShape::Lit(name.clone()),
        EntArg::Wildcard => ArgShape::Wild,
    }
}

/// Uniform view over the index backing a relationship.
enum RelHandle<'p> {
    OneOne(&'p OneToOne<String, String>),
    OneMany(&'p OneToMany<String, String>),
    ManyMany(&'p ManyToMany<String, String>),
    Affects(&'p Pkb),
}

impl RelHandle<'_> {
    fn holds(&self, a: &str, b: &str) -> bool {
        let (ka, kb) = (a.to_string(), b.to_string());
        match self {
            Self::OneOne(r) => r.contains(&ka, &kb),
            Self::OneMany(r) => r.contains(&ka, &kb),
            Self::ManyMany(r) => r.contains(&ka, &kb),
            Self::Affects(pkb) => affects::holds(pkb, a, b),
        }
    }

    fn rights_of(&self, a: &str) -> AHashSet<String> {
        let key = a.to_string();
        match self {
            Self::OneOne(r) => r.value_of(&key).cloned().into_iter().collect(),
            Self::OneMany(r) => r.values_of(&key).cloned().collect(),
            Self::ManyMany(r) => r.values_of(&key).cloned().collect(),
            Self::Affects(pkb) => affects::affected_by(pkb, a),
        }
    }

    fn lefts_of(&self, b: &str) -> AHashSet<String> {
        let key = b.to_string();
        match self {
            Self::OneOne(r) => r.key_of(&key).cloned().into_iter().collect(),
            Self::OneMany(r) => r.key_of(&key).cloned().into_iter().collect(),
            Self::ManyMany(r) => r.keys_of(&key).cloned().collect(),
            Self::Affects(pkb) => affects::affecting(pkb, b),
        }
    }

    fn has_left(&self, a: &str) -> bool {
        let key = a.to_string();
        match self {
            Self::OneOne(r) => r.contains_key(&key),
            Self::OneMany(r) => r.contains_key(&key),
            Self::ManyMany(r) => r.contains_key(&key),
            Self::Affects(pkb) => affects::affects_any(pkb, a),
        }
    }

    fn has_right(&self, b: &str) -> bool {
        let key = b.to_string();
        match self {
            Self::OneOne(r) => r.contains_value(&key),
            Self::OneMany(r) => r.contains_value(&key),
            Self::ManyMany(r) => r.contains_value(&key),
            Self::Affects(pkb) => !affects::affecting(pkb, b).is_empty(),
        }
    }

    fn pairs(&self) -> Vec<(String, String)> {
        let owned = |(k, v): (&String, &String)| (k.clone(), v.clone());
        match self {
            Self::OneOne(r) => r.pairs().map(owned).collect(),
            Self::OneMany(r) => r.pairs().map(owned).collect(),
            Self::ManyMany(r) => r.pairs().map(owned).collect(),
            Self::Affects(pkb) => affects::all_pairs(pkb),
        }
    }

    fn is_inhabited(&self) -> bool {
        match self {
            Self::OneOne(r) => !r.is_empty(),
            Self::OneMany(r) => !r.is_empty(),
            Self::ManyMany(r) => !r.is_empty(),
            Self::Affects(pkb) => affects::is_inhabited(pkb),
        }
    }
}

pub(crate) fn eval_relationship(pkb: &Pkb, rel: &Relationship) -> OutputTable {
    use Relationship::*;
    let (handle, left, right) = match rel {
        Follows(a, b) => (RelHandle::OneOne(pkb.follows()), stmt_shape(a), stmt_shape(b)),
        FollowsT(a, b) => (
            RelHandle::ManyMany(pkb.follows_star()),
            stmt_shape(a),
            stmt_shape(b),
        ),
        Parent(a, b) => (RelHandle::OneMany(pkb.parent()), stmt_shape(a), stmt_shape(b)),
        ParentT(a, b) => (
            RelHandle::ManyMany(pkb.parent_star()),
            stmt_shape(a),
            stmt_shape(b),
        ),
        ModifiesS(a, b) => (
            RelHandle::ManyMany(pkb.modifies_s()),
            stmt_shape(a),
            ent_shape(b),
        ),
        ModifiesP(a, b) => (
            RelHandle::ManyMany(pkb.modifies_p()),
            ent_shape(a),
            ent_shape(b),
        ),
        UsesS(a, b) => (
            RelHandle::ManyMany(pkb.uses_s()),
            stmt_shape(a),
            ent_shape(b),
        ),
        UsesP(a, b) => (
            RelHandle::ManyMany(pkb.uses_p()),
            ent_shape(a),
            ent_shape(b),
        ),
        Calls(a, b) => (RelHandle::ManyMany(pkb.calls()), ent_shape(a), ent_shape(b)),
        CallsT(a, b) => (
            RelHandle::ManyMany(pkb.calls_star()),
            ent_shape(a),
            ent_shape(b),
        ),
        Next(a, b) => (RelHandle::ManyMany(pkb.next()), stmt_shape(a), stmt_shape(b)),
        NextT(a, b) => (
            RelHandle::ManyMany(pkb.next_star()),
            stmt_shape(a),
            stmt_shape(b),
        ),
        Affects(a, b) => (RelHandle::Affects(pkb), stmt_shape(a), stmt_shape(b)),
    };
    eval_shapes(pkb, &handle, left, right)
}

fn unit_if(holds: bool) -> OutputTable {
    if holds {
        OutputTable::Unit
    } else {
        OutputTable::Empty
    }
}

fn eval_shapes(pkb: &Pkb, rel: &RelHandle<'_>, left: ArgShape<'_>, right: ArgShape<'_>) -> OutputTable {
    use ArgShape::*;
    match (left, right) {
        // Same synonym on both sides constrains to the diagonal.
        (Syn(s1), Syn(s2)) if s1.name == s2.name => {
            let mut table = Table::new(vec![s1.clone()]);
            for x in synonym_domain(pkb, s1) {
                if rel.holds(&x, &x) {
                    table.add_row(vec![x]);
                }
            }
            table.into_output()
        }
        (Syn(s1), Syn(s2)) => {
            let d1 = synonym_domain(pkb, s1);
            let d2 = synonym_domain(pkb, s2);
            let mut table = Table::new(vec![s1.clone(), s2.clone()]);
            for (a, b) in rel.pairs() {
                if d1.contains(&a) && d2.contains(&b) {
                    table.add_row(vec![a, b]);
                }
            }
            table.into_output()
        }
        (Syn(s1), Lit(b)) => {
            let domain = synonym_domain(pkb, s1);
            OutputTable::from_domain(
                s1,
                rel.lefts_of(&b).into_iter().filter(|a| domain.contains(a)),
            )
        }
        (Syn(s1), Wild) => OutputTable::from_domain(
            s1,
            synonym_domain(pkb, s1)
                .into_iter()
                .filter(|a| rel.has_left(a)),
        ),
        (Lit(a), Syn(s2)) => {
            let domain = synonym_domain(pkb, s2);
            OutputTable::from_domain(
                s2,
                rel.rights_of(&a).into_iter().filter(|b| domain.contains(b)),
            )
        }
        (Wild, Syn(s2)) => OutputTable::from_domain(
            s2,
            synonym_domain(pkb, s2)
                .into_iter()
                .filter(|b| rel.has_right(b)),
        ),
        (Lit(a), Lit(b)) => unit_if(rel.holds(&a, &b)),
        (Lit(a), Wild) => unit_if(rel.has_left(&a)),
        (Wild, Lit(b)) => unit_if(rel.has_right(&b)),
        (Wild, Wild) => unit_if(rel.is_inhabited()),
    }
}
