//! The typed query model handed over by the query-text parser.
//!
//! A query is a selection plus an ordered clause list. Synonym typing is a
//! closed enum carried in the value ([`SynonymKind`]) rather than a class
//! hierarchy; the evaluator narrows every synonym argument to its
//! fact-store domain before matching.

use serde::{Deserialize, Serialize};
use spa_pkb::StatementType;

/// The design-entity category a synonym is declared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SynonymKind {
    Procedure,
    Variable,
    Constant,
    /// Any statement, regardless of kind.
    Stmt,
    Assign,
    If,
    While,
    Call,
    Read,
    Print,
}

impl SynonymKind {
    /// The statement kind this synonym is restricted to, if it is a
    /// statement synonym narrower than `stmt`.
    pub(crate) fn statement_type(self) -> Option<StatementType> {
        match self {
            SynonymKind::Assign => Some(StatementType::Assign),
            SynonymKind::If => Some(StatementType::If),
            SynonymKind::While => Some(StatementType::While),
            SynonymKind::Call => Some(StatementType::Call),
            SynonymKind::Read => Some(StatementType::Read),
            SynonymKind::Print => Some(StatementType::Print),
            _ => None,
        }
    }
}

/// A typed query variable. Names are unique within a query; equality is by
/// name and kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Synonym {
    pub name: String,
    pub kind: SynonymKind,
}

impl Synonym {
    pub fn new(kind: SynonymKind, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// A relationship argument in statement position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StmtArg {
    Synonym(Synonym),
    Integer(u32),
    Wildcard,
}

/// A relationship argument in entity-name position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntArg {
    Synonym(Synonym),
    Name(String),
    Wildcard,
}

/// The relationship vocabulary of "such that" clauses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Relationship {
    Follows(StmtArg, StmtArg),
    FollowsT(StmtArg, StmtArg),
    Parent(StmtArg, StmtArg),
    ParentT(StmtArg, StmtArg),
    ModifiesS(StmtArg, EntArg),
    ModifiesP(EntArg, EntArg),
    UsesS(StmtArg, EntArg),
    UsesP(EntArg, EntArg),
    Calls(EntArg, EntArg),
    CallsT(EntArg, EntArg),
    Next(StmtArg, StmtArg),
    NextT(StmtArg, StmtArg),
    Affects(StmtArg, StmtArg),
}

/// The right-hand-side specification of an assignment pattern, against the
/// stored postfix form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExprSpec {
    /// `"x + 1"` — the whole right-hand side must match.
    Exact(String),
    /// `_"x + 1"_` — any subexpression may match.
    Partial(String),
    Wildcard,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pattern {
    Assign {
        synonym: Synonym,
        lhs: EntArg,
        rhs: ExprSpec,
    },
    If { synonym: Synonym, lhs: EntArg },
    While { synonym: Synonym, lhs: EntArg },
}

/// An attribute of a synonym, e.g. `c.procName`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Attr {
    ProcName,
    VarName,
    Value,
    StmtNo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttrRef {
    pub synonym: Synonym,
    pub attr: Attr,
}

/// One side of a `with` equality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WithRef {
    Literal(String),
    Integer(u32),
    Attr(AttrRef),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClauseKind {
    SuchThat(Relationship),
    Pattern(Pattern),
    With(WithRef, WithRef),
}

/// One constraint of a query. Every clause carries a negation flag;
/// a negated clause holds for exactly the bindings its positive form
/// does not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clause {
    pub kind: ClauseKind,
    pub negated: bool,
}

impl Clause {
    pub fn such_that(rel: Relationship) -> Self {
        Self {
            kind: ClauseKind::SuchThat(rel),
            negated: false,
        }
    }

    pub fn pattern(pattern: Pattern) -> Self {
        Self {
            kind: ClauseKind::Pattern(pattern),
            negated: false,
        }
    }

    pub fn with(lhs: WithRef, rhs: WithRef) -> Self {
        Self {
            kind: ClauseKind::With(lhs, rhs),
            negated: false,
        }
    }

    pub fn negated(mut self) -> Self {
        self.negated = true;
        self
    }
}

/// What the query projects its final table onto.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selection {
    Single(Synonym),
    Pair(Synonym, Synonym),
}

impl Selection {
    pub(crate) fn synonyms(&self) -> Vec<&Synonym> {
        match self {
            Selection::Single(s) => vec![s],
            Selection::Pair(a, b) => vec![a, b],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    pub selection: Selection,
    pub clauses: Vec<Clause>,
}

impl Query {
    pub fn new(selection: Selection, clauses: Vec<Clause>) -> Self {
        Self { selection, clauses }
    }
}
