//! Write side of the knowledge base.
//!
//! The AST population pass calls the `add_*` methods during a single tree
//! traversal, then calls [`PkbBuilder::finalize`] exactly once. Finalize
//! consumes the builder and produces the read-only [`Pkb`], deriving the
//! starred relations on the way — so reading `Follows*` from a half-built
//! store is a compile error, not a silent empty result.

use ahash::AHashSet;
use tracing::debug;

use crate::closure::{cyclic_closure, numeric_closure, ordered_closure, FinalizeError};
use crate::pkb::Pkb;
use crate::relation::{ManyToMany, ManyToOne, OneToMany, OneToOne};
use crate::types::{ProcName, StatementType, StmtNo, VarName};

#[derive(Debug, Default)]
pub struct PkbBuilder {
    procedures: AHashSet<ProcName>,
    variables: AHashSet<VarName>,
    constants: AHashSet<String>,
    statements: ManyToOne<StmtNo, StatementType>,

    follows: OneToOne<StmtNo, StmtNo>,
    parent: OneToMany<StmtNo, StmtNo>,
    modifies_s: ManyToMany<StmtNo, VarName>,
    modifies_p: ManyToMany<ProcName, VarName>,
    uses_s: ManyToMany<StmtNo, VarName>,
    uses_p: ManyToMany<ProcName, VarName>,
    calls: ManyToMany<ProcName, ProcName>,
    next: ManyToMany<StmtNo, StmtNo>,

    called_procedure: ManyToOne<StmtNo, ProcName>,
    proc_statements: OneToMany<ProcName, StmtNo>,

    assign_lhs: ManyToOne<StmtNo, VarName>,
    assign_rhs: ManyToOne<StmtNo, String>,
    if_vars: ManyToMany<StmtNo, VarName>,
    while_vars: ManyToMany<StmtNo, VarName>,
}

impl PkbBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    // ---- entities -------------------------------------------------------

    pub fn add_procedure(&mut self, name: impl Into<ProcName>) {
        self.procedures.insert(name.into());
    }

    pub fn add_variable(&mut self, name: impl Into<VarName>) {
        self.variables.insert(name.into());
    }

    pub fn add_constant(&mut self, value: impl Into<String>) {
        self.constants.insert(value.into());
    }

    pub fn add_statement(&mut self, stmt: impl Into<StmtNo>, kind: StatementType) {
        self.statements.add(stmt.into(), kind);
    }

    // ---- relations ------------------------------------------------------

    pub fn add_follows(&mut self, before: impl Into<StmtNo>, after: impl Into<StmtNo>) {
        self.follows.add(before.into(), after.into());
    }

    pub fn add_parent(&mut self, parent: impl Into<StmtNo>, child: impl Into<StmtNo>) {
        self.parent.add(parent.into(), child.into());
    }

    pub fn add_statement_modifies(&mut self, stmt: impl Into<StmtNo>, var: impl Into<VarName>) {
        self.modifies_s.add(stmt.into(), var.into());
    }

    pub fn add_procedure_modifies(&mut self, proc: impl Into<ProcName>, var: impl Into<VarName>) {
        self.modifies_p.add(proc.into(), var.into());
    }

    pub fn add_statement_uses(&mut self, stmt: impl Into<StmtNo>, var: impl Into<VarName>) {
        self.uses_s.add(stmt.into(), var.into());
    }

    pub fn add_procedure_uses(&mut self, proc: impl Into<ProcName>, var: impl Into<VarName>) {
        self.uses_p.add(proc.into(), var.into());
    }

    pub fn add_calls(&mut self, caller: impl Into<ProcName>, callee: impl Into<ProcName>) {
        self.calls.add(caller.into(), callee.into());
    }

    pub fn add_next(&mut self, before: impl Into<StmtNo>, after: impl Into<StmtNo>) {
        self.next.add(before.into(), after.into());
    }

    /// The target of a `call` statement, for `call.procName` attributes and
    /// statement-to-procedure relationship arguments.
    pub fn add_called_procedure(&mut self, stmt: impl Into<StmtNo>, proc: impl Into<ProcName>) {
        self.called_procedure.add(stmt.into(), proc.into());
    }

    pub fn add_statement_in_procedure(
        &mut self,
        proc: impl Into<ProcName>,
        stmt: impl Into<StmtNo>,
    ) {
        self.proc_statements.add(proc.into(), stmt.into());
    }

    // ---- pattern indices ------------------------------------------------

    /// Record an assignment: its left-hand variable and the postfix form of
    /// its right-hand expression.
    pub fn add_assignment(
        &mut self,
        stmt: impl Into<StmtNo>,
        lhs: impl Into<VarName>,
        rhs_postfix: impl Into<String>,
    ) {
        let stmt = stmt.into();
        self.assign_lhs.add(stmt.clone(), lhs.into());
        self.assign_rhs.add(stmt, rhs_postfix.into());
    }

    /// A variable appearing in an `if` statement's condition.
    pub fn add_if_var(&mut self, stmt: impl Into<StmtNo>, var: impl Into<VarName>) {
        self.if_vars.add(stmt.into(), var.into());
    }

    /// A variable appearing in a `while` statement's condition.
    pub fn add_while_var(&mut self, stmt: impl Into<StmtNo>, var: impl Into<VarName>) {
        self.while_vars.add(stmt.into(), var.into());
    }

    // ---- finalize -------------------------------------------------------

    /// Derive the starred relations and freeze the store.
    ///
    /// `Calls*` ordering is computed internally by topologically sorting the
    /// call graph; use [`PkbBuilder::finalize_with_procedure_order`] to pin
    /// tie-breaking between unrelated procedures.
    pub fn finalize(self) -> Result<Pkb, FinalizeError> {
        self.finalize_impl(None)
    }

    pub fn finalize_with_procedure_order(
        self,
        procedure_order: &[ProcName],
    ) -> Result<Pkb, FinalizeError> {
        self.finalize_impl(Some(procedure_order))
    }

    fn finalize_impl(self, procedure_order: Option<&[ProcName]>) -> Result<Pkb, FinalizeError> {
        let owned_pairs = |pairs: Vec<(&StmtNo, &StmtNo)>| -> Vec<(String, String)> {
            pairs
                .into_iter()
                .map(|(a, b)| (a.clone(), b.clone()))
                .collect()
        };

        let follows_star = numeric_closure(owned_pairs(self.follows.pairs().collect()));
        let parent_star = numeric_closure(owned_pairs(self.parent.pairs().collect()));
        let calls_star = ordered_closure(
            owned_pairs(self.calls.pairs().collect()),
            procedure_order,
        )?;
        let next_star = cyclic_closure(&self.next);

        debug!(
            follows_star = follows_star.len(),
            parent_star = parent_star.len(),
            calls_star = calls_star.len(),
            next_star = next_star.len(),
            "knowledge base finalized"
        );

        Ok(Pkb {
            procedures: self.procedures,
            variables: self.variables,
            constants: self.constants,
            statements: self.statements,
            follows: self.follows,
            follows_star,
            parent: self.parent,
            parent_star,
            modifies_s: self.modifies_s,
            modifies_p: self.modifies_p,
            uses_s: self.uses_s,
            uses_p: self.uses_p,
            calls: self.calls,
            calls_star,
            next: self.next,
            next_star,
            called_procedure: self.called_procedure,
            proc_statements: self.proc_statements,
            assign_lhs: self.assign_lhs,
            assign_rhs: self.assign_rhs,
            if_vars: self.if_vars,
            while_vars: self.while_vars,
        })
    }
}
