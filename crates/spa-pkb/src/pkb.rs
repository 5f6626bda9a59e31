//! Read side of the knowledge base.
//!
//! A [`Pkb`] only exists after [`crate::PkbBuilder::finalize`] has run, so
//! every starred relation it exposes is complete. Nothing here mutates:
//! all methods take `&self`, the type has no interior mutability, and a
//! finalized store may be shared freely across threads.

use ahash::AHashSet;

use crate::relation::{ManyToMany, ManyToOne, OneToMany, OneToOne};
use crate::types::{ProcName, StatementType, StmtNo, VarName};

/// The finalized fact store ("program knowledge base").
#[derive(Debug)]
pub struct Pkb {
    pub(crate) procedures: AHashSet<ProcName>,
    pub(crate) variables: AHashSet<VarName>,
    pub(crate) constants: AHashSet<String>,
    pub(crate) statements: ManyToOne<StmtNo, StatementType>,

    pub(crate) follows: OneToOne<StmtNo, StmtNo>,
    pub(crate) follows_star: ManyToMany<StmtNo, StmtNo>,
    pub(crate) parent: OneToMany<StmtNo, StmtNo>,
    pub(crate) parent_star: ManyToMany<StmtNo, StmtNo>,
    pub(crate) modifies_s: ManyToMany<StmtNo, VarName>,
    pub(crate) modifies_p: ManyToMany<ProcName, VarName>,
    pub(crate) uses_s: ManyToMany<StmtNo, VarName>,
    pub(crate) uses_p: ManyToMany<ProcName, VarName>,
    pub(crate) calls: ManyToMany<ProcName, ProcName>,
    pub(crate) calls_star: ManyToMany<ProcName, ProcName>,
    pub(crate) next: ManyToMany<StmtNo, StmtNo>,
    pub(crate) next_star: ManyToMany<StmtNo, StmtNo>,

    pub(crate) called_procedure: ManyToOne<StmtNo, ProcName>,
    pub(crate) proc_statements: OneToMany<ProcName, StmtNo>,

    pub(crate) assign_lhs: ManyToOne<StmtNo, VarName>,
    pub(crate) assign_rhs: ManyToOne<StmtNo, String>,
    pub(crate) if_vars: ManyToMany<StmtNo, VarName>,
    pub(crate) while_vars: ManyToMany<StmtNo, VarName>,
}

impl Pkb {
    // ---- entities -------------------------------------------------------

    pub fn procedures(&self) -> &AHashSet<ProcName> {
        &self.procedures
    }

    pub fn variables(&self) -> &AHashSet<VarName> {
        &self.variables
    }

    pub fn constants(&self) -> &AHashSet<String> {
        &self.constants
    }

    pub fn has_procedure(&self, name: &str) -> bool {
        self.procedures.contains(name)
    }

    pub fn has_variable(&self, name: &str) -> bool {
        self.variables.contains(name)
    }

    pub fn has_constant(&self, value: &str) -> bool {
        self.constants.contains(value)
    }

    // ---- statements -----------------------------------------------------

    pub fn statements(&self) -> AHashSet<StmtNo> {
        self.statements.keys().cloned().collect()
    }

    pub fn statements_of_type(&self, kind: StatementType) -> AHashSet<StmtNo> {
        self.statements.keys_of(&kind).cloned().collect()
    }

    pub fn statement_type(&self, stmt: &str) -> Option<StatementType> {
        self.statements.value_of(&stmt.to_string()).copied()
    }

    pub fn is_statement(&self, stmt: &str) -> bool {
        self.statements.contains_key(&stmt.to_string())
    }

    pub fn is_statement_of_type(&self, stmt: &str, kind: StatementType) -> bool {
        self.statement_type(stmt) == Some(kind)
    }

    /// Post-hoc filter of any statement-set result by statement kind.
    pub fn filter_statements_by_type(
        &self,
        stmts: &AHashSet<StmtNo>,
        kind: StatementType,
    ) -> AHashSet<StmtNo> {
        stmts
            .iter()
            .filter(|s| self.is_statement_of_type(s, kind))
            .cloned()
            .collect()
    }

    // ---- relation indices ------------------------------------------------

    pub fn follows(&self) -> &OneToOne<StmtNo, StmtNo> {
        &self.follows
    }

    pub fn follows_star(&self) -> &ManyToMany<StmtNo, StmtNo> {
        &self.follows_star
    }

    pub fn parent(&self) -> &OneToMany<StmtNo, StmtNo> {
        &self.parent
    }

    pub fn parent_star(&self) -> &ManyToMany<StmtNo, StmtNo> {
        &self.parent_star
    }

    pub fn modifies_s(&self) -> &ManyToMany<StmtNo, VarName> {
        &self.modifies_s
    }

    pub fn modifies_p(&self) -> &ManyToMany<ProcName, VarName> {
        &self.modifies_p
    }

    pub fn uses_s(&self) -> &ManyToMany<StmtNo, VarName> {
        &self.uses_s
    }

    pub fn uses_p(&self) -> &ManyToMany<ProcName, VarName> {
        &self.uses_p
    }

    pub fn calls(&self) -> &ManyToMany<ProcName, ProcName> {
        &self.calls
    }

    pub fn calls_star(&self) -> &ManyToMany<ProcName, ProcName> {
        &self.calls_star
    }

    pub fn next(&self) -> &ManyToMany<StmtNo, StmtNo> {
        &self.next
    }

    pub fn next_star(&self) -> &ManyToMany<StmtNo, StmtNo> {
        &self.next_star
    }

    pub fn called_procedure(&self) -> &ManyToOne<StmtNo, ProcName> {
        &self.called_procedure
    }

    // ---- derived lookups -------------------------------------------------

    /// The procedure a statement belongs to.
    pub fn procedure_of(&self, stmt: &str) -> Option<&ProcName> {
        self.proc_statements.key_of(&stmt.to_string())
    }

    pub fn statements_in_procedure(&self, proc: &str) -> AHashSet<StmtNo> {
        self.proc_statements
            .values_of(&proc.to_string())
            .cloned()
            .collect()
    }

    /// The single variable a `read` statement modifies (resolution target of
    /// `read.varName`). Also well-defined for assignments.
    pub fn first_modified_var(&self, stmt: &str) -> Option<&VarName> {
        self.modifies_s.values_of(&stmt.to_string()).next()
    }

    /// The single variable a `print` statement uses (resolution target of
    /// `print.varName`).
    pub fn first_used_var(&self, stmt: &str) -> Option<&VarName> {
        self.uses_s.values_of(&stmt.to_string()).next()
    }

    // ---- pattern indices -------------------------------------------------

    pub fn assign_lhs(&self) -> &ManyToOne<StmtNo, VarName> {
        &self.assign_lhs
    }

    pub fn assign_rhs_of(&self, stmt: &str) -> Option<&str> {
        self.assign_rhs
            .value_of(&stmt.to_string())
            .map(String::as_str)
    }

    /// Assignments whose right-hand side matches the postfix text exactly.
    pub fn assigns_with_rhs(&self, postfix: &str) -> AHashSet<StmtNo> {
        self.assign_rhs
            .keys_of(&postfix.to_string())
            .cloned()
            .collect()
    }

    /// Assignments whose right-hand side contains the postfix text as a
    /// subexpression (substring of the stored postfix form).
    pub fn assigns_containing_rhs(&self, postfix: &str) -> AHashSet<StmtNo> {
        self.assign_rhs
            .pairs()
            .filter(|(_, rhs)| rhs.contains(postfix))
            .map(|(stmt, _)| stmt.clone())
            .collect()
    }

    pub fn if_vars(&self) -> &ManyToMany<StmtNo, VarName> {
        &self.if_vars
    }

    pub fn while_vars(&self) -> &ManyToMany<StmtNo, VarName> {
        &self.while_vars
    }
}
