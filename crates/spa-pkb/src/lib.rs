//! Program knowledge base (PKB) for the SIMPLE static analyzer.
//!
//! The PKB stores every fact extracted from a SIMPLE program — entities,
//! statement kinds, and the inter-statement / inter-procedure relations —
//! and derives the transitive ("starred") relations in one batch step.
//!
//! ## Lifecycle
//!
//! Population and querying are separated at the type level:
//!
//! - [`PkbBuilder`] exposes only the append-only `add_*` operations used by
//!   the AST population pass.
//! - [`PkbBuilder::finalize`] consumes the builder, runs the closure engine
//!   (`Follows*`, `Parent*`, `Calls*` via the acyclic sweep; `Next*` via
//!   SCC condensation), and yields the immutable [`Pkb`].
//!
//! After finalize the store is read-only and can be shared by any number of
//! concurrent readers without synchronization.
//!
//! ## Module organization
//!
//! - `relation`: the four bidirectional index shapes backing every relation
//! - `closure`: batch transitive-closure derivation (acyclic and cyclic)
//! - `reach`: on-demand guarded reachability (the `Affects` primitive)

pub mod closure;
pub mod reach;
pub mod relation;

mod builder;
mod pkb;
mod types;

pub use builder::PkbBuilder;
pub use closure::FinalizeError;
pub use pkb::Pkb;
pub use types::{ProcName, StatementType, StmtNo, VarName};
