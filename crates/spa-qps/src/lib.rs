//! Query processing for the SIMPLE static analyzer.
//!
//! The crate takes a typed [`model::Query`] (produced by a query-text
//! parser, which lives outside this crate) and evaluates it against a
//! finalized [`spa_pkb::Pkb`].
//!
//! ## Evaluation pipeline
//!
//! 1. Seed an intermediate table with the selected synonyms' domains.
//! 2. Evaluate each clause in order to an [`table::OutputTable`]: a set of
//!    rows over the clause's synonyms, or a synonym-free `Unit` / `Empty`
//!    verdict.
//! 3. Natural-join each clause result into the working table, stopping as
//!    soon as it collapses to `Empty`.
//! 4. Project the surviving rows onto the selection.
//!
//! Everything operates on `&Pkb`; evaluators hold no mutable state and a
//! single knowledge base can serve concurrent evaluations.

pub mod model;
pub mod table;

mod eval;
mod evaluator;

pub use evaluator::QueryEvaluator;
