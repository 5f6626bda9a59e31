//! The query driver: seed, join, short-circuit, project.

use ahash::AHashSet;
use spa_pkb::Pkb;
use tracing::{debug, trace};

use crate::eval::{domain_table, evaluate_clause};
use crate::model::{Query, Selection, Synonym};
use crate::table::{join, OutputTable, Table};

/// Evaluates queries against a finalized knowledge base.
///
/// Evaluation seeds the working table with the selected synonyms' domains,
/// folds every clause result in with a natural join, and stops at the first
/// empty intermediate. Clause order is the caller's; reordering for cost is
/// up to the query author.
pub struct QueryEvaluator<'p> {
    pkb: &'p Pkb,
}

impl<'p> QueryEvaluator<'p> {
    pub fn new(pkb: &'p Pkb) -> Self {
        Self { pkb }
    }

    /// Evaluate a query to its projected results, sorted for determinism.
    /// A pair selection renders each row as the two values separated by a
    /// space.
    pub fn evaluate(&self, query: &Query) -> Vec<String> {
        let mut selected: Vec<&Synonym> = query.selection.synonyms();
        selected.dedup_by(|a, b| a.name == b.name);

        // Seeding with the selection domains keeps the projection total even
        // when no clause mentions a selected synonym.
        let mut table = selected
            .iter()
            .fold(OutputTable::Unit, |acc, s| {
                join(acc, domain_table(self.pkb, s))
            });

        for (index, clause) in query.clauses.iter().enumerate() {
            let result = evaluate_clause(self.pkb, clause);
            trace!(clause = index, negated = clause.negated, "clause evaluated");
            table = join(table, result);
            if table.is_empty() {
                debug!(clause = index, "query short-circuited to empty");
                return Vec::new();
            }
        }

        self.project(&query.selection, table)
    }

    fn project(&self, selection: &Selection, table: OutputTable) -> Vec<String> {
        let OutputTable::Rows(table) = table else {
            // Unit cannot occur here: the seed always binds the selected
            // synonyms, so anything non-empty carries rows.
            return Vec::new();
        };

        let values: AHashSet<String> = match selection {
            Selection::Single(s) => {
                let i = column(&table, s);
                table.rows().map(|row| row[i].clone()).collect()
            }
            Selection::Pair(a, b) => {
                let (ia, ib) = (column(&table, a), column(&table, b));
                table
                    .rows()
                    .map(|row| format!("{} {}", row[ia], row[ib]))
                    .collect()
            }
        };

        let mut out: Vec<String> = values.into_iter().collect();
        out.sort();
        out
    }
}

fn column(table: &Table, synonym: &Synonym) -> usize {
    table
        .column_index(synonym)
        .expect("selected synonyms are bound by the seed table")
}
