//! Intermediate result tables and the natural-join operator.
//!
//! Evaluation works over a three-valued lattice:
//!
//! - [`OutputTable::Empty`] — the clause is unsatisfiable; absorbs joins.
//! - [`OutputTable::Unit`] — a ground fact that holds; contributes no
//!   bindings and is the join identity.
//! - [`OutputTable::Rows`] — concrete bindings for the synonyms that
//!   appeared as clause arguments.
//!
//! Rows are identified by value; duplicates collapse. A concrete table that
//! ends up with no rows normalizes to `Empty`.

use ahash::{AHashMap, AHashSet};

use crate::model::Synonym;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    columns: Vec<Synonym>,
    rows: AHashSet<Vec<String>>,
}

impl Table {
    pub fn new(columns: Vec<Synonym>) -> Self {
        debug_assert!(
            columns
                .iter()
                .map(|c| &c.name)
                .collect::<AHashSet<_>>()
                .len()
                == columns.len(),
            "table columns must be distinct synonyms"
        );
        Self {
            columns,
            rows: AHashSet::new(),
        }
    }

    pub fn add_row(&mut self, row: Vec<String>) {
        debug_assert_eq!(row.len(), self.columns.len());
        self.rows.insert(row);
    }

    pub fn columns(&self) -> &[Synonym] {
        &self.columns
    }

    pub fn rows(&self) -> impl Iterator<Item = &Vec<String>> {
        self.rows.iter()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_index(&self, synonym: &Synonym) -> Option<usize> {
        self.columns.iter().position(|c| c == synonym)
    }

    /// Normalize: a table with no satisfying rows is the empty outcome.
    pub fn into_output(self) -> OutputTable {
        if self.rows.is_empty() {
            OutputTable::Empty
        } else {
            OutputTable::Rows(self)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTable {
    Empty,
    Unit,
    Rows(Table),
}

impl OutputTable {
    pub fn is_empty(&self) -> bool {
        matches!(self, OutputTable::Empty)
    }

    /// Build the single-column table over a synonym's domain.
    pub(crate) fn from_domain(synonym: &Synonym, domain: impl IntoIterator<Item = String>) -> Self {
        let mut table = Table::new(vec![synonym.clone()]);
        for value in domain {
            table.add_row(vec![value]);
        }
        table.into_output()
    }
}

/// Natural join. `Empty` absorbs, `Unit` is the identity; otherwise rows are
/// matched on the shared columns and the result is laid out as the left
/// columns followed by the right table's remaining columns. With no shared
/// columns this is the cross product.
pub fn join(left: OutputTable, right: OutputTable) -> OutputTable {
    match (left, right) {
        (OutputTable::Empty, _) | (_, OutputTable::Empty) => OutputTable::Empty,
        (OutputTable::Unit, other) | (other, OutputTable::Unit) => other,
        (OutputTable::Rows(a), OutputTable::Rows(b)) => join_tables(a, b),
    }
}

fn join_tables(a: Table, b: Table) -> OutputTable {
    // (index in a, index in b) for every column present in both.
    let shared: Vec<(usize, usize)> = a
        .columns
        .iter()
        .enumerate()
        .filter_map(|(ia, col)| b.column_index(col).map(|ib| (ia, ib)))
        .collect();
    let b_extra: Vec<usize> = (0..b.columns.len())
        .filter(|ib| !shared.iter().any(|(_, sb)| sb == ib))
        .collect();

    let mut columns = a.columns.clone();
    columns.extend(b_extra.iter().map(|&ib| b.columns[ib].clone()));
    let mut out = Table::new(columns);

    if shared.is_empty() {
        for ra in &a.rows {
            for rb in &b.rows {
                let mut row = ra.clone();
                row.extend(rb.iter().cloned());
                out.add_row(row);
            }
        }
        return out.into_output();
    }

    // Hash join keyed on the shared-column values.
    let mut by_key: AHashMap<Vec<&String>, Vec<&Vec<String>>> = AHashMap::new();
    for rb in &b.rows {
        let key: Vec<&String> = shared.iter().map(|&(_, ib)| &rb[ib]).collect();
        by_key.entry(key).or_default().push(rb);
    }

    for ra in &a.rows {
        let key: Vec<&String> = shared.iter().map(|&(ia, _)| &ra[ia]).collect();
        let Some(matches) = by_key.get(&key) else {
            continue;
        };
        for rb in matches {
            let mut row = ra.clone();
            row.extend(b_extra.iter().map(|&ib| rb[ib].clone()));
            out.add_row(row);
        }
    }

    out.into_output()
}
