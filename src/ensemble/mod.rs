//! Ensemble aggregation: per-key mean and standard error across runs

pub mod stats;

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{EnsembleError, Result};
use crate::model::{key_bits, sorted_key_union, KeyedTable};

pub use stats::{average_error, Estimate};

/// What to do when a run has no row for a key
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum MissingValue {
    /// Leave the run out of that key's statistic
    #[default]
    Skip,
    /// Count the run as having this value
    Fallback(f64),
}

impl fmt::Display for MissingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingValue::Skip => write!(f, "skip"),
            MissingValue::Fallback(v) => write!(f, "fallback({})", v),
        }
    }
}

/// Statistics for one key, one estimate per column in column order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnsembleRow {
    pub key: f64,
    pub columns: Vec<Estimate>,
}

/// Aggregated ensemble, rows in strictly ascending key order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnsembleResult {
    rows: Vec<EnsembleRow>,
}

impl EnsembleResult {
    pub fn rows(&self) -> &[EnsembleRow] {
        &self.rows
    }

    pub fn keys(&self) -> impl Iterator<Item = f64> + '_ {
        self.rows.iter().map(|r| r.key)
    }

    /// Estimates for `key`, if it occurs in the ensemble
    pub fn get(&self, key: f64) -> Option<&[Estimate]> {
        let key = if key == 0.0 { 0.0 } else { key };
        self.rows
            .binary_search_by(|r| r.key.total_cmp(&key))
            .ok()
            .map(|i| self.rows[i].columns.as_slice())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Combine one table per run into per-key estimates.
///
/// The result covers the union of all keys. Within a run, a repeated key
/// resolves to its last row. Tables without rows take part only through the
/// missing-value policy.
pub fn aggregate(tables: &[KeyedTable], missing: MissingValue) -> Result<EnsembleResult> {
    if tables.is_empty() {
        return Err(EnsembleError::config("ensemble has no runs"));
    }
    let column_count = check_column_counts(tables)?;

    let indexes: Vec<_> = tables.iter().map(KeyedTable::row_index).collect();
    let keys = sorted_key_union(tables);

    let mut rows = Vec::with_capacity(keys.len());
    let mut values = Vec::with_capacity(tables.len());
    for key in keys {
        let bits = key_bits(key);
        let mut columns = Vec::with_capacity(column_count);

        for column in 0..column_count {
            values.clear();
            for (table, index) in tables.iter().zip(&indexes) {
                let value = index.get(&bits).and_then(|&row| table.value(row, column));
                match (value, missing) {
                    (Some(v), _) => values.push(v),
                    (None, MissingValue::Fallback(v)) => values.push(v),
                    (None, MissingValue::Skip) => {}
                }
            }

            let estimate =
                average_error(&values).ok_or(EnsembleError::EmptyGroup { key, column })?;
            columns.push(estimate);
        }

        rows.push(EnsembleRow { key, columns });
    }

    debug!(
        runs = tables.len(),
        keys = rows.len(),
        columns = column_count,
        missing = %missing,
        "aggregated ensemble"
    );
    Ok(EnsembleResult { rows })
}

fn check_column_counts(tables: &[KeyedTable]) -> Result<usize> {
    let mut expected: Option<(usize, usize)> = None;
    for (run, table) in tables.iter().enumerate() {
        if table.is_empty() {
            continue;
        }
        match expected {
            None => expected = Some((run, table.column_count())),
            Some((first, count)) if count != table.column_count() => {
                return Err(EnsembleError::config(format!(
                    "run {} has {} columns but run {} has {}",
                    run,
                    table.column_count(),
                    first,
                    count
                )));
            }
            Some(_) => {}
        }
    }
    Ok(expected.map(|(_, count)| count).unwrap_or(0))
}
