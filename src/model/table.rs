//! Keyed table: one independent-variable key per row, one or more value columns

use rustc_hash::FxHashMap;

use crate::error::{EnsembleError, Result};

use super::key::key_bits;

/// An ordered, key-addressed numeric table parsed from one run's output.
///
/// Rows keep the order they were read in and duplicate keys are preserved.
/// Values are stored column-major: `columns[c][i]` belongs to `keys[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyedTable {
    keys: Vec<f64>,
    columns: Vec<Vec<f64>>,
}

impl KeyedTable {
    /// Build a table from column-major data.
    ///
    /// Every column must have exactly one value per key.
    pub fn from_columns(keys: Vec<f64>, columns: Vec<Vec<f64>>) -> Result<Self> {
        if let Some((c, col)) = columns
            .iter()
            .enumerate()
            .find(|(_, col)| col.len() != keys.len())
        {
            return Err(EnsembleError::config(format!(
                "column {} has {} values for {} keys",
                c,
                col.len(),
                keys.len()
            )));
        }
        Ok(Self { keys, columns })
    }

    /// Build a table from `(key, values)` rows.
    ///
    /// The column count is taken from the first row and every other row must match it.
    pub fn from_rows(rows: Vec<(f64, Vec<f64>)>) -> Result<Self> {
        let column_count = rows.first().map(|(_, v)| v.len()).unwrap_or(0);
        let mut keys = Vec::with_capacity(rows.len());
        let mut columns = vec![Vec::with_capacity(rows.len()); column_count];

        for (i, (key, values)) in rows.into_iter().enumerate() {
            if values.len() != column_count {
                return Err(EnsembleError::config(format!(
                    "row {} has {} values, expected {}",
                    i,
                    values.len(),
                    column_count
                )));
            }
            keys.push(key);
            for (col, v) in columns.iter_mut().zip(values) {
                col.push(v);
            }
        }

        Ok(Self { keys, columns })
    }

    /// Keys in row order
    pub fn keys(&self) -> &[f64] {
        &self.keys
    }

    /// All value columns
    pub fn columns(&self) -> &[Vec<f64>] {
        &self.columns
    }

    /// Get a column by index
    pub fn column(&self, index: usize) -> Option<&[f64]> {
        self.columns.get(index).map(Vec::as_slice)
    }

    /// Value at a given row and column
    pub fn value(&self, row: usize, column: usize) -> Option<f64> {
        self.columns.get(column).and_then(|c| c.get(row)).copied()
    }

    /// Number of value columns (the key is not counted)
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Iterate rows as `(key, values)` pairs in row order
    pub fn rows(&self) -> impl Iterator<Item = (f64, Vec<f64>)> + '_ {
        self.keys
            .iter()
            .enumerate()
            .map(move |(i, &k)| (k, self.columns.iter().map(|c| c[i]).collect()))
    }

    /// Index from key identity to row.
    ///
    /// When a key occurs more than once the last row wins.
    pub fn row_index(&self) -> FxHashMap<u64, usize> {
        let mut index = FxHashMap::default();
        index.reserve(self.keys.len());
        for (row, &key) in self.keys.iter().enumerate() {
            index.insert(key_bits(key), row);
        }
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows_is_column_major() {
        let table =
            KeyedTable::from_rows(vec![(0.0, vec![1.0, 2.0]), (1.0, vec![3.0, 4.0])]).unwrap();

        assert_eq!(table.keys(), &[0.0, 1.0]);
        assert_eq!(table.column(0), Some(&[1.0, 3.0][..]));
        assert_eq!(table.column(1), Some(&[2.0, 4.0][..]));
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.value(1, 0), Some(3.0));
        assert_eq!(table.value(2, 0), None);
    }

    #[test]
    fn test_from_rows_rejects_ragged_rows() {
        let err = KeyedTable::from_rows(vec![(0.0, vec![1.0, 2.0]), (1.0, vec![3.0])]);
        assert!(matches!(err, Err(EnsembleError::Configuration(_))));
    }

    #[test]
    fn test_from_columns_rejects_length_mismatch() {
        let err = KeyedTable::from_columns(vec![0.0, 1.0], vec![vec![1.0]]);
        assert!(err.is_err());
    }

    #[test]
    fn test_duplicate_keys_preserved_and_last_wins_in_index() {
        let table = KeyedTable::from_rows(vec![
            (1.0, vec![10.0]),
            (0.0, vec![20.0]),
            (1.0, vec![30.0]),
        ])
        .unwrap();

        assert_eq!(table.keys(), &[1.0, 0.0, 1.0]);
        let index = table.row_index();
        assert_eq!(index.len(), 2);
        assert_eq!(index[&key_bits(1.0)], 2);
    }

    #[test]
    fn test_rows_round_trip_order() {
        let rows = vec![(2.0, vec![1.0]), (1.0, vec![2.0])];
        let table = KeyedTable::from_rows(rows.clone()).unwrap();
        assert_eq!(table.rows().collect::<Vec<_>>(), rows);
    }

    #[test]
    fn test_empty_table() {
        let table = KeyedTable::from_rows(Vec::new()).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.column_count(), 0);
    }
}
