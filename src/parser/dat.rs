//! Whitespace-separated `.dat` parser

use std::io::BufRead;
use std::path::Path;

use crate::error::{EnsembleError, Result};
use crate::model::KeyedTable;

use super::TableParser;

/// Parser for `key value_1 ... value_m` text files.
///
/// Lines whose first non-blank character is `#` are comments, blank lines are
/// skipped, and `m` is fixed by the first data row.
pub struct DatParser;

impl TableParser for DatParser {
    fn parse_reader(&self, reader: &mut dyn BufRead, origin: &Path) -> Result<KeyedTable> {
        let mut keys = Vec::new();
        let mut columns: Option<Vec<Vec<f64>>> = None;

        for (line_num, line) in reader.lines().enumerate() {
            let line_num = line_num + 1;
            let line = line.map_err(|e| EnsembleError::io(origin, e))?;
            let trimmed = line.trim_start();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let parse_err = |message: String| EnsembleError::Parse {
                path: origin.to_path_buf(),
                line: line_num,
                message,
            };

            let mut fields = trimmed.split_whitespace();
            // non-empty after trimming, so there is always a first field
            let key = match fields.next() {
                Some(field) => parse_field(field, 1).map_err(&parse_err)?,
                None => continue,
            };
            if !key.is_finite() {
                return Err(parse_err(format!("key '{}' is not a finite number", key)));
            }

            let values = fields
                .enumerate()
                .map(|(i, field)| parse_field(field, i + 2))
                .collect::<std::result::Result<Vec<f64>, String>>()
                .map_err(&parse_err)?;

            let columns = columns.get_or_insert_with(|| vec![Vec::new(); values.len()]);
            if values.len() != columns.len() {
                return Err(parse_err(format!(
                    "expected {} values after the key, found {}",
                    columns.len(),
                    values.len()
                )));
            }

            keys.push(key);
            for (col, v) in columns.iter_mut().zip(values) {
                col.push(v);
            }
        }

        KeyedTable::from_columns(keys, columns.unwrap_or_default())
    }
}

fn parse_field(field: &str, position: usize) -> std::result::Result<f64, String> {
    field
        .parse::<f64>()
        .map_err(|_| format!("field {} ('{}') is not a number", position, field))
}
