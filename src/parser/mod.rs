//! Parser layer for reading per-run output files into keyed tables

mod dat;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{EnsembleError, Result};
use crate::model::KeyedTable;

pub use self::dat::DatParser;

/// Trait for parsing a run's output into a KeyedTable
pub trait TableParser: Send + Sync {
    /// Parse line-oriented content. `origin` is used in error messages only.
    fn parse_reader(&self, reader: &mut dyn BufRead, origin: &Path) -> Result<KeyedTable>;

    /// Parse a file
    fn parse(&self, path: &Path) -> Result<KeyedTable> {
        let file = File::open(path).map_err(|e| EnsembleError::io(path, e))?;
        let mut reader = BufReader::new(file);
        self.parse_reader(&mut reader, path)
    }
}

/// Load a whitespace-separated `.dat` file
pub fn load(path: &Path) -> Result<KeyedTable> {
    DatParser.parse(path)
}

/// Load `.dat` content already held in memory
pub fn load_str(text: &str) -> Result<KeyedTable> {
    DatParser.parse_reader(&mut text.as_bytes(), Path::new("<memory>"))
}
