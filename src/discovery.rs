//! Locating datasets and their per-run files under an input directory
//!
//! The expected layout is one subdirectory per run, each holding the same set of
//! `.dat` files:
//!
//! ```text
//! _input/
//!   run_000/  a.dat  b.dat
//!   run_001/  a.dat  b.dat
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{EnsembleError, Result};

/// Extension of dataset files
pub const DATASET_EXTENSION: &str = "dat";

/// Dataset file names present in the first run directory, sorted
pub fn discover_dataset_names(input_dir: &Path) -> Result<Vec<String>> {
    let first_run = run_directories(input_dir)?
        .into_iter()
        .next()
        .ok_or_else(|| {
            EnsembleError::config(format!(
                "no run directories found in {}",
                input_dir.display()
            ))
        })?;

    let mut names = Vec::new();
    for entry in fs::read_dir(&first_run).map_err(|e| EnsembleError::io(&first_run, e))? {
        let path = entry.map_err(|e| EnsembleError::io(&first_run, e))?.path();
        let is_dataset = path.is_file()
            && path.extension().and_then(|e| e.to_str()) == Some(DATASET_EXTENSION);
        if is_dataset {
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                names.push(name.to_string());
            }
        }
    }
    names.sort();
    Ok(names)
}

/// Every run's copy of dataset `name`, sorted by path
pub fn collect_paths(input_dir: &Path, name: &str) -> Result<Vec<PathBuf>> {
    Ok(run_directories(input_dir)?
        .into_iter()
        .map(|dir| dir.join(name))
        .filter(|path| path.is_file())
        .collect())
}

fn run_directories(input_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    for entry in fs::read_dir(input_dir).map_err(|e| EnsembleError::io(input_dir, e))? {
        let path = entry.map_err(|e| EnsembleError::io(input_dir, e))?.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    dirs.sort();
    Ok(dirs)
}
