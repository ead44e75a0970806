//! Rebinning of keyed tables into coarser, canonical keys

mod scheme;

use indexmap::IndexSet;
use tracing::debug;

use crate::error::Result;
use crate::model::KeyedTable;

pub use scheme::{BinScheme, DEFAULT_LOG_BASE};

/// How the values that fall into one bin are reduced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Reduction {
    /// Arithmetic mean, for measured quantities
    #[default]
    Mean,
    /// Sum divided by bin width, for counts and frequencies
    Density,
}

impl Reduction {
    pub fn from_histogram(is_histogram: bool) -> Self {
        if is_histogram {
            Reduction::Density
        } else {
            Reduction::Mean
        }
    }
}

/// Collapse `table` into one row per touched bin.
///
/// Output keys are the bin representatives in ascending bin order. Duplicate and
/// out-of-order input keys are allowed.
pub fn bin_table(table: &KeyedTable, scheme: &BinScheme, reduction: Reduction) -> Result<KeyedTable> {
    let row_bins = table
        .keys()
        .iter()
        .map(|&k| scheme.key_to_bin_index(k))
        .collect::<Result<Vec<i64>>>()?;

    let mut sorted = row_bins.clone();
    sorted.sort_unstable();
    let bins: IndexSet<i64> = sorted.into_iter().collect();

    let mut columns = Vec::with_capacity(table.column_count());
    for column in table.columns() {
        let mut groups: Vec<Vec<f64>> = vec![Vec::new(); bins.len()];
        for (&bin, &value) in row_bins.iter().zip(column) {
            if let Some(slot) = bins.get_index_of(&bin) {
                groups[slot].push(value);
            }
        }

        let reduced: Vec<f64> = bins
            .iter()
            .zip(&groups)
            .map(|(&bin, group)| reduce(group, reduction, scheme.bin_index_to_width(bin)))
            .collect();
        columns.push(reduced);
    }

    let keys = bins.iter().map(|&bin| scheme.bin_index_to_key(bin)).collect();
    debug!(
        scheme = %scheme,
        rows = table.row_count(),
        bins = bins.len(),
        "binned table"
    );
    KeyedTable::from_columns(keys, columns)
}

fn reduce(group: &[f64], reduction: Reduction, width: f64) -> f64 {
    if group.is_empty() {
        return 0.0;
    }
    let sum: f64 = group.iter().sum();
    match reduction {
        Reduction::Mean => sum / group.len() as f64,
        Reduction::Density => sum / width,
    }
}
