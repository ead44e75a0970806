//! Bin schemes: key to bin index mapping, representative keys and widths

use std::fmt;

use crate::error::{EnsembleError, Result};

/// Default base for logarithmic binning
pub const DEFAULT_LOG_BASE: f64 = 2.0;

/// How keys are grouped into bins
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BinScheme {
    /// Bin `i` spans `[i * bin_size, (i + 1) * bin_size)`
    Linear { bin_size: f64 },
    /// Bin `i` spans `[base^i, base^(i+1))`; only positive keys can be binned
    Logarithmic { base: f64 },
}

impl BinScheme {
    /// Linear scheme; `bin_size` must be positive and finite
    pub fn linear(bin_size: f64) -> Result<Self> {
        if !(bin_size.is_finite() && bin_size > 0.0) {
            return Err(EnsembleError::config(format!(
                "bin size must be a positive number, got {}",
                bin_size
            )));
        }
        Ok(BinScheme::Linear { bin_size })
    }

    /// Logarithmic scheme; `base` must be finite and greater than 1
    pub fn logarithmic(base: f64) -> Result<Self> {
        if !(base.is_finite() && base > 1.0) {
            return Err(EnsembleError::config(format!(
                "logarithm base must be greater than 1, got {}",
                base
            )));
        }
        Ok(BinScheme::Logarithmic { base })
    }

    pub fn name(&self) -> &'static str {
        match self {
            BinScheme::Linear { .. } => "linear",
            BinScheme::Logarithmic { .. } => "logarithmic",
        }
    }

    /// Index of the bin containing `key`
    pub fn key_to_bin_index(&self, key: f64) -> Result<i64> {
        match *self {
            BinScheme::Linear { bin_size } => Ok(linear_index(key / bin_size)),
            BinScheme::Logarithmic { base } => {
                if !(key > 0.0 && key.is_finite()) {
                    return Err(EnsembleError::KeyOutOfDomain {
                        key,
                        scheme: self.name(),
                    });
                }
                let mut index = (key.ln() / base.ln()).floor() as i64;
                // ln/ln can land an exact power of the base in the neighbouring bin
                if lower_edge(base, index + 1) <= key {
                    index += 1;
                } else if lower_edge(base, index) > key {
                    index -= 1;
                }
                Ok(index)
            }
        }
    }

    /// Representative key of bin `index` (its lower edge)
    pub fn bin_index_to_key(&self, index: i64) -> f64 {
        match *self {
            BinScheme::Linear { bin_size } => index as f64 * bin_size,
            BinScheme::Logarithmic { base } => lower_edge(base, index),
        }
    }

    /// Physical width of bin `index`
    pub fn bin_index_to_width(&self, index: i64) -> f64 {
        match *self {
            BinScheme::Linear { bin_size } => bin_size,
            BinScheme::Logarithmic { base } => lower_edge(base, index + 1) - lower_edge(base, index),
        }
    }
}

/// Floor of `quotient`, except that a quotient within rounding noise of an
/// integer is that integer, so keys on a bin edge open their bin.
fn linear_index(quotient: f64) -> i64 {
    let nearest = quotient.round();
    if (quotient - nearest).abs() <= EDGE_TOLERANCE * nearest.abs().max(1.0) {
        nearest as i64
    } else {
        quotient.floor() as i64
    }
}

const EDGE_TOLERANCE: f64 = 1e-9;

fn lower_edge(base: f64, index: i64) -> f64 {
    base.powf(index as f64)
}

impl fmt::Display for BinScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BinScheme::Linear { bin_size } => write!(f, "linear(bin_size={})", bin_size),
            BinScheme::Logarithmic { base } => write!(f, "logarithmic(base={})", base),
        }
    }
}
