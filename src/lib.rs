//! ensemble-average - ensemble statistics for repeated simulation runs
//!
//! Combines the same-named output table from many independent runs into a
//! single table of per-key mean and standard error, optionally after
//! regrouping keys into linear or logarithmic bins.

pub mod binning;
pub mod config;
pub mod discovery;
pub mod ensemble;
pub mod error;
pub mod model;
pub mod output;
pub mod parser;
pub mod pipeline;

pub use binning::{bin_table, BinScheme, Reduction};
pub use config::Config;
pub use ensemble::{aggregate, average_error, EnsembleResult, Estimate, MissingValue};
pub use error::{EnsembleError, Result};
pub use model::KeyedTable;
