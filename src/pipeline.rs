//! Dataset pipeline: load every run, optionally rebin, then aggregate

use std::path::PathBuf;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::binning::bin_table;
use crate::config::{Config, DatasetOptions, OutputDestination};
use crate::discovery::{collect_paths, discover_dataset_names};
use crate::ensemble::{aggregate, EnsembleResult};
use crate::error::{EnsembleError, Result};
use crate::model::KeyedTable;
use crate::parser;

/// Result of processing one dataset
#[derive(Debug)]
pub struct DatasetOutcome {
    /// Dataset file name
    pub name: String,
    /// Number of runs that contributed a file
    pub runs: usize,
    pub result: Result<EnsembleResult>,
}

/// Parse every run's file for one dataset
pub fn load_ensemble(paths: &[PathBuf]) -> Result<Vec<KeyedTable>> {
    paths
        .iter()
        .map(|path| {
            let table = parser::load(path)?;
            debug!(path = %path.display(), rows = table.row_count(), "loaded run");
            Ok(table)
        })
        .collect()
}

/// Rebin (if requested) and aggregate already loaded runs
pub fn analyze_tables(tables: &[KeyedTable], options: &DatasetOptions) -> Result<EnsembleResult> {
    match &options.scheme {
        Some(scheme) => {
            let binned = tables
                .iter()
                .map(|t| bin_table(t, scheme, options.reduction))
                .collect::<Result<Vec<_>>>()?;
            aggregate(&binned, options.missing_value)
        }
        None => aggregate(tables, options.missing_value),
    }
}

/// Load, rebin and aggregate one dataset's run files
pub fn analyze(paths: &[PathBuf], options: &DatasetOptions) -> Result<EnsembleResult> {
    let tables = load_ensemble(paths)?;
    analyze_tables(&tables, options)
}

/// Datasets named in the config, or every dataset found in the first run
pub fn resolve_datasets(config: &Config) -> Result<Vec<String>> {
    if config.datasets.is_empty() {
        discover_dataset_names(&config.input_dir)
    } else {
        Ok(config.datasets.clone())
    }
}

/// Process every dataset independently and in parallel.
///
/// Configuration problems fail the whole call before any dataset is read.
/// Failures inside one dataset are reported in its outcome and do not affect
/// the others. Outcomes are returned in dataset order.
pub fn run_all(config: &Config) -> Result<Vec<DatasetOutcome>> {
    config.validate()?;
    let names = resolve_datasets(config)?;

    if names.len() > 1 {
        if let OutputDestination::File(path) = &config.output {
            return Err(EnsembleError::config(format!(
                "{} datasets cannot share the single output file {}",
                names.len(),
                path.display()
            )));
        }
    }
    info!(datasets = names.len(), input = %config.input_dir.display(), "processing ensemble");

    let outcomes = names
        .par_iter()
        .map(|name| run_dataset(config, name))
        .collect();
    Ok(outcomes)
}

fn run_dataset(config: &Config, name: &str) -> DatasetOutcome {
    let mut runs = 0;
    let result = collect_paths(&config.input_dir, name).and_then(|paths| {
        runs = paths.len();
        let options = config.dataset_options(name)?;
        info!(dataset = name, runs, missing = %options.missing_value, "averaging dataset");
        analyze(&paths, &options)
    });

    if let Err(e) = &result {
        warn!(dataset = name, error = %e, "dataset failed");
    }
    DatasetOutcome {
        name: name.to_string(),
        runs,
        result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binning::{BinScheme, Reduction};
    use crate::config::{Binning, MissingValue};
    use std::fs;

    fn write_run(root: &std::path::Path, run: &str, name: &str, content: &str) {
        let dir = root.join(run);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn test_analyze_tables_bins_before_aggregating() {
        let a = KeyedTable::from_rows(vec![(0.0, vec![1.0]), (0.5, vec![3.0])]).unwrap();
        let b = KeyedTable::from_rows(vec![(0.25, vec![6.0])]).unwrap();
        let options = DatasetOptions {
            missing_value: MissingValue::Skip,
            scheme: Some(BinScheme::linear(1.0).unwrap()),
            reduction: Reduction::Mean,
        };

        let result = analyze_tables(&[a, b], &options).unwrap();
        assert_eq!(result.keys().collect::<Vec<_>>(), vec![0.0]);
        let est = result.get(0.0).unwrap()[0];
        assert_eq!(est.mean, 4.0);
        assert_eq!(est.error, 2.0);
    }

    #[test]
    fn test_run_all_keeps_datasets_independent() {
        let root = tempfile::tempdir().unwrap();
        write_run(root.path(), "r1", "good.dat", "0 1.0\n");
        write_run(root.path(), "r2", "good.dat", "0 3.0\n");
        write_run(root.path(), "r1", "bad.dat", "0 1.0\n");
        write_run(root.path(), "r2", "bad.dat", "0 x\n");

        let config = Config::new(root.path().to_path_buf());
        let outcomes = run_all(&config).unwrap();

        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].name, "bad.dat");
        assert!(matches!(
            outcomes[0].result,
            Err(EnsembleError::Parse { .. })
        ));
        assert_eq!(outcomes[1].name, "good.dat");
        assert_eq!(outcomes[1].runs, 2);
        let good = outcomes[1].result.as_ref().unwrap();
        assert_eq!(good.get(0.0).unwrap()[0].mean, 2.0);
    }

    #[test]
    fn test_run_all_rejects_shared_output_file() {
        let root = tempfile::tempdir().unwrap();
        write_run(root.path(), "r1", "a.dat", "0 1\n");
        write_run(root.path(), "r1", "b.dat", "0 1\n");

        let config = Config::new(root.path().to_path_buf())
            .with_output(OutputDestination::File(root.path().join("out.txt")));
        assert!(matches!(
            run_all(&config),
            Err(EnsembleError::Configuration(_))
        ));
    }

    #[test]
    fn test_run_all_validates_before_reading() {
        let config = Config::new(PathBuf::from("/nonexistent"))
            .with_binning(Binning::Linear { bin_size: -1.0 });
        assert!(matches!(
            run_all(&config),
            Err(EnsembleError::Configuration(_))
        ));
    }

    #[test]
    fn test_unknown_dataset_has_no_runs() {
        let root = tempfile::tempdir().unwrap();
        write_run(root.path(), "r1", "a.dat", "0 1\n");

        let config =
            Config::new(root.path().to_path_buf()).with_datasets(vec!["missing.dat".into()]);
        let outcomes = run_all(&config).unwrap();
        assert_eq!(outcomes[0].runs, 0);
        assert!(matches!(
            outcomes[0].result,
            Err(EnsembleError::Configuration(_))
        ));
    }
}
