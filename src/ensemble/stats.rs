//! Mean and standard error of a set of independent measurements

use serde::{Deserialize, Serialize};

/// A `(mean, standard_error)` pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    pub mean: f64,
    pub error: f64,
}

/// Arithmetic mean and standard error of `values`.
///
/// The error is `sqrt(population_variance / (n - 1))`, and `0.0` for a single
/// value. Returns `None` for an empty slice.
pub fn average_error(values: &[f64]) -> Option<Estimate> {
    if values.is_empty() {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    let error = if values.len() > 1 {
        (variance / (n - 1.0)).sqrt()
    } else {
        0.0
    };
    Some(Estimate { mean, error })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_has_no_estimate() {
        assert_eq!(average_error(&[]), None);
    }

    #[test]
    fn test_single_value_has_zero_error() {
        assert_eq!(
            average_error(&[4.25]),
            Some(Estimate {
                mean: 4.25,
                error: 0.0
            })
        );
    }

    #[test]
    fn test_population_variance_over_n_minus_one() {
        let est = average_error(&[10.0, 0.0]).unwrap();
        assert_eq!(est.mean, 5.0);
        assert_eq!(est.error, 5.0);

        // population variance 4, divided by n - 1 = 7
        let est = average_error(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert_eq!(est.mean, 5.0);
        assert!((est.error - (4.0f64 / 7.0).sqrt()).abs() < 1e-15);
    }

    #[test]
    fn test_identical_values_have_zero_error() {
        let est = average_error(&[1.5, 1.5, 1.5]).unwrap();
        assert_eq!(est.mean, 1.5);
        assert_eq!(est.error, 0.0);
    }
}
