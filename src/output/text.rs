//! Plain text report: key followed by interleaved mean and error per column

use crate::ensemble::EnsembleResult;
use crate::error::Result;

use super::OutputFormatter;

/// Whitespace-separated text report, one line per key
pub struct TextOutput;

impl OutputFormatter for TextOutput {
    fn render(&self, result: &EnsembleResult) -> Result<Vec<String>> {
        Ok(format_report(result))
    }
}

/// Format every row as `key mean_1 error_1 ... mean_m error_m`
pub fn format_report(result: &EnsembleResult) -> Vec<String> {
    result
        .rows()
        .iter()
        .map(|row| {
            let mut fields = Vec::with_capacity(1 + 2 * row.columns.len());
            fields.push(format_number(row.key));
            for est in &row.columns {
                fields.push(format_number(est.mean));
                fields.push(format_number(est.error));
            }
            fields.join(" ")
        })
        .collect()
}

/// Shortest round-trip text of `value`; integral values keep a trailing `.0`.
///
/// Very large and very small magnitudes use Rust's exponent form (`1e16`,
/// `1e-7`), not the `1.0e+16` style some other tools print.
pub fn format_number(value: f64) -> String {
    format!("{:?}", value)
}
