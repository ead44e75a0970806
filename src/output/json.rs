//! JSON output format

use crate::ensemble::EnsembleResult;
use crate::error::Result;

use super::OutputFormatter;

/// JSON output formatter
pub struct JsonOutput {
    pretty: bool,
}

impl JsonOutput {
    pub fn new() -> Self {
        Self { pretty: true }
    }

    pub fn compact() -> Self {
        Self { pretty: false }
    }
}

impl Default for JsonOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for JsonOutput {
    fn render(&self, result: &EnsembleResult) -> Result<Vec<String>> {
        let text = if self.pretty {
            serde_json::to_string_pretty(result)?
        } else {
            serde_json::to_string(result)?
        };
        Ok(text.lines().map(str::to_string).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ensemble::{aggregate, MissingValue};
    use crate::model::KeyedTable;

    #[test]
    fn test_compact_json_shape() {
        let a = KeyedTable::from_rows(vec![(2.0, vec![10.0])]).unwrap();
        let b = KeyedTable::from_rows(vec![(1.0, vec![1.0])]).unwrap();
        let result = aggregate(&[a, b], MissingValue::Fallback(0.0)).unwrap();

        let lines = JsonOutput::compact().render(&result).unwrap();
        assert_eq!(lines.len(), 1);

        let value: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
        assert_eq!(value[0]["key"], 1.0);
        assert_eq!(value[1]["key"], 2.0);
        assert_eq!(value[1]["columns"][0]["mean"], 5.0);
        assert_eq!(value[1]["columns"][0]["error"], 5.0);
    }

    #[test]
    fn test_pretty_json_parses_back() {
        let a = KeyedTable::from_rows(vec![(0.0, vec![1.0, 2.0])]).unwrap();
        let result = aggregate(&[a], MissingValue::Skip).unwrap();

        let lines = JsonOutput::new().render(&result).unwrap();
        assert!(lines.len() > 1);
        let parsed: EnsembleResult = serde_json::from_str(&lines.join("\n")).unwrap();
        assert_eq!(parsed, result);
    }
}
